//! Order history and reporting commands.

use chrono::{Local, Timelike};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Mutex;
use tracing::info;

use crate::api;
use crate::{value_i64, value_str};

/// Z-report bookkeeping: the end-of-day report may only run once per day.
/// Holds the local date of the last run.
#[derive(Default)]
pub struct ReportState {
    z_report_ran_on: Mutex<Option<String>>,
}

fn local_date() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

// -- Order history -----------------------------------------------------------

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct OrderHistoryPayload {
    #[serde(default)]
    page: Option<i64>,
    #[serde(default)]
    limit: Option<i64>,
    #[serde(default)]
    customer: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    employee: Option<String>,
    #[serde(default)]
    price: Option<String>,
}

fn order_history_path(arg0: Option<Value>) -> Result<String, String> {
    let parsed: OrderHistoryPayload = match arg0 {
        Some(payload) => serde_json::from_value(payload)
            .map_err(|e| format!("Invalid order history filters: {e}"))?,
        None => OrderHistoryPayload::default(),
    };
    Ok(api::build_query(
        "/orders",
        &[
            ("page", parsed.page.unwrap_or(0).to_string()),
            ("limit", parsed.limit.unwrap_or(10).to_string()),
            ("customer", parsed.customer.unwrap_or_default()),
            ("date", parsed.date.unwrap_or_default()),
            ("employee", parsed.employee.unwrap_or_default()),
            ("price", parsed.price.unwrap_or_default()),
        ],
    ))
}

/// Paginated order history with customer/date/employee/price filters.
#[tauri::command]
pub async fn order_history_get(arg0: Option<Value>) -> Result<Value, String> {
    let path = order_history_path(arg0)?;
    crate::backend_fetch(&path, "GET", None)
        .await
        .map_err(|e| e.to_string())
}

/// Per-order detail lines (meal type + item names).
#[tauri::command]
pub async fn order_history_details(arg0: Option<Value>) -> Result<Value, String> {
    let order_id = match arg0 {
        Some(Value::Number(ref n)) => n.as_i64().ok_or("Invalid order id")?,
        Some(ref payload) => {
            value_i64(payload, &["orderId", "order_id", "id"]).ok_or("Missing order id")?
        }
        None => return Err("Missing order id".into()),
    };
    let path = format!("/orders/{order_id}/details");
    crate::backend_fetch(&path, "GET", None)
        .await
        .map_err(|e| e.to_string())
}

// -- Reports -----------------------------------------------------------------

/// Per-item daily order counts over a date range.
#[tauri::command]
pub async fn report_sales_trends(arg0: Option<Value>) -> Result<Value, String> {
    let payload = arg0.ok_or("Missing report parameters")?;
    let start_date = value_str(&payload, &["startDate", "start_date"])
        .ok_or("Start and end dates are required")?;
    let end_date =
        value_str(&payload, &["endDate", "end_date"]).ok_or("Start and end dates are required")?;
    let item_name = value_str(&payload, &["itemName", "item_name"]).unwrap_or_default();

    let path = api::build_query(
        "/get-sales-trends",
        &[
            ("start_date", start_date),
            ("end_date", end_date),
            ("item_name", item_name),
        ],
    );
    crate::backend_fetch(&path, "GET", None)
        .await
        .map_err(|e| e.to_string())
}

/// X report: today's hourly sales up to the current hour.
#[tauri::command]
pub async fn report_x() -> Result<Value, String> {
    let path = api::build_query(
        "/get-x-report",
        &[
            ("report_date", local_date()),
            ("up_to_hour", Local::now().hour().to_string()),
        ],
    );
    crate::backend_fetch(&path, "GET", None)
        .await
        .map_err(|e| e.to_string())
}

/// Z report: end-of-day sales summary. Runs once per day; a repeat run is
/// refused before any request is made.
#[tauri::command]
pub async fn report_z(report_state: tauri::State<'_, ReportState>) -> Result<Value, String> {
    let today = local_date();
    {
        let ran_on = report_state.z_report_ran_on.lock().map_err(|e| e.to_string())?;
        if ran_on.as_deref() == Some(today.as_str()) {
            return Err("Z Report has already been run today. Daily total has been reset".into());
        }
    }

    let path = api::build_query(
        "/get-z-report",
        &[("report_date", today.clone()), ("up_to_hour", "23".into())],
    );
    let resp = crate::backend_fetch(&path, "GET", None)
        .await
        .map_err(|e| e.to_string())?;

    let mut ran_on = report_state.z_report_ran_on.lock().map_err(|e| e.to_string())?;
    *ran_on = Some(today);
    info!("z report generated, daily total reset");
    Ok(resp)
}

/// Ingredient usage totals over a date range.
#[tauri::command]
pub async fn report_product_usage(arg0: Option<Value>) -> Result<Value, String> {
    let payload = arg0.ok_or("Missing report parameters")?;
    let start_date = value_str(&payload, &["startDate", "start_date"])
        .ok_or("Start and end dates are required")?;
    let end_date =
        value_str(&payload, &["endDate", "end_date"]).ok_or("Start and end dates are required")?;

    let path = api::build_query(
        "/get-productusage",
        &[("start_date", start_date), ("end_date", end_date)],
    );
    crate::backend_fetch(&path, "GET", None)
        .await
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod dto_tests {
    use super::*;

    #[test]
    fn order_history_path_defaults_and_filters() {
        assert_eq!(order_history_path(None).unwrap(), "/orders?page=0&limit=10");

        let path = order_history_path(Some(serde_json::json!({
            "page": 2,
            "limit": 25,
            "customer": "Ann",
            "employee": "Lee"
        })))
        .unwrap();
        assert_eq!(path, "/orders?page=2&limit=25&customer=Ann&employee=Lee");
    }

    #[test]
    fn order_history_path_rejects_malformed_filters() {
        assert!(order_history_path(Some(serde_json::json!({ "page": "two" }))).is_err());
    }
}
