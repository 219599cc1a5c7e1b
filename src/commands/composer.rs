//! Employee order entry commands.

use serde_json::Value;
use tracing::{info, warn};

use crate::catalog::{Category, MenuCatalog, PriceTable};
use crate::composer::{ComposerState, MealKind};
use crate::session::SessionState;
use crate::{value_str, value_u64};

fn parse_meal_payload(arg0: Option<Value>) -> Result<MealKind, String> {
    let name = match arg0 {
        Some(Value::String(name)) => name,
        Some(payload) => value_str(&payload, &["meal", "mealType", "meal_type"])
            .ok_or("Missing meal kind")?,
        None => return Err("Missing meal kind".into()),
    };
    MealKind::from_wire(name.trim()).ok_or_else(|| format!("Unknown meal kind: {name}"))
}

fn parse_item_payload(arg0: Option<Value>) -> Result<(Category, String), String> {
    let payload = arg0.ok_or("Missing item payload")?;
    let category_value = payload.get("category").cloned().ok_or("Missing category")?;
    let category: Category =
        serde_json::from_value(category_value).map_err(|_| "Unknown category".to_string())?;
    let name = value_str(&payload, &["name", "item", "itemName"]).ok_or("Missing item name")?;
    Ok((category, name))
}

/// Load the menu catalog and price table from the backend and start a fresh
/// selection round. Committed lines survive a reload.
#[tauri::command]
pub async fn composer_load(
    composer: tauri::State<'_, ComposerState>,
) -> Result<Value, String> {
    let items = crate::backend_fetch("/menu-items", "GET", None)
        .await
        .map_err(|e| e.to_string())?;
    let prices = crate::backend_fetch("/view-prices", "GET", None)
        .await
        .map_err(|e| e.to_string())?;

    let catalog = MenuCatalog::from_items(items.as_array().map(Vec::as_slice).unwrap_or(&[]));
    let table = PriceTable::from_rows(prices.as_array().map(Vec::as_slice).unwrap_or(&[]));
    if table.is_empty() {
        warn!("price table from backend is empty");
    }

    let mut state = composer.inner.lock().map_err(|e| e.to_string())?;
    state.load(catalog, table);
    let mut snapshot = state.snapshot();
    snapshot["catalog"] = serde_json::to_value(&state.catalog).map_err(|e| e.to_string())?;
    Ok(snapshot)
}

#[tauri::command]
pub async fn composer_get_state(
    composer: tauri::State<'_, ComposerState>,
) -> Result<Value, String> {
    let state = composer.inner.lock().map_err(|e| e.to_string())?;
    Ok(state.snapshot())
}

#[tauri::command]
pub async fn composer_toggle_meal(
    arg0: Option<Value>,
    composer: tauri::State<'_, ComposerState>,
) -> Result<Value, String> {
    let kind = parse_meal_payload(arg0)?;
    let mut state = composer.inner.lock().map_err(|e| e.to_string())?;
    state.toggle_meal(kind).map_err(|e| e.to_string())?;
    Ok(state.snapshot())
}

#[tauri::command]
pub async fn composer_toggle_item(
    arg0: Option<Value>,
    composer: tauri::State<'_, ComposerState>,
) -> Result<Value, String> {
    let (category, name) = parse_item_payload(arg0)?;
    let mut state = composer.inner.lock().map_err(|e| e.to_string())?;
    state.toggle_item(category, &name).map_err(|e| e.to_string())?;
    Ok(state.snapshot())
}

#[tauri::command]
pub async fn composer_clear_selection(
    composer: tauri::State<'_, ComposerState>,
) -> Result<Value, String> {
    let mut state = composer.inner.lock().map_err(|e| e.to_string())?;
    state.clear_selections().map_err(|e| e.to_string())?;
    Ok(state.snapshot())
}

/// Validate the current selection and commit it as an order line.
#[tauri::command]
pub async fn composer_add_line(
    composer: tauri::State<'_, ComposerState>,
) -> Result<Value, String> {
    let mut state = composer.inner.lock().map_err(|e| e.to_string())?;
    let id = state.add_line().map_err(|e| e.to_string())?;
    let mut snapshot = state.snapshot();
    snapshot["added_id"] = serde_json::json!(id);
    Ok(snapshot)
}

#[tauri::command]
pub async fn composer_delete_line(
    arg0: Option<Value>,
    composer: tauri::State<'_, ComposerState>,
) -> Result<Value, String> {
    let id = match arg0 {
        Some(Value::Number(ref n)) => n.as_u64().ok_or("Invalid line id")?,
        Some(ref payload) => value_u64(payload, &["id", "lineId", "line_id"])
            .ok_or("Missing line id")?,
        None => return Err("Missing line id".into()),
    };
    let mut state = composer.inner.lock().map_err(|e| e.to_string())?;
    state.delete_line(id).map_err(|e| e.to_string())?;
    Ok(state.snapshot())
}

#[tauri::command]
pub async fn composer_set_customer_name(
    arg0: Option<Value>,
    composer: tauri::State<'_, ComposerState>,
) -> Result<(), String> {
    let name = match arg0 {
        Some(Value::String(name)) => name,
        Some(payload) => value_str(&payload, &["name", "customerName", "customer_name"])
            .unwrap_or_default(),
        None => String::new(),
    };
    let mut state = composer.inner.lock().map_err(|e| e.to_string())?;
    state.set_customer_name(&name).map_err(|e| e.to_string())?;
    Ok(())
}

/// Submit the staged order to the backend. On failure the order is kept
/// intact for retry; on success it is cleared and the line counter resets.
#[tauri::command]
pub async fn composer_submit(
    composer: tauri::State<'_, ComposerState>,
    session_state: tauri::State<'_, SessionState>,
) -> Result<Value, String> {
    let employee = session_state
        .current()
        .ok_or("Not signed in: an employee session is required to submit orders")?;
    let order_date = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let payload = {
        let mut state = composer.inner.lock().map_err(|e| e.to_string())?;
        state
            .begin_submit(employee.id, &order_date)
            .map_err(|e| e.to_string())?
    };

    let result = crate::backend_fetch("/submit-order", "POST", Some(payload)).await;

    let mut state = composer.inner.lock().map_err(|e| e.to_string())?;
    match result {
        Ok(resp) => {
            state.finish_submit_success();
            let order_id = resp.get("order_id").cloned().unwrap_or(Value::Null);
            info!(employee_id = employee.id, "order submitted");
            Ok(serde_json::json!({ "success": true, "order_id": order_id }))
        }
        Err(e) => {
            state.finish_submit_failure();
            warn!(error = %e, "order submission failed, keeping staged order");
            Err(e.to_string())
        }
    }
}
