//! Customer self-order (kiosk) commands.

use serde_json::Value;
use tracing::{info, warn};

use crate::catalog::{CustomerPrices, Size};
use crate::composer::MealKind;
use crate::kiosk::{self, KioskCategory, KioskState};
use crate::value_str;

fn parse_combo_payload(arg0: Option<Value>) -> Result<MealKind, String> {
    let name = match arg0 {
        Some(Value::String(name)) => name,
        Some(payload) => value_str(&payload, &["combo", "meal", "type"])
            .ok_or("Missing combo kind")?,
        None => return Err("Missing combo kind".into()),
    };
    MealKind::from_wire(name.trim()).ok_or_else(|| format!("Unknown combo kind: {name}"))
}

fn parse_name_payload(arg0: Option<Value>, keys: &[&str]) -> Result<String, String> {
    match arg0 {
        Some(Value::String(name)) if !name.trim().is_empty() => Ok(name),
        Some(payload) => value_str(&payload, keys).ok_or("Missing item name".into()),
        None => Err("Missing item name".into()),
    }
}

fn parse_sized_item_payload(
    arg0: Option<Value>,
) -> Result<(KioskCategory, String, Size), String> {
    let payload = arg0.ok_or("Missing item payload")?;
    let category: KioskCategory = payload
        .get("category")
        .cloned()
        .ok_or("Missing category")
        .and_then(|v| serde_json::from_value(v).map_err(|_| "Unknown category"))
        .map_err(str::to_string)?;
    let name = value_str(&payload, &["name", "item", "itemName"]).ok_or("Missing item name")?;
    let size: Size = payload
        .get("size")
        .cloned()
        .ok_or("Missing size")
        .and_then(|v| serde_json::from_value(v).map_err(|_| "Unknown size"))
        .map_err(str::to_string)?;
    Ok((category, name, size))
}

/// Load the customer price structure. Also clears any stale employee
/// session, matching the walk-up kiosk's behavior on entry.
#[tauri::command]
pub async fn kiosk_load(
    kiosk_state: tauri::State<'_, KioskState>,
    session_state: tauri::State<'_, crate::session::SessionState>,
) -> Result<Value, String> {
    session_state.sign_out();

    let resp = crate::backend_fetch("/get-customer-prices", "GET", None)
        .await
        .map_err(|e| e.to_string())?;
    let prices: CustomerPrices =
        serde_json::from_value(resp).map_err(|e| format!("Invalid customer prices: {e}"))?;

    let mut state = kiosk_state.inner.lock().map_err(|e| e.to_string())?;
    state.load(prices);
    Ok(state.snapshot())
}

/// The fixed kiosk signage catalog.
#[tauri::command]
pub async fn kiosk_get_catalog() -> Result<Value, String> {
    Ok(serde_json::json!({
        "combos": ["Bowl", "Plate", "Bigger Plate"],
        "sides": kiosk::KIOSK_SIDES,
        "entrees": kiosk::KIOSK_ENTREES
            .iter()
            .map(|(name, premium)| serde_json::json!({ "name": name, "isPremium": premium }))
            .collect::<Vec<_>>(),
        "appetizers": kiosk::KIOSK_APPETIZERS,
        "drinks": kiosk::KIOSK_DRINKS,
    }))
}

#[tauri::command]
pub async fn kiosk_get_cart(kiosk_state: tauri::State<'_, KioskState>) -> Result<Value, String> {
    let state = kiosk_state.inner.lock().map_err(|e| e.to_string())?;
    Ok(state.snapshot())
}

#[tauri::command]
pub async fn kiosk_start_combo(
    arg0: Option<Value>,
    kiosk_state: tauri::State<'_, KioskState>,
) -> Result<Value, String> {
    let kind = parse_combo_payload(arg0)?;
    let mut state = kiosk_state.inner.lock().map_err(|e| e.to_string())?;
    state.start_combo(kind).map_err(|e| e.to_string())?;
    Ok(state.snapshot())
}

#[tauri::command]
pub async fn kiosk_cancel_combo(kiosk_state: tauri::State<'_, KioskState>) -> Result<Value, String> {
    let mut state = kiosk_state.inner.lock().map_err(|e| e.to_string())?;
    state.cancel_combo();
    Ok(state.snapshot())
}

#[tauri::command]
pub async fn kiosk_select_side(
    arg0: Option<Value>,
    kiosk_state: tauri::State<'_, KioskState>,
) -> Result<Value, String> {
    let name = parse_name_payload(arg0, &["side", "name"])?;
    let mut state = kiosk_state.inner.lock().map_err(|e| e.to_string())?;
    state.select_side(&name).map_err(|e| e.to_string())?;
    Ok(state.snapshot())
}

#[tauri::command]
pub async fn kiosk_select_entree(
    arg0: Option<Value>,
    kiosk_state: tauri::State<'_, KioskState>,
) -> Result<Value, String> {
    let name = parse_name_payload(arg0, &["entree", "name"])?;
    let mut state = kiosk_state.inner.lock().map_err(|e| e.to_string())?;
    state.select_entree(&name).map_err(|e| e.to_string())?;
    Ok(state.snapshot())
}

#[tauri::command]
pub async fn kiosk_confirm_combo(
    kiosk_state: tauri::State<'_, KioskState>,
) -> Result<Value, String> {
    let mut state = kiosk_state.inner.lock().map_err(|e| e.to_string())?;
    let id = state.confirm_combo().map_err(|e| e.to_string())?;
    let mut snapshot = state.snapshot();
    snapshot["added_id"] = serde_json::json!(id);
    Ok(snapshot)
}

#[tauri::command]
pub async fn kiosk_add_item(
    arg0: Option<Value>,
    kiosk_state: tauri::State<'_, KioskState>,
) -> Result<Value, String> {
    let (category, name, size) = parse_sized_item_payload(arg0)?;
    let mut state = kiosk_state.inner.lock().map_err(|e| e.to_string())?;
    let id = state
        .add_item(category, &name, size)
        .map_err(|e| e.to_string())?;
    let mut snapshot = state.snapshot();
    snapshot["added_id"] = serde_json::json!(id);
    Ok(snapshot)
}

#[tauri::command]
pub async fn kiosk_remove_line(
    arg0: Option<Value>,
    kiosk_state: tauri::State<'_, KioskState>,
) -> Result<Value, String> {
    let id = parse_name_payload(arg0, &["id", "lineId", "line_id"])?;
    let mut state = kiosk_state.inner.lock().map_err(|e| e.to_string())?;
    state.remove_line(&id).map_err(|e| e.to_string())?;
    Ok(state.snapshot())
}

/// The weather-flavoured checkout note. Decoration: failures return null.
#[tauri::command]
pub async fn kiosk_checkout_note() -> Result<Value, String> {
    Ok(match kiosk::fetch_checkout_note().await {
        Some(note) => Value::String(note),
        None => Value::Null,
    })
}

/// Submit the cart. Kiosk orders carry no employee id; on failure the cart
/// is kept for retry.
#[tauri::command]
pub async fn kiosk_checkout(
    arg0: Option<Value>,
    kiosk_state: tauri::State<'_, KioskState>,
) -> Result<Value, String> {
    let customer_name = parse_name_payload(arg0, &["name", "customerName", "customer_name"])
        .map_err(|_| "Please enter your name".to_string())?;
    let order_date = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();

    let payload = {
        let mut state = kiosk_state.inner.lock().map_err(|e| e.to_string())?;
        state
            .begin_checkout(&customer_name, &order_date)
            .map_err(|e| e.to_string())?
    };

    let result = crate::backend_fetch("/submit-order", "POST", Some(payload)).await;

    let mut state = kiosk_state.inner.lock().map_err(|e| e.to_string())?;
    match result {
        Ok(resp) => {
            state.finish_checkout_success();
            let order_id = resp.get("order_id").cloned().unwrap_or(Value::Null);
            info!("kiosk order submitted");
            Ok(serde_json::json!({ "success": true, "order_id": order_id }))
        }
        Err(e) => {
            state.finish_checkout_failure();
            warn!(error = %e, "kiosk checkout failed, keeping cart");
            Err(e.to_string())
        }
    }
}
