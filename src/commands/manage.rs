//! Management screen commands: inventory, employees, prices, menu items.
//!
//! Plain CRUD relays over the backend collections. The command layer
//! validates just enough to build a well-formed request; list refresh and
//! optimistic updates are the frontend's concern.

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::catalog::PREMIUM_PREFIX;
use crate::{value_i64, value_str};

// -- Inventory ---------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct InventoryRowPayload {
    name: String,
    quantity: f64,
    #[serde(default)]
    unit: String,
}

fn parse_inventory_payload(arg0: Option<Value>) -> Result<InventoryRowPayload, String> {
    let payload = arg0.ok_or("Missing inventory payload")?;
    let row: InventoryRowPayload =
        serde_json::from_value(payload).map_err(|e| format!("Invalid inventory payload: {e}"))?;
    if row.name.trim().is_empty() {
        return Err("Inventory item name is required".into());
    }
    Ok(row)
}

#[tauri::command]
pub async fn inventory_get_all() -> Result<Value, String> {
    crate::backend_fetch("/inventory", "GET", None)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn inventory_add(arg0: Option<Value>) -> Result<Value, String> {
    let row = parse_inventory_payload(arg0)?;
    let body = serde_json::json!({
        "name": row.name,
        "quantity": row.quantity,
        "unit": row.unit,
    });
    crate::backend_fetch("/inventory", "POST", Some(body))
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn inventory_update(arg0: Option<Value>) -> Result<Value, String> {
    let row = parse_inventory_payload(arg0)?;
    let path = format!("/inventory/{}", crate::api::encode_path_segment(&row.name));
    let body = serde_json::json!({ "quantity": row.quantity, "unit": row.unit });
    crate::backend_fetch(&path, "PUT", Some(body))
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn inventory_delete(arg0: Option<Value>) -> Result<Value, String> {
    let name = match arg0 {
        Some(Value::String(name)) if !name.trim().is_empty() => name,
        Some(payload) => value_str(&payload, &["name"]).ok_or("Missing inventory item name")?,
        None => return Err("Missing inventory item name".into()),
    };
    let path = format!("/inventory/{}", crate::api::encode_path_segment(&name));
    crate::backend_fetch(&path, "DELETE", None)
        .await
        .map_err(|e| e.to_string())
}

// -- Employees ---------------------------------------------------------------

#[tauri::command]
pub async fn employee_get_all() -> Result<Value, String> {
    crate::backend_fetch("/employees", "GET", None)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn employee_add(arg0: Option<Value>) -> Result<Value, String> {
    let payload = arg0.ok_or("Missing employee payload")?;
    if value_str(&payload, &["first_name", "firstName"]).is_none() {
        return Err("Employee first name is required".into());
    }
    crate::backend_fetch("/employees", "POST", Some(payload))
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn employee_update(arg0: Option<Value>) -> Result<Value, String> {
    let payload = arg0.ok_or("Missing employee payload")?;
    let id = value_i64(&payload, &["id"]).ok_or("Missing employee id")?;
    let path = format!("/employees/{id}");
    crate::backend_fetch(&path, "PUT", Some(payload))
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn employee_delete(arg0: Option<Value>) -> Result<Value, String> {
    let id = match arg0 {
        Some(Value::Number(ref n)) => n.as_i64().ok_or("Invalid employee id")?,
        Some(ref payload) => value_i64(payload, &["id"]).ok_or("Missing employee id")?,
        None => return Err("Missing employee id".into()),
    };
    let path = format!("/employees/{id}");
    crate::backend_fetch(&path, "DELETE", None)
        .await
        .map_err(|e| e.to_string())
}

// -- Prices ------------------------------------------------------------------

#[tauri::command]
pub async fn price_get_all() -> Result<Value, String> {
    crate::backend_fetch("/view-prices", "GET", None)
        .await
        .map_err(|e| e.to_string())
}

/// Bulk price update. Only changed rows should be sent; an empty change set
/// is refused locally.
#[tauri::command]
pub async fn price_modify(arg0: Option<Value>) -> Result<Value, String> {
    let changes = match arg0 {
        Some(Value::Array(changes)) => changes,
        Some(payload) => payload
            .get("changes")
            .and_then(Value::as_array)
            .cloned()
            .ok_or("Missing price changes")?,
        None => return Err("Missing price changes".into()),
    };
    if changes.is_empty() {
        return Err("No changes made".into());
    }
    for change in &changes {
        let name_ok = change
            .get("name")
            .and_then(Value::as_str)
            .map(|n| !n.trim().is_empty())
            .unwrap_or(false);
        let price_ok = change.get("price").map(Value::is_number).unwrap_or(false);
        if !name_ok || !price_ok {
            return Err("Each price change needs a 'name' and a numeric 'price'".into());
        }
    }
    info!(count = changes.len(), "applying price changes");
    crate::backend_fetch("/modify-prices", "PUT", Some(Value::Array(changes)))
        .await
        .map_err(|e| e.to_string())
}

// -- Menu items --------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct MenuItemPayload {
    name: String,
    #[serde(rename = "type")]
    item_type: String,
    #[serde(rename = "isPremium", alias = "is_premium", default)]
    is_premium: bool,
}

/// Build the stored item name: premium entrées carry the premium marker.
fn menu_item_wire_name(payload: &MenuItemPayload) -> String {
    if payload.item_type == "entree" && payload.is_premium {
        format!("{PREMIUM_PREFIX}{}", payload.name)
    } else {
        payload.name.clone()
    }
}

const MENU_ITEM_TYPES: &[&str] = &[
    "entree",
    "side",
    "a la carte s",
    "a la carte m",
    "a la carte l",
    "appetizer s",
    "appetizer l",
    "drink",
];

#[tauri::command]
pub async fn menu_item_add(arg0: Option<Value>) -> Result<Value, String> {
    let payload = arg0.ok_or("Missing menu item payload")?;
    let parsed: MenuItemPayload =
        serde_json::from_value(payload).map_err(|e| format!("Invalid menu item payload: {e}"))?;
    if parsed.name.trim().is_empty() {
        return Err("Menu item name is required".into());
    }
    if !MENU_ITEM_TYPES.contains(&parsed.item_type.as_str()) {
        return Err(format!("Unknown menu item type: {}", parsed.item_type));
    }

    let body = serde_json::json!({
        "name": menu_item_wire_name(&parsed),
        "type": parsed.item_type,
    });
    crate::backend_fetch("/add-menu-item", "POST", Some(body))
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn menu_items_get() -> Result<Value, String> {
    crate::backend_fetch("/menu-items", "GET", None)
        .await
        .map_err(|e| e.to_string())
}

/// The catalog grouped for the menu board displays.
#[tauri::command]
pub async fn menu_board_get() -> Result<Value, String> {
    let items = crate::backend_fetch("/menu-items", "GET", None)
        .await
        .map_err(|e| e.to_string())?;
    let catalog = crate::catalog::MenuCatalog::from_items(
        items.as_array().map(Vec::as_slice).unwrap_or(&[]),
    );
    serde_json::to_value(&catalog).map_err(|e| e.to_string())
}
