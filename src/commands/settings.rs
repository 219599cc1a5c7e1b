//! Backend configuration, accessibility preferences, and translation relay.

use serde_json::Value;
use tracing::warn;

use crate::access;
use crate::api;
use crate::db::DbState;
use crate::storage;
use crate::value_str;

// -- App ------------------------------------------------------------------------

#[tauri::command]
pub async fn app_get_version() -> Result<Value, String> {
    Ok(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "builtAt": env!("BUILD_TIMESTAMP"),
        "gitSha": env!("BUILD_GIT_SHA"),
    }))
}

// -- Backend configuration -----------------------------------------------------

#[tauri::command]
pub async fn settings_is_configured() -> Result<bool, String> {
    Ok(storage::is_configured())
}

#[tauri::command]
pub async fn settings_get_backend_url() -> Result<Value, String> {
    Ok(match storage::get_backend_url() {
        Some(url) => Value::String(url),
        None => Value::Null,
    })
}

#[tauri::command]
pub async fn settings_set_backend_url(arg0: Option<Value>) -> Result<Value, String> {
    let raw = match arg0 {
        Some(Value::String(url)) => url,
        Some(payload) => {
            value_str(&payload, &["url", "backendUrl", "backend_url"]).ok_or("Missing backend URL")?
        }
        None => return Err("Missing backend URL".into()),
    };
    let normalized = api::normalize_backend_url(&raw);
    if normalized.trim().is_empty() {
        return Err("Backend URL cannot be empty".into());
    }
    storage::set_backend_url(&normalized)?;
    Ok(serde_json::json!({ "success": true, "url": normalized }))
}

#[tauri::command]
pub async fn settings_factory_reset() -> Result<Value, String> {
    storage::factory_reset()?;
    Ok(serde_json::json!({ "success": true }))
}

/// Probe the configured backend.
#[tauri::command]
pub async fn backend_test_connection() -> Result<Value, String> {
    let url = storage::get_backend_url().ok_or("Backend not configured: missing backend URL")?;
    let result = api::test_connectivity(&url).await;
    serde_json::to_value(&result).map_err(|e| e.to_string())
}

// -- Accessibility -------------------------------------------------------------

#[tauri::command]
pub async fn access_get_prefs(db: tauri::State<'_, DbState>) -> Result<Value, String> {
    let prefs = access::load_prefs(&db)?;
    serde_json::to_value(&prefs).map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn access_set_text_size(
    arg0: Option<Value>,
    db: tauri::State<'_, DbState>,
) -> Result<(), String> {
    let value = match arg0 {
        Some(Value::String(value)) => value,
        Some(Value::Number(n)) => n.to_string(),
        Some(payload) => value_str(&payload, &["multiplier", "value", "size"])
            .ok_or("Missing text size")?,
        None => return Err("Missing text size".into()),
    };
    access::set_text_size(&db, value.trim()).map_err(|e| e.to_string())
}

fn parse_flag(arg0: Option<Value>, keys: &[&str]) -> Result<bool, String> {
    match arg0 {
        Some(Value::Bool(flag)) => Ok(flag),
        Some(payload) => keys
            .iter()
            .find_map(|key| payload.get(*key).and_then(Value::as_bool))
            .ok_or("Missing flag".into()),
        None => Err("Missing flag".into()),
    }
}

#[tauri::command]
pub async fn access_set_magnifier(
    arg0: Option<Value>,
    db: tauri::State<'_, DbState>,
) -> Result<(), String> {
    let active = parse_flag(arg0, &["active", "enabled"])?;
    access::set_magnifier(&db, active)
}

#[tauri::command]
pub async fn access_set_contrast(
    arg0: Option<Value>,
    db: tauri::State<'_, DbState>,
) -> Result<(), String> {
    let active = parse_flag(arg0, &["active", "enabled"])?;
    access::set_soft_contrast(&db, active)
}

/// Declarative overlay state for the given route.
#[tauri::command]
pub async fn access_overlay_state(
    arg0: Option<Value>,
    db: tauri::State<'_, DbState>,
) -> Result<Value, String> {
    let path = match arg0 {
        Some(Value::String(path)) => path,
        Some(payload) => value_str(&payload, &["path", "route"]).unwrap_or_else(|| "/".into()),
        None => "/".into(),
    };
    let prefs = access::load_prefs(&db)?;
    serde_json::to_value(access::overlay_state(&prefs, &path)).map_err(|e| e.to_string())
}

// -- Translation ----------------------------------------------------------------

/// Relay a string through the backend's translation endpoint. Degrades to
/// the English source on any failure so the UI never blocks on language.
#[tauri::command]
pub async fn translation_get(arg0: Option<Value>) -> Result<Value, String> {
    let english = match arg0 {
        Some(Value::String(word)) => word,
        Some(payload) => value_str(&payload, &["en", "text", "word"]).ok_or("Missing text")?,
        None => return Err("Missing text".into()),
    };

    let body = serde_json::json!({ "en": english });
    match crate::backend_fetch("/get-translation", "POST", Some(body)).await {
        Ok(resp) if resp.get("es").and_then(Value::as_str).is_some() => Ok(resp),
        Ok(_) | Err(_) => {
            warn!(word = %english, "translation unavailable, falling back to source text");
            Ok(serde_json::json!({ "es": english }))
        }
    }
}
