//! Restock assistant commands.

use serde_json::Value;
use tracing::info;

use crate::restock::{self, ChatMessage, RestockState};
use crate::value_str;

/// Fetch current restock figures, rebuild the system pre-prompt, and start
/// a fresh conversation.
#[tauri::command]
pub async fn restock_load(restock_state: tauri::State<'_, RestockState>) -> Result<Value, String> {
    let info = crate::backend_fetch("/inventory-restock-info", "GET", None)
        .await
        .map_err(|_| "Unable to load restock information".to_string())?;

    let mut session = restock_state.inner.lock().map_err(|e| e.to_string())?;
    session.pre_prompt = restock::build_pre_prompt(&info);
    session.messages.clear();
    Ok(serde_json::json!({ "restock_info": info }))
}

#[tauri::command]
pub async fn restock_get_state(
    restock_state: tauri::State<'_, RestockState>,
) -> Result<Value, String> {
    let session = restock_state.inner.lock().map_err(|e| e.to_string())?;
    serde_json::to_value(&session.messages).map_err(|e| e.to_string())
}

/// Send one user turn to the assistant and append its reply.
#[tauri::command]
pub async fn restock_send(
    arg0: Option<Value>,
    restock_state: tauri::State<'_, RestockState>,
) -> Result<Value, String> {
    let text = match arg0 {
        Some(Value::String(text)) => text,
        Some(payload) => value_str(&payload, &["text", "message"]).unwrap_or_default(),
        None => String::new(),
    };
    if text.trim().is_empty() {
        return Err("Message text is required".into());
    }

    let payload = {
        let mut session = restock_state.inner.lock().map_err(|e| e.to_string())?;
        session.messages.push(ChatMessage::user(text));
        restock::build_chat_payload(&session.pre_prompt, &session.messages)
    };

    let resp = crate::backend_fetch("/chat", "POST", Some(payload))
        .await
        .map_err(|_| "Unable to process your request at this time".to_string())?;

    let reply = resp
        .get("response")
        .and_then(Value::as_str)
        .ok_or("Assistant reply was empty")?
        .to_string();

    let mut session = restock_state.inner.lock().map_err(|e| e.to_string())?;
    session.messages.push(ChatMessage::ai(reply.clone()));
    Ok(serde_json::json!({ "response": reply }))
}

/// Validate the assistant's latest reply as a mass-inventory-update payload
/// and apply it. Nothing is sent when the reply does not validate.
#[tauri::command]
pub async fn restock_apply(restock_state: tauri::State<'_, RestockState>) -> Result<Value, String> {
    let updates = {
        let session = restock_state.inner.lock().map_err(|e| e.to_string())?;
        let reply = session.last_ai_reply().map_err(|e| e.to_string())?;
        restock::parse_restock_updates(&reply.text).map_err(|e| e.to_string())?
    };

    let count = updates["updates"].as_array().map(Vec::len).unwrap_or(0);
    let resp = crate::backend_fetch("/mass-inventory-update", "POST", Some(updates))
        .await
        .map_err(|e| e.to_string())?;
    info!(count, "restock updates applied");
    Ok(resp)
}
