//! AI-assisted restock conversation.
//!
//! The backend hosts the chat-completion endpoint; this module owns the
//! conversation state, the system pre-prompt that carries the current
//! restock figures, and the validation gate between an AI reply and the
//! mass-inventory-update call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PosError, PosResult};

/// Standing instructions for the assistant; the fetched restock figures are
/// appended before the first user turn.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant. Always provide clear, concise responses. Your role is to help the manager of the restaurant with inventory restocking decisions. Provide JSON payloads suitable for updating inventory using the 'mass-inventory-update' API.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: String,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: "user".into(),
            text: text.into(),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            sender: "ai".into(),
            text: text.into(),
        }
    }
}

/// Build the full system pre-prompt from the `/inventory-restock-info`
/// response.
pub fn build_pre_prompt(restock_info: &Value) -> String {
    format!(
        "{SYSTEM_PROMPT} Here is the current restock information: {restock_info} When asked to pick top K items to restock, prioritize based on the priority score."
    )
}

/// Build the `/chat` request body: the system message followed by the
/// conversation so far.
pub fn build_chat_payload(pre_prompt: &str, history: &[ChatMessage]) -> Value {
    let mut messages = vec![serde_json::json!({ "sender": "system", "text": pre_prompt })];
    messages.extend(
        history
            .iter()
            .map(|m| serde_json::json!({ "sender": m.sender, "text": m.text })),
    );
    serde_json::json!({ "messages": messages })
}

/// Validate an AI reply as a mass-inventory-update payload.
///
/// The reply must be JSON with an `updates` array whose entries each carry a
/// `name` string and a numeric `quantity`; anything else is refused before a
/// single byte reaches the backend.
pub fn parse_restock_updates(ai_text: &str) -> PosResult<Value> {
    let parsed: Value = serde_json::from_str(ai_text).map_err(|_| {
        PosError::validation(
            "Unable to process restock. Ensure the AI's response is in valid JSON format",
        )
    })?;

    let updates = parsed
        .get("updates")
        .and_then(Value::as_array)
        .ok_or_else(|| PosError::validation("Invalid format: 'updates' must be an array"))?;

    for update in updates {
        let name_ok = update
            .get("name")
            .and_then(Value::as_str)
            .map(|n| !n.trim().is_empty())
            .unwrap_or(false);
        let quantity_ok = update.get("quantity").map(Value::is_number).unwrap_or(false);
        if !name_ok || !quantity_ok {
            return Err(PosError::validation(
                "Invalid format: each update must have a 'name' and a numeric 'quantity'",
            ));
        }
    }

    Ok(serde_json::json!({ "updates": updates }))
}

/// Conversation state for the restock screen.
#[derive(Debug, Default)]
pub struct RestockSession {
    pub pre_prompt: String,
    pub messages: Vec<ChatMessage>,
}

impl RestockSession {
    /// The last AI turn, if the conversation ends with one.
    pub fn last_ai_reply(&self) -> PosResult<&ChatMessage> {
        match self.messages.last() {
            Some(message) if message.sender == "ai" => Ok(message),
            _ => Err(PosError::validation(
                "No valid AI response available for restocking",
            )),
        }
    }
}

/// Tauri managed state wrapper.
pub struct RestockState {
    pub inner: std::sync::Mutex<RestockSession>,
}

impl RestockState {
    pub fn new() -> Self {
        Self {
            inner: std::sync::Mutex::new(RestockSession::default()),
        }
    }
}

impl Default for RestockState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_prompt_embeds_the_restock_figures() {
        let info = serde_json::json!([
            {"ingredient_name": "Soy Sauce", "current_quantity": 3.0,
             "total_quantity_needed": 10.0, "priority_score": 0.7}
        ]);
        let prompt = build_pre_prompt(&info);
        assert!(prompt.starts_with(SYSTEM_PROMPT));
        assert!(prompt.contains("Soy Sauce"));
        assert!(prompt.contains("priority score"));
    }

    #[test]
    fn chat_payload_leads_with_the_system_message() {
        let history = vec![
            ChatMessage::user("what should I restock?"),
            ChatMessage::ai("{\"updates\":[]}"),
        ];
        let payload = build_chat_payload("system text", &history);
        let messages = payload["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["sender"], "system");
        assert_eq!(messages[1]["sender"], "user");
        assert_eq!(messages[2]["sender"], "ai");
    }

    #[test]
    fn last_ai_reply_requires_the_conversation_to_end_with_one() {
        let mut session = RestockSession::default();
        assert_eq!(session.last_ai_reply().unwrap_err().kind(), "validation");

        session.messages.push(ChatMessage::ai("{\"updates\":[]}"));
        session.messages.push(ChatMessage::user("thanks"));
        assert!(session.last_ai_reply().is_err());

        session.messages.push(ChatMessage::ai("{\"updates\":[]}"));
        assert_eq!(session.last_ai_reply().unwrap().sender, "ai");
    }

    #[test]
    fn well_formed_updates_pass() {
        let payload = parse_restock_updates(
            r#"{"updates":[{"name":"Soy Sauce","quantity":25},{"name":"Rice","quantity":100.5}]}"#,
        )
        .unwrap();
        assert_eq!(payload["updates"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn malformed_replies_are_validation_errors() {
        assert_eq!(
            parse_restock_updates("sure, restock 25 soy sauce").unwrap_err().kind(),
            "validation"
        );
        assert_eq!(
            parse_restock_updates(r#"{"updates":"all"}"#).unwrap_err().kind(),
            "validation"
        );
        assert_eq!(
            parse_restock_updates(r#"{"updates":[{"name":"Rice"}]}"#)
                .unwrap_err()
                .kind(),
            "validation"
        );
        assert_eq!(
            parse_restock_updates(r#"{"updates":[{"name":"","quantity":1}]}"#)
                .unwrap_err()
                .kind(),
            "validation"
        );
        assert_eq!(
            parse_restock_updates(r#"{"updates":[{"name":"Rice","quantity":"lots"}]}"#)
                .unwrap_err()
                .kind(),
            "validation"
        );
    }
}
