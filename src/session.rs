//! Employee session management.
//!
//! Authentication itself is owned by the backend (`/verify-login` and
//! `/google-login`); this module holds the signed-in employee identity in
//! managed state with a single read/write/clear lifecycle, and mirrors it
//! to the OS credential store so the session survives an app restart.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Mutex;
use tracing::{info, warn};

use crate::error::{PosError, PosResult};
use crate::storage;

/// The signed-in employee, as returned by the backend's login endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeSession {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub is_manager: bool,
}

impl EmployeeSession {
    /// Parse a login response body. The backend replies with the employee
    /// record on success and `null`/an error object otherwise.
    pub fn from_login_response(value: &Value) -> PosResult<Self> {
        if value.is_null() {
            return Err(PosError::auth("Invalid login credentials"));
        }
        let id = value
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| PosError::auth("Login response is missing the employee id"))?;
        Ok(Self {
            id,
            first_name: value
                .get("first_name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            last_name: value
                .get("last_name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            is_manager: value
                .get("is_manager")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Tauri managed state for the employee session.
pub struct SessionState {
    current: Mutex<Option<EmployeeSession>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    /// Restore a persisted session from the credential store, if any.
    pub fn hydrate_from_storage(&self) {
        if let Some(raw) = storage::get_credential(storage::KEY_EMPLOYEE_SESSION) {
            match serde_json::from_str::<EmployeeSession>(&raw) {
                Ok(session) => {
                    info!(employee_id = session.id, "restored employee session");
                    *self.current.lock().unwrap() = Some(session);
                }
                Err(e) => {
                    warn!(error = %e, "stored employee session is unreadable, discarding");
                    let _ = storage::delete_credential(storage::KEY_EMPLOYEE_SESSION);
                }
            }
        }
    }

    /// Install a session in memory only.
    pub fn set_current(&self, session: EmployeeSession) {
        *self.current.lock().unwrap() = Some(session);
    }

    /// Install a session and mirror it to the credential store.
    pub fn sign_in(&self, session: EmployeeSession) -> Result<(), String> {
        let raw = serde_json::to_string(&session).map_err(|e| e.to_string())?;
        storage::set_credential(storage::KEY_EMPLOYEE_SESSION, &raw)?;
        info!(employee_id = session.id, "employee signed in");
        self.set_current(session);
        Ok(())
    }

    pub fn current(&self) -> Option<EmployeeSession> {
        self.current.lock().unwrap().clone()
    }

    pub fn is_manager(&self) -> bool {
        self.current()
            .map(|session| session.is_manager)
            .unwrap_or(false)
    }

    /// Clear the session everywhere.
    pub fn sign_out(&self) {
        if let Some(session) = self.current.lock().unwrap().take() {
            info!(employee_id = session.id, "employee signed out");
        }
        let _ = storage::delete_credential(storage::KEY_EMPLOYEE_SESSION);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Login rejections arrive from the API layer as submission errors carrying
/// the HTTP status; remap the credential-shaped ones to the auth taxonomy.
pub fn map_login_error(err: PosError) -> PosError {
    match err {
        PosError::Submission(msg)
            if msg.contains("HTTP 401") || msg.contains("HTTP 404") || msg.contains("HTTP 400") =>
        {
            PosError::auth("Invalid login credentials")
        }
        other => other,
    }
}
