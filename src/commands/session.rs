//! Login, session lifecycle, and route guarding.

use serde_json::Value;
use zeroize::Zeroize;

use crate::nav;
use crate::session::{self, EmployeeSession, SessionState};
use crate::value_str;

fn parse_login_payload(arg0: Option<Value>) -> Result<(String, String), String> {
    let payload = arg0.ok_or("Missing login payload")?;
    let email = value_str(&payload, &["email"]).ok_or("Email is required")?;
    let password = value_str(&payload, &["password"]).ok_or("Password is required")?;
    Ok((email, password))
}

fn parse_token_payload(arg0: Option<Value>) -> Result<String, String> {
    match arg0 {
        Some(Value::String(token)) if !token.trim().is_empty() => Ok(token),
        Some(payload) => value_str(&payload, &["token"]).ok_or("Missing token".into()),
        None => Err("Missing token".into()),
    }
}

/// Handle email/password login against the backend.
#[tauri::command]
pub async fn session_login(
    arg0: Option<Value>,
    session_state: tauri::State<'_, SessionState>,
) -> Result<Value, String> {
    let (email, mut password) = parse_login_payload(arg0)?;
    let body = serde_json::json!({ "email": email, "password": password });
    let result = crate::backend_fetch("/verify-login", "POST", Some(body)).await;
    password.zeroize();

    let resp = result
        .map_err(session::map_login_error)
        .map_err(|e| e.to_string())?;
    let employee = EmployeeSession::from_login_response(&resp).map_err(|e| e.to_string())?;
    session_state.sign_in(employee.clone())?;
    Ok(serde_json::json!({ "success": true, "user": employee }))
}

/// Handle OAuth-identity login: the frontend obtained an ID token, the
/// backend resolves it to an employee.
#[tauri::command]
pub async fn session_google_login(
    arg0: Option<Value>,
    session_state: tauri::State<'_, SessionState>,
) -> Result<Value, String> {
    let token = parse_token_payload(arg0)?;
    let body = serde_json::json!({ "token": token });
    let resp = crate::backend_fetch("/google-login", "POST", Some(body))
        .await
        .map_err(session::map_login_error)
        .map_err(|e| e.to_string())?;
    let employee = EmployeeSession::from_login_response(&resp).map_err(|e| e.to_string())?;
    session_state.sign_in(employee.clone())?;
    Ok(serde_json::json!({ "success": true, "user": employee }))
}

#[tauri::command]
pub async fn session_logout(session_state: tauri::State<'_, SessionState>) -> Result<(), String> {
    session_state.sign_out();
    Ok(())
}

#[tauri::command]
pub async fn session_get_current(
    session_state: tauri::State<'_, SessionState>,
) -> Result<Value, String> {
    Ok(match session_state.current() {
        Some(employee) => serde_json::to_value(employee).map_err(|e| e.to_string())?,
        None => Value::Null,
    })
}

#[tauri::command]
pub async fn session_is_manager(
    session_state: tauri::State<'_, SessionState>,
) -> Result<bool, String> {
    Ok(session_state.is_manager())
}

// -- Navigation shell --------------------------------------------------------

#[tauri::command]
pub async fn nav_get_routes() -> Result<Value, String> {
    serde_json::to_value(nav::ROUTES).map_err(|e| e.to_string())
}

/// Route guard: where should a visit to `path` land?
#[tauri::command]
pub async fn nav_check_access(
    arg0: Option<Value>,
    session_state: tauri::State<'_, SessionState>,
) -> Result<Value, String> {
    let path = match arg0 {
        Some(Value::String(path)) => path,
        Some(payload) => value_str(&payload, &["path"]).ok_or("Missing path")?,
        None => return Err("Missing path".into()),
    };
    let session = session_state.current();
    serde_json::to_value(nav::check_access(&path, session.as_ref())).map_err(|e| e.to_string())
}
