//! Restaurant backend API client.
//!
//! Provides HTTP communication with the remote backend that owns all
//! business truth: menu items, prices, inventory, employees, orders,
//! translations, and the restock chat endpoint. The frontend never retries
//! or queues — one interaction, one request, one surfaced result.

use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::info;

use crate::error::{PosError, PosResult};

/// Default timeout for API requests (30 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout used specifically for the lightweight connectivity probe.
const CONNECTIVITY_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// URL normalisation
// ---------------------------------------------------------------------------

/// Normalise the backend base URL:
/// - strip trailing slashes
/// - ensure a scheme is present (https, or http for localhost)
pub fn normalize_backend_url(url: &str) -> String {
    let mut url = url.trim().to_string();

    // Ensure scheme
    if !url.starts_with("http://") && !url.starts_with("https://") {
        if url.starts_with("localhost") || url.starts_with("127.0.0.1") {
            url = format!("http://{url}");
        } else {
            url = format!("https://{url}");
        }
    }

    // Strip trailing slashes
    while url.ends_with('/') {
        url.pop();
    }

    url
}

/// Reject paths that would escape the backend surface.
pub fn validate_backend_path(path: &str) -> PosResult<()> {
    if path.trim().is_empty() {
        return Err(PosError::validation("Missing API path"));
    }
    if path.contains("..") {
        return Err(PosError::validation("Invalid API path"));
    }
    if path.starts_with("http://") || path.starts_with("https://") {
        return Err(PosError::validation("Absolute URLs are not allowed"));
    }
    if !path.starts_with('/') {
        return Err(PosError::validation("API path must start with '/'"));
    }
    Ok(())
}

fn enc(s: &str) -> String {
    s.replace('%', "%25")
        .replace('&', "%26")
        .replace('=', "%3D")
        .replace(' ', "%20")
        .replace('+', "%2B")
        .replace('?', "%3F")
        .replace('#', "%23")
}

/// Encode one path segment (inventory names may contain spaces).
pub fn encode_path_segment(s: &str) -> String {
    enc(s).replace('/', "%2F")
}

/// Append query parameters to a path. Empty values are skipped.
pub fn build_query(path: &str, params: &[(&str, String)]) -> String {
    let pairs: Vec<String> = params
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{}={}", enc(k), enc(v)))
        .collect();
    if pairs.is_empty() {
        return path.to_string();
    }
    format!("{path}?{}", pairs.join("&"))
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Convert a `reqwest::Error` into a user-friendly message.
fn friendly_error(url: &str, err: &reqwest::Error) -> String {
    if err.is_connect() {
        return format!("Cannot reach the restaurant backend at {url}");
    }
    if err.is_timeout() {
        return format!("Connection to {url} timed out");
    }
    if err.is_builder() {
        return format!("Invalid backend URL: {url}");
    }
    format!("Network error communicating with {url}: {err}")
}

/// Convert an HTTP status code into a user-friendly message.
fn status_error(status: StatusCode) -> String {
    match status.as_u16() {
        401 => "Request was not authorized by the backend".to_string(),
        404 => "Backend endpoint not found".to_string(),
        s if s >= 500 => format!("Backend server error (HTTP {s})"),
        s => format!("Unexpected response from the backend (HTTP {s})"),
    }
}

// ---------------------------------------------------------------------------
// Connectivity probe
// ---------------------------------------------------------------------------

/// Result of a connectivity probe.
#[derive(serde::Serialize)]
pub struct ConnectivityResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Probe the backend with its lightweight `/db-connect` health check.
pub async fn test_connectivity(backend_url: &str) -> ConnectivityResult {
    let base = normalize_backend_url(backend_url);
    let health_url = format!("{base}/db-connect");

    let client = match Client::builder().timeout(CONNECTIVITY_TIMEOUT).build() {
        Ok(c) => c,
        Err(e) => {
            return ConnectivityResult {
                success: false,
                latency_ms: None,
                error: Some(format!("Failed to create HTTP client: {e}")),
            };
        }
    };

    let start = Instant::now();

    let resp = match client.get(&health_url).send().await {
        Ok(r) => r,
        Err(e) => {
            return ConnectivityResult {
                success: false,
                latency_ms: None,
                error: Some(friendly_error(&base, &e)),
            };
        }
    };

    let latency = start.elapsed().as_millis() as u64;
    let status = resp.status();

    if status.is_success() {
        info!(latency_ms = latency, "backend connectivity probe passed");
        ConnectivityResult {
            success: true,
            latency_ms: Some(latency),
            error: None,
        }
    } else {
        ConnectivityResult {
            success: false,
            latency_ms: Some(latency),
            error: Some(status_error(status)),
        }
    }
}

// ---------------------------------------------------------------------------
// Generic fetch
// ---------------------------------------------------------------------------

/// Perform an HTTP request against the backend.
///
/// `path` includes the leading slash, e.g. `/menu-items`.
/// `method` is an HTTP verb string: "GET", "POST", "PUT", "DELETE".
///
/// Transport failures and non-2xx statuses both map to
/// [`PosError::Submission`] with a message suitable for inline display; the
/// caller's in-progress state is expected to survive the failure.
pub async fn fetch_from_backend(
    backend_url: &str,
    path: &str,
    method: &str,
    body: Option<Value>,
) -> PosResult<Value> {
    let base = normalize_backend_url(backend_url);
    let full_url = format!("{base}{path}");

    let http_method: Method = method
        .to_uppercase()
        .parse()
        .map_err(|_| PosError::validation(format!("Invalid HTTP method: {method}")))?;

    let client = Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .map_err(|e| PosError::submission(format!("Failed to create HTTP client: {e}")))?;

    let mut req = client
        .request(http_method, &full_url)
        .header("Content-Type", "application/json");
    if let Some(b) = body {
        req = req.json(&b);
    }

    let resp = req
        .send()
        .await
        .map_err(|e| PosError::submission(friendly_error(&base, &e)))?;
    let status = resp.status();

    if !status.is_success() {
        // Preserve the backend's own message when it sent one.
        let body_text = resp.text().await.unwrap_or_default();
        let detail = if let Ok(json) = serde_json::from_str::<Value>(&body_text) {
            json.get("message")
                .or_else(|| json.get("error"))
                .and_then(Value::as_str)
                .map(|s| format!("{s} (HTTP {})", status.as_u16()))
                .unwrap_or_else(|| format!("{} (HTTP {})", status_error(status), status.as_u16()))
        } else if !body_text.trim().is_empty() {
            format!(
                "{} (HTTP {}): {}",
                status_error(status),
                status.as_u16(),
                body_text.trim()
            )
        } else {
            format!("{} (HTTP {})", status_error(status), status.as_u16())
        };
        return Err(PosError::submission(detail));
    }

    // Return the JSON body, or null for empty 204 responses.
    let body_text = resp.text().await.unwrap_or_default();
    if body_text.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body_text)
        .map_err(|e| PosError::submission(format!("Invalid JSON from the backend: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_scheme_and_strips_slashes() {
        assert_eq!(
            normalize_backend_url("pos-backend.example.com/"),
            "https://pos-backend.example.com"
        );
        assert_eq!(
            normalize_backend_url("localhost:5000"),
            "http://localhost:5000"
        );
        assert_eq!(
            normalize_backend_url("https://api.example.com///"),
            "https://api.example.com"
        );
    }

    #[test]
    fn validate_backend_path_rejects_escapes() {
        assert!(validate_backend_path("/menu-items").is_ok());
        assert!(validate_backend_path("").is_err());
        assert!(validate_backend_path("menu-items").is_err());
        assert!(validate_backend_path("/a/../b").is_err());
        assert!(validate_backend_path("https://elsewhere.example.com/x").is_err());
    }

    #[test]
    fn path_segments_are_encoded() {
        assert_eq!(encode_path_segment("Soy Sauce"), "Soy%20Sauce");
        assert_eq!(encode_path_segment("50/50 Mix"), "50%2F50%20Mix");
    }

    #[test]
    fn build_query_encodes_and_skips_empty() {
        let path = build_query(
            "/orders",
            &[
                ("page", "0".to_string()),
                ("customer", "Ann Lee".to_string()),
                ("price", String::new()),
            ],
        );
        assert_eq!(path, "/orders?page=0&customer=Ann%20Lee");
        assert_eq!(build_query("/orders", &[]), "/orders");
    }
}
