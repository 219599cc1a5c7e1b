//! Secure client-side storage using the OS credential store.
//!
//! On Windows this uses DPAPI (via the `keyring` crate), on macOS Keychain,
//! and on Linux the Secret Service API. Holds the configured backend URL and
//! the signed-in employee identity so both survive an app restart without a
//! flat file on disk.

use keyring::Entry;
use tracing::{info, warn};

const SERVICE_NAME: &str = "wok-pos";

// Credential keys
pub const KEY_BACKEND_URL: &str = "backend_url";
pub const KEY_EMPLOYEE_SESSION: &str = "employee_session";

/// All credential keys managed by this module.
const ALL_KEYS: &[&str] = &[KEY_BACKEND_URL, KEY_EMPLOYEE_SESSION];

// ---------------------------------------------------------------------------
// Low-level helpers
// ---------------------------------------------------------------------------

/// Retrieve a single credential from the OS keyring. Returns `None` when the
/// entry does not exist (or the platform returns a "not found" error).
pub fn get_credential(key: &str) -> Option<String> {
    let entry = match Entry::new(SERVICE_NAME, key) {
        Ok(e) => e,
        Err(e) => {
            warn!(key, error = %e, "keyring: failed to create entry");
            return None;
        }
    };
    match entry.get_password() {
        Ok(pw) => Some(pw),
        Err(keyring::Error::NoEntry) => None,
        Err(e) => {
            warn!(key, error = %e, "keyring: failed to read credential");
            None
        }
    }
}

/// Store a credential in the OS keyring.
pub fn set_credential(key: &str, value: &str) -> Result<(), String> {
    let entry = Entry::new(SERVICE_NAME, key).map_err(|e| e.to_string())?;
    entry.set_password(value).map_err(|e| e.to_string())?;
    Ok(())
}

/// Delete a credential from the OS keyring. Silently succeeds if the entry
/// does not exist.
pub fn delete_credential(key: &str) -> Result<(), String> {
    let entry = Entry::new(SERVICE_NAME, key).map_err(|e| e.to_string())?;
    match entry.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

pub fn has_credential(key: &str) -> bool {
    get_credential(key).is_some()
}

// ---------------------------------------------------------------------------
// High-level API
// ---------------------------------------------------------------------------

/// The app is considered configured once a backend URL has been stored.
pub fn is_configured() -> bool {
    has_credential(KEY_BACKEND_URL)
}

/// Read the configured backend base URL.
pub fn get_backend_url() -> Option<String> {
    get_credential(KEY_BACKEND_URL).filter(|v| !v.trim().is_empty())
}

/// Store the backend base URL (already normalised by the caller).
pub fn set_backend_url(url: &str) -> Result<(), String> {
    set_credential(KEY_BACKEND_URL, url.trim())
}

/// Delete every stored credential (factory reset).
pub fn factory_reset() -> Result<(), String> {
    info!("performing factory reset - deleting all credentials");
    for key in ALL_KEYS {
        delete_credential(key)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // These touch the process-global OS keyring, so they are serialized and
    // use a dedicated key that nothing else reads.
    const TEST_KEY: &str = "test_scratch";

    #[test]
    #[serial]
    fn set_get_delete_roundtrip() {
        if set_credential(TEST_KEY, "value-1").is_err() {
            // No keyring backend on this machine (headless CI).
            return;
        }
        assert_eq!(get_credential(TEST_KEY).as_deref(), Some("value-1"));

        set_credential(TEST_KEY, "value-2").expect("overwrite");
        assert_eq!(get_credential(TEST_KEY).as_deref(), Some("value-2"));

        delete_credential(TEST_KEY).expect("delete");
        assert_eq!(get_credential(TEST_KEY), None);
    }

    #[test]
    #[serial]
    fn delete_missing_entry_is_ok() {
        if delete_credential(TEST_KEY).is_err() {
            // No keyring backend on this machine (headless CI).
            return;
        }
        assert!(delete_credential(TEST_KEY).is_ok());
    }
}
