//! Accessibility preferences and overlay rendering state.
//!
//! Three independent preferences (text-size multiplier, magnifier, soft
//! contrast) persisted in the local settings database: read at mount,
//! written on toggle, last write wins. Instead of manipulating the document
//! directly, the Rust side maps (preferences, current route) to a
//! declarative overlay state the frontend renders.

use serde::Serialize;

use crate::db::{self, DbState};
use crate::error::{PosError, PosResult};
use crate::nav;

const CATEGORY: &str = "accessibility";
const KEY_TEXT_SIZE: &str = "text_size_multiplier";
const KEY_MAGNIFIER: &str = "magnifier_active";
const KEY_CONTRAST: &str = "soft_contrast";

/// The three text-size steps the controls offer.
pub const TEXT_SIZE_CHOICES: &[&str] = &["0.8", "1", "1.2"];

/// Magnifier lens zoom factor.
pub const MAGNIFIER_ZOOM: f64 = 1.5;
/// Magnifier lens diameter in pixels.
pub const MAGNIFIER_LENS_PX: u32 = 200;

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessibilityPrefs {
    pub text_size_multiplier: String,
    pub magnifier_active: bool,
    pub soft_contrast: bool,
}

impl Default for AccessibilityPrefs {
    fn default() -> Self {
        Self {
            text_size_multiplier: "1".to_string(),
            magnifier_active: false,
            soft_contrast: false,
        }
    }
}

/// Read the persisted preferences, defaulting each one independently.
pub fn load_prefs(db: &DbState) -> Result<AccessibilityPrefs, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;
    let defaults = AccessibilityPrefs::default();
    Ok(AccessibilityPrefs {
        text_size_multiplier: db::get_setting(&conn, CATEGORY, KEY_TEXT_SIZE)
            .filter(|v| TEXT_SIZE_CHOICES.contains(&v.as_str()))
            .unwrap_or(defaults.text_size_multiplier),
        magnifier_active: db::get_setting(&conn, CATEGORY, KEY_MAGNIFIER)
            .map(|v| v == "true")
            .unwrap_or(defaults.magnifier_active),
        soft_contrast: db::get_setting(&conn, CATEGORY, KEY_CONTRAST)
            .map(|v| v == "true")
            .unwrap_or(defaults.soft_contrast),
    })
}

/// Persist the text-size multiplier. Only the fixed steps are accepted.
pub fn set_text_size(db: &DbState, value: &str) -> PosResult<()> {
    if !TEXT_SIZE_CHOICES.contains(&value) {
        return Err(PosError::validation(format!(
            "Text size must be one of {TEXT_SIZE_CHOICES:?}"
        )));
    }
    let conn = db
        .conn
        .lock()
        .map_err(|e| PosError::validation(e.to_string()))?;
    db::set_setting(&conn, CATEGORY, KEY_TEXT_SIZE, value).map_err(PosError::Validation)
}

pub fn set_magnifier(db: &DbState, active: bool) -> Result<(), String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;
    db::set_setting(&conn, CATEGORY, KEY_MAGNIFIER, if active { "true" } else { "false" })
}

pub fn set_soft_contrast(db: &DbState, active: bool) -> Result<(), String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;
    db::set_setting(&conn, CATEGORY, KEY_CONTRAST, if active { "true" } else { "false" })
}

// ---------------------------------------------------------------------------
// Overlay state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MagnifierOverlay {
    pub zoom: f64,
    pub lens_px: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContrastOverlay {
    pub background: &'static str,
    pub backdrop_filter: &'static str,
}

/// What the frontend should render right now. `None` fields mean the
/// overlay is inactive on this route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayState {
    pub text_size_multiplier: String,
    pub magnifier: Option<MagnifierOverlay>,
    pub contrast: Option<ContrastOverlay>,
}

/// Map preferences and the active route to overlay rendering state. All
/// three effects apply only on customer-facing routes.
pub fn overlay_state(prefs: &AccessibilityPrefs, path: &str) -> OverlayState {
    let on_customer_route = nav::is_customer_route(path);
    OverlayState {
        text_size_multiplier: if on_customer_route {
            prefs.text_size_multiplier.clone()
        } else {
            "1".to_string()
        },
        magnifier: (on_customer_route && prefs.magnifier_active).then_some(MagnifierOverlay {
            zoom: MAGNIFIER_ZOOM,
            lens_px: MAGNIFIER_LENS_PX,
        }),
        contrast: (on_customer_route && prefs.soft_contrast).then_some(ContrastOverlay {
            background: "rgba(255, 249, 240, 0.1)",
            backdrop_filter: "brightness(0.95) sepia(0.15)",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefs_roundtrip_with_last_write_wins() {
        let state = db::test_state();
        assert_eq!(load_prefs(&state).unwrap(), AccessibilityPrefs::default());

        set_text_size(&state, "1.2").unwrap();
        set_magnifier(&state, true).unwrap();
        set_soft_contrast(&state, true).unwrap();
        set_soft_contrast(&state, false).unwrap();

        let prefs = load_prefs(&state).unwrap();
        assert_eq!(prefs.text_size_multiplier, "1.2");
        assert!(prefs.magnifier_active);
        assert!(!prefs.soft_contrast);
    }

    #[test]
    fn text_size_is_limited_to_the_fixed_steps() {
        let state = db::test_state();
        let err = set_text_size(&state, "2.5").unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert_eq!(
            load_prefs(&state).unwrap().text_size_multiplier,
            "1",
            "rejected write must not change the stored value"
        );
    }

    #[test]
    fn stored_garbage_falls_back_to_default() {
        let state = db::test_state();
        {
            let conn = state.conn.lock().unwrap();
            db::set_setting(&conn, CATEGORY, KEY_TEXT_SIZE, "huge").unwrap();
        }
        assert_eq!(load_prefs(&state).unwrap().text_size_multiplier, "1");
    }

    #[test]
    fn overlays_apply_only_on_customer_routes() {
        let prefs = AccessibilityPrefs {
            text_size_multiplier: "1.2".into(),
            magnifier_active: true,
            soft_contrast: true,
        };

        let on = overlay_state(&prefs, "/customer");
        assert_eq!(on.text_size_multiplier, "1.2");
        assert_eq!(
            on.magnifier,
            Some(MagnifierOverlay { zoom: 1.5, lens_px: 200 })
        );
        assert!(on.contrast.is_some());

        let off = overlay_state(&prefs, "/manage-inventory");
        assert_eq!(off.text_size_multiplier, "1");
        assert!(off.magnifier.is_none());
        assert!(off.contrast.is_none());
    }
}
