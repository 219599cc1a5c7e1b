//! Wok POS - Tauri v2 Backend
//!
//! This module registers all IPC command handlers the webview frontend
//! calls via `@tauri-apps/api/core::invoke()`. Every piece of business
//! truth (pricing, inventory, authentication, persistence, translation,
//! restock suggestions) lives behind the remote restaurant backend; this
//! layer holds screen state, validates input, and relays HTTP calls.

use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod access;
mod api;
mod catalog;
mod commands;
mod composer;
mod db;
mod error;
mod kiosk;
mod logs;
mod nav;
mod restock;
mod session;
mod storage;

use error::{PosError, PosResult};

pub(crate) fn value_str(v: &serde_json::Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(s) = v.get(*key).and_then(|x| x.as_str()) {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

pub(crate) fn value_i64(v: &serde_json::Value, keys: &[&str]) -> Option<i64> {
    for key in keys {
        if let Some(n) = v.get(*key).and_then(|x| x.as_i64()) {
            return Some(n);
        }
    }
    None
}

pub(crate) fn value_u64(v: &serde_json::Value, keys: &[&str]) -> Option<u64> {
    for key in keys {
        if let Some(n) = v.get(*key).and_then(|x| x.as_u64()) {
            return Some(n);
        }
    }
    None
}

/// Perform a request against the configured backend.
pub(crate) async fn backend_fetch(
    path: &str,
    method: &str,
    body: Option<serde_json::Value>,
) -> PosResult<serde_json::Value> {
    api::validate_backend_path(path)?;
    let backend_url = storage::get_backend_url()
        .ok_or_else(|| PosError::validation("Backend not configured: missing backend URL"))?;
    api::fetch_from_backend(&backend_url, path, method, body).await
}

// ============================================================================
// App entry point
// ============================================================================

pub fn run() {
    // Initialize structured logging (console + rolling file)
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wok_pos_lib=debug"));

    // Prune old log files before setting up the appender
    logs::prune_old_logs();

    // Rolling file appender: creates daily log files in the logs directory
    let log_dir = logs::get_log_dir();
    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&log_dir, "pos");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);
    let console_layer = fmt::layer().with_target(true);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    // Keep the guard alive for the lifetime of the app — dropping it flushes
    // logs. We leak it intentionally since the app runs until process exit.
    std::mem::forget(_guard);

    info!("Starting Wok POS v{}", env!("CARGO_PKG_VERSION"));

    tauri::Builder::default()
        .setup(|app| {
            use tauri::Manager;

            let app_data_dir = app
                .path()
                .app_data_dir()
                .expect("Failed to get app data dir");

            // Preference database for Tauri commands
            let db_state = db::init(&app_data_dir).expect("Failed to initialize database");
            app.manage(db_state);

            // Employee session, restored from the credential store if present
            let session_state = session::SessionState::new();
            session_state.hydrate_from_storage();
            app.manage(session_state);

            // Screen state
            app.manage(composer::ComposerState::new());
            app.manage(kiosk::KioskState::new());
            app.manage(restock::RestockState::new());
            app.manage(commands::reports::ReportState::default());

            info!("Database, session, and screen state registered");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Session / navigation
            commands::session::session_login,
            commands::session::session_google_login,
            commands::session::session_logout,
            commands::session::session_get_current,
            commands::session::session_is_manager,
            commands::session::nav_get_routes,
            commands::session::nav_check_access,
            // Employee order entry
            commands::composer::composer_load,
            commands::composer::composer_get_state,
            commands::composer::composer_toggle_meal,
            commands::composer::composer_toggle_item,
            commands::composer::composer_clear_selection,
            commands::composer::composer_add_line,
            commands::composer::composer_delete_line,
            commands::composer::composer_set_customer_name,
            commands::composer::composer_submit,
            // Customer kiosk
            commands::kiosk::kiosk_load,
            commands::kiosk::kiosk_get_catalog,
            commands::kiosk::kiosk_get_cart,
            commands::kiosk::kiosk_start_combo,
            commands::kiosk::kiosk_cancel_combo,
            commands::kiosk::kiosk_select_side,
            commands::kiosk::kiosk_select_entree,
            commands::kiosk::kiosk_confirm_combo,
            commands::kiosk::kiosk_add_item,
            commands::kiosk::kiosk_remove_line,
            commands::kiosk::kiosk_checkout_note,
            commands::kiosk::kiosk_checkout,
            // Management screens
            commands::manage::inventory_get_all,
            commands::manage::inventory_add,
            commands::manage::inventory_update,
            commands::manage::inventory_delete,
            commands::manage::employee_get_all,
            commands::manage::employee_add,
            commands::manage::employee_update,
            commands::manage::employee_delete,
            commands::manage::price_get_all,
            commands::manage::price_modify,
            commands::manage::menu_item_add,
            commands::manage::menu_items_get,
            commands::manage::menu_board_get,
            // Order history / reports
            commands::reports::order_history_get,
            commands::reports::order_history_details,
            commands::reports::report_sales_trends,
            commands::reports::report_x,
            commands::reports::report_z,
            commands::reports::report_product_usage,
            // Restock assistant
            commands::restock::restock_load,
            commands::restock::restock_get_state,
            commands::restock::restock_send,
            commands::restock::restock_apply,
            // Settings / accessibility / translation
            commands::settings::settings_is_configured,
            commands::settings::settings_get_backend_url,
            commands::settings::settings_set_backend_url,
            commands::settings::settings_factory_reset,
            commands::settings::backend_test_connection,
            commands::settings::access_get_prefs,
            commands::settings::access_set_text_size,
            commands::settings::access_set_magnifier,
            commands::settings::access_set_contrast,
            commands::settings::access_overlay_state,
            commands::settings::translation_get,
            commands::settings::app_get_version,
        ])
        .run(tauri::generate_context!())
        .expect("error while running Wok POS");
}
