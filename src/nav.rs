//! Navigation shell: the route table and its access rules.
//!
//! The webview owns actual navigation; this module is the single source of
//! truth for which screens exist, which require a session, and where an
//! unauthorized visit should land instead.

use serde::Serialize;

use crate::session::EmployeeSession;

/// One entry in the route table.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Route {
    pub path: &'static str,
    pub screen: &'static str,
    pub protected: bool,
}

/// Every screen the app serves, public first.
pub const ROUTES: &[Route] = &[
    Route { path: "/", screen: "menu-board", protected: false },
    Route { path: "/customer", screen: "customer-order", protected: false },
    Route { path: "/choose-user", screen: "choose-user", protected: false },
    Route { path: "/login", screen: "login", protected: false },
    Route { path: "/submit-order", screen: "submit-order", protected: false },
    Route { path: "/employee-order", screen: "employee-order", protected: true },
    Route { path: "/manage-inventory", screen: "inventory", protected: true },
    Route { path: "/manage-employees", screen: "employees", protected: true },
    Route { path: "/manage-prices", screen: "prices", protected: true },
    Route { path: "/manage-menu", screen: "menu-management", protected: true },
    Route { path: "/order-history", screen: "order-history", protected: true },
    Route { path: "/reports", screen: "reports", protected: true },
    Route { path: "/restock", screen: "restock", protected: true },
    Route { path: "/menu-board-noninteractive", screen: "menu-board-static", protected: true },
];

/// Customer-facing path prefixes; the accessibility overlays are active only
/// while the current route starts with one of these.
pub const CUSTOMER_ROUTES: &[&str] = &["/customer", "/checkout", "/submit-order", "/combo-selection"];

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Access {
    Granted,
    /// Not signed in, or the path does not exist.
    Redirect { to: &'static str },
}

/// Apply the route guard: protected screens need a session, and every
/// protected screen except the employee ordering screen needs a manager.
pub fn check_access(path: &str, session: Option<&EmployeeSession>) -> Access {
    let route = match ROUTES.iter().find(|r| r.path == path) {
        Some(route) => route,
        None => return Access::Redirect { to: "/" },
    };
    if !route.protected {
        return Access::Granted;
    }
    let session = match session {
        Some(session) => session,
        None => return Access::Redirect { to: "/" },
    };
    if route.path == "/employee-order" || session.is_manager {
        Access::Granted
    } else {
        Access::Redirect { to: "/employee-order" }
    }
}

/// True when `path` is customer-facing (overlay allow-list).
pub fn is_customer_route(path: &str) -> bool {
    CUSTOMER_ROUTES.iter().any(|route| path.starts_with(route))
}
