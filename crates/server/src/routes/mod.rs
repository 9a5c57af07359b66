//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Role-based landing dispatch
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (pings the backend)
//!
//! # Auth
//! GET  /login                   - Login page
//! POST /login                   - Login action (identifier only)
//! POST /logout                  - Logout action
//!
//! # Employee ordering
//! GET  /menu                    - Week strip + day menu + order form
//! POST /menu/order              - Place an order
//! POST /menu/issue              - Report a menu issue
//! GET  /menu/orders             - Own order history
//!
//! # Kitchen
//! GET  /kitchen                 - Daily menu composer (+ templates, AI ideas)
//! POST /kitchen/menu            - Publish/replace a day's menu
//! POST /kitchen/menu/copy       - Copy a day's menu to another date
//! POST /kitchen/template/save   - Snapshot a day as a template
//! POST /kitchen/template/apply  - Apply a template to a date
//! POST /kitchen/template/delete - Delete a template
//! POST /kitchen/ideas           - Generate AI menu ideas
//! POST /kitchen/ideas/accept    - Accept a suggestion into the catalog
//! GET  /kitchen/items           - Master catalog
//! POST /kitchen/items           - Create/update a catalog item
//! POST /kitchen/items/toggle    - Toggle availability
//! POST /kitchen/items/delete    - Delete a catalog item
//! GET  /kitchen/orders          - Orders for a date (fulfillment)
//! POST /kitchen/orders/status   - Advance an order's status
//! GET  /kitchen/issues          - Issue queue
//! POST /kitchen/issues/resolve  - Resolve an issue (optional chef response)
//! POST /kitchen/issues/read     - Mark an issue read
//! GET  /kitchen/feedback        - Feedback board
//! POST /kitchen/feedback        - Post a comment
//! POST /kitchen/feedback/respond   - Respond on a thread
//! POST /kitchen/feedback/summarize - AI summary of the board
//!
//! # Admin
//! GET  /admin/users             - User management
//! POST /admin/users             - Create/update a user
//! POST /admin/users/lock        - Lock/unlock an account
//! POST /admin/users/delete      - Delete a user
//! GET  /admin/departments       - Department management
//! POST /admin/departments       - Create a department
//! POST /admin/departments/rename - Rename
//! POST /admin/departments/delete - Delete
//! GET  /admin/companies         - Company management
//! POST /admin/companies         - Create/update a company
//! POST /admin/companies/delete  - Delete
//! GET  /admin/settings          - Tenant settings editor
//! POST /admin/settings          - Save tenant settings
//!
//! # Reception
//! GET  /reception               - Guest passcode + invitation mail
//! POST /reception/rotate        - Rotate the guest passcode
//! POST /reception/email         - Compose the invitation mailto link
//!
//! # Delivery
//! GET  /delivery                - Today's orders grouped for delivery
//! POST /delivery/deliver        - Mark a group's orders delivered
//!
//! # Guest portal (no login)
//! GET  /guest                   - AUTH step
//! POST /guest/auth              - Validate passcode, create guest session
//! GET  /guest/menu              - MENU step (today's menu)
//! POST /guest/order             - Place the guest order
//! GET  /guest/success           - SUCCESS step
//! ```

pub mod admin;
pub mod auth;
pub mod delivery;
pub mod guest;
pub mod home;
pub mod kitchen;
pub mod menu;
pub mod reception;

use axum::{
    Router,
    routing::{get, post},
};

use lunchline_core::Role;

use crate::models::Principal;
use crate::state::AppState;

/// One entry in the navigation frame.
#[derive(Debug, Clone)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
}

/// Context for the shared navigation partial.
#[derive(Debug, Clone)]
pub struct NavContext {
    pub display_name: String,
    pub role: String,
    pub company_name: String,
    pub links: Vec<NavLink>,
}

/// The landing view for each role.
///
/// Exhaustive on purpose: adding a role without deciding its landing view
/// is a compile error, not a fallback.
#[must_use]
pub const fn landing(role: Role) -> &'static str {
    match role {
        Role::Employee => "/menu",
        Role::Kitchen => "/kitchen",
        Role::Admin => "/admin/users",
        Role::Reception => "/reception",
        Role::Delivery => "/delivery",
        Role::Guest => "/guest/menu",
    }
}

/// The navigation link set for each role, exhaustively.
#[must_use]
pub fn nav_links(role: Role) -> Vec<NavLink> {
    const MENU: NavLink = NavLink {
        href: "/menu",
        label: "Menu",
    };
    const MY_ORDERS: NavLink = NavLink {
        href: "/menu/orders",
        label: "My orders",
    };
    const KITCHEN: NavLink = NavLink {
        href: "/kitchen",
        label: "Compose",
    };
    const ITEMS: NavLink = NavLink {
        href: "/kitchen/items",
        label: "Catalog",
    };
    const FULFILL: NavLink = NavLink {
        href: "/kitchen/orders",
        label: "Fulfillment",
    };
    const ISSUES: NavLink = NavLink {
        href: "/kitchen/issues",
        label: "Issues",
    };
    const FEEDBACK: NavLink = NavLink {
        href: "/kitchen/feedback",
        label: "Feedback",
    };
    const USERS: NavLink = NavLink {
        href: "/admin/users",
        label: "Users",
    };
    const DEPARTMENTS: NavLink = NavLink {
        href: "/admin/departments",
        label: "Departments",
    };
    const COMPANIES: NavLink = NavLink {
        href: "/admin/companies",
        label: "Companies",
    };
    const SETTINGS: NavLink = NavLink {
        href: "/admin/settings",
        label: "Settings",
    };
    const RECEPTION: NavLink = NavLink {
        href: "/reception",
        label: "Guests",
    };
    const DELIVERY: NavLink = NavLink {
        href: "/delivery",
        label: "Delivery",
    };

    match role {
        Role::Employee => vec![MENU, MY_ORDERS],
        Role::Kitchen => vec![MENU, MY_ORDERS, KITCHEN, ITEMS, FULFILL, ISSUES, FEEDBACK],
        Role::Admin => vec![
            MENU,
            KITCHEN,
            ITEMS,
            FULFILL,
            ISSUES,
            FEEDBACK,
            USERS,
            DEPARTMENTS,
            COMPANIES,
            SETTINGS,
            RECEPTION,
            DELIVERY,
        ],
        Role::Reception => vec![MENU, MY_ORDERS, RECEPTION],
        Role::Delivery => vec![MENU, MY_ORDERS, DELIVERY],
        Role::Guest => vec![],
    }
}

/// Build the navigation context for a page render.
pub(crate) async fn nav(state: &AppState, principal: &Principal) -> NavContext {
    let settings = state.store().settings().await;
    NavContext {
        display_name: principal.display_name.clone(),
        role: principal.role.to_string(),
        company_name: settings.company_name,
        links: nav_links(principal.role),
    }
}

// =============================================================================
// Raw-form helpers (multi-value fields)
// =============================================================================

/// Decode a urlencoded form body into key/value pairs.
///
/// `axum::Form` cannot represent repeated keys (checkbox groups), so the
/// multi-select handlers take `RawForm` and decode here.
pub(crate) fn form_pairs(body: &[u8]) -> Vec<(String, String)> {
    url::form_urlencoded::parse(body).into_owned().collect()
}

/// All values for a repeated key.
pub(crate) fn form_values<'a>(pairs: &'a [(String, String)], key: &str) -> Vec<&'a str> {
    pairs
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .collect()
}

/// The first value for a key.
pub(crate) fn form_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

// =============================================================================
// Routers
// =============================================================================

/// Create the employee menu routes router.
pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(menu::week))
        .route("/order", post(menu::place_order))
        .route("/issue", post(menu::report_issue))
        .route("/orders", get(menu::my_orders))
}

/// Create the kitchen routes router.
pub fn kitchen_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(kitchen::composer))
        .route("/menu", post(kitchen::publish_menu))
        .route("/menu/copy", post(kitchen::copy_menu))
        .route("/template/save", post(kitchen::save_template))
        .route("/template/apply", post(kitchen::apply_template))
        .route("/template/delete", post(kitchen::delete_template))
        .route("/ideas", post(kitchen::generate_ideas))
        .route("/ideas/accept", post(kitchen::accept_idea))
        .route("/items", get(kitchen::items).post(kitchen::upsert_item))
        .route("/items/toggle", post(kitchen::toggle_item))
        .route("/items/delete", post(kitchen::delete_item))
        .route("/orders", get(kitchen::orders))
        .route("/orders/status", post(kitchen::advance_order))
        .route("/issues", get(kitchen::issues))
        .route("/issues/resolve", post(kitchen::resolve_issue))
        .route("/issues/read", post(kitchen::mark_issue_read))
        .route("/feedback", get(kitchen::feedback).post(kitchen::post_comment))
        .route("/feedback/respond", post(kitchen::respond_comment))
        .route("/feedback/summarize", post(kitchen::summarize_feedback))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::users).post(admin::upsert_user))
        .route("/users/lock", post(admin::lock_user))
        .route("/users/delete", post(admin::delete_user))
        .route(
            "/departments",
            get(admin::departments).post(admin::create_department),
        )
        .route("/departments/rename", post(admin::rename_department))
        .route("/departments/delete", post(admin::delete_department))
        .route(
            "/companies",
            get(admin::companies).post(admin::upsert_company),
        )
        .route("/companies/delete", post(admin::delete_company))
        .route("/settings", get(admin::settings).post(admin::save_settings))
}

/// Create the reception routes router.
pub fn reception_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(reception::index))
        .route("/rotate", post(reception::rotate_code))
        .route("/email", post(reception::compose_email))
}

/// Create the delivery routes router.
pub fn delivery_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(delivery::index))
        .route("/deliver", post(delivery::deliver_group))
}

/// Create the guest portal router.
pub fn guest_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(guest::auth_page))
        .route("/auth", post(guest::authenticate))
        .route("/menu", get(guest::menu_page))
        .route("/order", post(guest::place_order))
        .route("/success", get(guest::success))
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Role-based landing dispatch
        .route("/", get(home::home))
        // Auth
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        // Employee ordering
        .nest("/menu", menu_routes())
        // Kitchen
        .nest("/kitchen", kitchen_routes())
        // Admin
        .nest("/admin", admin_routes())
        // Reception
        .nest("/reception", reception_routes())
        // Delivery
        .nest("/delivery", delivery_routes())
        // Guest portal
        .nest("/guest", guest_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_covers_every_role() {
        for role in [
            Role::Employee,
            Role::Kitchen,
            Role::Admin,
            Role::Reception,
            Role::Delivery,
            Role::Guest,
        ] {
            assert!(!landing(role).is_empty());
        }
    }

    #[test]
    fn test_guest_has_no_staff_nav() {
        assert!(nav_links(Role::Guest).is_empty());
        assert!(!nav_links(Role::Admin).is_empty());
    }

    #[test]
    fn test_form_helpers() {
        let pairs = form_pairs(b"items=1&items=2&date=2025-03-10&notes=hi%20there");
        assert_eq!(form_values(&pairs, "items"), vec!["1", "2"]);
        assert_eq!(form_value(&pairs, "date"), Some("2025-03-10"));
        assert_eq!(form_value(&pairs, "notes"), Some("hi there"));
        assert_eq!(form_value(&pairs, "missing"), None);
    }
}
