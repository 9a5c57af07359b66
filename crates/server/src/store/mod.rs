//! The application store.
//!
//! Single source of truth for all entity collections. The store is created
//! once in `main`, injected through axum state, and mutated only through
//! the methods here (and in the sibling impl modules) - no ambient global
//! state.
//!
//! # Consistency model
//!
//! Every mutator applies its local update first (under the write lock) and
//! then issues the corresponding remote write as a fire-and-forget spawned
//! task. Remote failures are logged and NOT rolled back locally: the local
//! view may diverge from the backend on write failure, and the next full
//! reload reconciles. There is no queuing, batching, retry, or timeout.
//!
//! Concurrent mutators against the same entity race with last-write-wins
//! semantics, both locally and remotely.
//!
//! # Offline mode
//!
//! When no backend is configured the store runs with empty collections and
//! skips remote writes entirely. Startup logs this as an error but does not
//! halt (tests and local development run this way on purpose).

mod catalog;
mod directory;
mod feedback;
mod menus;
mod orders;

pub use orders::NewOrder;

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use lunchline_core::{CompanyId, UserId};

use crate::backend::BackendClient;
use crate::models::{
    Comment, Company, DailyMenu, Department, GuestIdentity, MasterFoodItem, MenuIssue,
    MenuTemplate, Order, Principal, TenantSettings, User,
};

/// All entity collections, guarded by one lock.
#[derive(Default)]
struct Collections {
    users: Vec<User>,
    companies: Vec<Company>,
    departments: Vec<Department>,
    master_items: Vec<MasterFoodItem>,
    menus: Vec<DailyMenu>,
    templates: Vec<MenuTemplate>,
    orders: Vec<Order>,
    issues: Vec<MenuIssue>,
    comments: Vec<Comment>,
    settings: TenantSettings,
}

/// The application store. See the module docs for the consistency model.
pub struct Store {
    backend: Option<BackendClient>,
    default_company_id: CompanyId,
    loading: AtomicBool,
    inner: RwLock<Collections>,
}

impl Store {
    /// Create a store.
    ///
    /// `backend` is `None` in offline mode; `default_company_id` is the
    /// tenant users fall back to when they carry no company of their own.
    #[must_use]
    pub fn new(backend: Option<BackendClient>, default_company_id: CompanyId) -> Self {
        Self {
            backend,
            default_company_id,
            loading: AtomicBool::new(false),
            inner: RwLock::new(Collections::default()),
        }
    }

    /// Whether the initial load is still in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Relaxed)
    }

    /// Fetch every collection from the backend once.
    ///
    /// Fetches are initiated together and awaited independently; a failed
    /// fetch logs a warning and leaves that collection empty. There is no
    /// retry and no partial-success bookkeeping beyond the logs.
    pub async fn load_initial(&self) {
        let Some(backend) = self.backend.clone() else {
            tracing::error!("no backend configured; store starts empty (offline mode)");
            return;
        };

        self.loading.store(true, Ordering::Relaxed);

        let (
            users,
            companies,
            departments,
            master_items,
            menus,
            templates,
            orders,
            issues,
            comments,
            settings,
        ) = tokio::join!(
            backend.fetch_users(),
            backend.fetch_companies(),
            backend.fetch_departments(),
            backend.fetch_master_items(),
            backend.fetch_menus(),
            backend.fetch_templates(),
            backend.fetch_orders(),
            backend.fetch_issues(),
            backend.fetch_comments(),
            backend.fetch_settings(),
        );

        let mut c = self.inner.write().await;
        c.users = unwrap_or_empty("users", users);
        c.companies = unwrap_or_empty("companies", companies);
        c.departments = unwrap_or_empty("departments", departments);
        c.master_items = unwrap_or_empty("master_food_items", master_items);
        c.menus = unwrap_or_empty("daily_menus", menus);
        c.templates = unwrap_or_empty("menu_templates", templates);
        c.orders = unwrap_or_empty("orders", orders);
        c.issues = unwrap_or_empty("menu_issues", issues);
        c.comments = unwrap_or_empty("comments", comments);
        match settings {
            Ok(Some(s)) => c.settings = s,
            Ok(None) => tracing::warn!("no tenant_settings row; using defaults"),
            Err(e) => tracing::warn!("failed to fetch tenant_settings: {e}"),
        }
        drop(c);

        self.loading.store(false, Ordering::Relaxed);
        tracing::info!("initial load complete");
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Authenticate by identifier alone (username or email).
    ///
    /// Matching is case-insensitive after trimming. Returns `None` when no
    /// account matches or the account is locked; on success the user's
    /// company is resolved, falling back to the default company when the
    /// user has none. No password is involved.
    pub async fn login(&self, identifier: &str) -> Option<Principal> {
        let candidate = identifier.trim();
        if candidate.is_empty() {
            return None;
        }

        let c = self.inner.read().await;
        let user = c.users.iter().find(|u| u.matches_identifier(candidate))?;
        if user.is_locked {
            tracing::warn!(user = %user.username, "login rejected: account locked");
            return None;
        }

        let company_id = user.company_id.unwrap_or(self.default_company_id);
        tracing::info!(user = %user.username, role = %user.role, "login");
        Some(Principal::for_user(
            user.id,
            user.display_name.clone(),
            user.role,
            company_id,
        ))
    }

    /// Synthesize an ephemeral guest principal bound to a chosen company.
    ///
    /// Bypasses the user lookup entirely; the guest exists only in the
    /// session.
    #[must_use]
    pub fn login_as_guest(&self, identity: GuestIdentity, company_id: CompanyId) -> Principal {
        tracing::info!(guest = %identity.name, company = %company_id, "guest login");
        Principal::for_guest(identity, company_id)
    }

    /// The logout reset surface: drops cached menus and orders (only).
    ///
    /// Other collections are deliberately retained - this mirrors the
    /// application's long-standing logout behavior. Both collections are
    /// refetched by the next full load.
    pub async fn clear_session_caches(&self) {
        let mut c = self.inner.write().await;
        c.menus.clear();
        c.orders.clear();
        tracing::debug!("cleared cached menus and orders on logout");
    }

    // =========================================================================
    // Read selectors
    // =========================================================================

    /// Current tenant settings.
    pub async fn settings(&self) -> TenantSettings {
        self.inner.read().await.settings.clone()
    }

    /// All users.
    pub async fn users(&self) -> Vec<User> {
        self.inner.read().await.users.clone()
    }

    /// One user by id.
    pub async fn user(&self, id: UserId) -> Option<User> {
        self.inner.read().await.users.iter().find(|u| u.id == id).cloned()
    }

    /// All companies.
    pub async fn companies(&self) -> Vec<Company> {
        self.inner.read().await.companies.clone()
    }

    /// One company by id.
    pub async fn company(&self, id: CompanyId) -> Option<Company> {
        self.inner
            .read()
            .await
            .companies
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    /// All departments.
    pub async fn departments(&self) -> Vec<Department> {
        self.inner.read().await.departments.clone()
    }

    /// The default company id (fallback tenant).
    #[must_use]
    pub const fn default_company_id(&self) -> CompanyId {
        self.default_company_id
    }

    /// Clone of the backend handle, if one is configured.
    #[must_use]
    pub fn backend(&self) -> Option<BackendClient> {
        self.backend.clone()
    }

    /// Whether a row scoped by `row_company` is visible to `viewer_company`.
    ///
    /// Unscoped rows (no company) belong to every tenant.
    fn scoped_to(row_company: Option<CompanyId>, viewer_company: CompanyId) -> bool {
        row_company.is_none_or(|c| c == viewer_company)
    }
}

fn unwrap_or_empty<T>(
    table: &'static str,
    result: Result<Vec<T>, crate::backend::BackendError>,
) -> Vec<T> {
    match result {
        Ok(rows) => {
            tracing::debug!(table, count = rows.len(), "fetched");
            rows
        }
        Err(e) => {
            tracing::warn!("failed to fetch {table}: {e}");
            Vec::new()
        }
    }
}

/// Allocate a time-derived id (epoch milliseconds), bumped forward past any
/// id already present in the collection.
///
/// Creations landing in the same millisecond would otherwise collide; the
/// backend treats ids as plain keys so the bump is invisible to it.
fn next_time_id<T>(items: &[T], id_of: impl Fn(&T) -> i64) -> i64 {
    let mut candidate = chrono::Utc::now().timestamp_millis();
    while items.iter().any(|item| id_of(item) == candidate) {
        candidate += 1;
    }
    candidate
}

/// Replace the element matching `pred` or append.
fn upsert_by<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool, value: T) {
    if let Some(slot) = items.iter_mut().find(|i| pred(i)) {
        *slot = value;
    } else {
        items.push(value);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lunchline_core::{Email, Role};

    pub(crate) fn offline_store() -> Store {
        Store::new(None, CompanyId::new(1))
    }

    pub(crate) fn test_user(id: i64, username: &str, email: &str, locked: bool) -> User {
        User {
            id: UserId::new(id),
            username: username.to_owned(),
            email: Email::parse(email).unwrap(),
            display_name: username.to_owned(),
            role: Role::Employee,
            department_id: None,
            company_id: None,
            is_locked: locked,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_login_matches_username_case_insensitive_trimmed() {
        let store = offline_store();
        store
            .upsert_user(test_user(1, "MLopez", "maria@example.com", false))
            .await;

        assert!(store.login("  mlopez  ").await.is_some());
        assert!(store.login("MLOPEZ").await.is_some());
    }

    #[tokio::test]
    async fn test_login_matches_email_case_insensitive() {
        let store = offline_store();
        store
            .upsert_user(test_user(1, "mlopez", "Maria@Example.com", false))
            .await;

        let principal = store.login("maria@example.com").await.unwrap();
        assert_eq!(principal.user_id, Some(UserId::new(1)));
    }

    #[tokio::test]
    async fn test_login_rejects_locked_regardless_of_identifier() {
        let store = offline_store();
        store
            .upsert_user(test_user(1, "locked", "locked@example.com", true))
            .await;

        assert!(store.login("locked").await.is_none());
        assert!(store.login("locked@example.com").await.is_none());
        assert!(store.login("LOCKED").await.is_none());
    }

    #[tokio::test]
    async fn test_login_rejects_unknown_and_empty() {
        let store = offline_store();
        assert!(store.login("nobody").await.is_none());
        assert!(store.login("   ").await.is_none());
    }

    #[tokio::test]
    async fn test_login_falls_back_to_default_company() {
        let store = offline_store();
        store
            .upsert_user(test_user(1, "mlopez", "maria@example.com", false))
            .await;

        let principal = store.login("mlopez").await.unwrap();
        assert_eq!(principal.company_id, CompanyId::new(1));
    }

    #[tokio::test]
    async fn test_clear_session_caches_keeps_other_collections() {
        let store = offline_store();
        store
            .upsert_user(test_user(1, "mlopez", "maria@example.com", false))
            .await;
        store
            .compose_menu(
                chrono::NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
                None,
                None,
                vec![],
                None,
            )
            .await;

        store.clear_session_caches().await;

        assert!(store.menus_all().await.is_empty());
        assert_eq!(store.users().await.len(), 1);
    }

    #[tokio::test]
    async fn test_guest_login_bypasses_lookup() {
        let store = offline_store();
        let principal = store.login_as_guest(
            GuestIdentity {
                name: "Visitor".to_owned(),
                host_contact: "host@example.com".to_owned(),
            },
            CompanyId::new(2),
        );
        assert!(principal.is_guest());
        assert_eq!(principal.company_id, CompanyId::new(2));
        assert_eq!(principal.role, Role::Guest);
    }
}
