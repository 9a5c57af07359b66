//! Users, departments, companies, and tenant settings.

use lunchline_core::{CompanyId, DepartmentId, GuestPasscode, UserId};

use crate::models::{Company, Department, TenantSettings, User};

use super::{Store, next_time_id, upsert_by};

impl Store {
    // =========================================================================
    // Users
    // =========================================================================

    /// Replace (or add) a user, keyed by id.
    pub async fn upsert_user(&self, user: User) {
        {
            let mut c = self.inner.write().await;
            upsert_by(&mut c.users, |u| u.id == user.id, user.clone());
        }

        if let Some(backend) = self.backend.clone() {
            tokio::spawn(async move {
                if let Err(e) = backend.upsert_user(&user).await {
                    tracing::error!("failed to persist user {}: {e}", user.id);
                }
            });
        }
    }

    /// Create a user with a time-derived id and return it.
    pub async fn create_user(&self, mut user: User) -> User {
        {
            let mut c = self.inner.write().await;
            user.id = UserId::new(next_time_id(&c.users, |u| u.id.as_i64()));
            c.users.push(user.clone());
        }

        if let Some(backend) = self.backend.clone() {
            let user = user.clone();
            tokio::spawn(async move {
                if let Err(e) = backend.upsert_user(&user).await {
                    tracing::error!("failed to persist user {}: {e}", user.id);
                }
            });
        }
        user
    }

    /// Lock or unlock an account. Locked accounts cannot log in.
    pub async fn set_user_locked(&self, id: UserId, locked: bool) -> bool {
        let user = {
            let mut c = self.inner.write().await;
            let Some(user) = c.users.iter_mut().find(|u| u.id == id) else {
                return false;
            };
            user.is_locked = locked;
            user.clone()
        };

        if let Some(backend) = self.backend.clone() {
            tokio::spawn(async move {
                if let Err(e) = backend.upsert_user(&user).await {
                    tracing::error!("failed to persist lock state of user {}: {e}", user.id);
                }
            });
        }
        true
    }

    /// Remove a user.
    pub async fn delete_user(&self, id: UserId) {
        self.inner.write().await.users.retain(|u| u.id != id);

        if let Some(backend) = self.backend.clone() {
            tokio::spawn(async move {
                if let Err(e) = backend.delete_user(id).await {
                    tracing::error!("failed to delete user {id}: {e}");
                }
            });
        }
    }

    // =========================================================================
    // Departments
    // =========================================================================

    /// Create a department and return it.
    pub async fn create_department(&self, name: String) -> Department {
        let department = {
            let mut c = self.inner.write().await;
            let department = Department {
                id: DepartmentId::new(next_time_id(&c.departments, |d| d.id.as_i64())),
                name,
            };
            c.departments.push(department.clone());
            department
        };

        if let Some(backend) = self.backend.clone() {
            let department = department.clone();
            tokio::spawn(async move {
                if let Err(e) = backend.upsert_department(&department).await {
                    tracing::error!("failed to persist department {}: {e}", department.id);
                }
            });
        }
        department
    }

    /// Rename a department.
    pub async fn rename_department(&self, id: DepartmentId, name: String) -> bool {
        let department = {
            let mut c = self.inner.write().await;
            let Some(department) = c.departments.iter_mut().find(|d| d.id == id) else {
                return false;
            };
            department.name = name;
            department.clone()
        };

        if let Some(backend) = self.backend.clone() {
            tokio::spawn(async move {
                if let Err(e) = backend.upsert_department(&department).await {
                    tracing::error!("failed to persist department {}: {e}", department.id);
                }
            });
        }
        true
    }

    /// Remove a department. Users keep their dangling reference; the
    /// delivery view already treats department labels as best-effort.
    pub async fn delete_department(&self, id: DepartmentId) {
        self.inner.write().await.departments.retain(|d| d.id != id);

        if let Some(backend) = self.backend.clone() {
            tokio::spawn(async move {
                if let Err(e) = backend.delete_department(id).await {
                    tracing::error!("failed to delete department {id}: {e}");
                }
            });
        }
    }

    // =========================================================================
    // Companies
    // =========================================================================

    /// Replace (or add) a company, keyed by id.
    pub async fn upsert_company(&self, company: Company) {
        {
            let mut c = self.inner.write().await;
            upsert_by(&mut c.companies, |x| x.id == company.id, company.clone());
        }

        if let Some(backend) = self.backend.clone() {
            tokio::spawn(async move {
                if let Err(e) = backend.upsert_company(&company).await {
                    tracing::error!("failed to persist company {}: {e}", company.id);
                }
            });
        }
    }

    /// Create a company with a time-derived id and return it.
    pub async fn create_company(&self, mut company: Company) -> Company {
        {
            let mut c = self.inner.write().await;
            company.id = CompanyId::new(next_time_id(&c.companies, |x| x.id.as_i64()));
            c.companies.push(company.clone());
        }

        if let Some(backend) = self.backend.clone() {
            let company = company.clone();
            tokio::spawn(async move {
                if let Err(e) = backend.upsert_company(&company).await {
                    tracing::error!("failed to persist company {}: {e}", company.id);
                }
            });
        }
        company
    }

    /// Remove a company.
    pub async fn delete_company(&self, id: CompanyId) {
        self.inner.write().await.companies.retain(|x| x.id != id);

        if let Some(backend) = self.backend.clone() {
            tokio::spawn(async move {
                if let Err(e) = backend.delete_company(id).await {
                    tracing::error!("failed to delete company {id}: {e}");
                }
            });
        }
    }

    // =========================================================================
    // Tenant settings
    // =========================================================================

    /// Replace the tenant settings.
    pub async fn update_settings(&self, settings: TenantSettings) {
        {
            let mut c = self.inner.write().await;
            c.settings = settings.clone();
        }
        self.persist_settings(settings);
    }

    /// Rotate the guest passcode and return the new code.
    ///
    /// The active code is overwritten immediately - any previously
    /// distributed code stops working the moment this returns.
    pub async fn rotate_guest_passcode(&self) -> GuestPasscode {
        let settings = {
            let mut c = self.inner.write().await;
            c.settings.guest_passcode = GuestPasscode::generate();
            c.settings.clone()
        };
        let code = settings.guest_passcode.clone();
        tracing::info!("guest passcode rotated");
        self.persist_settings(settings);
        code
    }

    fn persist_settings(&self, settings: TenantSettings) {
        if let Some(backend) = self.backend.clone() {
            tokio::spawn(async move {
                if let Err(e) = backend.upsert_settings(&settings).await {
                    tracing::error!("failed to persist tenant settings: {e}");
                }
            });
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::tests::{offline_store, test_user};
    use super::*;

    #[tokio::test]
    async fn test_lock_then_login_denied() {
        let store = offline_store();
        let user = store
            .create_user(test_user(0, "mlopez", "maria@example.com", false))
            .await;

        assert!(store.login("mlopez").await.is_some());
        assert!(store.set_user_locked(user.id, true).await);
        assert!(store.login("mlopez").await.is_none());
        assert!(store.set_user_locked(user.id, false).await);
        assert!(store.login("mlopez").await.is_some());
    }

    #[tokio::test]
    async fn test_set_locked_unknown_user() {
        let store = offline_store();
        assert!(!store.set_user_locked(UserId::new(9), true).await);
    }

    #[tokio::test]
    async fn test_department_crud() {
        let store = offline_store();
        let dept = store.create_department("Engineering".to_owned()).await;
        assert!(store.rename_department(dept.id, "Platform".to_owned()).await);
        assert_eq!(
            store.departments().await.first().unwrap().name,
            "Platform"
        );
        store.delete_department(dept.id).await;
        assert!(store.departments().await.is_empty());
    }

    #[tokio::test]
    async fn test_rotate_guest_passcode_overwrites_active_code() {
        let store = offline_store();
        let before = store.settings().await.guest_passcode;
        let after = store.rotate_guest_passcode().await;

        assert_eq!(store.settings().await.guest_passcode, after);
        assert!(after.as_str().starts_with("GUEST-"));
        // the old code no longer verifies (unless the 1-in-10000 collision hit)
        if before != after {
            assert!(!after.verify(before.as_str()));
        }
    }
}
