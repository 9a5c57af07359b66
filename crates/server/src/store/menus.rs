//! Daily-menu and template operations.

use chrono::NaiveDate;

use lunchline_core::{CompanyId, DepartmentId, MenuId, TemplateId, UserId};

use crate::models::{DailyMenu, MenuItem, MenuTemplate};

use super::{Store, next_time_id, upsert_by};

/// Write-side key match for the one-menu-per-(date, company) invariant.
///
/// An unscoped menu is the one every tenant sees, so editing "the menu for
/// this date" from any tenant must hit it rather than shadow it with a
/// scoped duplicate.
fn same_menu_scope(menu_company: Option<CompanyId>, company: Option<CompanyId>) -> bool {
    menu_company.is_none() || menu_company == company
}

impl Store {
    // =========================================================================
    // Selectors
    // =========================================================================

    /// Every daily menu (all tenants).
    pub async fn menus_all(&self) -> Vec<DailyMenu> {
        self.inner.read().await.menus.clone()
    }

    /// The menu published for `date` visible to `company`, if any.
    pub async fn menu_on(&self, date: NaiveDate, company: CompanyId) -> Option<DailyMenu> {
        self.inner
            .read()
            .await
            .menus
            .iter()
            .find(|m| m.date == date && Self::scoped_to(m.company_id, company))
            .cloned()
    }

    /// Dates within `dates` that have a menu for `company`.
    pub async fn menu_dates_in(&self, dates: &[NaiveDate], company: CompanyId) -> Vec<NaiveDate> {
        let c = self.inner.read().await;
        dates
            .iter()
            .copied()
            .filter(|d| {
                c.menus
                    .iter()
                    .any(|m| m.date == *d && Self::scoped_to(m.company_id, company))
            })
            .collect()
    }

    /// Templates visible to `user` (own plus shared).
    pub async fn templates_for(&self, user: UserId) -> Vec<MenuTemplate> {
        self.inner
            .read()
            .await
            .templates
            .iter()
            .filter(|t| t.visible_to(user))
            .cloned()
            .collect()
    }

    /// One template by id.
    pub async fn template(&self, id: TemplateId) -> Option<MenuTemplate> {
        self.inner
            .read()
            .await
            .templates
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Publish (or replace) the menu for a date.
    ///
    /// Upholds the one-menu-per-(date, company) invariant: an existing menu
    /// on that key is replaced in place and keeps its id; otherwise a new
    /// menu is appended with a time-derived id.
    pub async fn compose_menu(
        &self,
        date: NaiveDate,
        company_id: Option<CompanyId>,
        department_id: Option<DepartmentId>,
        items: Vec<MenuItem>,
        notes: Option<String>,
    ) -> DailyMenu {
        let mut c = self.inner.write().await;
        let menu = match c
            .menus
            .iter_mut()
            .find(|m| m.date == date && same_menu_scope(m.company_id, company_id))
        {
            Some(existing) => {
                existing.items = items;
                existing.notes = notes;
                existing.department_id = department_id;
                existing.clone()
            }
            None => {
                let menu = DailyMenu {
                    id: MenuId::new(next_time_id(&c.menus, |m| m.id.as_i64())),
                    date,
                    items,
                    notes,
                    department_id,
                    company_id,
                };
                c.menus.push(menu.clone());
                menu
            }
        };
        drop(c);

        self.persist_menu(menu.clone());
        menu
    }

    /// Duplicate an existing day's items and notes onto a target date.
    ///
    /// The source menu is never mutated. Returns `None` (and does nothing)
    /// when the source date has no menu.
    pub async fn copy_menu_from_date(
        &self,
        src: NaiveDate,
        tgt: NaiveDate,
        company_id: Option<CompanyId>,
    ) -> Option<DailyMenu> {
        let source = {
            let c = self.inner.read().await;
            c.menus
                .iter()
                .find(|m| m.date == src && same_menu_scope(m.company_id, company_id))
                .cloned()
        }?;

        Some(
            self.compose_menu(
                tgt,
                company_id,
                source.department_id,
                source.items,
                source.notes,
            )
            .await,
        )
    }

    /// Copy a template's items and notes onto a target date.
    ///
    /// Returns `None` when the template does not exist or is not visible to
    /// `user`.
    pub async fn apply_template(
        &self,
        template_id: TemplateId,
        tgt: NaiveDate,
        company_id: Option<CompanyId>,
        user: UserId,
    ) -> Option<DailyMenu> {
        let template = self.template(template_id).await?;
        if !template.visible_to(user) {
            tracing::warn!(template = %template_id, user = %user, "template not visible");
            return None;
        }

        Some(
            self.compose_menu(tgt, company_id, None, template.items, template.notes)
                .await,
        )
    }

    /// Remove a daily menu.
    pub async fn delete_menu(&self, id: MenuId) {
        self.inner.write().await.menus.retain(|m| m.id != id);

        if let Some(backend) = self.backend.clone() {
            tokio::spawn(async move {
                if let Err(e) = backend.delete_menu(id).await {
                    tracing::error!("failed to delete menu {id}: {e}");
                }
            });
        }
    }

    /// Snapshot a date's menu as a named, reusable template.
    ///
    /// Returns `None` when the date has no menu to snapshot.
    pub async fn save_template(
        &self,
        name: String,
        from: NaiveDate,
        company_id: Option<CompanyId>,
        created_by: UserId,
        is_shared: bool,
    ) -> Option<MenuTemplate> {
        let source = {
            let c = self.inner.read().await;
            c.menus
                .iter()
                .find(|m| m.date == from && same_menu_scope(m.company_id, company_id))
                .cloned()
        }?;

        let template = {
            let mut c = self.inner.write().await;
            let template = MenuTemplate {
                id: TemplateId::new(next_time_id(&c.templates, |t| t.id.as_i64())),
                name,
                items: source.items,
                notes: source.notes,
                created_by,
                is_shared,
            };
            upsert_by(&mut c.templates, |t| t.id == template.id, template.clone());
            template
        };

        if let Some(backend) = self.backend.clone() {
            let template = template.clone();
            tokio::spawn(async move {
                if let Err(e) = backend.upsert_template(&template).await {
                    tracing::error!("failed to persist template {}: {e}", template.id);
                }
            });
        }
        Some(template)
    }

    /// Remove a template.
    pub async fn delete_template(&self, id: TemplateId) {
        self.inner.write().await.templates.retain(|t| t.id != id);

        if let Some(backend) = self.backend.clone() {
            tokio::spawn(async move {
                if let Err(e) = backend.delete_template(id).await {
                    tracing::error!("failed to delete template {id}: {e}");
                }
            });
        }
    }

    fn persist_menu(&self, menu: DailyMenu) {
        if let Some(backend) = self.backend.clone() {
            tokio::spawn(async move {
                if let Err(e) = backend.upsert_menu(&menu).await {
                    tracing::error!("failed to persist menu {}: {e}", menu.id);
                }
            });
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::tests::offline_store;
    use chrono::NaiveDate;
    use lunchline_core::{FoodCategory, MenuItemId, UserId};

    use crate::models::MenuItem;

    fn item(id: i64, name: &str) -> MenuItem {
        MenuItem {
            id: MenuItemId::new(id),
            name: name.to_owned(),
            description: String::new(),
            category: FoodCategory::Main,
            calories: 400,
            dietary_tags: vec![],
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[tokio::test]
    async fn test_compose_menu_appends_then_replaces_in_place() {
        let store = offline_store();

        let first = store
            .compose_menu(date(10), None, None, vec![item(1, "Stew")], None)
            .await;
        let second = store
            .compose_menu(
                date(10),
                None,
                None,
                vec![item(2, "Curry")],
                Some("spicy".to_owned()),
            )
            .await;

        // replaced in place: same id, one menu total
        assert_eq!(first.id, second.id);
        assert_eq!(store.menus_all().await.len(), 1);
        let menu = store.menus_all().await.into_iter().next().unwrap();
        assert_eq!(menu.items.first().unwrap().name, "Curry");
        assert_eq!(menu.notes.as_deref(), Some("spicy"));
    }

    #[tokio::test]
    async fn test_copy_replaces_existing_target_and_keeps_source() {
        let store = offline_store();
        store
            .compose_menu(
                date(10),
                None,
                None,
                vec![item(1, "Stew"), item(2, "Salad")],
                Some("source notes".to_owned()),
            )
            .await;
        let tgt_before = store
            .compose_menu(date(11), None, None, vec![item(3, "Toast")], None)
            .await;

        let copied = store.copy_menu_from_date(date(10), date(11), None).await.unwrap();

        // target replaced in place (same id), fully overwritten
        assert_eq!(copied.id, tgt_before.id);
        assert_eq!(copied.items.len(), 2);
        assert_eq!(copied.notes.as_deref(), Some("source notes"));

        // source untouched
        let source = store.menu_on(date(10), store.default_company_id()).await.unwrap();
        assert_eq!(source.items.len(), 2);
        assert_eq!(source.notes.as_deref(), Some("source notes"));

        // still exactly two menus
        assert_eq!(store.menus_all().await.len(), 2);
    }

    #[tokio::test]
    async fn test_copy_appends_when_target_missing() {
        let store = offline_store();
        let source = store
            .compose_menu(date(10), None, None, vec![item(1, "Stew")], None)
            .await;

        let copied = store.copy_menu_from_date(date(12), date(13), None).await;
        assert!(copied.is_none(), "no source menu on 12th");

        let copied = store.copy_menu_from_date(date(10), date(13), None).await.unwrap();
        assert_ne!(copied.id, source.id);
        assert_eq!(store.menus_all().await.len(), 2);
    }

    #[tokio::test]
    async fn test_save_and_apply_template() {
        let store = offline_store();
        let owner = UserId::new(5);
        store
            .compose_menu(
                date(10),
                None,
                None,
                vec![item(1, "Stew")],
                Some("classics".to_owned()),
            )
            .await;

        let template = store
            .save_template("Friday classics".to_owned(), date(10), None, owner, false)
            .await
            .unwrap();

        // visible to owner, hidden from others
        assert_eq!(store.templates_for(owner).await.len(), 1);
        assert!(store.templates_for(UserId::new(9)).await.is_empty());

        // applying copies items/notes onto the target date
        let applied = store
            .apply_template(template.id, date(14), None, owner)
            .await
            .unwrap();
        assert_eq!(applied.items.len(), 1);
        assert_eq!(applied.notes.as_deref(), Some("classics"));

        // not visible -> not applied
        assert!(
            store
                .apply_template(template.id, date(15), None, UserId::new(9))
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_compose_replaces_shared_menu_instead_of_shadowing_it() {
        let store = offline_store();
        let shared = store
            .compose_menu(date(10), None, None, vec![item(1, "Stew")], None)
            .await;

        // a tenant editing the shared day's menu edits it in place
        let edited = store
            .compose_menu(
                date(10),
                Some(store.default_company_id()),
                None,
                vec![item(2, "Curry")],
                None,
            )
            .await;

        assert_eq!(edited.id, shared.id);
        assert_eq!(store.menus_all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_company_scoping_of_menu_lookup() {
        let store = offline_store();
        let company = store.default_company_id();
        store
            .compose_menu(date(10), Some(company), None, vec![item(1, "Stew")], None)
            .await;

        // visible to its own company
        assert!(store.menu_on(date(10), company).await.is_some());
        // invisible to another tenant
        assert!(
            store
                .menu_on(date(10), lunchline_core::CompanyId::new(99))
                .await
                .is_none()
        );
    }
}
