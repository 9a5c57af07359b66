//! Master food catalog operations.

use lunchline_core::{CompanyId, MasterItemId};

use crate::models::MasterFoodItem;

use super::{Store, next_time_id, upsert_by};

impl Store {
    // =========================================================================
    // Selectors
    // =========================================================================

    /// The whole catalog.
    pub async fn master_items(&self) -> Vec<MasterFoodItem> {
        self.inner.read().await.master_items.clone()
    }

    /// Catalog entries visible to a company, available ones only.
    pub async fn available_items_for(&self, company: CompanyId) -> Vec<MasterFoodItem> {
        self.inner
            .read()
            .await
            .master_items
            .iter()
            .filter(|i| i.is_available && Self::scoped_to(i.company_id, company))
            .cloned()
            .collect()
    }

    /// One catalog entry by id.
    pub async fn master_item(&self, id: MasterItemId) -> Option<MasterFoodItem> {
        self.inner
            .read()
            .await
            .master_items
            .iter()
            .find(|i| i.id == id)
            .cloned()
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Create a catalog entry (time-derived id) and return it.
    pub async fn create_master_item(&self, mut item: MasterFoodItem) -> MasterFoodItem {
        {
            let mut c = self.inner.write().await;
            item.id = MasterItemId::new(next_time_id(&c.master_items, |i| i.id.as_i64()));
            c.master_items.push(item.clone());
        }
        self.persist_master_item(item.clone());
        item
    }

    /// Replace (or add) a catalog entry, keyed by id.
    pub async fn upsert_master_item(&self, item: MasterFoodItem) {
        {
            let mut c = self.inner.write().await;
            upsert_by(&mut c.master_items, |i| i.id == item.id, item.clone());
        }
        self.persist_master_item(item);
    }

    /// Flip a catalog entry's availability. Returns the new state.
    pub async fn toggle_master_item(&self, id: MasterItemId) -> Option<bool> {
        let item = {
            let mut c = self.inner.write().await;
            let item = c.master_items.iter_mut().find(|i| i.id == id)?;
            item.is_available = !item.is_available;
            item.clone()
        };
        let available = item.is_available;
        self.persist_master_item(item);
        Some(available)
    }

    /// Remove a catalog entry.
    ///
    /// Menus already composed keep their copy of the item; only the catalog
    /// loses it.
    pub async fn delete_master_item(&self, id: MasterItemId) {
        self.inner.write().await.master_items.retain(|i| i.id != id);

        if let Some(backend) = self.backend.clone() {
            tokio::spawn(async move {
                if let Err(e) = backend.delete_master_item(id).await {
                    tracing::error!("failed to delete master item {id}: {e}");
                }
            });
        }
    }

    fn persist_master_item(&self, item: MasterFoodItem) {
        if let Some(backend) = self.backend.clone() {
            tokio::spawn(async move {
                if let Err(e) = backend.upsert_master_item(&item).await {
                    tracing::error!("failed to persist master item {}: {e}", item.id);
                }
            });
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::tests::offline_store;
    use super::*;
    use lunchline_core::FoodCategory;

    fn catalog_item(name: &str, company: Option<i64>) -> MasterFoodItem {
        MasterFoodItem {
            id: MasterItemId::new(0),
            name: name.to_owned(),
            description: String::new(),
            category: FoodCategory::Main,
            calories: 500,
            dietary_tags: vec![],
            is_available: true,
            company_id: company.map(CompanyId::new),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_upsert_replaces() {
        let store = offline_store();
        let created = store.create_master_item(catalog_item("Stew", None)).await;
        assert_ne!(created.id.as_i64(), 0);

        let mut updated = created.clone();
        updated.name = "Beef Stew".to_owned();
        store.upsert_master_item(updated).await;

        let items = store.master_items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().unwrap().name, "Beef Stew");
    }

    #[tokio::test]
    async fn test_toggle_and_availability_filter() {
        let store = offline_store();
        let company = store.default_company_id();
        let item = store.create_master_item(catalog_item("Stew", None)).await;

        assert_eq!(store.available_items_for(company).await.len(), 1);
        assert_eq!(store.toggle_master_item(item.id).await, Some(false));
        assert!(store.available_items_for(company).await.is_empty());
        assert_eq!(store.toggle_master_item(item.id).await, Some(true));
        assert!(store.toggle_master_item(MasterItemId::new(123)).await.is_none());
    }

    #[tokio::test]
    async fn test_company_scoping() {
        let store = offline_store();
        store.create_master_item(catalog_item("Shared", None)).await;
        store.create_master_item(catalog_item("Acme only", Some(2))).await;

        let default_view = store.available_items_for(CompanyId::new(1)).await;
        assert_eq!(default_view.len(), 1);

        let acme_view = store.available_items_for(CompanyId::new(2)).await;
        assert_eq!(acme_view.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_leaves_composed_menus_alone() {
        let store = offline_store();
        let item = store.create_master_item(catalog_item("Stew", None)).await;
        store
            .compose_menu(
                chrono::NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
                None,
                None,
                vec![item.to_menu_item()],
                None,
            )
            .await;

        store.delete_master_item(item.id).await;

        assert!(store.master_items().await.is_empty());
        let menu = store
            .menu_on(
                chrono::NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
                store.default_company_id(),
            )
            .await
            .unwrap();
        assert_eq!(menu.items.len(), 1);
    }
}
