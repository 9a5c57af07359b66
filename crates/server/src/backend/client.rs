//! REST client for the hosted table backend.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use lunchline_core::{
    CompanyId, DepartmentId, MasterItemId, MenuId, OrderId, OrderStatus, TemplateId, UserId,
};

use crate::config::BackendConfig;
use crate::models::{
    Comment, Company, DailyMenu, Department, MasterFoodItem, MenuIssue, MenuTemplate, Order,
    TenantSettings, User,
};

use super::BackendError;
use super::types::{
    CommentRow, CompanyRow, DailyMenuRow, DepartmentRow, MasterFoodItemRow, MenuIssueRow,
    MenuTemplateRow, OrderRow, TenantSettingsRow, UserRow,
};

/// Client for the hosted table backend.
///
/// Cheaply cloneable; one instance is shared by the store and the CLI. All
/// requests carry the service key in both the `apikey` header and the
/// bearer token, which is what the backend's REST gateway expects.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Panics
    ///
    /// Panics if the service key contains invalid header characters.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let key = config.service_key.expose_secret();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "apikey",
            HeaderValue::from_str(key).expect("Invalid service key for header"),
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {key}"))
                .expect("Invalid service key for header"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.url.trim_end_matches('/').to_owned(),
            }),
        }
    }

    /// Check backend reachability (used by the readiness probe).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or rejects the key.
    pub async fn ping(&self) -> Result<(), BackendError> {
        let url = format!("{}/rest/v1/", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    // =========================================================================
    // Generic table verbs
    // =========================================================================

    async fn list<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>, BackendError> {
        let url = format!("{}/rest/v1/{table}?select=*", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;
        let response = Self::ensure_success(response).await?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    /// Insert-or-replace one row, keyed on `id`.
    async fn upsert<T: Serialize + Sync>(&self, table: &str, row: &T) -> Result<(), BackendError> {
        let url = format!("{}/rest/v1/{table}?on_conflict=id", self.inner.base_url);
        let response = self
            .inner
            .client
            .post(&url)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(row)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    /// Patch a subset of columns on one row.
    async fn patch<T: Serialize + Sync>(
        &self,
        table: &str,
        id: i64,
        body: &T,
    ) -> Result<(), BackendError> {
        let url = format!("{}/rest/v1/{table}?id=eq.{id}", self.inner.base_url);
        let response = self.inner.client.patch(&url).json(body).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, id: i64) -> Result<(), BackendError> {
        let url = format!("{}/rest/v1/{table}?id=eq.{id}", self.inner.base_url);
        let response = self.inner.client.delete(&url).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(BackendError::Api {
            status: status.as_u16(),
            message,
        })
    }

    // =========================================================================
    // Fetches (row conversion failures are skipped with a warning)
    // =========================================================================

    /// Fetch all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response parsing fails.
    #[instrument(skip(self))]
    pub async fn fetch_users(&self) -> Result<Vec<User>, BackendError> {
        Ok(convert_rows::<UserRow, User>(
            self.list("users").await?,
            "users",
        ))
    }

    /// Fetch all companies.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response parsing fails.
    #[instrument(skip(self))]
    pub async fn fetch_companies(&self) -> Result<Vec<Company>, BackendError> {
        let rows: Vec<CompanyRow> = self.list("companies").await?;
        Ok(rows.into_iter().map(Company::from).collect())
    }

    /// Fetch all departments.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response parsing fails.
    #[instrument(skip(self))]
    pub async fn fetch_departments(&self) -> Result<Vec<Department>, BackendError> {
        let rows: Vec<DepartmentRow> = self.list("departments").await?;
        Ok(rows.into_iter().map(Department::from).collect())
    }

    /// Fetch the master food catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response parsing fails.
    #[instrument(skip(self))]
    pub async fn fetch_master_items(&self) -> Result<Vec<MasterFoodItem>, BackendError> {
        Ok(convert_rows::<MasterFoodItemRow, MasterFoodItem>(
            self.list("master_food_items").await?,
            "master_food_items",
        ))
    }

    /// Fetch all daily menus.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response parsing fails.
    #[instrument(skip(self))]
    pub async fn fetch_menus(&self) -> Result<Vec<DailyMenu>, BackendError> {
        Ok(convert_rows::<DailyMenuRow, DailyMenu>(
            self.list("daily_menus").await?,
            "daily_menus",
        ))
    }

    /// Fetch all menu templates.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response parsing fails.
    #[instrument(skip(self))]
    pub async fn fetch_templates(&self) -> Result<Vec<MenuTemplate>, BackendError> {
        Ok(convert_rows::<MenuTemplateRow, MenuTemplate>(
            self.list("menu_templates").await?,
            "menu_templates",
        ))
    }

    /// Fetch all orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response parsing fails.
    #[instrument(skip(self))]
    pub async fn fetch_orders(&self) -> Result<Vec<Order>, BackendError> {
        Ok(convert_rows::<OrderRow, Order>(
            self.list("orders").await?,
            "orders",
        ))
    }

    /// Fetch all menu issues.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response parsing fails.
    #[instrument(skip(self))]
    pub async fn fetch_issues(&self) -> Result<Vec<MenuIssue>, BackendError> {
        Ok(convert_rows::<MenuIssueRow, MenuIssue>(
            self.list("menu_issues").await?,
            "menu_issues",
        ))
    }

    /// Fetch all comments.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response parsing fails.
    #[instrument(skip(self))]
    pub async fn fetch_comments(&self) -> Result<Vec<Comment>, BackendError> {
        let rows: Vec<CommentRow> = self.list("comments").await?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    /// Fetch the singleton tenant settings row, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response parsing fails.
    #[instrument(skip(self))]
    pub async fn fetch_settings(&self) -> Result<Option<TenantSettings>, BackendError> {
        let rows: Vec<TenantSettingsRow> = self.list("tenant_settings").await?;
        Ok(rows.into_iter().next().map(TenantSettings::from))
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Insert or replace a user row.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the backend is
    /// unreachable.
    pub async fn upsert_user(&self, user: &User) -> Result<(), BackendError> {
        self.upsert("users", &UserRow::from(user)).await
    }

    /// Delete a user row.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the backend is
    /// unreachable.
    pub async fn delete_user(&self, id: UserId) -> Result<(), BackendError> {
        self.delete("users", id.as_i64()).await
    }

    /// Insert or replace a company row.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the backend is
    /// unreachable.
    pub async fn upsert_company(&self, company: &Company) -> Result<(), BackendError> {
        self.upsert("companies", &CompanyRow::from(company)).await
    }

    /// Delete a company row.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the backend is
    /// unreachable.
    pub async fn delete_company(&self, id: CompanyId) -> Result<(), BackendError> {
        self.delete("companies", id.as_i64()).await
    }

    /// Insert or replace a department row.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the backend is
    /// unreachable.
    pub async fn upsert_department(&self, department: &Department) -> Result<(), BackendError> {
        self.upsert("departments", &DepartmentRow::from(department))
            .await
    }

    /// Delete a department row.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the backend is
    /// unreachable.
    pub async fn delete_department(&self, id: DepartmentId) -> Result<(), BackendError> {
        self.delete("departments", id.as_i64()).await
    }

    /// Insert or replace a master food item row.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the backend is
    /// unreachable.
    pub async fn upsert_master_item(&self, item: &MasterFoodItem) -> Result<(), BackendError> {
        self.upsert("master_food_items", &MasterFoodItemRow::from(item))
            .await
    }

    /// Delete a master food item row.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the backend is
    /// unreachable.
    pub async fn delete_master_item(&self, id: MasterItemId) -> Result<(), BackendError> {
        self.delete("master_food_items", id.as_i64()).await
    }

    /// Insert or replace a daily menu row.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the backend is
    /// unreachable.
    pub async fn upsert_menu(&self, menu: &DailyMenu) -> Result<(), BackendError> {
        self.upsert("daily_menus", &DailyMenuRow::from(menu)).await
    }

    /// Delete a daily menu row.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the backend is
    /// unreachable.
    pub async fn delete_menu(&self, id: MenuId) -> Result<(), BackendError> {
        self.delete("daily_menus", id.as_i64()).await
    }

    /// Insert or replace a menu template row.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the backend is
    /// unreachable.
    pub async fn upsert_template(&self, template: &MenuTemplate) -> Result<(), BackendError> {
        self.upsert("menu_templates", &MenuTemplateRow::from(template))
            .await
    }

    /// Delete a menu template row.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the backend is
    /// unreachable.
    pub async fn delete_template(&self, id: TemplateId) -> Result<(), BackendError> {
        self.delete("menu_templates", id.as_i64()).await
    }

    /// Insert or replace an order row.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the backend is
    /// unreachable.
    pub async fn upsert_order(&self, order: &Order) -> Result<(), BackendError> {
        self.upsert("orders", &OrderRow::from(order)).await
    }

    /// Patch just the status column of an order row.
    ///
    /// Batch delivery persists as N of these - one per order, sequential,
    /// no atomicity.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the backend is
    /// unreachable.
    pub async fn set_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), BackendError> {
        self.patch(
            "orders",
            id.as_i64(),
            &serde_json::json!({ "status": status.to_string() }),
        )
        .await
    }

    /// Insert or replace a menu issue row.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the backend is
    /// unreachable.
    pub async fn upsert_issue(&self, issue: &MenuIssue) -> Result<(), BackendError> {
        self.upsert("menu_issues", &MenuIssueRow::from(issue)).await
    }

    /// Insert or replace a comment row.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the backend is
    /// unreachable.
    pub async fn upsert_comment(&self, comment: &Comment) -> Result<(), BackendError> {
        self.upsert("comments", &CommentRow::from(comment)).await
    }

    /// Insert or replace the singleton tenant settings row.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the backend is
    /// unreachable.
    pub async fn upsert_settings(&self, settings: &TenantSettings) -> Result<(), BackendError> {
        self.upsert("tenant_settings", &TenantSettingsRow::from(settings))
            .await
    }
}

/// Convert fetched rows, skipping (and warning about) malformed ones.
///
/// One bad row in a table must not empty the whole collection; the backend
/// is shared with spreadsheet-grade tooling and has seen hand-edited rows.
fn convert_rows<R, T>(rows: Vec<R>, table: &'static str) -> Vec<T>
where
    T: TryFrom<R>,
    T::Error: std::fmt::Display,
{
    rows.into_iter()
        .filter_map(|row| match T::try_from(row) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("skipping malformed {table} row: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_rows_skips_bad_rows() {
        let rows = vec![
            UserRow {
                id: 1,
                username: "good".to_owned(),
                email: "good@example.com".to_owned(),
                display_name: None,
                role: "employee".to_owned(),
                department_id: None,
                company_id: None,
                is_locked: None,
                created_at: None,
            },
            UserRow {
                id: 2,
                username: "bad".to_owned(),
                email: "bad@example.com".to_owned(),
                display_name: None,
                role: "sous-chef".to_owned(),
                department_id: None,
                company_id: None,
                is_locked: None,
                created_at: None,
            },
        ];
        let users = convert_rows::<UserRow, User>(rows, "users");
        assert_eq!(users.len(), 1);
        assert_eq!(users.first().map(|u| u.username.as_str()), Some("good"));
    }

    #[test]
    fn test_backend_client_is_clone_send_sync() {
        fn assert_clone<T: Clone>() {}
        fn assert_send_sync<T: Send + Sync>() {}
        assert_clone::<BackendClient>();
        assert_send_sync::<BackendClient>();
    }
}
