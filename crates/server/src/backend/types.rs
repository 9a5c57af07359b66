//! Wire rows for the table backend.
//!
//! Column names are snake_case on the wire, matching the field names here,
//! so serde needs no renaming. Enums, dates, and times travel as strings;
//! optional columns are `Option`. Conversions into domain models live in
//! [`super::convert`].

use serde::{Deserialize, Serialize};

/// Row of the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: String,
    pub department_id: Option<i64>,
    pub company_id: Option<i64>,
    pub is_locked: Option<bool>,
    pub created_at: Option<String>,
}

/// Row of the `companies` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRow {
    pub id: i64,
    pub name: String,
    pub tagline: Option<String>,
    pub logo_url: Option<String>,
}

/// Row of the `departments` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentRow {
    pub id: i64,
    pub name: String,
}

/// Row of the `master_food_items` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterFoodItemRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub calories: Option<i64>,
    pub dietary_tags: Option<Vec<String>>,
    pub is_available: Option<bool>,
    pub company_id: Option<i64>,
}

/// An item embedded in a menu or template row (JSON column).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub calories: Option<i64>,
    pub dietary_tags: Option<Vec<String>>,
}

/// Row of the `daily_menus` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMenuRow {
    pub id: i64,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub items: Option<Vec<MenuItemRow>>,
    pub notes: Option<String>,
    pub department_id: Option<i64>,
    pub company_id: Option<i64>,
}

/// Row of the `menu_templates` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuTemplateRow {
    pub id: i64,
    pub name: String,
    pub items: Option<Vec<MenuItemRow>>,
    pub notes: Option<String>,
    pub created_by: i64,
    pub is_shared: Option<bool>,
}

/// Row of the `orders` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub guest_name: Option<String>,
    pub host_contact: Option<String>,
    pub menu_id: i64,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub item_ids: Option<Vec<i64>>,
    pub instructions: Option<String>,
    pub status: String,
    pub company_id: Option<i64>,
    pub created_at: Option<String>,
}

/// Row of the `menu_issues` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuIssueRow {
    pub id: i64,
    pub user_id: i64,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub text: String,
    pub status: String,
    pub chef_response: Option<String>,
    pub is_read: Option<bool>,
    pub created_at: Option<String>,
}

/// A response embedded in a comment row (JSON column, append-only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponseRow {
    pub author_name: String,
    pub text: String,
    pub created_at: Option<String>,
}

/// Row of the `comments` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRow {
    pub id: i64,
    pub author_name: String,
    pub text: String,
    pub responses: Option<Vec<CommentResponseRow>>,
    pub created_at: Option<String>,
}

/// The singleton `tenant_settings` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantSettingsRow {
    /// Always 1; the table holds a single row.
    pub id: i64,
    pub company_name: String,
    pub tagline: Option<String>,
    pub logo_url: Option<String>,
    /// `HH:MM`.
    pub order_cutoff: Option<String>,
    pub guest_access: Option<String>,
    pub guest_passcode: Option<String>,
}
