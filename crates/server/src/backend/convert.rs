//! Conversions between wire rows and domain models.
//!
//! Row-to-domain conversions are fallible: enum strings, dates, and emails
//! are validated, and a malformed row is rejected with a [`RowError`] so the
//! client can skip it (with a warning) instead of failing the whole fetch.
//! Domain-to-row conversions are infallible.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

use lunchline_core::{
    CommentId, CompanyId, DepartmentId, Email, FoodCategory, GuestAccessMode, GuestPasscode,
    IssueId, IssueStatus, MasterItemId, MenuId, MenuItemId, OrderId, OrderStatus, Role, TemplateId,
    UserId,
};

use crate::models::{
    Comment, CommentResponse, Company, DailyMenu, Department, MasterFoodItem, MenuIssue, MenuItem,
    MenuTemplate, Order, TenantSettings, User,
};

use super::types::{
    CommentResponseRow, CommentRow, CompanyRow, DailyMenuRow, DepartmentRow, MasterFoodItemRow,
    MenuIssueRow, MenuItemRow, MenuTemplateRow, OrderRow, TenantSettingsRow, UserRow,
};

/// A row field the domain model cannot accept.
#[derive(Debug, Clone, Error)]
#[error("invalid {field}: {value:?}")]
pub struct RowError {
    pub field: &'static str,
    pub value: String,
}

impl RowError {
    fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

// =============================================================================
// Field helpers
// =============================================================================

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, RowError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| RowError::new(field, value))
}

/// Timestamps are cosmetic; a missing or malformed one falls back to epoch
/// rather than rejecting the row.
fn parse_timestamp(value: Option<&str>) -> DateTime<Utc> {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map_or(DateTime::UNIX_EPOCH, |dt| dt.with_timezone(&Utc))
}

fn parse_cutoff(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

fn calories(value: Option<i64>) -> u32 {
    value
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or_default()
}

// =============================================================================
// Users / companies / departments
// =============================================================================

impl TryFrom<UserRow> for User {
    type Error = RowError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|_| RowError::new("role", &row.role))?;
        let email = Email::parse(&row.email).map_err(|_| RowError::new("email", &row.email))?;
        Ok(Self {
            id: UserId::new(row.id),
            display_name: row.display_name.unwrap_or_else(|| row.username.clone()),
            username: row.username,
            email,
            role,
            department_id: row.department_id.map(DepartmentId::new),
            company_id: row.company_id.map(CompanyId::new),
            is_locked: row.is_locked.unwrap_or(false),
            created_at: parse_timestamp(row.created_at.as_deref()),
        })
    }
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_i64(),
            username: user.username.clone(),
            email: user.email.as_str().to_owned(),
            display_name: Some(user.display_name.clone()),
            role: user.role.to_string(),
            department_id: user.department_id.map(|d| d.as_i64()),
            company_id: user.company_id.map(|c| c.as_i64()),
            is_locked: Some(user.is_locked),
            created_at: Some(user.created_at.to_rfc3339()),
        }
    }
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Self {
            id: CompanyId::new(row.id),
            name: row.name,
            tagline: row.tagline,
            logo_url: row.logo_url,
        }
    }
}

impl From<&Company> for CompanyRow {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id.as_i64(),
            name: company.name.clone(),
            tagline: company.tagline.clone(),
            logo_url: company.logo_url.clone(),
        }
    }
}

impl From<DepartmentRow> for Department {
    fn from(row: DepartmentRow) -> Self {
        Self {
            id: DepartmentId::new(row.id),
            name: row.name,
        }
    }
}

impl From<&Department> for DepartmentRow {
    fn from(department: &Department) -> Self {
        Self {
            id: department.id.as_i64(),
            name: department.name.clone(),
        }
    }
}

// =============================================================================
// Catalog / menus / templates
// =============================================================================

impl TryFrom<MasterFoodItemRow> for MasterFoodItem {
    type Error = RowError;

    fn try_from(row: MasterFoodItemRow) -> Result<Self, Self::Error> {
        let category: FoodCategory = row
            .category
            .parse()
            .map_err(|_| RowError::new("category", &row.category))?;
        Ok(Self {
            id: MasterItemId::new(row.id),
            name: row.name,
            description: row.description.unwrap_or_default(),
            category,
            calories: calories(row.calories),
            dietary_tags: row.dietary_tags.unwrap_or_default(),
            is_available: row.is_available.unwrap_or(true),
            company_id: row.company_id.map(CompanyId::new),
        })
    }
}

impl From<&MasterFoodItem> for MasterFoodItemRow {
    fn from(item: &MasterFoodItem) -> Self {
        Self {
            id: item.id.as_i64(),
            name: item.name.clone(),
            description: Some(item.description.clone()),
            category: item.category.to_string(),
            calories: Some(i64::from(item.calories)),
            dietary_tags: Some(item.dietary_tags.clone()),
            is_available: Some(item.is_available),
            company_id: item.company_id.map(|c| c.as_i64()),
        }
    }
}

impl TryFrom<MenuItemRow> for MenuItem {
    type Error = RowError;

    fn try_from(row: MenuItemRow) -> Result<Self, Self::Error> {
        let category: FoodCategory = row
            .category
            .parse()
            .map_err(|_| RowError::new("category", &row.category))?;
        Ok(Self {
            id: MenuItemId::new(row.id),
            name: row.name,
            description: row.description.unwrap_or_default(),
            category,
            calories: calories(row.calories),
            dietary_tags: row.dietary_tags.unwrap_or_default(),
        })
    }
}

impl From<&MenuItem> for MenuItemRow {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id.as_i64(),
            name: item.name.clone(),
            description: Some(item.description.clone()),
            category: item.category.to_string(),
            calories: Some(i64::from(item.calories)),
            dietary_tags: Some(item.dietary_tags.clone()),
        }
    }
}

fn convert_items(rows: Option<Vec<MenuItemRow>>) -> Result<Vec<MenuItem>, RowError> {
    rows.unwrap_or_default()
        .into_iter()
        .map(MenuItem::try_from)
        .collect()
}

impl TryFrom<DailyMenuRow> for DailyMenu {
    type Error = RowError;

    fn try_from(row: DailyMenuRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MenuId::new(row.id),
            date: parse_date("date", &row.date)?,
            items: convert_items(row.items)?,
            notes: row.notes,
            department_id: row.department_id.map(DepartmentId::new),
            company_id: row.company_id.map(CompanyId::new),
        })
    }
}

impl From<&DailyMenu> for DailyMenuRow {
    fn from(menu: &DailyMenu) -> Self {
        Self {
            id: menu.id.as_i64(),
            date: menu.date.format("%Y-%m-%d").to_string(),
            items: Some(menu.items.iter().map(MenuItemRow::from).collect()),
            notes: menu.notes.clone(),
            department_id: menu.department_id.map(|d| d.as_i64()),
            company_id: menu.company_id.map(|c| c.as_i64()),
        }
    }
}

impl TryFrom<MenuTemplateRow> for MenuTemplate {
    type Error = RowError;

    fn try_from(row: MenuTemplateRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TemplateId::new(row.id),
            name: row.name,
            items: convert_items(row.items)?,
            notes: row.notes,
            created_by: UserId::new(row.created_by),
            is_shared: row.is_shared.unwrap_or(false),
        })
    }
}

impl From<&MenuTemplate> for MenuTemplateRow {
    fn from(template: &MenuTemplate) -> Self {
        Self {
            id: template.id.as_i64(),
            name: template.name.clone(),
            items: Some(template.items.iter().map(MenuItemRow::from).collect()),
            notes: template.notes.clone(),
            created_by: template.created_by.as_i64(),
            is_shared: Some(template.is_shared),
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

impl TryFrom<OrderRow> for Order {
    type Error = RowError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = row
            .status
            .parse()
            .map_err(|_| RowError::new("status", &row.status))?;
        Ok(Self {
            id: OrderId::new(row.id),
            user_id: row.user_id.map(UserId::new),
            guest_name: row.guest_name,
            host_contact: row.host_contact,
            menu_id: MenuId::new(row.menu_id),
            date: parse_date("date", &row.date)?,
            item_ids: row
                .item_ids
                .unwrap_or_default()
                .into_iter()
                .map(MenuItemId::new)
                .collect(),
            instructions: row.instructions,
            status,
            company_id: row.company_id.map(CompanyId::new),
            created_at: parse_timestamp(row.created_at.as_deref()),
        })
    }
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.as_i64(),
            user_id: order.user_id.map(|u| u.as_i64()),
            guest_name: order.guest_name.clone(),
            host_contact: order.host_contact.clone(),
            menu_id: order.menu_id.as_i64(),
            date: order.date.format("%Y-%m-%d").to_string(),
            item_ids: Some(order.item_ids.iter().map(|i| i.as_i64()).collect()),
            instructions: order.instructions.clone(),
            status: order.status.to_string(),
            company_id: order.company_id.map(|c| c.as_i64()),
            created_at: Some(order.created_at.to_rfc3339()),
        }
    }
}

// =============================================================================
// Feedback
// =============================================================================

impl TryFrom<MenuIssueRow> for MenuIssue {
    type Error = RowError;

    fn try_from(row: MenuIssueRow) -> Result<Self, Self::Error> {
        let status: IssueStatus = row
            .status
            .parse()
            .map_err(|_| RowError::new("status", &row.status))?;
        Ok(Self {
            id: IssueId::new(row.id),
            user_id: UserId::new(row.user_id),
            date: parse_date("date", &row.date)?,
            text: row.text,
            status,
            chef_response: row.chef_response,
            is_read: row.is_read.unwrap_or(false),
            created_at: parse_timestamp(row.created_at.as_deref()),
        })
    }
}

impl From<&MenuIssue> for MenuIssueRow {
    fn from(issue: &MenuIssue) -> Self {
        Self {
            id: issue.id.as_i64(),
            user_id: issue.user_id.as_i64(),
            date: issue.date.format("%Y-%m-%d").to_string(),
            text: issue.text.clone(),
            status: issue.status.to_string(),
            chef_response: issue.chef_response.clone(),
            is_read: Some(issue.is_read),
            created_at: Some(issue.created_at.to_rfc3339()),
        }
    }
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: CommentId::new(row.id),
            author_name: row.author_name,
            text: row.text,
            responses: row
                .responses
                .unwrap_or_default()
                .into_iter()
                .map(CommentResponse::from)
                .collect(),
            created_at: parse_timestamp(row.created_at.as_deref()),
        }
    }
}

impl From<CommentResponseRow> for CommentResponse {
    fn from(row: CommentResponseRow) -> Self {
        Self {
            author_name: row.author_name,
            text: row.text,
            created_at: parse_timestamp(row.created_at.as_deref()),
        }
    }
}

impl From<&Comment> for CommentRow {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.as_i64(),
            author_name: comment.author_name.clone(),
            text: comment.text.clone(),
            responses: Some(
                comment
                    .responses
                    .iter()
                    .map(|r| CommentResponseRow {
                        author_name: r.author_name.clone(),
                        text: r.text.clone(),
                        created_at: Some(r.created_at.to_rfc3339()),
                    })
                    .collect(),
            ),
            created_at: Some(comment.created_at.to_rfc3339()),
        }
    }
}

// =============================================================================
// Tenant settings
// =============================================================================

impl From<TenantSettingsRow> for TenantSettings {
    fn from(row: TenantSettingsRow) -> Self {
        let defaults = Self::default();
        Self {
            company_name: row.company_name,
            tagline: row.tagline,
            logo_url: row.logo_url,
            order_cutoff: row
                .order_cutoff
                .as_deref()
                .and_then(parse_cutoff)
                .unwrap_or(defaults.order_cutoff),
            guest_access: row
                .guest_access
                .as_deref()
                .and_then(|v| v.parse::<GuestAccessMode>().ok())
                .unwrap_or(defaults.guest_access),
            guest_passcode: row
                .guest_passcode
                .map_or(defaults.guest_passcode, GuestPasscode::from_string),
        }
    }
}

impl From<&TenantSettings> for TenantSettingsRow {
    fn from(settings: &TenantSettings) -> Self {
        Self {
            id: 1,
            company_name: settings.company_name.clone(),
            tagline: settings.tagline.clone(),
            logo_url: settings.logo_url.clone(),
            order_cutoff: Some(settings.order_cutoff.format("%H:%M").to_string()),
            guest_access: Some(settings.guest_access.to_string()),
            guest_passcode: Some(settings.guest_passcode.as_str().to_owned()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_row_roundtrip() {
        let row = UserRow {
            id: 7,
            username: "mlopez".to_owned(),
            email: "maria@example.com".to_owned(),
            display_name: Some("Maria Lopez".to_owned()),
            role: "kitchen".to_owned(),
            department_id: Some(2),
            company_id: None,
            is_locked: Some(true),
            created_at: Some("2025-03-10T08:00:00+00:00".to_owned()),
        };
        let user = User::try_from(row).unwrap();
        assert_eq!(user.role, Role::Kitchen);
        assert!(user.is_locked);
        assert!(user.company_id.is_none());

        let back = UserRow::from(&user);
        assert_eq!(back.id, 7);
        assert_eq!(back.role, "kitchen");
    }

    #[test]
    fn test_user_row_invalid_role_rejected() {
        let row = UserRow {
            id: 1,
            username: "x".to_owned(),
            email: "x@example.com".to_owned(),
            display_name: None,
            role: "chef".to_owned(),
            department_id: None,
            company_id: None,
            is_locked: None,
            created_at: None,
        };
        let err = User::try_from(row).unwrap_err();
        assert_eq!(err.field, "role");
    }

    #[test]
    fn test_menu_row_roundtrip() {
        let row = DailyMenuRow {
            id: 100,
            date: "2025-03-10".to_owned(),
            items: Some(vec![MenuItemRow {
                id: 1,
                name: "Lentil Soup".to_owned(),
                description: None,
                category: "soup".to_owned(),
                calories: Some(180),
                dietary_tags: Some(vec!["vegan".to_owned()]),
            }]),
            notes: Some("Chef's pick".to_owned()),
            department_id: None,
            company_id: Some(1),
        };
        let menu = DailyMenu::try_from(row).unwrap();
        assert_eq!(menu.items.len(), 1);
        assert_eq!(menu.date.to_string(), "2025-03-10");

        let back = DailyMenuRow::from(&menu);
        assert_eq!(back.date, "2025-03-10");
        assert_eq!(back.items.unwrap().len(), 1);
    }

    #[test]
    fn test_menu_row_bad_date_rejected() {
        let row = DailyMenuRow {
            id: 1,
            date: "10/03/2025".to_owned(),
            items: None,
            notes: None,
            department_id: None,
            company_id: None,
        };
        assert!(DailyMenu::try_from(row).is_err());
    }

    #[test]
    fn test_order_row_defaults() {
        let row = OrderRow {
            id: 5,
            user_id: None,
            guest_name: Some("Visitor".to_owned()),
            host_contact: Some("host@example.com".to_owned()),
            menu_id: 100,
            date: "2025-03-10".to_owned(),
            item_ids: None,
            instructions: None,
            status: "pending".to_owned(),
            company_id: None,
            created_at: None,
        };
        let order = Order::try_from(row).unwrap();
        assert!(order.is_guest());
        assert!(order.item_ids.is_empty());
        assert_eq!(order.created_at, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_settings_row_parses_cutoff() {
        let row = TenantSettingsRow {
            id: 1,
            company_name: "Acme".to_owned(),
            tagline: None,
            logo_url: None,
            order_cutoff: Some("09:45".to_owned()),
            guest_access: Some("open".to_owned()),
            guest_passcode: Some("GUEST-1234".to_owned()),
        };
        let settings = TenantSettings::from(row);
        assert_eq!(
            settings.order_cutoff,
            NaiveTime::from_hms_opt(9, 45, 0).unwrap()
        );
        assert_eq!(settings.guest_access, GuestAccessMode::Open);
    }

    #[test]
    fn test_settings_row_falls_back_on_garbage() {
        let row = TenantSettingsRow {
            id: 1,
            company_name: "Acme".to_owned(),
            tagline: None,
            logo_url: None,
            order_cutoff: Some("lunchtime".to_owned()),
            guest_access: Some("vip".to_owned()),
            guest_passcode: None,
        };
        let settings = TenantSettings::from(row);
        let defaults = TenantSettings::default();
        assert_eq!(settings.order_cutoff, defaults.order_cutoff);
        assert_eq!(settings.guest_access, defaults.guest_access);
        assert_eq!(settings.guest_passcode, defaults.guest_passcode);
    }
}
