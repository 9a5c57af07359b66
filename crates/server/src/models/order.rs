//! Order record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use lunchline_core::{CompanyId, MenuId, MenuItemId, OrderId, OrderStatus, UserId};

/// A placed lunch order.
///
/// Either `user_id` is set (employee/staff order) or the guest fields are
/// (guest-portal order); never both. Orders reference the daily menu they
/// were placed against and carry the selected item ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub guest_name: Option<String>,
    pub host_contact: Option<String>,
    pub menu_id: MenuId,
    pub date: NaiveDate,
    pub item_ids: Vec<MenuItemId>,
    pub instructions: Option<String>,
    pub status: OrderStatus,
    pub company_id: Option<CompanyId>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Whether this order came in through the guest portal.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        self.user_id.is_none()
    }

    /// Display name for fulfillment views.
    #[must_use]
    pub fn ordered_by(&self) -> &str {
        self.guest_name.as_deref().unwrap_or("")
    }
}
