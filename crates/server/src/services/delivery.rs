//! Delivery grouping.

use chrono::NaiveDate;

use crate::models::Order;

/// Bucket label for guest-portal orders.
pub const GUEST_BUCKET: &str = "Guests";

/// Bucket label for staff orders.
// TODO: resolve real departments from the ordering user's department_id
// once product confirms the intended grouping; until then every staff
// order lands in this one bucket.
pub const STAFF_BUCKET: &str = "All departments";

/// One delivery group: a label and its orders.
#[derive(Debug, Clone)]
pub struct DeliveryGroup {
    pub label: &'static str,
    pub orders: Vec<Order>,
}

impl DeliveryGroup {
    /// Ids of orders in this group that can still be marked delivered.
    #[must_use]
    pub fn undelivered_ids(&self) -> Vec<lunchline_core::OrderId> {
        self.orders
            .iter()
            .filter(|o| {
                o.status
                    .allows_transition_to(lunchline_core::OrderStatus::Delivered)
            })
            .map(|o| o.id)
            .collect()
    }
}

/// Group a day's non-cancelled orders for the delivery view.
///
/// Guest orders bucket separately; staff orders collapse into one generic
/// bucket. Empty buckets are omitted.
#[must_use]
pub fn group_for_delivery(orders: &[Order], date: NaiveDate) -> Vec<DeliveryGroup> {
    let mut staff: Vec<Order> = Vec::new();
    let mut guests: Vec<Order> = Vec::new();

    for order in orders {
        if order.date != date || !order.status.is_active() {
            continue;
        }
        if order.is_guest() {
            guests.push(order.clone());
        } else {
            staff.push(order.clone());
        }
    }

    let mut groups = Vec::new();
    if !staff.is_empty() {
        groups.push(DeliveryGroup {
            label: STAFF_BUCKET,
            orders: staff,
        });
    }
    if !guests.is_empty() {
        groups.push(DeliveryGroup {
            label: GUEST_BUCKET,
            orders: guests,
        });
    }
    groups
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lunchline_core::{MenuId, OrderId, OrderStatus, UserId};

    fn order(id: i64, user: Option<i64>, date: NaiveDate, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(id),
            user_id: user.map(UserId::new),
            guest_name: user.is_none().then(|| format!("Guest {id}")),
            host_contact: None,
            menu_id: MenuId::new(1),
            date,
            item_ids: vec![],
            instructions: None,
            status,
            company_id: None,
            created_at: Utc::now(),
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_guests_bucket_separately_staff_collapse() {
        let orders = vec![
            order(1, Some(1), date(10), OrderStatus::Pending),
            order(2, Some(2), date(10), OrderStatus::Confirmed),
            order(3, None, date(10), OrderStatus::Pending),
        ];
        let groups = group_for_delivery(&orders, date(10));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.first().unwrap().label, STAFF_BUCKET);
        assert_eq!(groups.first().unwrap().orders.len(), 2);
        assert_eq!(groups.last().unwrap().label, GUEST_BUCKET);
        assert_eq!(groups.last().unwrap().orders.len(), 1);
    }

    #[test]
    fn test_cancelled_and_other_dates_excluded() {
        let orders = vec![
            order(1, Some(1), date(10), OrderStatus::Cancelled),
            order(2, Some(2), date(11), OrderStatus::Pending),
        ];
        assert!(group_for_delivery(&orders, date(10)).is_empty());
    }

    #[test]
    fn test_undelivered_ids_skip_delivered() {
        let group = DeliveryGroup {
            label: STAFF_BUCKET,
            orders: vec![
                order(1, Some(1), date(10), OrderStatus::Pending),
                order(2, Some(2), date(10), OrderStatus::Delivered),
            ],
        };
        assert_eq!(group.undelivered_ids(), vec![OrderId::new(1)]);
    }
}
