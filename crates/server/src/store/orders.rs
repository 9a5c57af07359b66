//! Order operations.

use chrono::{NaiveDate, Utc};

use lunchline_core::{CompanyId, MenuId, MenuItemId, OrderId, OrderStatus, UserId};

use crate::models::Order;

use super::{Store, next_time_id};

/// Input for placing an order.
///
/// Either `user_id` or the guest fields are set, never both; routes enforce
/// this by construction (staff flow vs guest flow).
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Option<UserId>,
    pub guest_name: Option<String>,
    pub host_contact: Option<String>,
    pub menu_id: MenuId,
    pub date: NaiveDate,
    pub item_ids: Vec<MenuItemId>,
    pub instructions: Option<String>,
    pub company_id: Option<CompanyId>,
}

impl Store {
    // =========================================================================
    // Selectors
    // =========================================================================

    /// All orders (all tenants, all dates).
    pub async fn orders_all(&self) -> Vec<Order> {
        self.inner.read().await.orders.clone()
    }

    /// Orders placed for a given date.
    pub async fn orders_on(&self, date: NaiveDate) -> Vec<Order> {
        self.inner
            .read()
            .await
            .orders
            .iter()
            .filter(|o| o.date == date)
            .cloned()
            .collect()
    }

    /// Orders placed by one user, newest first.
    pub async fn orders_for_user(&self, user: UserId) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .inner
            .read()
            .await
            .orders
            .iter()
            .filter(|o| o.user_id == Some(user))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// The order a user placed for a given date, if any.
    pub async fn order_for_user_on(&self, user: UserId, date: NaiveDate) -> Option<Order> {
        self.inner
            .read()
            .await
            .orders
            .iter()
            .find(|o| o.user_id == Some(user) && o.date == date && o.status.is_active())
            .cloned()
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Create an order (status `Pending`, time-derived id).
    pub async fn place_order(&self, new: NewOrder) -> Order {
        let order = {
            let mut c = self.inner.write().await;
            let order = Order {
                id: OrderId::new(next_time_id(&c.orders, |o| o.id.as_i64())),
                user_id: new.user_id,
                guest_name: new.guest_name,
                host_contact: new.host_contact,
                menu_id: new.menu_id,
                date: new.date,
                item_ids: new.item_ids,
                instructions: new.instructions.filter(|s| !s.trim().is_empty()),
                status: OrderStatus::Pending,
                company_id: new.company_id,
                created_at: Utc::now(),
            };
            c.orders.push(order.clone());
            order
        };

        if let Some(backend) = self.backend.clone() {
            let order = order.clone();
            tokio::spawn(async move {
                if let Err(e) = backend.upsert_order(&order).await {
                    tracing::error!("failed to persist order {}: {e}", order.id);
                }
            });
        }
        order
    }

    /// Move an order to `next`, enforcing the forward-only lifecycle.
    ///
    /// Returns `false` (with a warning) when the order is unknown or the
    /// transition would move backward; bad input never panics.
    pub async fn update_order_status(&self, id: OrderId, next: OrderStatus) -> bool {
        {
            let mut c = self.inner.write().await;
            let Some(order) = c.orders.iter_mut().find(|o| o.id == id) else {
                tracing::warn!(order = %id, "status update for unknown order");
                return false;
            };
            if !order.status.allows_transition_to(next) {
                tracing::warn!(
                    order = %id,
                    from = %order.status,
                    to = %next,
                    "rejected non-forward status transition"
                );
                return false;
            }
            order.status = next;
        }

        if let Some(backend) = self.backend.clone() {
            tokio::spawn(async move {
                if let Err(e) = backend.set_order_status(id, next).await {
                    tracing::error!("failed to persist status of order {id}: {e}");
                }
            });
        }
        true
    }

    /// Cancel an order (terminal; rejected once delivered).
    pub async fn cancel_order(&self, id: OrderId) -> bool {
        self.update_order_status(id, OrderStatus::Cancelled).await
    }

    /// Mark a batch of orders delivered.
    ///
    /// Applied locally as one batch update under a single lock acquisition;
    /// persisted remotely as N sequential independent writes with no
    /// atomicity. A partial remote failure leaves local and remote state
    /// diverged until the next full reload.
    pub async fn mark_batch_delivered(&self, ids: &[OrderId]) -> usize {
        let delivered: Vec<OrderId> = {
            let mut c = self.inner.write().await;
            ids.iter()
                .copied()
                .filter(|id| {
                    c.orders
                        .iter_mut()
                        .find(|o| o.id == *id)
                        .is_some_and(|order| {
                            if order.status.allows_transition_to(OrderStatus::Delivered) {
                                order.status = OrderStatus::Delivered;
                                true
                            } else {
                                false
                            }
                        })
                })
                .collect()
        };

        if let Some(backend) = self.backend.clone() {
            let ids = delivered.clone();
            tokio::spawn(async move {
                for id in ids {
                    if let Err(e) = backend.set_order_status(id, OrderStatus::Delivered).await {
                        tracing::error!("failed to persist delivery of order {id}: {e}");
                    }
                }
            });
        }

        tracing::info!(count = delivered.len(), "batch delivered");
        delivered.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::tests::offline_store;
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn new_order(user: i64) -> NewOrder {
        NewOrder {
            user_id: Some(UserId::new(user)),
            guest_name: None,
            host_contact: None,
            menu_id: MenuId::new(1),
            date: date(),
            item_ids: vec![MenuItemId::new(1)],
            instructions: None,
            company_id: None,
        }
    }

    #[tokio::test]
    async fn test_place_order_starts_pending() {
        let store = offline_store();
        let order = store.place_order(new_order(1)).await;
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(store.orders_on(date()).await.len(), 1);
    }

    #[tokio::test]
    async fn test_blank_instructions_dropped() {
        let store = offline_store();
        let mut new = new_order(1);
        new.instructions = Some("   ".to_owned());
        let order = store.place_order(new).await;
        assert!(order.instructions.is_none());
    }

    #[tokio::test]
    async fn test_forward_transition_applied_backward_rejected() {
        let store = offline_store();
        let order = store.place_order(new_order(1)).await;

        assert!(store.update_order_status(order.id, OrderStatus::Confirmed).await);
        assert!(!store.update_order_status(order.id, OrderStatus::Pending).await);

        let current = store.orders_all().await.into_iter().next().unwrap();
        assert_eq!(current.status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_unknown_order_rejected() {
        let store = offline_store();
        assert!(!store.update_order_status(OrderId::new(42), OrderStatus::Confirmed).await);
    }

    #[tokio::test]
    async fn test_mark_batch_delivered_updates_all_locally() {
        let store = offline_store();
        let o1 = store.place_order(new_order(1)).await;
        let o2 = store.place_order(new_order(2)).await;
        let cancelled = store.place_order(new_order(3)).await;
        store.cancel_order(cancelled.id).await;

        // the batch runs with no backend at all (the degenerate case of
        // every remote write failing) - local state must still update
        let count = store
            .mark_batch_delivered(&[o1.id, o2.id, cancelled.id, OrderId::new(999)])
            .await;
        assert_eq!(count, 2);

        let orders = store.orders_all().await;
        let status_of = |id: OrderId| orders.iter().find(|o| o.id == id).unwrap().status;
        assert_eq!(status_of(o1.id), OrderStatus::Delivered);
        assert_eq!(status_of(o2.id), OrderStatus::Delivered);
        assert_eq!(status_of(cancelled.id), OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_order_for_user_on_skips_cancelled() {
        let store = offline_store();
        let order = store.place_order(new_order(1)).await;
        assert!(store.order_for_user_on(UserId::new(1), date()).await.is_some());

        store.cancel_order(order.id).await;
        assert!(store.order_for_user_on(UserId::new(1), date()).await.is_none());
    }
}
