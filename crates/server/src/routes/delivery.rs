//! Delivery view: today's orders grouped, batch delivered.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, RawForm, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Local;
use serde::Deserialize;
use tracing::instrument;

use lunchline_core::{OrderId, Role};

use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireUser, ensure};
use crate::services::delivery::group_for_delivery;
use crate::state::AppState;

use super::{NavContext, form_pairs, form_values, nav};

fn is_delivery(role: Role) -> bool {
    matches!(role, Role::Delivery | Role::Admin)
}

/// One order row in a delivery group.
pub struct DeliveryRow {
    pub who: String,
    pub items: usize,
    pub instructions: String,
    pub status: String,
}

/// One delivery group prepared for display.
pub struct GroupView {
    pub label: String,
    pub rows: Vec<DeliveryRow>,
    pub pending_ids: Vec<i64>,
}

/// Delivery page template.
#[derive(Template, WebTemplate)]
#[template(path = "delivery/index.html")]
pub struct DeliveryTemplate {
    pub nav: NavContext,
    pub date: String,
    pub groups: Vec<GroupView>,
    pub delivered: usize,
}

/// Delivery page query parameters.
#[derive(Debug, Deserialize)]
pub struct DeliveryQuery {
    pub delivered: Option<usize>,
}

/// Display today's orders grouped for delivery.
#[instrument(skip(state, principal))]
pub async fn index(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Query(query): Query<DeliveryQuery>,
) -> Result<Response> {
    ensure(&principal, is_delivery)?;

    let store = state.store();
    let today = Local::now().date_naive();
    let orders = store.orders_on(today).await;
    let users = store.users().await;

    let groups = group_for_delivery(&orders, today)
        .into_iter()
        .map(|group| GroupView {
            label: group.label.to_owned(),
            pending_ids: group.undelivered_ids().iter().map(|id| id.as_i64()).collect(),
            rows: group
                .orders
                .iter()
                .map(|order| DeliveryRow {
                    who: match order.user_id {
                        Some(user_id) => users
                            .iter()
                            .find(|u| u.id == user_id)
                            .map_or_else(|| format!("user {user_id}"), |u| u.display_name.clone()),
                        None => order.ordered_by().to_owned(),
                    },
                    items: order.item_ids.len(),
                    instructions: order.instructions.clone().unwrap_or_default(),
                    status: order.status.to_string(),
                })
                .collect(),
        })
        .collect();

    Ok(DeliveryTemplate {
        nav: nav(&state, &principal).await,
        date: today.format("%Y-%m-%d").to_string(),
        groups,
        delivered: query.delivered.unwrap_or(0),
    }
    .into_response())
}

/// Mark a group's undelivered orders as delivered in one action.
///
/// Locally this is one batch update; remotely it persists as N sequential
/// independent writes (see the store's batch semantics).
#[instrument(skip(state, principal, form))]
pub async fn deliver_group(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    RawForm(form): RawForm,
) -> Result<Response> {
    ensure(&principal, is_delivery)?;

    let pairs = form_pairs(&form);
    let ids: Vec<OrderId> = form_values(&pairs, "order_ids")
        .into_iter()
        .filter_map(|raw| raw.parse::<i64>().ok())
        .map(OrderId::new)
        .collect();

    let delivered = state.store().mark_batch_delivered(&ids).await;
    Ok(Redirect::to(&format!("/delivery?delivered={delivered}")).into_response())
}
