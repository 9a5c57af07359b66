//! Employee ordering: week strip, day menu, order placement, issues.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, RawForm, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{Datelike, Local, NaiveDate};
use serde::Deserialize;
use tracing::instrument;

use lunchline_core::{FoodCategory, MenuItemId, Role};

use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireUser, ensure};
use crate::models::{DailyMenu, MenuItem};
use crate::services::{schedule, summary};
use crate::state::AppState;
use crate::store::NewOrder;

use super::{NavContext, form_pairs, form_value, form_values, nav};

// =============================================================================
// View models
// =============================================================================

/// One tab in the week strip.
pub struct DayTab {
    pub date: String,
    pub label: String,
    pub selected: bool,
    pub has_menu: bool,
}

/// A menu item prepared for display.
pub struct ItemView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub calories: u32,
    pub tags: String,
}

impl From<&MenuItem> for ItemView {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id.as_i64(),
            name: item.name.clone(),
            description: item.description.clone(),
            calories: item.calories,
            tags: item.dietary_tags.join(", "),
        }
    }
}

/// Items of one category on the day menu.
pub struct CategoryGroup {
    pub label: &'static str,
    pub items: Vec<ItemView>,
}

/// Group a menu's items by category, omitting empty categories.
pub(crate) fn category_groups(menu: &DailyMenu) -> Vec<CategoryGroup> {
    FoodCategory::ALL
        .iter()
        .filter_map(|category| {
            let items: Vec<ItemView> = menu
                .items_in(*category)
                .into_iter()
                .map(ItemView::from)
                .collect();
            if items.is_empty() {
                None
            } else {
                Some(CategoryGroup {
                    label: category.label(),
                    items,
                })
            }
        })
        .collect()
}

/// Week view template.
#[derive(Template, WebTemplate)]
#[template(path = "menu/week.html")]
pub struct WeekTemplate {
    pub nav: NavContext,
    pub week_index: i32,
    pub prev_week: i32,
    pub next_week: i32,
    pub days: Vec<DayTab>,
    pub selected_date: String,
    pub locked: bool,
    pub cutoff_label: String,
    pub has_menu: bool,
    pub notes: String,
    pub categories: Vec<CategoryGroup>,
    pub has_order: bool,
    pub order_status: String,
    pub summary_count: usize,
    pub summary_calories: u32,
    pub summary_tags: String,
    pub placed: bool,
    pub issue_sent: bool,
    pub error: String,
}

/// Query parameters of the week view.
#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub week: Option<i32>,
    pub day: Option<String>,
    pub placed: Option<u8>,
    pub issue: Option<String>,
    pub err: Option<String>,
}

fn error_message(code: &str) -> String {
    match code {
        "cutoff" => "Ordering for today closed at the cutoff time.".to_owned(),
        "noitems" => "Pick at least one item from the menu.".to_owned(),
        "nomenu" => "There is no menu published for that day.".to_owned(),
        "issuetext" => "Describe the issue before sending it.".to_owned(),
        _ => String::new(),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the week strip and the selected day's menu.
#[instrument(skip(state, principal))]
pub async fn week(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Query(query): Query<WeekQuery>,
) -> Result<Response> {
    ensure(&principal, Role::places_orders)?;

    let store = state.store();
    let settings = store.settings().await;
    let today = Local::now().date_naive();
    let now_time = Local::now().time();

    let week_index = query.week.unwrap_or(0);
    let monday = schedule::week_start(today, week_index);
    let week_all = schedule::week_dates(monday);
    let with_menu = store.menu_dates_in(&week_all, principal.company_id).await;
    let visible = schedule::visible_week(&week_all, |d| with_menu.contains(&d));

    // Selected day: the query's if it is in the strip, else today if it is,
    // else the first day of the strip.
    let requested = query
        .day
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
    let selected = requested
        .filter(|d| visible.contains(d))
        .or_else(|| visible.contains(&today).then_some(today))
        .or_else(|| visible.first().copied())
        .unwrap_or(today);

    let menu = store.menu_on(selected, principal.company_id).await;
    let locked = schedule::is_cutoff_locked(selected, today, now_time, settings.order_cutoff);

    let days = visible
        .iter()
        .map(|d| DayTab {
            date: d.format("%Y-%m-%d").to_string(),
            label: format!("{} {}", schedule::day_label(d.weekday()), d.day()),
            selected: *d == selected,
            has_menu: with_menu.contains(d),
        })
        .collect();

    // Existing order for the day feeds the summary block
    let order = match principal.user_id {
        Some(user_id) => store.order_for_user_on(user_id, selected).await,
        None => None,
    };
    let (has_order, order_status, meal) = match (&order, &menu) {
        (Some(order), Some(menu)) => {
            let items: Vec<&MenuItem> = order
                .item_ids
                .iter()
                .filter_map(|id| menu.item(*id))
                .collect();
            (
                true,
                order.status.to_string(),
                summary::summarize(items.into_iter()),
            )
        }
        (Some(order), None) => (
            true,
            order.status.to_string(),
            summary::summarize(std::iter::empty()),
        ),
        (None, _) => (false, String::new(), summary::summarize(std::iter::empty())),
    };

    let template = WeekTemplate {
        nav: nav(&state, &principal).await,
        week_index,
        prev_week: week_index - 1,
        next_week: week_index + 1,
        days,
        selected_date: selected.format("%Y-%m-%d").to_string(),
        locked,
        cutoff_label: settings.order_cutoff.format("%H:%M").to_string(),
        has_menu: menu.is_some(),
        notes: menu
            .as_ref()
            .and_then(|m| m.notes.clone())
            .unwrap_or_default(),
        categories: menu.as_ref().map(category_groups).unwrap_or_default(),
        has_order,
        order_status,
        summary_count: meal.item_count,
        summary_calories: meal.total_calories,
        summary_tags: meal.dietary_tags.join(", "),
        placed: query.placed == Some(1),
        issue_sent: query.issue.as_deref() == Some("sent"),
        error: query.err.as_deref().map(error_message).unwrap_or_default(),
    };
    Ok(template.into_response())
}

/// Place an order for the selected day.
#[instrument(skip(state, principal, form))]
pub async fn place_order(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    RawForm(form): RawForm,
) -> Result<Response> {
    ensure(&principal, Role::places_orders)?;

    let pairs = form_pairs(&form);
    let week = form_value(&pairs, "week").unwrap_or("0");
    let Some(date) = form_value(&pairs, "date")
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    else {
        return Ok(Redirect::to("/menu?err=nomenu").into_response());
    };

    let back = |suffix: &str| {
        Redirect::to(&format!("/menu?week={week}&day={}{suffix}", date.format("%Y-%m-%d")))
            .into_response()
    };

    let store = state.store();
    let settings = store.settings().await;
    let today = Local::now().date_naive();

    // Only "today" is time-gated; other dates are never cutoff-locked
    if schedule::is_cutoff_locked(date, today, Local::now().time(), settings.order_cutoff) {
        return Ok(back("&err=cutoff"));
    }

    let Some(menu) = store.menu_on(date, principal.company_id).await else {
        return Ok(back("&err=nomenu"));
    };

    // Keep only ids that are actually on the day's menu
    let item_ids: Vec<MenuItemId> = form_values(&pairs, "items")
        .into_iter()
        .filter_map(|raw| raw.parse::<i64>().ok())
        .map(MenuItemId::new)
        .filter(|id| menu.item(*id).is_some())
        .collect();
    if item_ids.is_empty() {
        return Ok(back("&err=noitems"));
    }

    let instructions = form_value(&pairs, "instructions").map(str::to_owned);
    store
        .place_order(NewOrder {
            user_id: principal.user_id,
            guest_name: None,
            host_contact: None,
            menu_id: menu.id,
            date,
            item_ids,
            instructions,
            company_id: menu.company_id,
        })
        .await;

    Ok(back("&placed=1"))
}

/// Issue report form data.
#[derive(Debug, Deserialize)]
pub struct IssueForm {
    pub date: String,
    pub week: Option<i32>,
    pub text: String,
}

/// Report an issue with a day's menu.
#[instrument(skip(state, principal, form))]
pub async fn report_issue(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<IssueForm>,
) -> Result<Response> {
    ensure(&principal, Role::places_orders)?;

    let week = form.week.unwrap_or(0);
    let date = NaiveDate::parse_from_str(&form.date, "%Y-%m-%d")
        .unwrap_or_else(|_| Local::now().date_naive());
    let day = date.format("%Y-%m-%d");

    let Some(user_id) = principal.user_id else {
        return Ok(Redirect::to("/menu").into_response());
    };

    let result = state.store().report_issue(user_id, date, &form.text).await;
    let target = if result.is_some() {
        format!("/menu?week={week}&day={day}&issue=sent")
    } else {
        format!("/menu?week={week}&day={day}&err=issuetext")
    };
    Ok(Redirect::to(&target).into_response())
}

// =============================================================================
// Own order history
// =============================================================================

/// One row of the order history.
pub struct OrderHistoryRow {
    pub date: String,
    pub status: String,
    pub items: String,
    pub instructions: String,
}

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "menu/orders.html")]
pub struct MyOrdersTemplate {
    pub nav: NavContext,
    pub orders: Vec<OrderHistoryRow>,
}

/// Display the logged-in user's order history.
#[instrument(skip(state, principal))]
pub async fn my_orders(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
) -> Result<Response> {
    ensure(&principal, Role::places_orders)?;

    let store = state.store();
    let menus = store.menus_all().await;
    let orders = match principal.user_id {
        Some(user_id) => store.orders_for_user(user_id).await,
        None => Vec::new(),
    };

    let rows = orders
        .iter()
        .map(|order| {
            let names: Vec<String> = menus
                .iter()
                .find(|m| m.id == order.menu_id)
                .map(|menu| {
                    order
                        .item_ids
                        .iter()
                        .filter_map(|id| menu.item(*id))
                        .map(|i| i.name.clone())
                        .collect()
                })
                .unwrap_or_default();
            OrderHistoryRow {
                date: order.date.format("%Y-%m-%d").to_string(),
                status: order.status.to_string(),
                items: if names.is_empty() {
                    format!("{} item(s)", order.item_ids.len())
                } else {
                    names.join(", ")
                },
                instructions: order.instructions.clone().unwrap_or_default(),
            }
        })
        .collect();

    Ok(MyOrdersTemplate {
        nav: nav(&state, &principal).await,
        orders: rows,
    }
    .into_response())
}
