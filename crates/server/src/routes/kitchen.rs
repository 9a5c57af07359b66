//! Kitchen views: menu composer, catalog, templates, AI ideas,
//! fulfillment, issues, and the feedback board.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, RawForm, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::instrument;

use lunchline_core::{
    FoodCategory, IssueId, IssueStatus, MasterItemId, OrderId, OrderStatus, Role, TemplateId,
};

use crate::ai::SuggestedItem;
use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireUser, ensure};
use crate::models::{MasterFoodItem, Principal};
use crate::state::AppState;

use super::{NavContext, form_pairs, form_value, form_values, nav};

// =============================================================================
// Composer
// =============================================================================

/// A catalog item with its selection state for a date.
pub struct ComposerItem {
    pub id: i64,
    pub name: String,
    pub calories: u32,
    pub tags: String,
    pub selected: bool,
}

/// Catalog items of one category.
pub struct ComposerCategory {
    pub label: &'static str,
    pub items: Vec<ComposerItem>,
}

/// A saved template row.
pub struct TemplateRow {
    pub id: i64,
    pub name: String,
    pub item_count: usize,
    pub shared: bool,
}

/// An AI suggestion prepared for the accept form.
pub struct SuggestionRow {
    pub name: String,
    pub description: String,
    pub category: String,
    pub calories: u32,
    pub tags: String,
}

impl From<&SuggestedItem> for SuggestionRow {
    fn from(item: &SuggestedItem) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            category: item.category.to_string(),
            calories: item.calories,
            tags: item.dietary_tags.join(", "),
        }
    }
}

/// Menu composer template.
#[derive(Template, WebTemplate)]
#[template(path = "kitchen/composer.html")]
pub struct ComposerTemplate {
    pub nav: NavContext,
    pub date: String,
    pub notes: String,
    pub has_menu: bool,
    pub categories: Vec<ComposerCategory>,
    pub menu_dates: Vec<String>,
    pub templates: Vec<TemplateRow>,
    pub suggestions: Vec<SuggestionRow>,
    pub ai_enabled: bool,
    pub flash: String,
}

/// Composer query parameters.
#[derive(Debug, Deserialize)]
pub struct ComposerQuery {
    pub date: Option<String>,
    pub flash: Option<String>,
}

fn parse_date_or_today(raw: Option<&str>) -> NaiveDate {
    raw.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .unwrap_or_else(|| Local::now().date_naive())
}

fn flash_message(code: &str) -> String {
    match code {
        "saved" => "Menu saved.".to_owned(),
        "copied" => "Menu copied onto the selected date.".to_owned(),
        "nocopy" => "The source date has no menu to copy.".to_owned(),
        "applied" => "Template applied.".to_owned(),
        "noapply" => "That template could not be applied.".to_owned(),
        "tsaved" => "Template saved.".to_owned(),
        "tnosave" => "Publish a menu for the date before saving it as a template.".to_owned(),
        "tdeleted" => "Template deleted.".to_owned(),
        "noai" => "AI suggestions are not configured on this server.".to_owned(),
        "aifail" => "The idea generator is unavailable right now.".to_owned(),
        _ => String::new(),
    }
}

async fn build_composer(
    state: &AppState,
    principal: &Principal,
    date: NaiveDate,
    suggestions: Vec<SuggestionRow>,
    flash: String,
) -> ComposerTemplate {
    let store = state.store();
    let menu = store.menu_on(date, principal.company_id).await;
    let selected_ids: Vec<i64> = menu
        .as_ref()
        .map(|m| m.items.iter().map(|i| i.id.as_i64()).collect())
        .unwrap_or_default();

    let catalog = store.master_items().await;
    let categories = FoodCategory::ALL
        .iter()
        .map(|category| ComposerCategory {
            label: category.label(),
            items: catalog
                .iter()
                .filter(|i| i.category == *category && i.is_available)
                .map(|i| ComposerItem {
                    id: i.id.as_i64(),
                    name: i.name.clone(),
                    calories: i.calories,
                    tags: i.dietary_tags.join(", "),
                    selected: selected_ids.contains(&i.id.as_i64()),
                })
                .collect(),
        })
        .collect();

    let mut menu_dates: Vec<NaiveDate> = store
        .menus_all()
        .await
        .iter()
        .filter(|m| m.date != date)
        .map(|m| m.date)
        .collect();
    menu_dates.sort_unstable();
    menu_dates.dedup();
    menu_dates.reverse();

    let templates = match principal.user_id {
        Some(user_id) => store
            .templates_for(user_id)
            .await
            .iter()
            .map(|t| TemplateRow {
                id: t.id.as_i64(),
                name: t.name.clone(),
                item_count: t.items.len(),
                shared: t.is_shared,
            })
            .collect(),
        None => Vec::new(),
    };

    ComposerTemplate {
        nav: nav(state, principal).await,
        date: date.format("%Y-%m-%d").to_string(),
        notes: menu
            .as_ref()
            .and_then(|m| m.notes.clone())
            .unwrap_or_default(),
        has_menu: menu.is_some(),
        categories,
        menu_dates: menu_dates
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect(),
        templates,
        suggestions,
        ai_enabled: state.ideas().is_some(),
        flash,
    }
}

/// Display the menu composer.
#[instrument(skip(state, principal))]
pub async fn composer(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Query(query): Query<ComposerQuery>,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;

    let date = parse_date_or_today(query.date.as_deref());
    let flash = query.flash.as_deref().map(flash_message).unwrap_or_default();
    Ok(build_composer(&state, &principal, date, Vec::new(), flash)
        .await
        .into_response())
}

/// Publish (or replace) a day's menu from the composer form.
#[instrument(skip(state, principal, form))]
pub async fn publish_menu(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    RawForm(form): RawForm,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;

    let pairs = form_pairs(&form);
    let date = parse_date_or_today(form_value(&pairs, "date"));
    let notes = form_value(&pairs, "notes")
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_owned);

    let store = state.store();
    let catalog = store.master_items().await;
    // resolve the posted ids against the catalog; unknown ids are dropped
    let items: Vec<_> = form_values(&pairs, "items")
        .into_iter()
        .filter_map(|raw| raw.parse::<i64>().ok())
        .map(MasterItemId::new)
        .filter_map(|id| catalog.iter().find(|i| i.id == id))
        .map(MasterFoodItem::to_menu_item)
        .collect();

    store
        .compose_menu(date, Some(principal.company_id), None, items, notes)
        .await;

    Ok(redirect_composer(date, "saved"))
}

fn redirect_composer(date: NaiveDate, flash: &str) -> Response {
    Redirect::to(&format!(
        "/kitchen?date={}&flash={flash}",
        date.format("%Y-%m-%d")
    ))
    .into_response()
}

/// Copy form data.
#[derive(Debug, Deserialize)]
pub struct CopyForm {
    pub src_date: String,
    pub tgt_date: String,
}

/// Copy a day's menu onto another date.
#[instrument(skip(state, principal, form))]
pub async fn copy_menu(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<CopyForm>,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;

    let src = parse_date_or_today(Some(&form.src_date));
    let tgt = parse_date_or_today(Some(&form.tgt_date));
    let copied = state
        .store()
        .copy_menu_from_date(src, tgt, Some(principal.company_id))
        .await;

    Ok(redirect_composer(
        tgt,
        if copied.is_some() { "copied" } else { "nocopy" },
    ))
}

/// Template save form data.
#[derive(Debug, Deserialize)]
pub struct SaveTemplateForm {
    pub name: String,
    pub date: String,
    pub shared: Option<String>,
}

/// Snapshot a date's menu as a reusable template.
#[instrument(skip(state, principal, form))]
pub async fn save_template(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<SaveTemplateForm>,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;

    let date = parse_date_or_today(Some(&form.date));
    let name = form.name.trim();
    let Some(user_id) = principal.user_id else {
        return Ok(redirect_composer(date, "tnosave"));
    };
    if name.is_empty() {
        return Ok(redirect_composer(date, "tnosave"));
    }

    let saved = state
        .store()
        .save_template(
            name.to_owned(),
            date,
            Some(principal.company_id),
            user_id,
            form.shared.is_some(),
        )
        .await;

    Ok(redirect_composer(
        date,
        if saved.is_some() { "tsaved" } else { "tnosave" },
    ))
}

/// Template apply form data.
#[derive(Debug, Deserialize)]
pub struct ApplyTemplateForm {
    pub template_id: i64,
    pub date: String,
}

/// Apply a template onto a date.
#[instrument(skip(state, principal, form))]
pub async fn apply_template(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<ApplyTemplateForm>,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;

    let date = parse_date_or_today(Some(&form.date));
    let Some(user_id) = principal.user_id else {
        return Ok(redirect_composer(date, "noapply"));
    };

    let applied = state
        .store()
        .apply_template(
            TemplateId::new(form.template_id),
            date,
            Some(principal.company_id),
            user_id,
        )
        .await;

    Ok(redirect_composer(
        date,
        if applied.is_some() { "applied" } else { "noapply" },
    ))
}

/// Template delete form data.
#[derive(Debug, Deserialize)]
pub struct DeleteTemplateForm {
    pub template_id: i64,
    pub date: String,
}

/// Delete a template.
#[instrument(skip(state, principal, form))]
pub async fn delete_template(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<DeleteTemplateForm>,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;

    state
        .store()
        .delete_template(TemplateId::new(form.template_id))
        .await;
    Ok(redirect_composer(
        parse_date_or_today(Some(&form.date)),
        "tdeleted",
    ))
}

// =============================================================================
// AI ideas
// =============================================================================

/// Idea generation form data.
#[derive(Debug, Deserialize)]
pub struct IdeasForm {
    pub theme: String,
    pub count: Option<usize>,
    pub date: String,
}

/// Generate menu ideas for a cuisine theme.
///
/// Renders the composer directly (no redirect) so the suggestions survive.
/// Failures degrade to an empty list with a flash - they are never errors.
#[instrument(skip(state, principal, form))]
pub async fn generate_ideas(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<IdeasForm>,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;

    let date = parse_date_or_today(Some(&form.date));
    let count = form.count.unwrap_or(5).clamp(1, 12);

    let Some(ideas) = state.ideas() else {
        let template =
            build_composer(&state, &principal, date, Vec::new(), flash_message("noai")).await;
        return Ok(template.into_response());
    };

    let (suggestions, flash) = match ideas.suggest_menu_items(form.theme.trim(), count).await {
        Ok(items) => (items.iter().map(SuggestionRow::from).collect(), String::new()),
        Err(e) => {
            tracing::warn!("menu idea generation failed: {e}");
            (Vec::new(), flash_message("aifail"))
        }
    };

    let template = build_composer(&state, &principal, date, suggestions, flash).await;
    Ok(template.into_response())
}

/// Accept-suggestion form data.
#[derive(Debug, Deserialize)]
pub struct AcceptIdeaForm {
    pub name: String,
    pub description: String,
    pub category: String,
    pub calories: u32,
    pub tags: String,
}

/// Accept an AI suggestion into the master catalog.
#[instrument(skip(state, principal, form))]
pub async fn accept_idea(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<AcceptIdeaForm>,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;

    let category = form
        .category
        .parse::<FoodCategory>()
        .unwrap_or(FoodCategory::Main);
    state
        .store()
        .create_master_item(MasterFoodItem {
            id: MasterItemId::new(0),
            name: form.name,
            description: form.description,
            category,
            calories: form.calories,
            dietary_tags: split_tags(&form.tags),
            is_available: true,
            company_id: Some(principal.company_id),
        })
        .await;

    Ok(Redirect::to("/kitchen/items?flash=created").into_response())
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

// =============================================================================
// Master catalog
// =============================================================================

/// One catalog row.
pub struct CatalogRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub calories: u32,
    pub tags: String,
    pub available: bool,
}

/// A category option for the select element.
pub struct CategoryOption {
    pub value: String,
    pub label: &'static str,
    pub selected: bool,
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "kitchen/items.html")]
pub struct ItemsTemplate {
    pub nav: NavContext,
    pub items: Vec<CatalogRow>,
    pub editing: bool,
    pub edit_id: i64,
    pub edit_name: String,
    pub edit_description: String,
    pub edit_calories: u32,
    pub edit_tags: String,
    pub category_options: Vec<CategoryOption>,
    pub flash: String,
}

/// Catalog query parameters.
#[derive(Debug, Deserialize)]
pub struct ItemsQuery {
    pub edit: Option<i64>,
    pub flash: Option<String>,
}

fn items_flash(code: &str) -> String {
    match code {
        "created" => "Catalog item created.".to_owned(),
        "updated" => "Catalog item updated.".to_owned(),
        "deleted" => "Catalog item deleted.".to_owned(),
        _ => String::new(),
    }
}

/// Display the master catalog (optionally with an item in the edit form).
#[instrument(skip(state, principal))]
pub async fn items(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Query(query): Query<ItemsQuery>,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;

    let store = state.store();
    let catalog = store.master_items().await;
    let rows = catalog
        .iter()
        .map(|i| CatalogRow {
            id: i.id.as_i64(),
            name: i.name.clone(),
            description: i.description.clone(),
            category: i.category.label().to_owned(),
            calories: i.calories,
            tags: i.dietary_tags.join(", "),
            available: i.is_available,
        })
        .collect();

    let edited = query
        .edit
        .map(MasterItemId::new)
        .and_then(|id| catalog.iter().find(|i| i.id == id).cloned());
    let edit_category = edited.as_ref().map(|i| i.category);

    let template = ItemsTemplate {
        nav: nav(&state, &principal).await,
        items: rows,
        editing: edited.is_some(),
        edit_id: edited.as_ref().map_or(0, |i| i.id.as_i64()),
        edit_name: edited.as_ref().map(|i| i.name.clone()).unwrap_or_default(),
        edit_description: edited
            .as_ref()
            .map(|i| i.description.clone())
            .unwrap_or_default(),
        edit_calories: edited.as_ref().map_or(0, |i| i.calories),
        edit_tags: edited
            .as_ref()
            .map(|i| i.dietary_tags.join(", "))
            .unwrap_or_default(),
        category_options: FoodCategory::ALL
            .iter()
            .map(|c| CategoryOption {
                value: c.to_string(),
                label: c.label(),
                selected: edit_category == Some(*c),
            })
            .collect(),
        flash: query.flash.as_deref().map(items_flash).unwrap_or_default(),
    };
    Ok(template.into_response())
}

/// Catalog create/update form data.
#[derive(Debug, Deserialize)]
pub struct ItemForm {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub category: String,
    pub calories: u32,
    pub tags: String,
    pub available: Option<String>,
}

/// Create or update a catalog item.
#[instrument(skip(state, principal, form))]
pub async fn upsert_item(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<ItemForm>,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;

    let name = form.name.trim().to_owned();
    if name.is_empty() {
        return Ok(Redirect::to("/kitchen/items").into_response());
    }
    let category = form
        .category
        .parse::<FoodCategory>()
        .unwrap_or(FoodCategory::Main);

    let store = state.store();
    let existing = form.id.filter(|id| *id != 0).map(MasterItemId::new);
    let item = MasterFoodItem {
        id: existing.unwrap_or(MasterItemId::new(0)),
        name,
        description: form.description.trim().to_owned(),
        category,
        calories: form.calories,
        dietary_tags: split_tags(&form.tags),
        is_available: form.available.is_some(),
        company_id: Some(principal.company_id),
    };

    let flash = if existing.is_some() {
        store.upsert_master_item(item).await;
        "updated"
    } else {
        store.create_master_item(item).await;
        "created"
    };
    Ok(Redirect::to(&format!("/kitchen/items?flash={flash}")).into_response())
}

/// Single-id form data (toggle/delete).
#[derive(Debug, Deserialize)]
pub struct ItemIdForm {
    pub id: i64,
}

/// Toggle a catalog item's availability.
#[instrument(skip(state, principal, form))]
pub async fn toggle_item(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<ItemIdForm>,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;
    state
        .store()
        .toggle_master_item(MasterItemId::new(form.id))
        .await;
    Ok(Redirect::to("/kitchen/items").into_response())
}

/// Delete a catalog item.
#[instrument(skip(state, principal, form))]
pub async fn delete_item(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<ItemIdForm>,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;
    state
        .store()
        .delete_master_item(MasterItemId::new(form.id))
        .await;
    Ok(Redirect::to("/kitchen/items?flash=deleted").into_response())
}

// =============================================================================
// Fulfillment
// =============================================================================

/// One order row for the fulfillment view.
pub struct FulfillmentRow {
    pub id: i64,
    pub who: String,
    pub items: String,
    pub instructions: String,
    pub status: String,
    pub can_confirm: bool,
    pub can_fulfill: bool,
    pub can_cancel: bool,
}

/// Fulfillment page template.
#[derive(Template, WebTemplate)]
#[template(path = "kitchen/orders.html")]
pub struct FulfillmentTemplate {
    pub nav: NavContext,
    pub date: String,
    pub rows: Vec<FulfillmentRow>,
}

/// Fulfillment query parameters.
#[derive(Debug, Deserialize)]
pub struct FulfillmentQuery {
    pub date: Option<String>,
}

/// Display the orders for a date.
#[instrument(skip(state, principal))]
pub async fn orders(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Query(query): Query<FulfillmentQuery>,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;

    let date = parse_date_or_today(query.date.as_deref());
    let store = state.store();
    let menus = store.menus_all().await;
    let users = store.users().await;

    let rows = store
        .orders_on(date)
        .await
        .iter()
        .map(|order| {
            let who = match order.user_id {
                Some(user_id) => users
                    .iter()
                    .find(|u| u.id == user_id)
                    .map_or_else(|| format!("user {user_id}"), |u| u.display_name.clone()),
                None => format!("{} (guest)", order.ordered_by()),
            };
            let items = menus
                .iter()
                .find(|m| m.id == order.menu_id)
                .map(|menu| {
                    order
                        .item_ids
                        .iter()
                        .filter_map(|id| menu.item(*id))
                        .map(|i| i.name.clone())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            FulfillmentRow {
                id: order.id.as_i64(),
                who,
                items,
                instructions: order.instructions.clone().unwrap_or_default(),
                status: order.status.to_string(),
                can_confirm: order.status.allows_transition_to(OrderStatus::Confirmed),
                can_fulfill: order.status.allows_transition_to(OrderStatus::Fulfilled),
                can_cancel: order.status.allows_transition_to(OrderStatus::Cancelled),
            }
        })
        .collect();

    Ok(FulfillmentTemplate {
        nav: nav(&state, &principal).await,
        date: date.format("%Y-%m-%d").to_string(),
        rows,
    }
    .into_response())
}

/// Status advance form data.
#[derive(Debug, Deserialize)]
pub struct AdvanceForm {
    pub id: i64,
    pub status: String,
    pub date: String,
}

/// Advance an order's status (forward-only; the store enforces it).
#[instrument(skip(state, principal, form))]
pub async fn advance_order(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<AdvanceForm>,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;

    if let Ok(status) = form.status.parse::<OrderStatus>() {
        state
            .store()
            .update_order_status(OrderId::new(form.id), status)
            .await;
    }
    Ok(Redirect::to(&format!("/kitchen/orders?date={}", form.date)).into_response())
}

// =============================================================================
// Issues
// =============================================================================

/// One issue row.
pub struct IssueRow {
    pub id: i64,
    pub date: String,
    pub reporter: String,
    pub text: String,
    pub chef_response: String,
    pub open: bool,
    pub unread: bool,
}

/// Issues page template.
#[derive(Template, WebTemplate)]
#[template(path = "kitchen/issues.html")]
pub struct IssuesTemplate {
    pub nav: NavContext,
    pub issues: Vec<IssueRow>,
}

/// Display the issue queue.
#[instrument(skip(state, principal))]
pub async fn issues(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;

    let store = state.store();
    let users = store.users().await;
    let rows = store
        .issues()
        .await
        .iter()
        .map(|issue| IssueRow {
            id: issue.id.as_i64(),
            date: issue.date.format("%Y-%m-%d").to_string(),
            reporter: users
                .iter()
                .find(|u| u.id == issue.user_id)
                .map_or_else(|| "former employee".to_owned(), |u| u.display_name.clone()),
            text: issue.text.clone(),
            chef_response: issue.chef_response.clone().unwrap_or_default(),
            open: issue.status == IssueStatus::Open,
            unread: !issue.is_read,
        })
        .collect();

    Ok(IssuesTemplate {
        nav: nav(&state, &principal).await,
        issues: rows,
    }
    .into_response())
}

/// Issue resolve form data.
#[derive(Debug, Deserialize)]
pub struct ResolveIssueForm {
    pub id: i64,
    pub response: Option<String>,
}

/// Resolve an issue with an optional chef response.
#[instrument(skip(state, principal, form))]
pub async fn resolve_issue(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<ResolveIssueForm>,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;
    state
        .store()
        .resolve_issue(IssueId::new(form.id), form.response)
        .await;
    Ok(Redirect::to("/kitchen/issues").into_response())
}

/// Issue id form data.
#[derive(Debug, Deserialize)]
pub struct IssueIdForm {
    pub id: i64,
}

/// Mark an issue read.
#[instrument(skip(state, principal, form))]
pub async fn mark_issue_read(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<IssueIdForm>,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;
    state.store().mark_issue_read(IssueId::new(form.id)).await;
    Ok(Redirect::to("/kitchen/issues").into_response())
}

// =============================================================================
// Feedback board
// =============================================================================

/// One response on a comment thread.
pub struct ResponseRow {
    pub author: String,
    pub text: String,
}

/// One comment thread.
pub struct CommentThread {
    pub id: i64,
    pub author: String,
    pub text: String,
    pub responses: Vec<ResponseRow>,
}

/// Feedback board template.
#[derive(Template, WebTemplate)]
#[template(path = "kitchen/feedback.html")]
pub struct FeedbackTemplate {
    pub nav: NavContext,
    pub comments: Vec<CommentThread>,
    pub summary: String,
    pub ai_enabled: bool,
}

async fn build_feedback(
    state: &AppState,
    principal: &Principal,
    summary: String,
) -> FeedbackTemplate {
    let comments = state
        .store()
        .comments()
        .await
        .iter()
        .map(|comment| CommentThread {
            id: comment.id.as_i64(),
            author: comment.author_name.clone(),
            text: comment.text.clone(),
            responses: comment
                .responses
                .iter()
                .map(|r| ResponseRow {
                    author: r.author_name.clone(),
                    text: r.text.clone(),
                })
                .collect(),
        })
        .collect();

    FeedbackTemplate {
        nav: nav(state, principal).await,
        comments,
        summary,
        ai_enabled: state.ideas().is_some(),
    }
}

/// Display the feedback board.
#[instrument(skip(state, principal))]
pub async fn feedback(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;
    Ok(build_feedback(&state, &principal, String::new())
        .await
        .into_response())
}

/// Comment form data.
#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub text: String,
}

/// Post a comment to the board.
#[instrument(skip(state, principal, form))]
pub async fn post_comment(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<CommentForm>,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;

    let text = form.text.trim();
    if !text.is_empty() {
        state
            .store()
            .add_comment(principal.display_name.clone(), text.to_owned())
            .await;
    }
    Ok(Redirect::to("/kitchen/feedback").into_response())
}

/// Comment response form data.
#[derive(Debug, Deserialize)]
pub struct RespondForm {
    pub id: i64,
    pub text: String,
}

/// Respond on a comment thread.
#[instrument(skip(state, principal, form))]
pub async fn respond_comment(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<RespondForm>,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;

    let text = form.text.trim();
    if !text.is_empty() {
        state
            .store()
            .add_comment_response(
                lunchline_core::CommentId::new(form.id),
                principal.display_name.clone(),
                text.to_owned(),
            )
            .await;
    }
    Ok(Redirect::to("/kitchen/feedback").into_response())
}

/// Summarize the feedback board with the generative client.
///
/// Renders the board directly with the summary (or a placeholder when the
/// client is absent or fails - never an error page).
#[instrument(skip(state, principal))]
pub async fn summarize_feedback(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
) -> Result<Response> {
    ensure(&principal, Role::manages_kitchen)?;

    let comments = state.store().comments().await;
    let texts: Vec<String> = comments.iter().map(|c| c.text.clone()).collect();

    let summary = if texts.is_empty() {
        "There is no feedback to summarize yet.".to_owned()
    } else {
        match state.ideas() {
            None => "Feedback summaries are not configured on this server.".to_owned(),
            Some(client) => match client.summarize_feedback(&texts).await {
                Ok(summary) => summary,
                Err(e) => {
                    tracing::warn!("feedback summarization failed: {e}");
                    "The summarizer is unavailable right now.".to_owned()
                }
            },
        }
    };

    Ok(build_feedback(&state, &principal, summary)
        .await
        .into_response())
}
