//! Guest portal: AUTH -> MENU -> SUCCESS.
//!
//! Guests are never stored in the users table; a successful AUTH step
//! synthesizes an ephemeral principal in the session, and the session ends
//! with the browser - a fresh visit starts back at AUTH.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, RawForm, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Local;
use serde::Deserialize;
use tracing::instrument;

use lunchline_core::{CompanyId, GuestAccessMode, MenuItemId};

use crate::error::Result;
use crate::middleware::{OptionalUser, clear_principal, set_principal};
use crate::models::{GuestIdentity, Principal};
use crate::state::AppState;
use crate::store::NewOrder;

use super::menu::{CategoryGroup, category_groups};

// =============================================================================
// AUTH step
// =============================================================================

/// A company choice on the AUTH form.
pub struct CompanyChoice {
    pub id: i64,
    pub name: String,
}

/// AUTH step template.
#[derive(Template, WebTemplate)]
#[template(path = "guest/auth.html")]
pub struct GuestAuthTemplate {
    pub company_name: String,
    pub disabled: bool,
    pub needs_code: bool,
    pub companies: Vec<CompanyChoice>,
    pub error: String,
}

/// AUTH page query parameters.
#[derive(Debug, Deserialize)]
pub struct GuestAuthQuery {
    pub err: Option<String>,
}

fn auth_error(code: &str) -> String {
    match code {
        "closed" => "The guest portal is currently closed.".to_owned(),
        "fields" => "Please give your name and your host's contact.".to_owned(),
        "code" => "That access code is not valid.".to_owned(),
        _ => String::new(),
    }
}

/// Display the AUTH step.
#[instrument(skip(state))]
pub async fn auth_page(
    State(state): State<AppState>,
    Query(query): Query<GuestAuthQuery>,
) -> Response {
    let store = state.store();
    let settings = store.settings().await;
    let companies = store
        .companies()
        .await
        .iter()
        .map(|c| CompanyChoice {
            id: c.id.as_i64(),
            name: c.name.clone(),
        })
        .collect();

    GuestAuthTemplate {
        company_name: settings.company_name,
        disabled: settings.guest_access == GuestAccessMode::Disabled,
        needs_code: settings.guest_access == GuestAccessMode::Passcode,
        companies,
        error: query.err.as_deref().map(auth_error).unwrap_or_default(),
    }
    .into_response()
}

/// AUTH form data.
#[derive(Debug, Deserialize)]
pub struct GuestAuthForm {
    pub name: String,
    pub host_contact: String,
    pub company_id: Option<i64>,
    pub passcode: Option<String>,
}

/// Validate the AUTH step and create the guest session.
///
/// The passcode must exactly match the tenant's current code; everything
/// else valid with a wrong code still fails.
#[instrument(skip(state, session, form))]
pub async fn authenticate(
    State(state): State<AppState>,
    session: tower_sessions::Session,
    Form(form): Form<GuestAuthForm>,
) -> Response {
    let store = state.store();
    let settings = store.settings().await;

    if settings.guest_access == GuestAccessMode::Disabled {
        return Redirect::to("/guest?err=closed").into_response();
    }

    let name = form.name.trim();
    let host_contact = form.host_contact.trim();
    if name.is_empty() || host_contact.is_empty() {
        return Redirect::to("/guest?err=fields").into_response();
    }

    if settings.guest_access == GuestAccessMode::Passcode {
        let presented = form.passcode.as_deref().unwrap_or("");
        if !settings.guest_passcode.verify(presented) {
            tracing::info!(guest = %name, "guest auth rejected: wrong passcode");
            return Redirect::to("/guest?err=code").into_response();
        }
    }

    // Resolve the chosen company, falling back to the default tenant
    let company_id = match form.company_id.filter(|id| *id != 0).map(CompanyId::new) {
        Some(id) if store.company(id).await.is_some() => id,
        _ => store.default_company_id(),
    };

    let principal = store.login_as_guest(
        GuestIdentity {
            name: name.to_owned(),
            host_contact: host_contact.to_owned(),
        },
        company_id,
    );
    if let Err(e) = set_principal(&session, &principal).await {
        tracing::error!("failed to store guest session: {e}");
    }

    Redirect::to("/guest/menu").into_response()
}

// =============================================================================
// MENU step
// =============================================================================

/// MENU step template.
#[derive(Template, WebTemplate)]
#[template(path = "guest/menu.html")]
pub struct GuestMenuTemplate {
    pub company_name: String,
    pub guest_name: String,
    pub date: String,
    pub has_menu: bool,
    pub notes: String,
    pub categories: Vec<CategoryGroup>,
    pub error: String,
}

/// MENU page query parameters.
#[derive(Debug, Deserialize)]
pub struct GuestMenuQuery {
    pub err: Option<String>,
}

fn require_guest(principal: Option<Principal>) -> std::result::Result<Principal, Response> {
    match principal {
        Some(p) if p.is_guest() => Ok(p),
        _ => Err(Redirect::to("/guest").into_response()),
    }
}

/// Display today's menu for the chosen company.
#[instrument(skip(state, principal))]
pub async fn menu_page(
    State(state): State<AppState>,
    OptionalUser(principal): OptionalUser,
    Query(query): Query<GuestMenuQuery>,
) -> Result<Response> {
    let guest = match require_guest(principal) {
        Ok(guest) => guest,
        Err(redirect) => return Ok(redirect),
    };

    let store = state.store();
    let settings = store.settings().await;
    let today = Local::now().date_naive();
    let menu = store.menu_on(today, guest.company_id).await;

    Ok(GuestMenuTemplate {
        company_name: settings.company_name,
        guest_name: guest.display_name,
        date: today.format("%Y-%m-%d").to_string(),
        has_menu: menu.is_some(),
        notes: menu
            .as_ref()
            .and_then(|m| m.notes.clone())
            .unwrap_or_default(),
        categories: menu.as_ref().map(category_groups).unwrap_or_default(),
        error: match query.err.as_deref() {
            Some("noitems") => "Pick at least one item.".to_owned(),
            Some("nomenu") => "Today's menu is not published yet.".to_owned(),
            _ => String::new(),
        },
    }
    .into_response())
}

/// Place the guest's order and advance to SUCCESS.
#[instrument(skip(state, principal, form))]
pub async fn place_order(
    State(state): State<AppState>,
    OptionalUser(principal): OptionalUser,
    RawForm(form): RawForm,
) -> Result<Response> {
    let guest = match require_guest(principal) {
        Ok(guest) => guest,
        Err(redirect) => return Ok(redirect),
    };

    let store = state.store();
    let today = Local::now().date_naive();
    let Some(menu) = store.menu_on(today, guest.company_id).await else {
        return Ok(Redirect::to("/guest/menu?err=nomenu").into_response());
    };

    let pairs = super::form_pairs(&form);
    let item_ids: Vec<MenuItemId> = super::form_values(&pairs, "items")
        .into_iter()
        .filter_map(|raw| raw.parse::<i64>().ok())
        .map(MenuItemId::new)
        .filter(|id| menu.item(*id).is_some())
        .collect();
    if item_ids.is_empty() {
        return Ok(Redirect::to("/guest/menu?err=noitems").into_response());
    }

    let identity = guest.guest.clone().unwrap_or(GuestIdentity {
        name: guest.display_name.clone(),
        host_contact: String::new(),
    });
    store
        .place_order(NewOrder {
            user_id: None,
            guest_name: Some(identity.name),
            host_contact: Some(identity.host_contact),
            menu_id: menu.id,
            date: today,
            item_ids,
            instructions: super::form_value(&pairs, "notes").map(str::to_owned),
            company_id: Some(guest.company_id),
        })
        .await;

    Ok(Redirect::to("/guest/success").into_response())
}

// =============================================================================
// SUCCESS step
// =============================================================================

/// SUCCESS step template.
#[derive(Template, WebTemplate)]
#[template(path = "guest/success.html")]
pub struct GuestSuccessTemplate {
    pub company_name: String,
    pub guest_name: String,
}

/// Confirm the order and end the guest session.
///
/// The principal is cleared here, so a reload lands back on AUTH.
#[instrument(skip(state, session, principal))]
pub async fn success(
    State(state): State<AppState>,
    session: tower_sessions::Session,
    OptionalUser(principal): OptionalUser,
) -> Result<Response> {
    let guest = match require_guest(principal) {
        Ok(guest) => guest,
        Err(redirect) => return Ok(redirect),
    };

    if let Err(e) = clear_principal(&session).await {
        tracing::error!("failed to clear guest session: {e}");
    }

    let settings = state.store().settings().await;
    Ok(GuestSuccessTemplate {
        company_name: settings.company_name,
        guest_name: guest.display_name,
    }
    .into_response())
}
