//! Reception view: guest passcode display/rotation and invitation mail.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use lunchline_core::Role;

use crate::error::Result;
use crate::middleware::{RequireUser, ensure};
use crate::services::mailto;
use crate::state::AppState;

use super::{NavContext, nav};

fn is_reception(role: Role) -> bool {
    matches!(role, Role::Reception | Role::Admin)
}

/// Reception page template.
#[derive(Template, WebTemplate)]
#[template(path = "reception/index.html")]
pub struct ReceptionTemplate {
    pub nav: NavContext,
    pub code: String,
    pub access_mode: String,
    pub rotated: bool,
    pub recipients: String,
    pub mailto: String,
}

/// Reception page query parameters.
#[derive(Debug, Deserialize)]
pub struct ReceptionQuery {
    pub rotated: Option<u8>,
}

/// Display the current guest passcode.
#[instrument(skip(state, principal))]
pub async fn index(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Query(query): Query<ReceptionQuery>,
) -> Result<Response> {
    ensure(&principal, is_reception)?;

    let settings = state.store().settings().await;
    Ok(ReceptionTemplate {
        nav: nav(&state, &principal).await,
        code: settings.guest_passcode.as_str().to_owned(),
        access_mode: settings.guest_access.to_string(),
        rotated: query.rotated == Some(1),
        recipients: String::new(),
        mailto: String::new(),
    }
    .into_response())
}

/// Rotate the guest passcode.
///
/// The previous code stops working immediately; anyone holding it needs a
/// fresh invitation.
#[instrument(skip(state, principal))]
pub async fn rotate_code(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
) -> Result<Response> {
    ensure(&principal, is_reception)?;
    state.store().rotate_guest_passcode().await;
    Ok(Redirect::to("/reception?rotated=1").into_response())
}

/// Invitation form data.
#[derive(Debug, Deserialize)]
pub struct InviteForm {
    pub recipients: String,
}

/// Compose one outgoing invitation covering all recipients.
///
/// The message opens in the operator's own mail client via the rendered
/// `mailto:` link; nothing is sent from here and nothing is tracked.
#[instrument(skip(state, principal, form))]
pub async fn compose_email(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<InviteForm>,
) -> Result<Response> {
    ensure(&principal, is_reception)?;

    let recipients: Vec<String> = form
        .recipients
        .split([',', ';', '\n'])
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_owned)
        .collect();

    let settings = state.store().settings().await;
    let mailto = if recipients.is_empty() {
        String::new()
    } else {
        mailto::guest_code_email(&recipients, &settings.company_name, &settings.guest_passcode)
    };

    Ok(ReceptionTemplate {
        nav: nav(&state, &principal).await,
        code: settings.guest_passcode.as_str().to_owned(),
        access_mode: settings.guest_access.to_string(),
        rotated: false,
        recipients: form.recipients,
        mailto,
    }
    .into_response())
}
