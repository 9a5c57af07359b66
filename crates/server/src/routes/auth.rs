//! Login and logout.
//!
//! Authentication is identifier-only: a username or email is matched
//! case-insensitively and the account's lock flag is the only gate.
//! Failures all render the same generic message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalUser, clear_principal, set_principal};
use crate::state::AppState;

use super::landing;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub company_name: String,
    pub error: bool,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub identifier: String,
}

/// Display the login page.
#[instrument(skip(state, principal))]
pub async fn login_page(
    State(state): State<AppState>,
    OptionalUser(principal): OptionalUser,
) -> Response {
    // Already logged in: straight to the landing view
    if let Some(p) = principal {
        return Redirect::to(landing(p.role)).into_response();
    }

    let settings = state.store().settings().await;
    LoginTemplate {
        company_name: settings.company_name,
        error: false,
    }
    .into_response()
}

/// Handle the login action.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.store().login(&form.identifier).await {
        Some(principal) => {
            if let Err(e) = set_principal(&session, &principal).await {
                tracing::error!("failed to store session principal: {e}");
            }
            if let Some(user_id) = principal.user_id {
                set_sentry_user(&user_id, Some(&principal.display_name));
            }
            Redirect::to(landing(principal.role)).into_response()
        }
        None => {
            // Same message for unknown identifier and locked account
            let settings = state.store().settings().await;
            LoginTemplate {
                company_name: settings.company_name,
                error: true,
            }
            .into_response()
        }
    }
}

/// Handle logout: clear the session and the store's session caches.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    if let Err(e) = clear_principal(&session).await {
        tracing::error!("failed to clear session principal: {e}");
    }
    clear_sentry_user();
    // Cached menus and orders are dropped (only); the next full load
    // refetches them.
    state.store().clear_session_caches().await;
    Redirect::to("/login")
}
