//! Role-based landing dispatch.

use axum::response::{IntoResponse, Redirect};

use crate::middleware::OptionalUser;

use super::landing;

/// Send the visitor to their role's landing view, or to the login page.
pub async fn home(OptionalUser(principal): OptionalUser) -> impl IntoResponse {
    match principal {
        Some(p) => Redirect::to(landing(p.role)),
        None => Redirect::to("/login"),
    }
}
