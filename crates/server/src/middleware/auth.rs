//! Authentication extractors and the role guard.
//!
//! Handlers take [`RequireUser`] (redirects to the login page when no
//! principal is in the session) or [`OptionalUser`], then call [`ensure`]
//! with a role predicate for anything role-restricted.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use lunchline_core::Role;

use crate::error::AppError;
use crate::models::{Principal, session_keys};

/// Extractor that requires a logged-in principal.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireUser(principal): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", principal.display_name)
/// }
/// ```
pub struct RequireUser(pub Principal);

/// Rejection for [`RequireUser`]: browser requests go to the login page.
pub struct RedirectToLogin;

impl IntoResponse for RedirectToLogin {
    fn into_response(self) -> Response {
        Redirect::to("/login").into_response()
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = RedirectToLogin;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Session is placed in extensions by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(RedirectToLogin)?;

        let principal: Principal = session
            .get(session_keys::PRINCIPAL)
            .await
            .ok()
            .flatten()
            .ok_or(RedirectToLogin)?;

        Ok(Self(principal))
    }
}

/// Extractor that optionally reads the principal.
pub struct OptionalUser(pub Option<Principal>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<Principal>(session_keys::PRINCIPAL)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(principal))
    }
}

/// Role guard: reject with `Forbidden` unless the predicate passes.
///
/// # Errors
///
/// Returns [`AppError::Forbidden`] when the principal's role fails the
/// predicate.
pub fn ensure(principal: &Principal, allowed: impl Fn(Role) -> bool) -> Result<(), AppError> {
    if allowed(principal.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "role {} may not access this view",
            principal.role
        )))
    }
}

/// Store the principal in the session after login.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_principal(
    session: &Session,
    principal: &Principal,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::PRINCIPAL, principal).await
}

/// Clear the principal from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_principal(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<Principal>(session_keys::PRINCIPAL).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunchline_core::{CompanyId, UserId};

    fn principal(role: Role) -> Principal {
        Principal::for_user(UserId::new(1), "Test".to_owned(), role, CompanyId::new(1))
    }

    #[test]
    fn test_ensure_allows_matching_role() {
        assert!(ensure(&principal(Role::Kitchen), Role::manages_kitchen).is_ok());
        assert!(ensure(&principal(Role::Admin), Role::manages_kitchen).is_ok());
    }

    #[test]
    fn test_ensure_rejects_other_roles() {
        let err = ensure(&principal(Role::Employee), Role::manages_kitchen).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
