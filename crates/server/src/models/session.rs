//! Session principal types.
//!
//! The session carries the authenticated principal - a looked-up user or a
//! synthesized guest. Sessions are cookie-scoped and expire with the
//! browser session; there is no persistent login.

use serde::{Deserialize, Serialize};

use lunchline_core::{CompanyId, Role, UserId};

/// Session storage keys.
pub mod session_keys {
    /// The authenticated [`Principal`](super::Principal).
    pub const PRINCIPAL: &str = "lunchline.principal";
}

/// Identity supplied at the guest portal's AUTH step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestIdentity {
    pub name: String,
    pub host_contact: String,
}

/// The logged-in identity carried by the session.
///
/// Staff principals reference a user row; guest principals are ephemeral
/// and exist only in the session (`user_id` is `None`, `guest` is set).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: Option<UserId>,
    pub display_name: String,
    pub role: Role,
    pub company_id: CompanyId,
    pub guest: Option<GuestIdentity>,
}

impl Principal {
    /// Build a principal for a looked-up user.
    #[must_use]
    pub fn for_user(
        user_id: UserId,
        display_name: String,
        role: Role,
        company_id: CompanyId,
    ) -> Self {
        Self {
            user_id: Some(user_id),
            display_name,
            role,
            company_id,
            guest: None,
        }
    }

    /// Build an ephemeral guest principal bound to a chosen company.
    #[must_use]
    pub fn for_guest(identity: GuestIdentity, company_id: CompanyId) -> Self {
        Self {
            user_id: None,
            display_name: identity.name.clone(),
            role: Role::Guest,
            company_id,
            guest: Some(identity),
        }
    }

    /// Whether this principal is a guest-portal visitor.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        self.guest.is_some()
    }
}
