//! User domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lunchline_core::{CompanyId, DepartmentId, Email, Role, UserId};

/// A user account.
///
/// Login matches `username` or `email` case-insensitively; there is no
/// password - identifier alone authenticates. `is_locked` gates login
/// regardless of identifier correctness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    pub display_name: String,
    pub role: Role,
    pub department_id: Option<DepartmentId>,
    pub company_id: Option<CompanyId>,
    pub is_locked: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether a trimmed candidate identifier matches this account.
    #[must_use]
    pub fn matches_identifier(&self, candidate: &str) -> bool {
        self.username.eq_ignore_ascii_case(candidate) || self.email.matches_ignore_case(candidate)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> User {
        User {
            id: UserId::new(1),
            username: "mlopez".to_owned(),
            email: Email::parse("maria.lopez@example.com").unwrap(),
            display_name: "Maria Lopez".to_owned(),
            role: Role::Employee,
            department_id: None,
            company_id: Some(CompanyId::new(1)),
            is_locked: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_matches_username_case_insensitive() {
        let user = sample();
        assert!(user.matches_identifier("MLopez"));
        assert!(user.matches_identifier("mlopez"));
    }

    #[test]
    fn test_matches_email_case_insensitive() {
        let user = sample();
        assert!(user.matches_identifier("Maria.Lopez@Example.COM"));
    }

    #[test]
    fn test_rejects_other_identifiers() {
        let user = sample();
        assert!(!user.matches_identifier("maria"));
        assert!(!user.matches_identifier(""));
    }
}
