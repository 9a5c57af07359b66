//! User roles.

use serde::{Deserialize, Serialize};

/// The role assigned to a user account.
///
/// View dispatch is an exhaustive match over this enum - adding a variant
/// forces every dispatch site to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Orders from the daily menu.
    Employee,
    /// Manages the food catalog, daily menus, templates, and fulfillment.
    Kitchen,
    /// Full access including users, companies, and tenant settings.
    Admin,
    /// Manages the guest passcode and guest invitations.
    Reception,
    /// Delivers orders and marks them delivered.
    Delivery,
    /// Ephemeral passcode-gated visitor; never stored in the users table.
    Guest,
}

impl Role {
    /// Whether this role may manage menus and the food catalog.
    #[must_use]
    pub const fn manages_kitchen(self) -> bool {
        matches!(self, Self::Kitchen | Self::Admin)
    }

    /// Whether this role may administer users, companies, and settings.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether this role may place personal lunch orders.
    #[must_use]
    pub const fn places_orders(self) -> bool {
        matches!(
            self,
            Self::Employee | Self::Kitchen | Self::Admin | Self::Reception | Self::Delivery
        )
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Employee => write!(f, "employee"),
            Self::Kitchen => write!(f, "kitchen"),
            Self::Admin => write!(f, "admin"),
            Self::Reception => write!(f, "reception"),
            Self::Delivery => write!(f, "delivery"),
            Self::Guest => write!(f, "guest"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employee" => Ok(Self::Employee),
            "kitchen" => Ok(Self::Kitchen),
            "admin" => Ok(Self::Admin),
            "reception" => Ok(Self::Reception),
            "delivery" => Ok(Self::Delivery),
            "guest" => Ok(Self::Guest),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_from_str_roundtrip() {
        for role in [
            Role::Employee,
            Role::Kitchen,
            Role::Admin,
            Role::Reception,
            Role::Delivery,
            Role::Guest,
        ] {
            let parsed: Role = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("chef".parse::<Role>().is_err());
    }

    #[test]
    fn test_permissions() {
        assert!(Role::Kitchen.manages_kitchen());
        assert!(Role::Admin.manages_kitchen());
        assert!(!Role::Employee.manages_kitchen());
        assert!(Role::Admin.is_admin());
        assert!(!Role::Kitchen.is_admin());
        assert!(!Role::Guest.places_orders());
    }
}
