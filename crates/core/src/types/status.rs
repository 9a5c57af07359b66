//! Status enums for orders, issues, and guest access.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Orders are created `Pending` and only move forward:
/// `Pending -> Confirmed -> Fulfilled -> Delivered`. `Cancelled` is reachable
/// from any state before `Delivered` and is terminal. There is no defined
/// back-transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Fulfilled,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Position in the forward lifecycle. `Cancelled` has no rank.
    const fn rank(self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Confirmed => Some(1),
            Self::Fulfilled => Some(2),
            Self::Delivered => Some(3),
            Self::Cancelled => None,
        }
    }

    /// Whether a transition from `self` to `next` is allowed.
    ///
    /// Forward moves only; cancellation is allowed from any state that has
    /// not reached `Delivered`; nothing leaves `Cancelled`.
    #[must_use]
    pub fn allows_transition_to(self, next: Self) -> bool {
        match (self.rank(), next.rank()) {
            (Some(from), Some(to)) => to > from,
            // cancelling: anything not yet delivered
            (Some(from), None) => from < 3,
            // out of Cancelled: never
            (None, _) => false,
        }
    }

    /// Whether the order still counts for fulfillment views.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Fulfilled => write!(f, "fulfilled"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "fulfilled" => Ok(Self::Fulfilled),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Menu issue status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    #[default]
    Open,
    Resolved,
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

impl std::str::FromStr for IssueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "resolved" => Ok(Self::Resolved),
            _ => Err(format!("invalid issue status: {s}")),
        }
    }
}

/// How the guest portal admits visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GuestAccessMode {
    /// The portal is closed.
    Disabled,
    /// Visitors must present the current rotating passcode.
    #[default]
    Passcode,
    /// Visitors enter with name and host contact only.
    Open,
}

impl std::fmt::Display for GuestAccessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::Passcode => write!(f, "passcode"),
            Self::Open => write!(f, "open"),
        }
    }
}

impl std::str::FromStr for GuestAccessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disabled" => Ok(Self::Disabled),
            "passcode" => Ok(Self::Passcode),
            "open" => Ok(Self::Open),
            _ => Err(format!("invalid guest access mode: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(OrderStatus::Pending.allows_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Pending.allows_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::Confirmed.allows_transition_to(OrderStatus::Fulfilled));
        assert!(OrderStatus::Fulfilled.allows_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_backward_transitions_rejected() {
        assert!(!OrderStatus::Confirmed.allows_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Delivered.allows_transition_to(OrderStatus::Fulfilled));
        assert!(!OrderStatus::Pending.allows_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_cancellation_rules() {
        assert!(OrderStatus::Pending.allows_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Fulfilled.allows_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.allows_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.allows_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Cancelled.allows_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Fulfilled,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            let parsed: OrderStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_guest_access_roundtrip() {
        for mode in [
            GuestAccessMode::Disabled,
            GuestAccessMode::Passcode,
            GuestAccessMode::Open,
        ] {
            let parsed: GuestAccessMode = mode.to_string().parse().unwrap();
            assert_eq!(parsed, mode);
        }
    }
}
