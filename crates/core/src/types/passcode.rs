//! Guest portal passcode.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// The shared secret gating the guest portal.
///
/// Reception staff rotate this code; rotating it immediately invalidates any
/// previously distributed code. Codes have the form `GUEST-<4 digits>` and
/// are NOT cryptographically secure - the threat model is a visitor guessing
/// at the front desk, not an online attacker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct GuestPasscode(String);

impl GuestPasscode {
    /// Prefix shared by all generated codes.
    pub const PREFIX: &'static str = "GUEST-";

    /// Generate a fresh code: `GUEST-` followed by 4 random digits.
    #[must_use]
    pub fn generate() -> Self {
        let digits: u16 = rand::rng().random_range(0..10_000);
        Self(format!("{}{digits:04}", Self::PREFIX))
    }

    /// Wrap an existing code (e.g. read back from the backend).
    #[must_use]
    pub fn from_string(code: String) -> Self {
        Self(code)
    }

    /// Exact-match check against a visitor-supplied code.
    ///
    /// The comparison is exact by specification; only surrounding whitespace
    /// on the candidate is forgiven.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        self.0 == candidate.trim()
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GuestPasscode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_format() {
        for _ in 0..32 {
            let code = GuestPasscode::generate();
            let digits = code.as_str().strip_prefix("GUEST-").unwrap();
            assert_eq!(digits.len(), 4);
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_verify_exact_match() {
        let code = GuestPasscode::from_string("GUEST-0042".to_owned());
        assert!(code.verify("GUEST-0042"));
        assert!(code.verify("  GUEST-0042  "));
        assert!(!code.verify("GUEST-42"));
        assert!(!code.verify("guest-0042"));
        assert!(!code.verify(""));
    }
}
