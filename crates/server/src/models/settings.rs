//! Tenant-wide settings (singleton backend row).

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use lunchline_core::{GuestAccessMode, GuestPasscode};

/// Tenant configuration: branding, the order cutoff, and guest access.
///
/// The backend stores exactly one row of these; the store falls back to
/// [`TenantSettings::default`] until the row has loaded (or when the
/// backend is unreachable).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantSettings {
    pub company_name: String,
    pub tagline: Option<String>,
    pub logo_url: Option<String>,
    /// Time of day after which same-day ordering is disallowed.
    pub order_cutoff: NaiveTime,
    pub guest_access: GuestAccessMode,
    pub guest_passcode: GuestPasscode,
}

impl Default for TenantSettings {
    fn default() -> Self {
        Self {
            company_name: "Lunchline".to_owned(),
            tagline: None,
            logo_url: None,
            // 10:30 is the kitchen's historical cutoff; admins change it
            // per tenant in settings.
            order_cutoff: NaiveTime::from_hms_opt(10, 30, 0).expect("10:30 is a valid time"),
            guest_access: GuestAccessMode::Passcode,
            guest_passcode: GuestPasscode::from_string("GUEST-0000".to_owned()),
        }
    }
}
