//! Inspect and change tenant settings from the terminal.

use lunchline_core::GuestPasscode;

use super::CliError;

/// Print the current tenant settings.
///
/// # Errors
///
/// Returns an error when the backend is not configured or unreachable.
pub async fn show() -> Result<(), CliError> {
    let backend = super::backend_from_env()?;

    match backend.fetch_settings().await? {
        None => tracing::warn!("no tenant_settings row yet; the server will use defaults"),
        Some(settings) => {
            tracing::info!(
                company = %settings.company_name,
                cutoff = %settings.order_cutoff.format("%H:%M"),
                guest_access = %settings.guest_access,
                guest_passcode = %settings.guest_passcode,
                "tenant settings"
            );
        }
    }
    Ok(())
}

/// Rotate the guest passcode.
///
/// Anyone holding the previous code is locked out the moment this write
/// lands; running servers pick the new code up on their next full reload.
///
/// # Errors
///
/// Returns an error when the backend is not configured or unreachable.
pub async fn rotate_code() -> Result<(), CliError> {
    let backend = super::backend_from_env()?;

    let mut settings = backend.fetch_settings().await?.unwrap_or_default();
    settings.guest_passcode = GuestPasscode::generate();
    backend.upsert_settings(&settings).await?;

    tracing::info!(code = %settings.guest_passcode, "guest passcode rotated");
    Ok(())
}
