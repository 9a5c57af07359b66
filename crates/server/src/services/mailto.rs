//! Guest-code mail composition.
//!
//! Reception sends the rotating guest passcode by composing a message in
//! the operator's own mail client via a `mailto:` link. There is no
//! delivery confirmation or tracking; the link is the whole integration.

use lunchline_core::GuestPasscode;

/// Build a `mailto:` link inviting `recipients` with the current code.
///
/// Recipients are joined into one outgoing message; blank entries are
/// skipped. Subject and body are percent-encoded for the URL.
#[must_use]
pub fn guest_code_email(
    recipients: &[String],
    company_name: &str,
    code: &GuestPasscode,
) -> String {
    let to = recipients
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .collect::<Vec<_>>()
        .join(",");

    let subject = format!("Lunch guest access - {company_name}");
    let body = format!(
        "Hello,\n\n\
         You are invited to order lunch at {company_name}.\n\n\
         Your guest access code: {code}\n\n\
         Open the guest portal, enter your name, your host's contact, and \
         this code. The code changes regularly, so please use it soon.\n"
    );

    format!(
        "mailto:{to}?subject={}&body={}",
        urlencoding::encode(&subject),
        urlencoding::encode(&body)
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn code() -> GuestPasscode {
        GuestPasscode::from_string("GUEST-1234".to_owned())
    }

    #[test]
    fn test_multiple_recipients_joined() {
        let link = guest_code_email(
            &["a@example.com".to_owned(), " b@example.com ".to_owned()],
            "Acme",
            &code(),
        );
        assert!(link.starts_with("mailto:a@example.com,b@example.com?"));
    }

    #[test]
    fn test_blank_recipients_skipped() {
        let link = guest_code_email(
            &[String::new(), "a@example.com".to_owned()],
            "Acme",
            &code(),
        );
        assert!(link.starts_with("mailto:a@example.com?"));
    }

    #[test]
    fn test_code_and_company_in_body() {
        let link = guest_code_email(&["a@example.com".to_owned()], "Acme & Co", &code());
        assert!(link.contains("GUEST-1234"));
        // the ampersand in the company name must be encoded, not a separator
        assert!(link.contains("Acme%20%26%20Co"));
    }

    #[test]
    fn test_subject_present() {
        let link = guest_code_email(&["a@example.com".to_owned()], "Acme", &code());
        assert!(link.contains("subject=Lunch%20guest%20access%20-%20Acme"));
    }
}
