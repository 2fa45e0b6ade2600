//! Email Value Object
//!
//! Syntactic validation only. Whether the domain has a mail host and the
//! mailbox exists is checked by a [`MailboxProbe`](crate::domain::repository::MailboxProbe).

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::entity::validation_result::RejectReason;

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

/// Maximum local part length (per RFC 5321)
const LOCAL_PART_MAX_LENGTH: usize = 64;

/// Characters allowed in the local part besides ASCII alphanumerics (RFC 5322 atext)
const LOCAL_PART_SPECIALS: &str = "!#$%&'*+/=?^_`{|}~-.";

/// Email address value object, stored lower-cased
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    pub fn parse(email: &str) -> Result<Self, RejectReason> {
        if !validate_email_format(email) {
            return Err(RejectReason::InvalidEmail);
        }
        Ok(Self(email.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the domain part of the email
    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map(|(_, d)| d).unwrap_or("")
    }

    /// Get the local part of the email
    pub fn local_part(&self) -> &str {
        self.0.rsplit_once('@').map(|(l, _)| l).unwrap_or("")
    }
}

/// Format stage of email validation (dot-atom local part, hostname domain)
pub fn validate_email_format(email: &str) -> bool {
    if email.is_empty() || email.len() > EMAIL_MAX_LENGTH {
        return false;
    }

    // Must contain exactly one @
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }

    is_valid_local_part(local) && is_valid_domain(domain)
}

fn is_valid_local_part(local: &str) -> bool {
    if local.is_empty() || local.len() > LOCAL_PART_MAX_LENGTH {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || LOCAL_PART_SPECIALS.contains(c))
}

fn is_valid_domain(domain: &str) -> bool {
    if domain.is_empty() || !domain.contains('.') {
        return false;
    }

    domain.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

impl FromStr for Email {
    type Err = RejectReason;

    fn from_str(s: &str) -> Result<Self, RejectReason> {
        Email::parse(s)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        assert!(validate_email_format("user@example.com"));
        assert!(validate_email_format("User@Example.COM"));
        assert!(validate_email_format("user.name@example.co.uk"));
        assert!(validate_email_format("user+tag@example.com"));
        assert!(validate_email_format("o'neil@mail-host.example.org"));
    }

    #[test]
    fn test_email_invalid() {
        assert!(!validate_email_format(""));
        assert!(!validate_email_format("userexample.com"));
        assert!(!validate_email_format("user@"));
        assert!(!validate_email_format("@example.com"));
        assert!(!validate_email_format("user@@example.com"));
        assert!(!validate_email_format("user@example"));
        assert!(!validate_email_format("user@-example.com"));
        assert!(!validate_email_format("user@example..com"));
        assert!(!validate_email_format(".user@example.com"));
        assert!(!validate_email_format("us..er@example.com"));
        assert!(!validate_email_format("us er@example.com"));
        assert!(!validate_email_format(" user@example.com"));
    }

    #[test]
    fn test_email_length_limits() {
        let local = "a".repeat(65);
        assert!(!validate_email_format(&format!("{local}@example.com")));

        let label = "a".repeat(64);
        assert!(!validate_email_format(&format!("user@{label}.com")));
    }

    #[test]
    fn test_email_parts_and_case() {
        let email = Email::parse("User@Example.COM").unwrap();
        assert_eq!(email.as_str(), "user@example.com");
        assert_eq!(email.domain(), "example.com");
        assert_eq!(email.local_part(), "user");
    }

    #[test]
    fn test_parse_rejects_with_reason() {
        assert_eq!(Email::parse("nope"), Err(RejectReason::InvalidEmail));
    }
}
