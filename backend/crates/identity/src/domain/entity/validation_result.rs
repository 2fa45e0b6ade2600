//! Registration Validation Result
//!
//! One accepted/rejected outcome per registration attempt. A rejection
//! carries exactly one [`RejectReason`], the first rule that failed.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    InvalidNationalId,
    NationalIdTaken,
    WeakPassword,
    InvalidEmail,
    EmailTaken,
    InvalidPhone,
    PhoneTaken,
}

impl RejectReason {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use RejectReason::*;
        match self {
            InvalidNationalId => "invalid_national_id",
            NationalIdTaken => "national_id_taken",
            WeakPassword => "weak_password",
            InvalidEmail => "invalid_email",
            EmailTaken => "email_taken",
            InvalidPhone => "invalid_phone",
            PhoneTaken => "phone_taken",
        }
    }

    #[inline]
    pub const fn message(&self) -> &'static str {
        use RejectReason::*;
        match self {
            InvalidNationalId => "invalid national ID",
            NationalIdTaken => "national ID already registered",
            WeakPassword => "weak password",
            InvalidEmail => "invalid email",
            EmailTaken => "email already registered",
            InvalidPhone => "invalid phone",
            PhoneTaken => "phone already registered",
        }
    }

    /// Uniqueness failures, as opposed to format failures
    #[inline]
    pub const fn is_conflict(&self) -> bool {
        use RejectReason::*;
        matches!(self, NationalIdTaken | EmailTaken | PhoneTaken)
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationResult {
    accepted: bool,
    reason: Option<RejectReason>,
}

impl ValidationResult {
    pub const fn accepted() -> Self {
        Self {
            accepted: true,
            reason: None,
        }
    }

    pub const fn rejected(reason: RejectReason) -> Self {
        Self {
            accepted: false,
            reason: Some(reason),
        }
    }

    pub const fn is_accepted(&self) -> bool {
        self.accepted
    }

    pub const fn reason(&self) -> Option<RejectReason> {
        self.reason
    }

    /// Human-readable reason, empty when accepted
    pub fn reason_text(&self) -> &'static str {
        self.reason.map(|r| r.message()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_has_empty_reason() {
        let result = ValidationResult::accepted();
        assert!(result.is_accepted());
        assert_eq!(result.reason(), None);
        assert_eq!(result.reason_text(), "");
    }

    #[test]
    fn test_rejected_has_one_reason() {
        let result = ValidationResult::rejected(RejectReason::PhoneTaken);
        assert!(!result.is_accepted());
        assert_eq!(result.reason_text(), "phone already registered");
        assert_eq!(result.reason(), Some(RejectReason::PhoneTaken));
    }

    #[test]
    fn test_conflict_classification() {
        assert!(RejectReason::NationalIdTaken.is_conflict());
        assert!(RejectReason::EmailTaken.is_conflict());
        assert!(!RejectReason::InvalidEmail.is_conflict());
        assert!(!RejectReason::WeakPassword.is_conflict());
    }
}
