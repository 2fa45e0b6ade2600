//! Repository Traits
//!
//! Interfaces for persistence and external probes. Implementations are in
//! the infrastructure layer.

use std::fmt;

use crate::domain::entity::user_record::{EmployeeRecord, PatientRecord};
use crate::domain::value_object::{
    email::Email, login_selector::LoginSelector, user_field::UserField,
};
use crate::error::IdentityResult;

/// User repository trait
///
/// I/O failures are returned as [`IdentityError::UpstreamUnavailable`](crate::error::IdentityError::UpstreamUnavailable).
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Check if any user, of any role, already has `value` in `field`
    async fn exists(&self, field: UserField, value: &str) -> IdentityResult<bool>;

    /// Display name of the user identified by `value` in `field`
    async fn find_display_name(&self, field: UserField, value: &str)
    -> IdentityResult<Option<String>>;

    /// Numeric user id of the user identified by `value` in `field`
    async fn find_user_id(&self, field: UserField, value: &str) -> IdentityResult<Option<i64>>;

    /// Insert an employee. `Ok(false)` means the row was not written.
    async fn insert_employee(&self, record: &EmployeeRecord) -> IdentityResult<bool>;

    /// Insert a patient. `Ok(false)` means the row was not written.
    async fn insert_patient(&self, record: &PatientRecord) -> IdentityResult<bool>;
}

/// Expiration lookup for one-off links (invitations, resets)
#[trait_variant::make(LinkRepository: Send)]
pub trait LocalLinkRepository {
    /// Unix-seconds expiration of `link_id`, `None` if unknown
    async fn find_link_expiration(&self, link_id: &str) -> IdentityResult<Option<i64>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordCheck {
    Match,
    /// Carries the reason shown to the caller
    Mismatch(String),
}

/// Compares a presented password against the stored credential
#[trait_variant::make(PasswordVerifier: Send)]
pub trait LocalPasswordVerifier {
    async fn compare(
        &self,
        selector: &LoginSelector,
        presented: &str,
    ) -> IdentityResult<PasswordCheck>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailboxStatus {
    /// Mail host accepted the recipient
    Deliverable,
    /// Domain has neither MX nor address records
    NoMailHost,
    /// Mail host rejected the recipient
    MailboxAbsent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    Timeout,
    Unreachable(String),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Timeout => f.write_str("mailbox probe timed out"),
            ProbeError::Unreachable(msg) => write!(f, "mail host unreachable: {msg}"),
        }
    }
}

impl std::error::Error for ProbeError {}

/// Mail host and mailbox existence check for a syntactically valid address
#[trait_variant::make(MailboxProbe: Send)]
pub trait LocalMailboxProbe {
    async fn probe(&self, email: &Email) -> Result<MailboxStatus, ProbeError>;
}
