//! Domain Layer
//!
//! Field rules, entities, and the repository/probe traits the application
//! layer depends on.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    session_claims::SessionClaims,
    validation_result::{RejectReason, ValidationResult},
};
pub use repository::{
    LinkRepository, MailboxProbe, MailboxStatus, PasswordCheck, PasswordVerifier, ProbeError,
    UserRepository,
};
