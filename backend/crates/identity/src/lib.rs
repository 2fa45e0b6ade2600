//! Identity Backend Module
//!
//! Sign-up validation and bearer-token sessions for patients and employees.
//!
//! Clean Architecture structure:
//! - `domain/` - Field rules, entities, repository and probe traits
//! - `application/` - Use cases (registration, login, token service)
//! - `infra/` - In-memory store, DNS/SMTP mailbox probe
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Registration order
//! national ID → national ID uniqueness → password strength → email
//! (format, mail host, mailbox) → email uniqueness → phone → phone uniqueness.
//! The first failing step decides the reason.
//!
//! ## Tokens
//! HS256-signed claims (`iat`, `nbf = iat + 1s`, `exp = iat + 7d`, `aud`,
//! `sub`, random `jti`), hex encoded for transport. Stateless: a token is
//! valid until `exp`, there is no revocation list.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use application::config::IdentityConfig;
pub use application::session_token::{SessionTokenService, SharedClock};
pub use error::{IdentityError, IdentityResult};
pub use infra::memory::InMemoryUserStore;
pub use infra::smtp_probe::{FormatOnlyProbe, SmtpMailboxProbe};
pub use presentation::router::identity_router;

pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
