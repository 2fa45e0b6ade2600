//! Identity Error Types
//!
//! Identity-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::entity::validation_result::RejectReason;

/// Identity-specific result type alias
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Generic message for every failed token check
pub const TOKEN_INVALID_MESSAGE: &str = "invalid or expired session token";

/// Identity-specific error variants
#[derive(Debug, Error)]
pub enum IdentityError {
    /// A field failed its format rule
    #[error("{}", .0.message())]
    InputInvalid(RejectReason),

    /// A field value is already registered
    #[error("{}", .0.message())]
    AlreadyExists(RejectReason),

    /// Login payload named neither or both of national ID and email
    #[error("exactly one of national ID or email must be provided")]
    InvalidSelector,

    /// Login against an unknown identity
    #[error("user does not exist")]
    NotFound,

    /// Wrong password (or unknown identity under the uniform policy)
    #[error("{0}")]
    CredentialMismatch(String),

    /// Mail host, SMTP probe or repository I/O failed
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Token failed decoding, signature or a claim check
    #[error("invalid or expired session token")]
    TokenInvalid,

    /// Signing a new token failed
    #[error("token issuance failed: {0}")]
    IssuanceFailed(String),

    /// Insert after an accepted registration failed
    #[error("persistence failed: {0}")]
    PersistenceFailed(String),

    /// Invalid startup configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl IdentityError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::InputInvalid(_) | IdentityError::InvalidSelector => {
                ErrorKind::BadRequest
            }
            IdentityError::AlreadyExists(_) => ErrorKind::Conflict,
            IdentityError::NotFound => ErrorKind::NotFound,
            IdentityError::CredentialMismatch(_) | IdentityError::TokenInvalid => {
                ErrorKind::Unauthorized
            }
            IdentityError::UpstreamUnavailable(_) => ErrorKind::ServiceUnavailable,
            IdentityError::IssuanceFailed(_)
            | IdentityError::PersistenceFailed(_)
            | IdentityError::Configuration(_)
            | IdentityError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Stable machine-readable code sent to clients
    pub fn code(&self) -> &'static str {
        match self {
            IdentityError::InputInvalid(reason) | IdentityError::AlreadyExists(reason) => {
                reason.code()
            }
            IdentityError::InvalidSelector => "invalid_login_selector",
            IdentityError::NotFound => "user_not_found",
            IdentityError::CredentialMismatch(_) => "credential_mismatch",
            IdentityError::UpstreamUnavailable(_) => "upstream_unavailable",
            IdentityError::TokenInvalid => "token_invalid",
            IdentityError::IssuanceFailed(_) => "token_issuance_failed",
            IdentityError::PersistenceFailed(_) => "persistence_failed",
            IdentityError::Configuration(_) | IdentityError::Internal(_) => "internal_error",
        }
    }

    /// Convert to AppError. Server-side details stay in the logs.
    pub fn to_app_error(&self) -> AppError {
        let message = match self {
            IdentityError::IssuanceFailed(_) => "token issuance failed".to_string(),
            IdentityError::PersistenceFailed(_) => "persistence failed".to_string(),
            IdentityError::UpstreamUnavailable(_) => "upstream service unavailable".to_string(),
            IdentityError::Configuration(_) | IdentityError::Internal(_) => {
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        AppError::new(self.kind(), message).with_code(self.code())
    }

    fn log(&self) {
        match self {
            IdentityError::IssuanceFailed(msg)
            | IdentityError::PersistenceFailed(msg)
            | IdentityError::Configuration(msg)
            | IdentityError::Internal(msg) => {
                tracing::error!(code = self.code(), message = %msg, "Identity internal error");
            }
            IdentityError::UpstreamUnavailable(msg) => {
                tracing::warn!(message = %msg, "Identity upstream unavailable");
            }
            IdentityError::CredentialMismatch(_) => {
                tracing::warn!("Invalid login attempt");
            }
            IdentityError::TokenInvalid => {
                tracing::debug!("Rejected session token");
            }
            _ => {
                tracing::debug!(code = self.code(), error = %self, "Identity error");
            }
        }
    }
}

impl From<RejectReason> for IdentityError {
    fn from(reason: RejectReason) -> Self {
        if reason.is_conflict() {
            IdentityError::AlreadyExists(reason)
        } else {
            IdentityError::InputInvalid(reason)
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
