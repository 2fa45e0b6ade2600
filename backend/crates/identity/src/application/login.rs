//! Login Use Case
//!
//! A presented token that still verifies short-circuits the login.
//! Otherwise the credentials are checked and a fresh token is issued.

use std::sync::Arc;

use crate::application::config::{IdentityConfig, LoginFailurePolicy};
use crate::application::session_token::SessionTokenService;
use crate::domain::repository::{PasswordCheck, PasswordVerifier, UserRepository};
use crate::domain::value_object::login_selector::LoginSelector;
use crate::error::{IdentityError, IdentityResult};

/// Reason shown for every failed login under [`LoginFailurePolicy::Uniform`]
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid credentials";

pub const SESSION_ALREADY_ACTIVE_MESSAGE: &str = "session already active";

/// Login input
pub struct LoginInput {
    pub national_id: Option<String>,
    pub email: Option<String>,
    pub password: String,
    /// Raw `Authorization` header value, if any
    pub presented_token: Option<String>,
}

/// Login output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutput {
    /// The presented token is still valid; nothing new was issued
    AlreadyActive,
    Authenticated {
        name: String,
        user_id: i64,
        token: String,
    },
}

/// Login use case
pub struct LoginUseCase<R, V>
where
    R: UserRepository,
    V: PasswordVerifier,
{
    repo: Arc<R>,
    verifier: Arc<V>,
    tokens: Arc<SessionTokenService>,
    config: Arc<IdentityConfig>,
}

impl<R, V> LoginUseCase<R, V>
where
    R: UserRepository,
    V: PasswordVerifier,
{
    pub fn new(
        repo: Arc<R>,
        verifier: Arc<V>,
        tokens: Arc<SessionTokenService>,
        config: Arc<IdentityConfig>,
    ) -> Self {
        Self {
            repo,
            verifier,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> IdentityResult<LoginOutput> {
        if input
            .presented_token
            .as_deref()
            .is_some_and(|token| self.tokens.is_valid(token))
        {
            tracing::debug!("Login skipped, session already active");
            return Ok(LoginOutput::AlreadyActive);
        }

        let selector = LoginSelector::from_parts(input.national_id, input.email)?;
        let field = selector.field();

        if !self.repo.exists(field, selector.value()).await? {
            if self.config.login_failure_policy == LoginFailurePolicy::Uniform {
                // Costs the same as a wrong password; the outcome is ignored
                let _ = self.verifier.compare(&selector, &input.password).await;
            }
            return Err(self.unknown_identity());
        }

        match self.verifier.compare(&selector, &input.password).await? {
            PasswordCheck::Match => {}
            PasswordCheck::Mismatch(reason) => return Err(self.mismatch(reason)),
        }

        let user_id = self
            .repo
            .find_user_id(field, selector.value())
            .await?
            .ok_or_else(|| IdentityError::Internal(format!("no user id for existing {field}")))?;

        let issued = self.tokens.issue(&user_id.to_string())?;

        let name = self
            .repo
            .find_display_name(field, selector.value())
            .await?
            .unwrap_or_default();

        tracing::info!(user_id, %field, "User logged in");

        Ok(LoginOutput::Authenticated {
            name,
            user_id,
            token: issued.token,
        })
    }

    fn unknown_identity(&self) -> IdentityError {
        match self.config.login_failure_policy {
            LoginFailurePolicy::Uniform => {
                IdentityError::CredentialMismatch(INVALID_CREDENTIALS_MESSAGE.to_string())
            }
            LoginFailurePolicy::Distinct => IdentityError::NotFound,
        }
    }

    fn mismatch(&self, reason: String) -> IdentityError {
        match self.config.login_failure_policy {
            LoginFailurePolicy::Uniform => {
                IdentityError::CredentialMismatch(INVALID_CREDENTIALS_MESSAGE.to_string())
            }
            LoginFailurePolicy::Distinct => IdentityError::CredentialMismatch(reason),
        }
    }
}
