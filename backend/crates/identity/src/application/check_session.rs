//! Check Session Use Case
//!
//! Verifies a presented bearer token and reports what it binds.

use std::sync::Arc;

use crate::application::session_token::SessionTokenService;
use crate::error::{IdentityError, IdentityResult};

/// Session info output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfoOutput {
    pub subject: String,
    pub expires_at: i64,
}

/// Check session use case
pub struct CheckSessionUseCase {
    tokens: Arc<SessionTokenService>,
}

impl CheckSessionUseCase {
    pub fn new(tokens: Arc<SessionTokenService>) -> Self {
        Self { tokens }
    }

    /// A missing token is as invalid as a bad one
    pub fn execute(&self, presented: Option<&str>) -> IdentityResult<SessionInfoOutput> {
        let claims = self
            .tokens
            .verify(presented.ok_or(IdentityError::TokenInvalid)?)?;

        Ok(SessionInfoOutput {
            expires_at: claims.expires_at(),
            subject: claims.subject,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{EPOCH, MutableClock, shared, test_config};

    #[test]
    fn test_session_info() {
        let clock = MutableClock::at_epoch();
        let tokens = Arc::new(SessionTokenService::new(&test_config(), shared(&clock)).unwrap());
        let issued = tokens.issue("7").unwrap();
        clock.advance_seconds(1);

        let uc = CheckSessionUseCase::new(tokens);
        let info = uc.execute(Some(issued.token.as_str())).unwrap();
        assert_eq!(info.subject, "7");
        assert_eq!(info.expires_at, EPOCH + 7 * 24 * 3600);

        assert!(matches!(uc.execute(None), Err(IdentityError::TokenInvalid)));
    }
}
