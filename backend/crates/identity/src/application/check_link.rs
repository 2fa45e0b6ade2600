//! Check Link Use Case
//!
//! One-off links (invitations, password resets) are keyed by an opaque id
//! whose expiration lives in the repository, not in a token.

use std::sync::Arc;

use crate::application::session_token::SessionTokenService;
use crate::domain::repository::LinkRepository;
use crate::error::IdentityResult;

pub struct CheckLinkUseCase<L>
where
    L: LinkRepository,
{
    links: Arc<L>,
    tokens: Arc<SessionTokenService>,
}

impl<L> CheckLinkUseCase<L>
where
    L: LinkRepository,
{
    pub fn new(links: Arc<L>, tokens: Arc<SessionTokenService>) -> Self {
        Self { links, tokens }
    }

    /// Unknown links count as already expired
    pub async fn execute(&self, link_id: &str) -> IdentityResult<bool> {
        let expiration = self.links.find_link_expiration(link_id).await?.unwrap_or(0);
        Ok(self.tokens.check_expiration(expiration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryUserStore;
    use crate::test_support::{EPOCH, MutableClock, shared, test_config};

    #[tokio::test]
    async fn test_link_expiration() {
        let clock = MutableClock::at_epoch();
        let store = Arc::new(InMemoryUserStore::new(None));
        store.add_link("invite-1", EPOCH + 3600).await;
        let tokens = Arc::new(SessionTokenService::new(&test_config(), shared(&clock)).unwrap());
        let uc = CheckLinkUseCase::new(store, tokens);

        assert!(uc.execute("invite-1").await.unwrap());

        clock.advance_seconds(3600);
        assert!(uc.execute("invite-1").await.unwrap());

        clock.advance_seconds(1);
        assert!(!uc.execute("invite-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_link_is_expired() {
        let clock = MutableClock::at_epoch();
        let tokens = Arc::new(SessionTokenService::new(&test_config(), shared(&clock)).unwrap());
        let uc = CheckLinkUseCase::new(Arc::new(InMemoryUserStore::new(None)), tokens);
        assert!(!uc.execute("missing").await.unwrap());
    }
}
