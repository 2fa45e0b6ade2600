//! Email Verification
//!
//! Format check, then the mail host / mailbox probe bounded by the
//! configured timeout. A probe that cannot answer is an upstream failure,
//! not an invalid address.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::repository::{MailboxProbe, MailboxStatus, ProbeError};
use crate::domain::value_object::email::Email;
use crate::error::{IdentityError, IdentityResult};

pub struct EmailVerifier<P>
where
    P: MailboxProbe,
{
    probe: Arc<P>,
    timeout: Duration,
}

impl<P> EmailVerifier<P>
where
    P: MailboxProbe,
{
    pub fn new(probe: Arc<P>, timeout: Duration) -> Self {
        Self { probe, timeout }
    }

    /// `Ok(Some)` for a deliverable address, `Ok(None)` when the format is
    /// wrong, the domain has no mail host, or the mailbox is absent.
    pub async fn check(&self, raw: &str) -> IdentityResult<Option<Email>> {
        let Ok(email) = Email::parse(raw) else {
            return Ok(None);
        };

        let status = tokio::time::timeout(self.timeout, self.probe.probe(&email))
            .await
            .unwrap_or(Err(ProbeError::Timeout))
            .map_err(|e| IdentityError::UpstreamUnavailable(e.to_string()))?;

        match status {
            MailboxStatus::Deliverable => Ok(Some(email)),
            MailboxStatus::NoMailHost | MailboxStatus::MailboxAbsent => {
                tracing::debug!(domain = email.domain(), ?status, "Email not deliverable");
                Ok(None)
            }
        }
    }

    /// Boolean form: anything but a confirmed deliverable address is false,
    /// probe failures included.
    pub async fn validate(&self, raw: &str) -> bool {
        matches!(self.check(raw).await, Ok(Some(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{HangingProbe, ScriptedProbe};

    fn verifier<P: MailboxProbe>(probe: P) -> EmailVerifier<P> {
        EmailVerifier::new(Arc::new(probe), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_deliverable() {
        let v = verifier(ScriptedProbe::deliverable());
        let email = v.check("Ana@Example.com").await.unwrap().unwrap();
        assert_eq!(email.as_str(), "ana@example.com");
        assert!(v.validate("ana@example.com").await);
    }

    #[tokio::test]
    async fn test_bad_format_skips_probe() {
        let probe = Arc::new(ScriptedProbe::deliverable());
        let v = EmailVerifier::new(probe.clone(), Duration::from_secs(5));
        assert!(v.check("not-an-email").await.unwrap().is_none());
        assert!(probe.calls().is_empty());
    }

    #[tokio::test]
    async fn test_absent_mailbox_and_missing_host_are_invalid() {
        for status in [MailboxStatus::MailboxAbsent, MailboxStatus::NoMailHost] {
            let v = verifier(ScriptedProbe::new(Ok(status)));
            assert!(v.check("ana@example.com").await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_unreachable_is_upstream_failure() {
        let v = verifier(ScriptedProbe::new(Err(ProbeError::Unreachable(
            "connection refused".into(),
        ))));
        assert!(matches!(
            v.check("ana@example.com").await,
            Err(IdentityError::UpstreamUnavailable(_))
        ));
        assert!(!v.validate("ana@example.com").await);
    }

    #[tokio::test]
    async fn test_timeout_is_upstream_failure() {
        let v = EmailVerifier::new(Arc::new(HangingProbe), Duration::from_millis(20));
        assert!(matches!(
            v.check("ana@example.com").await,
            Err(IdentityError::UpstreamUnavailable(_))
        ));
    }
}
