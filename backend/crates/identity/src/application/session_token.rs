//! Session Token Service
//!
//! Issues and verifies stateless bearer tokens. A token is an HS256 JWS
//! over [`SessionClaims`], hex encoded so it travels as a plain opaque
//! string.
//!
//! Verification checks, in order: signature, `iat <= now`, `exp >= now`,
//! audience intersection, `nbf <= now`. Every failure collapses into
//! [`IdentityError::TokenInvalid`].

use std::collections::HashSet;
use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use platform::crypto::{from_hex, random_token_id, to_hex};

use crate::application::config::IdentityConfig;
use crate::domain::entity::session_claims::SessionClaims;
use crate::error::{IdentityError, IdentityResult};

/// Injectable time source
pub type SharedClock = Arc<dyn Clock + Send + Sync>;

/// Freshly issued token with the claims it binds
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: SessionClaims,
}

pub struct SessionTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    audience: Vec<String>,
    ttl_secs: i64,
    activation_delay_secs: i64,
    bearer_prefix: String,
    clock: SharedClock,
}

impl SessionTokenService {
    /// Fails with [`IdentityError::Configuration`] on a short secret or empty audience
    pub fn new(config: &IdentityConfig, clock: SharedClock) -> IdentityResult<Self> {
        config.validate()?;

        // Time and audience claims are checked by hand against the injected clock
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&config.token_secret),
            decoding_key: DecodingKey::from_secret(&config.token_secret),
            validation,
            audience: config.token_audience.clone(),
            ttl_secs: config.token_ttl_secs(),
            activation_delay_secs: config.token_activation_delay_secs(),
            bearer_prefix: config.bearer_prefix.clone(),
            clock,
        })
    }

    fn now(&self) -> i64 {
        self.clock.utc().timestamp()
    }

    /// Issue a token for `subject`. Never returns a partial token.
    pub fn issue(&self, subject: &str) -> IdentityResult<IssuedToken> {
        let claims = SessionClaims::new(
            subject,
            self.audience.clone(),
            self.now(),
            self.activation_delay_secs,
            self.ttl_secs,
            random_token_id(),
        );

        let jws = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| IdentityError::IssuanceFailed(e.to_string()))?;

        tracing::debug!(
            subject = %claims.subject,
            expires_at = claims.expiration_time,
            "Session token issued"
        );

        Ok(IssuedToken {
            token: to_hex(jws.as_bytes()),
            claims,
        })
    }

    /// Verify a presented token, with or without the bearer prefix
    pub fn verify(&self, presented: &str) -> IdentityResult<SessionClaims> {
        let raw = self.strip_prefix(presented);

        let bytes = from_hex(raw).map_err(|_| IdentityError::TokenInvalid)?;
        let jws = String::from_utf8(bytes).map_err(|_| IdentityError::TokenInvalid)?;

        let claims = decode::<SessionClaims>(&jws, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Session token rejected");
                IdentityError::TokenInvalid
            })?
            .claims;

        self.check_claims(&claims, self.now())?;
        Ok(claims)
    }

    pub fn is_valid(&self, presented: &str) -> bool {
        self.verify(presented).is_ok()
    }

    /// True iff `now <= expiration`. Used for expirations stored outside a token.
    pub fn check_expiration(&self, expiration: i64) -> bool {
        let now = self.now();
        if now > expiration {
            tracing::info!(expiration, now, "Expiration time reached");
            return false;
        }
        true
    }

    fn strip_prefix<'a>(&self, presented: &'a str) -> &'a str {
        let trimmed = presented.trim();
        trimmed
            .strip_prefix(self.bearer_prefix.as_str())
            .map(str::trim_start)
            .unwrap_or(trimmed)
    }

    fn check_claims(&self, claims: &SessionClaims, now: i64) -> IdentityResult<()> {
        let checks = [
            ("iat", claims.issued_at <= now),
            ("exp", claims.expiration_time >= now),
            ("aud", claims.audience_intersects(&self.audience)),
            ("nbf", claims.not_before <= now),
        ];

        match checks.iter().find(|(_, ok)| !ok) {
            Some((claim, _)) => {
                tracing::debug!(claim, "Session token claim check failed");
                Err(IdentityError::TokenInvalid)
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{EPOCH, MutableClock, shared, test_config};

    const WEEK: i64 = 7 * 24 * 3600;

    fn service(clock: &Arc<MutableClock>) -> SessionTokenService {
        SessionTokenService::new(&test_config(), shared(clock)).unwrap()
    }

    #[test]
    fn test_claims_on_issue() {
        let clock = MutableClock::at_epoch();
        let issued = service(&clock).issue("42").unwrap();

        assert_eq!(issued.claims.subject, "42");
        assert_eq!(issued.claims.issued_at, EPOCH);
        assert_eq!(issued.claims.not_before, EPOCH + 1);
        assert_eq!(issued.claims.expiration_time, EPOCH + WEEK);
        assert_eq!(issued.claims.token_id.len(), 32);
        assert!(issued.token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_token_ids_are_unique() {
        let clock = MutableClock::at_epoch();
        let svc = service(&clock);
        let a = svc.issue("42").unwrap();
        let b = svc.issue("42").unwrap();
        assert_ne!(a.claims.token_id, b.claims.token_id);
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_not_valid_before_activation_delay() {
        let clock = MutableClock::at_epoch();
        let svc = service(&clock);
        let issued = svc.issue("42").unwrap();

        assert!(matches!(
            svc.verify(&issued.token),
            Err(IdentityError::TokenInvalid)
        ));

        clock.advance_seconds(1);
        let claims = svc.verify(&issued.token).unwrap();
        assert_eq!(claims, issued.claims);
    }

    #[test]
    fn test_valid_until_expiration() {
        let clock = MutableClock::at_epoch();
        let svc = service(&clock);
        let issued = svc.issue("42").unwrap();

        clock.advance_seconds(WEEK);
        assert!(svc.is_valid(&issued.token));

        clock.advance_seconds(1);
        assert!(!svc.is_valid(&issued.token));
    }

    #[test]
    fn test_issued_in_the_future_is_rejected() {
        let clock = MutableClock::at_epoch();
        let svc = service(&clock);
        let issued = svc.issue("42").unwrap();

        // Rewind: iat > now fails before nbf is even looked at
        clock.advance_seconds(-10);
        assert!(!svc.is_valid(&issued.token));
    }

    #[test]
    fn test_bearer_prefix_is_optional() {
        let clock = MutableClock::at_epoch();
        let svc = service(&clock);
        let issued = svc.issue("42").unwrap();
        clock.advance_seconds(1);

        assert!(svc.is_valid(&issued.token));
        assert!(svc.is_valid(&format!("Bearer {}", issued.token)));
        assert!(svc.is_valid(&format!("  Bearer {}  ", issued.token)));
    }

    #[test]
    fn test_wrong_key_is_rejected() {
        let clock = MutableClock::at_epoch();
        let issued = service(&clock).issue("42").unwrap();
        clock.advance_seconds(1);

        let other = IdentityConfig {
            token_secret: b"another-secret-another-secret-xx".to_vec(),
            ..test_config()
        };
        let svc = SessionTokenService::new(&other, shared(&clock)).unwrap();
        assert!(!svc.is_valid(&issued.token));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let clock = MutableClock::at_epoch();
        let svc = service(&clock);
        let issued = svc.issue("42").unwrap();
        clock.advance_seconds(1);

        let jws = String::from_utf8(from_hex(&issued.token).unwrap()).unwrap();
        let mut parts: Vec<String> = jws.split('.').map(String::from).collect();
        let forged = SessionClaims {
            subject: "1".into(),
            ..issued.claims.clone()
        };
        let forged_json = serde_json::to_vec(&forged).unwrap();
        parts[1] = {
            use base64::Engine;
            base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(forged_json)
        };
        let forged_token = to_hex(parts.join(".").as_bytes());

        assert!(!svc.is_valid(&forged_token));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let clock = MutableClock::at_epoch();
        let svc = service(&clock);
        let not_a_jws = to_hex(b"a.b.c");
        for token in ["", "Bearer ", "zz", "abc", "not a token", not_a_jws.as_str()] {
            assert!(
                matches!(svc.verify(token), Err(IdentityError::TokenInvalid)),
                "{token:?}"
            );
        }
    }

    #[test]
    fn test_audience_mismatch_is_rejected() {
        let clock = MutableClock::at_epoch();
        let issuer_config = IdentityConfig {
            token_audience: vec!["https://other.example".into()],
            ..test_config()
        };
        let issuer = SessionTokenService::new(&issuer_config, shared(&clock)).unwrap();
        let issued = issuer.issue("42").unwrap();
        clock.advance_seconds(1);

        assert!(issuer.is_valid(&issued.token));
        assert!(!service(&clock).is_valid(&issued.token));
    }

    #[test]
    fn test_partial_audience_overlap_is_enough() {
        let clock = MutableClock::at_epoch();
        let issuer_config = IdentityConfig {
            token_audience: vec!["https://jwt.io".into(), "https://other.example".into()],
            ..test_config()
        };
        let issuer = SessionTokenService::new(&issuer_config, shared(&clock)).unwrap();
        let issued = issuer.issue("42").unwrap();
        clock.advance_seconds(1);

        assert!(service(&clock).is_valid(&issued.token));
    }

    #[test]
    fn test_short_secret_fails_at_construction() {
        let clock = MutableClock::at_epoch();
        let config = IdentityConfig {
            token_secret: b"short".to_vec(),
            ..test_config()
        };
        assert!(matches!(
            SessionTokenService::new(&config, shared(&clock)),
            Err(IdentityError::Configuration(_))
        ));
    }

    #[test]
    fn test_check_expiration() {
        let clock = MutableClock::at_epoch();
        let svc = service(&clock);

        assert!(svc.check_expiration(EPOCH));
        assert!(svc.check_expiration(EPOCH + 60));
        assert!(!svc.check_expiration(EPOCH - 1));
        assert!(!svc.check_expiration(0));
    }
}
