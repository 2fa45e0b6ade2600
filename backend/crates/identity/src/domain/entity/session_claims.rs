//! Session Claims
//!
//! Registered JWT claim names on the wire. All times are unix seconds.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user identifier, opaque to the token service)
    #[serde(rename = "sub")]
    pub subject: String,

    #[serde(rename = "aud")]
    pub audience: Vec<String>,

    #[serde(rename = "iat")]
    pub issued_at: i64,

    #[serde(rename = "nbf")]
    pub not_before: i64,

    #[serde(rename = "exp")]
    pub expiration_time: i64,

    /// Random token identifier
    #[serde(rename = "jti")]
    pub token_id: String,
}

impl SessionClaims {
    /// `iat <= nbf <= exp` holds when `activation_delay <= ttl` and both are non-negative.
    pub fn new(
        subject: impl Into<String>,
        audience: Vec<String>,
        now: i64,
        activation_delay: i64,
        ttl: i64,
        token_id: String,
    ) -> Self {
        Self {
            subject: subject.into(),
            audience,
            issued_at: now,
            not_before: now + activation_delay,
            expiration_time: now + ttl,
            token_id,
        }
    }

    pub fn expires_at(&self) -> i64 {
        self.expiration_time
    }

    pub fn audience_intersects(&self, expected: &[String]) -> bool {
        self.audience.iter().any(|aud| expected.contains(aud))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audience() -> Vec<String> {
        vec!["https://golang.org".into(), "https://jwt.io".into()]
    }

    #[test]
    fn test_time_ordering() {
        let claims = SessionClaims::new("42", audience(), 1_000, 1, 604_800, "jti".into());
        assert_eq!(claims.issued_at, 1_000);
        assert_eq!(claims.not_before, 1_001);
        assert_eq!(claims.expires_at(), 605_800);
        assert!(claims.issued_at <= claims.not_before);
        assert!(claims.not_before <= claims.expiration_time);
    }

    #[test]
    fn test_wire_names() {
        let claims = SessionClaims::new("42", audience(), 1_000, 1, 10, "abc".into());
        let json = serde_json::to_value(&claims).unwrap();
        for key in ["sub", "aud", "iat", "nbf", "exp", "jti"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_audience_intersection() {
        let claims = SessionClaims::new("42", audience(), 0, 1, 10, "abc".into());
        assert!(claims.audience_intersects(&["https://jwt.io".into()]));
        assert!(!claims.audience_intersects(&["https://example.com".into()]));
        assert!(!claims.audience_intersects(&[]));
    }
}
