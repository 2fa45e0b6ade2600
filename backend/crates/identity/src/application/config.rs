//! Application Configuration
//!
//! Configuration for the Identity application layer.

use std::env;
use std::time::Duration;

use platform::crypto::{from_base64, random_bytes};

use crate::error::{IdentityError, IdentityResult};

/// Minimum length of the HS256 signing secret
pub const MIN_TOKEN_SECRET_BYTES: usize = 32;

/// How failed logins are reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginFailurePolicy {
    /// Unknown identity and wrong password both yield the same
    /// "invalid credentials" mismatch
    #[default]
    Uniform,
    /// Unknown identity is reported as not found, mismatches carry the
    /// verifier's reason
    Distinct,
}

impl LoginFailurePolicy {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "uniform" => Some(Self::Uniform),
            "distinct" => Some(Self::Distinct),
            _ => None,
        }
    }
}

/// Mail host / SMTP mailbox probe settings
#[derive(Debug, Clone)]
pub struct MailProbeConfig {
    /// When false only the address format is checked
    pub enabled: bool,
    /// Upper bound for the whole probe (DNS + SMTP dialogue)
    pub timeout: Duration,
    /// Name sent in HELO
    pub helo_domain: String,
    /// Envelope sender used for MAIL FROM
    pub from_address: String,
    pub smtp_port: u16,
}

impl Default for MailProbeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout: Duration::from_secs(10),
            helo_domain: "localhost".to_string(),
            from_address: "noreply@localhost".to_string(),
            smtp_port: 25,
        }
    }
}

/// Identity application configuration
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// HS256 signing secret, at least 32 bytes
    pub token_secret: Vec<u8>,
    /// Audience written into issued tokens and accepted on verification
    pub token_audience: Vec<String>,
    /// Token lifetime (7 days)
    pub token_ttl: Duration,
    /// Delay between issuance and `nbf` (1 second)
    pub token_activation_delay: Duration,
    /// Prefix stripped from presented tokens
    pub bearer_prefix: String,
    pub login_failure_policy: LoginFailurePolicy,
    pub mail_probe: MailProbeConfig,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Upper bound for a whole request, repository calls included
    pub request_timeout: Duration,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            token_secret: Vec::new(),
            token_audience: vec!["https://golang.org".to_string(), "https://jwt.io".to_string()],
            token_ttl: Duration::from_secs(7 * 24 * 3600), // 7 days
            token_activation_delay: Duration::from_secs(1),
            bearer_prefix: "Bearer ".to_string(),
            login_failure_policy: LoginFailurePolicy::default(),
            mail_probe: MailProbeConfig::default(),
            password_pepper: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl IdentityConfig {
    /// Create config with a random token secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            token_secret: random_bytes(MIN_TOKEN_SECRET_BYTES),
            ..Default::default()
        }
    }

    /// Create config for development (random secret, no network mail probe)
    pub fn development() -> Self {
        Self {
            mail_probe: MailProbeConfig {
                enabled: false,
                ..Default::default()
            },
            ..Self::with_random_secret()
        }
    }

    /// Read configuration from the environment.
    ///
    /// `TOKEN_SECRET` (base64) is required. Everything else falls back to
    /// the defaults.
    pub fn from_env() -> IdentityResult<Self> {
        let mut config = Self::default();

        let secret = env::var("TOKEN_SECRET")
            .map_err(|_| IdentityError::Configuration("TOKEN_SECRET must be set".into()))?;
        config.token_secret = from_base64(secret.trim()).map_err(|e| {
            IdentityError::Configuration(format!("TOKEN_SECRET is not base64: {e}"))
        })?;

        if let Ok(audience) = env::var("TOKEN_AUDIENCE") {
            config.token_audience = audience
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        if let Ok(policy) = env::var("LOGIN_FAILURE_POLICY") {
            config.login_failure_policy = LoginFailurePolicy::from_code(&policy).ok_or_else(|| {
                IdentityError::Configuration(format!("unknown LOGIN_FAILURE_POLICY: {policy}"))
            })?;
        }

        if let Ok(enabled) = env::var("MAIL_PROBE_ENABLED") {
            config.mail_probe.enabled = parse_bool(&enabled).ok_or_else(|| {
                IdentityError::Configuration(format!("MAIL_PROBE_ENABLED is not a bool: {enabled}"))
            })?;
        }

        if let Ok(secs) = env::var("MAIL_PROBE_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                IdentityError::Configuration(format!("MAIL_PROBE_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            config.mail_probe.timeout = Duration::from_secs(secs);
        }

        if let Ok(helo) = env::var("MAIL_PROBE_HELO") {
            config.mail_probe.helo_domain = helo;
        }

        if let Ok(from) = env::var("MAIL_PROBE_FROM") {
            config.mail_probe.from_address = from;
        }

        if let Ok(secs) = env::var("REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                IdentityError::Configuration(format!("REQUEST_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Ok(pepper) = env::var("PASSWORD_PEPPER") {
            config.password_pepper = Some(pepper.into_bytes());
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the token service cannot run with
    pub fn validate(&self) -> IdentityResult<()> {
        if self.token_secret.len() < MIN_TOKEN_SECRET_BYTES {
            return Err(IdentityError::Configuration(format!(
                "token secret must be at least {MIN_TOKEN_SECRET_BYTES} bytes"
            )));
        }
        if self.token_audience.is_empty() {
            return Err(IdentityError::Configuration(
                "token audience must not be empty".into(),
            ));
        }
        if self.token_activation_delay > self.token_ttl {
            return Err(IdentityError::Configuration(
                "token activation delay exceeds token lifetime".into(),
            ));
        }
        if self.mail_probe.timeout.is_zero() {
            return Err(IdentityError::Configuration(
                "mail probe timeout must be positive".into(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(IdentityError::Configuration(
                "request timeout must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Token lifetime in seconds
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl.as_secs() as i64
    }

    /// Activation delay in seconds
    pub fn token_activation_delay_secs(&self) -> i64 {
        self.token_activation_delay.as_secs() as i64
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
