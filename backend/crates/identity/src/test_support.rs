//! Shared test doubles for identity tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::application::config::IdentityConfig;
use crate::application::session_token::SharedClock;
use crate::domain::repository::{MailboxProbe, MailboxStatus, ProbeError};
use crate::domain::value_object::email::Email;

/// 2024-01-01T00:00:00Z
pub const EPOCH: i64 = 1_704_067_200;

pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn at_epoch() -> Arc<Self> {
        Arc::new(Self::new(Utc.timestamp_opt(EPOCH, 0).single().unwrap()))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.0.lock().unwrap() += TimeDelta::seconds(seconds);
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

pub fn shared(clock: &Arc<MutableClock>) -> SharedClock {
    clock.clone()
}

/// Fixed secret, no network probe, cheap to build
pub fn test_config() -> IdentityConfig {
    IdentityConfig {
        token_secret: b"0123456789abcdef0123456789abcdef".to_vec(),
        ..IdentityConfig::development()
    }
}

/// Probe returning the same scripted answer for every address and
/// counting how often it was asked
pub struct ScriptedProbe {
    answer: Result<MailboxStatus, ProbeError>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProbe {
    pub fn new(answer: Result<MailboxStatus, ProbeError>) -> Self {
        Self {
            answer,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn deliverable() -> Self {
        Self::new(Ok(MailboxStatus::Deliverable))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl MailboxProbe for ScriptedProbe {
    async fn probe(&self, email: &Email) -> Result<MailboxStatus, ProbeError> {
        self.calls.lock().unwrap().push(email.as_str().to_string());
        self.answer.clone()
    }
}

/// Probe that never answers, for timeout tests
pub struct HangingProbe;

impl MailboxProbe for HangingProbe {
    async fn probe(&self, _email: &Email) -> Result<MailboxStatus, ProbeError> {
        std::future::pending().await
    }
}
