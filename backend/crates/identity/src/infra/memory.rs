//! In-Memory Repository Implementations
//!
//! Process-local user and link store. Backs the API binary until a
//! database-backed repository is wired in, and doubles as the repository
//! in tests.

use std::collections::HashMap;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use platform::crypto::random_token_id;
use platform::password::{ClearTextPassword, HashedPassword};
use tokio::sync::RwLock;

use crate::domain::entity::user_record::{EmployeeRecord, NewUser, PatientRecord, UserRecord};
use crate::domain::repository::{
    LinkRepository, PasswordCheck, PasswordVerifier, UserRepository,
};
use crate::domain::value_object::{login_selector::LoginSelector, user_field::UserField};
use crate::error::IdentityResult;

/// Reason returned by [`PasswordVerifier::compare`] on a wrong password
pub const WRONG_PASSWORD_MESSAGE: &str = "incorrect password";

struct StoredUser {
    user_id: i64,
    user: NewUser,
}

impl StoredUser {
    fn record(&self) -> &UserRecord {
        self.user.user()
    }

    fn matches(&self, field: UserField, value: &str) -> bool {
        let record = self.record();
        match field {
            UserField::NationalId => record.national_id.as_str().eq_ignore_ascii_case(value),
            UserField::Email => record.email.as_str().eq_ignore_ascii_case(value),
            UserField::Phone => record.phone.as_str() == value,
        }
    }
}

#[derive(Default)]
struct Store {
    users: Vec<StoredUser>,
    links: HashMap<String, i64>,
}

impl Store {
    fn find(&self, field: UserField, value: &str) -> Option<&StoredUser> {
        self.users.iter().find(|u| u.matches(field, value))
    }
}

/// In-memory user repository, password verifier and link repository
pub struct InMemoryUserStore {
    store: RwLock<Store>,
    next_id: AtomicI64,
    pepper: Option<Vec<u8>>,
    /// Hash of a random password, verified against when the identity is unknown
    decoy_hash: OnceLock<Option<HashedPassword>>,
    fail_inserts: AtomicBool,
}

impl InMemoryUserStore {
    /// `pepper` must match the one used when hashing at sign-up
    pub fn new(pepper: Option<Vec<u8>>) -> Self {
        Self {
            store: RwLock::new(Store::default()),
            next_id: AtomicI64::new(1),
            pepper,
            decoy_hash: OnceLock::new(),
            fail_inserts: AtomicBool::new(false),
        }
    }

    /// Register a one-off link expiring at `expires_at` (unix seconds)
    pub async fn add_link(&self, link_id: impl Into<String>, expires_at: i64) {
        self.store.write().await.links.insert(link_id.into(), expires_at);
    }

    pub async fn user_count(&self) -> usize {
        self.store.read().await.users.len()
    }

    /// Make every insert report that no row was written
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::Relaxed);
    }

    fn decoy_hash(&self) -> Option<&HashedPassword> {
        self.decoy_hash
            .get_or_init(|| {
                ClearTextPassword::new(random_token_id())
                    .hash(self.pepper.as_deref())
                    .ok()
            })
            .as_ref()
    }

    async fn insert(&self, user: NewUser) -> IdentityResult<bool> {
        if self.fail_inserts.load(Ordering::Relaxed) {
            return Ok(false);
        }

        let mut store = self.store.write().await;

        // Guards against a concurrent registration that passed the same checks
        let record = user.user();
        if store.find(UserField::NationalId, record.national_id.as_str()).is_some()
            || store.find(UserField::Email, record.email.as_str()).is_some()
            || store.find(UserField::Phone, record.phone.as_str()).is_some()
        {
            return Ok(false);
        }

        let user_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(user_id, role = %user.role(), "Stored user");
        store.users.push(StoredUser { user_id, user });
        Ok(true)
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new(None)
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for InMemoryUserStore {
    async fn exists(&self, field: UserField, value: &str) -> IdentityResult<bool> {
        Ok(self.store.read().await.find(field, value).is_some())
    }

    async fn find_display_name(
        &self,
        field: UserField,
        value: &str,
    ) -> IdentityResult<Option<String>> {
        Ok(self
            .store
            .read()
            .await
            .find(field, value)
            .map(|u| u.record().name.clone()))
    }

    async fn find_user_id(&self, field: UserField, value: &str) -> IdentityResult<Option<i64>> {
        Ok(self
            .store
            .read()
            .await
            .find(field, value)
            .map(|u| u.user_id))
    }

    async fn insert_employee(&self, record: &EmployeeRecord) -> IdentityResult<bool> {
        self.insert(NewUser::Employee(record.clone())).await
    }

    async fn insert_patient(&self, record: &PatientRecord) -> IdentityResult<bool> {
        self.insert(NewUser::Patient(record.clone())).await
    }
}

// ============================================================================
// Password Verifier Implementation
// ============================================================================

impl PasswordVerifier for InMemoryUserStore {
    /// An unknown identity is verified against a decoy hash and reported
    /// as a mismatch, so both outcomes cost one Argon2 verification.
    async fn compare(
        &self,
        selector: &LoginSelector,
        presented: &str,
    ) -> IdentityResult<PasswordCheck> {
        let stored = self
            .store
            .read()
            .await
            .find(selector.field(), selector.value())
            .map(|u| u.record().password_hash.clone());

        let presented = ClearTextPassword::new(presented);
        let matched = match stored {
            Some(hash) => hash.verify(&presented, self.pepper.as_deref()),
            None => {
                if let Some(decoy) = self.decoy_hash() {
                    decoy.verify(&presented, self.pepper.as_deref());
                }
                false
            }
        };

        if matched {
            Ok(PasswordCheck::Match)
        } else {
            Ok(PasswordCheck::Mismatch(WRONG_PASSWORD_MESSAGE.to_string()))
        }
    }
}

// ============================================================================
// Link Repository Implementation
// ============================================================================

impl LinkRepository for InMemoryUserStore {
    async fn find_link_expiration(&self, link_id: &str) -> IdentityResult<Option<i64>> {
        Ok(self.store.read().await.links.get(link_id).copied())
    }
}
