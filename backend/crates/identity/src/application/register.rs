//! Registration
//!
//! [`RegistrationPipeline`] runs the field rules and uniqueness lookups in
//! one fixed order and stops at the first failure:
//!
//! 1. national ID format, then national ID uniqueness
//! 2. password strength
//! 3. email (format, mail host, mailbox), then email uniqueness
//! 4. phone format, then phone uniqueness
//!
//! Lookups are read-only, so the same input gives the same result until
//! something is inserted. [`SignUpUseCase`] hashes and persists an accepted
//! registration.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::IdentityConfig;
use crate::application::email_check::EmailVerifier;
use crate::domain::entity::user_record::{EmployeeRecord, PatientRecord, UserRecord};
use crate::domain::entity::validation_result::{RejectReason, ValidationResult};
use crate::domain::repository::{MailboxProbe, UserRepository};
use crate::domain::value_object::{
    email::Email, national_id::NationalId, password_strength::validate_password_strength,
    phone::Phone, user_field::UserField, user_role::UserRole,
};
use crate::error::{IdentityError, IdentityResult};

/// Raw identity fields of a registration attempt
#[derive(Debug, Clone, Copy)]
pub struct RegistrationInput<'a> {
    pub role: UserRole,
    pub national_id: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Identity fields that passed every rule
#[derive(Debug, Clone)]
pub struct ValidatedFields {
    pub national_id: NationalId,
    pub email: Email,
    pub phone: Phone,
}

pub struct RegistrationPipeline<R, P>
where
    R: UserRepository,
    P: MailboxProbe,
{
    repo: Arc<R>,
    email: EmailVerifier<P>,
}

impl<R, P> RegistrationPipeline<R, P>
where
    R: UserRepository,
    P: MailboxProbe,
{
    pub fn new(repo: Arc<R>, probe: Arc<P>, config: Arc<IdentityConfig>) -> Self {
        Self {
            repo,
            email: EmailVerifier::new(probe, config.mail_probe.timeout),
        }
    }

    /// Accept/reject outcome. `Err` only for lookup or probe I/O failures.
    pub async fn validate(&self, input: RegistrationInput<'_>) -> IdentityResult<ValidationResult> {
        Ok(match self.check(input).await? {
            Ok(_) => ValidationResult::accepted(),
            Err(reason) => ValidationResult::rejected(reason),
        })
    }

    /// Like [`validate`](Self::validate) but keeps the parsed fields
    pub async fn check(
        &self,
        input: RegistrationInput<'_>,
    ) -> IdentityResult<Result<ValidatedFields, RejectReason>> {
        let national_id = match NationalId::parse(input.national_id) {
            Ok(id) => id,
            Err(reason) => return Ok(Err(reason)),
        };
        if self.taken(UserField::NationalId, national_id.as_str()).await? {
            return Ok(Err(RejectReason::NationalIdTaken));
        }

        if !validate_password_strength(input.password) {
            return Ok(Err(RejectReason::WeakPassword));
        }

        let Some(email) = self.email.check(input.email).await? else {
            return Ok(Err(RejectReason::InvalidEmail));
        };
        if self.taken(UserField::Email, email.as_str()).await? {
            return Ok(Err(RejectReason::EmailTaken));
        }

        let phone = match Phone::parse(input.phone) {
            Ok(phone) => phone,
            Err(reason) => return Ok(Err(reason)),
        };
        if self.taken(UserField::Phone, phone.as_str()).await? {
            return Ok(Err(RejectReason::PhoneTaken));
        }

        tracing::debug!(role = %input.role, "Registration fields accepted");

        Ok(Ok(ValidatedFields {
            national_id,
            email,
            phone,
        }))
    }

    async fn taken(&self, field: UserField, value: &str) -> IdentityResult<bool> {
        self.repo.exists(field, value).await
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// Role-specific part of a sign-up
#[derive(Debug, Clone)]
pub enum RoleDetails {
    Employee { position: String },
    Patient,
}

impl RoleDetails {
    pub fn role(&self) -> UserRole {
        match self {
            RoleDetails::Employee { .. } => UserRole::Employee,
            RoleDetails::Patient => UserRole::Patient,
        }
    }
}

/// Sign up input
pub struct SignUpInput {
    pub national_id: String,
    pub phone: String,
    pub email: String,
    pub name: String,
    pub surname: String,
    pub password: ClearTextPassword,
    pub details: RoleDetails,
}

/// Sign up output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutput {
    pub role: UserRole,
    pub message: &'static str,
}

pub const USER_CREATED_MESSAGE: &str = "user created";

/// Sign up use case
pub struct SignUpUseCase<R, P>
where
    R: UserRepository,
    P: MailboxProbe,
{
    pipeline: RegistrationPipeline<R, P>,
    repo: Arc<R>,
    config: Arc<IdentityConfig>,
}

impl<R, P> SignUpUseCase<R, P>
where
    R: UserRepository,
    P: MailboxProbe,
{
    pub fn new(repo: Arc<R>, probe: Arc<P>, config: Arc<IdentityConfig>) -> Self {
        Self {
            pipeline: RegistrationPipeline::new(repo.clone(), probe, config.clone()),
            repo,
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> IdentityResult<SignUpOutput> {
        let role = input.details.role();

        let fields = self
            .pipeline
            .check(RegistrationInput {
                role,
                national_id: &input.national_id,
                phone: &input.phone,
                email: &input.email,
                password: input.password.as_str(),
            })
            .await?
            .map_err(|reason| {
                tracing::info!(%role, reason = reason.code(), "Registration rejected");
                IdentityError::from(reason)
            })?;

        let password_hash = input
            .password
            .hash(self.config.pepper())
            .map_err(|e| IdentityError::Internal(e.to_string()))?;

        let user = UserRecord {
            national_id: fields.national_id,
            phone: fields.phone,
            email: fields.email,
            name: input.name,
            surname: input.surname,
            password_hash,
        };

        let inserted = match input.details {
            RoleDetails::Employee { position } => {
                self.repo
                    .insert_employee(&EmployeeRecord { user, position })
                    .await
            }
            RoleDetails::Patient => self.repo.insert_patient(&PatientRecord { user }).await,
        };

        match inserted {
            Ok(true) => {}
            Ok(false) => {
                return Err(IdentityError::PersistenceFailed(format!(
                    "{role} insert reported no row written"
                )));
            }
            Err(e) => return Err(IdentityError::PersistenceFailed(e.to_string())),
        }

        tracing::info!(%role, "User signed up");

        Ok(SignUpOutput {
            role,
            message: USER_CREATED_MESSAGE,
        })
    }
}
