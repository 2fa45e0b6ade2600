//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, header};
use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::IdentityConfig;
use crate::application::login::SESSION_ALREADY_ACTIVE_MESSAGE;
use crate::application::session_token::SessionTokenService;
use crate::application::{
    CheckLinkUseCase, CheckSessionUseCase, EmailVerifier, LoginInput, LoginOutput, LoginUseCase, RoleDetails,
    SignUpInput, SignUpUseCase,
};
use crate::domain::repository::{LinkRepository, MailboxProbe, PasswordVerifier, UserRepository};
use crate::error::IdentityResult;
use crate::presentation::dto::{
    EmailCheckRequest, EmailCheckResponse, EmployeeSignUpRequest, LinkStatusResponse, LoginRequest, LoginResponse, PatientSignUpRequest,
    SessionStatusResponse, SignUpResponse,
};

/// Shared state for identity handlers
pub struct IdentityAppState<R, P>
where
    R: UserRepository + PasswordVerifier + LinkRepository + Send + Sync + 'static,
    P: MailboxProbe + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub probe: Arc<P>,
    pub tokens: Arc<SessionTokenService>,
    pub config: Arc<IdentityConfig>,
}

impl<R, P> Clone for IdentityAppState<R, P>
where
    R: UserRepository + PasswordVerifier + LinkRepository + Send + Sync + 'static,
    P: MailboxProbe + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            probe: self.probe.clone(),
            tokens: self.tokens.clone(),
            config: self.config.clone(),
        }
    }
}

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

// ============================================================================
// Sign Up
// ============================================================================

async fn sign_up<R, P>(
    state: &IdentityAppState<R, P>,
    input: SignUpInput,
) -> IdentityResult<Json<SignUpResponse>>
where
    R: UserRepository + PasswordVerifier + LinkRepository + Send + Sync + 'static,
    P: MailboxProbe + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.probe.clone(),
        state.config.clone(),
    );

    let output = use_case.execute(input).await?;

    Ok(Json(SignUpResponse {
        message: output.message.to_string(),
        role: output.role.code().to_string(),
    }))
}

/// POST /signup/employee
pub async fn sign_up_employee<R, P>(
    State(state): State<IdentityAppState<R, P>>,
    Json(req): Json<EmployeeSignUpRequest>,
) -> IdentityResult<Json<SignUpResponse>>
where
    R: UserRepository + PasswordVerifier + LinkRepository + Send + Sync + 'static,
    P: MailboxProbe + Send + Sync + 'static,
{
    let input = SignUpInput {
        national_id: req.national_id,
        phone: req.phone,
        email: req.email,
        name: req.name,
        surname: req.surname,
        password: ClearTextPassword::new(req.password),
        details: RoleDetails::Employee {
            position: req.position,
        },
    };

    sign_up(&state, input).await
}

/// POST /signup/patient
pub async fn sign_up_patient<R, P>(
    State(state): State<IdentityAppState<R, P>>,
    Json(req): Json<PatientSignUpRequest>,
) -> IdentityResult<Json<SignUpResponse>>
where
    R: UserRepository + PasswordVerifier + LinkRepository + Send + Sync + 'static,
    P: MailboxProbe + Send + Sync + 'static,
{
    let input = SignUpInput {
        national_id: req.national_id,
        phone: req.phone,
        email: req.email,
        name: req.name,
        surname: req.surname,
        password: ClearTextPassword::new(req.password),
        details: RoleDetails::Patient,
    };

    sign_up(&state, input).await
}

// ============================================================================
// Login
// ============================================================================

/// POST /login
pub async fn login<R, P>(
    State(state): State<IdentityAppState<R, P>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> IdentityResult<Json<LoginResponse>>
where
    R: UserRepository + PasswordVerifier + LinkRepository + Send + Sync + 'static,
    P: MailboxProbe + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let input = LoginInput {
        national_id: req.national_id,
        email: req.email,
        password: req.password,
        presented_token: authorization(&headers).map(str::to_string),
    };

    let response = match use_case.execute(input).await? {
        LoginOutput::AlreadyActive => LoginResponse {
            state: SESSION_ALREADY_ACTIVE_MESSAGE.to_string(),
            name: None,
            user_id: None,
            token: None,
        },
        LoginOutput::Authenticated {
            name,
            user_id,
            token,
        } => LoginResponse {
            state: "authenticated".to_string(),
            name: Some(name),
            user_id: Some(user_id),
            token: Some(token),
        },
    };

    Ok(Json(response))
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /session
pub async fn session_status<R, P>(
    State(state): State<IdentityAppState<R, P>>,
    headers: HeaderMap,
) -> Json<SessionStatusResponse>
where
    R: UserRepository + PasswordVerifier + LinkRepository + Send + Sync + 'static,
    P: MailboxProbe + Send + Sync + 'static,
{
    let use_case = CheckSessionUseCase::new(state.tokens.clone());

    match use_case.execute(authorization(&headers)) {
        Ok(info) => Json(SessionStatusResponse {
            authenticated: true,
            subject: Some(info.subject),
            expires_at: Some(info.expires_at),
        }),
        Err(_) => Json(SessionStatusResponse {
            authenticated: false,
            subject: None,
            expires_at: None,
        }),
    }
}

// ============================================================================
// Links
// ============================================================================

/// GET /links/{link_id}
pub async fn link_status<R, P>(
    State(state): State<IdentityAppState<R, P>>,
    Path(link_id): Path<String>,
) -> IdentityResult<Json<LinkStatusResponse>>
where
    R: UserRepository + PasswordVerifier + LinkRepository + Send + Sync + 'static,
    P: MailboxProbe + Send + Sync + 'static,
{
    let use_case = CheckLinkUseCase::new(state.repo.clone(), state.tokens.clone());
    let valid = use_case.execute(&link_id).await?;
    Ok(Json(LinkStatusResponse { valid }))
}

// ============================================================================
// Email
// ============================================================================

/// POST /email/check
///
/// Pre-sign-up deliverability check. Probe failures answer `valid: false`.
pub async fn email_check<R, P>(
    State(state): State<IdentityAppState<R, P>>,
    Json(req): Json<EmailCheckRequest>,
) -> Json<EmailCheckResponse>
where
    R: UserRepository + PasswordVerifier + LinkRepository + Send + Sync + 'static,
    P: MailboxProbe + Send + Sync + 'static,
{
    let verifier = EmailVerifier::new(state.probe.clone(), state.config.mail_probe.timeout);
    Json(EmailCheckResponse {
        valid: verifier.validate(&req.email).await,
    })
}
