//! Identity Router

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;

use crate::application::config::IdentityConfig;
use crate::application::session_token::{SessionTokenService, SharedClock};
use crate::domain::repository::{LinkRepository, MailboxProbe, PasswordVerifier, UserRepository};
use crate::error::IdentityResult;
use crate::presentation::handlers::{self, IdentityAppState};

/// Create the Identity router for any repository and probe implementation.
///
/// Every request is cut off after `config.request_timeout` with 408.
/// Fails with a configuration error if the token secret or audience is unusable.
pub fn identity_router<R, P>(
    repo: Arc<R>,
    probe: Arc<P>,
    config: IdentityConfig,
    clock: SharedClock,
) -> IdentityResult<Router>
where
    R: UserRepository + PasswordVerifier + LinkRepository + Send + Sync + 'static,
    P: MailboxProbe + Send + Sync + 'static,
{
    let tokens = SessionTokenService::new(&config, clock)?;
    let request_timeout = config.request_timeout;

    let state = IdentityAppState {
        repo,
        probe,
        tokens: Arc::new(tokens),
        config: Arc::new(config),
    };

    Ok(Router::new()
        .route("/signup/employee", post(handlers::sign_up_employee::<R, P>))
        .route("/signup/patient", post(handlers::sign_up_patient::<R, P>))
        .route("/login", post(handlers::login::<R, P>))
        .route("/session", get(handlers::session_status::<R, P>))
        .route("/links/{link_id}", get(handlers::link_status::<R, P>))
        .route("/email/check", post(handlers::email_check::<R, P>))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state))
}
