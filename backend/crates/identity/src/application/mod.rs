//! Application Layer
//!
//! Use cases and application services.

pub mod check_link;
pub mod check_session;
pub mod config;
pub mod email_check;
pub mod login;
pub mod register;
pub mod session_token;

// Re-exports
pub use check_link::CheckLinkUseCase;
pub use check_session::{CheckSessionUseCase, SessionInfoOutput};
pub use config::{IdentityConfig, LoginFailurePolicy, MailProbeConfig};
pub use email_check::EmailVerifier;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use register::{
    RegistrationInput, RegistrationPipeline, RoleDetails, SignUpInput, SignUpOutput,
    SignUpUseCase,
};
pub use session_token::{IssuedToken, SessionTokenService, SharedClock};
