//! Shared Kernel
//!
//! Error vocabulary shared by every backend crate:
//! - [`error::kind::ErrorKind`] classifies failures and maps them to HTTP status codes
//! - [`error::app_error::AppError`] carries the user-facing message and a stable reason code
//! - [`error::conversions`] bridges std/serde_json errors and renders problem JSON
//!
//! Nothing domain specific lives here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
