//! Entity Module

pub mod session_claims;
pub mod user_record;
pub mod validation_result;
