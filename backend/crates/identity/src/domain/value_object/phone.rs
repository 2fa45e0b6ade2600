//! Phone Value Object
//!
//! Nine ASCII digits; the first one must be 6, 7 or 9.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::entity::validation_result::RejectReason;

pub const PHONE_LENGTH: usize = 9;

/// Leading digits accepted for phone numbers
pub const PHONE_PREFIXES: [u8; 3] = [b'6', b'7', b'9'];

/// Equivalent to `^[679]\d{8}$` over ASCII digits
pub fn validate_phone(phone: &str) -> bool {
    let bytes = phone.as_bytes();
    match bytes.split_first() {
        Some((first, _)) if bytes.len() == PHONE_LENGTH => {
            PHONE_PREFIXES.contains(first) && bytes.iter().all(u8::is_ascii_digit)
        }
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Phone(String);

impl Phone {
    pub fn parse(raw: &str) -> Result<Self, RejectReason> {
        if !validate_phone(raw) {
            return Err(RejectReason::InvalidPhone);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
