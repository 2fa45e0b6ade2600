//! National ID Value Object
//!
//! Eight decimal digits followed by a check letter. The letter is
//! `CHECK_LETTERS[number % 23]`.
//!
//! ## Usage
//! ```rust
//! use identity::domain::value_object::national_id::{NationalId, validate_national_id};
//!
//! assert!(validate_national_id("12345678Z"));
//! assert!(validate_national_id("12345678z"));
//! assert!(!validate_national_id("12345678A"));
//!
//! let id = NationalId::parse("12345678z").unwrap();
//! assert_eq!(id.as_str(), "12345678Z");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::entity::validation_result::RejectReason;

/// Total length (digits + letter)
pub const NATIONAL_ID_LENGTH: usize = 9;

const DIGITS_LENGTH: usize = 8;

/// Check letter table indexed by `number % 23`
pub const CHECK_LETTERS: [u8; 23] = *b"TRWAGMYFPDXBNJZSQVHLCKE";

/// Returns true iff `id` is 8 digits plus the matching check letter.
/// The letter comparison is case-insensitive.
pub fn validate_national_id(id: &str) -> bool {
    let bytes = id.as_bytes();
    if bytes.len() != NATIONAL_ID_LENGTH {
        return false;
    }

    let (digits, letter) = bytes.split_at(DIGITS_LENGTH);
    if !digits.iter().all(u8::is_ascii_digit) {
        return false;
    }

    let letter = letter[0].to_ascii_uppercase();
    if !letter.is_ascii_uppercase() {
        return false;
    }

    letter == expected_letter(digits)
}

/// `digits` must be ASCII digits; 8 digits never overflow a u32.
fn expected_letter(digits: &[u8]) -> u8 {
    let number = digits
        .iter()
        .fold(0u32, |acc, d| acc * 10 + u32::from(d - b'0'));
    CHECK_LETTERS[(number % 23) as usize]
}

/// Validated national ID, letter upper-cased
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NationalId(String);

impl NationalId {
    pub fn parse(raw: &str) -> Result<Self, RejectReason> {
        if !validate_national_id(raw) {
            return Err(RejectReason::InvalidNationalId);
        }
        Ok(Self(raw.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NationalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
