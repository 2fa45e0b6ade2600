use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity field a repository lookup is keyed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserField {
    NationalId,
    Email,
    Phone,
}

impl UserField {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        use UserField::*;
        match self {
            NationalId => "national_id",
            Email => "email",
            Phone => "phone",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
