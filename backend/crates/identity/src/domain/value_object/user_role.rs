use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Patient,
    Employee,
}

impl UserRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Patient => "patient",
            Employee => "employee",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(UserRole::Patient.code(), "patient");
        assert_eq!(UserRole::Employee.to_string(), "employee");
    }

    #[test]
    fn test_serde_uses_code() {
        let json = serde_json::to_string(&UserRole::Employee).unwrap();
        assert_eq!(json, "\"employee\"");
    }
}
