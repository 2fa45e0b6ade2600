//! Login Selector
//!
//! A login names the account by national ID or by email, never both.

use crate::domain::value_object::user_field::UserField;
use crate::error::{IdentityError, IdentityResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginSelector {
    NationalId(String),
    Email(String),
}

impl LoginSelector {
    /// Exactly one of the two must be present and non-empty.
    /// Both or neither is [`IdentityError::InvalidSelector`].
    pub fn from_parts(
        national_id: Option<String>,
        email: Option<String>,
    ) -> IdentityResult<Self> {
        let national_id = national_id.filter(|s| !s.is_empty());
        let email = email.filter(|s| !s.is_empty());

        match (national_id, email) {
            (Some(id), None) => Ok(Self::NationalId(id.to_ascii_uppercase())),
            (None, Some(email)) => Ok(Self::Email(email.to_lowercase())),
            _ => Err(IdentityError::InvalidSelector),
        }
    }

    pub fn field(&self) -> UserField {
        match self {
            Self::NationalId(_) => UserField::NationalId,
            Self::Email(_) => UserField::Email,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::NationalId(v) | Self::Email(v) => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_selector() {
        let sel = LoginSelector::from_parts(Some("12345678z".into()), None).unwrap();
        assert_eq!(sel.field(), UserField::NationalId);
        assert_eq!(sel.value(), "12345678Z");

        let sel = LoginSelector::from_parts(None, Some("Ana@Example.com".into())).unwrap();
        assert_eq!(sel.field(), UserField::Email);
        assert_eq!(sel.value(), "ana@example.com");
    }

    #[test]
    fn test_empty_counts_as_absent() {
        let sel = LoginSelector::from_parts(Some(String::new()), Some("a@b.es".into())).unwrap();
        assert_eq!(sel.field(), UserField::Email);
    }

    #[test]
    fn test_both_or_neither_rejected() {
        assert!(matches!(
            LoginSelector::from_parts(Some("12345678Z".into()), Some("a@b.es".into())),
            Err(IdentityError::InvalidSelector)
        ));
        assert!(matches!(
            LoginSelector::from_parts(None, None),
            Err(IdentityError::InvalidSelector)
        ));
        assert!(matches!(
            LoginSelector::from_parts(Some(String::new()), Some(String::new())),
            Err(IdentityError::InvalidSelector)
        ));
    }
}
