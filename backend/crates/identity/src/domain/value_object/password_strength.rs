//! Password Strength
//!
//! A password is strong when, over the whole string:
//! - it has at least [`MIN_PASSWORD_CHARS`] characters
//! - it has an uppercase letter (Lu), a lowercase letter (Ll) and a number (N*)
//! - it has a punctuation (P*) or symbol (S*) character
//! - it contains no U+0020 space
//!
//! Classes follow Unicode general categories, so `Ñ` counts as uppercase and
//! `¿` as punctuation.

use unicode_general_category::{GeneralCategory, get_general_category};

/// Minimum length, counted in Unicode scalar values
pub const MIN_PASSWORD_CHARS: usize = 7;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CharClasses {
    upper: bool,
    lower: bool,
    number: bool,
    special: bool,
    space: bool,
}

impl CharClasses {
    fn scan(pw: &str) -> Self {
        pw.chars().fold(Self::default(), |mut classes, c| {
            if c == ' ' {
                classes.space = true;
                return classes;
            }
            match get_general_category(c) {
                GeneralCategory::UppercaseLetter => classes.upper = true,
                GeneralCategory::LowercaseLetter => classes.lower = true,
                GeneralCategory::DecimalNumber
                | GeneralCategory::LetterNumber
                | GeneralCategory::OtherNumber => classes.number = true,
                GeneralCategory::ConnectorPunctuation
                | GeneralCategory::DashPunctuation
                | GeneralCategory::OpenPunctuation
                | GeneralCategory::ClosePunctuation
                | GeneralCategory::InitialPunctuation
                | GeneralCategory::FinalPunctuation
                | GeneralCategory::OtherPunctuation
                | GeneralCategory::MathSymbol
                | GeneralCategory::CurrencySymbol
                | GeneralCategory::ModifierSymbol
                | GeneralCategory::OtherSymbol => classes.special = true,
                _ => {}
            }
            classes
        })
    }

    fn is_strong(&self) -> bool {
        self.upper && self.lower && self.number && self.special && !self.space
    }
}

pub fn validate_password_strength(pw: &str) -> bool {
    pw.chars().count() >= MIN_PASSWORD_CHARS && CharClasses::scan(pw).is_strong()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_password() {
        assert!(validate_password_strength("Abcdef1!"));
        assert!(validate_password_strength("Zz9#Zz9#"));
    }

    #[test]
    fn test_each_missing_class() {
        assert!(!validate_password_strength("abcdef1!"), "no uppercase");
        assert!(!validate_password_strength("ABCDEF1!"), "no lowercase");
        assert!(!validate_password_strength("Abcdefg!"), "no number");
        assert!(!validate_password_strength("Abcdef12"), "no symbol");
        assert!(!validate_password_strength("Abcdef!"), "no digit");
    }

    #[test]
    fn test_space_anywhere_rejected() {
        assert!(!validate_password_strength("Abc def1!"));
        assert!(!validate_password_strength(" Abcdef1!"));
        assert!(!validate_password_strength("Abcdef1! "));
    }

    #[test]
    fn test_minimum_length() {
        assert!(!validate_password_strength("Abc1!x"));
        assert!(validate_password_strength("Abc1!xy"));
    }

    #[test]
    fn test_unicode_categories() {
        // Ñ is Lu, ñ is Ll, ¿ is Po
        assert!(validate_password_strength("Ñandú1¿"));
        // € is Sc
        assert!(validate_password_strength("Precio9€"));
        // Non-ASCII lowercase alone doesn't satisfy uppercase
        assert!(!validate_password_strength("ñandúes1!"));
        // Arabic-Indic digit counts as a number
        assert!(validate_password_strength("Abcdef٣!"));
    }

    #[test]
    fn test_other_whitespace_is_not_the_space_rule() {
        // Tab is not U+0020 and is neither letter, number nor symbol
        assert!(validate_password_strength("Abc\tdef1!"));
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        // 6 chars, 9 bytes
        assert!(!validate_password_strength("Ññ1¿ab"));
    }
}
