//! # Field Rules
//!
//! Every rule of the registration schema, as independent predicate +
//! message pairs grouped per field. The order of each field's slice in
//! [`rules_for`] is the evaluation order; the first rule that fails
//! supplies the field's message and later rules for that field are not
//! consulted.
//!
//! Character classes follow ASCII semantics: `[A-Z]`, `[a-z]`, `[0-9]`.
//! Anything outside `[A-Za-z0-9_]` counts as a special character, including
//! non-ASCII letters.

use serde::{Deserialize, Serialize};

use signup_core::{Field, FormInput};

use crate::email::is_valid_email;
use crate::phone::{normalize_phone, PhoneError};

/// Minimum full name length, in Unicode code points.
pub const FULL_NAME_MIN: usize = 3;
/// Maximum full name length, in Unicode code points.
pub const FULL_NAME_MAX: usize = 100;
/// Minimum password length, in Unicode code points.
pub const PASSWORD_MIN: usize = 8;
/// Maximum password length, in Unicode code points.
pub const PASSWORD_MAX: usize = 40;

/// A single rule of the registration schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Full name shorter than [`FULL_NAME_MIN`].
    FullNameTooShort,
    /// Full name longer than [`FULL_NAME_MAX`].
    FullNameTooLong,
    /// Email does not match the address grammar.
    EmailInvalid,
    /// Password shorter than [`PASSWORD_MIN`].
    PasswordTooShort,
    /// Password longer than [`PASSWORD_MAX`].
    PasswordTooLong,
    /// Password has no `[A-Z]`.
    PasswordMissingUppercase,
    /// Password has no `[a-z]`.
    PasswordMissingLowercase,
    /// Password has no `[0-9]`.
    PasswordMissingDigit,
    /// Password has nothing outside `[A-Za-z0-9_]`.
    PasswordMissingSpecial,
    /// Mobile number is blank.
    MobileNumberRequired,
    /// Mobile number is not a plausible phone number.
    MobileNumberInvalid,
    /// Terms checkbox is not ticked.
    TermsNotAccepted,
}

const FULL_NAME_RULES: &[Rule] = &[Rule::FullNameTooShort, Rule::FullNameTooLong];

const EMAIL_RULES: &[Rule] = &[Rule::EmailInvalid];

const PASSWORD_RULES: &[Rule] = &[
    Rule::PasswordTooShort,
    Rule::PasswordTooLong,
    Rule::PasswordMissingUppercase,
    Rule::PasswordMissingLowercase,
    Rule::PasswordMissingDigit,
    Rule::PasswordMissingSpecial,
];

const MOBILE_NUMBER_RULES: &[Rule] = &[Rule::MobileNumberRequired, Rule::MobileNumberInvalid];

const TERMS_RULES: &[Rule] = &[Rule::TermsNotAccepted];

/// The rules of a field, in evaluation order.
pub fn rules_for(field: Field) -> &'static [Rule] {
    match field {
        Field::FullName => FULL_NAME_RULES,
        Field::Email => EMAIL_RULES,
        Field::Password => PASSWORD_RULES,
        Field::MobileNumber => MOBILE_NUMBER_RULES,
        Field::Terms => TERMS_RULES,
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn is_special(c: char) -> bool {
    !(c.is_ascii_alphanumeric() || c == '_')
}

impl Rule {
    /// The field this rule belongs to.
    pub fn field(&self) -> Field {
        match self {
            Self::FullNameTooShort | Self::FullNameTooLong => Field::FullName,
            Self::EmailInvalid => Field::Email,
            Self::PasswordTooShort
            | Self::PasswordTooLong
            | Self::PasswordMissingUppercase
            | Self::PasswordMissingLowercase
            | Self::PasswordMissingDigit
            | Self::PasswordMissingSpecial => Field::Password,
            Self::MobileNumberRequired | Self::MobileNumberInvalid => Field::MobileNumber,
            Self::TermsNotAccepted => Field::Terms,
        }
    }

    /// Stable, locale-independent kind code of the violation.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FullNameTooShort | Self::PasswordTooShort => "too_short",
            Self::FullNameTooLong | Self::PasswordTooLong => "too_long",
            Self::EmailInvalid => "invalid_format",
            Self::PasswordMissingUppercase => "missing_uppercase",
            Self::PasswordMissingLowercase => "missing_lowercase",
            Self::PasswordMissingDigit => "missing_digit",
            Self::PasswordMissingSpecial => "missing_special",
            Self::MobileNumberRequired => "required",
            Self::MobileNumberInvalid => "invalid_phone",
            Self::TermsNotAccepted => "terms_not_accepted",
        }
    }

    /// Human-readable message shown beside the field.
    pub fn message(&self) -> &'static str {
        match self {
            Self::FullNameTooShort => "Full Name must have at least 3 character.",
            Self::FullNameTooLong => "Full Name cannot exceed 100 characters.",
            Self::EmailInvalid => "Please provide a valid email address.",
            Self::PasswordTooShort => "Password must be at least 8 characters.",
            Self::PasswordTooLong => "Password cannot exceed 40 characters.",
            Self::PasswordMissingUppercase => "Password must contain at least one uppercase letter.",
            Self::PasswordMissingLowercase => "Password must contain at least one lowercase letter.",
            Self::PasswordMissingDigit => "Password must contain at least one number.",
            Self::PasswordMissingSpecial => "Password must contain at least one special character.",
            Self::MobileNumberRequired => "Mobile number is required.",
            Self::MobileNumberInvalid => "Please provide a valid phone number.",
            Self::TermsNotAccepted => "You must accept the terms and conditions.",
        }
    }

    /// Whether `input` satisfies this rule.
    ///
    /// `calling_code` is the default country's calling code, used to
    /// interpret national phone numbers.
    pub fn passes(&self, input: &FormInput, calling_code: &str) -> bool {
        match self {
            Self::FullNameTooShort => char_len(&input.full_name) >= FULL_NAME_MIN,
            Self::FullNameTooLong => char_len(&input.full_name) <= FULL_NAME_MAX,
            Self::EmailInvalid => is_valid_email(&input.email),
            Self::PasswordTooShort => char_len(&input.password) >= PASSWORD_MIN,
            Self::PasswordTooLong => char_len(&input.password) <= PASSWORD_MAX,
            Self::PasswordMissingUppercase => input.password.chars().any(|c| c.is_ascii_uppercase()),
            Self::PasswordMissingLowercase => input.password.chars().any(|c| c.is_ascii_lowercase()),
            Self::PasswordMissingDigit => input.password.chars().any(|c| c.is_ascii_digit()),
            Self::PasswordMissingSpecial => input.password.chars().any(is_special),
            Self::MobileNumberRequired => !input.mobile_number.trim().is_empty(),
            Self::MobileNumberInvalid => match normalize_phone(&input.mobile_number, calling_code) {
                Ok(_) => true,
                // Blank input is the previous rule's concern.
                Err(PhoneError::Empty) => true,
                Err(_) => false,
            },
            Self::TermsNotAccepted => input.terms_accepted,
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.field(), self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_password(password: &str) -> FormInput {
        FormInput {
            password: password.to_string(),
            ..FormInput::default()
        }
    }

    #[test]
    fn test_every_rule_listed_under_its_own_field() {
        for field in Field::ALL {
            let rules = rules_for(field);
            assert!(!rules.is_empty(), "{field} has no rules");
            for rule in rules {
                assert_eq!(rule.field(), field, "{rule:?} listed under {field}");
            }
        }
    }

    #[test]
    fn test_password_rule_order() {
        assert_eq!(
            rules_for(Field::Password),
            &[
                Rule::PasswordTooShort,
                Rule::PasswordTooLong,
                Rule::PasswordMissingUppercase,
                Rule::PasswordMissingLowercase,
                Rule::PasswordMissingDigit,
                Rule::PasswordMissingSpecial,
            ]
        );
    }

    #[test]
    fn test_special_character_classes() {
        let input = with_password("abc");
        assert!(!Rule::PasswordMissingSpecial.passes(&input, "90"));
        assert!(Rule::PasswordMissingSpecial.passes(&with_password("a!"), "90"));
        assert!(Rule::PasswordMissingSpecial.passes(&with_password("a b"), "90"));
        assert!(Rule::PasswordMissingSpecial.passes(&with_password("añ"), "90"));
        assert!(!Rule::PasswordMissingSpecial.passes(&with_password("a_b"), "90"));
    }

    #[test]
    fn test_case_rules_are_ascii() {
        assert!(!Rule::PasswordMissingUppercase.passes(&with_password("ÉCOLE"), "90"));
        assert!(!Rule::PasswordMissingLowercase.passes(&with_password("école"), "90"));
    }

    #[test]
    fn test_length_counts_code_points() {
        let input = FormInput {
            full_name: "Zoë".to_string(),
            ..FormInput::default()
        };
        assert_eq!(input.full_name.len(), 4);
        assert!(Rule::FullNameTooShort.passes(&input, "90"));

        let emoji = FormInput {
            full_name: "😀😀".to_string(),
            ..FormInput::default()
        };
        assert!(!Rule::FullNameTooShort.passes(&emoji, "90"));
    }

    #[test]
    fn test_blank_phone_only_fails_required() {
        let input = FormInput {
            mobile_number: "  ".to_string(),
            ..FormInput::default()
        };
        assert!(!Rule::MobileNumberRequired.passes(&input, "90"));
        assert!(Rule::MobileNumberInvalid.passes(&input, "90"));
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(Rule::FullNameTooShort.kind(), "too_short");
        assert_eq!(Rule::FullNameTooLong.kind(), "too_long");
        assert_eq!(Rule::EmailInvalid.kind(), "invalid_format");
        assert_eq!(Rule::TermsNotAccepted.to_string(), "terms.terms_not_accepted");
    }
}
