//! # Phone Number Plausibility
//!
//! Format-level checks for the mobile number field and normalization to
//! E.164 (`+` followed by the country calling code and subscriber number).
//!
//! No numbering-plan lookups happen here: a number is plausible when its
//! characters, prefix, and digit count fit E.164, nothing more.
//!
//! ## Accepted input shapes
//!
//! - International: `+90 555 123 45 67`, `+1 (415) 555-0100`, `0044 20 7946 0958`.
//! - National: `0555 123 45 67`: the trunk `0` is dropped and the default
//!   country's calling code is prepended.

use thiserror::Error;

/// Fewest digits (calling code included) accepted after normalization.
pub const MIN_DIGITS: usize = 8;

/// Most digits (calling code included) permitted by E.164.
pub const MAX_DIGITS: usize = 15;

/// Reason a phone number was not plausible.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// Nothing but whitespace was entered.
    #[error("phone number is empty")]
    Empty,

    /// A character other than digits and the allowed separators.
    #[error("unexpected character {0:?} in phone number")]
    InvalidCharacter(char),

    /// A `+` anywhere but the first position.
    #[error("'+' may only appear at the start of a phone number")]
    MisplacedPlus,

    /// Calling codes never start with 0.
    #[error("calling code cannot start with 0")]
    InvalidCallingCode,

    /// Fewer than [`MIN_DIGITS`] digits.
    #[error("phone number has {0} digits, expected at least {MIN_DIGITS}")]
    TooShort(usize),

    /// More than [`MAX_DIGITS`] digits.
    #[error("phone number has {0} digits, expected at most {MAX_DIGITS}")]
    TooLong(usize),
}

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '-' | '.' | '(' | ')')
}

/// Normalize a raw phone number to E.164.
///
/// `default_calling_code` (digits only, e.g. `"90"`) is prepended to
/// numbers written without an international prefix.
///
/// # Errors
///
/// Returns the first [`PhoneError`] found, scanning left to right.
pub fn normalize_phone(raw: &str, default_calling_code: &str) -> Result<String, PhoneError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PhoneError::Empty);
    }

    let (international, rest) = if let Some(rest) = trimmed.strip_prefix('+') {
        (true, rest)
    } else if let Some(rest) = trimmed.strip_prefix("00") {
        (true, rest)
    } else {
        (false, trimmed)
    };

    let mut digits = String::with_capacity(MAX_DIGITS);
    for c in rest.chars() {
        match c {
            '0'..='9' => digits.push(c),
            '+' => return Err(PhoneError::MisplacedPlus),
            c if is_separator(c) => {}
            c => return Err(PhoneError::InvalidCharacter(c)),
        }
    }

    if !international {
        let national = digits.strip_prefix('0').unwrap_or(&digits);
        digits = format!("{default_calling_code}{national}");
    }

    if digits.starts_with('0') {
        return Err(PhoneError::InvalidCallingCode);
    }
    if digits.len() < MIN_DIGITS {
        return Err(PhoneError::TooShort(digits.len()));
    }
    if digits.len() > MAX_DIGITS {
        return Err(PhoneError::TooLong(digits.len()));
    }
    Ok(format!("+{digits}"))
}
