//! # Email Address Grammar
//!
//! Accepts `local@domain.tld` addresses:
//!
//! - local part of letters, digits, and `_ ' + - .`, ending in a letter,
//!   digit, `_`, `+` or `-`;
//! - no leading dot and no `..` anywhere;
//! - one or more domain labels (letter or digit first, then letters, digits,
//!   `-`), each followed by a dot, and an alphabetic TLD of two or more
//!   letters.
//!
//! Quoted local parts, IP-literal domains, and internationalized addresses
//! are rejected.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Whether `candidate` is a syntactically valid email address.
pub fn is_valid_email(candidate: &str) -> bool {
    // The regex crate has no lookahead; the two negative conditions are
    // checked by hand.
    if candidate.starts_with('.') || candidate.contains("..") {
        return false;
    }
    EMAIL_PATTERN.is_match(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_addresses_pass() {
        for addr in [
            "user@example.com",
            "jane@example.com",
            "first.last@sub.example.co.uk",
            "o'neil+tag@mail-server.org",
            "a_b-c@x1.io",
        ] {
            assert!(is_valid_email(addr), "{addr} should be valid");
        }
    }

    #[test]
    fn test_malformed_addresses_fail() {
        for addr in [
            "",
            "not-an-email",
            "@example.com",
            "user@",
            "user@example",
            "user@example.c",
            "user@.example.com",
            "user@-example.com",
            ".user@example.com",
            "us..er@example.com",
            "user.@example.com",
            "user@example..com",
            "user@@example.com",
            "user name@example.com",
            "user@example.com ",
            "user@exa_mple.com",
            "user@example.123",
        ] {
            assert!(!is_valid_email(addr), "{addr:?} should be invalid");
        }
    }

    #[test]
    fn test_non_ascii_rejected() {
        assert!(!is_valid_email("jöran@example.com"));
        assert!(!is_valid_email("user@exämple.com"));
    }
}
