//! # Field Catalogue
//!
//! The five fields of the registration form, in declaration order.
//!
//! Declaration order is significant: error sets are keyed by [`Field`] in a
//! `BTreeMap`, so the derived `Ord` decides the order in which field errors
//! are reported and rendered.

use serde::{Deserialize, Serialize};

/// Total number of form fields.
pub const FIELD_COUNT: usize = 5;

/// A field of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// The user's full name.
    FullName,
    /// Contact email address.
    Email,
    /// Account password.
    Password,
    /// Mobile phone number.
    MobileNumber,
    /// Terms & Conditions acceptance checkbox.
    Terms,
}

impl Field {
    /// All fields in declaration order.
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::FullName,
        Field::Email,
        Field::Password,
        Field::MobileNumber,
        Field::Terms,
    ];

    /// Wire name of the field, as used in payloads and error maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::Email => "email",
            Self::Password => "password",
            Self::MobileNumber => "mobile_number",
            Self::Terms => "terms",
        }
    }

    /// Label shown next to the field widget.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullName => "Full Name",
            Self::Email => "Email Address",
            Self::Password => "Create Password",
            Self::MobileNumber => "Mobile Number",
            Self::Terms => "Agree to Terms & Conditions",
        }
    }

    /// Whether the field holds a boolean rather than text.
    pub fn is_flag(&self) -> bool {
        matches!(self, Self::Terms)
    }

    /// Look a field up by its wire name.
    pub fn from_name(name: &str) -> Option<Field> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
