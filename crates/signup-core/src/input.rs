//! # Form Input Record
//!
//! The mutable record a form session edits field by field. Values are
//! transient until submission: empty and invalid strings are expected here,
//! and only the validator decides whether a snapshot is acceptable.

use serde::{Deserialize, Serialize};

use crate::error::SignupError;
use crate::field::Field;

/// Raw values of the registration form.
///
/// `Default` yields the state at session creation: empty strings and
/// `terms_accepted = false`. Missing keys in YAML/JSON input files fall back
/// to the same defaults.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormInput {
    /// Full name as typed.
    pub full_name: String,
    /// Email address as typed.
    pub email: String,
    /// Password as typed.
    pub password: String,
    /// Phone number as emitted by the phone widget.
    pub mobile_number: String,
    /// Terms & Conditions checkbox.
    #[serde(rename = "terms")]
    pub terms_accepted: bool,
}

/// A value written into a single field by an input widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text widgets (name, email, password, phone).
    Text(String),
    /// Checkbox widgets.
    Flag(bool),
}

impl FieldValue {
    /// The text payload, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Flag(_) => None,
        }
    }

    /// The flag payload, if this is a boolean value.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            Self::Text(_) => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Flag(_) => "flag",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl FormInput {
    /// An empty record, identical to `FormInput::default()`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the current value of a field.
    pub fn get(&self, field: Field) -> FieldValue {
        match field {
            Field::FullName => FieldValue::Text(self.full_name.clone()),
            Field::Email => FieldValue::Text(self.email.clone()),
            Field::Password => FieldValue::Text(self.password.clone()),
            Field::MobileNumber => FieldValue::Text(self.mobile_number.clone()),
            Field::Terms => FieldValue::Flag(self.terms_accepted),
        }
    }

    /// Write a value into a field.
    ///
    /// # Errors
    ///
    /// Returns [`SignupError::FieldKindMismatch`] when a flag is written into
    /// a text field or text into the terms checkbox. The record is left
    /// unchanged in that case.
    pub fn set(&mut self, field: Field, value: FieldValue) -> Result<(), SignupError> {
        let mismatch = |value: &FieldValue| SignupError::FieldKindMismatch {
            field,
            expected: if field.is_flag() { "flag" } else { "text" },
            actual: value.kind(),
        };
        match (field, value) {
            (Field::Terms, FieldValue::Flag(b)) => self.terms_accepted = b,
            (Field::Terms, v) => return Err(mismatch(&v)),
            (_, FieldValue::Flag(b)) => return Err(mismatch(&FieldValue::Flag(b))),
            (Field::FullName, FieldValue::Text(s)) => self.full_name = s,
            (Field::Email, FieldValue::Text(s)) => self.email = s,
            (Field::Password, FieldValue::Text(s)) => self.password = s,
            (Field::MobileNumber, FieldValue::Text(s)) => self.mobile_number = s,
        }
        Ok(())
    }

    /// Whether a field differs from its session-creation default.
    pub fn is_dirty(&self, field: Field) -> bool {
        self.get(field) != Self::default().get(field)
    }
}

// Password is never written to logs.
impl std::fmt::Debug for FormInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormInput")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("mobile_number", &self.mobile_number)
            .field("terms_accepted", &self.terms_accepted)
            .finish()
    }
}
