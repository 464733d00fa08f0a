//! # Schema Validation
//!
//! Whole-record validation of a [`FormInput`] snapshot.
//!
//! ## Invariants
//!
//! - Every field is checked, even after an earlier field failed.
//! - At most one [`Violation`] per field: the first failing rule in the
//!   field's declared order.
//! - The result is `Rejected` iff at least one field failed.
//! - Total: any `FormInput`, however malformed, yields a result. No I/O,
//!   no panics.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use signup_core::{country, Field, FormConfig, FormInput, DEFAULT_COUNTRY};

use crate::phone::normalize_phone;
use crate::rules::{rules_for, Rule};

/// A failed rule attached to its field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Field the rule belongs to.
    pub field: Field,
    /// The rule that failed.
    pub rule: Rule,
    /// Human-readable message for the field.
    pub message: String,
}

impl Violation {
    fn new(rule: Rule) -> Self {
        Self {
            field: rule.field(),
            rule,
            message: rule.message().to_string(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}: {}", self.field, self.message)
    }
}

/// Field-scoped violations, ordered by field declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    by_field: BTreeMap<Field, Violation>,
}

impl ValidationErrors {
    /// Returns the number of failing fields.
    pub fn len(&self) -> usize {
        self.by_field.len()
    }

    /// Returns true if no field failed.
    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }

    /// The violation for a field, if it failed.
    pub fn get(&self, field: Field) -> Option<&Violation> {
        self.by_field.get(&field)
    }

    /// The message for a field, if it failed.
    pub fn message(&self, field: Field) -> Option<&str> {
        self.by_field.get(&field).map(|v| v.message.as_str())
    }

    /// Failing fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.by_field.keys().copied()
    }

    /// Violations in field declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.by_field.values()
    }

    fn insert(&mut self, violation: Violation) {
        self.by_field.insert(violation.field, violation);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.by_field.values().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

// Serialized as `{ "<field>": "<message>" }`, the shape hosts render.
impl Serialize for ValidationErrors {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.by_field.len()))?;
        for (field, violation) in &self.by_field {
            map.serialize_entry(field.as_str(), &violation.message)?;
        }
        map.end()
    }
}

/// A record that passed every rule.
///
/// The mobile number is stored in E.164 form.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedForm {
    /// Full name, as entered.
    pub full_name: String,
    /// Email address, as entered.
    pub email: String,
    /// Password, as entered.
    pub password: String,
    /// Normalized E.164 phone number.
    pub mobile_number: String,
    /// Always `true` for an accepted record.
    #[serde(rename = "terms")]
    pub terms_accepted: bool,
}

impl fmt::Debug for AcceptedForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcceptedForm")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("mobile_number", &self.mobile_number)
            .field("terms_accepted", &self.terms_accepted)
            .finish()
    }
}

/// Outcome of validating a snapshot. Exactly one variant is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Every rule passed.
    Accepted(AcceptedForm),
    /// At least one field failed.
    Rejected(ValidationErrors),
}

impl ValidationResult {
    /// Whether the snapshot was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The accepted record, if any.
    pub fn accepted(&self) -> Option<&AcceptedForm> {
        match self {
            Self::Accepted(form) => Some(form),
            Self::Rejected(_) => None,
        }
    }

    /// The field errors, if rejected.
    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Accepted(_) => None,
            Self::Rejected(errors) => Some(errors),
        }
    }
}

/// Options that parameterize rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Calling code (digits, no `+`) for national phone numbers.
    pub default_calling_code: String,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            // The table always carries the default country.
            default_calling_code: country::calling_code(DEFAULT_COUNTRY)
                .unwrap_or("90")
                .to_string(),
        }
    }
}

impl ValidatorOptions {
    /// Options derived from a session configuration.
    ///
    /// Falls back to the default country when the configured one is unknown;
    /// [`FormConfig::check`] rejects that case before a session starts.
    pub fn from_config(config: &FormConfig) -> Self {
        match config.default_calling_code() {
            Some(code) => Self {
                default_calling_code: code.to_string(),
            },
            None => Self::default(),
        }
    }
}

/// The registration schema validator.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    options: ValidatorOptions,
}

impl Validator {
    /// Create a validator with explicit options.
    pub fn new(options: ValidatorOptions) -> Self {
        Self { options }
    }

    /// Returns the validator options.
    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// First failing rule of one field, if any.
    pub fn validate_field(&self, field: Field, input: &FormInput) -> Option<Violation> {
        rules_for(field)
            .iter()
            .find(|rule| !rule.passes(input, &self.options.default_calling_code))
            .map(|rule| Violation::new(*rule))
    }

    /// Validate every field of a snapshot.
    pub fn validate(&self, input: &FormInput) -> ValidationResult {
        let mut errors = ValidationErrors::default();
        for field in Field::ALL {
            if let Some(violation) = self.validate_field(field, input) {
                errors.insert(violation);
            }
        }

        if !errors.is_empty() {
            return ValidationResult::Rejected(errors);
        }

        match normalize_phone(&input.mobile_number, &self.options.default_calling_code) {
            Ok(mobile_number) => ValidationResult::Accepted(AcceptedForm {
                full_name: input.full_name.clone(),
                email: input.email.clone(),
                password: input.password.clone(),
                mobile_number,
                terms_accepted: input.terms_accepted,
            }),
            // Unreachable while the phone rules and normalization agree;
            // kept total rather than panicking.
            Err(_) => {
                errors.insert(Violation::new(Rule::MobileNumberInvalid));
                ValidationResult::Rejected(errors)
            }
        }
    }
}

/// Validate a snapshot with the default options.
pub fn validate(input: &FormInput) -> ValidationResult {
    Validator::default().validate(input)
}
