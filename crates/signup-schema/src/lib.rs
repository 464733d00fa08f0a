//! # signup-schema — Registration Form Validation
//!
//! A pure, total validator for the fixed registration schema.
//!
//! ## Rules (`rules`)
//!
//! Each field owns an ordered list of independent predicate + message
//! pairs. Rules are evaluated top-to-bottom and the first failing rule
//! supplies the field's only message. See [`rules::rules_for`].
//!
//! ## Validation (`validate`)
//!
//! - [`validate`]: checks every field (errors accumulate) and returns
//!   either [`ValidationResult::Accepted`] with a typed [`AcceptedForm`] or
//!   [`ValidationResult::Rejected`] with one [`Violation`] per failing field.
//! - [`Validator::validate_field`]: the same rules for a single field,
//!   used for incremental re-validation while the user edits.
//!
//! ## Crate Policy
//!
//! - Depends only on `signup-core` internally.
//! - No I/O. No panics on any input: validation failures are values,
//!   never `Err` and never unwinding.

pub mod email;
pub mod phone;
pub mod rules;
pub mod validate;

pub use phone::{normalize_phone, PhoneError};
pub use rules::{rules_for, Rule};
pub use validate::{
    validate, AcceptedForm, ValidationErrors, ValidationResult, Validator, ValidatorOptions,
    Violation,
};
