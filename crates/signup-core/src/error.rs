//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared across the signup workspace. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Validation failures are NOT errors. They travel as the `Rejected`
//!   variant of the validation result and never appear here.
//! - Input-boundary errors name the field and the expected vs actual kind.
//! - Configuration errors name the source and the offending value.

use thiserror::Error;

use crate::field::Field;

/// Top-level error type for the signup form core.
#[derive(Error, Debug)]
pub enum SignupError {
    /// A widget wrote a value of the wrong kind into a field.
    #[error("field '{field}' expects a {expected} value, got {actual}")]
    FieldKindMismatch {
        /// Field that was written.
        field: Field,
        /// Kind the field accepts.
        expected: &'static str,
        /// Kind that was supplied.
        actual: &'static str,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Error while loading or checking a [`FormConfig`](crate::FormConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config '{path}': {source}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid YAML for the config schema.
    #[error("invalid config document: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The default country is not a known ISO-3166 alpha-2 code.
    #[error("unknown default country '{0}'")]
    UnknownCountry(String),
}
