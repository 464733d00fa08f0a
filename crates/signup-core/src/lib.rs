//! # signup-core — Foundational Types for the Signup Form
//!
//! Defines the data model shared by the validator and the submission
//! controller. Every other crate in the workspace depends on `signup-core`;
//! it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One fixed record.** [`FormInput`] holds exactly the five fields of
//!    the registration form. There is no dynamic field map.
//!
//! 2. **Single `Field` enum.** Declaration order of the variants is the
//!    order in which errors are reported. Adding a field forces every
//!    consumer to handle it.
//!
//! 3. **Typed values at the input boundary.** Widgets write a
//!    [`FieldValue`]; writing a flag into a text field is a structured
//!    error, not a silent coercion.
//!
//! 4. **UTC-only timestamps.** Transition records use [`Timestamp`],
//!    truncated to seconds.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `signup-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod country;
pub mod error;
pub mod field;
pub mod identity;
pub mod input;
pub mod temporal;

pub use config::{FormConfig, RevalidateMode, ValidationMode, DEFAULT_COUNTRY};
pub use error::{ConfigError, SignupError};
pub use field::{Field, FIELD_COUNT};
pub use identity::SessionId;
pub use input::{FieldValue, FormInput};
pub use temporal::Timestamp;
