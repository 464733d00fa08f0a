//! # signup-cli — Signup Form Host CLI
//!
//! A terminal host for the signup form core. It stands in for the
//! rendered form: records are read from files instead of widgets, and
//! notifications are printed instead of shown as toasts.
//!
//! ## Subcommands
//!
//! - `validate`: validate a record and print field errors or the accepted
//!   record
//! - `submit`: run one complete session through the submission controller
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers write to a caller-supplied `Write` so they can be tested.
//! - No business logic here: rules live in `signup-schema`, the state
//!   machine in `signup-state`.

pub mod console;
pub mod input;
pub mod submit;
pub mod validate;
