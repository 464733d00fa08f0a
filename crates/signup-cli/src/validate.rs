//! # Validate Subcommand
//!
//! Validates one form record without running a session. Exits non-zero
//! when the record is rejected.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;

use signup_schema::{ValidationResult, Validator, ValidatorOptions};

use crate::input::{load_config, load_form_input};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Form record (YAML or JSON).
    #[arg(long)]
    pub input: PathBuf,

    /// Session configuration (YAML).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Run the validate subcommand. Returns whether the record was accepted.
pub fn run_validate(args: &ValidateArgs, out: &mut impl Write) -> anyhow::Result<bool> {
    let config = load_config(args.config.as_deref())?;
    let input = load_form_input(&args.input)?;
    let validator = Validator::new(ValidatorOptions::from_config(&config));
    let result = validator.validate(&input);

    if args.json {
        let body = match &result {
            ValidationResult::Accepted(form) => serde_json::json!({
                "status": "accepted",
                "record": form,
            }),
            ValidationResult::Rejected(errors) => serde_json::json!({
                "status": "rejected",
                "errors": errors,
            }),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
    } else {
        match &result {
            ValidationResult::Accepted(form) => {
                writeln!(out, "valid: {} <{}> {}", form.full_name, form.email, form.mobile_number)?;
            }
            ValidationResult::Rejected(errors) => {
                writeln!(out, "invalid: {} field(s) failed validation", errors.len())?;
                writeln!(out, "{errors}")?;
            }
        }
    }

    Ok(result.is_accepted())
}
