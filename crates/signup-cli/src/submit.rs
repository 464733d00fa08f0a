//! # Submit Subcommand
//!
//! Runs one complete form session: fills the fields from a record file,
//! presses submit once, and reports what the user would see. Success and
//! failure notifications go to the notifier; inline field errors are
//! printed to the output stream.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use signup_state::{EchoHandler, Notifier, SubmissionController, SubmitOutcome};

use crate::input::{load_config, load_form_input};

/// Arguments for the submit subcommand.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Form record (YAML or JSON).
    #[arg(long)]
    pub input: PathBuf,

    /// Session configuration (YAML).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run the submit subcommand. Returns whether the session was submitted.
pub async fn run_submit(
    args: &SubmitArgs,
    notifier: Arc<dyn Notifier>,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    let config = load_config(args.config.as_deref())?;
    let input = load_form_input(&args.input)?;

    let handler = EchoHandler::new(notifier.clone());
    let controller = SubmissionController::new(config, Box::new(handler), notifier)?;
    controller.with_session(|session| session.fill(input))?;
    tracing::debug!(session = %controller.session_id(), "session filled from record file");

    match controller.submit().await? {
        SubmitOutcome::Submitted(_) => Ok(true),
        SubmitOutcome::Rejected(errors) => {
            for violation in errors.iter() {
                writeln!(out, "{}: {}", violation.field.label(), violation.message)?;
            }
            Ok(false)
        }
        SubmitOutcome::Failed(_) | SubmitOutcome::AlreadySubmitting => Ok(false),
    }
}
