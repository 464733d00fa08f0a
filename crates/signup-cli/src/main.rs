//! # signup CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use signup_cli::console::ConsoleNotifier;

/// Signup form host: validate and submit registration records.
#[derive(Parser, Debug)]
#[command(name = "signup", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate a form record against the registration schema.
    Validate(signup_cli::validate::ValidateArgs),
    /// Run a full submission session for a form record.
    Submit(signup_cli::submit::SubmitArgs),
}

// The form runs on a single cooperative event loop.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout();

    let ok = match cli.command {
        Commands::Validate(args) => signup_cli::validate::run_validate(&args, &mut stdout)?,
        Commands::Submit(args) => {
            let notifier = Arc::new(ConsoleNotifier::new(std::io::stdout()));
            signup_cli::submit::run_submit(&args, notifier, &mut stdout).await?
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
