//! # Success Side Effect
//!
//! What happens to an accepted record. The only shipped implementation,
//! [`EchoHandler`], logs the record and shows it back to the user; there is
//! no network submission.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use signup_schema::AcceptedForm;

use crate::notify::{Notification, Notifier};

/// Failure of the success side effect.
///
/// Never produced by validation: a record that reaches the handler has
/// already passed every rule.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// The accepted record could not be rendered.
    #[error("failed to render accepted form: {0}")]
    Render(#[from] serde_json::Error),

    /// The handler reported a failure.
    #[error("submit handler failed: {0}")]
    Handler(String),

    /// The handler panicked; the panic was caught at the controller guard.
    #[error("submit handler panicked: {0}")]
    Panicked(String),
}

/// The side effect run once per accepted submission.
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    /// Act on an accepted record.
    async fn on_success(&self, form: &AcceptedForm) -> Result<(), SubmitError>;
}

/// Logs the accepted record and echoes it as a success notification.
pub struct EchoHandler {
    notifier: Arc<dyn Notifier>,
}

impl EchoHandler {
    /// Create a handler that echoes to `notifier`.
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl SubmitHandler for EchoHandler {
    async fn on_success(&self, form: &AcceptedForm) -> Result<(), SubmitError> {
        tracing::info!(?form, "form submitted");
        let payload = serde_json::to_string_pretty(form)?;
        self.notifier.notify(Notification::Success { payload });
        Ok(())
    }
}
