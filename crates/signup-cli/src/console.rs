//! # Console Notifications
//!
//! Prints notifications where a graphical host would show toasts.

use std::io::Write;
use std::sync::Mutex;

use signup_state::{Notification, Notifier};

/// Writes notifications to a terminal stream.
pub struct ConsoleNotifier<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> ConsoleNotifier<W> {
    /// Notify onto `out`.
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    /// Recover the underlying stream.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> Notifier for ConsoleNotifier<W> {
    fn notify(&self, notification: Notification) {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let written = match &notification {
            Notification::Success { payload } => writeln!(out, "You submitted the following values:\n{payload}"),
            Notification::Failure { message } => writeln!(out, "error: {message}"),
        };
        if let Err(e) = written {
            tracing::warn!(error = %e, "failed to write notification to console");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_and_failure_rendering() {
        let notifier = ConsoleNotifier::new(Vec::new());
        notifier.notify(Notification::Success {
            payload: "{\n  \"terms\": true\n}".to_string(),
        });
        notifier.notify(Notification::generic_failure());

        let text = String::from_utf8(notifier.into_inner()).unwrap();
        assert_eq!(
            text,
            "You submitted the following values:\n{\n  \"terms\": true\n}\nerror: Failed to submit the form. Please try again.\n"
        );
    }
}
