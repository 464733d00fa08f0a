//! # User Notifications
//!
//! The toast-style output boundary. A session produces at most one
//! notification per submit attempt: the success rendering from the side
//! effect, or the fixed generic failure message from the controller guard.

use serde::{Deserialize, Serialize};

/// Message shown when the success side effect fails for any reason.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to submit the form. Please try again.";

/// A notification addressed to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// Submission succeeded; `payload` renders the accepted record.
    Success {
        /// Pretty-printed JSON of the accepted record.
        payload: String,
    },
    /// Submission failed after validation passed.
    Failure {
        /// User-facing message.
        message: String,
    },
}

impl Notification {
    /// The generic failure notification.
    pub fn generic_failure() -> Self {
        Self::Failure {
            message: GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Whether this is a success notification.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Receives notifications for display.
///
/// Implementations must not block: they are called from the submit path.
pub trait Notifier: Send + Sync {
    /// Show a notification to the user.
    fn notify(&self, notification: Notification);
}
