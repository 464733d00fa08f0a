//! # signup-state — Form Session State Machine
//!
//! Implements the interactive half of the signup form: a session that owns
//! the live [`FormInput`](signup_core::FormInput), and a controller that
//! drives submission.
//!
//! ## State Machine
//!
//! ```text
//! Editing ──submit──▶ Submitting ──accepted + side effect ok──▶ Submitted
//!    ▲                    │
//!    └──── rejected ──────┤
//!    └── side effect failed
//! ```
//!
//! - **Session** (`session.rs`): field values, touched/dirty flags, inline
//!   errors, observers, and the transition log. Transitions are validated at
//!   runtime and rejected with structured errors.
//!
//! - **Controller** (`controller.rs`): runs the validator on submit, invokes
//!   the success side effect outside the session lock, and guards against
//!   re-entrant submits and side-effect failures.
//!
//! - **Handler / Notifier** (`handler.rs`, `notify.rs`): the outbound
//!   seams. The default handler echoes the accepted payload to the log and
//!   to a success notification; no network call exists.

pub mod controller;
pub mod handler;
pub mod notify;
pub mod session;

pub use controller::{SubmissionController, SubmitOutcome};
pub use handler::{EchoHandler, SubmitError, SubmitHandler};
pub use notify::{Notification, Notifier, GENERIC_FAILURE_MESSAGE};
pub use session::{
    FieldSnapshot, FieldState, FormSession, SessionError, SubmissionState, SubscriptionId,
    TransitionRecord,
};
