//! # Submission Controller
//!
//! Drives a [`FormSession`] through a submit attempt:
//!
//! 1. Claim the single in-flight slot; a second submit while one is
//!    pending returns [`SubmitOutcome::AlreadySubmitting`] without touching
//!    the validator or the side effect.
//! 2. Snapshot the input and validate it. On rejection, attach the errors
//!    and return to Editing.
//! 3. Release the session lock and await the success side effect. Field
//!    edits stay possible while it is pending.
//! 4. On success move to Submitted. On a handler error or panic, log it,
//!    show the generic failure notification, and return to Editing with
//!    the input untouched.
//!
//! The session mutex is never held across an `.await`.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;

use signup_core::{Field, FieldValue, FormConfig, FormInput, SessionId};
use signup_schema::{AcceptedForm, ValidationErrors, ValidationResult};

use crate::handler::{SubmitError, SubmitHandler};
use crate::notify::{Notification, Notifier};
use crate::session::{FormSession, SessionError, SubmissionState};

/// Result of one call to [`SubmissionController::submit`].
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Validation passed and the side effect succeeded.
    Submitted(AcceptedForm),
    /// Validation failed; errors are attached to the session fields.
    Rejected(ValidationErrors),
    /// Validation passed but the side effect failed; the user was notified.
    Failed(SubmitError),
    /// Another submit was still in flight; this one was ignored.
    AlreadySubmitting,
}

impl SubmitOutcome {
    /// Whether the submission reached the Submitted state.
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

/// Clears the in-flight flag when the attempt ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns one form session and handles its submit action.
pub struct SubmissionController {
    session: Mutex<FormSession>,
    in_flight: AtomicBool,
    handler: Box<dyn SubmitHandler>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for SubmissionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionController")
            .field("session", &self.session)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl SubmissionController {
    /// Create a controller with a fresh session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Core`] if `config` fails its checks.
    pub fn new(
        config: FormConfig,
        handler: Box<dyn SubmitHandler>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, SessionError> {
        Ok(Self {
            session: Mutex::new(FormSession::new(config)?),
            in_flight: AtomicBool::new(false),
            handler,
            notifier,
        })
    }

    fn lock(&self) -> MutexGuard<'_, FormSession> {
        // A panicking observer must not wedge the form.
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the session.
    ///
    /// `f` must not call back into this controller.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut FormSession) -> R) -> R {
        f(&mut self.lock())
    }

    /// Current session identifier.
    pub fn session_id(&self) -> SessionId {
        self.lock().id()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SubmissionState {
        self.lock().state()
    }

    /// Copy of the live input record.
    pub fn input(&self) -> FormInput {
        self.lock().input().clone()
    }

    /// Inline error message of a field.
    pub fn error(&self, field: Field) -> Option<String> {
        self.lock().error(field).map(str::to_string)
    }

    /// Whether a submission is currently in flight.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Whether the submit affordance should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && self.lock().can_submit()
    }

    /// Write a widget value into a field.
    pub fn set_value(&self, field: Field, value: FieldValue) -> Result<(), SessionError> {
        self.lock().set_value(field, value)
    }

    /// Mark a field as having lost focus.
    pub fn blur(&self, field: Field) -> Result<(), SessionError> {
        self.lock().blur(field)
    }

    /// Start a new, empty session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SubmissionPending`] while a submission is in
    /// flight.
    pub fn reset(&self) -> Result<SessionId, SessionError> {
        let mut session = self.lock();
        if self.is_submitting() {
            return Err(SessionError::SubmissionPending {
                session_id: session.id(),
            });
        }
        session.reset()
    }

    /// Handle the submit action.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SessionClosed`] when the session was already
    /// submitted. Validation and side-effect failures are outcomes, not
    /// errors.
    pub async fn submit(&self) -> Result<SubmitOutcome, SessionError> {
        let Some(_guard) = InFlight::claim(&self.in_flight) else {
            tracing::warn!("submit ignored: a submission is already in flight");
            return Ok(SubmitOutcome::AlreadySubmitting);
        };

        let (session_id, form) = {
            let mut session = self.lock();
            let snapshot = session.begin_submit()?;
            match session.validator().validate(&snapshot) {
                ValidationResult::Accepted(form) => (session.id(), form),
                ValidationResult::Rejected(errors) => {
                    session.reject(&errors)?;
                    tracing::info!(
                        session = %session.id(),
                        fields = ?errors.fields().collect::<Vec<_>>(),
                        "submission rejected by validation"
                    );
                    return Ok(SubmitOutcome::Rejected(errors));
                }
            }
        };

        let result = match AssertUnwindSafe(self.handler.on_success(&form))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(panic) => Err(SubmitError::Panicked(panic_message(panic.as_ref()))),
        };

        let mut session = self.lock();
        match result {
            Ok(()) => {
                session.complete()?;
                tracing::info!(session = %session_id, "submission completed");
                Ok(SubmitOutcome::Submitted(form))
            }
            Err(error) => {
                tracing::error!(session = %session_id, %error, "Form submission error");
                self.notifier.notify(Notification::generic_failure());
                session.fail(&error.to_string())?;
                Ok(SubmitOutcome::Failed(error))
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NoopNotifier;

    impl Notifier for NoopNotifier {
        fn notify(&self, _notification: Notification) {}
    }

    struct OkHandler;

    #[async_trait]
    impl SubmitHandler for OkHandler {
        async fn on_success(&self, _form: &AcceptedForm) -> Result<(), SubmitError> {
            Ok(())
        }
    }

    fn controller() -> SubmissionController {
        SubmissionController::new(FormConfig::default(), Box::new(OkHandler), Arc::new(NoopNotifier))
            .unwrap()
    }

    #[test]
    fn test_in_flight_guard_releases_on_drop() {
        let flag = AtomicBool::new(false);
        {
            let _guard = InFlight::claim(&flag).unwrap();
            assert!(flag.load(Ordering::Acquire));
            assert!(InFlight::claim(&flag).is_none());
        }
        assert!(!flag.load(Ordering::Acquire));
        assert!(InFlight::claim(&flag).is_some());
    }

    #[test]
    fn test_panic_message_extraction() {
        let boxed: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(boxed.as_ref()), "bang");
        let boxed: Box<dyn std::any::Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(boxed.as_ref()), "non-string panic payload");
    }

    #[tokio::test]
    async fn test_submit_empty_form_is_rejected() {
        let c = controller();
        let outcome = c.submit().await.unwrap();
        match outcome {
            SubmitOutcome::Rejected(errors) => assert_eq!(errors.len(), Field::ALL.len()),
            other => panic!("Expected Rejected, got: {other:?}"),
        }
        assert_eq!(c.state(), SubmissionState::Editing);
        assert!(c.can_submit());
        assert!(!c.is_submitting());
    }

    #[tokio::test]
    async fn test_submit_after_submitted_is_error() {
        let c = controller();
        c.with_session(|s| {
            s.fill(FormInput {
                full_name: "Jane Doe".into(),
                email: "jane@example.com".into(),
                password: "Str0ng!Pass".into(),
                mobile_number: "+905551234567".into(),
                terms_accepted: true,
            })
        })
        .unwrap();
        assert!(c.submit().await.unwrap().is_submitted());
        assert!(matches!(c.submit().await, Err(SessionError::SessionClosed { .. })));
        assert!(!c.is_submitting(), "guard released after error");
    }

    #[test]
    fn test_reset_refused_while_in_flight() {
        let c = controller();
        let id = c.session_id();
        let _guard = InFlight::claim(&c.in_flight).unwrap();
        assert!(matches!(
            c.reset(),
            Err(SessionError::SubmissionPending { session_id }) if session_id == id
        ));
        assert_eq!(c.session_id(), id);
    }
}
