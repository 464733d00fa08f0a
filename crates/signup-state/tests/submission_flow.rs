//! Integration test: complete form sessions driven through the controller.
//!
//! Each test wires a recording notifier into the controller (and into the
//! echo handler where used) and checks what the user would have seen.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use signup_core::{Field, FormConfig, FormInput};
use signup_schema::AcceptedForm;
use signup_state::{
    EchoHandler, Notification, Notifier, SessionError, SubmissionController, SubmissionState,
    SubmitError, SubmitHandler, SubmitOutcome, GENERIC_FAILURE_MESSAGE,
};

#[derive(Default)]
struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

/// Yields once before echoing, so a second submit can arrive mid-flight.
struct SlowEcho {
    inner: EchoHandler,
    calls: AtomicUsize,
}

#[async_trait]
impl SubmitHandler for SlowEcho {
    async fn on_success(&self, form: &AcceptedForm) -> Result<(), SubmitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.inner.on_success(form).await
    }
}

struct FailingHandler;

#[async_trait]
impl SubmitHandler for FailingHandler {
    async fn on_success(&self, _form: &AcceptedForm) -> Result<(), SubmitError> {
        Err(SubmitError::Handler("upstream unavailable".to_string()))
    }
}

struct PanickingHandler;

#[async_trait]
impl SubmitHandler for PanickingHandler {
    async fn on_success(&self, _form: &AcceptedForm) -> Result<(), SubmitError> {
        panic!("handler exploded");
    }
}

/// Waits for the gate, then fails.
struct GatedFailingHandler {
    gate: Arc<Notify>,
}

#[async_trait]
impl SubmitHandler for GatedFailingHandler {
    async fn on_success(&self, _form: &AcceptedForm) -> Result<(), SubmitError> {
        self.gate.notified().await;
        Err(SubmitError::Handler("upstream unavailable".to_string()))
    }
}

/// Waits for the gate before succeeding.
struct GatedHandler {
    gate: Arc<Notify>,
}

#[async_trait]
impl SubmitHandler for GatedHandler {
    async fn on_success(&self, _form: &AcceptedForm) -> Result<(), SubmitError> {
        self.gate.notified().await;
        Ok(())
    }
}

fn jane() -> FormInput {
    FormInput {
        full_name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        password: "Str0ng!Pass".to_string(),
        mobile_number: "+905551234567".to_string(),
        terms_accepted: true,
    }
}

fn echo_controller() -> (SubmissionController, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let handler = EchoHandler::new(notifier.clone());
    let controller =
        SubmissionController::new(FormConfig::default(), Box::new(handler), notifier.clone())
            .unwrap();
    (controller, notifier)
}

fn controller_with(handler: Box<dyn SubmitHandler>) -> (SubmissionController, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let controller =
        SubmissionController::new(FormConfig::default(), handler, notifier.clone()).unwrap();
    (controller, notifier)
}

fn fill(controller: &SubmissionController, input: FormInput) {
    controller.with_session(|s| s.fill(input)).unwrap();
}

#[tokio::test]
async fn test_valid_submission_notifies_once_with_payload() {
    let (c, notifier) = echo_controller();
    fill(&c, jane());

    let outcome = c.submit().await.unwrap();
    match &outcome {
        SubmitOutcome::Submitted(form) => assert_eq!(form.email, "jane@example.com"),
        other => panic!("Expected Submitted, got: {other:?}"),
    }
    assert_eq!(c.state(), SubmissionState::Submitted);

    let seen = notifier.all();
    assert_eq!(seen.len(), 1);
    match &seen[0] {
        Notification::Success { payload } => {
            let parsed: serde_json::Value = serde_json::from_str(payload).unwrap();
            assert_eq!(
                parsed,
                serde_json::json!({
                    "full_name": "Jane Doe",
                    "email": "jane@example.com",
                    "password": "Str0ng!Pass",
                    "mobile_number": "+905551234567",
                    "terms": true,
                })
            );
        }
        other => panic!("Expected Success, got: {other:?}"),
    }

    let path: Vec<_> = c.with_session(|s| {
        s.transitions()
            .iter()
            .map(|t| (t.from_state, t.to_state))
            .collect()
    });
    assert_eq!(
        path,
        vec![
            (SubmissionState::Editing, SubmissionState::Submitting),
            (SubmissionState::Submitting, SubmissionState::Submitted),
        ]
    );
}

#[tokio::test]
async fn test_invalid_email_stays_editing_without_notification() {
    let (c, notifier) = echo_controller();
    fill(
        &c,
        FormInput {
            email: "not-an-email".to_string(),
            ..jane()
        },
    );

    let outcome = c.submit().await.unwrap();
    match outcome {
        SubmitOutcome::Rejected(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.get(Field::Email).unwrap().rule.kind(), "invalid_format");
        }
        other => panic!("Expected Rejected, got: {other:?}"),
    }
    assert_eq!(c.state(), SubmissionState::Editing);
    assert_eq!(c.error(Field::Email).as_deref(), Some("Please provide a valid email address."));
    for field in [Field::FullName, Field::Password, Field::MobileNumber, Field::Terms] {
        assert_eq!(c.error(field), None, "{field} should have no error");
    }
    assert!(notifier.all().is_empty());
}

#[tokio::test]
async fn test_rapid_double_submit_runs_side_effect_once() {
    let notifier = Arc::new(RecordingNotifier::default());
    let handler = Arc::new(SlowEcho {
        inner: EchoHandler::new(notifier.clone()),
        calls: AtomicUsize::new(0),
    });

    struct Shared(Arc<SlowEcho>);

    #[async_trait]
    impl SubmitHandler for Shared {
        async fn on_success(&self, form: &AcceptedForm) -> Result<(), SubmitError> {
            self.0.on_success(form).await
        }
    }

    let c = SubmissionController::new(
        FormConfig::default(),
        Box::new(Shared(handler.clone())),
        notifier.clone(),
    )
    .unwrap();
    fill(&c, jane());

    let (first, second) = tokio::join!(c.submit(), c.submit());
    assert!(first.unwrap().is_submitted());
    assert!(matches!(second.unwrap(), SubmitOutcome::AlreadySubmitting));

    assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    assert_eq!(notifier.all().iter().filter(|n| n.is_success()).count(), 1);
    assert_eq!(c.with_session(|s| s.submit_count()), 1);
}

#[tokio::test]
async fn test_handler_error_is_guarded_and_retryable() {
    let (c, notifier) = controller_with(Box::new(FailingHandler));
    fill(&c, jane());

    let outcome = c.submit().await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Failed(SubmitError::Handler(_))));
    assert_eq!(c.state(), SubmissionState::Editing);
    assert_eq!(c.input(), jane());
    assert_eq!(
        notifier.all(),
        vec![Notification::Failure {
            message: GENERIC_FAILURE_MESSAGE.to_string()
        }]
    );

    // The user can simply press submit again.
    assert!(c.can_submit());
    let retry = c.submit().await.unwrap();
    assert!(matches!(retry, SubmitOutcome::Failed(_)));
    assert_eq!(notifier.all().len(), 2);
}

#[tokio::test]
async fn test_handler_panic_is_caught() {
    let (c, notifier) = controller_with(Box::new(PanickingHandler));
    fill(&c, jane());

    let outcome = c.submit().await.unwrap();
    match outcome {
        SubmitOutcome::Failed(SubmitError::Panicked(message)) => {
            assert_eq!(message, "handler exploded");
        }
        other => panic!("Expected Failed(Panicked), got: {other:?}"),
    }
    assert_eq!(c.state(), SubmissionState::Editing);
    assert_eq!(c.input(), jane());
    assert!(!c.is_submitting());
    assert_eq!(notifier.all(), vec![Notification::generic_failure()]);
}

#[tokio::test]
async fn test_fields_editable_while_submission_pending() {
    let gate = Arc::new(Notify::new());
    let (c, _notifier) = controller_with(Box::new(GatedHandler { gate: gate.clone() }));
    fill(&c, jane());

    let (outcome, ()) = tokio::join!(c.submit(), async {
        assert!(c.is_submitting());
        assert!(!c.can_submit());
        assert_eq!(c.state(), SubmissionState::Submitting);
        c.set_value(Field::FullName, "Jane Q. Doe".into()).unwrap();
        gate.notify_one();
    });

    match outcome.unwrap() {
        SubmitOutcome::Submitted(form) => assert_eq!(form.full_name, "Jane Doe"),
        other => panic!("Expected Submitted, got: {other:?}"),
    }
    assert_eq!(c.input().full_name, "Jane Q. Doe");
}

#[tokio::test]
async fn test_reset_after_submission_starts_new_session() {
    let (c, notifier) = echo_controller();
    fill(&c, jane());
    c.submit().await.unwrap();
    let first_id = c.session_id();

    let second_id = c.reset().unwrap();
    assert_ne!(first_id, second_id);
    assert_eq!(c.state(), SubmissionState::Editing);
    assert_eq!(c.input(), FormInput::default());

    fill(&c, jane());
    assert!(c.submit().await.unwrap().is_submitted());
    assert_eq!(notifier.all().len(), 2);
}

#[tokio::test]
async fn test_fix_and_resubmit() {
    let (c, notifier) = echo_controller();
    fill(
        &c,
        FormInput {
            password: "NoSpecial1".to_string(),
            terms_accepted: false,
            ..jane()
        },
    );

    let outcome = c.submit().await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
    assert!(c.error(Field::Password).is_some());
    assert!(c.error(Field::Terms).is_some());

    // Re-validation on change clears errors as fields are fixed.
    c.set_value(Field::Password, "Valid1Pass!".into()).unwrap();
    assert_eq!(c.error(Field::Password), None);
    c.set_value(Field::Terms, true.into()).unwrap();
    assert_eq!(c.error(Field::Terms), None);

    assert!(c.submit().await.unwrap().is_submitted());
    assert_eq!(notifier.all().len(), 1);
}

#[tokio::test]
async fn test_reset_mid_flight_is_refused_and_failure_still_notified() {
    let gate = Arc::new(Notify::new());
    let (c, notifier) = controller_with(Box::new(GatedFailingHandler { gate: gate.clone() }));
    fill(&c, jane());
    let id = c.session_id();

    let (outcome, reset) = tokio::join!(c.submit(), async {
        let reset = c.reset();
        gate.notify_one();
        reset
    });

    assert!(matches!(
        reset,
        Err(SessionError::SubmissionPending { session_id }) if session_id == id
    ));
    assert!(matches!(outcome.unwrap(), SubmitOutcome::Failed(SubmitError::Handler(_))));
    assert_eq!(c.session_id(), id);
    assert_eq!(c.state(), SubmissionState::Editing);
    assert_eq!(c.input(), jane());
    assert_eq!(notifier.all(), vec![Notification::generic_failure()]);

    // Once the attempt has settled the form can be cleared.
    assert!(c.reset().is_ok());
    assert_eq!(c.input(), FormInput::default());
}

#[tokio::test]
async fn test_reset_mid_flight_does_not_disturb_success() {
    let gate = Arc::new(Notify::new());
    let (c, _notifier) = controller_with(Box::new(GatedHandler { gate: gate.clone() }));
    fill(&c, jane());

    let (outcome, reset) = tokio::join!(c.submit(), async {
        let reset = c.reset();
        gate.notify_one();
        reset
    });

    assert!(reset.is_err());
    assert!(outcome.unwrap().is_submitted());
    assert_eq!(c.state(), SubmissionState::Submitted);
}
