//! # Form Session
//!
//! One interactive form session: the live [`FormInput`], per-field
//! touched/dirty/error state, observers bound to individual fields, and the
//! submission lifecycle.
//!
//! ## States
//!
//! ```text
//! Editing ──▶ Submitting ──▶ Submitted (terminal until reset)
//!    ▲             │
//!    └─────────────┘  (rejected, or side effect failed)
//! ```
//!
//! ## Design Decision
//!
//! Three states with runtime-checked transitions rather than typestate
//! types. The controller shares one session across concurrent submit calls
//! behind a mutex, so the state must be a value that can be inspected and
//! swapped in place. Invalid transitions return [`SessionError`].
//!
//! ## Validation triggers
//!
//! Before the first submit attempt fields validate per
//! [`ValidationMode`]; afterwards per [`RevalidateMode`]. A submit always
//! validates every field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use signup_core::{
    Field, FieldValue, FormConfig, FormInput, RevalidateMode, SessionId, SignupError, Timestamp,
    ValidationMode,
};
use signup_schema::{ValidationErrors, Validator, ValidatorOptions, Violation};

// ─── Submission State ────────────────────────────────────────────────

/// Lifecycle state of a form session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionState {
    /// The user is editing; inline errors from the last validation show.
    Editing,
    /// A submit attempt is being processed.
    Submitting,
    /// The record was accepted and the side effect succeeded.
    Submitted,
}

impl SubmissionState {
    /// Whether this state is terminal for the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Submitted)
    }
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Editing => "EDITING",
            Self::Submitting => "SUBMITTING",
            Self::Submitted => "SUBMITTED",
        };
        f.write_str(s)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Attempted transition is not valid from the current state.
    #[error("invalid session transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state.
        from: SubmissionState,
        /// Attempted target state.
        to: SubmissionState,
    },

    /// The session was submitted and accepts no further edits.
    #[error("{session_id} is submitted; reset to start a new session")]
    SessionClosed {
        /// The session identifier.
        session_id: SessionId,
    },

    /// A submission is awaiting its side effect; the session cannot be reset.
    #[error("{session_id} has a submission in flight; reset refused")]
    SubmissionPending {
        /// The session identifier.
        session_id: SessionId,
    },

    /// A core error (wrong value kind, bad configuration).
    #[error(transparent)]
    Core(#[from] SignupError),
}

// ─── Field State ─────────────────────────────────────────────────────

/// Interaction state of a single field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    /// The field lost focus at least once.
    pub touched: bool,
    /// The value differs from the session-creation default.
    pub dirty: bool,
    /// Violation from the most recent validation of this field.
    pub error: Option<Violation>,
}

/// What a field widget needs to render itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSnapshot {
    /// The field.
    pub field: Field,
    /// Current value.
    pub value: FieldValue,
    /// Touched flag.
    pub touched: bool,
    /// Dirty flag.
    pub dirty: bool,
    /// Inline error message, if any.
    pub error: Option<String>,
}

/// Handle returned by [`FormSession::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type FieldCallback = Box<dyn Fn(&FieldSnapshot) + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    field: Field,
    callback: FieldCallback,
}

// ─── Transition Log ──────────────────────────────────────────────────

/// Record of a session state transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// State before the transition.
    pub from_state: SubmissionState,
    /// State after the transition.
    pub to_state: SubmissionState,
    /// When the transition occurred.
    pub timestamp: Timestamp,
    /// Reason for the transition.
    pub reason: String,
}

// ─── Session ─────────────────────────────────────────────────────────

/// A form session with its live input, field state, and lifecycle.
pub struct FormSession {
    id: SessionId,
    config: FormConfig,
    validator: Validator,
    input: FormInput,
    fields: BTreeMap<Field, FieldState>,
    state: SubmissionState,
    submit_count: u32,
    created_at: Timestamp,
    transitions: Vec<TransitionRecord>,
    subscriptions: Vec<Subscription>,
    next_subscription: u64,
}

impl std::fmt::Debug for FormSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormSession")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("input", &self.input)
            .field("fields", &self.fields)
            .field("submit_count", &self.submit_count)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl FormSession {
    /// Create a new, empty session in the Editing state.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Core`] if the configuration fails its checks.
    pub fn new(config: FormConfig) -> Result<Self, SessionError> {
        config.check().map_err(SignupError::from)?;
        let validator = Validator::new(ValidatorOptions::from_config(&config));
        Ok(Self {
            id: SessionId::new(),
            config,
            validator,
            input: FormInput::default(),
            fields: empty_field_states(),
            state: SubmissionState::Editing,
            submit_count: 0,
            created_at: Timestamp::now(),
            transitions: Vec::new(),
            subscriptions: Vec::new(),
            next_subscription: 0,
        })
    }

    /// Session identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// The session configuration.
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// The validator configured for this session.
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// The live input record.
    pub fn input(&self) -> &FormInput {
        &self.input
    }

    /// When the session was created.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Ordered log of all state transitions.
    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    /// Number of submit attempts that reached the validator.
    pub fn submit_count(&self) -> u32 {
        self.submit_count
    }

    /// Whether the session ended in a successful submission.
    pub fn is_submit_successful(&self) -> bool {
        self.state == SubmissionState::Submitted
    }

    /// Whether the submit affordance should be enabled.
    pub fn can_submit(&self) -> bool {
        self.state == SubmissionState::Editing
    }

    /// Interaction state of a field.
    pub fn field_state(&self, field: Field) -> &FieldState {
        // Every field is present from construction on.
        &self.fields[&field]
    }

    /// Inline error message of a field.
    pub fn error(&self, field: Field) -> Option<&str> {
        self.field_state(field).error.as_ref().map(|v| v.message.as_str())
    }

    /// Fields that currently show an error, in declaration order.
    pub fn fields_with_errors(&self) -> Vec<Field> {
        self.fields
            .iter()
            .filter(|(_, s)| s.error.is_some())
            .map(|(f, _)| *f)
            .collect()
    }

    /// Render state of a field.
    pub fn snapshot(&self, field: Field) -> FieldSnapshot {
        let state = self.field_state(field);
        FieldSnapshot {
            field,
            value: self.input.get(field),
            touched: state.touched,
            dirty: state.dirty,
            error: state.error.as_ref().map(|v| v.message.clone()),
        }
    }

    // ── Editing ──────────────────────────────────────────────────────

    /// Write a widget value into a field.
    ///
    /// Allowed while Editing or Submitting; the in-flight submission works on
    /// its own snapshot.
    pub fn set_value(&mut self, field: Field, value: FieldValue) -> Result<(), SessionError> {
        self.require_open()?;
        self.input.set(field, value)?;
        let dirty = self.input.is_dirty(field);
        if let Some(state) = self.fields.get_mut(&field) {
            state.dirty = dirty;
        }
        if self.validates_on_change(field) {
            self.revalidate_field(field);
        }
        self.publish(field);
        Ok(())
    }

    /// Set the full name.
    pub fn set_full_name(&mut self, value: &str) -> Result<(), SessionError> {
        self.set_value(Field::FullName, value.into())
    }

    /// Set the email address.
    pub fn set_email(&mut self, value: &str) -> Result<(), SessionError> {
        self.set_value(Field::Email, value.into())
    }

    /// Set the password.
    pub fn set_password(&mut self, value: &str) -> Result<(), SessionError> {
        self.set_value(Field::Password, value.into())
    }

    /// Set the mobile number.
    pub fn set_mobile_number(&mut self, value: &str) -> Result<(), SessionError> {
        self.set_value(Field::MobileNumber, value.into())
    }

    /// Tick or untick the terms checkbox.
    pub fn set_terms(&mut self, accepted: bool) -> Result<(), SessionError> {
        self.set_value(Field::Terms, accepted.into())
    }

    /// Replace every field at once, as a prefilled form would.
    pub fn fill(&mut self, input: FormInput) -> Result<(), SessionError> {
        for field in Field::ALL {
            self.set_value(field, input.get(field))?;
        }
        Ok(())
    }

    /// Mark a field as having lost focus.
    pub fn blur(&mut self, field: Field) -> Result<(), SessionError> {
        self.require_open()?;
        if let Some(state) = self.fields.get_mut(&field) {
            state.touched = true;
        }
        if self.validates_on_blur() {
            self.revalidate_field(field);
        }
        self.publish(field);
        Ok(())
    }

    // ── Observers ────────────────────────────────────────────────────

    /// Register a callback for changes to one field.
    ///
    /// The callback runs synchronously after each value, touched, or error
    /// change of `field`, and must not call back into the session.
    pub fn subscribe<F>(&mut self, field: Field, callback: F) -> SubscriptionId
    where
        F: Fn(&FieldSnapshot) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.push(Subscription {
            id,
            field,
            callback: Box::new(callback),
        });
        id
    }

    /// Remove a subscription. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    // ── Submission lifecycle ─────────────────────────────────────────

    /// Start a submit attempt (EDITING → SUBMITTING).
    ///
    /// Returns the snapshot the validator and side effect will work on.
    pub fn begin_submit(&mut self) -> Result<FormInput, SessionError> {
        self.require_state(SubmissionState::Editing, SubmissionState::Submitting)?;
        self.submit_count += 1;
        self.do_transition(SubmissionState::Submitting, "submit requested");
        Ok(self.input.clone())
    }

    /// Attach field errors and return to editing (SUBMITTING → EDITING).
    ///
    /// Every field's error is replaced: fields absent from `errors` are
    /// cleared.
    pub fn reject(&mut self, errors: &ValidationErrors) -> Result<(), SessionError> {
        self.require_state(SubmissionState::Submitting, SubmissionState::Editing)?;
        self.apply_errors(errors);
        self.do_transition(
            SubmissionState::Editing,
            &format!("validation rejected {} field(s)", errors.len()),
        );
        Ok(())
    }

    /// Mark the accepted submission as delivered (SUBMITTING → SUBMITTED).
    pub fn complete(&mut self) -> Result<(), SessionError> {
        self.require_state(SubmissionState::Submitting, SubmissionState::Submitted)?;
        self.apply_errors(&ValidationErrors::default());
        self.do_transition(SubmissionState::Submitted, "submission delivered");
        Ok(())
    }

    /// Return to editing after the side effect failed (SUBMITTING → EDITING).
    ///
    /// The input record is left as it is so the user can retry.
    pub fn fail(&mut self, reason: &str) -> Result<(), SessionError> {
        self.require_state(SubmissionState::Submitting, SubmissionState::Editing)?;
        self.do_transition(SubmissionState::Editing, reason);
        Ok(())
    }

    /// Re-arm the session with a fresh, empty record and a new identifier.
    ///
    /// Subscriptions survive the reset and receive the cleared state.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SubmissionPending`] while SUBMITTING; the
    /// pending attempt must settle first.
    pub fn reset(&mut self) -> Result<SessionId, SessionError> {
        if self.state == SubmissionState::Submitting {
            return Err(SessionError::SubmissionPending { session_id: self.id });
        }
        self.id = SessionId::new();
        self.input = FormInput::default();
        self.fields = empty_field_states();
        self.state = SubmissionState::Editing;
        self.submit_count = 0;
        self.created_at = Timestamp::now();
        self.transitions.clear();
        for field in Field::ALL {
            self.publish(field);
        }
        Ok(self.id)
    }

    // ── Internals ────────────────────────────────────────────────────

    fn validates_on_change(&self, field: Field) -> bool {
        if self.submit_count > 0 {
            return self.config.revalidate_mode == RevalidateMode::OnChange;
        }
        match self.config.validation_mode {
            ValidationMode::OnChange | ValidationMode::All => true,
            ValidationMode::OnTouched => self.field_state(field).touched,
            ValidationMode::OnSubmit | ValidationMode::OnBlur => false,
        }
    }

    fn validates_on_blur(&self) -> bool {
        if self.submit_count > 0 {
            return self.config.revalidate_mode == RevalidateMode::OnBlur;
        }
        matches!(
            self.config.validation_mode,
            ValidationMode::OnBlur | ValidationMode::OnTouched | ValidationMode::All
        )
    }

    fn revalidate_field(&mut self, field: Field) {
        let violation = self.validator.validate_field(field, &self.input);
        if let Some(state) = self.fields.get_mut(&field) {
            state.error = violation;
        }
    }

    fn apply_errors(&mut self, errors: &ValidationErrors) {
        let mut changed = Vec::new();
        for (field, state) in self.fields.iter_mut() {
            let next = errors.get(*field).cloned();
            if state.error != next {
                state.error = next;
                changed.push(*field);
            }
        }
        for field in changed {
            self.publish(field);
        }
    }

    fn publish(&self, field: Field) {
        let mut listeners = self.subscriptions.iter().filter(|s| s.field == field).peekable();
        if listeners.peek().is_none() {
            return;
        }
        let snapshot = self.snapshot(field);
        for subscription in listeners {
            (subscription.callback)(&snapshot);
        }
    }

    fn require_open(&self) -> Result<(), SessionError> {
        if self.state.is_terminal() {
            return Err(SessionError::SessionClosed { session_id: self.id });
        }
        Ok(())
    }

    fn require_state(
        &self,
        expected: SubmissionState,
        target: SubmissionState,
    ) -> Result<(), SessionError> {
        self.require_open()?;
        if self.state != expected {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to: target,
            });
        }
        Ok(())
    }

    fn do_transition(&mut self, to: SubmissionState, reason: &str) {
        tracing::debug!(session = %self.id, from = %self.state, to = %to, reason, "session transition");
        self.transitions.push(TransitionRecord {
            from_state: self.state,
            to_state: to,
            timestamp: Timestamp::now(),
            reason: reason.to_string(),
        });
        self.state = to;
    }
}

fn empty_field_states() -> BTreeMap<Field, FieldState> {
    Field::ALL.into_iter().map(|f| (f, FieldState::default())).collect()
}

// ─── Tests ───────────────────────────────────────────────────────────
