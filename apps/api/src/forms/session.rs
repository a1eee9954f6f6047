//! Form session — the stepper state machine plus the process-local store.
//!
//! A session owns the ValueMap for one applicant filling one form. All
//! mutations are synchronous; the only async boundary is the final submit,
//! which parks the session in `Submitting` so a second submit cannot start
//! while one is in flight. Navigation (`next`/`prev`) never touches the
//! network.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::forms::schema::{FieldValue, Form, FormField};
use crate::forms::steps::split_steps;
use crate::forms::validation::validate_step;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Submitting,
    /// Terminal; the frontend swaps the form for a confirmation view.
    Submitted,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0}")]
    Validation(String),

    #[error("A submit is already in flight")]
    SubmitInFlight,

    #[error("This application was already submitted")]
    AlreadySubmitted,

    #[error("Submit is only available on the last step")]
    NotAtLastStep,
}

/// One applicant's in-memory progress through a form.
#[derive(Debug, Clone)]
pub struct FormSession {
    pub id: Uuid,
    pub job_id: Uuid,
    pub form: Form,
    pub step_index: usize,
    pub values: HashMap<String, FieldValue>,
    pub error: Option<String>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
}

impl FormSession {
    /// Opens a session at `initial_step` clamped into range (0 when the
    /// form has no steps at all).
    pub fn new(job_id: Uuid, form: Form, initial_step: Option<usize>) -> FormSession {
        let mut session = FormSession {
            id: Uuid::new_v4(),
            job_id,
            form,
            step_index: 0,
            values: HashMap::new(),
            error: None,
            status: SessionStatus::InProgress,
            created_at: Utc::now(),
        };
        session.step_index = initial_step
            .unwrap_or(0)
            .min(session.last_step_index());
        session
    }

    /// Steps are recomputed from the form's fields on every use, never
    /// cached or persisted.
    pub fn steps(&self) -> Vec<Vec<FormField>> {
        split_steps(&self.form.fields)
    }

    pub fn step_count(&self) -> usize {
        self.steps().len()
    }

    fn last_step_index(&self) -> usize {
        self.step_count().saturating_sub(1)
    }

    pub fn current_step(&self) -> Vec<FormField> {
        self.steps().into_iter().nth(self.step_index).unwrap_or_default()
    }

    fn ensure_editable(&self) -> Result<(), SessionError> {
        match self.status {
            SessionStatus::InProgress => Ok(()),
            SessionStatus::Submitting => Err(SessionError::SubmitInFlight),
            SessionStatus::Submitted => Err(SessionError::AlreadySubmitted),
        }
    }

    /// Stores or overwrites one field's value. Checkbox toggling arrives as
    /// the full replacement array.
    pub fn set_value(&mut self, identifier: &str, value: FieldValue) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.values.insert(identifier.to_string(), value);
        Ok(())
    }

    fn validate_current_step(&self) -> Result<(), SessionError> {
        match validate_step(&self.current_step(), &self.values) {
            Some(violation) => Err(SessionError::Validation(violation.message())),
            None => Ok(()),
        }
    }

    /// Validates the current step, then advances (clamped to the last
    /// step). On failure the error is stored and the index stays put.
    pub fn next(&mut self) -> Result<(), SessionError> {
        self.ensure_editable()?;
        if let Err(e) = self.validate_current_step() {
            if let SessionError::Validation(msg) = &e {
                self.error = Some(msg.clone());
            }
            return Err(e);
        }
        self.error = None;
        self.step_index = (self.step_index + 1).min(self.last_step_index());
        Ok(())
    }

    /// Steps back (clamped to 0). Entered values are retained.
    pub fn prev(&mut self) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.error = None;
        self.step_index = self.step_index.saturating_sub(1);
        Ok(())
    }

    /// Re-validates the last step and parks the session in `Submitting`.
    /// Only callable on the last step; re-entrant submits are rejected by
    /// `ensure_editable`.
    pub fn begin_submit(&mut self) -> Result<(), SessionError> {
        self.ensure_editable()?;
        if self.step_index != self.last_step_index() {
            return Err(SessionError::NotAtLastStep);
        }
        if let Err(e) = self.validate_current_step() {
            if let SessionError::Validation(msg) = &e {
                self.error = Some(msg.clone());
            }
            return Err(e);
        }
        self.error = None;
        self.status = SessionStatus::Submitting;
        Ok(())
    }

    pub fn complete_submit(&mut self) {
        self.status = SessionStatus::Submitted;
    }

    /// Returns the session to the last editable step with all values
    /// intact; the forward failure is surfaced as the session error.
    pub fn fail_submit(&mut self, message: String) {
        self.status = SessionStatus::InProgress;
        self.error = Some(message);
    }
}

/// Process-local session store. Sessions exist only for the duration of one
/// form-filling pass; nothing is persisted. The lock is never held across
/// an await point.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, FormSession>>>,
}

impl SessionStore {
    pub fn new() -> SessionStore {
        SessionStore::default()
    }

    pub fn insert(&self, session: FormSession) {
        self.inner.write().insert(session.id, session);
    }

    pub fn with<R>(&self, id: Uuid, f: impl FnOnce(&FormSession) -> R) -> Option<R> {
        self.inner.read().get(&id).map(f)
    }

    pub fn with_mut<R>(&self, id: Uuid, f: impl FnOnce(&mut FormSession) -> R) -> Option<R> {
        self.inner.write().get_mut(&id).map(f)
    }

    pub fn remove(&self, id: Uuid) -> Option<FormSession> {
        self.inner.write().remove(&id)
    }
}
