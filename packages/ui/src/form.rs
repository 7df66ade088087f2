//! # Form state machine
//!
//! ```text
//! Editing ──submit──▶ Validating ──invalid──▶ Editing (errors shown)
//!                         │
//!                       valid
//!                         ▼
//!                    Submitting ──▶ SettledSuccess | SettledError ──edit──▶ Editing
//! ```
//!
//! [`FormState`] owns the values, the per-field errors and the phase of one form
//! instance. [`submit`] drives a whole submission: validate, run the action
//! exactly once, and settle, unless the view went away in the meantime (see
//! [`Liveness`]).

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use crate::guard::Destination;
use crate::validation::{Field, FieldErrors, FormValues, Schema};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Validating,
    Submitting,
    SettledSuccess,
    SettledError,
}

/// Why [`FormState::begin_submit`] refused to start a submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitBlocked {
    /// A submission is already in flight.
    Busy,
    /// Client-side validation failed; the errors are now on the form.
    Invalid(FieldErrors),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormState {
    schema: Schema,
    defaults: FormValues,
    values: FormValues,
    errors: FieldErrors,
    phase: FormPhase,
    validated_once: bool,
}

impl FormState {
    pub fn new(schema: Schema, defaults: FormValues) -> Self {
        Self {
            schema,
            values: defaults.clone(),
            defaults,
            errors: FieldErrors::default(),
            phase: FormPhase::Editing,
            validated_once: false,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, field: Field) -> &str {
        self.values.get(field)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// Record an edit. Ignored while a submission is in flight. After the first
    /// submit attempt, the edited field is re-validated as the user types.
    pub fn set_value(&mut self, field: Field, value: impl Into<String>) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.values.set(field, value);
        self.phase = FormPhase::Editing;
        if self.validated_once {
            match self.schema.validate(&self.values).get(field) {
                Some(message) => self.errors.insert(field, message.to_string()),
                None => self.errors.remove(field),
            }
        }
        true
    }

    /// Restore the defaults and clear errors. Not allowed while submitting.
    pub fn reset(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.values = self.defaults.clone();
        self.errors = FieldErrors::default();
        self.phase = FormPhase::Editing;
        self.validated_once = false;
        true
    }

    /// Validate and, if everything passes, enter `Submitting` and hand back the
    /// values to send.
    pub fn begin_submit(&mut self) -> Result<FormValues, SubmitBlocked> {
        if self.is_submitting() {
            return Err(SubmitBlocked::Busy);
        }
        self.phase = FormPhase::Validating;
        self.validated_once = true;
        self.errors = self.schema.validate(&self.values);
        if !self.errors.is_empty() {
            self.phase = FormPhase::Editing;
            return Err(SubmitBlocked::Invalid(self.errors.clone()));
        }
        self.phase = FormPhase::Submitting;
        Ok(self.values.clone())
    }

    /// Leave `Submitting`. Values are kept either way.
    pub fn settle(&mut self, succeeded: bool) {
        if !self.is_submitting() {
            return;
        }
        self.phase = if succeeded {
            FormPhase::SettledSuccess
        } else {
            FormPhase::SettledError
        };
    }
}

/// Tracks whether the view that started some async work is still mounted.
/// Clones share the flag.
#[derive(Clone, Debug)]
pub struct Liveness(Rc<Cell<bool>>);

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Liveness {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    /// Mark the view as gone; pending continuations must drop their results.
    pub fn end(&self) {
        self.0.set(false);
    }
}

/// Mutable access to a [`FormState`] living in some container.
pub trait FormAccess {
    fn with_form<R>(&mut self, f: impl FnOnce(&mut FormState) -> R) -> R;
}

impl FormAccess for Rc<RefCell<FormState>> {
    fn with_form<R>(&mut self, f: impl FnOnce(&mut FormState) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Blocked(SubmitBlocked),
    /// The action ran; `Some` carries where to go next.
    Settled(Option<Destination>),
    /// The view was disposed before the action finished; nothing was applied.
    Abandoned,
}

/// Run one submission of `form` through `action`.
///
/// `action` is only invoked when validation passes and nothing else is in
/// flight. It reports success by returning a destination.
pub async fn submit<H, F, Fut>(mut form: H, liveness: &Liveness, action: F) -> SubmitOutcome
where
    H: FormAccess,
    F: FnOnce(FormValues) -> Fut,
    Fut: Future<Output = Option<Destination>>,
{
    let values = match form.with_form(FormState::begin_submit) {
        Ok(values) => values,
        Err(blocked) => return SubmitOutcome::Blocked(blocked),
    };
    let destination = action(values).await;
    if !liveness.is_alive() {
        tracing::debug!("Form disposed before its submission settled");
        return SubmitOutcome::Abandoned;
    }
    form.with_form(|f| f.settle(destination.is_some()));
    SubmitOutcome::Settled(destination)
}
