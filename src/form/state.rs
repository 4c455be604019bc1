use crate::form::adapter::FieldErrors;
use crate::mvi::{Intent, Reducer, UiState};

/// Error and busy state of one form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormState {
    pub errors: FieldErrors,
    pub processing: bool,
}

impl FormState {
    /// True whenever any field carries at least one message.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn field_errors(&self, name: &str) -> Option<&[String]> {
        self.errors.get(name).map(Vec::as_slice)
    }
}

impl UiState for FormState {}

#[derive(Debug, Clone)]
pub enum FormIntent {
    SetFieldError { name: String, message: String },
    SetErrors(FieldErrors),
    ClearErrors,
    Reset,
    /// Submission began: busy, previous errors discarded.
    SubmitStarted,
    /// Client-side validation rejected the data.
    ValidationFailed(FieldErrors),
    /// The server answered with field errors.
    ServerRejected(FieldErrors),
    /// Submission settled, whatever the result.
    Finished,
}

impl Intent for FormIntent {}

pub struct FormReducer;

/// Fields with no messages do not count as errors.
fn non_empty(errors: FieldErrors) -> FieldErrors {
    errors
        .into_iter()
        .filter(|(_, messages)| !messages.is_empty())
        .collect()
}

impl Reducer for FormReducer {
    type State = FormState;
    type Intent = FormIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            FormIntent::SetFieldError { name, message } => {
                let mut errors = state.errors;
                errors.insert(name, vec![message]);
                FormState { errors, ..state }
            }
            FormIntent::SetErrors(errors) => FormState {
                errors: non_empty(errors),
                ..state
            },
            FormIntent::ClearErrors => FormState {
                errors: FieldErrors::new(),
                ..state
            },
            FormIntent::Reset => FormState::default(),
            FormIntent::SubmitStarted => FormState {
                errors: FieldErrors::new(),
                processing: true,
            },
            FormIntent::ValidationFailed(errors) | FormIntent::ServerRejected(errors) => {
                FormState {
                    errors: non_empty(errors),
                    processing: false,
                }
            }
            FormIntent::Finished => FormState {
                processing: false,
                ..state
            },
        }
    }
}
