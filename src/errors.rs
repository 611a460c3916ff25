//! Typed error hierarchy for cardsmith.
//!
//! Four top-level enums cover the subsystems:
//! - `SelectionError` — layout selection state machine rejections
//! - `SchemaError` — form schema boundary failures
//! - `StoreError` — card configuration service and client failures
//! - `SessionError` — builder session operation failures

use thiserror::Error;

/// Rejections from the layout selection state machine.
///
/// These are deliberate guard failures, not I/O errors: the machine refuses
/// a transition and leaves its state untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Unknown field id '{id}'")]
    UnknownField { id: String },

    #[error("Section {index} is already being edited")]
    EditInProgress { index: usize },

    #[error("No section at index {index} (have {len})")]
    NoSuchSection { index: usize, len: usize },
}

/// Failures at the form schema boundary.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Schema host returned status {status}")]
    HostStatus { status: u16 },

    #[error("No valid form elements found in schema payload")]
    MissingElements,

    #[error("No elements found with a properties.label structure")]
    NoLabeledElements,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failures from the card configuration store (service or client side).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Card configuration for form '{form_id}' not found")]
    NotFound { form_id: String },

    #[error("Card service returned status {status}: {message}")]
    ServiceStatus { status: u16, message: String },

    #[error("Database error: {0}")]
    Database(#[source] anyhow::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failures from builder session operations.
///
/// Save/load are not reentrant: a second call while one is in flight is
/// rejected with `OperationInFlight` rather than racing the store.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("A save or load is already in flight")]
    OperationInFlight,

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_error_unknown_field_carries_id() {
        let err = SelectionError::UnknownField { id: "f9".into() };
        match &err {
            SelectionError::UnknownField { id } => assert_eq!(id, "f9"),
            _ => panic!("Expected UnknownField"),
        }
        assert!(err.to_string().contains("f9"));
    }

    #[test]
    fn selection_error_no_such_section_carries_bounds() {
        let err = SelectionError::NoSuchSection { index: 4, len: 2 };
        assert!(err.to_string().contains('4'));
        assert!(err.to_string().contains('2'));
    }

    #[test]
    fn session_error_converts_from_selection_error() {
        let inner = SelectionError::EditInProgress { index: 1 };
        let session_err: SessionError = inner.into();
        match &session_err {
            SessionError::Selection(SelectionError::EditInProgress { index }) => {
                assert_eq!(*index, 1);
            }
            _ => panic!("Expected SessionError::Selection(EditInProgress)"),
        }
    }

    #[test]
    fn store_error_not_found_is_matchable() {
        let err = StoreError::NotFound {
            form_id: "form-1".into(),
        };
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn all_error_types_implement_std_error_trait() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&SelectionError::UnknownField { id: "x".into() });
        assert_std_error(&SchemaError::MissingElements);
        assert_std_error(&StoreError::NotFound { form_id: "x".into() });
        assert_std_error(&SessionError::OperationInFlight);
    }
}
