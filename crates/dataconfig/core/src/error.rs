//! Error types for row construction and value coercion.

use crate::diagnostics::DiagnosticKind;

/// Failure to construct a target row instance for one record.
///
/// Record-skipping: the decoder omits the record and continues with the rest
/// of the batch.
#[derive(Debug, Clone, thiserror::Error)]
#[error("row construction failed: {reason}")]
pub struct ConstructError {
    reason: String,
}

impl ConstructError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A single field's coercion failure.
///
/// Field-isolating: the decoder records a diagnostic, leaves the field at its
/// default, and continues with the next field.
#[derive(Debug, thiserror::Error)]
pub enum CoerceError {
    #[error("invalid integer literal `{text}`")]
    InvalidInt {
        text: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("invalid float literal `{text}`")]
    InvalidFloat {
        text: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("invalid boolean literal `{text}`")]
    InvalidBool { text: String },

    #[error("container text is not well-formed: {source}")]
    MalformedContainer {
        #[source]
        source: serde_json::Error,
    },

    #[error("container value is not a JSON {expected}")]
    ContainerShape { expected: &'static str },

    #[error("unsupported destination type `{type_name}`")]
    Unsupported { type_name: &'static str },
}

impl CoerceError {
    /// Diagnostic category the decoder files this failure under.
    pub(crate) fn diagnostic_kind(&self) -> DiagnosticKind {
        match self {
            CoerceError::Unsupported { .. } => DiagnosticKind::UnsupportedKind,
            _ => DiagnosticKind::InvalidValue,
        }
    }
}
