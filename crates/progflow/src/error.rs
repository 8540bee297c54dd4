//! Error types for progflow operations.
//!
//! Errors are categorized into two main types:
//!
//! - **`Error`**: fatal errors that abort the run (untrusted ids, I/O failures)
//! - **`Diagnostic`**: per-reference problems that are collected but don't halt
//!   the batch
//!
//! ## Error Philosophy
//!
//! Progflow follows a "best effort" approach for dependency resolution:
//! - A single malformed dependency reference shouldn't prevent deriving the
//!   rest of the flow output
//! - Reference problems are collected and reported, not thrown
//! - Only catalog-integrity failures (missing, duplicate, or non-numeric ids)
//!   and adapter failures (I/O, JSON) cause early termination, because
//!   downstream foreign-key-style relationships cannot be trusted after them

use thiserror::Error;

use crate::types::ProgramId;

/// Result type for progflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for progflow operations.
///
/// These errors represent failures that prevent the run from completing.
/// There are no partial results: either the full derived output is produced,
/// or one of these identifies the offending input.
#[derive(Debug, Error)]
pub enum Error {
    /// A catalog row has no program id
    #[error("row {row}: missing program id")]
    MissingId {
        /// Zero-based position of the row in the input batch
        row: usize,
    },

    /// A catalog row has a non-numeric program id
    #[error("row {row}: invalid program id {value:?} (numeric id required)")]
    InvalidId {
        /// Zero-based position of the row in the input batch
        row: usize,
        /// The offending id text
        value: String,
    },

    /// Two catalog rows share the same program id
    #[error("duplicate program id {id}")]
    DuplicateId {
        /// The id that appeared more than once
        id: ProgramId,
    },

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A dependency reference that could not be resolved.
///
/// Diagnostics are collected during resolution but don't halt the run. The
/// resolver continues with the remaining references and the caller receives
/// all diagnostics alongside the derived output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Name of the program whose reference failed to resolve
    pub program: String,
    /// The offending reference token, as written in the input
    pub reference: String,
    /// Category of the problem
    pub kind: DiagnosticKind,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: dependency {:?} {}",
            self.program, self.reference, self.kind
        )
    }
}

impl std::error::Error for Diagnostic {}

/// Categorization of resolution diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The reference token is not a syntactically valid (numeric) id
    MalformedReference,

    /// The reference is a valid id but matches no program in the catalog
    UnknownReference,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedReference => write!(f, "is not a valid id"),
            Self::UnknownReference => write!(f, "does not match any program"),
        }
    }
}

impl Diagnostic {
    /// Create a new resolution diagnostic.
    #[must_use]
    pub fn new(
        program: impl Into<String>,
        reference: impl Into<String>,
        kind: DiagnosticKind,
    ) -> Self {
        Self {
            program: program.into(),
            reference: reference.into(),
            kind,
        }
    }

    /// Create a diagnostic for a syntactically invalid reference token.
    #[must_use]
    pub fn malformed_reference(program: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::new(program, reference, DiagnosticKind::MalformedReference)
    }

    /// Create a diagnostic for a reference to an id absent from the catalog.
    #[must_use]
    pub fn unknown_reference(program: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::new(program, reference, DiagnosticKind::UnknownReference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_display_includes_program_and_reference() {
        let diag = Diagnostic::unknown_reference("Orbital Relay", "42");

        let display = diag.to_string();
        assert!(display.contains("Orbital Relay"));
        assert!(display.contains("42"));
        assert!(display.contains("does not match any program"));
    }

    #[test]
    fn malformed_reference_constructor_sets_kind() {
        let diag = Diagnostic::malformed_reference("Relay", "TBD");

        assert_eq!(diag.kind, DiagnosticKind::MalformedReference);
        assert!(diag.to_string().contains("is not a valid id"));
    }

    #[test]
    fn fatal_errors_identify_the_offending_row() {
        let missing = Error::MissingId { row: 3 };
        assert!(missing.to_string().contains("row 3"));

        let invalid = Error::InvalidId {
            row: 7,
            value: "P-12".to_string(),
        };
        let display = invalid.to_string();
        assert!(display.contains("row 7"));
        assert!(display.contains("P-12"));
    }
}
