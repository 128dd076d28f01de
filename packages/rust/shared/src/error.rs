//! Error types for docsteps.
//!
//! Library crates use [`DocStepsError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

use crate::types::TutorialId;

/// Top-level error type for all docsteps operations.
#[derive(Debug, thiserror::Error)]
pub enum DocStepsError {
    /// A meta or step document does not have the expected shape.
    #[error("validation error in `{field}`: {reason}")]
    Validation { field: String, reason: String },

    /// Two steps of one tutorial declare the same position.
    #[error(
        "duplicate step position {position} in tutorial \"{tutorial_id}\"\ncheck steps:\n{}",
        .paths.join("\n")
    )]
    DuplicatePosition {
        tutorial_id: TutorialId,
        position: u32,
        paths: Vec<String>,
    },

    /// No meta document exists for the requested tutorial.
    #[error("tutorial not found: {tutorial_id}")]
    TutorialNotFound { tutorial_id: TutorialId },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Front matter or meta JSON could not be parsed.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocStepsError>;

impl DocStepsError {
    /// Create a validation error for a named field.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The offending field, if this is a validation error.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Content errors indicate authoring mistakes that must block publishing.
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::DuplicatePosition { .. } | Self::Parse { .. }
        )
    }
}
