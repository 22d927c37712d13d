//! Editor error taxonomy
//!
//! Every variant is recoverable and user-facing: the host renders it (for
//! example as a modal) and the editor keeps running.

use crate::mesh::MeshError;

/// Errors raised by editor operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditorError {
    #[error("Object id must not be empty")]
    InvalidId,

    #[error("An object with id '{0}' already exists")]
    DuplicateId(String),

    #[error("No object with id '{0}'")]
    NotFound(String),

    #[error("No model file was supplied")]
    MissingFile,

    #[error("Object '{0}' would not fit inside the room")]
    OutOfBounds(String),

    #[error("The room already holds the maximum of {limit} objects")]
    CapacityExceeded { limit: usize },

    #[error("Failed to import model '{file}': {source}")]
    Import {
        file: String,
        #[source]
        source: MeshError,
    },
}

/// Fieldless discriminant of [`EditorError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidId,
    DuplicateId,
    NotFound,
    MissingFile,
    OutOfBounds,
    CapacityExceeded,
    Import,
}

impl EditorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EditorError::InvalidId => ErrorKind::InvalidId,
            EditorError::DuplicateId(_) => ErrorKind::DuplicateId,
            EditorError::NotFound(_) => ErrorKind::NotFound,
            EditorError::MissingFile => ErrorKind::MissingFile,
            EditorError::OutOfBounds(_) => ErrorKind::OutOfBounds,
            EditorError::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            EditorError::Import { .. } => ErrorKind::Import,
        }
    }

    /// Short title for an error dialog
    pub fn title(&self) -> &'static str {
        match self.kind() {
            ErrorKind::InvalidId => "Invalid id",
            ErrorKind::DuplicateId => "Duplicate id",
            ErrorKind::NotFound => "Object not found",
            ErrorKind::MissingFile => "Missing file",
            ErrorKind::OutOfBounds => "Out of bounds",
            ErrorKind::CapacityExceeded => "Room is full",
            ErrorKind::Import => "Import failed",
        }
    }
}
