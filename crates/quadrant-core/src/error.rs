//! Error types for the quadrant library.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::TaskId;

/// Comprehensive error type for all quadrant operations.
#[derive(Error, Debug)]
pub enum QuadrantError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Task not found for the given ID
    #[error("Task with ID {id} not found")]
    TaskNotFound { id: TaskId },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// No API key is configured, so no AI call was attempted
    #[error("No API key configured. Set one with `quadrant settings --api-key <KEY>`")]
    MissingCredential,
    /// The AI provider refused the configured API key
    #[error("The configured API key was rejected. Set a new one with `quadrant settings --api-key <KEY>`")]
    CredentialRejected,
    /// An AI call failed or returned an unusable reply
    #[error("AI request failed: {message}")]
    Ai { message: String },
    /// A remote document write failed; local state was kept
    #[error("Failed to save {slot}: {message}. Local changes are kept")]
    Persistence { slot: String, message: String },
    /// An import bundle was rejected before anything was written
    #[error("Import rejected: {reason}")]
    InvalidImport { reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> QuadrantError {
        QuadrantError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> QuadrantError {
        QuadrantError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl QuadrantError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates an import rejection.
    pub fn invalid_import(reason: impl Into<String>) -> Self {
        Self::InvalidImport {
            reason: reason.into(),
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| QuadrantError::database(message).with_source(e))
    }
}

/// Result type alias for quadrant operations
pub type Result<T> = std::result::Result<T, QuadrantError>;
