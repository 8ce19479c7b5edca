/*!
 * Error types for the subedit library.
 *
 * This module contains custom error types for the different layers of an
 * editing session, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

use crate::work::TrackedState;

/// Errors returned by the change registry when a registration is rejected.
///
/// A rejected registration never mutates the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkError {
    /// The object is already tracked in one of the collections
    #[error("Duplicate registration: object is already tracked as {state}")]
    DuplicateRegistration {
        /// Where the object currently lives
        state: TrackedState,
    },

    /// The requested transition is not allowed from the current state
    #[error("Invalid transition: cannot mark a {from} object as updated")]
    InvalidTransition {
        /// State the object was in when the call was made
        from: TrackedState,
    },
}

/// Errors that can occur while editing captions or session metadata
#[derive(Error, Debug)]
pub enum EditorError {
    /// Caption end time is not after its start time, or too short
    #[error("Invalid timing: {0}")]
    InvalidTiming(String),

    /// Caption text is empty after trimming
    #[error("Empty caption text")]
    EmptyText,

    /// The caption does not belong to this editor
    #[error("Caption is not part of this editing session")]
    UnknownCaption,

    /// Title exceeds the configured maximum
    #[error("Title too long: {len} characters (max {max})")]
    TitleTooLong { len: usize, max: usize },

    /// Description exceeds the configured maximum
    #[error("Description too long: {len} characters (max {max})")]
    DescriptionTooLong { len: usize, max: usize },

    /// Error from the change registry
    #[error("Work error: {0}")]
    Work(#[from] WorkError),
}

/// Errors that can occur while handing pending work to a persister
#[derive(Error, Debug)]
pub enum SyncError {
    /// The persister refused or failed to store the batch
    #[error("Persist failed: {0}")]
    PersistFailed(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the change registry
    #[error("Work error: {0}")]
    Work(#[from] WorkError),

    /// Error from the editing surface
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    /// Error from the save seam
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
