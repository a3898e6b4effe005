//! Error handling utilities for quire.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Failures are grouped the way callers need to react to them:
//!
//! - directory-access errors abort a whole catalog operation and name the path
//! - not-found and ambiguous-id errors are returned for single-note lookups
//! - decode errors describe files skipped during a bulk listing; they are
//!   reported alongside the results, never returned in place of them
//! - write errors carry the target path and the underlying I/O error verbatim

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents specific error cases that can occur when interacting with external editors.
///
/// # Examples
///
/// ```
/// use quire::errors::EditorError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "command not found");
/// let error = EditorError::CommandNotFound {
///     command: "vim".to_string(),
///     source: io_error,
/// };
///
/// assert!(format!("{}", error).contains("not found"));
/// assert!(format!("{}", error).contains("vim"));
/// ```
#[derive(Debug, Error)]
pub enum EditorError {
    /// Error when the specified editor command cannot be found.
    #[error("Editor command '{command}' not found: {source}. Please check that the editor is installed and available in your PATH.")]
    CommandNotFound {
        /// The editor command that was not found
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when permission is denied to execute the editor command.
    #[error("Permission denied when trying to execute editor '{command}': {source}. Please check file permissions or try running with appropriate access rights.")]
    PermissionDenied {
        /// The editor command that had permission denied
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when the editor command fails to execute due to other I/O errors.
    #[error("Failed to execute editor '{command}': {source}")]
    ExecutionFailed {
        /// The editor command that failed to execute
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when the editor exits with a non-zero status code.
    #[error("Editor '{command}' exited with non-zero status code: {status_code}")]
    NonZeroExit {
        /// The editor command that exited with a non-zero status
        command: String,
        /// The exit status code
        status_code: i32,
    },

    /// No editor preference is set and the platform has no known default opener.
    #[error("No editor configured and no default opener is known for platform '{platform}'. Set QUIRE_EDITOR or EDITOR.")]
    NoDefaultOpener {
        /// The value of `std::env::consts::OS`
        platform: String,
    },
}

/// Errors raised by the note catalog while scanning, loading or writing notes.
///
/// # Examples
///
/// ```
/// use quire::errors::CatalogError;
///
/// let error = CatalogError::NotFound { id: "20240101_120000_todo".to_string() };
/// assert_eq!(format!("{}", error), "Note not found: 20240101_120000_todo");
/// ```
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A configured note directory could not be read.
    #[error("Failed to read notes directory {path}: {source}")]
    DirectoryAccess {
        /// The directory that could not be read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// No note with the requested id exists in the primary directory.
    #[error("Note not found: {id}")]
    NotFound {
        /// The id that was looked up
        id: String,
    },

    /// An id prefix matched more than one note.
    #[error("Note id '{id}' is ambiguous; it matches: {}", candidates.join(", "))]
    AmbiguousId {
        /// The id prefix that was looked up
        id: String,
        /// Stems of every matching note
        candidates: Vec<String>,
    },

    /// Creating, rewriting or removing a note file failed.
    #[error("Failed to write note {path}: {source}")]
    Write {
        /// The file that was being written or removed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A note file could not be read as text.
    #[error("Failed to decode note {path}: {source}")]
    Decode {
        /// The file that failed to decode
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Represents all possible errors that can occur in quire.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories.
///
/// # Examples
///
/// ```
/// use quire::errors::AppError;
///
/// let error = AppError::Config("Missing notes directory".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing notes directory");
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors raised by catalog operations on note files.
    #[error("{0}")]
    Catalog(#[from] CatalogError),

    /// Errors when interacting with the text editor.
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    /// Invalid user input, such as an empty title.
    #[error("Invalid input: {0}")]
    Input(String),

    /// Failures encoding or decoding JSON and YAML documents.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
pub type AppResult<T> = Result<T, AppError>;
