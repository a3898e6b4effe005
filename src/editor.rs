//! Editor abstraction for opening note files.
//!
//! This module provides an abstraction for opening a note in an external
//! editor, so the CLI and the interactive browser can be tested with a mock
//! instead of spawning real processes.

use crate::errors::{AppResult, EditorError};
use std::env;
use std::io;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Trait defining the interface for an editor component.
///
/// # Examples
///
/// ```
/// use quire::editor::Editor;
/// use quire::errors::AppResult;
/// use std::path::Path;
///
/// struct DummyEditor;
///
/// impl Editor for DummyEditor {
///     fn open(&self, path: &Path) -> AppResult<()> {
///         println!("Would open {}", path.display());
///         Ok(())
///     }
/// }
///
/// DummyEditor.open(Path::new("note.txt")).unwrap();
/// ```
pub trait Editor {
    /// Opens a file and blocks until the editor exits.
    ///
    /// # Errors
    ///
    /// Implementations return `AppError::Editor` when the editor cannot be
    /// started or reports failure.
    fn open(&self, path: &Path) -> AppResult<()>;
}

/// An editor launched as a child process with the file path as last argument.
///
/// # Examples
///
/// ```no_run
/// use quire::editor::{Editor, SystemEditor};
/// use std::path::Path;
///
/// let editor = SystemEditor::new("vim");
/// editor.open(Path::new("/home/me/notes/20240101_120000_todo.txt"))?;
/// # Ok::<(), quire::AppError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemEditor {
    /// The program to run (e.g., "vim", "code", "xdg-open").
    pub program: String,
    /// Fixed arguments placed before the file path.
    pub args: Vec<String>,
}

impl SystemEditor {
    pub fn new(program: impl Into<String>) -> Self {
        SystemEditor {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// The default opener for the current platform.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::NoDefaultOpener` on platforms without a known opener.
    pub fn platform_default() -> Result<Self, EditorError> {
        Self::default_for_os(env::consts::OS).ok_or_else(|| EditorError::NoDefaultOpener {
            platform: env::consts::OS.to_string(),
        })
    }

    /// The opener used on `os` (a value of `std::env::consts::OS`).
    pub fn default_for_os(os: &str) -> Option<Self> {
        match os {
            "macos" => Some(Self::new("open")),
            "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => {
                Some(Self::new("xdg-open"))
            }
            "windows" => Some(SystemEditor {
                program: "rundll32".to_string(),
                args: vec!["url.dll,FileProtocolHandler".to_string()],
            }),
            _ => None,
        }
    }
}

impl Editor for SystemEditor {
    /// Runs the editor on `path` and waits for it to exit.
    ///
    /// # Errors
    ///
    /// - `EditorError::CommandNotFound` if the program does not exist
    /// - `EditorError::PermissionDenied` if it cannot be executed
    /// - `EditorError::ExecutionFailed` for other spawn failures
    /// - `EditorError::NonZeroExit` if it exits unsuccessfully
    fn open(&self, path: &Path) -> AppResult<()> {
        debug!("Launching editor {} on {}", self.program, path.display());

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .status()
            .map_err(|e| spawn_error(&self.program, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(EditorError::NonZeroExit {
                command: self.program.clone(),
                status_code: status.code().unwrap_or(-1),
            }
            .into())
        }
    }
}

fn spawn_error(command: &str, source: io::Error) -> EditorError {
    let command = command.to_string();
    match source.kind() {
        io::ErrorKind::NotFound => EditorError::CommandNotFound { command, source },
        io::ErrorKind::PermissionDenied => EditorError::PermissionDenied { command, source },
        _ => EditorError::ExecutionFailed { command, source },
    }
}
