/*!
# Quire

Quire keeps notes as individual flat files spread over one or more
directories, in three formats: plain text (`.txt`), an org-style outline
markup (`.org`) and markdown (`.md`). Title, tags and timestamps live in a
small metadata header inside each file, so the files stay readable and
editable without the tool.

## Core Features

- Create, show, edit, update and delete notes from the command line
- List notes across every configured directory, newest last
- Search by keyword, tag or creation date
- Interactive browser for paging, searching and editing
- Configurable note directories, editor and color theme

## Architecture

- `note_core`: the `Note` type, the identifier scheme and the dialect codec (no I/O)
- `note_io`: the catalog; scanning, searching and writing note files
- `config`: YAML config file plus environment overrides
- `editor`: launching the external editor
- `render`: colored text output
- `browser`: the interactive loop
- `cli`: command-line interface using clap
- `logging`: tracing subscriber setup
- `errors`: error handling infrastructure

## Usage Example

```rust,no_run
use quire::{Catalog, Config};

fn main() -> quire::AppResult<()> {
    let config = Config::load()?;
    let catalog = Catalog::from_config(&config)?;

    for note in catalog.search_by_tag("work")? {
        println!("{} {}", note.id, note.title);
    }
    Ok(())
}
```
*/

/// Interactive note browser
pub mod browser;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
pub mod constants;
/// Launching notes in an external editor
pub mod editor;
/// Error types and utilities for error handling
pub mod errors;
pub mod logging;
/// Note model, identifier scheme and codec
pub mod note_core;
/// Catalog operations on note files
pub mod note_io;
pub mod render;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use note_core::{Note, NoteFormat, Tags};
pub use note_io::{Catalog, Listing, SearchMode};
