use crate::constants::{APP_DESCRIPTION, APP_NAME, LOG_FORMAT_JSON, LOG_FORMAT_TEXT};
use crate::note_core::NoteFormat;
use crate::note_io::SearchMode;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// A flat-file note manager
#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = APP_DESCRIPTION)]
#[command(author, version, long_about = None)]
pub struct CliArgs {
    /// Print verbose (debug) logs
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, value_name = "FORMAT", default_value = LOG_FORMAT_TEXT,
          value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON], global = true)]
    pub log_format: String,

    /// Config file to use instead of ~/.quirerc.yaml
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Runs the interactive browser when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Create a new note in the primary directory
    Create {
        #[arg(short, long)]
        title: String,
        #[arg(short, long, default_value = "")]
        content: String,
        /// Comma-separated tags
        #[arg(short = 'g', long, default_value = "")]
        tags: String,
        /// txt, org or md
        #[arg(short, long, default_value = "txt", value_parser = parse_format)]
        format: NoteFormat,
    },
    /// List every note in every directory
    List {
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Search notes by keyword, tag or creation date
    Search {
        query: String,
        /// keyword, tag or date
        #[arg(long = "by", default_value = "keyword", value_parser = parse_mode)]
        mode: SearchMode,
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Print a note's metadata and content
    Show { id: String },
    /// Open a note in the editor
    Edit { id: String },
    /// Replace a note's title, content and tags
    Update {
        id: String,
        #[arg(short, long)]
        title: String,
        #[arg(short, long, default_value = "")]
        content: String,
        /// Comma-separated tags
        #[arg(short = 'g', long, default_value = "")]
        tags: String,
    },
    /// Delete a note
    Delete { id: String },
    /// Manage note directories
    Dirs {
        #[command(subcommand)]
        action: DirsAction,
    },
}

#[derive(Args, Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayArgs {
    /// Show a content preview
    #[arg(short, long)]
    pub content: bool,
    /// Show tags
    #[arg(short, long)]
    pub tags: bool,
    /// Print notes as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum DirsAction {
    /// Show configured directories, primary first
    List,
    /// Add a directory (created if missing)
    Add { path: String },
    /// Stop using a directory; its files are kept
    Remove { path: String },
}

fn parse_format(value: &str) -> Result<NoteFormat, String> {
    value.parse()
}

fn parse_mode(value: &str) -> Result<SearchMode, String> {
    value.parse()
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        <CliArgs as Parser>::parse()
    }
}
