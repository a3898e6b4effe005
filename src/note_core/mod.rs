//! Core note functionality without I/O operations.
//!
//! This module contains the `Note` entity, the closed set of on-disk formats,
//! the tag set type, the identifier scheme (`id`) and the dialect codec
//! (`codec`). Nothing here touches the filesystem; `note_io` builds the
//! catalog on top of it.

pub mod codec;
pub mod id;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The on-disk dialect of a note, selected by file extension.
///
/// # Examples
///
/// ```
/// use quire::note_core::NoteFormat;
///
/// let format: NoteFormat = "org".parse().unwrap();
/// assert_eq!(format, NoteFormat::Outline);
/// assert_eq!(format.extension(), "org");
/// assert_eq!(NoteFormat::from_extension("md"), Some(NoteFormat::Markdown));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteFormat {
    /// `Title:`/`Tags:` labelled plain text (`.txt`).
    #[default]
    Plain,
    /// Org-style `#+DIRECTIVE:` outline markup (`.org`).
    Outline,
    /// Markdown body with plain-dialect metadata labels (`.md`).
    Markdown,
}

impl NoteFormat {
    /// Every supported format, in the order their extensions are probed.
    pub const ALL: [NoteFormat; 3] = [NoteFormat::Plain, NoteFormat::Outline, NoteFormat::Markdown];

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            NoteFormat::Plain => "txt",
            NoteFormat::Outline => "org",
            NoteFormat::Markdown => "md",
        }
    }

    /// Maps a file extension (without dot) to its format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.extension() == ext)
    }

    /// Determines the format of a path from its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for NoteFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for NoteFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "txt" | "plain" | "text" => Ok(NoteFormat::Plain),
            "org" | "outline" => Ok(NoteFormat::Outline),
            "md" | "markdown" => Ok(NoteFormat::Markdown),
            other => Err(format!(
                "unknown note format '{}' (expected txt, org or md)",
                other
            )),
        }
    }
}

/// A de-duplicated, lexically ordered set of tags.
///
/// Tags keep their case for display; matching is case-insensitive. The empty
/// string is a legal member: the plain dialect decodes `Tags: a,,b` to three
/// tags.
///
/// # Examples
///
/// ```
/// use quire::note_core::Tags;
///
/// let tags = Tags::from_comma_list("work, Urgent ,work");
/// assert_eq!(tags.len(), 2);
/// assert_eq!(tags.join(", "), "Urgent, work");
/// assert!(tags.matches("urg"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(BTreeSet<String>);

impl Tags {
    /// Creates an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits user input on commas and trims each tag.
    ///
    /// Blank input yields an empty set; empty segments between commas are
    /// kept as empty-string tags, matching the plain dialect's decoding.
    pub fn from_comma_list(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::new();
        }
        trimmed.split(',').map(|tag| tag.trim().to_string()).collect()
    }

    /// Adds a tag; returns false when it was already present.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        self.0.insert(tag.into())
    }

    /// Whether the exact tag string is present.
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Joins the tags in order with the given separator.
    pub fn join(&self, separator: &str) -> String {
        self.iter().collect::<Vec<_>>().join(separator)
    }

    /// Case-insensitive substring match of `query` against each tag.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.iter().any(|tag| tag.to_lowercase().contains(&query))
    }
}

impl<S: Into<String>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Tags(iter.into_iter().map(Into::into).collect())
    }
}

impl Serialize for Tags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// A single note: the atomic unit of stored information.
///
/// `id` is derived once at creation time and doubles as the filename stem;
/// `filename()` is always `{id}.{format extension}`. `dir` records where the
/// note lives so `path()` is correct for notes outside the primary directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tags: Tags,
    pub created: NaiveDateTime,
    /// On freshly loaded notes this is the load time, not a historical value.
    pub modified: NaiveDateTime,
    pub format: NoteFormat,
    #[serde(skip)]
    pub dir: PathBuf,
}

impl Note {
    /// Filename on disk: the id plus the format's extension.
    pub fn filename(&self) -> String {
        format!("{}.{}", self.id, self.format.extension())
    }

    /// Full path of the note file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(self.filename())
    }

    /// Case-insensitive keyword match against title, content or any tag.
    pub fn matches_keyword(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self.content.to_lowercase().contains(&query)
            || self.tags.matches(&query)
    }
}
