//! Note I/O operations and catalog queries.
//!
//! This module contains every operation that touches note files: scanning the
//! configured directories, loading and decoding notes, the keyword/tag/date
//! searches built on top of a full scan, and create/update/delete on the
//! primary directory.
//!
//! There is no index or cache. Every catalog operation re-reads the
//! directories from disk. Writes go through a temporary file in the target
//! directory that is renamed over the note, so a concurrent scan sees either
//! the old or the new file, never a partial one.

use crate::config::Config;
use crate::constants::{DATE_FORMAT_ISO, DATE_QUERY_LAYOUTS, NOTE_FILE_MODE};
use crate::errors::{AppError, AppResult, CatalogError};
use crate::note_core::codec::{decode, encode};
use crate::note_core::id::{created_from_id, note_id, with_suffix};
use crate::note_core::{Note, NoteFormat, Tags};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fs::{self, Permissions};
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A file that was left out of a listing because it could not be decoded.
#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub error: CatalogError,
}

/// The result of scanning every configured directory.
///
/// Bad files never fail a listing; they are reported in `skipped` instead.
#[derive(Debug, Default)]
pub struct Listing {
    pub notes: Vec<Note>,
    pub skipped: Vec<SkippedFile>,
}

/// Which field a search query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Title, content or any tag.
    #[default]
    Keyword,
    /// Any tag, by substring.
    Tag,
    /// Creation date.
    Date,
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keyword" | "k" => Ok(SearchMode::Keyword),
            "tag" | "t" => Ok(SearchMode::Tag),
            "date" | "d" => Ok(SearchMode::Date),
            other => Err(format!("unknown search mode '{}'", other)),
        }
    }
}

/// Note catalog over an ordered list of directories.
///
/// The first directory is primary: new notes are created there and
/// `get`/`update`/`delete` look ids up there. Listings and searches cover
/// every directory.
///
/// # Examples
///
/// ```no_run
/// use quire::note_core::{NoteFormat, Tags};
/// use quire::note_io::Catalog;
/// use std::path::PathBuf;
///
/// let catalog = Catalog::new(vec![PathBuf::from("/home/me/notes")])?;
/// let note = catalog.create("Groceries", "milk", Tags::from_comma_list("home"), NoteFormat::Plain)?;
/// assert_eq!(catalog.get(&note.id)?.title, "Groceries");
/// # Ok::<(), quire::AppError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Catalog {
    dirs: Vec<PathBuf>,
}

impl Catalog {
    /// Creates a catalog over `dirs`; the first entry is the primary directory.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `dirs` is empty.
    pub fn new(dirs: Vec<PathBuf>) -> AppResult<Self> {
        if dirs.is_empty() {
            return Err(AppError::Config(
                "At least one notes directory must be configured".to_string(),
            ));
        }
        Ok(Catalog { dirs })
    }

    /// Creates a catalog over the directories of a loaded configuration.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(config.notes_dirs.clone())
    }

    /// The directory used for create, get, update and delete.
    pub fn primary_dir(&self) -> &Path {
        &self.dirs[0]
    }

    /// Every directory, in scan order.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Loads every note in every directory.
    ///
    /// Directories are visited in configured order and files in filename
    /// (and therefore creation) order within each directory.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DirectoryAccess` if any directory cannot be read.
    /// Files that fail to decode are reported in `Listing::skipped`.
    pub fn list(&self) -> AppResult<Listing> {
        let mut listing = Listing::default();

        for dir in &self.dirs {
            let paths = note_files(dir)?;
            debug!("Scanning {} note files in {}", paths.len(), dir.display());

            for path in paths {
                match load_note(&path) {
                    Ok(note) => listing.notes.push(note),
                    Err(error) => {
                        warn!("Skipping unreadable note {}: {}", path.display(), error);
                        listing.skipped.push(SkippedFile { path, error });
                    }
                }
            }
        }

        debug!(
            "Listed {} notes ({} skipped)",
            listing.notes.len(),
            listing.skipped.len()
        );
        Ok(listing)
    }

    /// Notes whose title, content or tags contain `query`, ignoring case.
    pub fn search(&self, query: &str) -> AppResult<Vec<Note>> {
        let notes = self.list()?.notes;
        Ok(notes
            .into_iter()
            .filter(|note| note.matches_keyword(query))
            .collect())
    }

    /// Notes with at least one tag containing `tag`, ignoring case.
    pub fn search_by_tag(&self, tag: &str) -> AppResult<Vec<Note>> {
        let tag = tag.trim().to_lowercase();
        let notes = self.list()?.notes;
        Ok(notes.into_iter().filter(|note| note.tags.matches(&tag)).collect())
    }

    /// Notes created on the date described by `query`.
    ///
    /// See [`DateQuery`] for how the query is interpreted.
    pub fn search_by_date(&self, query: &str) -> AppResult<Vec<Note>> {
        let date_query = DateQuery::parse(query);
        debug!("Date search resolved to {:?}", date_query);
        let notes = self.list()?.notes;
        Ok(notes
            .into_iter()
            .filter(|note| date_query.matches(note.created))
            .collect())
    }

    /// Runs the search selected by `mode`.
    pub fn search_by(&self, mode: SearchMode, query: &str) -> AppResult<Vec<Note>> {
        match mode {
            SearchMode::Keyword => self.search(query),
            SearchMode::Tag => self.search_by_tag(query),
            SearchMode::Date => self.search_by_date(query),
        }
    }

    /// Loads the note with the given id from the primary directory.
    ///
    /// An exact id wins; otherwise a prefix that matches exactly one note is
    /// accepted.
    ///
    /// # Errors
    ///
    /// - `CatalogError::NotFound` if nothing matches
    /// - `CatalogError::AmbiguousId` if the prefix matches several notes
    /// - `CatalogError::DirectoryAccess` if the primary directory is unreadable
    /// - `CatalogError::Decode` if the matching file cannot be read
    pub fn get(&self, id: &str) -> AppResult<Note> {
        let path = self.resolve_id(id)?;
        Ok(load_note(&path)?)
    }

    fn resolve_id(&self, id: &str) -> AppResult<PathBuf> {
        let id = id.trim();
        if id.is_empty() {
            return Err(AppError::Input("note id cannot be empty".to_string()));
        }

        let paths = note_files(self.primary_dir())?;
        if let Some(exact) = paths.iter().find(|path| file_stem(path) == id) {
            return Ok(exact.clone());
        }
        debug!("No note named {}, trying it as a prefix", id);

        let mut matches: Vec<PathBuf> = paths
            .into_iter()
            .filter(|path| file_stem(path).starts_with(id))
            .collect();
        match matches.len() {
            0 => Err(CatalogError::NotFound { id: id.to_string() }.into()),
            1 => Ok(matches.remove(0)),
            _ => Err(CatalogError::AmbiguousId {
                id: id.to_string(),
                candidates: matches.iter().map(|path| file_stem(path).to_string()).collect(),
            }
            .into()),
        }
    }

    /// The primary-directory file whose stem is exactly `id`.
    ///
    /// Used by the operations that rewrite or remove files, which never act
    /// on a prefix match.
    fn exact_path(&self, id: &str) -> AppResult<PathBuf> {
        let id = id.trim();
        if id.is_empty() {
            return Err(AppError::Input("note id cannot be empty".to_string()));
        }

        note_files(self.primary_dir())?
            .into_iter()
            .find(|path| file_stem(path) == id)
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() }.into())
    }

    /// Creates a new note in the primary directory, timestamped now.
    pub fn create(
        &self,
        title: &str,
        content: &str,
        tags: Tags,
        format: NoteFormat,
    ) -> AppResult<Note> {
        self.create_at(title, content, tags, format, current_instant())
    }

    /// Creates a new note in the primary directory with an explicit creation instant.
    ///
    /// If a note with the derived id already exists, `_2`, `_3`, ... is
    /// appended until the id is free.
    ///
    /// # Errors
    ///
    /// - `AppError::Input` if the title is blank
    /// - `CatalogError::Write` if the directory or file cannot be written
    pub fn create_at(
        &self,
        title: &str,
        content: &str,
        tags: Tags,
        format: NoteFormat,
        created: NaiveDateTime,
    ) -> AppResult<Note> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Input("note title cannot be empty".to_string()));
        }

        let dir = self.primary_dir().to_path_buf();
        ensure_notes_directory_exists(&dir)?;

        let base_id = note_id(title, created);
        let mut id = base_id.clone();
        let mut suffix = 2;
        while stem_taken(&dir, &id) {
            id = with_suffix(&base_id, suffix);
            suffix += 1;
        }
        if id != base_id {
            warn!("Note id {} already taken, using {}", base_id, id);
        }

        let note = Note {
            id,
            title: title.to_string(),
            content: content.to_string(),
            tags,
            created,
            modified: created,
            format,
            dir,
        };
        write_note(&note)?;

        info!("Created note {}", note.filename());
        Ok(note)
    }

    /// Replaces title, content and tags of an existing note.
    ///
    /// The id, filename and format are kept; `modified` advances to now.
    /// Unlike [`Catalog::get`], `id` must name the file exactly.
    pub fn update(&self, id: &str, title: &str, content: &str, tags: Tags) -> AppResult<Note> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Input("note title cannot be empty".to_string()));
        }

        let mut note = load_note(&self.exact_path(id)?)?;
        note.title = title.to_string();
        note.content = content.to_string();
        note.tags = tags;
        note.modified = current_instant();
        write_note(&note)?;

        info!("Updated note {}", note.filename());
        Ok(note)
    }

    /// Removes a note file and returns the note as it was.
    ///
    /// `id` must name the file exactly; prefixes are not accepted.
    pub fn delete(&self, id: &str) -> AppResult<Note> {
        let note = load_note(&self.exact_path(id)?)?;
        let path = note.path();
        fs::remove_file(&path).map_err(|source| CatalogError::Write {
            path: path.clone(),
            source,
        })?;

        info!("Deleted note {}", note.filename());
        Ok(note)
    }
}

/// How a date search query is interpreted.
///
/// The trimmed, lowercased query is tried against each layout in
/// `DATE_QUERY_LAYOUTS`; the first that parses selects the calendar day
/// `[midnight, midnight + 24h)`. A query no layout accepts is matched as a
/// substring of the `YYYY-MM-DD` creation date instead, so `"2024-12"`
/// finds every note from December 2024.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateQuery {
    Day(NaiveDate),
    Substring(String),
}

impl DateQuery {
    pub fn parse(query: &str) -> Self {
        let query = query.trim().to_lowercase();
        DATE_QUERY_LAYOUTS
            .iter()
            .find_map(|layout| parse_with_layout(&query, layout))
            .map(DateQuery::Day)
            .unwrap_or(DateQuery::Substring(query))
    }

    pub fn matches(&self, created: NaiveDateTime) -> bool {
        match self {
            DateQuery::Day(day) => {
                let start = day.and_time(NaiveTime::MIN);
                let end = start + Duration::days(1);
                start <= created && created < end
            }
            DateQuery::Substring(query) => created
                .format(DATE_FORMAT_ISO)
                .to_string()
                .contains(query.as_str()),
        }
    }
}

fn parse_with_layout(query: &str, layout: &str) -> Option<NaiveDate> {
    if layout.contains("%H") {
        NaiveDateTime::parse_from_str(query, layout)
            .ok()
            .map(|dt| dt.date())
    } else {
        NaiveDate::parse_from_str(query, layout).ok()
    }
}

/// Ensures a notes directory exists, creating it if necessary.
///
/// Newly created directories get owner-only permissions on Unix.
///
/// # Errors
///
/// Returns:
/// - `AppError::Config` if the path is not absolute
/// - `CatalogError::Write` if the directory cannot be created
pub fn ensure_notes_directory_exists(dir: &Path) -> AppResult<()> {
    if !dir.is_absolute() {
        return Err(AppError::Config(format!(
            "Notes directory path must be absolute: {}",
            dir.display()
        )));
    }

    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| CatalogError::Write {
            path: dir.to_path_buf(),
            source,
        })?;

        #[cfg(unix)]
        {
            fs::set_permissions(dir, Permissions::from_mode(0o700)).map_err(|source| {
                CatalogError::Write {
                    path: dir.to_path_buf(),
                    source,
                }
            })?;
        }
        debug!("Created notes directory {}", dir.display());
    }
    Ok(())
}

/// Loads and decodes a single note file.
///
/// The id is the file stem and the format follows the extension. The creation
/// instant comes from the id's timestamp prefix, falling back to now for
/// files named some other way. `modified` is always the load time.
pub fn load_note(path: &Path) -> Result<Note, CatalogError> {
    let decode_error = |source| CatalogError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let format = NoteFormat::from_path(path).ok_or_else(|| {
        decode_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "unrecognized note extension",
        ))
    })?;
    let text = fs::read_to_string(path).map_err(decode_error)?;

    let id = file_stem(path).to_string();
    let now = current_instant();
    let created = created_from_id(&id).unwrap_or(now);
    let decoded = decode(format, &text);

    Ok(Note {
        id,
        title: decoded.title,
        content: decoded.content,
        tags: decoded.tags,
        created,
        modified: now,
        format,
        dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
    })
}

/// Writes a note through a temporary file renamed over the target.
///
/// A rewritten file keeps its permissions; a new one gets `NOTE_FILE_MODE`
/// on Unix.
fn write_note(note: &Note) -> Result<(), CatalogError> {
    let path = note.path();
    let write_error = |source| CatalogError::Write {
        path: path.clone(),
        source,
    };

    let mut temp = NamedTempFile::new_in(&note.dir).map_err(write_error)?;
    match fs::metadata(&path) {
        Ok(existing) => temp
            .as_file()
            .set_permissions(existing.permissions())
            .map_err(write_error)?,
        #[cfg(unix)]
        Err(_) => temp
            .as_file()
            .set_permissions(Permissions::from_mode(NOTE_FILE_MODE))
            .map_err(write_error)?,
        #[cfg(not(unix))]
        Err(_) => {}
    }
    temp.write_all(encode(note).as_bytes()).map_err(write_error)?;
    temp.as_file().sync_all().map_err(write_error)?;
    temp.persist(&path).map_err(|err| write_error(err.error))?;

    debug!("Wrote {}", path.display());
    Ok(())
}

/// Top-level files in `dir` with a recognized note extension, sorted by name.
fn note_files(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let access_error = |source| CatalogError::DirectoryAccess {
        path: dir.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(dir).map_err(access_error)?;
    if !metadata.is_dir() {
        return Err(access_error(io::Error::other("not a directory")));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("directory traversal failed"));
                return Err(access_error(source));
            }
            Err(err) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), err);
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }
        if NoteFormat::from_path(entry.path()).is_some() {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

fn stem_taken(dir: &Path, id: &str) -> bool {
    NoteFormat::ALL
        .iter()
        .any(|format| dir.join(format!("{}.{}", id, format.extension())).exists())
}

fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|stem| stem.to_str()).unwrap_or_default()
}

/// Local wall-clock time truncated to whole seconds.
fn current_instant() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
