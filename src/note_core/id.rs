//! Identifier and filename scheme.
//!
//! A note id is `{creation instant as YYYYMMDD_HHMMSS}_{sanitized title}`.
//! The fixed-width timestamp prefix makes a filename-sorted directory listing
//! also a creation-time-sorted one, at second granularity.
//!
//! Two notes with the same title created in the same second map to the same
//! id. The scheme itself does not guard against that; `note_io` adds a
//! numeric suffix when it detects an existing file with the same stem.

use crate::constants::{ID_TIMESTAMP_FORMAT, ID_TIMESTAMP_WIDTH, MAX_TITLE_SEGMENT_LEN};
use chrono::NaiveDateTime;

/// Makes a title safe for use as a filename segment.
///
/// Every character outside `[A-Za-z0-9_]` (spaces, path separators, `:`,
/// `*`, `?`, quotes, angle brackets, pipes, punctuation and non-ASCII
/// letters) becomes `_`. The result is lowercased and cut to at most 50
/// characters; the cut may land mid-word.
///
/// # Examples
///
/// ```
/// use quire::note_core::id::sanitize_title;
///
/// assert_eq!(sanitize_title("Meeting Notes!"), "meeting_notes_");
/// assert_eq!(sanitize_title("a/b\\c:d"), "a_b_c_d");
/// ```
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .take(MAX_TITLE_SEGMENT_LEN)
        .collect()
}

/// Derives the id for a note with `title` created at `created`.
///
/// # Examples
///
/// ```
/// use quire::note_core::id::note_id;
/// use chrono::NaiveDate;
///
/// let created = NaiveDate::from_ymd_opt(2024, 12, 1)
///     .unwrap()
///     .and_hms_opt(14, 30, 22)
///     .unwrap();
/// assert_eq!(note_id("Meeting Notes!", created), "20241201_143022_meeting_notes_");
/// ```
pub fn note_id(title: &str, created: NaiveDateTime) -> String {
    format!(
        "{}_{}",
        created.format(ID_TIMESTAMP_FORMAT),
        sanitize_title(title)
    )
}

/// Recovers the creation instant from the leading timestamp segment of an id.
///
/// Returns `None` for ids that do not start with a valid `YYYYMMDD_HHMMSS`
/// segment, such as hand-named files.
pub fn created_from_id(id: &str) -> Option<NaiveDateTime> {
    let prefix = id.get(..ID_TIMESTAMP_WIDTH)?;
    NaiveDateTime::parse_from_str(prefix, ID_TIMESTAMP_FORMAT).ok()
}

/// Appends a disambiguating `_{n}` suffix to a colliding id.
pub fn with_suffix(id: &str, n: u32) -> String {
    format!("{}_{}", id, n)
}
