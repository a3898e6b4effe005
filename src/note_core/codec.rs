//! Text dialects for note files.
//!
//! Each `NoteFormat` maps to a `Dialect` that can render a `Note` as file text
//! and recover title, content and tags from arbitrary file text. Timestamps are
//! written for the reader's benefit but never read back: the creation instant
//! comes from the id, and the modification instant is not persisted.
//!
//! Both decoders do a single forward scan. Metadata is only recognized before
//! the first content line; everything from that line on is content verbatim.

use super::{Note, NoteFormat, Tags};
use crate::constants::{OUTLINE_BODY_HEADING, OUTLINE_DATE_FORMAT, PLAIN_TIMESTAMP_FORMAT};

const PLAIN_TITLE: &str = "Title:";
const PLAIN_CREATED: &str = "Created:";
const PLAIN_MODIFIED: &str = "Modified:";
const PLAIN_TAGS: &str = "Tags:";

const OUTLINE_TITLE: &str = "#+TITLE:";
const OUTLINE_DATE: &str = "#+DATE:";
const OUTLINE_MODIFIED: &str = "#+MODIFIED:";
const OUTLINE_TAGS: &str = "#+TAGS:";
const OUTLINE_FILETAGS: &str = "#+FILETAGS:";
const OUTLINE_DIRECTIVE_PREFIX: &str = "#+";

/// The fields a dialect round-trips.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded {
    pub title: String,
    pub content: String,
    pub tags: Tags,
}

/// Common interface of the on-disk dialects.
pub trait Dialect {
    /// Renders the note as file text.
    fn encode(&self, note: &Note) -> String;

    /// Parses file text back into title, content and tags.
    fn decode(&self, text: &str) -> Decoded;
}

/// `Title:`/`Created:`/`Modified:`/`Tags:` labelled text.
pub struct PlainDialect;

/// Org-style `#+DIRECTIVE:` outline markup.
pub struct OutlineDialect;

impl NoteFormat {
    /// The dialect used to read and write files of this format.
    pub fn dialect(self) -> &'static dyn Dialect {
        match self {
            NoteFormat::Plain | NoteFormat::Markdown => &PlainDialect,
            NoteFormat::Outline => &OutlineDialect,
        }
    }
}

/// Renders `note` in the dialect of its format.
pub fn encode(note: &Note) -> String {
    note.format.dialect().encode(note)
}

/// Parses `text` as a file of the given format.
pub fn decode(format: NoteFormat, text: &str) -> Decoded {
    format.dialect().decode(text)
}

/// Expands literal two-character `\n` sequences into line breaks.
pub fn expand_newline_escapes(content: &str) -> String {
    content.replace("\\n", "\n")
}

fn push_body(out: &mut String, body: &str) {
    out.push_str(body);
    if !body.is_empty() && !body.ends_with('\n') {
        out.push('\n');
    }
}

impl Dialect for PlainDialect {
    fn encode(&self, note: &Note) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} {}\n", PLAIN_TITLE, note.title));
        out.push_str(&format!(
            "{} {}\n",
            PLAIN_CREATED,
            note.created.format(PLAIN_TIMESTAMP_FORMAT)
        ));
        out.push_str(&format!(
            "{} {}\n",
            PLAIN_MODIFIED,
            note.modified.format(PLAIN_TIMESTAMP_FORMAT)
        ));
        if !note.tags.is_empty() {
            out.push_str(&format!("{} {}\n", PLAIN_TAGS, note.tags.join(", ")));
        }
        out.push('\n');
        push_body(&mut out, &expand_newline_escapes(&note.content));
        out
    }

    fn decode(&self, text: &str) -> Decoded {
        let mut decoded = Decoded::default();
        let mut offset = 0;

        for line in text.split_inclusive('\n') {
            let bare = line.trim_end_matches(['\n', '\r']);

            if let Some(value) = bare.strip_prefix(PLAIN_TITLE) {
                decoded.title = value.trim().to_string();
            } else if let Some(value) = bare.strip_prefix(PLAIN_TAGS) {
                // Empty segments stay as empty-string tags
                decoded.tags = value
                    .trim()
                    .split(',')
                    .map(|tag| tag.trim().to_string())
                    .collect();
            } else if bare.starts_with(PLAIN_CREATED) || bare.starts_with(PLAIN_MODIFIED) {
                // Timestamps come from the id, not the file body
            } else if !bare.is_empty() {
                decoded.content = text[offset..].trim().to_string();
                break;
            }
            offset += line.len();
        }

        decoded
    }
}

/// Returns the value of `directive` if `line` starts with it, ignoring case.
fn directive_value<'a>(line: &'a str, directive: &str) -> Option<&'a str> {
    let head = line.get(..directive.len())?;
    if head.eq_ignore_ascii_case(directive) {
        Some(line[directive.len()..].trim())
    } else {
        None
    }
}

/// Adds tags from `:a:b:` blocks or `a b` lists.
fn add_outline_tags(tags: &mut Tags, raw: &str) {
    for tag in raw.replace(':', " ").split_whitespace() {
        tags.insert(tag);
    }
}

/// Tags from a trailing `:a:b:` block on a heading line.
fn heading_tag_block(line: &str) -> Option<&str> {
    let (_, block) = line.rsplit_once(' ')?;
    let block = block.trim();
    (!block.is_empty() && block.starts_with(':') && block.ends_with(':')).then_some(block)
}

/// Removes the body heading the encoder writes above the content.
fn strip_body_heading(content: &str) -> &str {
    let (first, rest) = content.split_once('\n').unwrap_or((content, ""));
    if first.trim_end() == OUTLINE_BODY_HEADING {
        rest
    } else {
        content
    }
}

impl Dialect for OutlineDialect {
    fn encode(&self, note: &Note) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} {}\n", OUTLINE_TITLE, note.title));
        out.push_str(&format!(
            "{} {}\n",
            OUTLINE_DATE,
            note.created.format(OUTLINE_DATE_FORMAT)
        ));
        out.push_str(&format!(
            "{} {}\n",
            OUTLINE_MODIFIED,
            note.modified.format(OUTLINE_DATE_FORMAT)
        ));
        if !note.tags.is_empty() {
            out.push_str(&format!("{} {}\n", OUTLINE_TAGS, note.tags.join(" ")));
        }
        out.push('\n');
        out.push_str(OUTLINE_BODY_HEADING);
        out.push('\n');
        push_body(&mut out, &expand_newline_escapes(&note.content));
        out
    }

    fn decode(&self, text: &str) -> Decoded {
        let mut decoded = Decoded::default();
        let mut content_start: Option<usize> = None;
        let mut offset = 0;

        for line in text.split_inclusive('\n') {
            let trimmed = line.trim();
            let line_offset = offset;
            offset += line.len();

            if content_start.is_none() {
                if let Some(value) = directive_value(trimmed, OUTLINE_TITLE) {
                    if !value.is_empty() {
                        decoded.title = value.to_string();
                    }
                    continue;
                }
                if let Some(value) = directive_value(trimmed, OUTLINE_FILETAGS)
                    .or_else(|| directive_value(trimmed, OUTLINE_TAGS))
                {
                    add_outline_tags(&mut decoded.tags, value);
                    continue;
                }
                if trimmed.is_empty() || trimmed.starts_with(OUTLINE_DIRECTIVE_PREFIX) {
                    continue;
                }
                content_start = Some(line_offset);
            }

            // Heading tags count wherever the heading appears
            if trimmed.starts_with('*') {
                if let Some(block) = heading_tag_block(trimmed) {
                    add_outline_tags(&mut decoded.tags, block);
                }
            }
        }

        if let Some(start) = content_start {
            let body = strip_body_heading(text[start..].trim());
            decoded.content = body.trim().to_string();
        }

        decoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::path::PathBuf;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 12, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn note(format: NoteFormat, title: &str, tags: &[&str], content: &str) -> Note {
        Note {
            id: "20241201_143022_x".to_string(),
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.iter().copied().collect(),
            created: at(14, 30, 22),
            modified: at(16, 0, 5),
            format,
            dir: PathBuf::from("/notes"),
        }
    }

    fn metadata_lines(text: &str) -> Vec<&str> {
        text.lines().take_while(|line| !line.is_empty()).collect()
    }

    #[test]
    fn test_plain_encode_layout() {
        let text = encode(&note(
            NoteFormat::Plain,
            "Groceries",
            &["home", "errands"],
            "milk\\neggs",
        ));
        assert_eq!(
            text,
            "Title: Groceries\n\
             Created: 2024-12-01 14:30:22\n\
             Modified: 2024-12-01 16:00:05\n\
             Tags: errands, home\n\
             \n\
             milk\neggs\n"
        );
    }

    #[test]
    fn test_plain_encode_omits_empty_tags() {
        let text = encode(&note(NoteFormat::Plain, "Bare", &[], "body"));
        assert!(!text.contains("Tags:"));
    }

    #[test]
    fn test_plain_round_trip() {
        let original = note(
            NoteFormat::Plain,
            "Weekly sync: Q3",
            &["work", "Planning"],
            "First line\n\nSecond paragraph with Title: inside",
        );
        let decoded = decode(NoteFormat::Plain, &encode(&original));
        assert_eq!(decoded.title, original.title);
        assert_eq!(decoded.tags, original.tags);
        assert_eq!(decoded.content, original.content);
    }

    #[test]
    fn test_decoded_content_is_trimmed_at_both_ends() {
        let content = "\n    indented first line\nlast line\n\n\n";
        for format in [NoteFormat::Plain, NoteFormat::Outline] {
            let decoded = decode(format, &encode(&note(format, "Padded", &[], content)));
            assert_eq!(decoded.content, "indented first line\nlast line", "{:?}", format);
        }
    }

    #[test]
    fn test_markdown_uses_plain_labels() {
        let original = note(NoteFormat::Markdown, "Readme", &["docs"], "# Heading\n\n- item");
        let text = encode(&original);
        assert!(text.starts_with("Title: Readme\n"));
        let decoded = decode(NoteFormat::Markdown, &text);
        assert_eq!(decoded.content, "# Heading\n\n- item");
        assert!(decoded.tags.contains("docs"));
    }

    #[test]
    fn test_plain_metadata_is_stable_across_reencode() {
        let original = note(NoteFormat::Plain, "Stable", &["b", "a"], "text");
        let first = encode(&original);
        let decoded = decode(NoteFormat::Plain, &first);
        let reloaded = Note {
            title: decoded.title,
            content: decoded.content,
            tags: decoded.tags,
            ..original
        };
        let second = encode(&reloaded);
        assert_eq!(metadata_lines(&first), metadata_lines(&second));
        assert_eq!(first, second);
    }

    #[test]
    fn test_plain_labels_after_content_are_content() {
        let text = "Title: Real\n\nbody starts here\nTags: not-a-tag\nTitle: Fake\n";
        let decoded = decode(NoteFormat::Plain, text);
        assert_eq!(decoded.title, "Real");
        assert!(decoded.tags.is_empty());
        assert_eq!(decoded.content, "body starts here\nTags: not-a-tag\nTitle: Fake");
    }

    #[test]
    fn test_plain_labels_are_case_sensitive() {
        let decoded = decode(NoteFormat::Plain, "title: lower\nTitle: Upper\n");
        assert_eq!(decoded.title, "");
        assert_eq!(decoded.content, "title: lower\nTitle: Upper");
    }

    #[test]
    fn test_plain_empty_tag_segments_are_preserved() {
        // "tag1,,tag2" yields an empty-string tag
        let decoded = decode(NoteFormat::Plain, "Title: t\nTags: tag1,,tag2\n\nbody");
        let tags: Vec<&str> = decoded.tags.iter().collect();
        assert_eq!(tags, vec!["", "tag1", "tag2"]);
    }

    #[test]
    fn test_plain_content_start_uses_line_position() {
        // The first content line also appears inside the title
        let text = "Title: notes about body\n\nbody\n";
        let decoded = decode(NoteFormat::Plain, text);
        assert_eq!(decoded.content, "body");
    }

    #[test]
    fn test_plain_handles_crlf() {
        let decoded = decode(NoteFormat::Plain, "Title: Win\r\nTags: a\r\n\r\nline one\r\n");
        assert_eq!(decoded.title, "Win");
        assert!(decoded.tags.contains("a"));
        assert_eq!(decoded.content, "line one");
    }

    #[test]
    fn test_outline_encode_layout() {
        let text = encode(&note(NoteFormat::Outline, "Plan", &["work", "urgent"], "Do it"));
        assert_eq!(
            text,
            "#+TITLE: Plan\n\
             #+DATE: 2024-12-01\n\
             #+MODIFIED: 2024-12-01\n\
             #+TAGS: urgent work\n\
             \n\
             * CONTENT\n\
             Do it\n"
        );
    }

    #[test]
    fn test_outline_round_trip() {
        let original = note(
            NoteFormat::Outline,
            "Design review",
            &["work", "review"],
            "** Agenda\n- item one\n- item two",
        );
        let decoded = decode(NoteFormat::Outline, &encode(&original));
        assert_eq!(decoded.title, original.title);
        assert_eq!(decoded.tags, original.tags);
        assert_eq!(decoded.content, original.content);
    }

    #[test]
    fn test_outline_tag_sources_are_unioned() {
        let text = "#+TITLE: Review\n\
                    #+TAGS: work urgent\n\
                    \n\
                    * Review :work:planning:\n\
                    body\n";
        let decoded = decode(NoteFormat::Outline, text);
        let expected: Tags = ["work", "urgent", "planning"].into_iter().collect();
        assert_eq!(decoded.tags, expected);
    }

    #[test]
    fn test_outline_filetags_colon_block() {
        let text = "#+filetags: :alpha:beta:\n#+Tags: gamma\n\ntext";
        let decoded = decode(NoteFormat::Outline, text);
        let expected: Tags = ["alpha", "beta", "gamma"].into_iter().collect();
        assert_eq!(decoded.tags, expected);
    }

    #[test]
    fn test_outline_last_non_empty_title_wins() {
        let text = "#+TITLE: First\n#+title: Second\n#+TITLE:\n\nbody";
        let decoded = decode(NoteFormat::Outline, text);
        assert_eq!(decoded.title, "Second");
    }

    #[test]
    fn test_outline_directives_after_content_are_content() {
        let text = "#+TITLE: Real\n\nfirst line\n#+TITLE: Fake\n#+TAGS: hidden\n";
        let decoded = decode(NoteFormat::Outline, text);
        assert_eq!(decoded.title, "Real");
        assert!(!decoded.tags.contains("hidden"));
        assert_eq!(decoded.content, "first line\n#+TITLE: Fake\n#+TAGS: hidden");
    }

    #[test]
    fn test_outline_other_directives_are_skipped() {
        let text = "#+TITLE: T\n#+AUTHOR: someone\n#+STARTUP: showall\n\n* Heading\ntext";
        let decoded = decode(NoteFormat::Outline, text);
        assert_eq!(decoded.content, "* Heading\ntext");
    }

    #[test]
    fn test_outline_heading_without_tag_block() {
        let decoded = decode(NoteFormat::Outline, "* Just a heading\n* Colon: inside text\n");
        assert!(decoded.tags.is_empty());
    }

    #[test]
    fn test_outline_empty_body() {
        let decoded = decode(
            NoteFormat::Outline,
            &encode(&note(NoteFormat::Outline, "Empty", &[], "")),
        );
        assert_eq!(decoded.title, "Empty");
        assert_eq!(decoded.content, "");
    }

    #[test]
    fn test_decode_of_empty_text() {
        for format in NoteFormat::ALL {
            assert_eq!(decode(format, ""), Decoded::default());
        }
    }
}
