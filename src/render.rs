//! Text rendering of notes for the CLI and the interactive browser.
//!
//! Colors come from the configured [`Theme`] and are applied with yansi.
//! With color disabled every function returns plain text, which is what the
//! tests assert against.

use crate::config::{parse_hex_color, Theme};
use crate::constants::{
    ENV_VAR_NO_COLOR, LIST_CONTENT_PREVIEW_CHARS, LIST_MAX_TAGS, LIST_TIMESTAMP_FORMAT,
    PLAIN_TIMESTAMP_FORMAT,
};
use crate::note_core::{Note, Tags};
use std::env;
use std::io::IsTerminal;
use yansi::Paint;

type Rgb = (u8, u8, u8);

/// Optional sections of a listing entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    pub show_tags: bool,
    pub show_content: bool,
}

/// Theme colors resolved to RGB.
#[derive(Debug, Clone, Copy)]
struct Palette {
    primary: Rgb,
    secondary: Rgb,
    success: Rgb,
    warning: Rgb,
    error: Rgb,
    info: Rgb,
    muted: Rgb,
}

impl Palette {
    fn from_theme(theme: &Theme) -> Self {
        let defaults = Theme::default();
        let pick = |configured: &str, fallback: &str| {
            parse_hex_color(configured)
                .or_else(|| parse_hex_color(fallback))
                .unwrap_or((255, 255, 255))
        };
        Palette {
            primary: pick(&theme.primary, &defaults.primary),
            secondary: pick(&theme.secondary, &defaults.secondary),
            success: pick(&theme.success, &defaults.success),
            warning: pick(&theme.warning, &defaults.warning),
            error: pick(&theme.error, &defaults.error),
            info: pick(&theme.info, &defaults.info),
            muted: pick(&theme.muted, &defaults.muted),
        }
    }
}

/// Formats notes and status messages, optionally in color.
#[derive(Debug, Clone)]
pub struct Renderer {
    use_color: bool,
    palette: Palette,
}

impl Renderer {
    pub fn new(theme: &Theme, use_color: bool) -> Self {
        Renderer {
            use_color,
            palette: Palette::from_theme(theme),
        }
    }

    /// Color is on unless NO_COLOR is set or stdout is not a terminal.
    pub fn from_env(theme: &Theme) -> Self {
        let use_color = env::var_os(ENV_VAR_NO_COLOR).is_none() && std::io::stdout().is_terminal();
        Self::new(theme, use_color)
    }

    fn paint(&self, text: &str, (r, g, b): Rgb, bold: bool) -> String {
        if !self.use_color {
            return text.to_string();
        }
        if bold {
            Paint::rgb(text, r, g, b).bold().to_string()
        } else {
            Paint::rgb(text, r, g, b).to_string()
        }
    }

    pub fn header(&self, text: &str) -> String {
        self.paint(text, self.palette.primary, true)
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(text, self.palette.success, false)
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(text, self.palette.warning, false)
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, self.palette.error, true)
    }

    pub fn info(&self, text: &str) -> String {
        self.paint(text, self.palette.info, false)
    }

    pub fn muted(&self, text: &str) -> String {
        self.paint(text, self.palette.muted, false)
    }

    /// One listing entry: a header line plus optional tag, preview and id lines.
    ///
    /// `index` is displayed as-is (callers pass 1-based positions).
    pub fn note_entry(&self, index: usize, note: &Note, options: ListOptions) -> String {
        let mut out = format!(
            "{:>3}. {} {} {}\n",
            index,
            self.info(&note.created.format(LIST_TIMESTAMP_FORMAT).to_string()),
            self.paint(&format!("[{}]", note.format.extension()), self.palette.secondary, false),
            self.paint(&note.title, self.palette.primary, true),
        );

        if options.show_tags && !note.tags.is_empty() {
            out.push_str(&format!(
                "     Tags: {}\n",
                self.paint(&tag_summary(&note.tags, LIST_MAX_TAGS), self.palette.warning, false)
            ));
        }
        if options.show_content && !note.content.is_empty() {
            out.push_str(&format!(
                "     {}\n",
                preview(&note.content, LIST_CONTENT_PREVIEW_CHARS)
            ));
        }
        out.push_str(&format!("     ID: {}\n", self.muted(&note.id)));
        out
    }

    /// A numbered listing starting at `first_index`, or a notice when empty.
    pub fn listing(&self, notes: &[Note], first_index: usize, options: ListOptions) -> String {
        if notes.is_empty() {
            return format!("{}\n", self.muted("No notes found."));
        }
        notes
            .iter()
            .enumerate()
            .map(|(offset, note)| self.note_entry(first_index + offset, note, options))
            .collect()
    }

    /// Full metadata block followed by the note body.
    pub fn note_detail(&self, note: &Note) -> String {
        let label = |name: &str| self.paint(name, self.palette.secondary, true);
        let mut out = format!("{}\n", self.header(&note.title));
        out.push_str(&format!("{} {}\n", label("ID:"), note.id));
        out.push_str(&format!("{} {}\n", label("Format:"), note.format));
        out.push_str(&format!(
            "{} {}\n",
            label("Created:"),
            note.created.format(PLAIN_TIMESTAMP_FORMAT)
        ));
        out.push_str(&format!("{} {}\n", label("Path:"), note.path().display()));
        if !note.tags.is_empty() {
            out.push_str(&format!("{} {}\n", label("Tags:"), note.tags.join(", ")));
        }
        out.push('\n');
        if !note.content.is_empty() {
            out.push_str(&note.content);
            out.push('\n');
        }
        out
    }
}

/// First `max` characters of `content` on one line, with `...` when cut.
pub fn preview(content: &str, max: usize) -> String {
    let flat: String = content
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.chars().count() > max {
        let cut: String = flat.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}

/// The first `max` tags joined with `, `, with `...` when there are more.
pub fn tag_summary(tags: &Tags, max: usize) -> String {
    let mut summary = tags.iter().take(max).collect::<Vec<_>>().join(", ");
    if tags.len() > max {
        summary.push_str(", ...");
    }
    summary
}
