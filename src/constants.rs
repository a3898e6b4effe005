//! Constants used throughout the application.
//!
//! This module contains all constants used in quire, organized into logical
//! groups. Having constants centralized makes them easier to find, modify,
//! and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "quire";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A flat-file note manager with a scriptable CLI and an interactive browser";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Log level used when `--verbose` is passed.
pub const VERBOSE_LOG_LEVEL: &str = "debug";

// Configuration Keys & Environment Variables
/// Environment variable overriding the configured note directories (OS path list).
pub const ENV_VAR_QUIRE_DIR: &str = "QUIRE_DIR";
/// Environment variable pointing at an alternative config file.
pub const ENV_VAR_QUIRE_CONFIG: &str = "QUIRE_CONFIG";
/// Environment variable for specifying the preferred quire editor.
pub const ENV_VAR_QUIRE_EDITOR: &str = "QUIRE_EDITOR";
/// Standard environment variable for the visual editor.
pub const ENV_VAR_VISUAL: &str = "VISUAL";
/// Standard environment variable for specifying the default editor.
pub const ENV_VAR_EDITOR: &str = "EDITOR";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Standard environment variable disabling colored output.
pub const ENV_VAR_NO_COLOR: &str = "NO_COLOR";
/// Config file name inside the home directory.
pub const CONFIG_FILE_NAME: &str = ".quirerc.yaml";
/// Default sub-directory name for notes within the user's home directory.
pub const DEFAULT_NOTES_SUBDIR: &str = "notes";

// Validation
/// Characters forbidden in editor commands for security reasons.
pub const EDITOR_FORBIDDEN_CHARS: &[char] =
    &['|', '&', ';', '$', '(', ')', '`', '\\', '<', '>', '\'', '"'];
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// Identifier Scheme
/// Layout of the leading timestamp segment of every note id.
pub const ID_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
/// Width in characters of the id timestamp segment.
pub const ID_TIMESTAMP_WIDTH: usize = 15;
/// Maximum length of the sanitized title segment.
pub const MAX_TITLE_SEGMENT_LEN: usize = 50;

// Dialect Formatting
/// Timestamp layout for `Created:`/`Modified:` lines of the plain dialect.
pub const PLAIN_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Date layout for `#+DATE:`/`#+MODIFIED:` directives of the outline dialect.
pub const OUTLINE_DATE_FORMAT: &str = "%Y-%m-%d";
/// Heading the outline encoder places above the note body.
pub const OUTLINE_BODY_HEADING: &str = "* CONTENT";
/// Unix mode given to newly written note files.
pub const NOTE_FILE_MODE: u32 = 0o644;

// Date Search
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Layouts accepted by date search, tried in order.
pub const DATE_QUERY_LAYOUTS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

// Presentation
/// Date/time layout used in listings.
pub const LIST_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
/// Number of tags shown per note in listings.
pub const LIST_MAX_TAGS: usize = 6;
/// Number of content characters shown in listing previews.
pub const LIST_CONTENT_PREVIEW_CHARS: usize = 100;
/// Number of notes per page in the interactive browser.
pub const BROWSER_PAGE_SIZE: usize = 29;

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "quire";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
