//! Configuration management for quire.
//!
//! Settings come from a YAML file plus a few environment variables. The file
//! holds the ordered list of note directories and the color theme; the
//! environment selects the editor and can override the directories for a
//! single invocation.
//!
//! # Environment Variables
//!
//! - `QUIRE_CONFIG`: Path of the config file (defaults to ~/.quirerc.yaml)
//! - `QUIRE_DIR`: OS path list replacing the configured directories (not persisted)
//! - `QUIRE_EDITOR`: Editor used to open notes
//! - `VISUAL`, `EDITOR`: Fallbacks if QUIRE_EDITOR is not set; with none of
//!   the three set, the platform's default opener is used
//! - `HOME`: Used for the default config path and `~` expansion
//!
//! When the config file does not exist yet and stdin is a terminal,
//! [`Config::load_or_setup`] asks for the note directories before writing it.

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_NOTES_SUBDIR, EDITOR_FORBIDDEN_CHARS, ENV_VAR_EDITOR, ENV_VAR_HOME,
    ENV_VAR_QUIRE_CONFIG, ENV_VAR_QUIRE_DIR, ENV_VAR_QUIRE_EDITOR, ENV_VAR_VISUAL,
    REDACTED_PLACEHOLDER,
};
use crate::editor::SystemEditor;
use crate::errors::{AppError, AppResult};
use crate::note_io::ensure_notes_directory_exists;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Hex colors used for terminal output. Defaults follow the Nord palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub primary: String,
    pub secondary: String,
    pub success: String,
    pub warning: String,
    pub error: String,
    pub info: String,
    pub muted: String,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            primary: "#88C0D0".to_string(),
            secondary: "#81A1C1".to_string(),
            success: "#A3BE8C".to_string(),
            warning: "#EBCB8B".to_string(),
            error: "#BF616A".to_string(),
            info: "#5E81AC".to_string(),
            muted: "#4C566A".to_string(),
        }
    }
}

/// Parses `#RRGGBB` (leading `#` optional) into its components.
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// On-disk shape of the config file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    notes_dirs: Vec<String>,
    #[serde(default)]
    theme: Theme,
}

/// Configuration for quire.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use quire::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     notes_dirs: vec![PathBuf::from("/path/to/notes")],
///     editor: Some("nano".to_string()),
///     ..Config::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
///
/// Loading configuration from the config file and environment:
/// ```no_run
/// use quire::Config;
///
/// let config = Config::load().expect("Failed to load configuration");
/// println!("{} note directories", config.notes_dirs.len());
/// ```
#[derive(Clone, PartialEq)]
pub struct Config {
    /// Note directories in scan order; the first is primary.
    pub notes_dirs: Vec<PathBuf>,

    /// Validated editor command from QUIRE_EDITOR, VISUAL or EDITOR.
    ///
    /// `None` means the platform default opener is used.
    pub editor: Option<String>,

    pub theme: Theme,

    /// Where the config file lives; `save` writes here.
    pub path: PathBuf,

    /// Set when `notes_dirs` came from QUIRE_DIR rather than the file.
    pub dirs_from_env: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("notes_dirs", &REDACTED_PLACEHOLDER)
            .field("editor", &REDACTED_PLACEHOLDER)
            .field("theme", &self.theme)
            .field("path", &REDACTED_PLACEHOLDER)
            .field("dirs_from_env", &self.dirs_from_env)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            notes_dirs: Vec::new(),
            editor: None,
            theme: Theme::default(),
            path: PathBuf::new(),
            dirs_from_env: false,
        }
    }
}

impl Config {
    /// Validates an editor command string for security.
    ///
    /// The command must be non-empty and contain neither spaces nor shell
    /// metacharacters; editors needing arguments should be wrapped in a script.
    pub fn validate_editor_command(editor_cmd: &str) -> AppResult<&str> {
        if editor_cmd.is_empty() {
            return Err(AppError::Config(
                "Editor command cannot be empty".to_string(),
            ));
        }

        if editor_cmd.contains(' ') {
            return Err(AppError::Config(
                "Editor command cannot contain spaces. Use a wrapper script or shell alias for editors requiring arguments".to_string(),
            ));
        }

        if let Some(ch) = editor_cmd.chars().find(|c| EDITOR_FORBIDDEN_CHARS.contains(c)) {
            return Err(AppError::Config(format!(
                "Editor command cannot contain shell metacharacters: '{}'. Use a wrapper script or shell alias instead",
                ch
            )));
        }

        Ok(editor_cmd)
    }

    /// Resolves the config file location: `$QUIRE_CONFIG`, else `~/.quirerc.yaml`.
    pub fn default_path() -> AppResult<PathBuf> {
        if let Ok(custom) = env::var(ENV_VAR_QUIRE_CONFIG) {
            if !custom.trim().is_empty() {
                return expand_path(&custom);
            }
        }

        let home = env::var(ENV_VAR_HOME).map_err(|_| {
            AppError::Config(format!(
                "Cannot locate config file: neither {} nor {} is set",
                ENV_VAR_QUIRE_CONFIG, ENV_VAR_HOME
            ))
        })?;
        Ok(PathBuf::from(home).join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from the default config path.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Loads configuration from `path`, writing defaults there if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The file cannot be read or is not valid YAML
    /// - A directory path cannot be expanded or is not absolute
    /// - The editor command fails validation
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let first_run = !path.exists();
        let env_dirs = env::var_os(ENV_VAR_QUIRE_DIR).filter(|list| !list.is_empty());
        let file = if first_run {
            ConfigFile {
                notes_dirs: vec![default_notes_dir()],
                theme: Theme::default(),
            }
        } else {
            let text = fs::read_to_string(path).map_err(|e| {
                AppError::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            serde_yaml::from_str(&text).map_err(|e| {
                AppError::Config(format!("Invalid config file {}: {}", path.display(), e))
            })?
        };

        let (notes_dirs, dirs_from_env) = match env_dirs {
            Some(list) => {
                let dirs = env::split_paths(&list)
                    .map(|dir| expand_path(&dir.to_string_lossy()))
                    .collect::<AppResult<Vec<_>>>()?;
                debug!("Using {} notes directories from {}", dirs.len(), ENV_VAR_QUIRE_DIR);
                (dirs, true)
            }
            None => {
                let dirs = file
                    .notes_dirs
                    .iter()
                    .map(|dir| expand_path(dir))
                    .collect::<AppResult<Vec<_>>>()?;
                (dirs, false)
            }
        };

        let config = Config {
            notes_dirs,
            editor: editor_preference()?,
            theme: file.theme.clone(),
            path: path.to_path_buf(),
            dirs_from_env,
        };
        config.validate()?;

        if first_run {
            write_config_file(path, &file)?;
            if !config.dirs_from_env {
                for dir in &config.notes_dirs {
                    ensure_notes_directory_exists(dir)?;
                }
            }
            info!("Wrote default configuration to {}", path.display());
        }

        Ok(config)
    }

    /// Loads configuration like [`Config::load_from`], running the first-run
    /// setup prompt instead of writing defaults when stdin is a terminal.
    ///
    /// The prompt is skipped when `QUIRE_DIR` is set.
    pub fn load_or_setup(path: &Path) -> AppResult<Self> {
        let dirs_from_env = env::var_os(ENV_VAR_QUIRE_DIR).is_some_and(|list| !list.is_empty());
        if path.exists() || dirs_from_env || !io::stdin().is_terminal() {
            return Self::load_from(path);
        }

        let stdin = io::stdin();
        let stdout = io::stdout();
        let notes_dirs =
            prompt_notes_dirs(&mut stdin.lock(), &mut stdout.lock(), &default_notes_dir())?;
        write_config_file(
            path,
            &ConfigFile {
                notes_dirs,
                theme: Theme::default(),
            },
        )?;
        info!("Wrote configuration to {}", path.display());

        let config = Self::load_from(path)?;
        for dir in &config.notes_dirs {
            ensure_notes_directory_exists(dir)?;
        }
        Ok(config)
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if no directory is configured, a directory
    /// is empty or relative, a directory is listed twice, or the editor
    /// command is invalid.
    pub fn validate(&self) -> AppResult<()> {
        if self.notes_dirs.is_empty() {
            return Err(AppError::Config(
                "At least one notes directory must be configured".to_string(),
            ));
        }

        for (i, dir) in self.notes_dirs.iter().enumerate() {
            if dir.as_os_str().is_empty() {
                return Err(AppError::Config("Notes directory path is empty".to_string()));
            }
            if !dir.is_absolute() {
                return Err(AppError::Config(format!(
                    "Notes directory must be an absolute path: {}",
                    dir.display()
                )));
            }
            if self.notes_dirs[..i].contains(dir) {
                return Err(AppError::Config(format!(
                    "Notes directory listed twice: {}",
                    dir.display()
                )));
            }
        }

        if let Some(editor) = &self.editor {
            Self::validate_editor_command(editor)?;
        }

        Ok(())
    }

    /// The primary notes directory.
    pub fn primary_dir(&self) -> AppResult<&Path> {
        self.notes_dirs
            .first()
            .map(PathBuf::as_path)
            .ok_or_else(|| AppError::Config("No notes directory configured".to_string()))
    }

    /// The editor to open notes with: the configured command, or the platform opener.
    pub fn editor_launcher(&self) -> AppResult<SystemEditor> {
        match &self.editor {
            Some(command) => Ok(SystemEditor::new(command.as_str())),
            None => Ok(SystemEditor::platform_default()?),
        }
    }

    /// Writes directories and theme back to the config file.
    pub fn save(&self) -> AppResult<()> {
        let file = ConfigFile {
            notes_dirs: self
                .notes_dirs
                .iter()
                .map(|dir| dir.to_string_lossy().into_owned())
                .collect(),
            theme: self.theme.clone(),
        };
        write_config_file(&self.path, &file)
    }

    /// Appends a notes directory, creating it if needed, and saves.
    ///
    /// Returns the expanded path that was added.
    pub fn add_dir(&mut self, raw: &str) -> AppResult<PathBuf> {
        self.ensure_dirs_persistable()?;
        let dir = expand_path(raw)?;
        if !dir.is_absolute() {
            return Err(AppError::Config(format!(
                "Notes directory must be an absolute path: {}",
                dir.display()
            )));
        }
        if self.notes_dirs.contains(&dir) {
            return Err(AppError::Config(format!(
                "Notes directory already configured: {}",
                dir.display()
            )));
        }

        ensure_notes_directory_exists(&dir)?;
        self.notes_dirs.push(dir.clone());
        self.save()?;
        info!("Added notes directory {}", dir.display());
        Ok(dir)
    }

    /// Removes a notes directory from the list and saves. Files are left alone.
    ///
    /// Returns the expanded path that was removed.
    pub fn remove_dir(&mut self, raw: &str) -> AppResult<PathBuf> {
        self.ensure_dirs_persistable()?;
        let dir = expand_path(raw)?;
        let index = self
            .notes_dirs
            .iter()
            .position(|configured| configured == &dir)
            .ok_or_else(|| {
                AppError::Config(format!("Notes directory not configured: {}", dir.display()))
            })?;
        if self.notes_dirs.len() == 1 {
            return Err(AppError::Config(
                "Cannot remove the last notes directory".to_string(),
            ));
        }

        self.notes_dirs.remove(index);
        self.save()?;
        info!("Removed notes directory {}", dir.display());
        Ok(dir)
    }

    fn ensure_dirs_persistable(&self) -> AppResult<()> {
        if self.dirs_from_env {
            return Err(AppError::Config(format!(
                "Notes directories are set by {}; unset it to manage the config file",
                ENV_VAR_QUIRE_DIR
            )));
        }
        Ok(())
    }
}

fn default_notes_dir() -> String {
    format!("~/{}", DEFAULT_NOTES_SUBDIR)
}

/// First-run setup: asks for the primary notes directory, then for any
/// additional ones.
///
/// Answers are returned unexpanded, the way they are stored in the config
/// file. An empty answer or end of input selects `default_dir`.
pub fn prompt_notes_dirs<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    default_dir: &str,
) -> AppResult<Vec<String>> {
    writeln!(output, "Welcome to quire! No configuration file was found.")?;
    writeln!(output, "Choose where your notes should be stored.")?;

    let primary = loop {
        let label = format!("Primary notes directory [{}]", default_dir);
        let answer = prompt_line(input, output, &label)?;
        let dir = answer.as_deref().map(str::trim).unwrap_or_default();
        if dir.is_empty() {
            break default_dir.to_string();
        }
        match check_dir_answer(dir) {
            Ok(()) => break dir.to_string(),
            Err(e) => writeln!(output, "{}", e)?,
        }
    };
    let mut dirs = vec![primary];

    while prompt_yes_no(input, output, "Add another notes directory?", false)? {
        let Some(answer) = prompt_line(input, output, "Directory")? else {
            break;
        };
        let dir = answer.trim();
        if dir.is_empty() {
            continue;
        }
        if let Err(e) = check_dir_answer(dir) {
            writeln!(output, "{}", e)?;
            continue;
        }
        if dirs.iter().any(|existing| existing == dir) {
            writeln!(output, "{} is already in the list.", dir)?;
            continue;
        }
        dirs.push(dir.to_string());
    }

    writeln!(output, "Notes will be loaded from:")?;
    for (i, dir) in dirs.iter().enumerate() {
        writeln!(output, "  {}. {}", i + 1, dir)?;
    }
    Ok(dirs)
}

/// Asks a yes/no question; an empty answer or end of input gives `default`.
fn prompt_yes_no<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: bool,
) -> AppResult<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    loop {
        let Some(answer) = prompt_line(input, output, &format!("{} {}", question, hint))? else {
            return Ok(default);
        };
        match answer.trim().to_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(output, "Please answer yes or no.")?,
        }
    }
}

/// Prints `label` and reads one line; `None` at end of input.
fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> AppResult<Option<String>> {
    write!(output, "{}: ", label)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

fn check_dir_answer(raw: &str) -> AppResult<()> {
    let dir = expand_path(raw)?;
    if !dir.is_absolute() {
        return Err(AppError::Config(format!(
            "Notes directory must be an absolute path: {}",
            dir.display()
        )));
    }
    Ok(())
}

fn write_config_file(path: &Path, file: &ConfigFile) -> AppResult<()> {
    let yaml = serde_yaml::to_string(file)
        .map_err(|e| AppError::Serialization(format!("Failed to encode config: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, yaml)?;
    debug!("Saved configuration to {}", path.display());
    Ok(())
}

/// Reads the editor preference from QUIRE_EDITOR, VISUAL, then EDITOR.
///
/// Empty variables are treated as unset.
fn editor_preference() -> AppResult<Option<String>> {
    for var in [ENV_VAR_QUIRE_EDITOR, ENV_VAR_VISUAL, ENV_VAR_EDITOR] {
        if let Ok(value) = env::var(var) {
            if value.is_empty() {
                continue;
            }
            Config::validate_editor_command(&value)?;
            debug!("Editor taken from {}", var);
            return Ok(Some(value));
        }
    }
    Ok(None)
}

/// Expands `~` and environment variables in a path.
fn expand_path(raw: &str) -> AppResult<PathBuf> {
    let expanded = shellexpand::full(raw.trim())
        .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
    Ok(PathBuf::from(expanded.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    fn clear_env() {
        for var in [
            ENV_VAR_QUIRE_CONFIG,
            ENV_VAR_QUIRE_DIR,
            ENV_VAR_QUIRE_EDITOR,
            ENV_VAR_VISUAL,
            ENV_VAR_EDITOR,
        ] {
            env::remove_var(var);
        }
    }

    fn write_config(dir: &Path, notes_dirs: &[&Path]) -> PathBuf {
        let path = dir.join("config.yaml");
        let list: Vec<String> = notes_dirs
            .iter()
            .map(|d| format!("  - {}", d.display()))
            .collect();
        fs::write(&path, format!("notes_dirs:\n{}\n", list.join("\n"))).unwrap();
        path
    }

    #[test]
    fn test_debug_impl_redacts_sensitive_info() {
        let config = Config {
            notes_dirs: vec![PathBuf::from("/home/username/private/notes")],
            editor: Some("vim".to_string()),
            ..Config::default()
        };

        let debug_output = format!("{:?}", config);
        assert!(debug_output.contains(REDACTED_PLACEHOLDER));
        assert!(!debug_output.contains("vim"));
        assert!(!debug_output.contains("/home/username/private/notes"));
    }

    #[test]
    fn test_validate_editor_command() {
        assert!(Config::validate_editor_command("vim").is_ok());
        assert!(Config::validate_editor_command("/usr/bin/nano").is_ok());
        assert!(Config::validate_editor_command("").is_err());
        assert!(Config::validate_editor_command("code --wait").is_err());
        for cmd in ["vim;rm", "vim|cat", "$(evil)", "vi`x`", "a>b"] {
            assert!(Config::validate_editor_command(cmd).is_err(), "{} accepted", cmd);
        }
    }

    #[test]
    fn test_validate_requires_absolute_unique_dirs() {
        let mut config = Config {
            notes_dirs: vec![PathBuf::from("relative/notes")],
            ..Config::default()
        };
        assert!(config.validate().is_err());

        config.notes_dirs = vec![PathBuf::from("/a"), PathBuf::from("/a")];
        assert!(config.validate().is_err());

        config.notes_dirs = Vec::new();
        assert!(config.validate().is_err());

        config.notes_dirs = vec![PathBuf::from("/a"), PathBuf::from("/b")];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#88C0D0"), Some((0x88, 0xC0, 0xD0)));
        assert_eq!(parse_hex_color("bf616a"), Some((0xbf, 0x61, 0x6a)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    #[serial]
    fn test_load_reads_dirs_and_theme() {
        clear_env();
        let temp = tempdir().unwrap();
        let notes = temp.path().join("notes");
        let path = temp.path().join("config.yaml");
        fs::write(
            &path,
            format!(
                "notes_dirs:\n  - {}\ntheme:\n  primary: \"#112233\"\n",
                notes.display()
            ),
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.notes_dirs, vec![notes]);
        assert_eq!(config.theme.primary, "#112233");
        // Unspecified theme entries keep their defaults
        assert_eq!(config.theme.error, Theme::default().error);
        assert!(!config.dirs_from_env);
    }

    #[test]
    #[serial]
    fn test_editor_precedence() {
        clear_env();
        let temp = tempdir().unwrap();
        let path = write_config(temp.path(), &[temp.path()]);

        assert_eq!(Config::load_from(&path).unwrap().editor, None);

        env::set_var(ENV_VAR_EDITOR, "nano");
        assert_eq!(Config::load_from(&path).unwrap().editor.as_deref(), Some("nano"));

        env::set_var(ENV_VAR_VISUAL, "gvim");
        assert_eq!(Config::load_from(&path).unwrap().editor.as_deref(), Some("gvim"));

        env::set_var(ENV_VAR_QUIRE_EDITOR, "code");
        assert_eq!(Config::load_from(&path).unwrap().editor.as_deref(), Some("code"));

        env::set_var(ENV_VAR_QUIRE_EDITOR, "vim; rm -rf /");
        assert!(matches!(Config::load_from(&path), Err(AppError::Config(_))));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_quire_dir_overrides_without_persisting() {
        clear_env();
        let temp = tempdir().unwrap();
        let from_file = temp.path().join("file_notes");
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        let path = write_config(temp.path(), &[&from_file]);
        let before = fs::read_to_string(&path).unwrap();

        env::set_var(ENV_VAR_QUIRE_DIR, env::join_paths([&a, &b]).unwrap());
        let mut config = Config::load_from(&path).unwrap();
        assert_eq!(config.notes_dirs, vec![a, b]);
        assert!(config.dirs_from_env);
        assert!(config.add_dir(&temp.path().join("c").to_string_lossy()).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_first_run_writes_defaults() {
        clear_env();
        let temp = tempdir().unwrap();
        let path = temp.path().join("sub").join("quirerc.yaml");
        let original_home = env::var(ENV_VAR_HOME).ok();
        env::set_var(ENV_VAR_HOME, temp.path());

        let result = Config::load_from(&path);

        match original_home {
            Some(home) => env::set_var(ENV_VAR_HOME, home),
            None => env::remove_var(ENV_VAR_HOME),
        }

        let config = result.unwrap();
        assert_eq!(config.notes_dirs, vec![temp.path().join(DEFAULT_NOTES_SUBDIR)]);
        assert!(path.exists());
        assert!(temp.path().join(DEFAULT_NOTES_SUBDIR).is_dir());
    }

    #[test]
    #[serial]
    fn test_invalid_yaml_is_config_error() {
        clear_env();
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "notes_dirs: [unterminated").unwrap();

        match Config::load_from(&path) {
            Err(AppError::Config(msg)) => assert!(msg.contains("Invalid config file")),
            other => panic!("Expected AppError::Config, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_add_and_remove_dirs_persist() {
        clear_env();
        let temp = tempdir().unwrap();
        let first = temp.path().join("first");
        let second = temp.path().join("second");
        let path = write_config(temp.path(), &[&first]);

        let mut config = Config::load_from(&path).unwrap();
        let added = config.add_dir(&second.to_string_lossy()).unwrap();
        assert_eq!(added, second);
        assert!(second.is_dir());
        assert!(config.add_dir(&second.to_string_lossy()).is_err());

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.notes_dirs, vec![first.clone(), second.clone()]);

        let mut config = reloaded;
        assert!(config.remove_dir("/not/configured").is_err());
        config.remove_dir(&first.to_string_lossy()).unwrap();
        match config.remove_dir(&second.to_string_lossy()) {
            Err(AppError::Config(msg)) => assert!(msg.contains("last notes directory")),
            other => panic!("Expected AppError::Config, got {:?}", other),
        }
        assert_eq!(Config::load_from(&path).unwrap().notes_dirs, vec![second]);
    }

    fn run_setup(script: &str) -> (Vec<String>, String) {
        let mut input = io::Cursor::new(script.to_string());
        let mut output = Vec::new();
        let dirs = prompt_notes_dirs(&mut input, &mut output, "~/notes").unwrap();
        (dirs, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_setup_prompt_accepts_default() {
        let (dirs, out) = run_setup("\n\n");
        assert_eq!(dirs, vec!["~/notes"]);
        assert!(out.contains("Primary notes directory [~/notes]: "));
        assert!(out.contains("1. ~/notes"));

        // End of input also falls back to the default
        let (dirs, _) = run_setup("");
        assert_eq!(dirs, vec!["~/notes"]);
    }

    #[test]
    fn test_setup_prompt_collects_additional_dirs() {
        let script = "/srv/notes\ny\n/srv/work\nyes\n/srv/notes\nmaybe\nn\n";
        let (dirs, out) = run_setup(script);
        assert_eq!(dirs, vec!["/srv/notes", "/srv/work"]);
        assert!(out.contains("/srv/notes is already in the list."));
        assert!(out.contains("Please answer yes or no."));
        assert!(out.contains("2. /srv/work"));
    }

    #[test]
    fn test_setup_prompt_rejects_relative_dirs() {
        let (dirs, out) = run_setup("relative/notes\n/srv/notes\ny\nother\n\n");
        assert_eq!(dirs, vec!["/srv/notes"]);
        assert_eq!(out.matches("must be an absolute path").count(), 2);
    }

    #[test]
    #[serial]
    fn test_load_or_setup_reads_existing_file() {
        clear_env();
        let temp = tempdir().unwrap();
        let notes = temp.path().join("notes");
        let path = write_config(temp.path(), &[&notes]);

        let config = Config::load_or_setup(&path).unwrap();
        assert_eq!(config.notes_dirs, vec![notes]);
        assert_eq!(config.path, path);
    }
}
