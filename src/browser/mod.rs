//! Interactive, line-oriented note browser.
//!
//! The browser runs a single-threaded loop over any `BufRead`/`Write` pair:
//! render the current page, read one command line, dispatch it, repeat.
//! Every command performs at most one blocking operation (a catalog scan, a
//! write, or the external editor) before the page is drawn again.
//!
//! Handler errors never end the loop. They are shown on a status line under
//! the listing and the previous result set stays on screen.

use crate::constants::BROWSER_PAGE_SIZE;
use crate::editor::Editor;
use crate::errors::{AppError, AppResult};
use crate::note_core::{Note, NoteFormat, Tags};
use crate::note_io::{Catalog, SearchMode};
use crate::render::{preview, ListOptions, Renderer};
use std::io::{BufRead, Write};
use tracing::{debug, warn};

const HELP: &str = "\
Commands:
  N          open note N in the editor
  v N        view note N
  /TEXT      search titles, content and tags
  t TEXT     search tags
  d TEXT     search by creation date (YYYY-MM-DD, MM/DD/YYYY, ...)
  c          create a note
  e N        edit title, tags and content of note N
  x N        delete note N
  r          reload all notes
  ] / [      next / previous page
  ?          this help
  q          quit
";

/// A parsed browser command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(usize),
    View(usize),
    Search(SearchMode, String),
    Create,
    Edit(usize),
    Delete(usize),
    Reload,
    NextPage,
    PrevPage,
    Help,
    Quit,
    Noop,
}

impl Command {
    /// Parses one input line. Note numbers are the 1-based indices shown in
    /// the listing.
    pub fn parse(line: &str) -> Result<Command, String> {
        let line = line.trim();
        match line {
            "" => return Ok(Command::Noop),
            "q" | "quit" => return Ok(Command::Quit),
            "?" | "h" | "help" => return Ok(Command::Help),
            "r" => return Ok(Command::Reload),
            "]" => return Ok(Command::NextPage),
            "[" => return Ok(Command::PrevPage),
            "c" => return Ok(Command::Create),
            _ => {}
        }

        if let Some(query) = line.strip_prefix('/') {
            return Ok(Command::Search(SearchMode::Keyword, query.trim().to_string()));
        }
        if let Ok(n) = line.parse::<usize>() {
            return Ok(Command::Open(n));
        }

        let (verb, arg) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let arg = arg.trim();
        let number = || {
            arg.parse::<usize>()
                .map_err(|_| format!("'{}' expects a note number", verb))
        };
        match verb {
            "t" => Ok(Command::Search(SearchMode::Tag, arg.to_string())),
            "d" => Ok(Command::Search(SearchMode::Date, arg.to_string())),
            "v" => number().map(Command::View),
            "e" => number().map(Command::Edit),
            "x" => number().map(Command::Delete),
            _ => Err(format!("Unknown command '{}'. Type ? for help.", line)),
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

/// The browsing session state.
pub struct Browser<'a, R: BufRead, W: Write> {
    catalog: &'a Catalog,
    editor: &'a dyn Editor,
    renderer: &'a Renderer,
    input: R,
    output: W,
    notes: Vec<Note>,
    query: Option<(SearchMode, String)>,
    page: usize,
    status: Option<String>,
}

impl<'a, R: BufRead, W: Write> Browser<'a, R, W> {
    pub fn new(
        catalog: &'a Catalog,
        editor: &'a dyn Editor,
        renderer: &'a Renderer,
        input: R,
        output: W,
    ) -> Self {
        Browser {
            catalog,
            editor,
            renderer,
            input,
            output,
            notes: Vec::new(),
            query: None,
            page: 0,
            status: None,
        }
    }

    /// Runs until `q` or end of input.
    ///
    /// # Errors
    ///
    /// Only failures to read input or write output end the session with an
    /// error; command failures are reported on the status line.
    pub fn run(&mut self) -> AppResult<()> {
        if let Err(err) = self.refresh() {
            self.report(err);
        }

        loop {
            self.draw()?;
            let Some(line) = self.read_line()? else {
                debug!("Browser input closed");
                break;
            };

            let flow = match Command::parse(&line) {
                Ok(command) => self.dispatch(command),
                Err(message) => Err(AppError::Input(message)),
            };
            match flow {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(err) => self.report(err),
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, command: Command) -> AppResult<Flow> {
        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Noop => {}
            Command::Help => self.status = Some(HELP.trim_end().to_string()),
            Command::Reload => {
                self.notes = self.catalog.list()?.notes;
                self.query = None;
                self.page = 0;
            }
            Command::NextPage => {
                if self.page + 1 < self.page_count() {
                    self.page += 1;
                } else {
                    self.status = Some("Already on the last page".to_string());
                }
            }
            Command::PrevPage => {
                if self.page > 0 {
                    self.page -= 1;
                } else {
                    self.status = Some("Already on the first page".to_string());
                }
            }
            Command::Search(mode, text) => {
                let notes = self.catalog.search_by(mode, &text)?;
                self.status = Some(format!("{} matching notes", notes.len()));
                self.notes = notes;
                self.query = Some((mode, text));
                self.page = 0;
            }
            Command::Open(n) => {
                let path = self.note_at(n)?.path();
                self.editor.open(&path)?;
                self.refresh()?;
            }
            Command::View(n) => {
                let detail = self.renderer.note_detail(self.note_at(n)?);
                write!(self.output, "\n{}", detail)?;
                self.prompt("Press Enter to continue")?;
            }
            Command::Create => self.create()?,
            Command::Edit(n) => self.edit(n)?,
            Command::Delete(n) => self.delete(n)?,
        }
        Ok(Flow::Continue)
    }

    fn create(&mut self) -> AppResult<()> {
        let title = self.prompt("Title")?.unwrap_or_default();
        if title.trim().is_empty() {
            return Err(AppError::Input("A title is required".to_string()));
        }
        let tags = self.prompt("Tags (comma separated)")?.unwrap_or_default();
        let format = match self.prompt("Format [txt/org/md] (txt)")? {
            Some(answer) if !answer.trim().is_empty() => {
                answer.parse::<NoteFormat>().map_err(AppError::Input)?
            }
            _ => NoteFormat::default(),
        };
        let content = self.prompt("Content (\\n for new lines)")?.unwrap_or_default();

        let note = self
            .catalog
            .create(&title, &content, Tags::from_comma_list(&tags), format)?;
        self.refresh()?;
        self.status = Some(format!("Created {}", note.filename()));
        Ok(())
    }

    fn edit(&mut self, n: usize) -> AppResult<()> {
        let note = self.changeable_note_at(n)?;

        let title = self.prompt(&format!("Title [{}]", note.title))?;
        let tags = self.prompt(&format!("Tags [{}]", note.tags.join(", ")))?;
        let content = self.prompt(&format!("Content [{}]", preview(&note.content, 40)))?;

        let keep = |answer: Option<String>| answer.filter(|a| !a.trim().is_empty());
        let title = keep(title).unwrap_or(note.title);
        let tags = keep(tags)
            .map(|t| Tags::from_comma_list(&t))
            .unwrap_or(note.tags);
        let content = keep(content).unwrap_or(note.content);

        let updated = self.catalog.update(&note.id, &title, &content, tags)?;
        self.refresh()?;
        self.status = Some(format!("Updated {}", updated.filename()));
        Ok(())
    }

    fn delete(&mut self, n: usize) -> AppResult<()> {
        let note = self.changeable_note_at(n)?;
        let answer = self.prompt(&format!("Delete '{}'? [y/N]", note.title))?;
        let confirmed = matches!(
            answer.as_deref().map(|a| a.trim().to_lowercase()).as_deref(),
            Some("y") | Some("yes")
        );
        if !confirmed {
            self.status = Some("Delete cancelled".to_string());
            return Ok(());
        }

        let deleted = self.catalog.delete(&note.id)?;
        self.refresh()?;
        self.status = Some(format!("Deleted {}", deleted.filename()));
        Ok(())
    }

    /// Re-runs the active search, or lists everything when there is none.
    fn refresh(&mut self) -> AppResult<()> {
        self.notes = match &self.query {
            Some((mode, text)) => self.catalog.search_by(*mode, text)?,
            None => self.catalog.list()?.notes,
        };
        self.page = self.page.min(self.page_count() - 1);
        Ok(())
    }

    fn note_at(&self, n: usize) -> AppResult<&Note> {
        n.checked_sub(1)
            .and_then(|i| self.notes.get(i))
            .ok_or_else(|| {
                AppError::Input(format!("No note numbered {} (1-{})", n, self.notes.len()))
            })
    }

    /// Note `n`, provided it lives in the primary directory where ids are resolved.
    fn changeable_note_at(&self, n: usize) -> AppResult<Note> {
        let note = self.note_at(n)?;
        if note.dir.as_path() != self.catalog.primary_dir() {
            return Err(AppError::Input(format!(
                "'{}' is stored in {}; only notes in the primary directory can be changed",
                note.title,
                note.dir.display()
            )));
        }
        Ok(note.clone())
    }

    fn page_count(&self) -> usize {
        self.notes.len().div_ceil(BROWSER_PAGE_SIZE).max(1)
    }

    fn draw(&mut self) -> AppResult<()> {
        let heading = match &self.query {
            None => "All notes".to_string(),
            Some((mode, text)) => format!("{:?} search: {}", mode, text),
        };
        writeln!(
            self.output,
            "\n{} ({} notes, page {}/{})",
            self.renderer.header(&heading),
            self.notes.len(),
            self.page + 1,
            self.page_count()
        )?;

        let start = self.page * BROWSER_PAGE_SIZE;
        let end = (start + BROWSER_PAGE_SIZE).min(self.notes.len());
        let page = &self.notes[start.min(end)..end];
        let listing = self.renderer.listing(
            page,
            start + 1,
            ListOptions {
                show_tags: true,
                show_content: false,
            },
        );
        write!(self.output, "{}", listing)?;

        if let Some(status) = self.status.take() {
            writeln!(self.output, "{}", status)?;
        }
        write!(self.output, "{} ", self.renderer.muted("(? for help) >"))?;
        self.output.flush()?;
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> AppResult<Option<String>> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;
        self.read_line()
    }

    /// One line without its terminator; `None` at end of input.
    fn read_line(&mut self) -> AppResult<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn report(&mut self, err: AppError) {
        warn!("Browser command failed: {}", err);
        self.status = Some(self.renderer.error(&format!("Error: {}", err)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use crate::editor::tests::MockEditor;
    use chrono::NaiveDate;
    use std::fs;
    use std::io::Cursor;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn seeded_catalog(count: usize) -> (TempDir, Catalog) {
        let temp = tempdir().unwrap();
        let catalog = Catalog::new(vec![temp.path().to_path_buf()]).unwrap();
        let base = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        for i in 0..count {
            let tags = if i % 2 == 0 { "even" } else { "odd" };
            catalog
                .create_at(
                    &format!("Note {}", i + 1),
                    &format!("body {}", i + 1),
                    Tags::from_comma_list(tags),
                    NoteFormat::Plain,
                    base + chrono::Duration::minutes(i as i64),
                )
                .unwrap();
        }
        (temp, catalog)
    }

    fn run_script(catalog: &Catalog, editor: &MockEditor, script: &str) -> String {
        let renderer = Renderer::new(&Theme::default(), false);
        let mut output = Vec::new();
        Browser::new(catalog, editor, &renderer, Cursor::new(script), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("12"), Ok(Command::Open(12)));
        assert_eq!(Command::parse(" v 3 "), Ok(Command::View(3)));
        assert_eq!(
            Command::parse("/Budget review"),
            Ok(Command::Search(SearchMode::Keyword, "Budget review".to_string()))
        );
        assert_eq!(
            Command::parse("t work"),
            Ok(Command::Search(SearchMode::Tag, "work".to_string()))
        );
        assert_eq!(
            Command::parse("d 2024-01-01"),
            Ok(Command::Search(SearchMode::Date, "2024-01-01".to_string()))
        );
        assert_eq!(Command::parse("x 2"), Ok(Command::Delete(2)));
        assert_eq!(Command::parse("]"), Ok(Command::NextPage));
        assert_eq!(Command::parse(""), Ok(Command::Noop));
        assert!(Command::parse("e two").is_err());
        assert!(Command::parse("zap").is_err());
    }

    #[test]
    fn test_quits_on_eof_and_q() {
        let (_temp, catalog) = seeded_catalog(2);
        let editor = MockEditor::default();

        let out = run_script(&catalog, &editor, "");
        assert!(out.contains("All notes (2 notes, page 1/1)"));

        let out = run_script(&catalog, &editor, "q\nv 1\n");
        assert!(!out.contains("Created:"));
    }

    #[test]
    fn test_open_uses_editor() {
        let (temp, catalog) = seeded_catalog(3);
        let editor = MockEditor::default();

        run_script(&catalog, &editor, "2\nq\n");

        let opened = editor.opened.lock().unwrap();
        assert_eq!(
            *opened,
            vec![temp.path().join("20240101_090100_note_2.txt")]
        );
    }

    #[test]
    fn test_errors_keep_loop_running() {
        let (_temp, catalog) = seeded_catalog(1);
        let editor = MockEditor::default();

        let out = run_script(&catalog, &editor, "9\nbogus\nv 1\nq\n");
        assert!(out.contains("Error: Invalid input: No note numbered 9"));
        assert!(out.contains("Unknown command 'bogus'"));
        assert!(out.contains("Path: "));
    }

    #[test]
    fn test_tag_search_then_reload() {
        let (_temp, catalog) = seeded_catalog(4);
        let editor = MockEditor::default();

        let out = run_script(&catalog, &editor, "t odd\nr\nq\n");
        assert!(out.contains("Tag search: odd (2 notes, page 1/1)"));
        assert!(out.contains("2 matching notes"));
        // Reload returns to the full listing
        assert!(out.matches("All notes (4 notes").count() >= 2);
    }

    #[test]
    fn test_paging() {
        let (_temp, catalog) = seeded_catalog(BROWSER_PAGE_SIZE + 1);
        let editor = MockEditor::default();

        let out = run_script(&catalog, &editor, "]\n]\n[\n[\nq\n");
        assert!(out.contains("page 2/2"));
        assert!(out.contains(" 30. 2024-01-01 09:29 [txt] Note 30"));
        assert!(out.contains("Already on the last page"));
        assert!(out.contains("Already on the first page"));
    }

    #[test]
    fn test_create_prompts_and_writes() {
        let (temp, catalog) = seeded_catalog(0);
        let editor = MockEditor::default();

        let out = run_script(&catalog, &editor, "c\nShopping\nhome, errands\norg\nmilk\\neggs\nq\n");
        assert!(out.contains("Created "));

        let notes = catalog.list().unwrap().notes;
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Shopping");
        assert_eq!(notes[0].format, NoteFormat::Outline);
        assert_eq!(notes[0].content, "milk\neggs");
        assert!(notes[0].tags.contains("errands"));
        assert_eq!(notes[0].dir, temp.path());
    }

    #[test]
    fn test_create_requires_title() {
        let (_temp, catalog) = seeded_catalog(0);
        let editor = MockEditor::default();

        let out = run_script(&catalog, &editor, "c\n\nq\n");
        assert!(out.contains("A title is required"));
        assert!(catalog.list().unwrap().notes.is_empty());
    }

    #[test]
    fn test_edit_keeps_empty_answers() {
        let (_temp, catalog) = seeded_catalog(1);
        let editor = MockEditor::default();

        run_script(&catalog, &editor, "e 1\nRenamed\n\n\nq\n");

        let note = catalog.get("20240101_090000_note_1").unwrap();
        assert_eq!(note.title, "Renamed");
        assert_eq!(note.content, "body 1");
        assert!(note.tags.contains("even"));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let (temp, catalog) = seeded_catalog(2);
        let editor = MockEditor::default();

        let out = run_script(&catalog, &editor, "x 1\nn\nq\n");
        assert!(out.contains("Delete cancelled"));
        assert_eq!(catalog.list().unwrap().notes.len(), 2);

        run_script(&catalog, &editor, "x 1\ny\nq\n");
        let remaining: Vec<PathBuf> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(remaining, vec![temp.path().join("20240101_090100_note_2.txt")]);
    }

    #[test]
    fn test_secondary_notes_cannot_be_changed() {
        let primary = tempdir().unwrap();
        let secondary = tempdir().unwrap();
        let catalog = Catalog::new(vec![
            primary.path().to_path_buf(),
            secondary.path().to_path_buf(),
        ])
        .unwrap();
        let longer = "Title: Primary\n\nkeep me\n";
        fs::write(primary.path().join("20240101_090000_ab.txt"), longer).unwrap();
        fs::write(
            secondary.path().join("20240101_090000_a.txt"),
            "Title: Secondary\n\nother\n",
        )
        .unwrap();
        let editor = MockEditor::default();

        let out = run_script(&catalog, &editor, "e 2\nx 2\nq\n");
        assert_eq!(
            out.matches("only notes in the primary directory can be changed").count(),
            2
        );
        assert_eq!(
            fs::read_to_string(primary.path().join("20240101_090000_ab.txt")).unwrap(),
            longer
        );
        assert!(secondary.path().join("20240101_090000_a.txt").exists());
    }
}
