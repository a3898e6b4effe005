/*!
# Quire - A Flat-File Note Manager

This file contains the main application flow: it initializes logging, parses
the command line, loads the configuration and dispatches to the catalog, the
editor or the interactive browser.

## Usage

```
quire [OPTIONS] [COMMAND]

Commands:
  create  Create a new note in the primary directory
  list    List every note in every directory
  search  Search notes by keyword, tag or creation date
  show    Print a note's metadata and content
  edit    Open a note in the editor
  update  Replace a note's title, content and tags
  delete  Delete a note
  dirs    Manage note directories

Options:
  -v, --verbose              Print verbose (debug) logs
      --log-format <FORMAT>  Log output format [default: text] [possible values: text, json]
      --config <PATH>        Config file to use instead of ~/.quirerc.yaml
  -h, --help                 Print help
  -V, --version              Print version
```

Without a command, quire starts the interactive browser.
*/

use quire::browser::Browser;
use quire::cli::{CliArgs, Commands, DirsAction, DisplayArgs};
use quire::config::Config;
use quire::constants::{TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME};
use quire::editor::Editor;
use quire::errors::{AppError, AppResult};
use quire::logging;
use quire::note_core::{Note, Tags};
use quire::note_io::Catalog;
use quire::render::{ListOptions, Renderer};
use std::io;
use std::process::ExitCode;
use tracing::{debug, error, info, info_span};
use uuid::Uuid;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(e) = logging::init(&args.log_format, args.verbose) {
        eprintln!("Warning: {}", e);
    }

    let correlation_id = Uuid::new_v4().to_string();
    let root_span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service = TRACING_SERVICE_NAME,
        correlation_id = %correlation_id
    );
    let _guard = root_span.enter();

    debug!("CLI arguments: {:?}", args);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Loads configuration and executes the requested command.
fn run(args: CliArgs) -> AppResult<()> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let mut config = Config::load_or_setup(&config_path)?;
    debug!("Loaded configuration: {:?}", config);

    let renderer = Renderer::from_env(&config.theme);

    let Some(command) = args.command else {
        info!("Starting interactive browser");
        let catalog = Catalog::from_config(&config)?;
        let editor = config.editor_launcher()?;
        let stdin = io::stdin();
        let stdout = io::stdout();
        return Browser::new(&catalog, &editor, &renderer, stdin.lock(), stdout.lock()).run();
    };

    match command {
        Commands::Dirs { action } => manage_dirs(&mut config, &renderer, action)?,
        Commands::Create {
            title,
            content,
            tags,
            format,
        } => {
            let catalog = Catalog::from_config(&config)?;
            let note = catalog.create(&title, &content, Tags::from_comma_list(&tags), format)?;
            println!("{} {}", renderer.success("Created"), note.id);
        }
        Commands::List { display } => {
            let listing = Catalog::from_config(&config)?.list()?;
            print_notes(&renderer, &listing.notes, display)?;
            if !listing.skipped.is_empty() {
                eprintln!(
                    "{}",
                    renderer.warning(&format!(
                        "Skipped {} unreadable files (run with --verbose for details)",
                        listing.skipped.len()
                    ))
                );
            }
        }
        Commands::Search {
            query,
            mode,
            display,
        } => {
            let notes = Catalog::from_config(&config)?.search_by(mode, &query)?;
            print_notes(&renderer, &notes, display)?;
        }
        Commands::Show { id } => {
            let note = Catalog::from_config(&config)?.get(&id)?;
            print!("{}", renderer.note_detail(&note));
        }
        Commands::Edit { id } => {
            let note = Catalog::from_config(&config)?.get(&id)?;
            config.editor_launcher()?.open(&note.path())?;
            info!("Closed editor for {}", note.filename());
        }
        Commands::Update {
            id,
            title,
            content,
            tags,
        } => {
            let catalog = Catalog::from_config(&config)?;
            let note = catalog.update(&id, &title, &content, Tags::from_comma_list(&tags))?;
            println!("{} {}", renderer.success("Updated"), note.id);
        }
        Commands::Delete { id } => {
            let note = Catalog::from_config(&config)?.delete(&id)?;
            println!("{} {}", renderer.success("Deleted"), note.id);
        }
    }
    Ok(())
}

fn manage_dirs(config: &mut Config, renderer: &Renderer, action: DirsAction) -> AppResult<()> {
    match action {
        DirsAction::List => {
            for (i, dir) in config.notes_dirs.iter().enumerate() {
                let marker = if i == 0 { " (primary)" } else { "" };
                println!("{}. {}{}", i + 1, dir.display(), renderer.muted(marker));
            }
        }
        DirsAction::Add { path } => {
            let dir = config.add_dir(&path)?;
            println!("{} {}", renderer.success("Added"), dir.display());
        }
        DirsAction::Remove { path } => {
            let dir = config.remove_dir(&path)?;
            println!("{} {}", renderer.success("Removed"), dir.display());
        }
    }
    Ok(())
}

fn print_notes(renderer: &Renderer, notes: &[Note], display: DisplayArgs) -> AppResult<()> {
    if display.json {
        let json = serde_json::to_string_pretty(notes)
            .map_err(|e| AppError::Serialization(format!("Failed to encode notes: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    let options = ListOptions {
        show_tags: display.tags,
        show_content: display.content,
    };
    print!("{}", renderer.listing(notes, 1, options));
    Ok(())
}
