//! Interactive selection session.
//!
//! Reads one command per line from stdin and drives a single engine, which
//! stands in for the checklist panel, the map and the save form. The map is
//! drawn onto a [`HeadlessSurface`] and summarized after every change.

use std::io::Write;

use geoselect::config::ConfigPatch;
use geoselect::engine::{DefaultEngine, EngineError};
use geoselect::geometry::LatLng;
use geoselect::notice::Notice;
use geoselect::overlay::{ClickOutcome, HeadlessSurface};
use geoselect::region::{checklist, Code, Level};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use super::common::{
    format_codes, format_frame, format_notice, normalize_code, parse_coordinate, parse_level,
    print_saved,
};
use crate::error::CliError;
use crate::runner::CliRunner;

type Engine = DefaultEngine<HeadlessSurface>;

const HELP: &str = "\
Commands:
  level <state|county>    switch level (clears the selection)
  toggle <code>           toggle a state abbreviation or county FIPS code
  click <lat> <lng>       click the map at a coordinate
  clear                   clear the selection
  show                    show the selection and the map
  checklist               list every selectable region
  save <name>             save the selection
  saved                   reload and list saved selections
  export <id>             print the CSV export link
  key <api-key>           persist a Google Maps API key (next session)
  backend <url>           persist and use a backend URL
  dismiss                 dismiss the current notice
  help                    show this help
  quit                    leave the session";

/// A parsed session line.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Level(Level),
    Toggle(Code),
    Click(LatLng),
    Clear,
    Show,
    Checklist,
    Save(String),
    Saved,
    Export(u64),
    ApiKey(String),
    Backend(String),
    Dismiss,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<SessionCommand>, CliError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let require = |what: &str| {
        if rest.is_empty() {
            Err(CliError::Input(format!("Usage: {} {}", word, what)))
        } else {
            Ok(rest)
        }
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "level" => SessionCommand::Level(parse_level(require("<state|county>")?)?),
        "toggle" => SessionCommand::Toggle(normalize_code(require("<code>")?)),
        "click" => {
            let args: Vec<&str> = require("<lat> <lng>")?.split_whitespace().collect();
            let [lat, lng] = args[..] else {
                return Err(CliError::Input("Usage: click <lat> <lng>".to_string()));
            };
            let (lat, lng) = parse_coordinate(lat, lng)?;
            SessionCommand::Click(LatLng::new(lat, lng))
        }
        "clear" => SessionCommand::Clear,
        "show" => SessionCommand::Show,
        "checklist" => SessionCommand::Checklist,
        // An empty name is passed through; the engine rejects it with a notice.
        "save" => SessionCommand::Save(rest.to_string()),
        "saved" => SessionCommand::Saved,
        "export" => {
            let id = require("<id>")?;
            SessionCommand::Export(
                id.parse()
                    .map_err(|_| CliError::Input(format!("Invalid id '{}'", id)))?,
            )
        }
        "key" => SessionCommand::ApiKey(require("<api-key>")?.to_string()),
        "backend" => SessionCommand::Backend(require("<url>")?.to_string()),
        "dismiss" => SessionCommand::Dismiss,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => {
            return Err(CliError::Input(format!(
                "Unknown command '{}'. Type 'help' for a list.",
                other
            )))
        }
    };
    Ok(Some(command))
}

pub fn run(debug: bool, launch_url: Option<String>) -> Result<(), CliError> {
    let runner = CliRunner::new(debug, launch_url)?;
    runner.log_startup("session");
    let engine = runner.create_engine(HeadlessSurface::new())?;

    runner.runtime()?.block_on(run_session(&engine))
}

async fn run_session(engine: &Engine) -> Result<(), CliError> {
    println!("GeoSelect v{}", geoselect::VERSION);

    let saved = engine.list_initial().await;
    if !saved.is_empty() {
        println!("{} saved selection(s) available; type 'saved' to list.", saved.len());
    }

    match engine.ensure_provider_initialized().await {
        Ok(()) => println!("{}", format_frame(&engine.frame())),
        Err(e) => println!("Map disabled ({}). The checklist still works.", e),
    }
    println!("Type 'help' for commands.");

    let mut shown: Option<Notice> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_notice(engine, &mut shown);
        print!("{}> ", engine.snapshot().level);
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        debug!(command = ?command, "Session command");

        if command == SessionCommand::Quit {
            break;
        }
        if let Err(e) = execute(engine, command).await {
            println!("{}", e);
        }
    }

    info!("Session ended");
    Ok(())
}

/// Print the current notice when it changed since the last prompt.
fn print_notice(engine: &Engine, shown: &mut Option<Notice>) {
    let current = engine.notice();
    if current != *shown {
        if let Some(notice) = &current {
            println!("{}", format_notice(notice));
        }
        *shown = current;
    }
}

async fn execute(engine: &Engine, command: SessionCommand) -> Result<(), CliError> {
    match command {
        SessionCommand::Level(level) => {
            engine.set_level(level).await;
            show_map(engine);
        }
        SessionCommand::Toggle(code) => {
            let selected = engine.toggle(code.clone()).await;
            println!("{} {}", code, if selected { "selected" } else { "deselected" });
            show_map(engine);
        }
        SessionCommand::Click(point) => match engine.handle_click(point).await? {
            ClickOutcome::Toggled { code, selected } => {
                println!("{} {}", code, if selected { "selected" } else { "deselected" });
                show_map(engine);
            }
            ClickOutcome::Discarded => println!("Selection changed while resolving; ignored."),
            ClickOutcome::Unresolved => {}
        },
        SessionCommand::Clear => {
            engine.clear().await;
            show_map(engine);
        }
        SessionCommand::Show => {
            let snapshot = engine.snapshot();
            println!("level: {}", snapshot.level);
            println!("selected: {}", format_codes(&snapshot.items));
            show_map(engine);
        }
        SessionCommand::Checklist => {
            let snapshot = engine.snapshot();
            for record in checklist(snapshot.level) {
                let mark = if snapshot.contains(&record.code) { "x" } else { " " };
                println!("[{}] {:<6} {}", mark, record.code, record.display_name);
            }
        }
        SessionCommand::Save(name) => {
            match engine.save(&name).await {
                Ok(list) => {
                    println!("Saved '{}'.", name.trim());
                    print_saved(&list);
                }
                // Reported through the notice board.
                Err(EngineError::MissingBackend) | Err(EngineError::Persistence(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }
        SessionCommand::Saved => print_saved(&engine.refresh_saved().await?),
        SessionCommand::Export(id) => println!("{}", engine.export_url(id)?),
        SessionCommand::ApiKey(key) => {
            engine.update_config(ConfigPatch::api_key(key));
            println!("API key saved; it takes effect in the next session.");
        }
        SessionCommand::Backend(url) => {
            let config = engine.update_config(ConfigPatch::backend_url(url));
            println!("Backend: {}", config.backend_url);
        }
        SessionCommand::Dismiss => engine.dismiss_notice(),
        SessionCommand::Help => println!("{}", HELP),
        SessionCommand::Quit => {}
    }
    Ok(())
}

fn show_map(engine: &Engine) {
    if engine.is_map_ready() {
        println!("{}", format_frame(&engine.frame()));
    } else {
        println!("selected: {}", format_codes(&engine.snapshot().items));
    }
}
