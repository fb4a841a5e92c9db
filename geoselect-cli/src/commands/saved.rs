//! Saved selection commands.

use clap::Subcommand;
use geoselect::overlay::HeadlessSurface;

use super::common::print_saved;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Saved subcommands.
#[derive(Debug, Subcommand)]
pub enum SavedCommands {
    /// List saved selections from the backend
    List,

    /// Print the CSV export link for a saved selection
    ExportUrl {
        /// Saved selection ID
        id: u64,
    },
}

/// Run a saved subcommand.
pub fn run(
    command: SavedCommands,
    debug: bool,
    launch_url: Option<String>,
) -> Result<(), CliError> {
    let runner = CliRunner::new(debug, launch_url)?;
    runner.log_startup("saved");
    let engine = runner.create_engine(HeadlessSurface::new())?;

    match command {
        SavedCommands::List => {
            let list = runner.runtime()?.block_on(engine.refresh_saved())?;
            print_saved(&list);
        }
        SavedCommands::ExportUrl { id } => {
            println!("{}", engine.export_url(id)?);
        }
    }

    Ok(())
}
