//! GeoSelect CLI - Command-line interface
//!
//! This binary hosts the GeoSelect selection engine: an interactive session
//! for selecting states and counties, plus one-shot commands for settings,
//! saved selections and point resolution.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::resolve::ResolveArgs;
use commands::saved::SavedCommands;
use error::CliError;

#[derive(Parser)]
#[command(name = "geoselect")]
#[command(version = geoselect::VERSION)]
#[command(about = "Select US states and counties on a map and save named selections", long_about = None)]
struct Cli {
    /// Launch URL whose query string (gmaps_key, backend) overrides saved settings
    #[arg(long, global = true)]
    launch_url: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive selection session
    Session,

    /// Resolve a coordinate to a state or county code
    Resolve(ResolveArgs),

    /// Work with saved selections
    Saved {
        #[command(subcommand)]
        command: SavedCommands,
    },

    /// View or change configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Session => commands::session::run(cli.debug, cli.launch_url),
        Commands::Resolve(args) => commands::resolve::run(args, cli.debug, cli.launch_url),
        Commands::Saved { command } => commands::saved::run(command, cli.debug, cli.launch_url),
        Commands::Config { command } => commands::config::run(command),
    }
}
