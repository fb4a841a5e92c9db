//! One-shot point resolution.
//!
//! Resolves a coordinate to a state abbreviation or county FIPS code using
//! the same geocoding path as map clicks, without changing any selection.

use clap::Args;
use geoselect::geometry::LatLng;
use geoselect::overlay::HeadlessSurface;
use geoselect::region::{county_by_code, Level};
use tracing::info;

use super::common::parse_level;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the resolve command.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Level to resolve at (state or county)
    #[arg(long, default_value = "state")]
    pub level: String,
}

pub fn run(args: ResolveArgs, debug: bool, launch_url: Option<String>) -> Result<(), CliError> {
    let level = parse_level(&args.level)?;
    let point = LatLng::new(args.lat, args.lng);
    if !point.is_valid() {
        return Err(CliError::Input(format!("Invalid coordinate {}", point)));
    }

    let runner = CliRunner::new(debug, launch_url)?;
    runner.log_startup("resolve");
    let engine = runner.create_engine(HeadlessSurface::new())?;

    let code = runner
        .runtime()?
        .block_on(engine.resolve_point(point, level))?;
    info!(point = %point, level = %level, code = %code, "Resolved");

    match level {
        Level::County => match county_by_code(code.as_str()) {
            Some(county) => println!("{} ({}, {})", code, county.name, county.state),
            None => println!("{}", code),
        },
        Level::State => println!("{}", code),
    }

    Ok(())
}
