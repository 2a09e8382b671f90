//! Nearby command handler
//!
//! Resolves a position and lists the sites within the detection radius.

use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter};
use crate::locate::IpLocator;
use crate::notify::StderrSink;
use crate::session::Session;
use clap::Args;
use std::sync::Arc;

/// Nearby command arguments
#[derive(Args)]
pub struct NearbyArgs {
    /// Latitude
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Use current location (IP geolocation)
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    pub here: bool,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the nearby command
pub async fn run(args: NearbyArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let config = Config::load()?;

    let format = args.format.as_deref().unwrap_or("text");
    let formatter = get_formatter(format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;

    let reference = resolve_position(&args, &config).await?;
    reference.validate()?;

    // Load failures are reported on stderr and leave an empty catalog
    let session = Session::start(config, Arc::new(StderrSink)).await?;
    let report = session.nearby(reference);
    let output = formatter.format(&report, session.config())?;

    if let Some(path) = &args.output {
        std::fs::write(path, &output)?;
        eprintln!("Output written to: {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

/// Pick the reference position from flags, falling back to config
async fn resolve_position(args: &NearbyArgs, config: &Config) -> Result<Coordinates> {
    if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
        return Ok(Coordinates::new(lat, lng));
    }

    if args.here || config.location.default_here {
        let location = IpLocator::new().locate(&config.position_options()).await?;
        eprintln!("Using IP location: {}", location.display_name);
        return Ok(location.coords);
    }

    Err(Error::Config(
        "No location specified. Use --lat/--lng or --here".to_string(),
    ))
}

/// List available output formats
fn list_formats() {
    println!("Available formats:");
    for format in available_formats() {
        println!("  {:8} {}", format.name, format.description);
    }
}
