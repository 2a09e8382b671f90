//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod nearby;
pub mod serve;
pub mod sites;
pub mod status;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Pilgrimage site map: find anime locations near you
#[derive(Parser)]
#[command(name = "seichi-map")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List sites near a position
    Nearby(nearby::NearbyArgs),

    /// List the sites in the dataset
    Sites(sites::SitesArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Show configuration, dataset and server status
    Status(status::StatusArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    // The server logs requests; everything else stays quiet unless asked
    let default_level = match cli.command {
        Commands::Serve(_) => "info",
        _ => "warn",
    };
    init_logging(default_level);

    match cli.command {
        Commands::Nearby(args) => nearby::run(args).await,
        Commands::Sites(args) => sites::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
        Commands::Status(args) => status::run(args).await,
    }
}

/// Initialize logging to stderr, honouring RUST_LOG
fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_nearby_coordinates() {
        let cli = Cli::try_parse_from([
            "seichi-map", "nearby", "--lat", "35.68", "--lng", "139.76", "-f", "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Nearby(args) => {
                assert_eq!(args.lat, Some(35.68));
                assert_eq!(args.lng, Some(139.76));
                assert_eq!(args.format.as_deref(), Some("json"));
                assert!(!args.here);
            }
            _ => panic!("expected nearby"),
        }
    }

    #[test]
    fn test_nearby_here_conflicts_with_coordinates() {
        let result = Cli::try_parse_from([
            "seichi-map", "nearby", "--here", "--lat", "35.68", "--lng", "139.76",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_nearby_lat_requires_lng() {
        let result = Cli::try_parse_from(["seichi-map", "nearby", "--lat", "35.68"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_nearby_has_no_radius_flag() {
        for flag in ["--radius", "-r"] {
            let result = Cli::try_parse_from([
                "seichi-map", "nearby", "--lat", "35.68", "--lng", "139.76", flag, "1.0",
            ]);
            assert!(result.is_err(), "{} should be rejected", flag);
        }
    }

    #[test]
    fn test_negative_longitude_parses() {
        let cli = Cli::try_parse_from([
            "seichi-map", "nearby", "--lat", "40.71", "--lng", "-74.0",
        ])
        .unwrap();

        match cli.command {
            Commands::Nearby(args) => assert_eq!(args.lng, Some(-74.0)),
            _ => panic!("expected nearby"),
        }
    }
}
