//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "search.radius_km")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        let path = Config::config_path()?;
        println!("{}", path.display());
        return Ok(());
    }

    if args.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (&args.key, &args.value) {
        (None, None) => {
            print!("{}", render_all(&config));
        }

        (Some(key), None) => match config.get(key) {
            Some(value) => println!("{}", value),
            None => {
                let keys = Config::available_keys().join("\n  ");
                return Err(Error::Config(format!(
                    "Unknown config key: {}\n\nAvailable keys:\n  {}",
                    key, keys
                )));
            }
        },

        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }

        (None, Some(_)) => {
            return Err(Error::Config(
                "Must specify a key to set a value".to_string(),
            ));
        }
    }

    Ok(())
}

/// Render all configuration values in TOML layout, masking the API key
fn render_all(config: &Config) -> String {
    let mut out = String::new();
    let mut line = |s: String| {
        out.push_str(&s);
        out.push('\n');
    };

    line("[catalog]".into());
    line(format!("source = \"{}\"", config.catalog.source));
    line(format!("timeout_secs = {}", config.catalog.timeout_secs));
    line(String::new());

    line("[search]".into());
    line(format!("radius_km = {}", config.search.radius_km));
    line(format!("max_listed = {}", config.search.max_listed));
    line(String::new());

    line("[geolocation]".into());
    line(format!("enable_high_accuracy = {}", config.geolocation.enable_high_accuracy));
    line(format!("timeout_ms = {}", config.geolocation.timeout_ms));
    line(format!("max_cached_age_ms = {}", config.geolocation.max_cached_age_ms));
    line(String::new());

    line("[places]".into());
    if config.places.api_key.is_empty() {
        line("api_key = \"\" # not configured".into());
    } else {
        line("api_key = \"***\" # configured".into());
    }
    line(format!("photo_max_width = {}", config.places.photo_max_width));
    line(format!("photo_max_height = {}", config.places.photo_max_height));
    line(String::new());

    line("[server]".into());
    line(format!("host = \"{}\"", config.server.host));
    line(format!("port = {}", config.server.port));
    line(String::new());

    line("[location]".into());
    line(format!("default_here = {}", config.location.default_here));
    line(String::new());

    line("[url]".into());
    line(format!("default = \"{}\"", config.url.default));
    line(String::new());

    line("[url.providers]".into());
    let mut providers: Vec<_> = config.url.providers.iter().collect();
    providers.sort();
    for (name, template) in providers {
        line(format!("{} = \"{}\"", name, template));
    }

    out
}
