//! Status command handler
//!
//! Shows the effective settings, whether the dataset loads, and optionally
//! whether a server is running.

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::Result;
use clap::Args;
use std::time::Duration;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Skip fetching the dataset
    #[arg(long)]
    pub offline: bool,

    /// Check if server is running (tries to connect)
    #[arg(long)]
    pub server: bool,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = Config::load()?;

    if args.server {
        check_server_status(&config).await;
    }

    println!("seichi-map v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("Config:   {}", Config::config_path()?.display());
    println!("Radius:   {}", config.search_radius()?);
    println!(
        "Photos:   {}",
        if config.places.api_key.is_empty() {
            "disabled (places.api_key not set)"
        } else {
            "enabled"
        }
    );
    println!();

    let source = config.catalog_source();
    println!("Dataset:  {}", source);
    if args.offline {
        return Ok(());
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.catalog.timeout_secs))
        .build()?;

    match Catalog::load(&source, &client).await {
        Ok(catalog) => {
            println!("  Records:   {}", catalog.len());
            println!("  Placeable: {}", catalog.placeable().count());
            println!("  Invalid:   {}", catalog.invalid().count());
            println!("  Rejected:  {}", catalog.rejected().len());
        }
        Err(e) => {
            println!("  Error: {}", e);
        }
    }

    Ok(())
}

/// Check if the server is running
async fn check_server_status(config: &Config) {
    let url = format!("http://{}/api/status", config.server_addr());

    match reqwest::get(&url).await {
        Ok(response) => {
            if response.status().is_success() {
                println!("Server: RUNNING on {}", config.server_addr());
                if let Ok(status) = response.json::<serde_json::Value>().await {
                    if let Some(version) = status.get("version").and_then(|v| v.as_str()) {
                        println!("  Version: {}", version);
                    }
                    if let Some(sites) = status.get("placeable").and_then(|v| v.as_u64()) {
                        println!("  Sites:   {}", sites);
                    }
                }
            } else {
                println!("Server: ERROR (status {})", response.status());
            }
        }
        Err(_) => {
            println!("Server: NOT RUNNING on {}", config.server_addr());
        }
    }
    println!();
}
