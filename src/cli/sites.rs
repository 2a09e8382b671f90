//! Sites command handler
//!
//! Lists the dataset the way the map would place it.

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::Result;
use crate::notify::StderrSink;
use clap::Args;
use std::time::Duration;

/// Sites command arguments
#[derive(Args)]
pub struct SitesArgs {
    /// Show records that cannot be placed and entries rejected on load
    #[arg(long)]
    pub invalid: bool,

    /// Print records as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the sites command
pub async fn run(args: SitesArgs) -> Result<()> {
    let config = Config::load()?;
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.catalog.timeout_secs))
        .build()?;

    let catalog = Catalog::load_or_empty(&config.catalog_source(), &client, &StderrSink).await;

    if args.invalid {
        print_invalid(&catalog, args.json)?;
    } else {
        print_placeable(&catalog, args.json)?;
    }

    eprintln!(
        "{} sites ({} placeable, {} rejected)",
        catalog.len(),
        catalog.placeable().count(),
        catalog.rejected().len()
    );

    Ok(())
}

fn print_placeable(catalog: &Catalog, json: bool) -> Result<()> {
    if json {
        let records: Vec<_> = catalog.placeable().map(|(site, _)| site).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    for (site, coords) in catalog.placeable() {
        println!("{:<12} {:<40} {:.6}, {:.6}", site.id, site.title, coords.lat, coords.lng);
    }
    Ok(())
}

fn print_invalid(catalog: &Catalog, json: bool) -> Result<()> {
    if json {
        let body = serde_json::json!({
            "invalid": catalog.invalid().collect::<Vec<_>>(),
            "rejected": catalog.rejected(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    for site in catalog.invalid() {
        let show = |v: Option<f64>| v.map_or("-".to_string(), |v| v.to_string());
        println!(
            "{:<12} {:<40} lat={} lng={}",
            site.id,
            site.title,
            show(site.lat),
            show(site.lng)
        );
    }
    for rejection in catalog.rejected() {
        println!("entry #{:<6} rejected: {}", rejection.index, rejection.reason);
    }
    Ok(())
}
