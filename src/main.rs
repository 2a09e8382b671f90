//! seichi-map CLI entry point
//!
//! Pilgrimage site map - CLI + web app

use seichi_map::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
