//! HTTP server for seichi-map
//!
//! Exposes the map session as a JSON API.

pub mod routes;
pub mod state;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::locate::{IpLocator, Locator};
use crate::notify::BannerSlot;
use crate::places::GooglePlacesBackend;
use crate::session::Session;
use routes::create_router;
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Start the HTTP server
///
/// Loads the site catalog first; an unavailable dataset still starts the
/// server with an empty catalog and the failure notice on the banner.
pub async fn run(config: Config) -> Result<()> {
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| Error::Server(format!("Invalid server address: {}", e)))?;

    let places = GooglePlacesBackend::new(config.places.api_key.clone())?;
    if !places.has_api_key() {
        warn!("No Places API key configured; detail views will show no photos");
    }

    let banner = Arc::new(BannerSlot::new());
    let session = Session::start(config, banner.clone()).await?;
    info!(
        sites = session.catalog().len(),
        radius = %session.radius(),
        "Session ready"
    );

    let state = Arc::new(AppState::new(
        session,
        banner,
        places,
        Locator::Ip(IpLocator::new()),
    ));
    let app = create_router(state);

    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Server(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Server(format!("Server error: {}", e)))?;

    Ok(())
}
