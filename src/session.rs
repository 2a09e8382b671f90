//! Map session
//!
//! A session owns everything one map view works with: the loaded catalog,
//! the detection radius, the active detail and the notification sink.
//! Components get it passed in instead of reaching for globals.

use crate::catalog::Catalog;
use crate::config::Config;
use crate::coord::Coordinates;
use crate::detail::{DetailTracker, DetailView, Enrichment};
use crate::error::{Error, Result};
use crate::locate::GeolocationSource;
use crate::notify::NotificationSink;
use crate::places::PlaceDetailProvider;
use crate::proximity::{NearbyReport, SearchRadius};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Shown when a proximity check runs without any site data
pub const NOT_LOADED_NOTICE: &str = "Site data is not loaded.";

/// User-facing text for a failed position request
pub fn geolocation_notice(err: &Error) -> String {
    match err {
        Error::GeolocationUnavailable(reason) => {
            format!("Your location is not available: {}", reason)
        }
        Error::GeolocationDenied(reason) => {
            format!("Permission to use your location was denied: {}", reason)
        }
        Error::GeolocationTimeout(_) => {
            "Timed out while getting your location. Check your settings.".to_string()
        }
        other => format!("Could not determine your location: {}", other),
    }
}

/// One map session
pub struct Session {
    config: Config,
    radius: SearchRadius,
    catalog: Arc<Catalog>,
    tracker: Mutex<DetailTracker>,
    sink: Arc<dyn NotificationSink>,
}

impl Session {
    /// Start a session, loading the configured dataset
    ///
    /// An unavailable dataset leaves the session with an empty catalog and
    /// one notice on `sink`. Only an invalid radius fails.
    pub async fn start(config: Config, sink: Arc<dyn NotificationSink>) -> Result<Self> {
        let radius = config.search_radius()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.catalog.timeout_secs))
            .build()?;

        let catalog =
            Catalog::load_or_empty(&config.catalog_source(), &client, sink.as_ref()).await;

        Ok(Self::assemble(config, radius, catalog, sink))
    }

    /// Build a session around an already-loaded catalog
    pub fn with_catalog(
        config: Config,
        catalog: Catalog,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self> {
        let radius = config.search_radius()?;
        Ok(Self::assemble(config, radius, catalog, sink))
    }

    fn assemble(
        config: Config,
        radius: SearchRadius,
        catalog: Catalog,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let tracker = Mutex::new(DetailTracker::new(config.photo_size()));
        Self {
            config,
            radius,
            catalog: Arc::new(catalog),
            tracker,
            sink,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn radius(&self) -> SearchRadius {
        self.radius
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Sites to place on the map
    pub fn markers(&self) -> impl Iterator<Item = (&crate::catalog::SiteRecord, Coordinates)> {
        self.catalog.placeable()
    }

    /// Search around `reference` with the session radius
    pub fn nearby(&self, reference: Coordinates) -> NearbyReport<'_> {
        NearbyReport::search(&self.catalog, reference, self.radius)
    }

    /// Resolve the user's position, reporting failure once
    ///
    /// On failure the error carries the notice that was shown.
    pub async fn locate<G: GeolocationSource>(
        &self,
        locator: &G,
    ) -> std::result::Result<Coordinates, String> {
        match locator
            .current_position(&self.config.position_options())
            .await
        {
            Ok(coords) => Ok(coords),
            Err(e) => {
                warn!("Could not get current position: {}", e);
                let notice = geolocation_notice(&e);
                self.sink.show(&notice, false);
                Err(notice)
            }
        }
    }

    /// Locate the user and report the nearby sites on the sink
    ///
    /// Fails with the shown notice when there is no site data or no
    /// position.
    pub async fn check_proximity<G: GeolocationSource>(
        &self,
        locator: &G,
    ) -> std::result::Result<NearbyReport<'_>, String> {
        if self.catalog.is_empty() {
            self.sink.show(NOT_LOADED_NOTICE, false);
            return Err(NOT_LOADED_NOTICE.to_string());
        }

        info!("Getting current position to search for nearby sites");
        let reference = self.locate(locator).await?;

        let report = self.nearby(reference);
        info!(
            reference = %reference,
            radius = %self.radius,
            found = report.results.len(),
            "Proximity check complete"
        );

        let (message, multiline) = report.summary(self.config.search.max_listed);
        self.sink.show(&message, multiline);
        Ok(report)
    }

    /// Open the detail view for `site_id` and enrich it with a photo
    ///
    /// The tracker lock is not held while the provider runs; a result that
    /// arrives after another selection is discarded.
    pub async fn open_detail<P: PlaceDetailProvider>(
        &self,
        site_id: &str,
        provider: &P,
    ) -> Result<Enrichment> {
        let site = self
            .catalog
            .get(site_id)
            .ok_or_else(|| Error::UnknownSite(site_id.to_string()))?;

        let ticket = {
            let mut tracker = self.tracker.lock().await;
            tracker.select(site)
        };

        let Some(ticket) = ticket else {
            return Ok(Enrichment::Skipped);
        };

        let outcome = provider.fetch(&ticket.request).await;

        let mut tracker = self.tracker.lock().await;
        Ok(tracker.complete(&ticket, outcome))
    }

    /// Close the open detail view
    pub async fn dismiss_detail(&self) -> bool {
        self.tracker.lock().await.dismiss()
    }

    /// Snapshot of the open detail view
    pub async fn current_detail(&self) -> Option<DetailView> {
        self.tracker.lock().await.current().cloned()
    }
}
