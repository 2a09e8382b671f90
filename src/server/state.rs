//! Server shared state
//!
//! Holds the map session and the collaborators the HTTP handlers use.

use crate::locate::Locator;
use crate::notify::BannerSlot;
use crate::places::GooglePlacesBackend;
use crate::session::Session;
use std::sync::Arc;

/// Shared state for the HTTP server
pub struct AppState {
    /// The map session (catalog, radius, active detail)
    pub session: Arc<Session>,

    /// Notification slot the session writes to
    pub banner: Arc<BannerSlot>,

    /// Place detail backend for photo enrichment
    pub places: GooglePlacesBackend,

    /// Position source used when a request carries no coordinates
    pub locator: Locator,
}

impl AppState {
    /// Create new application state
    pub fn new(
        session: Session,
        banner: Arc<BannerSlot>,
        places: GooglePlacesBackend,
        locator: Locator,
    ) -> Self {
        Self {
            session: Arc::new(session),
            banner,
            places,
            locator,
        }
    }
}
