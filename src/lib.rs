//! seichi-map: Pilgrimage Site Map
//!
//! A library and CLI tool for browsing a catalog of anime pilgrimage sites
//! ("seichi") and finding the ones near a position.
//!
//! ## Features
//!
//! - Tolerant dataset ingestion with per-record validation
//! - Haversine proximity search with a configurable radius
//! - Site detail views enriched with place photos
//! - IP-based positioning with optional caching
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use seichi_map::catalog::Catalog;
//! use seichi_map::coord::Coordinates;
//! use seichi_map::proximity::{find_nearby, SearchRadius};
//!
//! let catalog = Catalog::from_json(
//!     r#"[{"id": "1", "title": "Tokyo Tower", "lat": 35.6586, "lng": 139.7454}]"#,
//! ).unwrap();
//!
//! let tokyo_station = Coordinates::new(35.681236, 139.767125);
//! let radius = SearchRadius::new(5.0).unwrap();
//!
//! for hit in find_nearby(&catalog, tokyo_station, radius) {
//!     println!("{} is {:.1} km away", hit.site.title, hit.distance_km);
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod detail;
pub mod error;
pub mod format;
pub mod locate;
pub mod notify;
pub mod places;
pub mod proximity;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use catalog::{Catalog, SiteRecord};
pub use config::Config;
pub use coord::Coordinates;
pub use error::{Error, Result};
pub use proximity::{find_nearby, NearbyReport, ProximityResult, SearchRadius};
pub use session::Session;
