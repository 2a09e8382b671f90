//! Error types for seichi-map

use thiserror::Error;

/// Main error type for seichi-map operations
#[derive(Error, Debug)]
pub enum Error {
    /// The site dataset could not be fetched or is not a record array
    #[error("Site data unavailable: {0}")]
    DataUnavailable(String),

    /// A single dataset entry failed schema checks
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Geolocation unavailable: {0}")]
    GeolocationUnavailable(String),

    #[error("Geolocation denied: {0}")]
    GeolocationDenied(String),

    #[error("Geolocation timed out: {0}")]
    GeolocationTimeout(String),

    /// Place detail (photo) lookup failed
    #[error("Place detail fetch failed: {0}")]
    DetailFetchFailed(String),

    #[error("Unknown site: {0}")]
    UnknownSite(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl Error {
    /// True for the geolocation failure family
    pub fn is_geolocation(&self) -> bool {
        matches!(
            self,
            Self::GeolocationUnavailable(_) | Self::GeolocationDenied(_) | Self::GeolocationTimeout(_)
        )
    }
}

/// Result type alias for seichi-map operations
pub type Result<T> = std::result::Result<T, Error>;
