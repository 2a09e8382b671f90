//! Centralized constants for the seichi-map crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometers
    pub const EARTH_RADIUS_KM: f64 = 6371.0;
}

/// External API endpoints
pub mod api {
    /// Default pilgrimage site dataset
    pub const DEFAULT_DATASET_URL: &str = "https://nm7-map.web.app/areas.json";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// Google Places Details endpoint
    pub const PLACES_DETAILS_URL: &str = "https://maps.googleapis.com/maps/api/place/details/json";

    /// Google Places Photo endpoint
    pub const PLACES_PHOTO_URL: &str = "https://maps.googleapis.com/maps/api/place/photo";
}

/// Values the dataset uses in `placeId` instead of a real reference
pub mod sentinel {
    /// Lookup found nothing ("not applicable")
    pub const NOT_FOUND: &[&str] = &["該当なし", "not found"];

    /// Lookup errored; the rest of the string is the error text
    pub const ERROR_PREFIXES: &[&str] = &["エラー:", "error:"];
}

/// Cache settings
pub mod cache {
    /// IP location cache file name
    pub const IP_LOCATION_CACHE_FILE: &str = "ip_location_cache.json";
}
