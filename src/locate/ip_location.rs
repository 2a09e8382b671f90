//! IP-based geolocation
//!
//! Uses ip-api.com for IP geolocation with file-based caching. The cache is
//! only read when the caller allows a cached position.

use crate::constants::api::IP_API_URL;
use crate::constants::cache::IP_LOCATION_CACHE_FILE;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::locate::{GeolocationSource, PositionOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tracing::debug;

/// A resolved IP location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpLocation {
    pub coords: Coordinates,
    /// City, region and country as available
    pub display_name: String,
}

/// IP location service with caching
#[derive(Debug)]
pub struct IpLocator {
    client: reqwest::Client,
    endpoint: String,
    cache_path: Option<PathBuf>,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    country: Option<String>,
}

/// Cached location data
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedLocation {
    location: IpLocation,
    timestamp_ms: u64,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl IpLocator {
    /// Create a new IP locator with default cache path
    pub fn new() -> Self {
        let cache_path = dirs::cache_dir()
            .map(|p| p.join(crate::config::defaults::APP_DIR_NAME).join(IP_LOCATION_CACHE_FILE));

        Self {
            client: reqwest::Client::new(),
            endpoint: IP_API_URL.to_string(),
            cache_path,
        }
    }

    /// Create an IP locator with a specific cache path
    pub fn with_cache_path(cache_path: PathBuf) -> Self {
        Self {
            cache_path: Some(cache_path),
            ..Self::without_cache()
        }
    }

    /// Create an IP locator without caching
    pub fn without_cache() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: IP_API_URL.to_string(),
            cache_path: None,
        }
    }

    /// Point the locator at another ip-api compatible endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Get current location based on IP address
    pub async fn locate(&self, options: &PositionOptions) -> Result<IpLocation> {
        if let Some(cached) = self.load_cache(options.max_cached_age_ms) {
            debug!("Using cached IP location: {}", cached.display_name);
            return Ok(cached);
        }

        let location = self.fetch_location(options).await?;
        self.save_cache(&location);

        Ok(location)
    }

    /// Fetch location from ip-api.com
    async fn fetch_location(&self, options: &PositionOptions) -> Result<IpLocation> {
        let mut request = self.client.get(&self.endpoint);
        if options.timeout_ms > 0 {
            request = request.timeout(Duration::from_millis(options.timeout_ms));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::GeolocationTimeout(format!(
                    "no position within {} ms",
                    options.timeout_ms
                ))
            } else {
                Error::GeolocationUnavailable(format!("IP location request failed: {}", e))
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::FORBIDDEN || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::GeolocationDenied(format!(
                "IP location API refused the request: {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(Error::GeolocationUnavailable(format!(
                "IP location API returned status: {}",
                status
            )));
        }

        let data: IpApiResponse = response.json().await.map_err(|e| {
            Error::GeolocationUnavailable(format!("Failed to parse IP location response: {}", e))
        })?;

        if data.status != "success" {
            return Err(Error::GeolocationUnavailable(format!(
                "IP location lookup failed: {}",
                data.message.as_deref().unwrap_or("unknown reason")
            )));
        }

        let lat = data
            .lat
            .ok_or_else(|| Error::GeolocationUnavailable("No latitude in response".to_string()))?;
        let lng = data
            .lon
            .ok_or_else(|| Error::GeolocationUnavailable("No longitude in response".to_string()))?;

        // Build display name from available fields
        let display_name = [data.city, data.region_name, data.country]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");

        Ok(IpLocation {
            coords: Coordinates::new(lat, lng),
            display_name: if display_name.is_empty() {
                "Unknown Location".to_string()
            } else {
                display_name
            },
        })
    }

    /// Load cached location if younger than `max_age_ms`
    fn load_cache(&self, max_age_ms: u64) -> Option<IpLocation> {
        if max_age_ms == 0 {
            return None;
        }
        let cache_path = self.cache_path.as_ref()?;

        let content = fs::read_to_string(cache_path).ok()?;
        let cached: CachedLocation = serde_json::from_str(&content).ok()?;

        (now_ms().saturating_sub(cached.timestamp_ms) < max_age_ms).then_some(cached.location)
    }

    /// Save location to cache
    fn save_cache(&self, location: &IpLocation) {
        let Some(cache_path) = &self.cache_path else {
            return;
        };

        if let Some(parent) = cache_path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let cached = CachedLocation {
            location: location.clone(),
            timestamp_ms: now_ms(),
        };

        if let Ok(content) = serde_json::to_string_pretty(&cached) {
            let _ = fs::write(cache_path, content);
        }
    }

    /// Clear the cache
    pub fn clear_cache(&self) {
        if let Some(cache_path) = &self.cache_path {
            let _ = fs::remove_file(cache_path);
        }
    }
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl GeolocationSource for IpLocator {
    async fn current_position(&self, options: &PositionOptions) -> Result<Coordinates> {
        Ok(self.locate(options).await?.coords)
    }
}
