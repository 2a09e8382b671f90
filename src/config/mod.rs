//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/seichi-map/config.toml

pub mod defaults;

use crate::catalog::CatalogSource;
use crate::detail::PhotoSize;
use crate::error::{Error, Result};
use crate::locate::PositionOptions;
use crate::proximity::SearchRadius;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Site dataset settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Proximity search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Position request settings
    #[serde(default)]
    pub geolocation: GeolocationConfig,

    /// Place detail (photo) settings
    #[serde(default)]
    pub places: PlacesConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Location settings
    #[serde(default)]
    pub location: LocationConfig,

    /// URL generation settings
    #[serde(default)]
    pub url: UrlConfig,
}

/// Site dataset settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Dataset URL or local file path
    #[serde(default = "default_catalog_source")]
    pub source: String,

    /// Fetch timeout in seconds
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,
}

/// Proximity search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Detection radius in kilometers
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,

    /// Sites named in the nearby summary
    #[serde(default = "default_max_listed")]
    pub max_listed: usize,
}

/// Position request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    #[serde(default = "default_enable_high_accuracy")]
    pub enable_high_accuracy: bool,

    #[serde(default = "default_geolocation_timeout")]
    pub timeout_ms: u64,

    #[serde(default = "default_max_cached_age")]
    pub max_cached_age_ms: u64,
}

/// Place detail settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    /// Google Places API key
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_photo_max_width")]
    pub photo_max_width: u32,

    #[serde(default = "default_photo_max_height")]
    pub photo_max_height: u32,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Location settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    /// If true, --here is default when no location given
    #[serde(default)]
    pub default_here: bool,
}

/// URL generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

// Default value functions for serde
fn default_catalog_source() -> String {
    DEFAULT_CATALOG_SOURCE.to_string()
}
fn default_catalog_timeout() -> u64 {
    DEFAULT_CATALOG_TIMEOUT_SECS
}
fn default_radius_km() -> f64 {
    DEFAULT_RADIUS_KM
}
fn default_max_listed() -> usize {
    DEFAULT_MAX_LISTED
}
fn default_enable_high_accuracy() -> bool {
    DEFAULT_ENABLE_HIGH_ACCURACY
}
fn default_geolocation_timeout() -> u64 {
    DEFAULT_GEOLOCATION_TIMEOUT_MS
}
fn default_max_cached_age() -> u64 {
    DEFAULT_MAX_CACHED_AGE_MS
}
fn default_photo_max_width() -> u32 {
    DEFAULT_PHOTO_MAX_WIDTH
}
fn default_photo_max_height() -> u32 {
    DEFAULT_PHOTO_MAX_HEIGHT
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/search/?api=1&query={lat},{lng}".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map=17/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?ll={lat},{lng}".to_string(),
    );
    providers
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: default_catalog_source(),
            timeout_secs: default_catalog_timeout(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_km: default_radius_km(),
            max_listed: default_max_listed(),
        }
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            enable_high_accuracy: default_enable_high_accuracy(),
            timeout_ms: default_geolocation_timeout(),
            max_cached_age_ms: default_max_cached_age(),
        }
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            photo_max_width: default_photo_max_width(),
            photo_max_height: default_photo_max_height(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

fn parse_value<T: std::str::FromStr>(what: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {} value: {}", what, value)))
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            let config: Config = toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
            config.search_radius()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["catalog", "source"] => Some(self.catalog.source.clone()),
            ["catalog", "timeout_secs"] => Some(self.catalog.timeout_secs.to_string()),

            ["search", "radius_km"] => Some(self.search.radius_km.to_string()),
            ["search", "max_listed"] => Some(self.search.max_listed.to_string()),

            ["geolocation", "enable_high_accuracy"] => {
                Some(self.geolocation.enable_high_accuracy.to_string())
            }
            ["geolocation", "timeout_ms"] => Some(self.geolocation.timeout_ms.to_string()),
            ["geolocation", "max_cached_age_ms"] => {
                Some(self.geolocation.max_cached_age_ms.to_string())
            }

            ["places", "api_key"] => Some(self.places.api_key.clone()),
            ["places", "photo_max_width"] => Some(self.places.photo_max_width.to_string()),
            ["places", "photo_max_height"] => Some(self.places.photo_max_height.to_string()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["location", "default_here"] => Some(self.location.default_here.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["catalog", "source"] => self.catalog.source = value.to_string(),
            ["catalog", "timeout_secs"] => {
                self.catalog.timeout_secs = parse_value("timeout", value)?;
            }

            ["search", "radius_km"] => {
                let radius: f64 = parse_value("radius", value)?;
                SearchRadius::new(radius).map_err(|e| Error::Config(e.to_string()))?;
                self.search.radius_km = radius;
            }
            ["search", "max_listed"] => {
                self.search.max_listed = parse_value("max_listed", value)?;
            }

            ["geolocation", "enable_high_accuracy"] => {
                self.geolocation.enable_high_accuracy = parse_value("boolean", value)?;
            }
            ["geolocation", "timeout_ms"] => {
                self.geolocation.timeout_ms = parse_value("timeout", value)?;
            }
            ["geolocation", "max_cached_age_ms"] => {
                self.geolocation.max_cached_age_ms = parse_value("max age", value)?;
            }

            ["places", "api_key"] => self.places.api_key = value.to_string(),
            ["places", "photo_max_width"] => {
                self.places.photo_max_width = parse_value("width", value)?;
            }
            ["places", "photo_max_height"] => {
                self.places.photo_max_height = parse_value("height", value)?;
            }

            ["server", "host"] => self.server.host = value.to_string(),
            ["server", "port"] => self.server.port = parse_value("port", value)?,

            ["location", "default_here"] => {
                self.location.default_here = parse_value("boolean", value)?;
            }

            ["url", "default"] => self.url.default = value.to_string(),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "catalog.source",
            "catalog.timeout_secs",
            "search.radius_km",
            "search.max_listed",
            "geolocation.enable_high_accuracy",
            "geolocation.timeout_ms",
            "geolocation.max_cached_age_ms",
            "places.api_key",
            "places.photo_max_width",
            "places.photo_max_height",
            "server.host",
            "server.port",
            "location.default_here",
            "url.default",
        ]
    }

    /// Format a URL using the specified provider
    ///
    /// Replaces {lat} and {lng} placeholders with actual values
    pub fn format_url(&self, provider: Option<&str>, lat: f64, lng: f64) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &lat.to_string())
            .replace("{lng}", &lng.to_string()))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// The session-wide detection radius
    pub fn search_radius(&self) -> Result<SearchRadius> {
        SearchRadius::new(self.search.radius_km)
    }

    /// Parsed dataset source
    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource::parse(&self.catalog.source)
    }

    /// Options for position requests
    pub fn position_options(&self) -> PositionOptions {
        PositionOptions {
            enable_high_accuracy: self.geolocation.enable_high_accuracy,
            timeout_ms: self.geolocation.timeout_ms,
            max_cached_age_ms: self.geolocation.max_cached_age_ms,
        }
    }

    /// Rendered photo size for detail views
    pub fn photo_size(&self) -> PhotoSize {
        PhotoSize {
            max_width: self.places.photo_max_width,
            max_height: self.places.photo_max_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.search.radius_km, 5.0);
        assert_eq!(config.search.max_listed, 5);
        assert_eq!(config.catalog.source, "https://nm7-map.web.app/areas.json");
        assert_eq!(config.geolocation.timeout_ms, 10_000);
        assert_eq!(config.geolocation.max_cached_age_ms, 0);
        assert!(config.geolocation.enable_high_accuracy);
        assert_eq!(config.server.port, 7878);
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("search.radius_km"), Some("5".to_string()));

        config.set("search.radius_km", "0.5").unwrap();
        assert_eq!(config.get("search.radius_km"), Some("0.5".to_string()));
        assert_eq!(config.search_radius().unwrap().km(), 0.5);

        config.set("places.api_key", "secret").unwrap();
        assert_eq!(config.get("places.api_key"), Some("secret".to_string()));
    }

    #[test]
    fn test_set_rejects_non_positive_radius() {
        let mut config = Config::default();
        assert!(config.set("search.radius_km", "0").is_err());
        assert!(config.set("search.radius_km", "-5").is_err());
        assert!(config.set("search.radius_km", "not_a_number").is_err());
        assert_eq!(config.search.radius_km, 5.0);
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_every_available_key_is_readable() {
        let config = Config::default();
        for key in Config::available_keys() {
            assert!(config.get(key).is_some(), "{} should be readable", key);
        }
    }

    #[test]
    fn test_format_url() {
        let config = Config::default();

        let url = config.format_url(Some("apple"), 35.6586, 139.7454).unwrap();
        assert_eq!(url, "https://maps.apple.com/?ll=35.6586,139.7454");

        let url = config.format_url(None, 35.6586, 139.7454).unwrap();
        assert!(url.contains("google.com"));

        assert!(config.format_url(Some("unknown"), 0.0, 0.0).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("seichi-map").join("config.toml");

        let mut config = Config::default();
        config.search.radius_km = 0.5;
        config.catalog.source = "areas.json".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.search.radius_km, 0.5);
        assert_eq!(loaded.catalog_source(), CatalogSource::File(PathBuf::from("areas.json")));
    }

    #[test]
    fn test_load_creates_default_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.server_addr(), "127.0.0.1:7878");
    }

    #[test]
    fn test_load_rejects_bad_radius() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[search]\nradius_km = -1.0\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[server]\nport = 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.search.radius_km, 5.0);
        assert_eq!(config.places.photo_max_width, 280);
    }

    #[test]
    fn test_serialization_format() {
        let toml = toml::to_string_pretty(&Config::default()).unwrap();

        assert!(toml.contains("[catalog]"));
        assert!(toml.contains("[search]"));
        assert!(toml.contains("[geolocation]"));
        assert!(toml.contains("[url.providers]"));
    }

    #[test]
    fn test_position_options_and_photo_size() {
        let mut config = Config::default();
        config.geolocation.max_cached_age_ms = 60_000;
        config.places.photo_max_width = 640;

        assert_eq!(config.position_options().max_cached_age_ms, 60_000);
        assert_eq!(config.photo_size().max_width, 640);
        assert_eq!(config.photo_size().max_height, 180);
    }
}
