//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants::api::DEFAULT_DATASET_URL;

/// Default dataset source (URL or file path)
pub const DEFAULT_CATALOG_SOURCE: &str = DEFAULT_DATASET_URL;

/// Default dataset fetch timeout in seconds
pub const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 10;

/// Default detection radius in kilometers
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// Default number of sites named in the nearby summary
pub const DEFAULT_MAX_LISTED: usize = 5;

/// Default geolocation high-accuracy flag
pub const DEFAULT_ENABLE_HIGH_ACCURACY: bool = true;

/// Default geolocation timeout in milliseconds
pub const DEFAULT_GEOLOCATION_TIMEOUT_MS: u64 = 10_000;

/// Default maximum age of a cached position in milliseconds
pub const DEFAULT_MAX_CACHED_AGE_MS: u64 = 0;

/// Default photo size in pixels
pub const DEFAULT_PHOTO_MAX_WIDTH: u32 = 280;
pub const DEFAULT_PHOTO_MAX_HEIGHT: u32 = 180;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "google";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "seichi-map";
