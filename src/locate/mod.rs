//! Current position lookup
//!
//! The geolocation source supplies the user's position for proximity
//! checks. It may be unavailable, refuse, or time out; each failure is a
//! single error the caller reports once.

pub mod ip_location;

pub use ip_location::{IpLocation, IpLocator};

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Position request options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionOptions {
    /// Prefer a precise fix over a fast one (advisory)
    pub enable_high_accuracy: bool,
    /// Give up after this long; 0 disables the limit
    pub timeout_ms: u64,
    /// Accept a cached position at most this old; 0 always asks fresh
    pub max_cached_age_ms: u64,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout_ms: 10_000,
            max_cached_age_ms: 0,
        }
    }
}

/// Trait for position sources
pub trait GeolocationSource: Send + Sync {
    /// Resolve the current position
    fn current_position(
        &self,
        options: &PositionOptions,
    ) -> impl std::future::Future<Output = Result<Coordinates>> + Send;
}

/// The position sources the CLI and server can be configured with
#[derive(Debug)]
pub enum Locator {
    /// A position given up front (e.g. `--lat/--lng`)
    Fixed(Coordinates),
    /// IP-based lookup
    Ip(IpLocator),
    /// No position source at all
    Disabled,
}

impl GeolocationSource for Locator {
    async fn current_position(&self, options: &PositionOptions) -> Result<Coordinates> {
        match self {
            Self::Fixed(coords) => {
                coords.validate()?;
                Ok(*coords)
            }
            Self::Ip(locator) => locator.current_position(options).await,
            Self::Disabled => Err(Error::GeolocationUnavailable(
                "no position source is available".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_locator() {
        let locator = Locator::Fixed(Coordinates::new(35.681236, 139.767125));
        let coords = locator
            .current_position(&PositionOptions::default())
            .await
            .unwrap();
        assert_eq!(coords.lat, 35.681236);
    }

    #[tokio::test]
    async fn test_fixed_locator_rejects_out_of_range() {
        let locator = Locator::Fixed(Coordinates::new(200.0, 0.0));
        let err = locator
            .current_position(&PositionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinates(_)));
    }

    #[tokio::test]
    async fn test_disabled_locator() {
        let err = Locator::Disabled
            .current_position(&PositionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::GeolocationUnavailable(_)));
        assert!(err.is_geolocation());
    }
}
