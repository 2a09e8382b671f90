//! Proximity search
//!
//! Finds the catalog sites within a radius of a reference point, nearest
//! first. Search is pure: it only reads the catalog.

pub mod report;

pub use report::NearbyReport;

use crate::catalog::{Catalog, SiteRecord};
use crate::coord::{distance_km, Coordinates};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Search radius in kilometers (always > 0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SearchRadius(f64);

impl SearchRadius {
    pub fn new(km: f64) -> Result<Self> {
        if !km.is_finite() || km <= 0.0 {
            return Err(Error::InvalidRadius(format!(
                "Radius must be a positive number of kilometers, got {}",
                km
            )));
        }
        Ok(Self(km))
    }

    pub fn km(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for SearchRadius {
    type Error = Error;

    fn try_from(km: f64) -> Result<Self> {
        Self::new(km)
    }
}

impl From<SearchRadius> for f64 {
    fn from(radius: SearchRadius) -> f64 {
        radius.0
    }
}

impl std::fmt::Display for SearchRadius {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}km", self.0)
    }
}

/// A site with its distance from the reference point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityResult<'a> {
    #[serde(flatten)]
    pub site: &'a SiteRecord,
    pub distance_km: f64,
}

/// Sites within `radius` of `reference`, nearest first
///
/// Records without valid coordinates are never considered. Equal distances
/// keep their catalog order.
pub fn find_nearby(
    catalog: &Catalog,
    reference: Coordinates,
    radius: SearchRadius,
) -> Vec<ProximityResult<'_>> {
    let mut results: Vec<ProximityResult<'_>> = catalog
        .placeable()
        .map(|(site, coords)| ProximityResult {
            site,
            distance_km: distance_km(reference, coords),
        })
        .filter(|r| r.distance_km <= radius.km())
        .collect();

    // `sort_by` is stable
    results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    results
}
