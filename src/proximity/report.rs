//! Nearby search report and its user-facing summary

use crate::catalog::Catalog;
use crate::coord::Coordinates;
use crate::proximity::{find_nearby, ProximityResult, SearchRadius};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of one proximity check
#[derive(Debug, Clone, Serialize)]
pub struct NearbyReport<'a> {
    pub reference: Coordinates,
    pub radius_km: f64,
    pub results: Vec<ProximityResult<'a>>,
    pub generated_at: DateTime<Utc>,
}

impl<'a> NearbyReport<'a> {
    /// Run a search and wrap the results
    pub fn search(catalog: &'a Catalog, reference: Coordinates, radius: SearchRadius) -> Self {
        Self {
            reference,
            radius_km: radius.km(),
            results: find_nearby(catalog, reference, radius),
            generated_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Nearest result, if any
    pub fn nearest(&self) -> Option<&ProximityResult<'a>> {
        self.results.first()
    }

    /// Banner text for this report
    ///
    /// Returns the message and whether it is multiline. At most `max_listed`
    /// sites are named; the rest are counted.
    pub fn summary(&self, max_listed: usize) -> (String, bool) {
        if self.results.is_empty() {
            return (
                format!(
                    "No sites found within {} km of your location.",
                    self.radius_km
                ),
                false,
            );
        }

        let mut message = format!("Nearby sites (within {} km):\n", self.radius_km);
        for result in self.results.iter().take(max_listed) {
            message.push_str(&format!(
                "- {} (about {:.1} km)\n",
                result.site.title, result.distance_km
            ));
        }
        if self.results.len() > max_listed {
            message.push_str(&format!("and {} more...", self.results.len() - max_listed));
        }

        (message, true)
    }
}
