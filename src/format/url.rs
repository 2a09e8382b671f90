//! URL output formatter

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::OutputFormatter;
use crate::proximity::NearbyReport;

/// URL formatter - map link for the nearest site
pub struct UrlFormatter;

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Map URL for the nearest site"
    }

    fn format(&self, report: &NearbyReport<'_>, config: &Config) -> Result<String> {
        let nearest = report.nearest().ok_or_else(|| {
            Error::Config(format!(
                "No sites within {} km to link to",
                report.radius_km
            ))
        })?;

        let (Some(lat), Some(lng)) = (nearest.site.lat, nearest.site.lng) else {
            return Err(Error::InvalidCoordinates(format!(
                "site {} has no position",
                nearest.site.id
            )));
        };

        config.format_url(None, lat, lng)
    }
}
