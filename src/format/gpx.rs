//! GPX output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::proximity::NearbyReport;

/// GPX formatter - one waypoint per nearby site plus the search position
pub struct GpxFormatter;

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX waypoint file"
    }

    fn format(&self, report: &NearbyReport<'_>, _config: &Config) -> Result<String> {
        let mut gpx = String::new();

        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="seichi-map">"#);
        gpx.push('\n');

        gpx.push_str("  <metadata>\n");
        gpx.push_str("    <name>Nearby pilgrimage sites</name>\n");
        gpx.push_str(&format!("    <time>{}</time>\n", report.generated_at.to_rfc3339()));
        gpx.push_str("  </metadata>\n");

        gpx.push_str(&format!(
            r#"  <wpt lat="{}" lon="{}">"#,
            report.reference.lat, report.reference.lng
        ));
        gpx.push('\n');
        gpx.push_str("    <name>Current position</name>\n");
        gpx.push_str(&format!(
            "    <desc>Search radius: {} km</desc>\n",
            report.radius_km
        ));
        gpx.push_str("  </wpt>\n");

        for result in &report.results {
            // Only placeable sites reach a report
            let (Some(lat), Some(lng)) = (result.site.lat, result.site.lng) else {
                continue;
            };
            gpx.push_str(&format!(r#"  <wpt lat="{}" lon="{}">"#, lat, lng));
            gpx.push('\n');
            gpx.push_str(&format!("    <name>{}</name>\n", escape_xml(&result.site.title)));
            let desc = match &result.site.description {
                Some(d) => format!("{:.1} km away. {}", result.distance_km, d),
                None => format!("{:.1} km away", result.distance_km),
            };
            gpx.push_str(&format!("    <desc>{}</desc>\n", escape_xml(&desc)));
            gpx.push_str("  </wpt>\n");
        }

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}
