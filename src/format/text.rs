//! Human-readable text output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::proximity::NearbyReport;

/// Text formatter - the same summary the banner shows, with a header
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable summary"
    }

    fn format(&self, report: &NearbyReport<'_>, config: &Config) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!("Position: {}\n", report.reference));
        output.push_str(&format!("Radius: {} km\n\n", report.radius_km));

        let (summary, _) = report.summary(config.search.max_listed);
        output.push_str(summary.trim_end());
        output.push('\n');

        Ok(output)
    }
}
