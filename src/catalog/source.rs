//! Dataset sources
//!
//! The dataset is fetched over HTTP(S) or read from a local file.

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::notify::NotificationSink;
use std::fmt;
use std::path::PathBuf;
use tracing::{error, info};

/// Shown once when the dataset cannot be loaded
pub const LOAD_FAILED_NOTICE: &str = "Failed to load site data. Please reload and try again.";

/// Where the dataset comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Url(String),
    File(PathBuf),
}

impl CatalogSource {
    /// Interpret a configured source string
    ///
    /// `http://` and `https://` values are URLs, anything else a file path.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{}", url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Catalog {
    /// Load the catalog from `source`
    ///
    /// Fails with `DataUnavailable` when the source cannot be fetched,
    /// answers with a non-2xx status, or is not a record array.
    pub async fn load(source: &CatalogSource, client: &reqwest::Client) -> Result<Self> {
        let body = match source {
            CatalogSource::Url(url) => fetch_body(url, client).await?,
            CatalogSource::File(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                Error::DataUnavailable(format!("Failed to read {}: {}", path.display(), e))
            })?,
        };

        let catalog = Self::from_json(&body)?;
        info!(
            source = %source,
            records = catalog.len(),
            rejected = catalog.rejected().len(),
            "Loaded site catalog"
        );
        Ok(catalog)
    }

    /// Load the catalog, falling back to an empty one on failure
    ///
    /// A failed load is logged and reported to `sink` exactly once.
    pub async fn load_or_empty(
        source: &CatalogSource,
        client: &reqwest::Client,
        sink: &dyn NotificationSink,
    ) -> Self {
        match Self::load(source, client).await {
            Ok(catalog) => catalog,
            Err(e) => {
                error!(source = %source, "Error loading site data: {}", e);
                sink.show(LOAD_FAILED_NOTICE, false);
                Self::empty()
            }
        }
    }
}

async fn fetch_body(url: &str, client: &reqwest::Client) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::DataUnavailable(format!("Dataset request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(Error::DataUnavailable(format!(
            "Dataset fetch returned status: {}",
            response.status()
        )));
    }

    response
        .text()
        .await
        .map_err(|e| Error::DataUnavailable(format!("Failed to read dataset body: {}", e)))
}
