//! Google Places backend
//!
//! Uses the Places Details API for a site's name and photos. Requires an
//! API key; without one every lookup fails.

use crate::constants::api::{PLACES_DETAILS_URL, PLACES_PHOTO_URL};
use crate::error::{Error, Result};
use crate::places::{PhotoRef, PlaceDetail, PlaceDetailProvider, PlaceDetailRequest};
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

const USER_AGENT: &str = concat!("seichi-map/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Google Places detail backend
#[derive(Debug, Clone)]
pub struct GooglePlacesBackend {
    client: reqwest::Client,
    api_key: String,
    details_url: String,
    photo_url: String,
}

/// Places Details response envelope
#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    #[serde(default)]
    result: Option<DetailsResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    photos: Vec<PhotoEntry>,
}

#[derive(Debug, Deserialize)]
struct PhotoEntry {
    photo_reference: String,
}

impl GooglePlacesBackend {
    /// Create a backend against the public Places endpoints
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_endpoints(api_key, PLACES_DETAILS_URL, PLACES_PHOTO_URL)
    }

    /// Create a backend against custom endpoints (proxies, tests)
    pub fn with_endpoints(
        api_key: impl Into<String>,
        details_url: impl Into<String>,
        photo_url: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            details_url: details_url.into(),
            photo_url: photo_url.into(),
        })
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn photo_ref(&self, reference: &str) -> PhotoRef {
        PhotoRef {
            source: format!(
                "{}?photo_reference={}&key={}",
                self.photo_url,
                urlencoding::encode(reference),
                urlencoding::encode(&self.api_key)
            ),
        }
    }
}

impl PlaceDetailProvider for GooglePlacesBackend {
    async fn fetch(&self, request: &PlaceDetailRequest) -> Result<PlaceDetail> {
        if !self.has_api_key() {
            return Err(Error::DetailFetchFailed(
                "no Places API key configured".to_string(),
            ));
        }

        let url = format!(
            "{}?place_id={}&fields={}&key={}",
            self.details_url,
            urlencoding::encode(&request.reference_id),
            request.field_list(),
            urlencoding::encode(&self.api_key)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::DetailFetchFailed(format!("Places request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::DetailFetchFailed(format!(
                "Places API returned status: {}",
                response.status()
            )));
        }

        let body: DetailsResponse = response.json().await.map_err(|e| {
            Error::DetailFetchFailed(format!("Failed to parse Places response: {}", e))
        })?;

        if body.status != "OK" {
            warn!(
                place_id = %request.reference_id,
                status = %body.status,
                "Place details request failed: {}",
                body.error_message.as_deref().unwrap_or("no message")
            );
            return Err(Error::DetailFetchFailed(body.status));
        }

        let result = body
            .result
            .ok_or_else(|| Error::DetailFetchFailed("OK status without result".to_string()))?;

        Ok(PlaceDetail {
            name: result.name,
            photos: result
                .photos
                .iter()
                .map(|p| self.photo_ref(&p.photo_reference))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend_for(server: &MockServer, key: &str) -> GooglePlacesBackend {
        GooglePlacesBackend::with_endpoints(
            key,
            format!("{}/details/json", server.uri()),
            format!("{}/photo", server.uri()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_ok_with_photos() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/details/json"))
            .and(query_param("place_id", "ChIJabc"))
            .and(query_param("fields", "name,photos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "result": {
                    "name": "Tokyo Tower",
                    "photos": [{"photo_reference": "ref1", "width": 800, "height": 600}]
                }
            })))
            .mount(&server)
            .await;

        let detail = backend_for(&server, "k")
            .fetch(&PlaceDetailRequest::photos("ChIJabc"))
            .await
            .unwrap();

        assert_eq!(detail.name.as_deref(), Some("Tokyo Tower"));
        assert_eq!(detail.photos.len(), 1);
        let url = detail.photos[0].url(280, 180);
        assert!(url.starts_with(&format!("{}/photo?photo_reference=ref1&key=k", server.uri())));
        assert!(url.ends_with("maxwidth=280&maxheight=180"));
    }

    #[tokio::test]
    async fn test_fetch_non_ok_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/details/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "NOT_FOUND", "error_message": "gone"})),
            )
            .mount(&server)
            .await;

        let err = backend_for(&server, "k")
            .fetch(&PlaceDetailRequest::photos("ChIJabc"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DetailFetchFailed(ref s) if s == "NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = backend_for(&server, "k")
            .fetch(&PlaceDetailRequest::photos("ChIJabc"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DetailFetchFailed(_)));
    }

    #[tokio::test]
    async fn test_fetch_without_key_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let backend = backend_for(&server, "");
        assert!(!backend.has_api_key());
        let err = backend
            .fetch(&PlaceDetailRequest::photos("ChIJabc"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DetailFetchFailed(_)));
    }
}
