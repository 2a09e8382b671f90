//! Place detail lookups
//!
//! Sites may carry a reference into an external place directory; the
//! directory supplies the site's name and photos for the detail view.

pub mod google;

pub use google::GooglePlacesBackend;

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Fields to request from the place directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceField {
    Name,
    Photos,
}

impl PlaceField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Photos => "photos",
        }
    }
}

/// A place detail request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceDetailRequest {
    pub reference_id: String,
    pub fields: Vec<PlaceField>,
}

impl PlaceDetailRequest {
    /// Request name and photos for `reference_id`
    pub fn photos(reference_id: impl Into<String>) -> Self {
        Self {
            reference_id: reference_id.into(),
            fields: vec![PlaceField::Name, PlaceField::Photos],
        }
    }

    /// Comma-separated field list for query strings
    pub fn field_list(&self) -> String {
        self.fields
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// A photo that can be rendered at a requested size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef {
    /// Photo URL without size parameters
    pub source: String,
}

impl PhotoRef {
    /// URL for the photo scaled to fit `max_width` x `max_height`
    pub fn url(&self, max_width: u32, max_height: u32) -> String {
        let sep = if self.source.contains('?') { '&' } else { '?' };
        format!(
            "{}{}maxwidth={}&maxheight={}",
            self.source, sep, max_width, max_height
        )
    }
}

/// Successful place detail response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceDetail {
    pub name: Option<String>,
    pub photos: Vec<PhotoRef>,
}

/// Trait for place detail backends
///
/// Failures (non-OK status, missing payload, transport errors) are
/// reported as `Error::DetailFetchFailed`.
pub trait PlaceDetailProvider: Send + Sync {
    fn fetch(
        &self,
        request: &PlaceDetailRequest,
    ) -> impl std::future::Future<Output = Result<PlaceDetail>> + Send;
}
