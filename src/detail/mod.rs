//! Active detail tracking
//!
//! At most one site detail view is open at a time. Opening a site closes
//! the previous one first. Each open is stamped with a new generation
//! number; asynchronous photo enrichment carries the generation it was
//! issued for and is dropped if that detail is no longer the open one.
//!
//! ```text
//! Closed --select(x)--> Open(x) --select(y)--> Open(y)
//!                         |
//!                      dismiss
//!                         v
//!                       Closed
//! ```

use crate::catalog::SiteRecord;
use crate::error::Result;
use crate::places::{PlaceDetail, PlaceDetailRequest};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Photo area of a detail view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhotoSlot {
    /// Enrichment request in flight
    Loading,
    Photo { url: String, alt: String },
    /// No reference to look up, or the place has no photos
    NoPhoto,
    /// The lookup failed
    Unavailable { reason: String },
}

impl PhotoSlot {
    /// Placeholder text shown in place of an image
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some("Loading photo..."),
            Self::Photo { .. } => None,
            Self::NoPhoto => Some("No photo available."),
            Self::Unavailable { .. } => Some("Photo details unavailable."),
        }
    }
}

/// Contents of the open detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailView {
    pub site_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Name reported by the place directory, once enrichment lands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_name: Option<String>,
    pub photo: PhotoSlot,
    /// Text shown in place of the image; follows `photo`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub generation: u64,
}

impl DetailView {
    fn set_photo(&mut self, photo: PhotoSlot) {
        self.placeholder = photo.placeholder().map(str::to_string);
        self.photo = photo;
    }
}

/// Issued on open when a photo lookup is needed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentTicket {
    pub site_id: String,
    pub generation: u64,
    pub request: PlaceDetailRequest,
}

/// What happened to an enrichment result or an open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Enrichment {
    /// Result merged into the open view
    Applied,
    /// The ticket's detail was closed or replaced; result dropped
    Discarded,
    /// No lookup was needed
    Skipped,
}

/// Maximum rendered photo size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoSize {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for PhotoSize {
    fn default() -> Self {
        Self {
            max_width: 280,
            max_height: 180,
        }
    }
}

/// Single-slot detail state machine
#[derive(Debug, Default)]
pub struct DetailTracker {
    open: Option<DetailView>,
    generation: u64,
    photo_size: PhotoSize,
}

impl DetailTracker {
    pub fn new(photo_size: PhotoSize) -> Self {
        Self {
            open: None,
            generation: 0,
            photo_size,
        }
    }

    /// The open detail view, if any
    pub fn current(&self) -> Option<&DetailView> {
        self.open.as_ref()
    }

    /// Whether `site_id` is the open detail
    pub fn is_open_for(&self, site_id: &str) -> bool {
        self.open.as_ref().is_some_and(|v| v.site_id == site_id)
    }

    /// Open the detail view for `site`
    ///
    /// Any open detail is torn down first. Returns a ticket when the photo
    /// has to be looked up; otherwise the photo slot is already final.
    pub fn select(&mut self, site: &SiteRecord) -> Option<EnrichmentTicket> {
        self.teardown();

        self.generation += 1;
        let lookup = site.place_lookup_id();

        let mut view = DetailView {
            site_id: site.id.clone(),
            title: site.title.clone(),
            description: site.description.clone(),
            place_name: None,
            photo: PhotoSlot::Loading,
            placeholder: None,
            generation: self.generation,
        };
        view.set_photo(if lookup.is_some() {
            PhotoSlot::Loading
        } else {
            PhotoSlot::NoPhoto
        });
        self.open = Some(view);

        match lookup {
            Some(reference_id) => Some(EnrichmentTicket {
                site_id: site.id.clone(),
                generation: self.generation,
                request: PlaceDetailRequest::photos(reference_id),
            }),
            None => {
                warn!(id = %site.id, "No place reference for {}; cannot fetch photos", site.title);
                None
            }
        }
    }

    /// Close the open detail; returns false if nothing was open
    pub fn dismiss(&mut self) -> bool {
        self.teardown()
    }

    /// Merge an enrichment result for `ticket`
    ///
    /// Results for a detail that is no longer open are discarded without
    /// side effects.
    pub fn complete(&mut self, ticket: &EnrichmentTicket, outcome: Result<PlaceDetail>) -> Enrichment {
        let photo_size = self.photo_size;
        let Some(view) = self
            .open
            .as_mut()
            .filter(|v| v.generation == ticket.generation && v.site_id == ticket.site_id)
        else {
            debug!(
                site_id = %ticket.site_id,
                generation = ticket.generation,
                "Discarding stale place detail result"
            );
            return Enrichment::Discarded;
        };

        match outcome {
            Ok(detail) => {
                let photo = match detail.photos.first() {
                    Some(photo) => PhotoSlot::Photo {
                        url: photo.url(photo_size.max_width, photo_size.max_height),
                        alt: detail.name.clone().unwrap_or_else(|| view.title.clone()),
                    },
                    None => PhotoSlot::NoPhoto,
                };
                view.set_photo(photo);
                view.place_name = detail.name;
            }
            Err(e) => {
                warn!(
                    site_id = %ticket.site_id,
                    place_id = %ticket.request.reference_id,
                    "Place details (photos) request failed for {}: {}",
                    view.title,
                    e
                );
                view.set_photo(PhotoSlot::Unavailable {
                    reason: e.to_string(),
                });
            }
        }

        Enrichment::Applied
    }

    fn teardown(&mut self) -> bool {
        match self.open.take() {
            Some(view) => {
                debug!(site_id = %view.site_id, generation = view.generation, "Closed detail");
                true
            }
            None => false,
        }
    }
}
