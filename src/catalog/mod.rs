//! Pilgrimage site catalog
//!
//! The catalog is the ordered list of site records from the dataset feed.
//! It is loaded once and never mutated; a reload replaces it wholesale.
//!
//! Ingestion is strict per record: each array entry either becomes a
//! [`SiteRecord`] or a [`RecordRejection`]. Records whose coordinates are
//! missing, non-numeric or out of range are still kept (for auditing) but
//! are excluded from marker placement and proximity search.

pub mod source;

pub use source::{CatalogSource, LOAD_FAILED_NOTICE};

use crate::constants::sentinel;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

/// A pilgrimage site as published by the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Reference for the place detail lookup; may hold a sentinel
    #[serde(default, rename = "placeId", skip_serializing_if = "Option::is_none")]
    pub place_ref: Option<String>,
    /// `None` when the feed value was missing or not a number
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl SiteRecord {
    /// Validated position, or `None` if the record cannot be placed
    pub fn coordinates(&self) -> Option<Coordinates> {
        let coords = Coordinates::new(self.lat?, self.lng?);
        coords.is_valid().then_some(coords)
    }

    /// The place reference to look up, skipping absent and sentinel values
    pub fn place_lookup_id(&self) -> Option<&str> {
        let value = self.place_ref.as_deref()?.trim();
        if value.is_empty() || is_sentinel(value) {
            None
        } else {
            Some(value)
        }
    }
}

/// Check whether a `placeId` value is a "not found"/"error" marker
pub fn is_sentinel(value: &str) -> bool {
    let lower = value.to_lowercase();
    sentinel::NOT_FOUND.iter().any(|s| lower == s.to_lowercase())
        || sentinel::ERROR_PREFIXES
            .iter()
            .any(|p| lower.starts_with(&p.to_lowercase()))
}

/// True iff both coordinates are present, numeric and within range
pub fn validate(record: &SiteRecord) -> bool {
    record.coordinates().is_some()
}

/// A dataset entry that could not become a [`SiteRecord`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordRejection {
    /// Position in the source array
    pub index: usize,
    pub reason: String,
}

/// Wire shape of a dataset entry; field names vary between deployments
///
/// Every field is read as a raw value; only `id` and `title` can reject a
/// record. Alternate spellings are separate fields and the first listed wins.
#[derive(Debug, Deserialize)]
struct RawSite {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    description: Option<Value>,
    #[serde(default, rename = "placeId")]
    place_id_camel: Option<Value>,
    #[serde(default)]
    place_id: Option<Value>,
    #[serde(default)]
    lat: Option<Value>,
    #[serde(default)]
    latitude: Option<Value>,
    #[serde(default)]
    lng: Option<Value>,
    #[serde(default)]
    lon: Option<Value>,
    #[serde(default)]
    longitude: Option<Value>,
}

/// First non-null value among alternate spellings
fn first_present(candidates: impl IntoIterator<Item = Option<Value>>) -> Option<Value> {
    candidates.into_iter().flatten().find(|v| !v.is_null())
}

/// Keep a string field; anything else is logged and treated as absent
fn optional_text(id: &str, field: &str, value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::String(_) | Value::Null => None,
        other => {
            warn!(id, field, value = %other, "Ignoring non-string field");
            None
        }
    }
}

impl TryFrom<RawSite> for SiteRecord {
    type Error = Error;

    fn try_from(raw: RawSite) -> Result<Self> {
        let id = match raw.id {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) if !other.is_null() => {
                return Err(Error::InvalidRecord(format!("unsupported id value: {}", other)))
            }
            _ => return Err(Error::InvalidRecord("missing id".to_string())),
        };

        let title = match raw.title {
            Some(Value::String(t)) if !t.trim().is_empty() => t,
            _ => return Err(Error::InvalidRecord(format!("site {} has no title", id))),
        };

        let place_ref = first_present([raw.place_id_camel, raw.place_id]);
        let lat = first_present([raw.lat, raw.latitude]);
        let lng = first_present([raw.lng, raw.lon, raw.longitude]);

        Ok(SiteRecord {
            description: optional_text(&id, "description", raw.description),
            place_ref: optional_text(&id, "placeId", place_ref),
            lat: lat.as_ref().and_then(Value::as_f64),
            lng: lng.as_ref().and_then(Value::as_f64),
            id,
            title,
        })
    }
}

/// Parse one array entry
fn parse_entry(entry: Value) -> Result<SiteRecord> {
    if !entry.is_object() {
        return Err(Error::InvalidRecord(format!(
            "expected an object, got {}",
            entry
        )));
    }
    let raw: RawSite = serde_json::from_value(entry)
        .map_err(|e| Error::InvalidRecord(e.to_string()))?;
    SiteRecord::try_from(raw)
}

/// Loaded site catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<SiteRecord>,
    rejected: Vec<RecordRejection>,
}

impl Catalog {
    /// An empty catalog (the fallback when the dataset is unavailable)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from already-typed records
    ///
    /// Duplicate ids are rejected the same way as during JSON ingestion.
    pub fn from_records(records: Vec<SiteRecord>) -> Self {
        Self::ingest(records.into_iter().map(Ok))
    }

    /// Parse a dataset body
    ///
    /// Fails with `DataUnavailable` only when the body is not a JSON array;
    /// individual bad entries are rejected and logged.
    pub fn from_json(body: &str) -> Result<Self> {
        let entries: Vec<Value> = serde_json::from_str(body).map_err(|e| {
            Error::DataUnavailable(format!("dataset is not a record array: {}", e))
        })?;

        Ok(Self::ingest(entries.into_iter().map(parse_entry)))
    }

    fn ingest(entries: impl Iterator<Item = Result<SiteRecord>>) -> Self {
        let mut records = Vec::new();
        let mut rejected = Vec::new();
        let mut seen = HashSet::new();

        for (index, entry) in entries.enumerate() {
            let record = match entry {
                Ok(record) if !seen.contains(&record.id) => record,
                Ok(record) => {
                    let reason = format!("duplicate id {}", record.id);
                    warn!(index, "Skipping record: {}", reason);
                    rejected.push(RecordRejection { index, reason });
                    continue;
                }
                Err(e) => {
                    warn!(index, "Skipping record: {}", e);
                    rejected.push(RecordRejection {
                        index,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if !validate(&record) {
                warn!(
                    id = %record.id,
                    lat = ?record.lat,
                    lng = ?record.lng,
                    "Invalid or missing lat/lng for {}; it will not be placed",
                    record.title
                );
            }

            seen.insert(record.id.clone());
            records.push(record);
        }

        Self { records, rejected }
    }

    /// All records in feed order, including unplaceable ones
    pub fn records(&self) -> &[SiteRecord] {
        &self.records
    }

    /// Records with valid coordinates, in feed order
    pub fn placeable(&self) -> impl Iterator<Item = (&SiteRecord, Coordinates)> {
        self.records
            .iter()
            .filter_map(|r| r.coordinates().map(|c| (r, c)))
    }

    /// Records kept for auditing but excluded from spatial operations
    pub fn invalid(&self) -> impl Iterator<Item = &SiteRecord> {
        self.records.iter().filter(|r| !validate(r))
    }

    /// Entries dropped during ingestion
    pub fn rejected(&self) -> &[RecordRejection] {
        &self.rejected
    }

    /// Get a record by id
    pub fn get(&self, id: &str) -> Option<&SiteRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a record with the given position (test helper shared across modules)
    pub(crate) fn site(id: &str, lat: f64, lng: f64) -> SiteRecord {
        SiteRecord {
            id: id.to_string(),
            title: format!("Site {}", id),
            description: None,
            place_ref: None,
            lat: Some(lat),
            lng: Some(lng),
        }
    }

    const FEED: &str = r#"[
        {"id": "1", "title": "Tokyo Tower", "description": "Red tower", "placeId": "ChIJCewJkL2LGGAR3Qmk0vCTGkg", "lat": 35.6586, "lng": 139.7454},
        {"id": "2", "title": "Broken", "placeId": "該当なし", "lat": 200, "lng": 139.0},
        {"id": 3, "title": "Numeric id", "latitude": 34.0, "longitude": 135.0},
        {"id": "4", "title": "Stringly", "lat": "35.0", "lng": 139.0},
        {"title": "No id", "lat": 1.0, "lng": 1.0},
        {"id": "5", "lat": 1.0, "lng": 1.0},
        {"id": "1", "title": "Duplicate", "lat": 1.0, "lng": 1.0},
        "not an object"
    ]"#;

    #[test]
    fn test_from_json_keeps_order_and_rejects_bad_entries() {
        let catalog = Catalog::from_json(FEED).unwrap();

        let ids: Vec<&str> = catalog.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);

        let rejected: Vec<usize> = catalog.rejected().iter().map(|r| r.index).collect();
        assert_eq!(rejected, vec![4, 5, 6, 7]);
        assert!(catalog.rejected()[2].reason.contains("duplicate"));
    }

    #[test]
    fn test_bad_optional_fields_do_not_reject_record() {
        let feed = r#"[
            {"id": "a", "title": "A", "placeId": 12345, "description": ["x"], "lat": 35.0, "lng": 139.0},
            {"id": "b", "title": "B", "placeId": "ChIJb", "place_id": "ChIJother", "lat": 35.1, "lng": 139.1},
            {"id": "c", "title": "C", "lat": 35.2, "latitude": 99.0, "lng": 139.2},
            {"id": "d", "title": 42, "lat": 35.3, "lng": 139.3}
        ]"#;
        let catalog = Catalog::from_json(feed).unwrap();

        let a = catalog.get("a").unwrap();
        assert_eq!(a.place_ref, None);
        assert_eq!(a.description, None);
        assert!(a.coordinates().is_some());

        assert_eq!(catalog.get("b").unwrap().place_ref.as_deref(), Some("ChIJb"));
        assert_eq!(catalog.get("c").unwrap().lat, Some(35.2));

        // Title is required and must be text
        assert!(catalog.get("d").is_none());
        assert_eq!(catalog.rejected().len(), 1);
        assert_eq!(catalog.rejected()[0].index, 3);

        let placeable: Vec<&str> = catalog.placeable().map(|(r, _)| r.id.as_str()).collect();
        assert_eq!(placeable, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_field_aliases() {
        let catalog = Catalog::from_json(FEED).unwrap();
        let record = catalog.get("3").unwrap();
        assert_eq!(record.lat, Some(34.0));
        assert_eq!(record.lng, Some(135.0));
    }

    #[test]
    fn test_invalid_coordinates_retained_but_not_placeable() {
        let catalog = Catalog::from_json(FEED).unwrap();

        let broken = catalog.get("2").unwrap();
        assert_eq!(broken.lat, Some(200.0));
        assert!(!validate(broken));

        // Non-numeric latitude is treated as absent
        let stringly = catalog.get("4").unwrap();
        assert_eq!(stringly.lat, None);
        assert!(!validate(stringly));

        let placeable: Vec<&str> = catalog.placeable().map(|(r, _)| r.id.as_str()).collect();
        assert_eq!(placeable, vec!["1", "3"]);
        assert_eq!(catalog.invalid().count(), 2);
    }

    #[test]
    fn test_not_an_array_is_data_unavailable() {
        let err = Catalog::from_json(r#"{"sites": []}"#).unwrap_err();
        assert!(matches!(err, Error::DataUnavailable(_)));

        let err = Catalog::from_json("<html>502</html>").unwrap_err();
        assert!(matches!(err, Error::DataUnavailable(_)));
    }

    #[test]
    fn test_empty_array() {
        let catalog = Catalog::from_json("[]").unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.rejected().is_empty());
    }

    #[test]
    fn test_place_lookup_id() {
        let mut record = site("a", 0.0, 0.0);
        assert_eq!(record.place_lookup_id(), None);

        record.place_ref = Some("ChIJ123".to_string());
        assert_eq!(record.place_lookup_id(), Some("ChIJ123"));

        for value in ["該当なし", "Not Found", "エラー: ZERO_RESULTS", "error: timeout", "  "] {
            record.place_ref = Some(value.to_string());
            assert_eq!(record.place_lookup_id(), None, "{:?} should be skipped", value);
        }
    }

    #[test]
    fn test_validate_boundaries() {
        assert!(validate(&site("a", 90.0, 180.0)));
        assert!(validate(&site("b", -90.0, -180.0)));
        assert!(!validate(&site("c", 90.0001, 0.0)));
        assert!(!validate(&site("d", 0.0, -180.0001)));
    }

    #[test]
    fn test_from_records_rejects_duplicates() {
        let catalog = Catalog::from_records(vec![site("a", 0.0, 0.0), site("a", 1.0, 1.0)]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.rejected().len(), 1);
        assert_eq!(catalog.get("a").unwrap().lat, Some(0.0));
    }

    #[test]
    fn test_serializes_with_wire_names() {
        let mut record = site("a", 1.5, 2.5);
        record.place_ref = Some("ChIJ".to_string());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["placeId"], "ChIJ");
        assert_eq!(json["lat"], 1.5);
        assert!(json.get("description").is_none());
    }
}
