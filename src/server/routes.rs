//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::catalog::SiteRecord;
use crate::coord::Coordinates;
use crate::detail::{DetailView, Enrichment};
use crate::error::Error;
use crate::locate::Locator;
use crate::notify::Notice;
use crate::server::state::AppState;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/sites", get(sites_handler))
        .route("/api/sites/:id", get(site_handler))
        .route("/api/sites/:id/select", post(select_handler))
        .route("/api/detail", get(detail_handler).delete(dismiss_handler))
        .route("/api/nearby", get(nearby_handler))
        .route("/api/banner", get(banner_handler))
        .route("/api/location", get(location_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn new(code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::InvalidRadius(_) => "INVALID_RADIUS",
            Error::UnknownSite(_) => "NOT_FOUND",
            Error::DataUnavailable(_) => "DATA_UNAVAILABLE",
            e if e.is_geolocation() => "LOCATION_ERROR",
            _ => "INTERNAL_ERROR",
        };
        ApiError::new(code, err.to_string())
    }
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

fn not_found(id: &str) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::new("NOT_FOUND", format!("Site not found: {}", id))),
    )
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    pub version: String,
    /// Records in the catalog, including unplaceable ones
    pub sites: usize,
    /// Records that can be placed on the map
    pub placeable: usize,
    /// Dataset entries dropped during ingestion
    pub rejected: usize,
    pub radius_km: f64,
    pub detail_open: bool,
    pub photos_enabled: bool,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let catalog = state.session.catalog();

    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        sites: catalog.len(),
        placeable: catalog.placeable().count(),
        rejected: catalog.rejected().len(),
        radius_km: state.session.radius().km(),
        detail_open: state.session.current_detail().await.is_some(),
        photos_enabled: state.places.has_api_key(),
    })
}

/// A site as placed on the map
#[derive(Debug, Serialize, Deserialize)]
pub struct SiteMarker {
    pub id: String,
    pub title: String,
    pub lat: f64,
    pub lng: f64,
}

/// List placeable sites
///
/// GET /api/sites
async fn sites_handler(State(state): State<Arc<AppState>>) -> Json<Vec<SiteMarker>> {
    let markers = state
        .session
        .markers()
        .map(|(site, coords)| SiteMarker {
            id: site.id.clone(),
            title: site.title.clone(),
            lat: coords.lat,
            lng: coords.lng,
        })
        .collect();

    Json(markers)
}

/// Get one site record (placeable or not)
///
/// GET /api/sites/:id
async fn site_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SiteRecord>> {
    state
        .session
        .catalog()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

/// Select response
#[derive(Debug, Serialize)]
pub struct SelectResponse {
    pub enrichment: Enrichment,
    /// The open detail after the selection settled
    pub detail: Option<DetailView>,
}

/// Open a site's detail view, fetching its photo
///
/// POST /api/sites/:id/select
async fn select_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SelectResponse>> {
    let enrichment = state
        .session
        .open_detail(&id, &state.places)
        .await
        .map_err(|e| match e {
            Error::UnknownSite(_) => not_found(&id),
            other => (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiError::from(other))),
        })?;

    Ok(Json(SelectResponse {
        enrichment,
        detail: state.session.current_detail().await,
    }))
}

/// Get the open detail view (null when closed)
///
/// GET /api/detail
async fn detail_handler(State(state): State<Arc<AppState>>) -> Json<Option<DetailView>> {
    Json(state.session.current_detail().await)
}

/// Close the open detail view
///
/// DELETE /api/detail
async fn dismiss_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.session.dismiss_detail().await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Nearby query parameters
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Check for sites near a position
///
/// GET /api/nearby?lat=..&lng=..
///
/// Without coordinates the server's own position source is used. The
/// banner is updated either way.
async fn nearby_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NearbyQuery>,
) -> Response {
    let report = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => {
            let reference = Coordinates::new(lat, lng);
            if let Err(e) = reference.validate() {
                return ApiError::from(e).into_response();
            }
            state.session.check_proximity(&Locator::Fixed(reference)).await
        }
        (None, None) => state.session.check_proximity(&state.locator).await,
        _ => {
            return ApiError::new("INVALID_COORDINATES", "Both lat and lng are required")
                .into_response();
        }
    };

    match report {
        Ok(report) => Json(report).into_response(),
        Err(notice) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new("PROXIMITY_UNAVAILABLE", notice)),
        )
            .into_response(),
    }
}

/// Get the current banner notice (null when none)
///
/// GET /api/banner
async fn banner_handler(State(state): State<Arc<AppState>>) -> Json<Option<Notice>> {
    Json(state.banner.current())
}

/// Get the server-side position
///
/// GET /api/location
async fn location_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Coordinates>> {
    state
        .session
        .locate(&state.locator)
        .await
        .map(Json)
        .map_err(|notice| {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiError::new("LOCATION_ERROR", notice)),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::Config;
    use crate::notify::BannerSlot;
    use crate::places::GooglePlacesBackend;
    use crate::session::Session;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    const FEED: &str = r#"[
        {"id": "tower", "title": "Tokyo Tower", "placeId": "ChIJtower", "lat": 35.6586, "lng": 139.7454},
        {"id": "kanda", "title": "Kanda Shrine", "description": "Shrine", "lat": 35.7019, "lng": 139.7679},
        {"id": "broken", "title": "Broken", "lat": 200, "lng": 139.0},
        {"id": "kyoto", "title": "Fushimi Inari", "placeId": "該当なし", "lat": 34.9671, "lng": 135.7727}
    ]"#;

    fn create_test_state_with(locator: Locator) -> Arc<AppState> {
        let banner = Arc::new(BannerSlot::new());
        let session = Session::with_catalog(
            Config::default(),
            Catalog::from_json(FEED).unwrap(),
            banner.clone(),
        )
        .unwrap();
        // No API key: photo lookups fail locally without network access
        let places = GooglePlacesBackend::new("").unwrap();
        Arc::new(AppState::new(session, banner, places, locator))
    }

    fn create_test_state() -> Arc<AppState> {
        create_test_state_with(Locator::Fixed(Coordinates::new(35.681236, 139.767125)))
    }

    async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let app = create_router(create_test_state());
        let (status, body) = send(app, "GET", "/api/status").await;

        assert_eq!(status, StatusCode::OK);
        let status: StatusResponse = serde_json::from_value(body).unwrap();
        assert!(status.running);
        assert_eq!(status.sites, 4);
        assert_eq!(status.placeable, 3);
        assert_eq!(status.radius_km, 5.0);
        assert!(!status.detail_open);
        assert!(!status.photos_enabled);
    }

    #[tokio::test]
    async fn test_sites_excludes_invalid_coordinates() {
        let state = create_test_state();
        let (status, body) = send(create_router(state.clone()), "GET", "/api/sites").await;

        assert_eq!(status, StatusCode::OK);
        let markers: Vec<SiteMarker> = serde_json::from_value(body).unwrap();
        let ids: Vec<&str> = markers.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["tower", "kanda", "kyoto"]);

        // Still retrievable by id
        let (status, body) = send(create_router(state), "GET", "/api/sites/broken").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lat"], 200.0);
    }

    #[tokio::test]
    async fn test_site_not_found() {
        let app = create_router(create_test_state());
        let (status, body) = send(app, "GET", "/api/sites/nope").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_nearby_with_coordinates() {
        let state = create_test_state();
        let (status, body) = send(
            create_router(state.clone()),
            "GET",
            "/api/nearby?lat=35.681236&lng=139.767125",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["kanda", "tower"]);

        let notice = state.banner.current().unwrap();
        assert!(notice.multiline);
        assert!(notice.message.contains("Kanda Shrine"));
    }

    #[tokio::test]
    async fn test_nearby_uses_server_locator() {
        let app = create_router(create_test_state_with(Locator::Fixed(Coordinates::new(
            34.9671, 135.7727,
        ))));
        let (status, body) = send(app, "GET", "/api/nearby").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"][0]["id"], "kyoto");
    }

    #[tokio::test]
    async fn test_nearby_invalid_coordinates() {
        let app = create_router(create_test_state());
        let (status, body) = send(app, "GET", "/api/nearby?lat=200&lng=139.0").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_COORDINATES");

        let app = create_router(create_test_state());
        let (status, _) = send(app, "GET", "/api/nearby?lat=35.0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_nearby_without_position_source() {
        let state = create_test_state_with(Locator::Disabled);
        let (status, body) = send(create_router(state.clone()), "GET", "/api/nearby").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "PROXIMITY_UNAVAILABLE");
        assert_eq!(state.banner.shown(), 1);

        let (status, banner) = send(create_router(state), "GET", "/api/banner").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(banner["message"], body["error"]);
    }

    #[tokio::test]
    async fn test_select_detail_lifecycle() {
        let state = create_test_state();

        // placeId present but no API key: photo region reports failure
        let (status, body) =
            send(create_router(state.clone()), "POST", "/api/sites/tower/select").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["enrichment"], "applied");
        assert_eq!(body["detail"]["site_id"], "tower");
        assert_eq!(body["detail"]["photo"]["kind"], "unavailable");

        // Sentinel placeId: no lookup, static placeholder
        let (status, body) =
            send(create_router(state.clone()), "POST", "/api/sites/kyoto/select").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["enrichment"], "skipped");
        assert_eq!(body["detail"]["photo"]["kind"], "no_photo");
        assert_eq!(body["detail"]["placeholder"], "No photo available.");

        let (_, detail) = send(create_router(state.clone()), "GET", "/api/detail").await;
        assert_eq!(detail["site_id"], "kyoto");

        let (status, _) = send(create_router(state.clone()), "DELETE", "/api/detail").await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, detail) = send(create_router(state.clone()), "GET", "/api/detail").await;
        assert!(detail.is_null());

        let (status, _) = send(create_router(state), "DELETE", "/api/detail").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_select_unknown_site() {
        let app = create_router(create_test_state());
        let (status, body) = send(app, "POST", "/api/sites/nope/select").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_location_endpoint() {
        let app = create_router(create_test_state());
        let (status, body) = send(app, "GET", "/api/location").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lat"], 35.681236);

        let app = create_router(create_test_state_with(Locator::Disabled));
        let (status, body) = send(app, "GET", "/api/location").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "LOCATION_ERROR");
    }
}
