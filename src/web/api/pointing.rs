use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::pointing::feed::ingest;
use crate::pointing::{GeoPoint, ObjectRecord, Observer};
use crate::report::PointingReport;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::auth::ApiCaller;
use crate::web::config::Permission;
use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PointingRequest {
    pub objects: Vec<ObjectRecord>,
    #[serde(default)]
    pub max_range_km: Option<f64>,
    /// Overrides the configured station location.
    #[serde(default)]
    pub observer: Option<GeoPoint>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReloadResponse {
    pub object_count: usize,
    pub loaded_at: Option<DateTime<Utc>>,
}

#[utoipa::path(
    post,
    path = "/api/pointing",
    tag = "pointing",
    request_body = PointingRequest,
    responses(
        (status = 200, description = "Pointing report; result is null when nothing is in range", body = PointingReport),
        (status = 400, description = "Invalid observer or range", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing permission", body = ErrorResponse),
        (status = 500, description = "Internal invariant violated", body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn compute(
    State(state): State<AppState>,
    caller: ApiCaller,
    Json(request): Json<PointingRequest>,
) -> ApiResult<Json<PointingReport>> {
    caller.require(Permission::ComputePointing)?;

    let observer = match request.observer {
        Some(location) if !location.is_valid() => {
            return Err(ApiError::Validation("observer coordinates out of range".into()))
        }
        Some(location) => Observer::new(location, state.station.ground_elevation_m),
        None => state.station,
    };

    let max_range_km = request
        .max_range_km
        .unwrap_or(state.config.pointing.max_range_km);
    if max_range_km.is_nan() || max_range_km < 0.0 {
        log::debug!("rejected max_range_km {} from {}", max_range_km, caller.name);
        return Err(ApiError::Validation("max_range_km must be non-negative".into()));
    }

    let objects = ingest(request.objects, state.config.pointing.default_height_km);
    let report = PointingReport::compute(observer, &objects, max_range_km)?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/pointing",
    tag = "pointing",
    responses(
        (status = 200, description = "Pointing report over the feed snapshot", body = PointingReport),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing permission", body = ErrorResponse),
        (status = 503, description = "No feed file configured, or the snapshot has not loaded", body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn current(
    State(state): State<AppState>,
    caller: ApiCaller,
) -> ApiResult<Json<PointingReport>> {
    caller.require(Permission::ComputePointing)?;

    let feed = state.feed.as_ref().ok_or(ApiError::FeedNotConfigured)?;
    let loader = feed.read().await;
    if loader.loaded_at().is_none() {
        return Err(ApiError::FeedNotLoaded);
    }
    let report = PointingReport::compute(
        state.station,
        loader.positions(),
        state.config.pointing.max_range_km,
    )?;
    Ok(Json(report))
}

#[utoipa::path(
    post,
    path = "/api/feed/reload",
    tag = "pointing",
    responses(
        (status = 200, description = "Feed snapshot reloaded", body = ReloadResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing permission", body = ErrorResponse),
        (status = 500, description = "Snapshot could not be read", body = ErrorResponse),
        (status = 503, description = "No feed file configured", body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn reload_feed(
    State(state): State<AppState>,
    caller: ApiCaller,
) -> ApiResult<Json<ReloadResponse>> {
    caller.require(Permission::ReloadFeed)?;

    let feed = state.feed.as_ref().ok_or(ApiError::FeedNotConfigured)?;
    let mut loader = feed.write().await;
    let object_count = loader.reload()?;
    log::info!("{} reloaded the feed ({} objects)", caller.name, object_count);
    Ok(Json(ReloadResponse {
        object_count,
        loaded_at: loader.loaded_at(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use serde_json::json;
    use std::collections::HashSet;
    use std::path::PathBuf;

    use crate::pointing::DirectionBin;
    use crate::web::config::Config;

    fn state_with(pointing: &str) -> AppState {
        let yaml = format!("station:\n  coordinates: \"51.5074,-0.1278\"\n  altitude_m: 11\n{pointing}");
        AppState::new(Config::from_yaml(&yaml).unwrap()).unwrap()
    }

    fn caller(permissions: &[Permission]) -> ApiCaller {
        ApiCaller {
            name: "test".into(),
            permissions: permissions.iter().copied().collect::<HashSet<_>>(),
        }
    }

    fn full_access() -> ApiCaller {
        caller(&[Permission::ComputePointing, Permission::ReloadFeed])
    }

    fn request(body: serde_json::Value) -> Json<PointingRequest> {
        Json(serde_json::from_value(body).unwrap())
    }

    fn feed_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sat-pointer-{}-{}.json", name, std::process::id()))
    }

    async fn error_body(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn computes_from_posted_objects() {
        let body = json!({
            "objects": [
                { "name": "A", "latitude": 55.0, "longitude": -0.1278 },
                { "name": "B", "latitude": 54.5, "longitude": 0.0, "height_km": 420.0 },
                { "name": "no-coords" },
                { "name": "C", "latitude": 48.0, "longitude": -0.1278 }
            ]
        });
        let Json(report) = compute(State(state_with("")), full_access(), request(body))
            .await
            .unwrap();

        let result = report.result.unwrap();
        assert_eq!(result.direction, DirectionBin::N);
        assert_eq!(result.count, 2);
        assert_eq!(report.objects.len(), 3);
        assert_eq!(report.objects[0].object.height_km, 550.0);
        assert_eq!(report.observer.ground_elevation_m, 11.0);
    }

    #[tokio::test]
    async fn nothing_in_range_is_an_empty_result() {
        let body = json!({
            "objects": [{ "latitude": -33.87, "longitude": 151.21 }],
            "max_range_km": 500.0
        });
        let Json(report) = compute(State(state_with("")), full_access(), request(body))
            .await
            .unwrap();
        assert!(report.result.is_none());
        assert!(report.objects.is_empty());
        assert_eq!(report.max_range_km, 500.0);
    }

    #[tokio::test]
    async fn observer_override_is_used() {
        let body = json!({
            "objects": [{ "latitude": -30.0, "longitude": 151.21 }],
            "observer": { "latitude": -33.87, "longitude": 151.21 }
        });
        let Json(report) = compute(State(state_with("")), full_access(), request(body))
            .await
            .unwrap();
        assert_eq!(report.result.unwrap().direction, DirectionBin::N);
    }

    #[tokio::test]
    async fn invalid_observer_and_range_are_rejected() {
        let bad_observer = json!({
            "objects": [],
            "observer": { "latitude": 123.0, "longitude": 0.0 }
        });
        let err = compute(State(state_with("")), full_access(), request(bad_observer))
            .await
            .unwrap_err();
        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_failed");

        let negative_range = json!({ "objects": [], "max_range_km": -5.0 });
        let err = compute(State(state_with("")), full_access(), request(negative_range))
            .await
            .unwrap_err();
        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_failed");
    }

    #[tokio::test]
    async fn permissions_are_checked_per_endpoint() {
        let reload_only = caller(&[Permission::ReloadFeed]);
        let err = compute(State(state_with("")), reload_only, request(json!({ "objects": [] })))
            .await
            .unwrap_err();
        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "forbidden");

        let compute_only = caller(&[Permission::ComputePointing]);
        let err = reload_feed(State(state_with("")), compute_only).await.unwrap_err();
        assert_eq!(error_body(err).await.0, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn feed_endpoints_need_a_configured_feed() {
        let err = current(State(state_with("")), full_access()).await.unwrap_err();
        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "feed_not_configured");

        let err = reload_feed(State(state_with("")), full_access()).await.unwrap_err();
        assert_eq!(error_body(err).await.1["error"], "feed_not_configured");
    }

    #[tokio::test]
    async fn unreadable_feed_is_not_an_empty_sky() {
        let path = feed_path("unreadable");
        let _ = std::fs::remove_file(&path);
        let state = state_with(&format!("pointing:\n  feed_file: {}\n", path.display()));

        let err = current(State(state.clone()), full_access()).await.unwrap_err();
        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "feed_not_loaded");

        let err = reload_feed(State(state.clone()), full_access()).await.unwrap_err();
        assert_eq!(error_body(err).await.1["error"], "feed_error");

        std::fs::write(&path, r#"[{"latitude": 55.0, "longitude": -0.1278}]"#).unwrap();
        let Json(reloaded) = reload_feed(State(state.clone()), full_access()).await.unwrap();
        assert_eq!(reloaded.object_count, 1);
        assert!(reloaded.loaded_at.is_some());

        let Json(report) = current(State(state), full_access()).await.unwrap();
        assert_eq!(report.result.unwrap().direction, DirectionBin::N);
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn loaded_feed_with_nothing_in_range_returns_null_result() {
        let path = feed_path("far-away");
        std::fs::write(&path, r#"[{"latitude": -33.87, "longitude": 151.21}]"#).unwrap();
        let state = state_with(&format!("pointing:\n  feed_file: {}\n", path.display()));

        let Json(report) = current(State(state), full_access()).await.unwrap();
        assert!(report.result.is_none());
        std::fs::remove_file(&path).unwrap();
    }
}
