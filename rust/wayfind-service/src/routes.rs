use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::{error, info, info_span};
use wayfind_core::{FailureReason, RouteRequest, RouteResponse};

use crate::errors::AppError;
use crate::models::{Healthz, VersionInfo, WalkableGridResponse};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/version", get(version))
        .route("/path/shortest", post(shortest_path))
        .route("/path/walkable-grid", get(walkable_grid))
        .route("/accessibility/summary", get(accessibility_summary))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(Healthz { status: "ok" }))
}

/// Ready once the accessibility index can be built from the configured feature source.
async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let res = tokio::task::spawn_blocking(move || state.accessibility_index()).await;
    match res {
        Ok(Ok(_)) => (StatusCode::OK, Json(json!({"ready": true}))).into_response(),
        Ok(Err(e)) => {
            error!(error=%e, "readyz failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"ready": false, "error": e.to_string()}))).into_response()
        }
        Err(e) => {
            error!(error=%e, "readyz task failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"ready": false, "error": e.to_string()}))).into_response()
        }
    }
}

async fn version() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(VersionInfo { service_version: env!("CARGO_PKG_VERSION"), core_version: wayfind_core::version() }),
    )
}

async fn shortest_path(
    State(state): State<AppState>,
    Json(req): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, AppError> {
    let span = info_span!(
        "shortest_path",
        start = ?(req.start_x, req.start_y),
        end = ?(req.end_x, req.end_y),
        accessibility_mode = req.accessibility_mode
    );
    // Search is CPU bound; keep it off the async workers.
    let outcome = tokio::task::spawn_blocking(move || {
        let _enter = span.enter();
        state.plan(&req)
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))??;

    info!(
        found = outcome.search.found,
        reason = outcome.search.reason.map(FailureReason::as_str).unwrap_or(""),
        expanded = outcome.search.expanded,
        cost = outcome.search.cost,
        ramp_cells_used = outcome.ramp_cells_used,
        "route served"
    );
    Ok(Json(outcome.response))
}

async fn walkable_grid(State(state): State<AppState>) -> impl IntoResponse {
    let grid = &state.grid;
    let walkable_cells = grid.walkable_cells().map(|c| grid.grid_to_pixel_center(c)).collect();
    Json(WalkableGridResponse {
        walkable_cells,
        cell_size: grid.cell_size(),
        grid_width: grid.width(),
        grid_height: grid.height(),
    })
}

async fn accessibility_summary(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let index = tokio::task::spawn_blocking(move || state.accessibility_index())
        .await
        .map_err(|e| AppError::Internal(e.into()))??;
    Ok(Json(index.summary()))
}
