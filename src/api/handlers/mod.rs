use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::api::AppState;
use crate::flags::{FlagManifest, FlagRecord};

/// Log an internal error and return a sanitized response to the client.
/// The full error is logged server-side; clients only see a generic message.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// The full active manifest. Structurally identical to the published
/// per-environment flag map, so the client mirror can fetch this directly.
pub async fn get_flags(State(state): State<AppState>) -> Json<FlagManifest> {
    Json(state.resolver.snapshot().as_ref().clone())
}

/// A single flag record. 404 means the name was never authored, which is
/// distinct from a record with `enabled: false`.
pub async fn describe_flag(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<FlagRecord>, (StatusCode, String)> {
    state
        .resolver
        .describe(&name)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Flag not found".to_string()))
}

/// Re-reads the manifest source and returns the new manifest.
///
/// A failed reload keeps the previous manifest active and reports 500.
/// Reloading changes flag queries immediately; routes mounted at startup
/// are not rebound.
pub async fn reload_flags(
    State(state): State<AppState>,
) -> Result<Json<FlagManifest>, (StatusCode, String)> {
    state
        .resolver
        .reload()
        .map(|manifest| Json(manifest.as_ref().clone()))
        .map_err(internal_error)
}
