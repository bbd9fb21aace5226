//! Task search route group, gated by the `search` flag.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::AppState;
use crate::store::TaskRecord;

pub fn routes() -> Router<AppState> {
    Router::new().route("/tasks", get(search_tasks))
}

/// Query parameters for searching task records.
#[derive(Debug, Deserialize)]
pub struct SearchTasksQuery {
    /// Search term to match against task titles.
    pub q: String,
    /// Maximum number of results to return.
    pub limit: Option<u32>,
}

pub async fn search_tasks(
    State(state): State<AppState>,
    Query(query): Query<SearchTasksQuery>,
) -> Json<Vec<TaskRecord>> {
    Json(state.store.search_tasks(&query.q, query.limit))
}
