//! Task export route group, gated by the `export` flag.

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::AppState;
use crate::store::TaskRecord;

pub fn routes() -> Router<AppState> {
    Router::new().route("/tasks", get(export_tasks))
}

/// A full dump of the task store, suitable for offline processing.
#[derive(Debug, Serialize)]
pub struct TaskExport {
    pub exported_at: DateTime<Utc>,
    pub count: usize,
    pub tasks: Vec<TaskRecord>,
}

pub async fn export_tasks(State(state): State<AppState>) -> Json<TaskExport> {
    let tasks = state.store.all_tasks();
    Json(TaskExport {
        exported_at: Utc::now(),
        count: tasks.len(),
        tasks,
    })
}
