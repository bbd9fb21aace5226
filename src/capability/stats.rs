//! Task statistics route group, gated by the `stats` flag.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::api::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/tasks", get(task_stats))
}

#[derive(Debug, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub open: usize,
    pub done: usize,
}

pub async fn task_stats(State(state): State<AppState>) -> Json<TaskStats> {
    let tasks = state.store.all_tasks();
    let done = tasks.iter().filter(|task| task.done).count();
    Json(TaskStats {
        total: tasks.len(),
        open: tasks.len() - done,
        done,
    })
}
