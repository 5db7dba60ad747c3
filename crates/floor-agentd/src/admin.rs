use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use floor_core::{context::ScopedContext, lifecycle::Lifecycle};
use floor_prometheus::PrometheusMetrics;

/// Shared state of the admin endpoints.
pub struct AdminState {
    pub lifecycle: Lifecycle,
    pub context: Arc<ScopedContext>,
    pub metrics: PrometheusMetrics,
}

/// Routes:
/// - GET  /metrics                       - prometheus exposition
/// - GET  /api/v1/scheduler              - timer state
/// - POST /api/v1/scheduler/visibility   - `{visible}` show or hide the view
/// - POST /api/v1/context                - `{station_id}` set the station chosen in the view
pub fn router(state: Arc<AdminState>) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/api/v1/scheduler", get(scheduler_state))
        .route("/api/v1/scheduler/visibility", post(set_visibility))
        .route("/api/v1/context", post(set_context))
        .with_state(state)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SchedulerState {
    pub running: bool,
    pub visible: bool,
    pub live_timers: usize,
    pub pending_runs: usize,
    pub tasks: Vec<TaskState>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskState {
    pub name: String,
    pub scheduled: bool,
}

#[derive(Debug, Deserialize)]
struct VisibilityRequest {
    visible: bool,
}

#[derive(Debug, Deserialize)]
struct ContextRequest {
    station_id: Option<u64>,
}

async fn metrics(State(state): State<Arc<AdminState>>) -> Response {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, state.metrics.content_type())],
            body,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "metrics encoding failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn scheduler_state(State(state): State<Arc<AdminState>>) -> Json<SchedulerState> {
    let scheduler = state.lifecycle.scheduler();
    let tasks = scheduler
        .tasks()
        .into_iter()
        .map(|name| TaskState {
            name: name.to_string(),
            scheduled: scheduler.is_scheduled(name),
        })
        .collect();

    Json(SchedulerState {
        running: scheduler.is_running(),
        visible: scheduler.is_visible(),
        live_timers: scheduler.live_timers(),
        pending_runs: scheduler.pending_runs(),
        tasks,
    })
}

async fn set_visibility(
    State(state): State<Arc<AdminState>>,
    Json(req): Json<VisibilityRequest>,
) -> StatusCode {
    state.lifecycle.on_visibility_change(req.visible);
    StatusCode::NO_CONTENT
}

async fn set_context(
    State(state): State<Arc<AdminState>>,
    Json(req): Json<ContextRequest>,
) -> StatusCode {
    info!(station_id = ?req.station_id, "view station changed");
    state.context.set_ambient(req.station_id);
    StatusCode::NO_CONTENT
}
