//! Activity endpoint fed by the page's input listeners.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::monitor::ActivityKind;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ActivityReport {
    /// DOM event name, e.g. `mousemove` or `keydown`
    pub event: String,
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    /// Whether the event is qualifying activity at all
    pub qualifying: bool,
    /// Whether it restarted the idle budget
    pub reset: bool,
}

/// POST /api/activity
pub async fn record_activity(
    State(state): State<Arc<AppState>>,
    Json(report): Json<ActivityReport>,
) -> Json<ActivityResponse> {
    let Some(kind) = ActivityKind::from_event_name(&report.event) else {
        tracing::trace!(event = %report.event, "Ignoring non-qualifying event");
        return Json(ActivityResponse {
            qualifying: false,
            reset: false,
        });
    };

    Json(ActivityResponse {
        qualifying: true,
        reset: state.monitor.record_activity(kind),
    })
}
