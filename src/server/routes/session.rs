//! Session endpoints: status, login, logout and extension.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::monitor::MonitorStatus;
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: Option<String>,
    pub authenticated: bool,
    #[serde(flatten)]
    pub status: MonitorStatus,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
}

fn session_response(state: &AppState) -> SessionResponse {
    SessionResponse {
        user: state.auth.current_user(),
        authenticated: state.auth.is_authenticated(),
        status: state.monitor.status(),
    }
}

/// GET /api/session - Monitor state and countdown
pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    Json(session_response(&state))
}

/// POST /api/session/login
///
/// Credentials are checked upstream; this only records who is logged in.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, StatusCode> {
    let username = body.username.trim();
    if username.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    state.auth.login(username);
    state.monitor.handle_auth_change(true);
    Ok(Json(session_response(&state)))
}

/// POST /api/session/logout - Manual logout, no inactivity notice
pub async fn logout(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    if let Err(e) = state.auth.logout() {
        tracing::warn!(error = %e, "Manual logout could not reach the backend");
    }
    state.monitor.handle_auth_change(false);
    Json(session_response(&state))
}

/// POST /api/session/extend - "Continue session" from the expiry dialog
pub async fn extend(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionResponse>, StatusCode> {
    if !state.monitor.extend_session() {
        return Err(StatusCode::CONFLICT);
    }
    Ok(Json(session_response(&state)))
}
