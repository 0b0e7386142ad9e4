//! HTTP server module for API and WebSocket endpoints.
//!
//! Lets a browser dashboard delegate its toast stack and idle tracking:
//! the page forwards input events and renders whatever arrives on `/ws`.

pub mod routes;
pub mod state;
pub mod ws;

use crate::monitor::{Navigator, SessionMonitor};
use crate::server::routes::{activity, config, health, notifications, session};
use crate::server::state::AppState;
use crate::server::ws::ws_handler;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tower_http::cors::{Any, CorsLayer};

/// Serializes an update and sends it to all connected WebSocket clients.
pub fn broadcast_update(
    tx: &broadcast::Sender<String>,
    update_type: &str,
    data: &impl serde::Serialize,
) {
    let message = serde_json::json!({
        "type": update_type,
        "data": data,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    if let Ok(json) = serde_json::to_string(&message) {
        let _ = tx.send(json);
    }
}

/// Navigator that asks connected pages to switch route.
pub struct BroadcastNavigator {
    tx: broadcast::Sender<String>,
}

impl BroadcastNavigator {
    pub fn new(tx: broadcast::Sender<String>) -> Self {
        Self { tx }
    }
}

impl Navigator for BroadcastNavigator {
    fn navigate(&self, route: &str) {
        tracing::debug!(route, "Redirecting clients");
        broadcast_update(
            &self.tx,
            "navigate",
            &serde_json::json!({ "route": route, "replace": true }),
        );
    }
}

/// Keeps the monitor in step with the authentication state.
pub fn spawn_auth_watcher(
    monitor: SessionMonitor,
    mut auth_rx: watch::Receiver<bool>,
    broadcast_tx: broadcast::Sender<String>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while auth_rx.changed().await.is_ok() {
            let authenticated = *auth_rx.borrow_and_update();
            monitor.handle_auth_change(authenticated);
            broadcast_update(&broadcast_tx, "session", &monitor.status());
        }
        tracing::debug!("Auth watcher stopped");
    })
}

/// Runs the axum server until `shutdown` turns true.
pub async fn run_server(
    state: Arc<AppState>,
    port: u16,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<()> {
    let watcher = spawn_auth_watcher(
        state.monitor.clone(),
        state.auth.subscribe(),
        state.broadcast_tx.clone(),
    );

    // CORS layer for frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Notifications API
        .route(
            "/api/notifications",
            get(notifications::list_notifications)
                .post(notifications::create_notification)
                .delete(notifications::clear_notifications),
        )
        .route(
            "/api/notifications/:id",
            delete(notifications::dismiss_notification),
        )
        // Activity API
        .route("/api/activity", post(activity::record_activity))
        // Session API
        .route("/api/session", get(session::get_session))
        .route("/api/session/login", post(session::login))
        .route("/api/session/logout", post(session::logout))
        .route("/api/session/extend", post(session::extend))
        // Config API
        .route("/api/config", get(config::get_config))
        // WebSocket
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
            tracing::info!("HTTP server shutting down");
        })
        .await?;

    watcher.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigator_broadcasts_route() {
        let (tx, mut rx) = broadcast::channel(4);
        BroadcastNavigator::new(tx).navigate("/login");

        let msg: serde_json::Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(msg["type"], "navigate");
        assert_eq!(msg["data"]["route"], "/login");
        assert_eq!(msg["data"]["replace"], true);
    }

    #[test]
    fn test_broadcast_without_subscribers_is_silent() {
        let (tx, _) = broadcast::channel::<String>(4);
        broadcast_update(&tx, "session", &serde_json::json!({}));
    }
}
