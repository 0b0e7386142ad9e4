//! WebSocket handler for real-time updates.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use crate::auth::AuthProvider;
use crate::server::state::AppState;

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handles an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before the snapshot so nothing falls between the two.
    let mut events = state.notifications.subscribe();
    let mut rx = state.subscribe();

    if let Some(initial_state) = get_current_state(&state) {
        let _ = sender.send(Message::Text(initial_state)).await;
    }

    // Forward notification events and broadcast updates to the socket
    let send_task = tokio::spawn(async move {
        loop {
            let text = tokio::select! {
                event = events.recv() => match event {
                    Ok(event) => match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(_) => continue,
                    },
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "WebSocket client lagging behind notifications");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                },
                msg = rx.recv() => match msg {
                    Ok(msg) => msg,
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                },
            };

            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    tracing::debug!("WebSocket connection closed");
}

/// Builds the first message a client receives: the toast stack and session.
fn get_current_state(state: &AppState) -> Option<String> {
    let message = serde_json::json!({
        "type": "initial_state",
        "data": {
            "notifications": state.notifications.list(),
            "session": state.monitor.status(),
            "authenticated": state.auth.is_authenticated(),
            "user": state.auth.current_user(),
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    serde_json::to_string(&message).ok()
}
