//! Shared application state for the HTTP server.

use crate::auth::SessionAuth;
use crate::config::AppConfig;
use crate::monitor::SessionMonitor;
use crate::store::NotificationStore;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub notifications: NotificationStore,
    pub monitor: SessionMonitor,
    pub auth: Arc<SessionAuth>,
    pub config: AppConfig,
    /// Broadcast channel for WebSocket updates other than notifications.
    pub broadcast_tx: broadcast::Sender<String>,
}

impl AppState {
    pub fn new(
        notifications: NotificationStore,
        monitor: SessionMonitor,
        auth: Arc<SessionAuth>,
        config: AppConfig,
        broadcast_tx: broadcast::Sender<String>,
    ) -> Self {
        Self {
            notifications,
            monitor,
            auth,
            config,
            broadcast_tx,
        }
    }

    /// Subscribe to the broadcast channel.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.broadcast_tx.subscribe()
    }
}
