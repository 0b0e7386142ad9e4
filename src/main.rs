//! SessionWatch - session sidecar for the training dashboard.
//!
//! Hosts the notification store and the inactivity monitor behind a
//! loopback HTTP/WebSocket API.

use sessionwatch::auth::SessionAuth;
use sessionwatch::config::AppConfig;
use sessionwatch::monitor::SessionMonitor;
use sessionwatch::scheduler::{RuntimeScheduler, Scheduler};
use sessionwatch::server::state::AppState;
use sessionwatch::server::{run_server, BroadcastNavigator};
use sessionwatch::store::NotificationStore;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sessionwatch=info")),
        )
        .init();

    let config = AppConfig::load()?;
    let monitor_config = config.monitor_config()?;
    tracing::info!(
        timeout_ms = config.session.timeout_ms,
        warning_ms = config.session.warning_ms,
        locale = ?config.locale,
        "Configuration loaded"
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let scheduler: Arc<dyn Scheduler> = Arc::new(RuntimeScheduler::new(runtime.handle().clone()));

    let notifications = NotificationStore::with_options(
        Arc::clone(&scheduler),
        config.locale,
        config.default_notification_duration(),
    );
    let auth = Arc::new(SessionAuth::new());
    let (broadcast_tx, _) = broadcast::channel::<String>(100);

    let monitor = SessionMonitor::builder(
        monitor_config,
        scheduler,
        auth.clone(),
        notifications.clone(),
    )
    .navigator(Arc::new(BroadcastNavigator::new(broadcast_tx.clone())))
    .on_timeout(|| tracing::info!("Session ended by inactivity"))
    .build();

    let state = Arc::new(AppState::new(
        notifications.clone(),
        monitor.clone(),
        auth,
        config.clone(),
        broadcast_tx,
    ));

    // Shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    })?;

    println!(
        "SessionWatch API available at http://127.0.0.1:{}",
        config.server.port
    );
    runtime.block_on(run_server(state, config.server.port, shutdown_rx))?;

    // Cleanup
    monitor.shutdown();
    notifications.clear();
    tracing::info!("SessionWatch has exited");
    Ok(())
}
