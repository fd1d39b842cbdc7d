//! Serve command - runs the HTTP API

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::api::create_router_with_cors;
use crate::config::AppConfig;
use crate::infrastructure::session::SessionStore;

pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let state = crate::create_app_state(&config).await?;
    spawn_session_janitor(
        state.accounts.sessions().clone(),
        config.session.purge_interval_secs,
    );

    let app = create_router_with_cors(state, &config.server.cors_origins);

    let addr = build_socket_addr(&config)?;
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}

/// Periodically delete expired sessions. An interval of 0 disables it.
fn spawn_session_janitor(sessions: SessionStore, interval_secs: u64) {
    if interval_secs == 0 {
        info!("Expired session purging disabled");
        return;
    }

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

        loop {
            interval.tick().await;
            if let Err(e) = sessions.purge_expired().await {
                error!("Failed to purge expired sessions: {}", e);
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    info!("Shutdown signal received");
}
