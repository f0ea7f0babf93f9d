//! Stratus HTTP Server
//!
//! Main entry point for the weather aggregation server.

use std::{sync::Arc, time::Duration};

use axum::http::{HeaderValue, Method};
use infrastructure::{
    AppConfig, AsyncDatabase, AsyncDatabaseConfig, LogFormat, SqliteSessionStore, init_telemetry,
};
use presentation_http::{routes, spawn_session_retention_task, state::AppState};
use tokio::{net::TcpListener, signal, sync::watch};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_telemetry(&config.telemetry, LogFormat::from_server_config(&config.server))?;

    info!("Stratus v{} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        host = %config.server.host,
        port = config.server.port,
        tick_interval_ms = config.aggregation.tick_interval_ms,
        lookback_years = config.aggregation.lookback_years,
        "Configuration loaded"
    );

    let db = AsyncDatabase::new(&AsyncDatabaseConfig::from_app_config(&config.database)).await?;
    if config.database.run_migrations {
        db.migrate().await?;
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let state = AppState::from_config(&config, &db, shutdown_rx)?;
    info!(sources = ?state.aggregation.sources(), "Weather providers registered");

    let retention = config.retention.enabled.then(|| {
        spawn_session_retention_task(
            Arc::new(SqliteSessionStore::new(db.pool().clone())),
            config.retention.max_age(),
            config.retention.interval(),
        )
    });

    let mut app = routes::create_router(state);
    if config.server.cors_enabled {
        app = app.layer(cors_layer(&config.server.allowed_origins));
    }

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal(shutdown_timeout).await;
            // Ends every running subscription loop
            let _ = shutdown_tx.send(true);
        })
        .await?;

    if let Some(handle) = retention {
        handle.abort();
    }
    db.close().await;
    info!("Server shutdown complete");

    Ok(())
}

/// Any origin when none are configured, otherwise exactly the listed ones
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(origin) => Some(origin),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            },
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET])
        .allow_headers(Any)
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for connections to close...", timeout);
}
