mod bootstrap;
mod chat;
mod health;
mod rag;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use tracing::{info, warn};

use roomscout_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use roomscout_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config)?;

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        providers = app.workflow.provider_count(),
        vectors = app.catalog.len(),
        "roomscout-server started"
    );

    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    serve(listener, router(&app), grace).await?;

    info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "roomscout-server stopped"
    );
    Ok(())
}

fn router(app: &bootstrap::Application) -> Router {
    Router::new()
        .merge(chat::router(Arc::clone(&app.workflow)))
        .merge(rag::router(Arc::clone(&app.catalog), Arc::clone(&app.llm)))
        .merge(health::router(health::HealthState {
            providers: app.workflow.provider_count(),
            vectors: app.catalog.len(),
        }))
}

/// Serves until a shutdown signal arrives, then drains in-flight
/// connections for at most the configured grace period.
async fn serve(
    listener: tokio::net::TcpListener,
    router: Router,
    grace: Duration,
) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        wait_for_shutdown().await;
        let _ = shutdown_tx.send(true);
    });

    let mut drain_rx = shutdown_rx.clone();
    let server = std::future::IntoFuture::into_future(
        axum::serve(listener, router).with_graceful_shutdown({
            let mut rx = shutdown_rx;
            async move {
                let _ = rx.changed().await;
            }
        }),
    );
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result?,
        () = async {
            let _ = drain_rx.changed().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(
                event_name = "system.server.drain_timeout",
                correlation_id = "shutdown",
                grace_secs = grace.as_secs(),
                "graceful shutdown window elapsed, aborting open connections"
            );
        }
    }

    Ok(())
}

async fn wait_for_shutdown() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                warn!(error = %error, "could not install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "shutdown signal received"
    );
}
