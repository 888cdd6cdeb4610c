//! Classgate Server: enrollment gate and live session lifecycle.
//!
//! Main entry point that wires all crates together and starts the server.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt};

use classgate_api::{AppState, build_router};
use classgate_core::config::AppConfig;
use classgate_core::error::{AppError, ErrorKind};
use classgate_database::Stores;

#[tokio::main]
async fn main() {
    let env = std::env::var("CLASSGATE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Classgate v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Stores ───────────────────────────────────────────
    let stores = Stores::from_config(&config.database).await?;

    // ── Step 2: Cache ────────────────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing cache");
    let cache = classgate_cache::connect(&config.cache).await?;

    // ── Step 3: Identity provider ────────────────────────────────
    let identity = classgate_auth::identity::from_config(&config.identity)?;

    // ── Step 4: Application state ────────────────────────────────
    let state = AppState::new(config.clone(), stores.clone(), cache, identity);

    // ── Step 5: Background jobs ──────────────────────────────────
    let shutdown = CancellationToken::new();
    let mut jobs = Vec::new();

    if let Some(hours) = config.enrollment.pending_expiry_hours {
        let interval = Duration::from_secs(config.enrollment.expiry_sweep_interval_seconds.max(1));
        jobs.push(tokio::spawn(
            state.expiry_sweep(hours).run(interval, shutdown.clone()),
        ));
    }

    if let Some(seconds) = config.identity.reconcile_interval_seconds {
        let interval = Duration::from_secs(seconds.max(1));
        jobs.push(tokio::spawn(
            state.role_reconciler().run(interval, shutdown.clone()),
        ));
    }

    // ── Step 6: Serve ────────────────────────────────────────────
    let app = build_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Configuration, format!("Failed to bind {addr}"), e)
    })?;

    tracing::info!(addr = %addr, "Classgate server listening");

    let signal_token = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            signal_token.cancel();
        })
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Unexpected, "Server error", e))?;

    // ── Step 7: Drain background jobs ────────────────────────────
    shutdown.cancel();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    for job in jobs {
        if tokio::time::timeout(grace, job).await.is_err() {
            tracing::warn!("Background job did not stop within the grace period");
        }
    }

    stores.close().await;
    tracing::info!("Classgate server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
