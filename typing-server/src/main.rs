use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use typing_core::PassageProvider;
use typing_persistence::{ErrorLogRepository, UserRepository, connection::connect_and_migrate};
use typing_server::{
    auth::AuthService, config::Config, create_routes, user_service::UserService,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Typing Arena server...");

    let config = Config::from_env().context("Invalid configuration")?;

    let passages = match &config.passages_file {
        Some(path) => {
            info!("Loading passages from {}", path.display());
            PassageProvider::from_file(path)
                .with_context(|| format!("Failed to load passages from {}", path.display()))?
        }
        None => PassageProvider::builtin(),
    };
    info!("{} passages available", passages.len());

    // Initialize database connection and run migrations
    let db = connect_and_migrate(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;

    let user_repository = Arc::new(
        UserRepository::new(db.clone()).with_max_attempts(config.store_retry_attempts),
    );
    let error_logs = Arc::new(ErrorLogRepository::new(db));
    let user_service = Arc::new(UserService::new(user_repository.clone()));
    let auth_service = Arc::new(AuthService::new(
        &config.jwt_secret,
        chrono::Duration::hours(config.token_ttl_hours),
    ));

    if let Some(dir) = &config.static_dir {
        info!("Serving client files from {}", dir.display());
    }

    let routes = create_routes(
        auth_service,
        user_repository,
        user_service,
        error_logs,
        Arc::new(passages),
        config.static_dir.clone(),
    );

    let host: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST {}", config.host))?;
    let addr = SocketAddr::new(host, config.port);

    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(addr, shutdown_signal())
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");

    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let sigint = signal::unix::signal(signal::unix::SignalKind::interrupt());
        let sigterm = signal::unix::signal(signal::unix::SignalKind::terminate());

        match (sigint, sigterm) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => {
                        info!("Received SIGINT, shutting down gracefully...");
                    }
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down gracefully...");
                    }
                }
                return;
            }
            _ => tracing::warn!("Unix signal handlers unavailable, falling back to Ctrl+C"),
        }
    }

    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down gracefully...");
}
