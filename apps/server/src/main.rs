//! DSpace REST server entry point
//!
//! `dspace-server` serves the read-only REST API. `dspace-server token
//! --user <uuid>` prints a bearer token for an eperson, signed with the
//! configured secret.

use anyhow::Context;
use clap::{Parser, Subcommand};
use dspace_rest::{api::create_router, auth::AuthManager, config::Config, logging, state::AppState};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "dspace-server", about = "DSpace REST repository server", version)]
struct Cli {
    /// Configuration file (yaml, toml or json). Defaults to ./config.* when present.
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the REST API (the default).
    Serve,
    /// Issue a bearer token for an eperson.
    Token {
        /// Eperson UUID written to the token subject.
        #[arg(long)]
        user: Uuid,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Token { user } => {
            if config.auth.jwt_secret.is_none() {
                anyhow::bail!("auth.jwt_secret must be set to issue tokens the server will accept");
            }
            let auth = AuthManager::new(Arc::new(config.auth.clone()));
            println!("{}", auth.issue_token(user)?);
            Ok(())
        }
        Command::Serve => serve(config).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let _logging_guard =
        logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting DSpace REST server");

    let addr = config
        .socket_addr()
        .context("Failed to determine socket address")?;

    tracing::info!(
        backend = ?config.database.backend,
        base_url = %config.rest.base_url,
        listen_addr = %addr,
        "Configuration loaded"
    );

    let state = AppState::new(config)
        .await
        .context("Failed to initialize application state")?;
    let app = create_router(state);

    tracing::info!("DSpace REST server listening on http://{}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API endpoint: http://{}/api", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener on {addr}"))?;

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server terminated unexpectedly");
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGTERM or SIGINT.
#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let sigint = tokio::signal::ctrl_c();
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = sigint => tracing::info!("SIGINT received, starting graceful shutdown..."),
                _ = sigterm.recv() => tracing::info!("SIGTERM received, starting graceful shutdown..."),
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "SIGTERM handler unavailable; waiting for SIGINT only");
            let _ = sigint.await;
            tracing::info!("SIGINT received, starting graceful shutdown...");
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for CTRL+C");
    }
    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
