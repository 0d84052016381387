//! DirView Server: authenticated, read-only browsing of one directory tree.
//!
//! Main entry point that wires the crates together and starts the server.

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use dirview_api::{AppState, build_app};
use dirview_auth::{
    PasswordHasher, SessionStore, SessionSweeper, StaticUserDirectory, UserDirectory,
};
use dirview_core::config::AppConfig;
use dirview_core::error::{AppError, ErrorKind};
use dirview_storage::SecurePathResolver;

#[derive(Debug, Parser)]
#[command(name = "dirview-server", version, about = "Serve a directory listing behind a login")]
struct Cli {
    /// Configuration file, layered over config/default.toml
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Run the HTTP server (the default)
    Serve,
    /// Read a password from stdin and print its encoded hash for `auth.users`
    HashPassword,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let config = match AppConfig::load(cli.config.as_deref()) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Failed to load configuration: {}", e);
                    std::process::exit(1);
                }
            };

            init_logging(&config);

            if let Err(e) = run(config).await {
                tracing::error!(error = %e, "Server error");
                std::process::exit(1);
            }
        }
        Command::HashPassword => {
            if let Err(e) = hash_password() {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
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
    tracing::info!("Starting DirView v{}", env!("CARGO_PKG_VERSION"));

    PasswordHasher::new().ensure_entropy()?;

    let users = build_user_directory(&config)?;

    let resolver = SecurePathResolver::new(&config.storage.root_dir)?;
    tracing::info!(root = %resolver.root().display(), "Serving directory");

    let session_store = Arc::new(SessionStore::new(users, &config.session));
    let sweeper = SessionSweeper::start(
        Arc::clone(&session_store),
        Duration::from_secs(config.session.cleanup_interval_seconds),
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_app(AppState::new(config, session_store, resolver));

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e)
    })?;

    tracing::info!("DirView listening on {}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    sweeper.stop().await;
    served.map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("DirView shut down gracefully");
    Ok(())
}

/// Configured users, or the built-in demo accounts when none are set.
fn build_user_directory(config: &AppConfig) -> Result<Arc<dyn UserDirectory>, AppError> {
    let directory = if config.auth.users.is_empty() {
        tracing::warn!("No users configured; using the built-in demo accounts");
        StaticUserDirectory::builtin()
    } else {
        StaticUserDirectory::from_entries(&config.auth.users)?
    };

    tracing::info!(users = directory.len(), "User registry loaded");
    Ok(Arc::new(directory))
}

/// Reads one password from stdin and prints `base64(salt):base64(hash)`.
fn hash_password() -> Result<(), AppError> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;

    let password = input.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(AppError::validation("Password must not be empty"));
    }

    println!("{}", PasswordHasher::new().hash_new(password)?);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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

    tracing::info!("Shutdown signal received");
}
