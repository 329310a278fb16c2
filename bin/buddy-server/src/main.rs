//! buddy-server – entry point.
//!
//! Startup order:
//! 1. Parse configuration from environment variables.
//! 2. Initialise structured tracing (stdout, optionally JSON and/or a daily log file).
//! 3. Open the SQLite database and ensure the `travel_data` table.
//! 4. Initialise the completion client (chat stays disabled without a key).
//! 5. Build the shared application state.
//! 6. Start the idle chat session sweep.
//! 7. Build the Axum router and start the HTTP server with graceful shutdown.

mod config;
mod error;
mod middleware;
mod routes;
mod schemas;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use buddy_app_core::chat::ChatService;
use buddy_app_core::completion::{CompletionClient, GroqClient};
use buddy_app_core::entities::SqliteStore;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Configuration ───────────────────────────────────────────────────────
    let cfg = Config::from_env();

    // ── 2. Tracing ─────────────────────────────────────────────────────────────
    // The guard flushes the file writer on drop; keep it alive until exit.
    let _log_guard = init_tracing(&cfg)?;
    info!(version = env!("CARGO_PKG_VERSION"), "buddy-server starting");

    // ── 3. Database ────────────────────────────────────────────────────────────
    let store = SqliteStore::connect(&cfg.database_url)
        .await
        .with_context(|| format!("failed to open database {}", cfg.database_url))?;
    info!(database_url = %cfg.database_url, "database ready");

    // ── 4. Completion client ───────────────────────────────────────────────────
    let client = GroqClient::initialize(cfg.groq_api_key.as_deref(), cfg.completion_settings())
        .map(|c| Arc::new(c) as Arc<dyn CompletionClient>);
    match &client {
        Ok(_) => info!(model = %cfg.model, "completion client ready"),
        Err(e) => warn!(error = %e, "chat disabled; travel plan routes remain available"),
    }

    // ── 5. Shared application state ────────────────────────────────────────────
    let state = Arc::new(AppState {
        config: Arc::new(cfg.clone()),
        store: Arc::new(store),
        chat: Arc::new(ChatService::new(client)),
    });

    // ── 6. Idle session sweep ──────────────────────────────────────────────────
    match cfg.session_idle_ttl() {
        Some(ttl) => {
            let chat = Arc::clone(&state.chat);
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(sweep_period(ttl));
                loop {
                    interval.tick().await;
                    chat.sweep_idle_sessions(ttl);
                }
            });
            info!(idle_secs = ttl.as_secs(), "idle chat session sweep started");
        }
        None => info!("idle chat session sweep disabled"),
    }

    // ── 7. HTTP server with graceful shutdown ──────────────────────────────────
    let app = routes::build(Arc::clone(&state));
    let addr: SocketAddr = cfg
        .bind_address
        .parse()
        .with_context(|| format!("invalid BUDDY_BIND address {}", cfg.bind_address))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.store.close().await;
    info!("buddy-server stopped");
    Ok(())
}

/// Check a few times per idle window, but not more than once a second.
fn sweep_period(ttl: Duration) -> Duration {
    (ttl / 4).max(Duration::from_secs(1))
}

/// Install the global subscriber. Returns the file writer guard when
/// `BUDDY_LOG_DIR` is set.
fn init_tracing(cfg: &Config) -> anyhow::Result<Option<WorkerGuard>> {
    // RUST_LOG wins; otherwise BUDDY_LOG, warning loudly if it is not a
    // valid filter expression.
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match cfg.log_level.parse::<tracing_subscriber::EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: BUDDY_LOG='{}' is not a valid tracing filter ({}); \
                     falling back to 'info'",
                    cfg.log_level, e
                );
                tracing_subscriber::EnvFilter::new("info")
            }
        },
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true);

    let (result, guard) = match &cfg.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).with_context(|| format!("failed to create log directory {dir}"))?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "buddy-server.log"));
            let subscriber = subscriber.with_writer(writer).with_ansi(false);
            let result = if cfg.log_json {
                subscriber.json().try_init()
            } else {
                subscriber.try_init()
            };
            (result, Some(guard))
        }
        None => {
            let result = if cfg.log_json {
                subscriber.json().try_init()
            } else {
                subscriber.try_init()
            };
            (result, None)
        }
    };
    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;
    Ok(guard)
}

/// Returns a future that resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; starting graceful shutdown");
}
