//! Intake triage HTTP server.
//!
//! Public submission endpoint plus a reviewer-only queue protected by
//! HTTP Basic Auth. All triage decisions live in `triage-core`; this
//! binary is routing, validation, and credential handling.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use triage_core::IntakeStore;

mod auth;
mod error;
mod routes;
mod validation;

use auth::PasswordGate;

#[derive(Parser, Debug)]
#[command(name = "triage-server", about = "Intake triage HTTP server")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3001")]
    bind: SocketAddr,

    /// SQLite database file (created on first run)
    #[arg(long, default_value = "intakes.db")]
    db: PathBuf,

    /// Reviewer password for HTTP Basic Auth
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    admin_password: Option<String>,
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: IntakeStore,
    pub gate: Arc<PasswordGate>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if args.admin_password.is_none() {
        tracing::warn!("no admin password configured; reviewer endpoints will refuse all requests");
    }

    let store = IntakeStore::open(&args.db)
        .map_err(|e| anyhow::anyhow!("failed to open {}: {e}", args.db.display()))?;
    let state = AppState {
        store,
        gate: Arc::new(PasswordGate::new(args.admin_password)),
    };

    let app = routes::router(state);
    tracing::info!(bind = %args.bind, db = %args.db.display(), "triage server listening");
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
