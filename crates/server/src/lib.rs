//! Server crate for the course recommendation service.
//!
//! This crate contains the orchestrator that runs the ranking strategy and
//! the HTTP surface in front of it:
//!
//! | Method | Path         |                                          |
//! |--------|--------------|------------------------------------------|
//! | GET    | `/health`    | liveness                                 |
//! | GET    | `/courses`   | every course with its advisors           |
//! | GET    | `/advisors`  | every advisor                            |
//! | POST   | `/recommend` | `{student_id, interests?, limit?}`       |

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::info;

use data_access::SupabaseStore;

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod request;
pub mod routes;

pub use config::Config;
pub use error::ApiError;
pub use orchestrator::{CourseRecommendation, RankingOrchestrator, RankingSource, RecommendError, RemoteRanking};

/// Install the tracing subscriber; `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}

/// Build an orchestrator backed by the Supabase project in `config`.
pub fn supabase_orchestrator(config: &Config) -> Result<RankingOrchestrator> {
    let store = SupabaseStore::new(&config.supabase_url, &config.supabase_key, config.request_timeout)
        .context("Failed to build data store client")?;
    info!("Using data store at {}", store.base_url());
    Ok(RankingOrchestrator::new(Arc::new(store)))
}

/// Serve the HTTP app on `listener` until Ctrl+C / SIGTERM.
pub async fn serve(listener: TcpListener, orchestrator: RankingOrchestrator) -> Result<()> {
    let address = listener.local_addr().context("Listener has no local address")?;
    info!("Server running on {address}");

    axum::serve(listener, routes::router(orchestrator))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
