//! HTTP service exposing the extraction pipelines.
//!
//! ```ignore
//! use doc2txt::server::{create_server, AppState};
//! use doc2txt::{ExtractionConfig, ExtractionPipeline, ServerConfig};
//!
//! let pipeline = ExtractionPipeline::from_config(ExtractionConfig::default());
//! let app = create_server(AppState::new(pipeline, ServerConfig::default()));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use crate::config::ServerConfig;
use crate::extract::ExtractionPipeline;
use axum::{middleware as axum_middleware, Router};
use std::io;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Create the server with all routes and middleware.
pub fn create_server(state: AppState) -> Router {
    routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}

/// Bind `config.bind_addr()` and serve until Ctrl+C or SIGTERM.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn run(pipeline: ExtractionPipeline, config: ServerConfig) -> io::Result<()> {
    let addr = config.bind_addr();
    let app = create_server(AppState::new(pipeline, config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
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
    info!("Shutdown signal received; draining in-flight requests");
}
