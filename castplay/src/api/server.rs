//! HTTP server setup and routing
//!
//! Sets up the axum router and serves it until Ctrl+C / SIGTERM. A second
//! signal exits the process immediately, even while a player is still being
//! replaced.

use std::future::Future;
use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use castplay_common::config::ServiceConfig;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::player::PlaybackController;

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppContext {
    pub controller: Arc<PlaybackController>,
    /// Configured listen address, shown on the status page
    pub listen_addr: String,
}

/// Build the router with all routes and layers
///
/// Pre-flight `OPTIONS` requests never reach a handler: the CORS layer
/// answers them with 200 and an empty body.
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/",
            get(super::handlers::status_page).post(super::handlers::play),
        )
        .route("/health", get(super::handlers::health))
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Run the HTTP server until a shutdown signal arrives
pub async fn run(config: &ServiceConfig, controller: Arc<PlaybackController>) -> Result<()> {
    let listen_addr = config.listen_addr();
    let ctx = AppContext {
        controller,
        listen_addr: listen_addr.clone(),
    };
    let app = create_router(ctx);

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| Error::Http(format!("Failed to bind to {}: {}", listen_addr, e)))?;
    info!("Listening on http://{}", listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(escalating_shutdown(shutdown_signal, || {
            std::process::exit(130);
        }))
        .await
        .map_err(|e| Error::Http(format!("Server error: {}", e)))?;

    Ok(())
}

/// Resolve on the first signal, then call `force_exit` on the next one
///
/// The second wait runs as a detached task, so it still fires while the
/// server drains connections or `main` stops the player.
pub(crate) async fn escalating_shutdown<S, Fut, X>(mut next_signal: S, force_exit: X)
where
    S: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
    X: FnOnce() + Send + 'static,
{
    next_signal().await;
    info!("Shutting down, signal again to exit immediately");

    tokio::spawn(async move {
        next_signal().await;
        warn!("Second shutdown signal, exiting now");
        force_exit();
    });
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received terminate signal"),
    }
}
