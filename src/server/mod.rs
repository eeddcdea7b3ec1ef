//! # HTTP Server
//!
//! Serves the kiosk page and the fragments it polls.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | page shell |
//! | `GET /image` | slideshow frame (HTML), or original bytes with `?raw` |
//! | `GET /clock` | clock fragment |
//! | `GET /assets/*path` | embedded CSS/JS |
//!
//! Every route accepts configuration overrides in its query string, and in
//! the query string of its `Referer`.
//!
//! ## Usage
//!
//! ```bash
//! kiosk serve --listen 0.0.0.0:3000 --config config.json
//! ```

mod handlers;
mod state;
mod static_files;
mod views;

pub use state::{AppState, ServerConfig};

use axum::{Router, http::HeaderName, routing::get};
use std::sync::Arc;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::error::KioskError;

/// Header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/", get(handlers::page::home))
        .route("/image", get(handlers::image::image))
        .route("/clock", get(handlers::clock::clock))
        .route("/assets/*path", get(static_files::asset_handler))
        .with_state(state)
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use std::sync::Arc;
/// use kiosk::{Config, backend::ImmichClient, server::{serve, AppState, ServerConfig}};
///
/// # async fn example() -> Result<(), kiosk::error::KioskError> {
/// let base = Config::load("config.json")?;
/// let backend = ImmichClient::new(&base.immich_url, &base.immich_api_key)?;
/// let state = AppState::new(base, Arc::new(backend));
///
/// serve(ServerConfig { listen_addr: "0.0.0.0:3000".to_string() }, state).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig, state: AppState) -> Result<(), KioskError> {
    info!(
        listen = %config.listen_addr,
        immich = %state.base.immich_url,
        version = crate::page::KIOSK_VERSION,
        "kiosk server starting"
    );

    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            KioskError::Transport(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| KioskError::Transport(format!("Server error: {}", e)))?;

    Ok(())
}
