//! HTTP REST surface for the calendar bridge.
//!
//! Exposes the two calendar operations plus an OpenAPI description over
//! axum, with an optional shared-secret gate for public exposure.

pub mod config;
pub mod error;
pub mod openapi;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use calbridge_google::CalendarGateway;

pub use config::HttpConfig;
pub use error::ApiError;
pub use routes::{AppState, router};

/// Binds the listener and serves until the process exits.
pub async fn serve(config: HttpConfig, gateway: Arc<dyn CalendarGateway>) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let state = AppState {
        gateway,
        config: Arc::new(config),
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP bridge listening on {addr}");
    axum::serve(listener, app).await
}
