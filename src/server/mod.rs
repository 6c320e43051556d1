//! HTTP surfaces
//!
//! - `GET /health`
//! - `GET /api/dashboard?date=&class_id=`
//! - `GET /api/reports/{kind}?class_id=&start_date=&end_date=`
//! - `GET /export/{kind}?class_id=&start_date=&end_date=&format=`

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, MessageResponse};
pub use routes::router;
pub use state::{AppState, Clock};

use crate::config::ServerConfig;
use crate::domain::{ClassrollError, Result};
use std::time::Duration;
use tokio::sync::watch;

/// Serve until `shutdown` flips to `true`
///
/// In-flight requests are allowed to finish before this returns.
///
/// # Errors
///
/// Returns [`ClassrollError::Io`] if the address cannot be bound or the
/// server fails while running.
pub async fn serve(
    config: &ServerConfig,
    state: AppState,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let address = config.socket_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| ClassrollError::Io(format!("Failed to bind {address}: {e}")))?;

    tracing::info!(address = %address, "Listening");

    let app = router(state, Duration::from_secs(config.request_timeout_secs));
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
            tracing::info!("Shutdown requested, draining in-flight requests");
        })
        .await
        .map_err(|e| ClassrollError::Io(format!("Server error: {e}")))?;

    tracing::info!("Server stopped");
    Ok(())
}
