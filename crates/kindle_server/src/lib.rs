//! HTTP server that turns web pages into EPUB mails for a Kindle.
pub mod config;
mod error;
mod handlers;
pub mod routes;
pub mod state;

use std::sync::Arc;

use kindle_logging::kindle_info;
use tokio::net::TcpListener;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(config: &ServerConfig, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind_address()).await?;
    kindle_info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    kindle_info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // Without a signal handler the server runs until killed.
        std::future::pending::<()>().await;
    }
}
