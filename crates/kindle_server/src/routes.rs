use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::handlers;
use crate::state::AppState;

/// ```text
/// GET    /health       configuration flags
/// POST   /send         extract, package and mail one URL
/// GET    /queue        list queued articles
/// POST   /queue        extract one URL and queue it
/// POST   /queue/send   deliver every queued article
/// DELETE /queue/clear  empty the queue
/// POST   /preview      extract one URL without sending
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    // The browser extension calls from its own origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/send", post(handlers::send_article))
        .route(
            "/queue",
            get(handlers::list_queue).post(handlers::queue_article),
        )
        .route("/queue/send", post(handlers::send_queue))
        .route("/queue/clear", delete(handlers::clear_queue))
        .route("/preview", post(handlers::preview_article))
        .layer(cors)
        .with_state(state)
}
