use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kindle_engine::wire::{
    BatchResult, ErrorBody, HealthResponse, MessageResponse, PreviewResponse, QueueAddResponse,
    QueueListResponse, QueueSendResponse, QueuedArticle, SendResponse, UrlRequest,
};
use kindle_logging::{kindle_info, kindle_warn};

use crate::error::{ApiError, QUEUE_EMPTY, URL_REQUIRED};
use crate::state::AppState;

type Shared = State<Arc<AppState>>;

/// The body is parsed by hand so a missing or malformed body gets the same
/// answer as a missing `url` field.
fn requested_url(body: &[u8]) -> Result<String, ApiError> {
    serde_json::from_slice::<UrlRequest>(body)
        .ok()
        .and_then(|request| request.target().map(str::to_string))
        .ok_or_else(|| ApiError::bad_request(URL_REQUIRED))
}

pub async fn health(State(state): Shared) -> Json<HealthResponse> {
    let status = state.pipeline.mail_status();
    Json(HealthResponse {
        status: "ok".to_string(),
        kindle_configured: status.kindle_configured,
        smtp_configured: status.smtp_configured,
    })
}

pub async fn send_article(
    State(state): Shared,
    body: Bytes,
) -> Result<Json<SendResponse>, ApiError> {
    let url = requested_url(&body)?;
    match state.pipeline.send_url(&url).await {
        Ok(article) => {
            kindle_info!("Sent \"{}\" from {}", article.title, url);
            Ok(Json(SendResponse {
                success: true,
                message: format!("Sent \"{}\" to Kindle", article.title),
                title: Some(article.title),
            }))
        }
        Err(err) => {
            kindle_warn!("Send of {} failed: {}", url, err);
            Err(ApiError::from_pipeline(&err, &url))
        }
    }
}

pub async fn list_queue(State(state): Shared) -> Json<QueueListResponse> {
    let queue = state.queue();
    let articles: Vec<QueuedArticle> = queue.entries().iter().map(QueuedArticle::from).collect();
    Json(QueueListResponse {
        success: true,
        count: articles.len(),
        queue: articles,
    })
}

pub async fn queue_article(
    State(state): Shared,
    body: Bytes,
) -> Result<Json<QueueAddResponse>, ApiError> {
    let url = requested_url(&body)?;
    let article = state.pipeline.extract_article(&url).await.map_err(|err| {
        kindle_warn!("Could not queue {}: {}", url, err);
        ApiError::from_pipeline(&err, &url)
    })?;

    let queue_length = state.queue().push(url.as_str(), article.title.as_str());
    kindle_info!("Queued \"{}\" ({} in queue)", article.title, queue_length);
    Ok(Json(QueueAddResponse {
        success: true,
        message: format!("Added \"{}\" to queue", article.title),
        queue_length: Some(queue_length),
    }))
}

/// Delivers a snapshot of the queue in order. Delivered entries are removed,
/// failed ones stay for the next attempt.
pub async fn send_queue(State(state): Shared) -> Result<Json<QueueSendResponse>, ApiError> {
    let pending = state.queue().snapshot();
    if pending.is_empty() {
        return Err(ApiError::bad_request(QUEUE_EMPTY));
    }

    let mut results = Vec::with_capacity(pending.len());
    for entry in pending {
        let article = match state.pipeline.extract_article(&entry.url).await {
            Ok(article) => article,
            Err(err) => {
                kindle_warn!("Queued {} could not be extracted: {}", entry.url, err);
                results.push(BatchResult {
                    success: false,
                    title: None,
                    url: Some(entry.url),
                    error: Some(err.to_string()),
                });
                continue;
            }
        };

        let outcome = state.pipeline.deliver(&article).await;
        if outcome.is_ok() {
            state.queue().remove(entry.id);
        }
        results.push(BatchResult {
            success: outcome.is_ok(),
            title: Some(article.title),
            url: None,
            error: outcome.err().map(|err| err.to_string()),
        });
    }

    let remaining_in_queue = state.queue().len();
    let delivered = results.iter().filter(|item| item.success).count();
    kindle_info!(
        "Batch send delivered {} of {} ({} remaining)",
        delivered,
        results.len(),
        remaining_in_queue
    );
    Ok(Json(QueueSendResponse {
        success: true,
        results,
        remaining_in_queue,
    }))
}

pub async fn clear_queue(State(state): Shared) -> Json<MessageResponse> {
    state.queue().clear();
    kindle_info!("Queue cleared");
    Json(MessageResponse {
        success: true,
        message: "Queue cleared".to_string(),
    })
}

/// Extraction failures are answered with 200 and `success: false`.
pub async fn preview_article(
    State(state): Shared,
    body: Bytes,
) -> Result<Response, ApiError> {
    let url = requested_url(&body)?;
    let response = match state.pipeline.extract_article(&url).await {
        Ok(article) => Json(PreviewResponse::from(article)).into_response(),
        Err(err) => {
            kindle_warn!("Preview of {} failed: {}", url, err);
            Json(ErrorBody::for_url(err.to_string(), url)).into_response()
        }
    };
    Ok(response)
}
