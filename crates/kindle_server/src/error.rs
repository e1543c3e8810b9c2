use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kindle_engine::wire::ErrorBody;
use kindle_engine::PipelineError;

pub const URL_REQUIRED: &str = "URL is required";
pub const QUEUE_EMPTY: &str = "Queue is empty";

/// A `{success: false, error}` answer with its status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody::new(error),
        }
    }

    /// Maps a failed delivery of `url`. Extraction failures are the
    /// caller's problem (400, echoing the url); packaging and mail
    /// failures are ours (500).
    pub fn from_pipeline(err: &PipelineError, url: &str) -> Self {
        if err.is_extraction() {
            return Self {
                status: StatusCode::BAD_REQUEST,
                body: ErrorBody::for_url(err.to_string(), url),
            };
        }
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody::new(err.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
