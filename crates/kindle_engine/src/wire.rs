//! JSON bodies exchanged between the server and its clients.

use serde::{Deserialize, Serialize};

use crate::queue::QueueEntry;
use crate::Article;

/// Body of `GET /health`. Only the two flags are read back by clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub kindle_configured: bool,
    #[serde(default)]
    pub smtp_configured: bool,
}

/// Body of `POST /send`, `POST /queue` and `POST /preview`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRequest {
    #[serde(default)]
    pub url: Option<String>,
}

impl UrlRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }

    /// The requested URL, trimmed; `None` when missing or blank.
    pub fn target(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }
}

/// Any `success: false` answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            url: None,
        }
    }

    pub fn for_url(error: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::new(error)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedArticle {
    pub url: String,
    pub title: String,
    pub added_at: String,
}

impl From<&QueueEntry> for QueuedArticle {
    fn from(entry: &QueueEntry) -> Self {
        Self {
            url: entry.url.clone(),
            title: entry.title.clone(),
            added_at: entry.added_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueListResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub queue: Vec<QueuedArticle>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueAddResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_length: Option<usize>,
}

/// Outcome of one queued article in a batch send. Delivered or mail-failed
/// items carry the title; items that could not be extracted carry the url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSendResponse {
    pub success: bool,
    #[serde(default)]
    pub results: Vec<BatchResult>,
    #[serde(default)]
    pub remaining_in_queue: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub success: bool,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub top_image: Option<String>,
    #[serde(default)]
    pub url: String,
}

impl From<Article> for PreviewResponse {
    fn from(article: Article) -> Self {
        Self {
            success: true,
            title: article.title,
            authors: article.authors,
            publish_date: article.publish_date,
            text: article.text,
            html: article.html,
            top_image: article.top_image,
            url: article.url,
        }
    }
}
