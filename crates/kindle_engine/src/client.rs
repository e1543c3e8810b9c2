use std::time::Duration;

use kindle_logging::kindle_debug;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::wire::{
    ErrorBody, HealthResponse, MessageResponse, PreviewResponse, QueueAddResponse,
    QueueListResponse, QueueSendResponse, SendResponse, UrlRequest,
};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    /// Upper bound for a whole call; deliveries can take a while.
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// No answer: connection refused, DNS failure, timeout.
    #[error("{0}")]
    Transport(String),
    #[error("Server returned status {0}")]
    Status(u16),
    #[error("invalid response: {0}")]
    Decode(String),
}

/// An answer to an action endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiReply<T> {
    Accepted(T),
    /// `success: false`, with the server's error text.
    Refused(String),
}

/// One call per server endpoint. `server_url` is the resolved base URL.
#[async_trait::async_trait]
pub trait ServerClient: Send + Sync {
    /// `GET /health` answered with any 2xx status; the body is not read.
    async fn ping(&self, server_url: &str) -> Result<(), ClientError>;
    async fn health(&self, server_url: &str) -> Result<HealthResponse, ClientError>;
    async fn queue_count(&self, server_url: &str) -> Result<usize, ClientError>;
    async fn send(
        &self,
        server_url: &str,
        url: &str,
    ) -> Result<ApiReply<SendResponse>, ClientError>;
    async fn enqueue(
        &self,
        server_url: &str,
        url: &str,
    ) -> Result<ApiReply<QueueAddResponse>, ClientError>;
    async fn send_queue(
        &self,
        server_url: &str,
    ) -> Result<ApiReply<QueueSendResponse>, ClientError>;
    async fn clear_queue(
        &self,
        server_url: &str,
    ) -> Result<ApiReply<MessageResponse>, ClientError>;
    async fn preview(
        &self,
        server_url: &str,
        url: &str,
    ) -> Result<ApiReply<PreviewResponse>, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestServerClient {
    http: reqwest::Client,
}

impl ReqwestServerClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(transport)?;
        Ok(Self { http })
    }

    async fn read(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(StatusCode, Vec<u8>), ClientError> {
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;
        kindle_debug!("Server answered {} ({} bytes)", status, body.len());
        Ok((status, body.to_vec()))
    }

    /// For endpoints whose answer only matters on success.
    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, ClientError> {
        let (status, body) = self.read(self.http.get(url)).await?;
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }
        serde_json::from_slice(&body).map_err(|err| ClientError::Decode(err.to_string()))
    }

    async fn action<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<ApiReply<T>, ClientError> {
        let (status, body) = self.read(request).await?;
        decode_reply(status, &body)
    }
}

#[async_trait::async_trait]
impl ServerClient for ReqwestServerClient {
    async fn ping(&self, server_url: &str) -> Result<(), ClientError> {
        let (status, _) = self.read(self.http.get(endpoint(server_url, "/health"))).await?;
        if status.is_success() {
            Ok(())
        } else {
            Err(ClientError::Status(status.as_u16()))
        }
    }

    async fn health(&self, server_url: &str) -> Result<HealthResponse, ClientError> {
        self.get_json(endpoint(server_url, "/health")).await
    }

    async fn queue_count(&self, server_url: &str) -> Result<usize, ClientError> {
        let list: QueueListResponse = self.get_json(endpoint(server_url, "/queue")).await?;
        Ok(list.count)
    }

    async fn send(
        &self,
        server_url: &str,
        url: &str,
    ) -> Result<ApiReply<SendResponse>, ClientError> {
        let request = self
            .http
            .post(endpoint(server_url, "/send"))
            .json(&UrlRequest::new(url));
        self.action(request).await
    }

    async fn enqueue(
        &self,
        server_url: &str,
        url: &str,
    ) -> Result<ApiReply<QueueAddResponse>, ClientError> {
        let request = self
            .http
            .post(endpoint(server_url, "/queue"))
            .json(&UrlRequest::new(url));
        self.action(request).await
    }

    async fn send_queue(
        &self,
        server_url: &str,
    ) -> Result<ApiReply<QueueSendResponse>, ClientError> {
        self.action(self.http.post(endpoint(server_url, "/queue/send")))
            .await
    }

    async fn clear_queue(
        &self,
        server_url: &str,
    ) -> Result<ApiReply<MessageResponse>, ClientError> {
        self.action(self.http.delete(endpoint(server_url, "/queue/clear")))
            .await
    }

    async fn preview(
        &self,
        server_url: &str,
        url: &str,
    ) -> Result<ApiReply<PreviewResponse>, ClientError> {
        let request = self
            .http
            .post(endpoint(server_url, "/preview"))
            .json(&UrlRequest::new(url));
        self.action(request).await
    }
}

fn endpoint(server_url: &str, path: &str) -> String {
    format!("{}{}", server_url.trim_end_matches('/'), path)
}

/// The server reports domain errors as `{success: false, error}` with a
/// 4xx/5xx status, so the body is read whatever the status. A body that is
/// neither shape falls back to the status code.
fn decode_reply<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<ApiReply<T>, ClientError> {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) if !status.is_success() => return Err(ClientError::Status(status.as_u16())),
        Err(err) => return Err(ClientError::Decode(err.to_string())),
    };

    if value.get("success").and_then(Value::as_bool) == Some(true) {
        return serde_json::from_value(value)
            .map(ApiReply::Accepted)
            .map_err(|err| ClientError::Decode(err.to_string()));
    }

    match serde_json::from_value::<ErrorBody>(value) {
        Ok(refusal) => Ok(ApiReply::Refused(refusal.error)),
        Err(_) if !status.is_success() => Err(ClientError::Status(status.as_u16())),
        Err(err) => Err(ClientError::Decode(err.to_string())),
    }
}

fn transport(err: reqwest::Error) -> ClientError {
    ClientError::Transport(err.to_string())
}
