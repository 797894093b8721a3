use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::models::{Item, ItemPayload};

/// Shown when a failure carries no message of its own.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server returned {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Status { status: u16, message: Option<String> },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text for the notification region: the server's `error` field when it
    /// sent one, otherwise the generic fallback.
    pub fn user_message(&self) -> &str {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => message,
            _ => GENERIC_ERROR,
        }
    }
}

/// The four collection operations the dashboard relies on.
#[async_trait]
pub trait ItemsApi: Send + Sync {
    async fn list_items(&self) -> Result<Vec<Item>, ApiError>;
    async fn create_item(&self, payload: &ItemPayload) -> Result<(), ApiError>;
    async fn update_item(&self, id: &str, payload: &ItemPayload) -> Result<(), ApiError>;
    async fn delete_item(&self, id: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// `ItemsApi` over HTTP against `<base_url>/api/items`.
#[derive(Debug, Clone)]
pub struct HttpItemsApi {
    client: Client,
    base_url: String,
}

impl HttpItemsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn collection_url(&self) -> String {
        format!("{}/api/items", self.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!(
            "{}/api/items/{}",
            self.base_url,
            utf8_percent_encode(id, PATH_SEGMENT)
        )
    }
}

async fn check(result: reqwest::Result<Response>) -> Result<Response, ApiError> {
    let response = result.map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .map(|body| body.error)
        .filter(|error| !error.trim().is_empty());
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ItemsApi for HttpItemsApi {
    async fn list_items(&self) -> Result<Vec<Item>, ApiError> {
        let response = check(self.client.get(self.collection_url()).send().await).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn create_item(&self, payload: &ItemPayload) -> Result<(), ApiError> {
        check(
            self.client
                .post(self.collection_url())
                .json(payload)
                .send()
                .await,
        )
        .await?;
        Ok(())
    }

    async fn update_item(&self, id: &str, payload: &ItemPayload) -> Result<(), ApiError> {
        check(self.client.put(self.item_url(id)).json(payload).send().await).await?;
        Ok(())
    }

    async fn delete_item(&self, id: &str) -> Result<(), ApiError> {
        check(self.client.delete(self.item_url(id)).send().await).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_urls_escape_the_id() {
        let api = HttpItemsApi::new("http://localhost:5000/");
        assert_eq!(api.collection_url(), "http://localhost:5000/api/items");
        assert_eq!(api.item_url("42"), "http://localhost:5000/api/items/42");
        assert_eq!(
            api.item_url("a/b c?"),
            "http://localhost:5000/api/items/a%2Fb%20c%3F"
        );
    }

    #[test]
    fn user_message_prefers_server_error() {
        let err = ApiError::Status {
            status: 400,
            message: Some("rating must be between 1 and 10".to_string()),
        };
        assert_eq!(err.user_message(), "rating must be between 1 and 10");

        let err = ApiError::Status {
            status: 502,
            message: None,
        };
        assert_eq!(err.user_message(), GENERIC_ERROR);

        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.user_message(), GENERIC_ERROR);
    }
}
