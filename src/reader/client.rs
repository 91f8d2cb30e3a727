//! HTTP client for the Reader API

use crate::config::{ConfigError, ReaderCredentials};
use crate::error::{GatewayError, GatewayResult};
use crate::reader::models::{Document, ListPage, ListQuery, SaveOutcome, SaveRequest};
use crate::reader::ReaderApi;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::debug;

const LIST_ENDPOINT: &str = "list";
const SAVE_ENDPOINT: &str = "save";

/// Reader API client
///
/// Holds nothing mutable, so one instance is shared by every concurrent invocation.
pub struct ReaderClient {
    credentials: ReaderCredentials,
    client: Client,
}

impl ReaderClient {
    pub fn new(credentials: ReaderCredentials) -> GatewayResult<Self> {
        if credentials.api_key.trim().is_empty() {
            return Err(ConfigError::InvalidConfig("Reader API key is required".to_string()).into());
        }

        let client = Client::builder()
            .timeout(credentials.timeout)
            .build()
            .map_err(|e| GatewayError::transport(e.to_string()))?;

        Ok(Self {
            credentials,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.credentials.base_url
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.credentials.base_url.trim_end_matches('/'), name)
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.credentials.api_key)
    }

    async fn fetch_page(&self, query: &ListQuery, cursor: Option<&str>) -> GatewayResult<ListPage> {
        let response = self
            .client
            .get(self.endpoint(LIST_ENDPOINT))
            .header("Authorization", self.auth_header())
            .query(&query.to_params(cursor))
            .send()
            .await?;

        let response = error_for_status(response).await?;

        response
            .json::<ListPage>()
            .await
            .map_err(|e| GatewayError::transport(format!("Malformed list response: {e}")))
    }
}

#[async_trait]
impl ReaderApi for ReaderClient {
    async fn save_document(&self, request: &SaveRequest) -> GatewayResult<SaveOutcome> {
        let response = self
            .client
            .post(self.endpoint(SAVE_ENDPOINT))
            .header("Authorization", self.auth_header())
            .json(request)
            .send()
            .await?;

        let response = error_for_status(response).await?;
        let created = response.status() != StatusCode::OK;

        let document = response
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::transport(format!("Malformed save response: {e}")))?;

        Ok(SaveOutcome { created, document })
    }

    async fn list_documents(&self, query: &ListQuery) -> GatewayResult<Vec<Document>> {
        let mut documents = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.fetch_page(query, cursor.as_deref()).await?;
            debug!(
                location = %query.location,
                page_size = page.results.len(),
                has_next = page.next_page_cursor.is_some(),
                "Fetched list page"
            );
            documents.extend(page.results);

            match page.next_page_cursor {
                Some(next) if !next.is_empty() && cursor.as_deref() != Some(next.as_str()) => {
                    cursor = Some(next);
                }
                _ => break,
            }
        }

        Ok(documents)
    }
}

/// Turn a non-success response into an upstream error, keeping its message
async fn error_for_status(response: Response) -> GatewayResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::upstream(
        status.as_u16(),
        upstream_message(status, &body),
    ))
}

/// Extract the most useful message from an error body
fn upstream_message(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();

    if let Ok(json) = serde_json::from_str::<Value>(trimmed) {
        if let Some(detail) = json.get("detail").and_then(Value::as_str) {
            return detail.to_string();
        }
    }

    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("Unknown upstream error")
        .to_string()
}
