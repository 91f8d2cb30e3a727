//! Mock implementations for testing
//!
//! Provides a mock [`ReaderApi`] and a recording [`ChangeNotifier`] so the tool
//! gateway can be exercised without a network or a protocol session.

use crate::config::ConfigError;
use crate::error::{GatewayError, GatewayResult};
use crate::notify::{ChangeNotifier, NotifyError};
use crate::reader::{Document, ListQuery, ReaderApi, SaveOutcome, SaveRequest};
use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mock reader for testing
#[derive(Debug, Default)]
pub struct MockReader {
    pub saved: Arc<Mutex<Vec<SaveRequest>>>,
    pub queries: Arc<Mutex<Vec<ListQuery>>>,
    save_outcome: Option<SaveOutcome>,
    save_error: Option<CannedError>,
    documents: Vec<Document>,
    list_error: Option<CannedError>,
}

impl MockReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_save_outcome(mut self, outcome: SaveOutcome) -> Self {
        self.save_outcome = Some(outcome);
        self
    }

    pub fn with_save_error(mut self, error: GatewayError) -> Self {
        self.save_error = Some(CannedError::from(error));
        self
    }

    pub fn with_documents(mut self, documents: Vec<Document>) -> Self {
        self.documents = documents;
        self
    }

    pub fn with_list_error(mut self, error: GatewayError) -> Self {
        self.list_error = Some(CannedError::from(error));
        self
    }

    pub async fn saved_urls(&self) -> Vec<String> {
        self.saved
            .lock()
            .await
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }

    pub async fn list_queries(&self) -> Vec<ListQuery> {
        self.queries.lock().await.clone()
    }

    /// Total number of upstream calls of either kind
    pub async fn call_count(&self) -> usize {
        self.saved.lock().await.len() + self.queries.lock().await.len()
    }
}

/// Replayable copy of a [`GatewayError`], which is not `Clone`
#[derive(Debug, Clone)]
enum CannedError {
    Validation(String),
    Upstream(u16, String),
    Transport(String),
    MissingCredential(String),
    InvalidConfig(String),
}

impl From<GatewayError> for CannedError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Validation { message } => CannedError::Validation(message),
            GatewayError::Upstream { status, message } => CannedError::Upstream(status, message),
            GatewayError::Transport { message } => CannedError::Transport(message),
            GatewayError::Configuration(ConfigError::MissingCredential(name)) => {
                CannedError::MissingCredential(name)
            }
            GatewayError::Configuration(ConfigError::InvalidConfig(message)) => {
                CannedError::InvalidConfig(message)
            }
            GatewayError::Configuration(other) => CannedError::InvalidConfig(other.to_string()),
        }
    }
}

impl CannedError {
    fn replay(&self) -> GatewayError {
        match self {
            CannedError::Validation(message) => GatewayError::validation(message.clone()),
            CannedError::Upstream(status, message) => {
                GatewayError::upstream(*status, message.clone())
            }
            CannedError::Transport(message) => GatewayError::transport(message.clone()),
            CannedError::MissingCredential(name) => {
                ConfigError::MissingCredential(name.clone()).into()
            }
            CannedError::InvalidConfig(message) => {
                ConfigError::InvalidConfig(message.clone()).into()
            }
        }
    }
}

#[async_trait]
impl ReaderApi for MockReader {
    async fn save_document(&self, request: &SaveRequest) -> GatewayResult<SaveOutcome> {
        self.saved.lock().await.push(request.clone());

        if let Some(error) = &self.save_error {
            return Err(error.replay());
        }

        Ok(self.save_outcome.clone().unwrap_or_else(|| SaveOutcome {
            created: true,
            document: json!({
                "id": "mock-document",
                "url": "https://read.readwise.io/new/read/mock-document"
            }),
        }))
    }

    async fn list_documents(&self, query: &ListQuery) -> GatewayResult<Vec<Document>> {
        self.queries.lock().await.push(query.clone());

        if let Some(error) = &self.list_error {
            return Err(error.replay());
        }

        Ok(self.documents.clone())
    }
}

/// Notifier that counts publishes
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    published: AtomicUsize,
    should_fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts publishes but reports every one as failed
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    pub fn publish_count(&self) -> usize {
        self.published.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChangeNotifier for RecordingNotifier {
    async fn publish_change(&self) -> Result<(), NotifyError> {
        self.published.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(NotifyError::Closed);
        }
        Ok(())
    }
}
