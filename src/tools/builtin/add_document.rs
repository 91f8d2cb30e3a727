//! `add-document` tool
//!
//! Saves a URL to the reading library and signals a resource-list change.

use crate::error::{GatewayError, GatewayResult};
use crate::notify::ChangeNotifier;
use crate::reader::{ReaderApi, SaveRequest};
use crate::tools::{Tool, ToolDescription};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

pub const TOOL_NAME: &str = "add-document";

pub struct AddDocumentTool {
    reader: Arc<dyn ReaderApi>,
    notifier: Arc<dyn ChangeNotifier>,
}

impl AddDocumentTool {
    pub fn new(reader: Arc<dyn ReaderApi>, notifier: Arc<dyn ChangeNotifier>) -> Self {
        Self { reader, notifier }
    }

    /// Pull a well-formed absolute URL out of the arguments (pure function)
    fn parse_url(parameters: &Value) -> GatewayResult<String> {
        let raw = parameters
            .get("url")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();

        if raw.is_empty() {
            return Err(GatewayError::validation("Missing required argument: url"));
        }

        Url::parse(raw)
            .map_err(|e| GatewayError::validation(format!("Invalid url '{raw}': {e}")))?;

        Ok(raw.to_string())
    }

    async fn notify_change(&self) {
        if let Err(e) = self.notifier.publish_change().await {
            warn!(error = %e, "Failed to publish resource change notification");
        }
    }
}

/// Description advertised to clients
pub fn description() -> ToolDescription {
    ToolDescription {
        name: TOOL_NAME.to_string(),
        description: "Add a new document to Readwise Reader by URL".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "minLength": 1,
                    "format": "uri",
                    "description": "URL of the document to save"
                }
            },
            "required": ["url"]
        }),
    }
}

#[async_trait]
impl Tool for AddDocumentTool {
    fn describe(&self) -> ToolDescription {
        description()
    }

    async fn execute(&self, parameters: &Value) -> GatewayResult<Value> {
        let url = Self::parse_url(parameters)?;

        let outcome = self.reader.save_document(&SaveRequest::new(url.as_str())).await?;
        let id = outcome.id().unwrap_or("unknown");

        if outcome.created {
            info!(document_id = id, url = %url, "Added document");
        } else {
            info!(document_id = id, url = %url, "Document already exists");
        }

        self.notify_change().await;

        Ok(outcome.document)
    }
}
