//! `list-documents` tool

use crate::error::{GatewayError, GatewayResult};
use crate::reader::{Category, ListQuery, Location, ReaderApi};
use crate::tools::{Tool, ToolDescription};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

pub const TOOL_NAME: &str = "list-documents";

pub struct ListDocumentsTool {
    reader: Arc<dyn ReaderApi>,
}

impl ListDocumentsTool {
    pub fn new(reader: Arc<dyn ReaderApi>) -> Self {
        Self { reader }
    }

    /// Build the upstream query from raw arguments (pure function)
    pub fn parse_query(parameters: &Value) -> GatewayResult<ListQuery> {
        let location = parameters
            .get("location")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::validation("Missing required argument: location"))?
            .parse::<Location>()?;

        let mut query = ListQuery::new(location);

        if let Some(category) = optional_str(parameters, "category") {
            query = query.with_category(category.parse::<Category>()?);
        }

        let camel = timestamp_arg(parameters, "updatedAfter")?;
        let snake = timestamp_arg(parameters, "updated_after")?;
        let updated_after = match (camel, snake) {
            (Some(camel), Some(snake)) if camel != snake => {
                return Err(GatewayError::validation(format!(
                    "Conflicting updatedAfter '{camel}' and updated_after '{snake}'"
                )));
            }
            (camel, snake) => camel.or(snake),
        };
        if let Some(timestamp) = updated_after {
            query = query.with_updated_after(timestamp);
        }

        Ok(query)
    }
}

/// Non-blank string argument, `None` when absent, null or blank
fn optional_str<'a>(parameters: &'a Value, key: &str) -> Option<&'a str> {
    parameters
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Normalized timestamp argument. Only a missing key or null is absent.
fn timestamp_arg(parameters: &Value, key: &str) -> GatewayResult<Option<String>> {
    match parameters.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => normalize_timestamp(raw.trim()).map(Some),
        Some(other) => Err(GatewayError::validation(format!(
            "Invalid {key} {other}: expected an ISO-8601 string"
        ))),
    }
}

/// Parse an ISO-8601 timestamp into RFC 3339. Offset-less input is taken as UTC.
pub fn normalize_timestamp(raw: &str) -> GatewayResult<String> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.to_rfc3339());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc().to_rfc3339());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc().to_rfc3339());
        }
    }

    Err(GatewayError::validation(format!(
        "Invalid updatedAfter '{raw}': expected an ISO-8601 timestamp"
    )))
}

/// Description advertised to clients
pub fn description() -> ToolDescription {
    ToolDescription {
        name: TOOL_NAME.to_string(),
        description: "List documents from Readwise Reader, filtered by location, category and last update".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "enum": Location::names(),
                    "description": format!("The document's location, one of: {}", Location::names().join(", "))
                },
                "category": {
                    "type": ["string", "null"],
                    "description": format!("The document's category, one of: {}", Category::names().join(", "))
                },
                "updatedAfter": {
                    "type": ["string", "null"],
                    "description": "Only documents updated after this ISO-8601 timestamp"
                },
                "updated_after": {
                    "type": ["string", "null"],
                    "description": "Alias of updatedAfter"
                }
            },
            "required": ["location"]
        }),
    }
}

#[async_trait]
impl Tool for ListDocumentsTool {
    fn describe(&self) -> ToolDescription {
        description()
    }

    async fn execute(&self, parameters: &Value) -> GatewayResult<Value> {
        let query = Self::parse_query(parameters)?;

        let documents = self.reader.list_documents(&query).await?;
        info!(
            location = %query.location,
            count = documents.len(),
            "Fetched documents"
        );

        serde_json::to_value(&documents)
            .map_err(|e| GatewayError::transport(format!("Failed to encode documents: {e}")))
    }
}
