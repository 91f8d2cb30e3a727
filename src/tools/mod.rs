//! Tool gateway
//!
//! Tools describe themselves with a JSON schema. [`ToolSystem`] validates every
//! argument bag against that schema before the tool runs, so malformed calls
//! never reach the network.

use crate::error::{GatewayError, GatewayResult};
use crate::notify::ChangeNotifier;
use crate::reader::ReaderApi;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::Instrument;

pub mod builtin;

pub use builtin::{AddDocumentTool, ListDocumentsTool};

/// Tool interface
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and JSON schema of the parameters
    fn describe(&self) -> ToolDescription;

    /// Run the tool. Parameters have already passed schema validation
    async fn execute(&self, parameters: &Value) -> GatewayResult<Value>;
}

/// Tool description
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescription {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Registry and dispatcher for tools
pub struct ToolSystem {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolSystem {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Tool system exposing `add-document` and `list-documents`
    pub fn reader(reader: Arc<dyn ReaderApi>, notifier: Arc<dyn ChangeNotifier>) -> Self {
        let mut system = Self::new();
        system.register(Box::new(AddDocumentTool::new(reader.clone(), notifier)));
        system.register(Box::new(ListDocumentsTool::new(reader)));
        system
    }

    /// Register a tool under the name from its description, replacing any previous one
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.describe().name;
        self.tools.insert(name, tool);
    }

    /// Get tool description
    pub fn describe_tool(&self, tool_name: &str) -> Option<ToolDescription> {
        self.tools.get(tool_name).map(|tool| tool.describe())
    }

    /// Descriptions of every registered tool, ordered by name
    pub fn descriptions(&self) -> Vec<ToolDescription> {
        self.tools.values().map(|tool| tool.describe()).collect()
    }

    /// Execute tool with validated parameters
    pub async fn execute_tool(&self, tool_name: &str, parameters: &Value) -> GatewayResult<Value> {
        let tool = self
            .tools
            .get(tool_name)
            .ok_or_else(|| GatewayError::validation(format!("Unknown tool: {tool_name}")))?;

        // Clients may omit arguments entirely for tools without required fields.
        let empty = json!({});
        let parameters = if parameters.is_null() { &empty } else { parameters };

        let span = crate::tool_span!(tool = tool_name);
        async {
            validate_parameters(&tool.describe(), parameters)?;
            tool.execute(parameters).await
        }
        .instrument(span)
        .await
    }

    /// Get list of available tools
    pub fn list_tools(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }
}

impl Default for ToolSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate parameters against the tool schema
fn validate_parameters(description: &ToolDescription, parameters: &Value) -> GatewayResult<()> {
    let validator = jsonschema::validator_for(&description.parameters).map_err(|e| {
        GatewayError::validation(format!(
            "Schema compilation error for {}: {e}",
            description.name
        ))
    })?;

    validator.validate(parameters).map_err(|errors| {
        let error_messages: Vec<String> = errors
            .map(|e| format!("At '{}': {}", e.instance_path, e))
            .collect();
        GatewayError::validation(error_messages.join("; "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockReader, RecordingNotifier};

    fn reader_system() -> (ToolSystem, Arc<MockReader>, Arc<RecordingNotifier>) {
        let reader = Arc::new(MockReader::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let system = ToolSystem::reader(reader.clone(), notifier.clone());
        (system, reader, notifier)
    }

    #[test]
    fn test_tool_system_creation() {
        let tool_system = ToolSystem::new();
        assert_eq!(tool_system.list_tools().len(), 0);
    }

    #[test]
    fn test_reader_system_registers_both_tools() {
        let (system, _, _) = reader_system();
        assert_eq!(system.list_tools(), vec!["add-document", "list-documents"]);

        let description = system.describe_tool("list-documents").unwrap();
        assert_eq!(description.parameters["required"], json!(["location"]));
        assert!(system.describe_tool("get-document").is_none());
    }

    #[tokio::test]
    async fn test_tool_execution_unknown_tool() {
        let (system, reader, _) = reader_system();
        let result = system.execute_tool("unknown", &json!({})).await;

        assert!(matches!(result, Err(GatewayError::Validation { .. })));
        assert_eq!(reader.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_null_arguments_fail_required_check() {
        let (system, reader, _) = reader_system();
        let result = system.execute_tool("add-document", &Value::Null).await;

        match result {
            Err(GatewayError::Validation { message }) => assert!(message.contains("url")),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(reader.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_non_object_arguments_rejected() {
        let (system, reader, _) = reader_system();
        let result = system.execute_tool("list-documents", &json!(["new"])).await;

        assert!(matches!(result, Err(GatewayError::Validation { .. })));
        assert_eq!(reader.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_wrong_parameter_type_rejected() {
        let (system, reader, _) = reader_system();
        let result = system.execute_tool("add-document", &json!({"url": 42})).await;

        assert!(matches!(result, Err(GatewayError::Validation { .. })));
        assert_eq!(reader.call_count().await, 0);
    }
}
