//! Readwise Gateway
//!
//! An MCP server that lets a chat client save documents to, and list documents
//! from, a Readwise Reader library.
//!
//! # Overview
//!
//! - [`tools`]: the `add-document` and `list-documents` tools with JSON schema validation
//! - [`reader`]: the upstream Reader API client
//! - [`notify`]: the resource-change notification port
//! - [`protocol`] and [`transport`]: JSON-RPC dispatch over stdio
//!
//! # Quick Start
//!
//! ```rust
//! use readwise_gateway::notify::NoopNotifier;
//! use readwise_gateway::testing::MockReader;
//! use readwise_gateway::tools::ToolSystem;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! runtime.block_on(async {
//!     let tools = ToolSystem::reader(Arc::new(MockReader::new()), Arc::new(NoopNotifier));
//!     let documents = tools
//!         .execute_tool("list-documents", &json!({"location": "new"}))
//!         .await
//!         .unwrap();
//!     assert_eq!(documents, json!([]));
//! });
//! ```

pub mod config;
pub mod error;
pub mod notify;
pub mod observability;
pub mod protocol;
pub mod reader;
pub mod testing;
pub mod tools;
pub mod transport;

pub use config::{ConfigError, GatewayConfig, ReaderCredentials};
pub use error::{ErrorPayload, GatewayError, GatewayResult};
pub use notify::{ChangeNotifier, ChannelNotifier, NoopNotifier};
pub use protocol::McpServer;
pub use reader::{ReaderApi, ReaderClient};
pub use tools::{Tool, ToolDescription, ToolSystem};
