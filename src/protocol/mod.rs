//! MCP protocol adapter
//!
//! JSON-RPC 2.0 message types and the dispatcher that exposes the tool
//! system to chat clients.

pub mod messages;
pub mod server;

pub use messages::*;
pub use server::McpServer;
