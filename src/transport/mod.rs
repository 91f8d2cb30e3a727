//! Transport layer for client sessions
//!
//! MCP clients launch the gateway as a subprocess and talk over stdin/stdout.

pub mod stdio;

pub use stdio::{outbound_channel, serve};
