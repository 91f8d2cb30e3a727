//! Observability
//!
//! Structured logging to stderr and the per-invocation tool span.

pub mod logging;

pub use logging::{init_default_logging, init_logging, LogFormat};

pub use logging::tool_span;
