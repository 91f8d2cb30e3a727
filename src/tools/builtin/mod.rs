//! Builtin reading library tools
//!
//! Each tool keeps argument parsing in pure functions separate from the
//! upstream call.

use crate::tools::ToolDescription;

pub mod add_document;
pub mod list_documents;

pub use add_document::AddDocumentTool;
pub use list_documents::ListDocumentsTool;

/// Descriptions of the builtin tools, available without a configured client
pub fn descriptions() -> Vec<ToolDescription> {
    vec![add_document::description(), list_documents::description()]
}
