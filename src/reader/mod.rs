//! Upstream Reader API
//!
//! [`ReaderApi`] is the seam between the tools and the network. The real
//! implementation is [`ReaderClient`]; tests inject mocks from [`crate::testing`].

use crate::error::GatewayResult;
use async_trait::async_trait;

pub mod client;
pub mod models;

pub use client::ReaderClient;
pub use models::{Category, Document, ListPage, ListQuery, Location, SaveOutcome, SaveRequest};

/// Operations the gateway needs from the reading library
#[async_trait]
pub trait ReaderApi: Send + Sync {
    /// Save a URL to the library
    async fn save_document(&self, request: &SaveRequest) -> GatewayResult<SaveOutcome>;

    /// List documents matching the query, following upstream pagination
    async fn list_documents(&self, query: &ListQuery) -> GatewayResult<Vec<Document>>;
}
