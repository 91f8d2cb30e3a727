//! Wire types for the Reader API

use crate::error::GatewayError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Where a document lives in the reading library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    New,
    Later,
    Archive,
    Feed,
}

impl Location {
    pub const ALL: [Location; 4] = [
        Location::New,
        Location::Later,
        Location::Archive,
        Location::Feed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::New => "new",
            Location::Later => "later",
            Location::Archive => "archive",
            Location::Feed => "feed",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Location::as_str).collect()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|location| location.as_str() == s)
            .ok_or_else(|| {
                GatewayError::validation(format!(
                    "Invalid location '{s}', expected one of: {}",
                    Self::names().join(", ")
                ))
            })
    }
}

/// Document category filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Article,
    Email,
    Rss,
    Highlight,
    Note,
    Pdf,
    Epub,
    Tweet,
    Video,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Article,
        Category::Email,
        Category::Rss,
        Category::Highlight,
        Category::Note,
        Category::Pdf,
        Category::Epub,
        Category::Tweet,
        Category::Video,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Article => "article",
            Category::Email => "email",
            Category::Rss => "rss",
            Category::Highlight => "highlight",
            Category::Note => "note",
            Category::Pdf => "pdf",
            Category::Epub => "epub",
            Category::Tweet => "tweet",
            Category::Video => "video",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Category::as_str).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| {
                GatewayError::validation(format!(
                    "Invalid category '{s}', expected one of: {}",
                    Self::names().join(", ")
                ))
            })
    }
}

/// A document as returned by the list endpoint.
///
/// Only `id` is typed. Every other field is kept as the upstream sent it,
/// including explicit nulls, and serialised back out unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    pub fn source_url(&self) -> Option<&str> {
        self.str_field("source_url")
    }

    /// Raw category, which may be newer than [`Category`]
    pub fn category(&self) -> Option<&str> {
        self.str_field("category")
    }

    pub fn updated_at(&self) -> Option<&str> {
        self.str_field("updated_at")
    }
}

/// One page of the list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ListPage {
    #[serde(default)]
    pub count: u64,
    #[serde(rename = "nextPageCursor", default)]
    pub next_page_cursor: Option<String>,
    #[serde(default)]
    pub results: Vec<Document>,
}

/// Body of a save request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SaveRequest {
    pub url: String,
}

impl SaveRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Result of a save request
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    /// `false` when the upstream already had the URL
    pub created: bool,
    /// Upstream response body, untouched
    pub document: Value,
}

impl SaveOutcome {
    pub fn id(&self) -> Option<&str> {
        self.document.get("id").and_then(Value::as_str)
    }
}

/// Validated filters for the list endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub location: Location,
    pub category: Option<Category>,
    /// RFC 3339 lower bound on `updated_at`
    pub updated_after: Option<String>,
}

impl ListQuery {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            category: None,
            updated_after: None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_updated_after(mut self, updated_after: impl Into<String>) -> Self {
        self.updated_after = Some(updated_after.into());
        self
    }

    /// Query string pairs for one page request
    pub fn to_params(&self, page_cursor: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![("location", self.location.to_string())];

        if let Some(category) = self.category {
            params.push(("category", category.to_string()));
        }
        if let Some(updated_after) = &self.updated_after {
            params.push(("updatedAfter", updated_after.clone()));
        }
        if let Some(cursor) = page_cursor {
            params.push(("pageCursor", cursor.to_string()));
        }

        params
    }
}
