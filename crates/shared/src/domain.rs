use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub String);

impl BookId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BookId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Inventory entry as listed in the catalog grid.
///
/// Aliases accept the field names used by the bundled seed data
/// (`isbn13`, `price`, `image`, `url`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    #[serde(alias = "isbn13")]
    pub id: BookId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, alias = "price", skip_serializing_if = "Option::is_none")]
    pub price_display: Option<String>,
    #[serde(default, alias = "image", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, alias = "url", skip_serializing_if = "Option::is_none")]
    pub detail_url: Option<String>,
    #[serde(default)]
    pub selected: bool,
}

/// Receives the selection made in the presentation layer.
pub trait SelectionHandler {
    fn on_select(&mut self, book: &BookSummary);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetail {
    pub id: BookId,
    pub title: String,
    pub subtitle: Option<String>,
    pub authors: Option<String>,
    pub publisher: Option<String>,
    pub year: Option<String>,
    pub pages: Option<String>,
    pub language: Option<String>,
    pub isbn10: Option<String>,
    pub price: Option<String>,
    pub rating: Option<String>,
    pub description: Option<String>,
    pub sample_links: BTreeMap<String, String>,
    pub canonical_url: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarBookSummary {
    pub id: BookId,
    pub title: String,
    pub image_url: Option<String>,
    pub price_display: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStage {
    #[default]
    Idle,
    LoadingPrimary,
    LoadingSecondary,
    Ready,
    PrimaryFailed,
    SecondaryFailed,
}

impl FetchStage {
    /// Terminal stages are only left through a dismiss or a new open.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            FetchStage::Ready | FetchStage::PrimaryFailed | FetchStage::SecondaryFailed
        )
    }
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FetchStage::Idle => "idle",
            FetchStage::LoadingPrimary => "loading_primary",
            FetchStage::LoadingSecondary => "loading_secondary",
            FetchStage::Ready => "ready",
            FetchStage::PrimaryFailed => "primary_failed",
            FetchStage::SecondaryFailed => "secondary_failed",
        };
        f.write_str(label)
    }
}
