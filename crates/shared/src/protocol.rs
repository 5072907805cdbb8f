//! Wire payloads of the remote catalog service.
//!
//! The service is loosely typed: numeric fields sometimes arrive as strings,
//! the `error` code can be either, and `books` may be missing or malformed.
//! Decoding here is lenient so that only the embedded error code decides
//! whether a response failed.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    domain::{BookDetail, BookId, SimilarBookSummary},
    error::{check_status, ApiError},
};

/// Response of `GET /books/{id}`.
///
/// Field names follow [`BookDetail`]; the service's own names (`isbn13`,
/// `desc`, `pdf`, `url`, `image`) are read as fallbacks when the primary
/// name is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawBookRecord")]
pub struct BookRecordPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn10: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_links: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl BookRecordPayload {
    pub fn check_status(&self) -> Result<(), ApiError> {
        check_status(self.error.as_deref())
    }

    /// Builds the detail record, keeping `requested` as the id when the
    /// payload does not carry one.
    pub fn into_detail(self, requested: &BookId) -> BookDetail {
        let id = non_blank(self.id)
            .map(BookId)
            .unwrap_or_else(|| requested.clone());

        BookDetail {
            id,
            title: self.title.unwrap_or_default(),
            subtitle: self.subtitle,
            authors: self.authors,
            publisher: self.publisher,
            year: self.year,
            pages: self.pages,
            language: self.language,
            isbn10: self.isbn10,
            price: self.price,
            rating: self.rating,
            description: self.description,
            sample_links: self.sample_links.unwrap_or_default(),
            canonical_url: self.canonical_url,
            image_url: self.image_url,
        }
    }
}

// Both spellings of a field may appear in one payload, so each gets its own slot.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBookRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    error: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    isbn13: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    authors: Option<String>,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    year: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pages: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    isbn10: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    price: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    rating: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    sample_links: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pdf: Option<BTreeMap<String, String>>,
    #[serde(default)]
    canonical_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

impl From<RawBookRecord> for BookRecordPayload {
    fn from(raw: RawBookRecord) -> Self {
        Self {
            error: raw.error,
            id: non_blank(raw.id).or_else(|| non_blank(raw.isbn13)),
            title: raw.title,
            subtitle: raw.subtitle,
            authors: raw.authors,
            publisher: raw.publisher,
            year: raw.year,
            pages: raw.pages,
            language: raw.language,
            isbn10: raw.isbn10,
            price: raw.price,
            rating: raw.rating,
            description: raw.description.or(raw.desc),
            sample_links: raw.sample_links.or(raw.pdf),
            canonical_url: raw.canonical_url.or(raw.url),
            image_url: raw.image_url.or(raw.image),
        }
    }
}

/// Response of `GET /search/{query}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPayload {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub total: Option<String>,
    #[serde(default, deserialize_with = "lenient_books")]
    pub books: Vec<SearchEntryPayload>,
}

impl SearchPayload {
    pub fn check_status(&self) -> Result<(), ApiError> {
        check_status(self.error.as_deref())
    }
}

/// One search hit. Accepts `id`/`isbn13`, `imageUrl`/`image` and
/// `priceDisplay`/`price`, preferring the first of each pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawSearchEntry")]
pub struct SearchEntryPayload {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_display: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSearchEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    isbn13: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    price_display: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    price: Option<String>,
}

impl TryFrom<RawSearchEntry> for SearchEntryPayload {
    type Error = String;

    fn try_from(raw: RawSearchEntry) -> Result<Self, Self::Error> {
        let id = non_blank(raw.id)
            .or_else(|| non_blank(raw.isbn13))
            .ok_or_else(|| "search entry has no id".to_string())?;
        Ok(Self {
            id,
            title: raw.title.unwrap_or_default(),
            subtitle: raw.subtitle,
            image_url: raw.image_url.or(raw.image),
            price_display: raw.price_display.or(raw.price),
        })
    }
}

impl From<SearchEntryPayload> for SimilarBookSummary {
    fn from(entry: SearchEntryPayload) -> Self {
        Self {
            id: BookId(entry.id),
            title: entry.title,
            image_url: entry.image_url,
            price_display: entry.price_display,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(Value::deserialize(deserializer)?))
}

// Missing or non-array `books` is an empty result; undecodable entries are skipped.
fn lenient_books<'de, D>(deserializer: D) -> Result<Vec<SearchEntryPayload>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(entries) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect())
}
