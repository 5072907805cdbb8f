use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::BookId,
    protocol::{BookRecordPayload, SearchPayload},
};
use tracing::debug;
use url::Url;

use crate::error::CatalogError;

/// Remote catalog lookups used by the detail pipeline.
///
/// Implementations report only transport failures; application-level
/// error codes stay inside the returned payload.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn fetch_book(&self, id: &BookId) -> Result<BookRecordPayload, CatalogError>;
    /// `query` is already URL-encoded and is used as a single path segment.
    async fn search(&self, query: &str) -> Result<SearchPayload, CatalogError>;
}

pub struct HttpCatalogClient {
    http: Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(base_url: &str) -> Result<Self, CatalogError> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, CatalogError> {
        let parsed = Url::parse(base_url).map_err(|e| CatalogError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CatalogError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(CatalogError::Transport)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, CatalogError> {
        debug!(%url, "catalog request");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(CatalogError::from_reqwest)?
            .error_for_status()
            .map_err(CatalogError::from_reqwest)?;
        let body = response.bytes().await.map_err(CatalogError::from_reqwest)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl CatalogService for HttpCatalogClient {
    async fn fetch_book(&self, id: &BookId) -> Result<BookRecordPayload, CatalogError> {
        self.get_json(format!(
            "{}/books/{}",
            self.base_url,
            urlencoding::encode(id.as_str())
        ))
        .await
    }

    async fn search(&self, query: &str) -> Result<SearchPayload, CatalogError> {
        self.get_json(format!("{}/search/{query}", self.base_url))
            .await
    }
}
