use thiserror::Error;

/// Transport-level failure talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("catalog unreachable: {0}")]
    Unreachable(String),
    #[error("catalog request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("catalog returned HTTP {status}")]
    Status { status: u16 },
    #[error("malformed catalog payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl CatalogError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            CatalogError::Unreachable(err.to_string())
        } else if let Some(status) = err.status() {
            CatalogError::Status {
                status: status.as_u16(),
            }
        } else {
            CatalogError::Transport(err)
        }
    }
}

/// User-facing failure of one pipeline stage.
///
/// Cancellation has no variant; a cancelled stage produces no event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetailError {
    #[error("Book not found.")]
    PrimaryNotFound,
    #[error("Could not load book details. Please try again later.")]
    PrimaryUnknown,
    #[error("Could not load similar books.")]
    SimilarUnavailable,
}
