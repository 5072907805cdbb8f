use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Success marker used by the catalog service in its `error` field.
pub const STATUS_OK: &str = "0";
/// Code the catalog service uses when a book id is unknown.
pub const STATUS_NOT_FOUND: &str = "1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Unknown,
}

/// Application-level failure embedded in an otherwise successful response.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("catalog error code {raw_code} ({code:?})")]
pub struct ApiError {
    pub code: ErrorCode,
    pub raw_code: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, raw_code: impl Into<String>) -> Self {
        Self {
            code,
            raw_code: raw_code.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::NotFound
    }
}

/// Interprets the `error` field of a catalog payload.
///
/// An absent, empty or `"0"` code is success; `"1"` is not-found and every
/// other value is reported as unknown.
pub fn check_status(raw_code: Option<&str>) -> Result<(), ApiError> {
    let Some(code) = raw_code.map(str::trim) else {
        return Ok(());
    };

    match code {
        "" | STATUS_OK => Ok(()),
        STATUS_NOT_FOUND => Err(ApiError::new(ErrorCode::NotFound, code)),
        other => Err(ApiError::new(ErrorCode::Unknown, other)),
    }
}
