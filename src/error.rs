//! Error types for board commands and configuration.

use thiserror::Error;

/// Why a drop request was refused
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DropError {
    #[error("not a digit: {0:?} (pick 0-9)")]
    NotNumeric(String),

    #[error("digit out of range: {0} (pick 0-9)")]
    OutOfRange(i64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
