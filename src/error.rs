//! Error types for the cache facade
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

use crate::store::StoreError;

// == Messages ==
/// Returned when `set` is called without a usable key.
pub const MSG_SET_REQUIRES_KEY: &str = "Set requires a key and a val";
/// Returned when a scalar is offered as a cache value.
pub const MSG_VAL_MUST_BE_OBJECT: &str = "Val must be an object";
/// Returned when a read is issued without a key.
pub const MSG_NO_KEY: &str = "No key specified";
/// Generic message for failed reads; the store's detail is discarded.
pub const MSG_GET_FAILED: &str = "There was an error getting the data";
/// Generic message for failed writes.
pub const MSG_SET_FAILED: &str = "There was an error setting the data";

// == Vole Error Enum ==
/// Unified error type for the cache facade.
#[derive(Error, Debug)]
pub enum VoleError {
    /// Arguments rejected before any store call
    #[error("{0}")]
    Validation(String),

    /// The store call failed; the original detail is not carried
    #[error("{0}")]
    Transport(String),

    /// Raw store failure, forwarded as-is (used by `bust`)
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A value could not be encoded, or a single-key read returned invalid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// File sink could not be opened
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VoleError {
    /// Returns true for errors raised before the store was contacted.
    pub fn is_validation(&self) -> bool {
        matches!(self, VoleError::Validation(_))
    }

    pub(crate) fn validation(msg: &str) -> Self {
        VoleError::Validation(msg.to_string())
    }

    pub(crate) fn transport(msg: &str) -> Self {
        VoleError::Transport(msg.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache facade.
pub type Result<T> = std::result::Result<T, VoleError>;
