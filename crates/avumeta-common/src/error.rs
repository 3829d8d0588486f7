//! Error types for catalog calls
//!
//! The remote catalog reports failures as negative integer statuses. They
//! are carried verbatim so that callers can render the exact code.

use thiserror::Error;

/// Result type for remote catalog calls
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Status code reported for local snapshot failures
pub const SNAPSHOT_ERROR_STATUS: i32 = -1;

/// Failure reported by the remote catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog call failed with status {code}")]
    Status { code: i32 },

    #[error("catalog snapshot error: {0}")]
    Snapshot(String),
}

impl CatalogError {
    /// Map a raw catalog status: negative is a failure, anything else is kept
    pub const fn check(status: i32) -> CatalogResult<i32> {
        if status < 0 {
            Err(Self::Status { code: status })
        } else {
            Ok(status)
        }
    }

    /// Create a snapshot error
    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot(msg.into())
    }

    /// Negative status code for the presentation layer
    #[must_use]
    pub const fn status_code(&self) -> i32 {
        match self {
            Self::Status { code } => *code,
            Self::Snapshot(_) => SNAPSHOT_ERROR_STATUS,
        }
    }
}
