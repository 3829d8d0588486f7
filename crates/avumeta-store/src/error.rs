//! Metadata store error types

use avumeta_common::CatalogError;
use thiserror::Error;

/// Status reported for a local cache inconsistency
pub const LOCAL_INCONSISTENCY_STATUS: i32 = -2;

/// Result type for metadata operations
pub type MetaResult<T> = std::result::Result<T, MetaError>;

/// Errors from metadata container operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetaError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("catalog accepted the change but no cached triplet matches {name} = {value} [{unit}]")]
    LocalInconsistency {
        name: String,
        value: String,
        unit: String,
    },
}

impl MetaError {
    pub fn local_inconsistency(name: &str, value: &str, unit: &str) -> Self {
        Self::LocalInconsistency {
            name: name.to_string(),
            value: value.to_string(),
            unit: unit.to_string(),
        }
    }

    /// Negative status code for the presentation layer
    #[must_use]
    pub const fn status_code(&self) -> i32 {
        match self {
            Self::Catalog(e) => e.status_code(),
            Self::LocalInconsistency { .. } => LOCAL_INCONSISTENCY_STATUS,
        }
    }

    /// Whether the catalog itself refused the request
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Catalog(_))
    }
}

/// Collapse a result to the integer status convention: 0 or a negative code
pub fn status_of<T>(result: &MetaResult<T>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(e) => e.status_code(),
    }
}
