//! avumeta Store - Cached AVU metadata for catalog objects
//!
//! This crate keeps a local copy of a catalog object's attribute-value-unit
//! triplets and keeps it coherent with the catalog across refresh, add,
//! modify and remove. Every operation issues exactly one catalog call and
//! edits the cache only after the catalog accepted it.

pub mod attributes;
pub mod error;
pub mod metadata;

// Re-exports
pub use attributes::{AttributeStore, AvuEntry, KeyVals};
pub use error::{status_of, MetaError, MetaResult};
pub use metadata::ObjMetadata;
