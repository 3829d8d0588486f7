//! avumeta Common - Shared types and utilities
//!
//! This crate provides the catalog object identity, AVU triplet and query
//! column types, error definitions, and configuration shared by the
//! catalog client, the metadata store and the CLI.

pub mod config;
pub mod error;
pub mod types;

pub use config::{MetadataConfig, ReconcilePolicy, RemovalPolicy};
pub use error::{CatalogError, CatalogResult};
pub use types::*;
