//! avumeta Client - Remote catalog interfaces
//!
//! This crate defines the narrow boundary to the remote catalog: the
//! metadata update call with its positional argument record, the general
//! query builder, and an in-process catalog implementing both.

pub mod connection;
pub mod memory;
pub mod query;
pub mod update;

// Re-exports
pub use connection::CatalogConnection;
pub use memory::MemoryCatalog;
pub use query::{GenQuery, GenQueryResult, QueryCondition};
pub use update::ModAvuMetadataInput;
