//! Remote catalog connection trait

use crate::query::{GenQuery, GenQueryResult};
use crate::update::ModAvuMetadataInput;
use avumeta_common::CatalogResult;

/// Connection to the remote catalog
///
/// Both calls block until the catalog answers. Implementations report
/// catalog failures as `CatalogError::Status` with the negative status
/// code unchanged; a successful update returns its non-negative status.
pub trait CatalogConnection: Send + Sync {
    /// Issue one metadata update call
    fn mod_avu_metadata(&self, input: &ModAvuMetadataInput) -> CatalogResult<i32>;

    /// Execute a general query
    fn gen_query(&self, query: &GenQuery) -> CatalogResult<GenQueryResult>;
}
