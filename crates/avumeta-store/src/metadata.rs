//! AVU metadata container for one catalog object
//!
//! `ObjMetadata` owns the cached triplets of a single data object or
//! collection and borrows the catalog connection and object identity from
//! its caller.
//!
//! # Write Path
//! 1. Issue one metadata update call to the catalog
//! 2. On failure, return the catalog status; the cache is untouched
//! 3. On success, apply the same edit to the cache without re-reading
//!
//! # Read Path
//! `refresh` queries the object's AVU columns and rebuilds the cache from
//! scratch, but only once the query has succeeded.

use crate::attributes::{AttributeStore, KeyVals};
use crate::error::{MetaError, MetaResult};
use avumeta_client::{CatalogConnection, GenQuery, ModAvuMetadataInput};
use avumeta_common::{Column, MetadataConfig, ObjEntry, QueryOp, ReconcilePolicy};
use std::sync::Arc;
use tracing::{debug, warn};

/// Cached AVU metadata of a catalog object
///
/// Calls must be serialized by the caller; every operation blocks on a
/// single catalog call.
pub struct ObjMetadata {
    conn: Arc<dyn CatalogConnection>,
    entry: Arc<ObjEntry>,
    config: MetadataConfig,
    store: AttributeStore,
}

impl ObjMetadata {
    /// Create an empty container for `entry` using the default policies
    pub fn new(conn: Arc<dyn CatalogConnection>, entry: Arc<ObjEntry>) -> Self {
        Self::with_config(conn, entry, MetadataConfig::default())
    }

    pub fn with_config(
        conn: Arc<dyn CatalogConnection>,
        entry: Arc<ObjEntry>,
        config: MetadataConfig,
    ) -> Self {
        Self {
            conn,
            entry,
            config,
            store: AttributeStore::new(),
        }
    }

    #[must_use]
    pub fn entry(&self) -> &ObjEntry {
        &self.entry
    }

    #[must_use]
    pub const fn config(&self) -> &MetadataConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &AttributeStore {
        &self.store
    }

    /// Snapshot of cached values per attribute name
    #[must_use]
    pub fn values(&self) -> KeyVals {
        self.store.values()
    }

    /// Snapshot of cached units per attribute name, aligned with `values`
    #[must_use]
    pub fn units(&self) -> KeyVals {
        self.store.units()
    }

    fn metadata_query(&self) -> GenQuery {
        let kind = self.entry.kind;
        let [name_col, value_col, unit_col] = kind.avu_columns();
        let query = GenQuery::new()
            .select(name_col)
            .select(value_col)
            .select(unit_col)
            .condition(kind.name_column(), QueryOp::Equal, &self.entry.name);

        // Data object names are only unique within their collection
        if self.entry.is_data_object() {
            query.condition(Column::CollName, QueryOp::Equal, &self.entry.coll_path)
        } else {
            query
        }
    }

    /// Rebuild the cache from the catalog
    ///
    /// Returns status 0. On failure the cache keeps its previous contents.
    pub fn refresh(&mut self) -> MetaResult<i32> {
        let result = self
            .metadata_query()
            .execute(self.conn.as_ref())
            .inspect_err(|e| warn!("Metadata query for {} failed: {}", self.entry, e))?;

        let (names, values, units) = (result.column(0), result.column(1), result.column(2));
        let rows = names.len().min(values.len()).min(units.len());
        if names.len() != rows || values.len() != rows || units.len() != rows {
            debug!(
                "Unequal metadata columns for {} ({}/{}/{}), using first {} rows",
                self.entry,
                names.len(),
                values.len(),
                units.len(),
                rows
            );
        }

        self.store.clear();
        for ((name, value), unit) in names.iter().zip(values).zip(units) {
            self.store.append(name, value, unit);
        }
        debug!("Loaded {} metadata triplets for {}", rows, self.entry);
        Ok(0)
    }

    fn update(&self, input: &ModAvuMetadataInput) -> MetaResult<i32> {
        debug!(
            "Metadata {} on {}: {:?}",
            input.arg(0),
            self.entry,
            &input.args()[3..]
        );
        let status = self.conn.mod_avu_metadata(input).inspect_err(|e| {
            warn!(
                "Metadata {} on {} failed: {}",
                input.arg(0),
                self.entry,
                e
            );
        })?;
        Ok(status)
    }

    /// Attach a new triplet
    ///
    /// Duplicates are allowed; on success the triplet is appended to the
    /// cache and the catalog status is returned.
    pub fn add(&mut self, name: &str, value: &str, unit: &str) -> MetaResult<i32> {
        let input =
            ModAvuMetadataInput::add(self.entry.kind, &self.entry.full_path(), name, value, unit);
        let status = self.update(&input)?;
        self.store.append(name, value, unit);
        Ok(status)
    }

    /// Change `(name, old_value, old_unit)` into `(name, new_value, new_unit)`
    ///
    /// An empty `old_unit` requests a value-only change from the catalog.
    /// Locally the first cached triplet with equal value and equal non-empty
    /// unit is overwritten. When none matches, the reconcile policy decides:
    /// remote-authoritative appends the new pair, strict-local reports
    /// `MetaError::LocalInconsistency` and leaves the cache alone.
    pub fn modify(
        &mut self,
        name: &str,
        old_value: &str,
        new_value: &str,
        old_unit: &str,
        new_unit: &str,
    ) -> MetaResult<i32> {
        let input = ModAvuMetadataInput::modify(
            self.entry.kind,
            &self.entry.full_path(),
            name,
            old_value,
            new_value,
            old_unit,
            new_unit,
        );
        let status = self.update(&input)?;

        if self
            .store
            .modify_first(name, old_value, old_unit, new_value, new_unit)
        {
            return Ok(status);
        }

        match self.config.reconcile {
            ReconcilePolicy::RemoteAuthoritative => {
                warn!(
                    "No cached triplet {} = {} [{}] on {}, appending modified value",
                    name, old_value, old_unit, self.entry
                );
                self.store.append(name, new_value, new_unit);
                Ok(status)
            }
            ReconcilePolicy::StrictLocal => {
                Err(MetaError::local_inconsistency(name, old_value, old_unit))
            }
        }
    }

    /// Delete the triplet `(name, value, unit)`
    ///
    /// On success cached triplets with equal value and equal non-empty unit
    /// are erased, one or all of them per the removal policy. Finding none
    /// is a no-op under remote-authoritative reconciliation and an error
    /// under strict-local.
    pub fn remove(&mut self, name: &str, value: &str, unit: &str) -> MetaResult<i32> {
        let input =
            ModAvuMetadataInput::remove(self.entry.kind, &self.entry.full_path(), name, value, unit);
        let status = self.update(&input)?;

        let removed = self
            .store
            .remove_matching(name, value, unit, self.config.removal);
        if removed > 0 {
            debug!("Removed {} cached triplet(s) {} on {}", removed, name, self.entry);
            return Ok(status);
        }

        match self.config.reconcile {
            ReconcilePolicy::RemoteAuthoritative => {
                warn!(
                    "No cached triplet {} = {} [{}] on {} to remove",
                    name, value, unit, self.entry
                );
                Ok(status)
            }
            ReconcilePolicy::StrictLocal => Err(MetaError::local_inconsistency(name, value, unit)),
        }
    }
}
