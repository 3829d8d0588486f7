//! Configuration types for avumeta
//!
//! Policies governing how the local metadata cache reacts when it disagrees
//! with a change the catalog has just accepted.

use serde::{Deserialize, Serialize};

/// Root configuration for a metadata container
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Policy when a modify/remove finds no matching local triplet
    pub reconcile: ReconcilePolicy,
    /// How many matching local triplets a remove erases
    pub removal: RemovalPolicy,
}

impl MetadataConfig {
    #[must_use]
    pub const fn with_reconcile(mut self, reconcile: ReconcilePolicy) -> Self {
        self.reconcile = reconcile;
        self
    }

    #[must_use]
    pub const fn with_removal(mut self, removal: RemovalPolicy) -> Self {
        self.removal = removal;
        self
    }
}

/// Reconciliation policy after a successful remote change
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcilePolicy {
    /// The catalog outcome wins: modify appends the new pair, remove is a no-op
    #[default]
    RemoteAuthoritative,
    /// Leave the cache untouched and report the inconsistency
    StrictLocal,
}

/// Number of local triplets erased by one successful remove
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Erase every matching triplet
    #[default]
    AllMatches,
    /// Erase only the first matching triplet
    FirstMatch,
}
