//! General catalog query builder
//!
//! A query projects a list of columns and filters rows with equality-style
//! conditions. Results come back column-major: one ordered sequence of
//! strings per projected column.

use crate::connection::CatalogConnection;
use avumeta_common::{CatalogResult, Column, QueryOp};
use tracing::debug;

/// A single filter condition
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryCondition {
    pub column: Column,
    pub op: QueryOp,
    pub literal: String,
}

impl QueryCondition {
    /// Condition string as sent to the catalog, e.g. `= 'foo'`
    #[must_use]
    pub fn condition_string(&self) -> String {
        self.op.condition(&self.literal)
    }
}

/// General query builder
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenQuery {
    selects: Vec<Column>,
    conditions: Vec<QueryCondition>,
}

impl GenQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Project `column`
    #[must_use]
    pub fn select(mut self, column: Column) -> Self {
        self.selects.push(column);
        self
    }

    /// Add a filter condition
    #[must_use]
    pub fn condition(mut self, column: Column, op: QueryOp, literal: impl Into<String>) -> Self {
        self.conditions.push(QueryCondition {
            column,
            op,
            literal: literal.into(),
        });
        self
    }

    #[must_use]
    pub fn selects(&self) -> &[Column] {
        &self.selects
    }

    #[must_use]
    pub fn conditions(&self) -> &[QueryCondition] {
        &self.conditions
    }

    /// Execute against the catalog
    pub fn execute(&self, conn: &dyn CatalogConnection) -> CatalogResult<GenQueryResult> {
        debug!(
            "Executing query: select {:?} where {}",
            self.selects,
            self.conditions
                .iter()
                .map(|c| format!("{} {}", c.column, c.condition_string()))
                .collect::<Vec<_>>()
                .join(" and ")
        );
        conn.gen_query(self)
    }
}

/// Column-major query result
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenQueryResult {
    columns: Vec<Vec<String>>,
}

impl GenQueryResult {
    #[must_use]
    pub const fn new(columns: Vec<Vec<String>>) -> Self {
        Self { columns }
    }

    /// Result strings of projected column `index`, empty when out of range
    #[must_use]
    pub fn column(&self, index: usize) -> &[String] {
        self.columns.get(index).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows present in every column
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(Vec::len).min().unwrap_or(0)
    }

    #[must_use]
    pub fn into_columns(self) -> Vec<Vec<String>> {
        self.columns
    }
}
