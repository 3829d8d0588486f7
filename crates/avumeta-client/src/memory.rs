//! In-process catalog
//!
//! `MemoryCatalog` keeps catalog objects and their AVU rows in memory and
//! answers both catalog calls the way the remote catalog does. It backs the
//! CLI (persisted as a JSON snapshot) and the metadata store tests, which
//! use its failure injection and update recording.

use crate::connection::CatalogConnection;
use crate::query::{GenQuery, GenQueryResult};
use crate::update::{ModAvuMetadataInput, UNIT_ARG_PREFIX, VALUE_ARG_PREFIX};
use avumeta_common::{Avu, CatalogError, CatalogResult, Column, ObjEntry, ObjectKind, UpdateKind};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// No row matched the request
pub const CAT_NO_ROWS_FOUND: i32 = -808_000;
/// Unknown collection path
pub const CAT_UNKNOWN_COLLECTION: i32 = -814_000;
/// Malformed request arguments
pub const CAT_INVALID_ARGUMENT: i32 = -816_000;
/// Unknown data object path
pub const CAT_UNKNOWN_FILE: i32 = -817_000;

/// A catalog object with its metadata rows
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogObject {
    pub entry: ObjEntry,
    #[serde(default)]
    pub avus: Vec<Avu>,
}

/// Serializable catalog contents
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub objects: Vec<CatalogObject>,
}

#[derive(Default)]
struct CatalogState {
    /// Objects keyed by full path
    objects: BTreeMap<String, CatalogObject>,
    fail_update: Option<i32>,
    fail_query: Option<i32>,
    updates: Vec<ModAvuMetadataInput>,
    queries: usize,
}

/// In-memory catalog implementing `CatalogConnection`
#[derive(Default)]
pub struct MemoryCatalog {
    state: Mutex<CatalogState>,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        let objects = snapshot
            .objects
            .into_iter()
            .map(|obj| (obj.entry.full_path(), obj))
            .collect();
        Self {
            state: Mutex::new(CatalogState {
                objects,
                ..CatalogState::default()
            }),
        }
    }

    /// Load a JSON snapshot from `path`
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::snapshot(format!("{}: {e}", path.display())))?;
        let snapshot: CatalogSnapshot = serde_json::from_str(&data)
            .map_err(|e| CatalogError::snapshot(format!("{}: {e}", path.display())))?;
        debug!(
            "Loaded catalog snapshot {} ({} objects)",
            path.display(),
            snapshot.objects.len()
        );
        Ok(Self::from_snapshot(snapshot))
    }

    /// Write the catalog as a JSON snapshot to `path`
    pub fn save(&self, path: impl AsRef<Path>) -> CatalogResult<()> {
        let path = path.as_ref();
        let data = serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| CatalogError::snapshot(e.to_string()))?;
        std::fs::write(path, data)
            .map_err(|e| CatalogError::snapshot(format!("{}: {e}", path.display())))
    }

    #[must_use]
    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            objects: self.state.lock().objects.values().cloned().collect(),
        }
    }

    /// Register an object; returns false if its path is already taken
    pub fn insert_object(&self, entry: ObjEntry) -> bool {
        let mut state = self.state.lock();
        let path = entry.full_path();
        if state.objects.contains_key(&path) {
            return false;
        }
        state.objects.insert(
            path,
            CatalogObject {
                entry,
                avus: Vec::new(),
            },
        );
        true
    }

    /// Metadata rows of the object at `path`
    #[must_use]
    pub fn avus(&self, path: &str) -> Option<Vec<Avu>> {
        self.state.lock().objects.get(path).map(|o| o.avus.clone())
    }

    /// Make the next update call fail with `code`
    pub fn fail_next_update(&self, code: i32) {
        self.state.lock().fail_update = Some(code);
    }

    /// Make the next query call fail with `code`
    pub fn fail_next_query(&self, code: i32) {
        self.state.lock().fail_query = Some(code);
    }

    /// Update calls received so far, in order
    #[must_use]
    pub fn updates(&self) -> Vec<ModAvuMetadataInput> {
        self.state.lock().updates.clone()
    }

    #[must_use]
    pub fn query_count(&self) -> usize {
        self.state.lock().queries
    }
}

impl CatalogState {
    fn object_mut(&mut self, kind: ObjectKind, path: &str) -> CatalogResult<&mut CatalogObject> {
        let unknown = match kind {
            ObjectKind::DataObject => CAT_UNKNOWN_FILE,
            ObjectKind::Collection => CAT_UNKNOWN_COLLECTION,
        };
        match self.objects.get_mut(path) {
            Some(obj) if obj.entry.kind == kind => Ok(obj),
            _ => Err(CatalogError::Status { code: unknown }),
        }
    }

    fn apply_update(&mut self, input: &ModAvuMetadataInput) -> CatalogResult<i32> {
        let invalid = CatalogError::Status {
            code: CAT_INVALID_ARGUMENT,
        };
        let op = input.operation().ok_or_else(|| invalid.clone())?;
        let kind = input.object_kind().ok_or_else(|| invalid.clone())?;
        let name = input.attribute();
        if name.is_empty() || input.arg(4).is_empty() {
            return Err(invalid);
        }
        let obj = self.object_mut(kind, input.path())?;

        match op {
            UpdateKind::Add => {
                obj.avus.push(Avu::new(name, input.arg(4), input.arg(5)));
            }
            UpdateKind::Modify => {
                let change = ModifyArgs::parse(input).ok_or(invalid)?;
                let avu = obj
                    .avus
                    .iter_mut()
                    .find(|a| a.name == name && a.value == input.arg(4) && a.unit == change.old_unit)
                    .ok_or(CatalogError::Status {
                        code: CAT_NO_ROWS_FOUND,
                    })?;
                avu.value = change.new_value.to_string();
                if let Some(unit) = change.new_unit {
                    avu.unit = unit.to_string();
                }
            }
            UpdateKind::Remove => {
                let pos = obj
                    .avus
                    .iter()
                    .position(|a| a.name == name && a.value == input.arg(4) && a.unit == input.arg(5))
                    .ok_or(CatalogError::Status {
                        code: CAT_NO_ROWS_FOUND,
                    })?;
                obj.avus.remove(pos);
            }
        }
        Ok(0)
    }

    fn run_query(&self, query: &GenQuery) -> GenQueryResult {
        let mut columns: Vec<Vec<String>> = vec![Vec::new(); query.selects().len()];
        let uses_avu = query
            .selects()
            .iter()
            .chain(query.conditions().iter().map(|c| &c.column))
            .any(|c| is_avu_column(*c));

        for obj in self.objects.values() {
            let rows: Vec<Option<&Avu>> = if uses_avu {
                obj.avus.iter().map(Some).collect()
            } else {
                vec![None]
            };
            for avu in rows {
                let matches = query.conditions().iter().all(|cond| {
                    column_value(&obj.entry, avu, cond.column)
                        .is_some_and(|v| cond.op.eval(v, &cond.literal))
                });
                if !matches {
                    continue;
                }
                let values: Option<Vec<&str>> = query
                    .selects()
                    .iter()
                    .map(|col| column_value(&obj.entry, avu, *col))
                    .collect();
                if let Some(values) = values {
                    for (column, value) in columns.iter_mut().zip(values) {
                        column.push(value.to_string());
                    }
                }
            }
        }
        GenQueryResult::new(columns)
    }
}

/// Parsed operation specific arguments of a modify
struct ModifyArgs<'a> {
    old_unit: &'a str,
    new_value: &'a str,
    new_unit: Option<&'a str>,
}

impl<'a> ModifyArgs<'a> {
    /// The slot count decides the layout, so an old unit may itself carry a
    /// `v:` or `u:` prefix
    fn parse(input: &'a ModAvuMetadataInput) -> Option<Self> {
        let extra: Vec<&str> = input.args()[5..]
            .iter()
            .map(String::as_str)
            .take_while(|arg| !arg.is_empty())
            .collect();

        match extra.as_slice() {
            &[value] => Some(Self {
                old_unit: "",
                new_value: value.strip_prefix(VALUE_ARG_PREFIX)?,
                new_unit: None,
            }),
            &[old_unit, value, unit] => Some(Self {
                old_unit,
                new_value: value.strip_prefix(VALUE_ARG_PREFIX)?,
                new_unit: Some(unit.strip_prefix(UNIT_ARG_PREFIX)?),
            }),
            _ => None,
        }
    }
}

const fn is_avu_column(column: Column) -> bool {
    !matches!(column, Column::DataName | Column::CollName)
}

fn column_value<'a>(entry: &'a ObjEntry, avu: Option<&'a Avu>, column: Column) -> Option<&'a str> {
    let data = entry.kind == ObjectKind::DataObject;
    match column {
        Column::DataName => data.then_some(entry.name.as_str()),
        Column::CollName => Some(if data { entry.coll_path.as_str() } else { entry.name.as_str() }),
        Column::MetaDataAttrName => avu.filter(|_| data).map(|a| a.name.as_str()),
        Column::MetaDataAttrValue => avu.filter(|_| data).map(|a| a.value.as_str()),
        Column::MetaDataAttrUnits => avu.filter(|_| data).map(|a| a.unit.as_str()),
        Column::MetaCollAttrName => avu.filter(|_| !data).map(|a| a.name.as_str()),
        Column::MetaCollAttrValue => avu.filter(|_| !data).map(|a| a.value.as_str()),
        Column::MetaCollAttrUnits => avu.filter(|_| !data).map(|a| a.unit.as_str()),
    }
}

impl CatalogConnection for MemoryCatalog {
    fn mod_avu_metadata(&self, input: &ModAvuMetadataInput) -> CatalogResult<i32> {
        let mut state = self.state.lock();
        state.updates.push(input.clone());
        if let Some(code) = state.fail_update.take() {
            warn!("Injected update failure {} for {}", code, input.path());
            return Err(CatalogError::Status { code });
        }
        let result = state.apply_update(input);
        if let Err(e) = &result {
            debug!("Catalog rejected update on {}: {}", input.path(), e);
        }
        result
    }

    fn gen_query(&self, query: &GenQuery) -> CatalogResult<GenQueryResult> {
        let mut state = self.state.lock();
        state.queries += 1;
        if let Some(code) = state.fail_query.take() {
            warn!("Injected query failure {}", code);
            return Err(CatalogError::Status { code });
        }
        Ok(state.run_query(query))
    }
}
