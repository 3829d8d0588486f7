//! Local AVU cache
//!
//! Each attribute name maps to an ordered list of `(value, unit)` pairs.
//! The value and unit views handed to callers are projections of those
//! pairs, so index `i` of both always denotes the same triplet.

use avumeta_common::{unit_key_matches, Avu, RemovalPolicy};
use std::collections::HashMap;

/// Attribute name to ordered strings, as handed out by the value and unit views
pub type KeyVals = HashMap<String, Vec<String>>;

/// Value and unit of one cached triplet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvuEntry {
    pub value: String,
    pub unit: String,
}

impl AvuEntry {
    fn matches(&self, value: &str, unit: &str) -> bool {
        unit_key_matches(&self.value, &self.unit, value, unit)
    }
}

/// Cached AVU triplets of one catalog object
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeStore {
    attrs: HashMap<String, Vec<AvuEntry>>,
}

impl AttributeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every cached triplet
    pub fn clear(&mut self) {
        self.attrs.clear();
    }

    /// Append a triplet, creating the name on first use
    pub fn append(&mut self, name: &str, value: &str, unit: &str) {
        self.attrs
            .entry(name.to_string())
            .or_default()
            .push(AvuEntry {
                value: value.to_string(),
                unit: unit.to_string(),
            });
    }

    /// Remove triplets of `name` whose value equals `value`, whatever the unit
    ///
    /// The unit of each removed pair goes with it. Returns the number of
    /// triplets removed.
    pub fn remove_value(&mut self, name: &str, value: &str, policy: RemovalPolicy) -> usize {
        self.remove_where(name, policy, |e| e.value == value)
    }

    /// Remove triplets of `name` matching `(value, unit)` with a non-empty unit
    ///
    /// Returns the number of triplets removed.
    pub fn remove_matching(
        &mut self,
        name: &str,
        value: &str,
        unit: &str,
        policy: RemovalPolicy,
    ) -> usize {
        self.remove_where(name, policy, |e| e.matches(value, unit))
    }

    fn remove_where(
        &mut self,
        name: &str,
        policy: RemovalPolicy,
        pred: impl Fn(&AvuEntry) -> bool,
    ) -> usize {
        let Some(entries) = self.attrs.get_mut(name) else {
            return 0;
        };
        match policy {
            RemovalPolicy::AllMatches => {
                let before = entries.len();
                entries.retain(|e| !pred(e));
                before - entries.len()
            }
            RemovalPolicy::FirstMatch => match entries.iter().position(pred) {
                Some(pos) => {
                    entries.remove(pos);
                    1
                }
                None => 0,
            },
        }
    }

    /// Overwrite the first triplet of `name` matching `(old_value, old_unit)`
    ///
    /// Returns false when nothing matched; the store is then unchanged.
    pub fn modify_first(
        &mut self,
        name: &str,
        old_value: &str,
        old_unit: &str,
        new_value: &str,
        new_unit: &str,
    ) -> bool {
        let Some(entry) = self
            .attrs
            .get_mut(name)
            .and_then(|entries| entries.iter_mut().find(|e| e.matches(old_value, old_unit)))
        else {
            return false;
        };
        entry.value = new_value.to_string();
        entry.unit = new_unit.to_string();
        true
    }

    /// Drop names left with no triplets
    pub fn prune_empty(&mut self) {
        self.attrs.retain(|_, entries| !entries.is_empty());
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Cached triplets of `name`, in catalog order
    #[must_use]
    pub fn entries(&self, name: &str) -> &[AvuEntry] {
        self.attrs.get(name).map_or(&[], Vec::as_slice)
    }

    pub fn values_of<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries(name).iter().map(|e| e.value.as_str())
    }

    pub fn units_of<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries(name).iter().map(|e| e.unit.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attrs.keys().map(String::as_str)
    }

    /// Snapshot of the value view
    #[must_use]
    pub fn values(&self) -> KeyVals {
        self.project(|e| &e.value)
    }

    /// Snapshot of the unit view
    #[must_use]
    pub fn units(&self) -> KeyVals {
        self.project(|e| &e.unit)
    }

    fn project(&self, field: impl Fn(&AvuEntry) -> &String) -> KeyVals {
        self.attrs
            .iter()
            .map(|(name, entries)| (name.clone(), entries.iter().map(|e| field(e).clone()).collect()))
            .collect()
    }

    /// All cached triplets, sorted by name and then catalog order
    #[must_use]
    pub fn triplets(&self) -> Vec<Avu> {
        let mut names: Vec<&String> = self.attrs.keys().collect();
        names.sort();
        names
            .into_iter()
            .flat_map(|name| {
                self.attrs[name]
                    .iter()
                    .map(move |e| Avu::new(name.as_str(), e.value.as_str(), e.unit.as_str()))
            })
            .collect()
    }

    /// Number of cached triplets
    #[must_use]
    pub fn len(&self) -> usize {
        self.attrs.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
