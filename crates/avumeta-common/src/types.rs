//! Core type definitions for avumeta
//!
//! This module defines the identity of catalog objects, the AVU triplet,
//! the closed set of metadata update kinds, and the catalog query columns
//! and condition operators used to read metadata back.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a catalog object that can carry AVU metadata
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// A single file-like entry
    #[display("data object")]
    DataObject,
    /// A directory-like container
    #[display("collection")]
    Collection,
}

impl ObjectKind {
    /// Object type marker used in metadata update calls
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::DataObject => "-d",
            Self::Collection => "-C",
        }
    }

    /// Parse an object type marker
    #[must_use]
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "-d" => Some(Self::DataObject),
            "-C" | "-c" => Some(Self::Collection),
            _ => None,
        }
    }

    /// Columns holding this kind's AVU name, value and unit, in that order
    #[must_use]
    pub const fn avu_columns(self) -> [Column; 3] {
        match self {
            Self::DataObject => [
                Column::MetaDataAttrName,
                Column::MetaDataAttrValue,
                Column::MetaDataAttrUnits,
            ],
            Self::Collection => [
                Column::MetaCollAttrName,
                Column::MetaCollAttrValue,
                Column::MetaCollAttrUnits,
            ],
        }
    }

    /// Column the object's own name is matched against
    #[must_use]
    pub const fn name_column(self) -> Column {
        match self {
            Self::DataObject => Column::DataName,
            Self::Collection => Column::CollName,
        }
    }
}

/// Identity of the catalog object a metadata container belongs to
///
/// For data objects `name` is the bare object name and `coll_path` the
/// containing collection. For collections `name` is the full collection
/// path and `coll_path` is informational only.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjEntry {
    pub kind: ObjectKind,
    pub name: String,
    pub coll_path: String,
}

impl ObjEntry {
    /// Identity of a data object `name` inside collection `coll_path`
    pub fn data_object(coll_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: ObjectKind::DataObject,
            name: name.into(),
            coll_path: coll_path.into(),
        }
    }

    /// Identity of the collection at `path`
    pub fn collection(path: impl Into<String>) -> Self {
        let name = path.into();
        let coll_path = parent_path(&name).to_string();
        Self {
            kind: ObjectKind::Collection,
            name,
            coll_path,
        }
    }

    /// Identity from a full catalog path
    ///
    /// Returns `None` for data object paths without a parent component.
    #[must_use]
    pub fn from_path(kind: ObjectKind, path: &str) -> Option<Self> {
        match kind {
            ObjectKind::Collection => Some(Self::collection(path)),
            ObjectKind::DataObject => {
                let (parent, name) = path.rsplit_once('/')?;
                if name.is_empty() {
                    return None;
                }
                let parent = if parent.is_empty() { "/" } else { parent };
                Some(Self::data_object(parent, name))
            }
        }
    }

    #[must_use]
    pub const fn is_data_object(&self) -> bool {
        matches!(self.kind, ObjectKind::DataObject)
    }

    /// Full catalog path of the object
    #[must_use]
    pub fn full_path(&self) -> String {
        match self.kind {
            ObjectKind::Collection => self.name.clone(),
            ObjectKind::DataObject => {
                if self.coll_path.ends_with('/') {
                    format!("{}{}", self.coll_path, self.name)
                } else {
                    format!("{}/{}", self.coll_path, self.name)
                }
            }
        }
    }
}

impl fmt::Display for ObjEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.full_path())
    }
}

fn parent_path(path: &str) -> &str {
    match path.trim_end_matches('/').rsplit_once('/') {
        Some(("", _)) => "/",
        Some((parent, _)) => parent,
        None => "",
    }
}

/// Attribute-Value-Unit triplet
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Avu {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub unit: String,
}

impl Avu {
    pub fn new(name: impl Into<String>, value: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            unit: unit.into(),
        }
    }

    /// Composite key match used by modify and remove
    ///
    /// Value and unit must both be equal, and the unit must be non-empty.
    #[must_use]
    pub fn matches(&self, name: &str, value: &str, unit: &str) -> bool {
        self.name == name && unit_key_matches(&self.value, &self.unit, value, unit)
    }
}

impl fmt::Display for Avu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{} = {}", self.name, self.value)
        } else {
            write!(f, "{} = {} [{}]", self.name, self.value, self.unit)
        }
    }
}

/// Value/unit half of the composite key match
#[must_use]
pub fn unit_key_matches(value: &str, unit: &str, want_value: &str, want_unit: &str) -> bool {
    value == want_value && !unit.is_empty() && unit == want_unit
}

/// Kind of metadata update sent to the catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum UpdateKind {
    #[display("add")]
    Add,
    #[display("mod")]
    Modify,
    #[display("rm")]
    Remove,
}

impl UpdateKind {
    /// Operation tag as used in the update call
    #[must_use]
    pub const fn as_tag(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Modify => "mod",
            Self::Remove => "rm",
        }
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "add" => Some(Self::Add),
            "mod" => Some(Self::Modify),
            "rm" => Some(Self::Remove),
            _ => None,
        }
    }
}

/// Catalog columns addressable by metadata queries
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    DataName,
    CollName,
    MetaDataAttrName,
    MetaDataAttrValue,
    MetaDataAttrUnits,
    MetaCollAttrName,
    MetaCollAttrValue,
    MetaCollAttrUnits,
}

impl Column {
    /// Numeric catalog column id
    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Self::DataName => 403,
            Self::CollName => 501,
            Self::MetaDataAttrName => 600,
            Self::MetaDataAttrValue => 601,
            Self::MetaDataAttrUnits => 602,
            Self::MetaCollAttrName => 610,
            Self::MetaCollAttrValue => 611,
            Self::MetaCollAttrUnits => 612,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DataName => "DATA_NAME",
            Self::CollName => "COLL_NAME",
            Self::MetaDataAttrName => "META_DATA_ATTR_NAME",
            Self::MetaDataAttrValue => "META_DATA_ATTR_VALUE",
            Self::MetaDataAttrUnits => "META_DATA_ATTR_UNITS",
            Self::MetaCollAttrName => "META_COLL_ATTR_NAME",
            Self::MetaCollAttrValue => "META_COLL_ATTR_VALUE",
            Self::MetaCollAttrUnits => "META_COLL_ATTR_UNITS",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comparison operator of a query condition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryOp {
    Equal,
    NotEqual,
    Like,
    NotLike,
    Greater,
    Less,
}

impl QueryOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::Like => "like",
            Self::NotLike => "not like",
            Self::Greater => ">",
            Self::Less => "<",
        }
    }

    /// Condition string sent to the catalog, e.g. `= 'foo'`
    #[must_use]
    pub fn condition(self, literal: &str) -> String {
        format!("{} '{}'", self.as_str(), literal)
    }

    /// Evaluate the operator against a column value
    ///
    /// `like` patterns use `%` for any run of characters and `_` for a
    /// single character.
    #[must_use]
    pub fn eval(self, actual: &str, literal: &str) -> bool {
        match self {
            Self::Equal => actual == literal,
            Self::NotEqual => actual != literal,
            Self::Like => like_match(actual, literal),
            Self::NotLike => !like_match(actual, literal),
            Self::Greater => actual > literal,
            Self::Less => actual < literal,
        }
    }
}

fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    // Iterative wildcard match with single backtrack point
    let (mut t, mut p) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '%' {
            star = Some((p, t));
            p += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|&c| c == '%')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_object_full_path() {
        let entry = ObjEntry::data_object("/zone/home/alice", "file.txt");
        assert_eq!(entry.full_path(), "/zone/home/alice/file.txt");

        let root = ObjEntry::data_object("/", "top.txt");
        assert_eq!(root.full_path(), "/top.txt");
    }

    #[test]
    fn test_collection_identity() {
        let entry = ObjEntry::collection("/zone/home/alice");
        assert_eq!(entry.full_path(), "/zone/home/alice");
        assert_eq!(entry.coll_path, "/zone/home");
        assert!(!entry.is_data_object());
        assert_eq!(ObjEntry::collection("/zone").coll_path, "/");
    }

    #[test]
    fn test_from_path() {
        let entry = ObjEntry::from_path(ObjectKind::DataObject, "/zone/a/b.dat").unwrap();
        assert_eq!(entry.coll_path, "/zone/a");
        assert_eq!(entry.name, "b.dat");

        assert!(ObjEntry::from_path(ObjectKind::DataObject, "/zone/a/").is_none());
        assert!(ObjEntry::from_path(ObjectKind::DataObject, "nopath").is_none());
        assert_eq!(
            ObjEntry::from_path(ObjectKind::DataObject, "/x").unwrap().full_path(),
            "/x"
        );
    }

    #[test]
    fn test_kind_markers() {
        assert_eq!(ObjectKind::DataObject.marker(), "-d");
        assert_eq!(ObjectKind::Collection.marker(), "-C");
        assert_eq!(ObjectKind::from_marker("-d"), Some(ObjectKind::DataObject));
        assert_eq!(ObjectKind::from_marker("-R"), None);
    }

    #[test]
    fn test_update_kind_tags() {
        assert_eq!(UpdateKind::Add.as_tag(), "add");
        assert_eq!(UpdateKind::Modify.as_tag(), "mod");
        assert_eq!(UpdateKind::Remove.as_tag(), "rm");
        assert_eq!(UpdateKind::from_tag("mod"), Some(UpdateKind::Modify));
        assert_eq!(UpdateKind::from_tag("set"), None);
        assert_eq!(UpdateKind::Remove.to_string(), "rm");
    }

    #[test]
    fn test_avu_matching_requires_unit() {
        let avu = Avu::new("color", "red", "");
        assert!(!avu.matches("color", "red", ""));

        let avu = Avu::new("size", "10", "cm");
        assert!(avu.matches("size", "10", "cm"));
        assert!(!avu.matches("size", "10", "mm"));
        assert!(!avu.matches("size", "11", "cm"));
        assert!(!avu.matches("len", "10", "cm"));
    }

    #[test]
    fn test_avu_unit_defaults_when_missing() {
        let avu: Avu = serde_json::from_str(r#"{"name":"a","value":"b"}"#).unwrap();
        assert_eq!(avu.unit, "");
    }

    #[test]
    fn test_kind_columns() {
        assert_eq!(ObjectKind::DataObject.avu_columns()[0].id(), 600);
        assert_eq!(ObjectKind::Collection.avu_columns()[2].id(), 612);
        assert_eq!(ObjectKind::DataObject.name_column(), Column::DataName);
        assert_eq!(ObjectKind::Collection.name_column(), Column::CollName);
    }

    #[test]
    fn test_query_op() {
        assert_eq!(QueryOp::Equal.condition("x"), "= 'x'");
        assert_eq!(QueryOp::NotLike.condition("a%"), "not like 'a%'");
        assert!(QueryOp::Like.eval("experiment-42", "exp%"));
        assert!(QueryOp::Like.eval("abc", "a_c"));
        assert!(QueryOp::Like.eval("abc", "%"));
        assert!(!QueryOp::Like.eval("abc", "b%"));
        assert!(QueryOp::Like.eval("aXbXc", "%b%c"));
        assert!(QueryOp::Greater.eval("b", "a"));
        assert!(QueryOp::NotEqual.eval("b", "a"));
    }
}
