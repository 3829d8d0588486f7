//! Metadata update call arguments
//!
//! The catalog's metadata update call takes ten positional string slots:
//! operation tag, object type marker, object path, attribute name, then
//! operation specific values. Unused slots are empty strings.

use avumeta_common::{ObjectKind, UpdateKind};

/// Number of positional argument slots in an update call
pub const MOD_AVU_ARG_COUNT: usize = 10;

/// Prefix of the new-value argument of a modify
pub const VALUE_ARG_PREFIX: &str = "v:";

/// Prefix of the new-unit argument of a modify
pub const UNIT_ARG_PREFIX: &str = "u:";

/// Argument record for one metadata update call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModAvuMetadataInput {
    args: [String; MOD_AVU_ARG_COUNT],
}

impl ModAvuMetadataInput {
    fn from_parts(parts: &[&str]) -> Self {
        debug_assert!(parts.len() <= MOD_AVU_ARG_COUNT);
        Self {
            args: std::array::from_fn(|i| {
                parts.get(i).map_or_else(String::new, |s| (*s).to_string())
            }),
        }
    }

    /// Attach `(name, value, unit)` to the object at `path`
    #[must_use]
    pub fn add(kind: ObjectKind, path: &str, name: &str, value: &str, unit: &str) -> Self {
        Self::from_parts(&[
            UpdateKind::Add.as_tag(),
            kind.marker(),
            path,
            name,
            value,
            unit,
        ])
    }

    /// Change `(name, old_value, old_unit)` to `(name, new_value, new_unit)`
    ///
    /// An empty `old_unit` means no unit change is requested and only the
    /// value argument is sent.
    #[must_use]
    pub fn modify(
        kind: ObjectKind,
        path: &str,
        name: &str,
        old_value: &str,
        new_value: &str,
        old_unit: &str,
        new_unit: &str,
    ) -> Self {
        let value_arg = format!("{VALUE_ARG_PREFIX}{new_value}");
        if old_unit.is_empty() {
            Self::from_parts(&[
                UpdateKind::Modify.as_tag(),
                kind.marker(),
                path,
                name,
                old_value,
                &value_arg,
            ])
        } else {
            let unit_arg = format!("{UNIT_ARG_PREFIX}{new_unit}");
            Self::from_parts(&[
                UpdateKind::Modify.as_tag(),
                kind.marker(),
                path,
                name,
                old_value,
                old_unit,
                &value_arg,
                &unit_arg,
            ])
        }
    }

    /// Delete the triplet matching `(name, value, unit)` exactly
    #[must_use]
    pub fn remove(kind: ObjectKind, path: &str, name: &str, value: &str, unit: &str) -> Self {
        Self::from_parts(&[
            UpdateKind::Remove.as_tag(),
            kind.marker(),
            path,
            name,
            value,
            unit,
        ])
    }

    #[must_use]
    pub const fn args(&self) -> &[String; MOD_AVU_ARG_COUNT] {
        &self.args
    }

    /// Argument slot `index`, empty when out of range
    #[must_use]
    pub fn arg(&self, index: usize) -> &str {
        self.args.get(index).map_or("", String::as_str)
    }

    #[must_use]
    pub fn operation(&self) -> Option<UpdateKind> {
        UpdateKind::from_tag(&self.args[0])
    }

    #[must_use]
    pub fn object_kind(&self) -> Option<ObjectKind> {
        ObjectKind::from_marker(&self.args[1])
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.args[2]
    }

    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.args[3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_args() {
        let input = ModAvuMetadataInput::add(
            ObjectKind::DataObject,
            "/zone/home/a.txt",
            "color",
            "red",
            "nm",
        );
        assert_eq!(
            input.args(),
            &[
                "add",
                "-d",
                "/zone/home/a.txt",
                "color",
                "red",
                "nm",
                "",
                "",
                "",
                ""
            ]
            .map(String::from)
        );
        assert_eq!(input.operation(), Some(UpdateKind::Add));
    }

    #[test]
    fn test_modify_args_with_unit() {
        let input = ModAvuMetadataInput::modify(
            ObjectKind::Collection,
            "/zone/home",
            "size",
            "10",
            "12",
            "cm",
            "mm",
        );
        assert_eq!(input.arg(0), "mod");
        assert_eq!(input.arg(1), "-C");
        assert_eq!(input.arg(4), "10");
        assert_eq!(input.arg(5), "cm");
        assert_eq!(input.arg(6), "v:12");
        assert_eq!(input.arg(7), "u:mm");
        assert_eq!(input.arg(8), "");
        assert_eq!(input.arg(9), "");
    }

    #[test]
    fn test_modify_args_without_unit() {
        let input = ModAvuMetadataInput::modify(
            ObjectKind::DataObject,
            "/zone/f",
            "size",
            "10",
            "12",
            "",
            "mm",
        );
        assert_eq!(input.arg(4), "10");
        assert_eq!(input.arg(5), "v:12");
        assert!(input.args()[6..].iter().all(String::is_empty));
    }

    #[test]
    fn test_remove_args() {
        let input =
            ModAvuMetadataInput::remove(ObjectKind::DataObject, "/zone/f", "k", "v", "u");
        assert_eq!(input.operation(), Some(UpdateKind::Remove));
        assert_eq!(input.object_kind(), Some(ObjectKind::DataObject));
        assert_eq!(input.path(), "/zone/f");
        assert_eq!(input.attribute(), "k");
        assert_eq!(input.arg(5), "u");
        assert_eq!(input.arg(42), "");
    }
}
