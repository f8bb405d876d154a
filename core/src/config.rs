//! The read-only configuration table consulted by `category.key` placeholders.

use rustc_hash::FxHashMap;

use crate::errors::SubstitutionError;

type Category = FxHashMap<Box<str>, Box<str>>;

/// category → key → value. Built once and never mutated afterwards; share it
/// through an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ConfigTable {
    categories: FxHashMap<Box<str>, Category>,
}

/// Values to merge into a [`ConfigTable`]; same shape as the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ConfigOverrides {
    categories: FxHashMap<Box<str>, Category>,
}

impl ConfigOverrides {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, category: &str, key: &str, value: impl Into<Box<str>>) {
        self.categories
            .entry(category.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    #[must_use]
    pub fn with(mut self, category: &str, key: &str, value: impl Into<Box<str>>) -> Self {
        self.set(category, key, value);
        self
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.values().all(FxHashMap::is_empty)
    }

    /// All `(category, key, value)` triples, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.categories.iter().flat_map(|(category, entries)| {
            entries
                .iter()
                .map(move |(k, v)| (&**category, &**k, &**v))
        })
    }
}

impl ConfigTable {
    /// Builds a table from nested static slices, as used for defaults.
    #[must_use]
    pub fn from_static(categories: &[(&str, &[(&str, &str)])]) -> Self {
        let categories = categories
            .iter()
            .map(|(name, entries)| {
                let entries = entries
                    .iter()
                    .map(|(k, v)| (Box::<str>::from(*k), Box::<str>::from(*v)))
                    .collect();
                (Box::<str>::from(*name), entries)
            })
            .collect();
        Self { categories }
    }

    /// Merges `overrides` key by key into the existing categories.
    ///
    /// Categories that do not exist in `self` are ignored with a warning.
    #[must_use]
    pub fn merged(mut self, overrides: &ConfigOverrides) -> Self {
        for (name, entries) in &overrides.categories {
            let Some(category) = self.categories.get_mut(name) else {
                tracing::warn!("ignoring unknown configuration category `{name}`");
                continue;
            };
            tracing::debug!("merging {} override(s) into `{name}`", entries.len());
            for (k, v) in entries {
                category.insert(k.clone(), v.clone());
            }
        }
        self
    }

    #[must_use]
    pub fn get(&self, category: &str, key: &str) -> Option<&str> {
        self.categories.get(category)?.get(key).map(|v| &**v)
    }

    #[inline]
    #[must_use]
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Looks up a dotted `category.key` path, split at the first `.`.
    ///
    /// ### Errors
    /// [`SubstitutionError::UnknownConfigPath`] with the full path if there is no `.`, or
    /// either segment is missing.
    pub fn lookup(&self, path: &str) -> Result<&str, SubstitutionError> {
        path.split_once('.')
            .and_then(|(category, key)| self.get(category, key))
            .ok_or_else(|| SubstitutionError::UnknownConfigPath(path.into()))
    }
}

crate::tests! {
    lookup_splits_at_first_dot {
        let table = ConfigTable::from_static(&[
            ("space", &[("BeforeComma", ""), ("AfterComma", "Y"), ("a.b", "dotted")]),
        ]);
        assert_eq!(table.lookup("space.AfterComma"), Ok("Y"));
        assert_eq!(table.lookup("space.BeforeComma"), Ok(""));
        assert_eq!(table.lookup("space.a.b"), Ok("dotted"));
    };
    #[case("space.Missing")]
    #[case("nothing.AfterComma")]
    #[case("space")]
    #[case("")]
    unknown_paths(#[case] path: &str) {
        let table = ConfigTable::from_static(&[("space", &[("AfterComma", "Y")])]);
        assert_eq!(table.lookup(path), Err(SubstitutionError::UnknownConfigPath(path.into())));
    };
    overrides_merge_per_key {
        let defaults = ConfigTable::from_static(&[
            ("spaceKets", &[("Bar", "A"), ("RLAngle", "B")]),
            ("space", &[("AfterComma", "C")]),
        ]);
        let overrides = ConfigOverrides::new()
            .with("spaceKets", "Bar", "X")
            .with("spaceKets", "Extra", "E")
            .with("unknown", "Key", "Z");
        let table = defaults.merged(&overrides);
        assert_eq!(table.get("spaceKets", "Bar"), Some("X"));
        assert_eq!(table.get("spaceKets", "RLAngle"), Some("B"));
        assert_eq!(table.get("spaceKets", "Extra"), Some("E"));
        assert_eq!(table.get("space", "AfterComma"), Some("C"));
        assert!(!table.has_category("unknown"));
    };
    empty_overrides_change_nothing {
        let defaults = ConfigTable::from_static(&[("space", &[("AfterComma", "C")])]);
        assert!(ConfigOverrides::new().is_empty());
        assert_eq!(defaults.clone().merged(&ConfigOverrides::new()), defaults);
    };
    #[cfg(feature = "serde")]
    overrides_from_json {
        let overrides: ConfigOverrides =
            serde_json::from_str(r#"{"space": {"BeforeComma": "", "AfterComma": "Y"}}"#).unwrap();
        let table = ConfigTable::from_static(&[("space", &[("BeforeComma", "X"), ("AfterComma", "X")])])
            .merged(&overrides);
        assert_eq!(table.lookup("space.AfterComma"), Ok("Y"));
        assert_eq!(table.lookup("space.BeforeComma"), Ok(""));
        assert!(table.lookup("space.Missing").is_err());
    }
}
