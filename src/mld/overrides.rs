//! User-chosen display names for generated columns.
//!
//! Overrides are keyed by table and original column name, never by object
//! identity, so they survive re-running the transformation. Generated
//! [`LogicalColumn`](super::LogicalColumn) names are never modified; the
//! overrides are applied when a schema is rendered.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::LogicalTable;

/// Composite `(table, column)` key. Table names compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnKey {
    table: String,
    column: String,
}

impl ColumnKey {
    pub fn new(table: &str, column: &str) -> Self {
        Self {
            table: table.to_lowercase(),
            column: column.to_string(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Parse the flat `table.column` form. Splits at the first `.` since
    /// generated table names never contain one.
    pub fn parse(flat: &str) -> Option<Self> {
        let (table, column) = flat.split_once('.')?;
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some(Self::new(table, column))
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// Maps a generated column name to the name shown to the user.
pub trait NameResolver {
    fn resolve(&self, table: &str, column: &str) -> String;
}

/// Resolver that keeps every generated name.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl NameResolver for Identity {
    fn resolve(&self, _table: &str, column: &str) -> String {
        column.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameOverrideStore {
    entries: IndexMap<ColumnKey, String>,
}

impl NameOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `new_name` for `table.original`. An empty name, or one equal
    /// to the original, removes the override instead.
    pub fn set(&mut self, table: &str, original: &str, new_name: &str) {
        let key = ColumnKey::new(table, original);
        let new_name = new_name.trim();
        if new_name.is_empty() || new_name == original {
            self.entries.shift_remove(&key);
        } else {
            self.entries.insert(key, new_name.to_string());
        }
    }

    /// The override for `table.original`, or `original` itself.
    pub fn get(&self, table: &str, original: &str) -> String {
        self.entries
            .get(&ColumnKey::new(table, original))
            .cloned()
            .unwrap_or_else(|| original.to_string())
    }

    pub fn remove(&mut self, table: &str, original: &str) -> Option<String> {
        self.entries.shift_remove(&ColumnKey::new(table, original))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColumnKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Keys whose column does not exist in `tables`. They are kept, since
    /// the column may come back after a later edit.
    pub fn stale_keys<'s>(&'s self, tables: &[LogicalTable]) -> Vec<&'s ColumnKey> {
        self.entries
            .keys()
            .filter(|key| {
                !tables
                    .iter()
                    .any(|t| t.name.to_lowercase() == key.table && t.column(&key.column).is_some())
            })
            .collect()
    }
}

impl NameResolver for NameOverrideStore {
    fn resolve(&self, table: &str, column: &str) -> String {
        self.get(table, column)
    }
}

impl Serialize for NameOverrideStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k.to_string(), v)))
    }
}

impl<'de> Deserialize<'de> for NameOverrideStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let flat = IndexMap::<String, String>::deserialize(deserializer)?;
        let mut store = Self::new();
        for (key, name) in flat {
            let key = ColumnKey::parse(&key).ok_or_else(|| {
                serde::de::Error::custom(format!("invalid column override key '{}'", key))
            })?;
            store.set(&key.table, &key.column, &name);
        }
        Ok(store)
    }
}
