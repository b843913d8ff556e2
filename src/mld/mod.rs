//! Logical data model (MLD): tables, columns and keys derived from the
//! conceptual model.

pub mod naming;
pub mod overrides;
pub mod report;
mod transform;

pub use overrides::{ColumnKey, Identity, NameOverrideStore, NameResolver};
pub use transform::{LogicalTransformer, Pairing, transform};

use serde::Serialize;
use std::fmt;

use crate::mcd::ElementId;

/// Kind of conceptual element a table was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Entity,
    Association,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Entity => "entity",
            Self::Association => "association",
        })
    }
}

/// Target of a foreign-key column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalColumn {
    pub name: String,
    pub data_type: String,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    pub references: Option<ColumnRef>,
    pub is_nullable: bool,
}

impl LogicalColumn {
    pub fn references_table(&self) -> Option<&str> {
        self.references.as_ref().map(|r| r.table.as_str())
    }

    pub fn references_column(&self) -> Option<&str> {
        self.references.as_ref().map(|r| r.column.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalTable {
    pub name: String,
    pub columns: Vec<LogicalColumn>,
    pub source_kind: SourceKind,
    pub source_id: ElementId,
}

impl LogicalTable {
    pub fn column(&self, name: &str) -> Option<&LogicalColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_keys(&self) -> impl Iterator<Item = &LogicalColumn> {
        self.columns.iter().filter(|c| c.is_primary_key)
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &LogicalColumn> {
        self.columns.iter().filter(|c| c.is_foreign_key)
    }

    /// Appends `column` unless a column with the same name exists.
    /// Returns whether it was added.
    pub(crate) fn push_unique(&mut self, column: LogicalColumn) -> bool {
        if self.column(&column.name).is_some() {
            return false;
        }
        self.columns.push(column);
        true
    }
}
