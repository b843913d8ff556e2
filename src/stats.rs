//! Counters over the conceptual model and the derived schema.

use serde::Serialize;

use crate::mcd::ConceptualModel;
use crate::mld::LogicalTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ModelStatistics {
    pub attributes: usize,
    pub entities: usize,
    pub associations: usize,
    pub links: usize,
}

impl ModelStatistics {
    /// `attributes` counts entity attributes only, not carrying ones.
    pub fn of(model: &ConceptualModel) -> Self {
        Self {
            attributes: model.entities().map(|e| e.attributes().len()).sum(),
            entities: model.entity_count(),
            associations: model.association_count(),
            links: model.link_count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SchemaStatistics {
    pub tables: usize,
    pub columns: usize,
    pub primary_keys: usize,
    pub foreign_keys: usize,
}

impl SchemaStatistics {
    pub fn of(tables: &[LogicalTable]) -> Self {
        tables.iter().flat_map(|t| &t.columns).fold(
            Self {
                tables: tables.len(),
                ..Self::default()
            },
            |mut acc, c| {
                acc.columns += 1;
                acc.primary_keys += usize::from(c.is_primary_key);
                acc.foreign_keys += usize::from(c.is_foreign_key);
                acc
            },
        )
    }
}
