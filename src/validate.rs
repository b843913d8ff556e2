//! Structural checks on a conceptual model.
//!
//! Every rule runs on its own and all violations are reported together.
//! Nothing here blocks transformation or export; callers decide what to do
//! with the diagnostics.

use serde::Serialize;
use std::fmt;

use crate::mcd::ConceptualModel;

/// A structural rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Diagnostic {
    NoEntities,
    MissingPrimaryKey { entity: String },
    SparseAssociation { association: String, links: usize },
    OrphanEntity { entity: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEntities => write!(f, "No entities defined. Add at least one entity."),
            Self::MissingPrimaryKey { entity } => {
                write!(f, "Entity '{}' has no primary key attribute.", entity)
            }
            Self::SparseAssociation { association, .. } => write!(
                f,
                "Association '{}' must be connected to at least 2 entities.",
                association
            ),
            Self::OrphanEntity { entity } => {
                write!(f, "Entity '{}' is not connected to any association.", entity)
            }
        }
    }
}

/// Check `model` and return diagnostics in rule order: missing entities,
/// entities without a primary key, associations with fewer than two links,
/// entities without any link.
pub fn validate(model: &ConceptualModel) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if model.entity_count() == 0 {
        diagnostics.push(Diagnostic::NoEntities);
    }

    for entity in model.entities() {
        if !entity.has_primary_key() {
            diagnostics.push(Diagnostic::MissingPrimaryKey {
                entity: entity.name().to_string(),
            });
        }
    }

    for association in model.associations() {
        let links = model.links_for_association(association.id()).count();
        if links < 2 {
            diagnostics.push(Diagnostic::SparseAssociation {
                association: association.name().to_string(),
                links,
            });
        }
    }

    for entity in model.entities() {
        if model.links_for_entity(entity.id()).next().is_none() {
            diagnostics.push(Diagnostic::OrphanEntity {
                entity: entity.name().to_string(),
            });
        }
    }

    diagnostics
}

/// [`validate`] rendered as human-readable messages.
pub fn validate_messages(model: &ConceptualModel) -> Vec<String> {
    validate(model).iter().map(ToString::to_string).collect()
}
