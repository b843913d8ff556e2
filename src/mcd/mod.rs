//! Conceptual data model (MCD): entities, associations and the links
//! between them.

mod association;
mod attribute;
mod entity;
mod link;
mod model;

pub use association::Association;
pub use attribute::{Attribute, DataType};
pub use entity::Entity;
pub use link::{CardinalityMax, CardinalityMin, Link};
pub use model::ConceptualModel;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::mld::naming::sanitize;

/// Identifier of an entity, association or link.
///
/// Freshly created elements get a random UUID; identifiers read from a
/// project file are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rejected mutation of the conceptual model. The model is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Name must not be empty")]
    EmptyName,
    #[error("An entity named '{0}' already exists")]
    DuplicateEntityName(String),
    #[error("'{owner}' already has an attribute named '{name}'")]
    DuplicateAttributeName { owner: String, name: String },
    #[error("Attribute '{name}' of '{owner}' has size 0")]
    ZeroSize { owner: String, name: String },
    #[error("'{owner}' has no attribute named '{name}'")]
    UnknownAttribute { owner: String, name: String },
    #[error("Identifier {0} is already in use")]
    DuplicateId(ElementId),
    #[error("Unknown entity {0}")]
    UnknownEntity(ElementId),
    #[error("Unknown association {0}")]
    UnknownAssociation(ElementId),
    #[error("Unknown link {0}")]
    UnknownLink(ElementId),
}

/// Trims `name` and rejects it if nothing is left.
pub(crate) fn checked_name(name: &str) -> Result<String, ModelError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ModelError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Trims the name and rejects a zero size.
fn checked_attribute(owner: &str, mut attribute: Attribute) -> Result<Attribute, ModelError> {
    attribute.name = checked_name(&attribute.name)?;
    if attribute.size == Some(0) {
        return Err(ModelError::ZeroSize {
            owner: owner.to_string(),
            name: attribute.name,
        });
    }
    Ok(attribute)
}

/// Two attribute names clash when they map to the same column name.
fn clashes(a: &str, b: &str) -> bool {
    a == b || sanitize(a) == sanitize(b)
}

/// Appends `attribute` to `attributes` unless the name is taken.
pub(crate) fn push_attribute(
    owner: &str,
    attributes: &mut Vec<Attribute>,
    attribute: Attribute,
) -> Result<(), ModelError> {
    let attribute = checked_attribute(owner, attribute)?;
    if attributes.iter().any(|a| clashes(&a.name, &attribute.name)) {
        return Err(ModelError::DuplicateAttributeName {
            owner: owner.to_string(),
            name: attribute.name,
        });
    }
    attributes.push(attribute);
    Ok(())
}

/// Replaces the attribute called `old_name` in place, keeping its position.
pub(crate) fn replace_attribute(
    owner: &str,
    attributes: &mut [Attribute],
    old_name: &str,
    attribute: Attribute,
) -> Result<(), ModelError> {
    let attribute = checked_attribute(owner, attribute)?;
    let index = attributes
        .iter()
        .position(|a| a.name == old_name)
        .ok_or_else(|| ModelError::UnknownAttribute {
            owner: owner.to_string(),
            name: old_name.to_string(),
        })?;
    let taken = attributes
        .iter()
        .enumerate()
        .any(|(i, a)| i != index && clashes(&a.name, &attribute.name));
    if taken {
        return Err(ModelError::DuplicateAttributeName {
            owner: owner.to_string(),
            name: attribute.name,
        });
    }
    attributes[index] = attribute;
    Ok(())
}

pub(crate) fn take_attribute(
    owner: &str,
    attributes: &mut Vec<Attribute>,
    name: &str,
) -> Result<Attribute, ModelError> {
    let index = attributes
        .iter()
        .position(|a| a.name == name)
        .ok_or_else(|| ModelError::UnknownAttribute {
            owner: owner.to_string(),
            name: name.to_string(),
        })?;
    Ok(attributes.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ElementId::generate();
        let b = ElementId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_checked_name_trims() {
        assert_eq!(checked_name("  Client ").unwrap(), "Client");
        assert_eq!(checked_name("   "), Err(ModelError::EmptyName));
    }

    #[test]
    fn test_replace_attribute_keeps_position() {
        let mut attrs = vec![
            Attribute::new("id", DataType::Int).primary_key(),
            Attribute::new("nom", DataType::Varchar).with_size(50),
            Attribute::new("ville", DataType::Varchar),
        ];
        replace_attribute("Client", &mut attrs, "nom", Attribute::new("name", DataType::Text))
            .unwrap();
        let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "ville"]);
    }

    #[test]
    fn test_replace_attribute_rejects_collision() {
        let mut attrs = vec![
            Attribute::new("id", DataType::Int),
            Attribute::new("nom", DataType::Varchar),
        ];
        let err = replace_attribute("Client", &mut attrs, "nom", Attribute::new("id", DataType::Int))
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateAttributeName { .. }));
        assert_eq!(attrs[1].name, "nom");
    }

    #[test]
    fn test_names_clash_on_column_name() {
        let mut attrs = vec![Attribute::new("prix ttc", DataType::Decimal)];
        for name in ["prix-ttc", "Prix TTC", "prix_ttc"] {
            let err = push_attribute("Produit", &mut attrs, Attribute::new(name, DataType::Int))
                .unwrap_err();
            assert!(matches!(err, ModelError::DuplicateAttributeName { .. }));
        }
        assert_eq!(attrs.len(), 1);

        // Changing the case of an attribute's own name is allowed
        replace_attribute("Produit", &mut attrs, "prix ttc", Attribute::new("Prix TTC", DataType::Decimal))
            .unwrap();
        assert_eq!(attrs[0].name, "Prix TTC");
    }

    #[test]
    fn test_zero_size_rejected() {
        let mut attrs = vec![Attribute::new("nom", DataType::Varchar).with_size(50)];
        let err = push_attribute("Client", &mut attrs, Attribute::new("ville", DataType::Varchar).with_size(0))
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::ZeroSize {
                owner: "Client".to_string(),
                name: "ville".to_string()
            }
        );
        let err = replace_attribute("Client", &mut attrs, "nom", Attribute::new("nom", DataType::Varchar).with_size(0))
            .unwrap_err();
        assert!(matches!(err, ModelError::ZeroSize { .. }));
        assert_eq!(attrs[0].size, Some(50));
    }
}
