//! On-disk shape of a project file.
//!
//! Reading goes through owned, lenient `*In` structs that also accept the
//! legacy layout; writing goes through borrowing `*Out` structs that only
//! ever produce the current layout.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{Metadata, ProjectError};
use crate::mcd::{Association, Attribute, ConceptualModel, ElementId, Entity, Link};
use crate::mld::NameOverrideStore;
use crate::sql::{parse_data_type, parse_size};

fn legacy_version() -> String {
    "1.0".to_string()
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Deserialize)]
pub(super) struct DocumentIn {
    #[serde(default = "legacy_version")]
    pub version: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub mcd: McdIn,
    #[serde(default)]
    pub mld: MldDocument,
    #[serde(default = "empty_object")]
    pub colors: Value,
    /// Global attribute dictionary of 1.x files.
    #[serde(default)]
    pub dictionary: Option<DictionaryIn>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct McdIn {
    #[serde(default)]
    pub entities: Vec<ElementIn>,
    #[serde(default)]
    pub associations: Vec<ElementIn>,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(super) struct MldDocument {
    #[serde(default)]
    pub column_names: NameOverrideStore,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct DictionaryIn {
    #[serde(default)]
    pub attributes: Vec<AttributeFields>,
}

/// An entity or association as stored.
#[derive(Debug, Deserialize)]
pub(super) struct ElementIn {
    pub id: ElementId,
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<AttributeIn>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum AttributeIn {
    Fields(AttributeFields),
    /// Older files list attribute names only.
    Name(String),
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct AttributeFields {
    pub name: String,
    #[serde(rename = "type", default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub pk: bool,
}

impl AttributeFields {
    fn to_attribute(&self, owner: &str) -> Result<Attribute, ProjectError> {
        let declared = self.data_type.as_deref().unwrap_or_default();
        let data_type = parse_data_type(declared).ok_or_else(|| ProjectError::UnknownDataType {
            owner: owner.to_string(),
            attribute: self.name.clone(),
            data_type: declared.to_string(),
        })?;
        Ok(Attribute {
            name: self.name.clone(),
            data_type,
            size: self.size.or_else(|| parse_size(declared)),
            is_primary_key: self.pk,
        })
    }
}

impl DocumentIn {
    pub fn into_model(self) -> Result<(ConceptualModel, NameOverrideStore, Metadata, Value), ProjectError> {
        let dictionary = self.dictionary.unwrap_or_default();
        let mut model = ConceptualModel::new();

        for raw in self.mcd.entities {
            let attributes = resolve_attributes(&raw.name, raw.attributes, &dictionary)?;
            let mut entity = Entity::with_id(raw.id, raw.name).at(raw.x, raw.y);
            for attribute in attributes {
                entity = entity.with_attribute(attribute)?;
            }
            model.add_entity(entity)?;
        }

        for raw in self.mcd.associations {
            let attributes = resolve_attributes(&raw.name, raw.attributes, &dictionary)?;
            let mut association = Association::with_id(raw.id, raw.name).at(raw.x, raw.y);
            for attribute in attributes {
                association = association.with_attribute(attribute)?;
            }
            model.add_association(association)?;
        }

        for link in self.mcd.links {
            let id = link.id.clone();
            model
                .add_link(link)
                .map_err(|source| ProjectError::Link { link: id, source })?;
        }

        Ok((model, self.mld.column_names, self.metadata, self.colors))
    }
}

/// Structured attributes are kept. Bare names, and structured entries
/// without a type, are looked up in the legacy dictionary and dropped when
/// it has no typed entry for them.
fn resolve_attributes(
    owner: &str,
    raw: Vec<AttributeIn>,
    dictionary: &DictionaryIn,
) -> Result<Vec<Attribute>, ProjectError> {
    let mut attributes = Vec::with_capacity(raw.len());
    for attribute in raw {
        let fields = match attribute {
            AttributeIn::Fields(fields) if fields.data_type.is_some() => fields,
            AttributeIn::Fields(AttributeFields { name, .. }) | AttributeIn::Name(name) => {
                match dictionary
                    .attributes
                    .iter()
                    .find(|a| a.name == name && a.data_type.is_some())
                {
                    Some(found) => found.clone(),
                    None => {
                        warn!("Dropping attribute '{}' of '{}': no type information", name, owner);
                        continue;
                    }
                }
            }
        };
        attributes.push(fields.to_attribute(owner)?);
    }
    Ok(attributes)
}

#[derive(Debug, Serialize)]
pub(super) struct DocumentOut<'a> {
    pub version: &'a str,
    pub metadata: &'a Metadata,
    pub mcd: McdOut<'a>,
    pub mld: MldOut<'a>,
    pub colors: &'a Value,
}

#[derive(Debug, Serialize)]
pub(super) struct McdOut<'a> {
    pub entities: Vec<ElementOut<'a>>,
    pub associations: Vec<ElementOut<'a>>,
    pub links: Vec<&'a Link>,
}

#[derive(Debug, Serialize)]
pub(super) struct MldOut<'a> {
    pub column_names: &'a NameOverrideStore,
}

#[derive(Debug, Serialize)]
pub(super) struct ElementOut<'a> {
    pub id: &'a ElementId,
    pub name: &'a str,
    pub attributes: &'a [Attribute],
    pub x: f64,
    pub y: f64,
}

impl<'a> From<&'a Entity> for ElementOut<'a> {
    fn from(e: &'a Entity) -> Self {
        Self {
            id: e.id(),
            name: e.name(),
            attributes: e.attributes(),
            x: e.x,
            y: e.y,
        }
    }
}

impl<'a> From<&'a Association> for ElementOut<'a> {
    fn from(a: &'a Association) -> Self {
        Self {
            id: a.id(),
            name: a.name(),
            attributes: a.attributes(),
            x: a.x,
            y: a.y,
        }
    }
}
