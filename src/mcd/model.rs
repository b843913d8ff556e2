use indexmap::IndexMap;
use tracing::debug;

use super::{
    Association, Attribute, CardinalityMax, CardinalityMin, ElementId, Entity, Link, ModelError,
    checked_name, push_attribute, replace_attribute, take_attribute,
};

/// The entity/association/link graph.
///
/// Iteration follows insertion order so that everything derived from the
/// model is deterministic. Links only ever point at live entities and
/// associations: adding a dangling link is rejected and removing an
/// endpoint removes its links.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConceptualModel {
    entities: IndexMap<ElementId, Entity>,
    associations: IndexMap<ElementId, Association>,
    links: IndexMap<ElementId, Link>,
}

impl ConceptualModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.associations.is_empty() && self.links.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.associations.clear();
        self.links.clear();
    }

    fn ensure_free_id(&self, id: &ElementId) -> Result<(), ModelError> {
        if self.entities.contains_key(id)
            || self.associations.contains_key(id)
            || self.links.contains_key(id)
        {
            return Err(ModelError::DuplicateId(id.clone()));
        }
        Ok(())
    }

    fn ensure_entity_name_free(&self, name: &str, except: Option<&ElementId>) -> Result<(), ModelError> {
        let taken = self
            .entities
            .values()
            .any(|e| e.name == name && Some(e.id()) != except);
        if taken {
            return Err(ModelError::DuplicateEntityName(name.to_string()));
        }
        Ok(())
    }

    fn entity_mut(&mut self, id: &ElementId) -> Result<&mut Entity, ModelError> {
        self.entities
            .get_mut(id)
            .ok_or_else(|| ModelError::UnknownEntity(id.clone()))
    }

    fn association_mut(&mut self, id: &ElementId) -> Result<&mut Association, ModelError> {
        self.associations
            .get_mut(id)
            .ok_or_else(|| ModelError::UnknownAssociation(id.clone()))
    }

    // Entities

    pub fn add_entity(&mut self, mut entity: Entity) -> Result<ElementId, ModelError> {
        entity.name = checked_name(&entity.name)?;
        self.ensure_free_id(entity.id())?;
        self.ensure_entity_name_free(&entity.name, None)?;
        let id = entity.id().clone();
        self.entities.insert(id.clone(), entity);
        Ok(id)
    }

    pub fn rename_entity(&mut self, id: &ElementId, name: &str) -> Result<(), ModelError> {
        let name = checked_name(name)?;
        if !self.entities.contains_key(id) {
            return Err(ModelError::UnknownEntity(id.clone()));
        }
        self.ensure_entity_name_free(&name, Some(id))?;
        self.entity_mut(id)?.name = name;
        Ok(())
    }

    pub fn move_entity(&mut self, id: &ElementId, x: f64, y: f64) -> Result<(), ModelError> {
        let entity = self.entity_mut(id)?;
        entity.x = x;
        entity.y = y;
        Ok(())
    }

    pub fn add_entity_attribute(&mut self, id: &ElementId, attribute: Attribute) -> Result<(), ModelError> {
        let entity = self.entity_mut(id)?;
        push_attribute(&entity.name, &mut entity.attributes, attribute)
    }

    pub fn update_entity_attribute(
        &mut self,
        id: &ElementId,
        old_name: &str,
        attribute: Attribute,
    ) -> Result<(), ModelError> {
        let entity = self.entity_mut(id)?;
        replace_attribute(&entity.name, &mut entity.attributes, old_name, attribute)
    }

    pub fn remove_entity_attribute(&mut self, id: &ElementId, name: &str) -> Result<Attribute, ModelError> {
        let entity = self.entity_mut(id)?;
        take_attribute(&entity.name, &mut entity.attributes, name)
    }

    /// Removes an entity together with every link attached to it.
    pub fn remove_entity(&mut self, id: &ElementId) -> Option<Entity> {
        let entity = self.entities.shift_remove(id)?;
        let before = self.links.len();
        self.links.retain(|_, link| link.entity_id != *id);
        debug!(
            "Removed entity '{}' and {} link(s)",
            entity.name,
            before - self.links.len()
        );
        Some(entity)
    }

    pub fn entity(&self, id: &ElementId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.values().find(|e| e.name == name)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    // Associations

    pub fn add_association(&mut self, mut association: Association) -> Result<ElementId, ModelError> {
        association.name = checked_name(&association.name)?;
        self.ensure_free_id(association.id())?;
        let id = association.id().clone();
        self.associations.insert(id.clone(), association);
        Ok(id)
    }

    pub fn rename_association(&mut self, id: &ElementId, name: &str) -> Result<(), ModelError> {
        let name = checked_name(name)?;
        self.association_mut(id)?.name = name;
        Ok(())
    }

    pub fn move_association(&mut self, id: &ElementId, x: f64, y: f64) -> Result<(), ModelError> {
        let association = self.association_mut(id)?;
        association.x = x;
        association.y = y;
        Ok(())
    }

    pub fn add_association_attribute(
        &mut self,
        id: &ElementId,
        attribute: Attribute,
    ) -> Result<(), ModelError> {
        let association = self.association_mut(id)?;
        push_attribute(&association.name, &mut association.attributes, attribute)
    }

    pub fn update_association_attribute(
        &mut self,
        id: &ElementId,
        old_name: &str,
        attribute: Attribute,
    ) -> Result<(), ModelError> {
        let association = self.association_mut(id)?;
        replace_attribute(&association.name, &mut association.attributes, old_name, attribute)
    }

    pub fn remove_association_attribute(
        &mut self,
        id: &ElementId,
        name: &str,
    ) -> Result<Attribute, ModelError> {
        let association = self.association_mut(id)?;
        take_attribute(&association.name, &mut association.attributes, name)
    }

    /// Removes an association together with every link attached to it.
    pub fn remove_association(&mut self, id: &ElementId) -> Option<Association> {
        let association = self.associations.shift_remove(id)?;
        let before = self.links.len();
        self.links.retain(|_, link| link.association_id != *id);
        debug!(
            "Removed association '{}' and {} link(s)",
            association.name,
            before - self.links.len()
        );
        Some(association)
    }

    pub fn association(&self, id: &ElementId) -> Option<&Association> {
        self.associations.get(id)
    }

    pub fn associations(&self) -> impl Iterator<Item = &Association> {
        self.associations.values()
    }

    // Links

    pub fn add_link(&mut self, link: Link) -> Result<ElementId, ModelError> {
        self.ensure_free_id(&link.id)?;
        if !self.entities.contains_key(&link.entity_id) {
            return Err(ModelError::UnknownEntity(link.entity_id));
        }
        if !self.associations.contains_key(&link.association_id) {
            return Err(ModelError::UnknownAssociation(link.association_id));
        }
        let id = link.id.clone();
        self.links.insert(id.clone(), link);
        Ok(id)
    }

    /// Convenience for `add_link(Link::new(..))`.
    pub fn connect(
        &mut self,
        entity_id: &ElementId,
        association_id: &ElementId,
        min: CardinalityMin,
        max: CardinalityMax,
    ) -> Result<ElementId, ModelError> {
        self.add_link(Link::new(entity_id.clone(), association_id.clone(), min, max))
    }

    pub fn set_link_cardinality(
        &mut self,
        id: &ElementId,
        min: CardinalityMin,
        max: CardinalityMax,
    ) -> Result<(), ModelError> {
        let link = self
            .links
            .get_mut(id)
            .ok_or_else(|| ModelError::UnknownLink(id.clone()))?;
        link.cardinality_min = min;
        link.cardinality_max = max;
        Ok(())
    }

    pub fn remove_link(&mut self, id: &ElementId) -> Option<Link> {
        self.links.shift_remove(id)
    }

    pub fn link(&self, id: &ElementId) -> Option<&Link> {
        self.links.get(id)
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    pub fn links_for_entity<'a>(&'a self, entity_id: &'a ElementId) -> impl Iterator<Item = &'a Link> {
        self.links.values().filter(move |l| l.entity_id == *entity_id)
    }

    pub fn links_for_association<'a>(
        &'a self,
        association_id: &'a ElementId,
    ) -> impl Iterator<Item = &'a Link> {
        self.links
            .values()
            .filter(move |l| l.association_id == *association_id)
    }

    /// Entities linked to an association, one per link.
    pub fn entities_for_association<'a>(
        &'a self,
        association_id: &'a ElementId,
    ) -> impl Iterator<Item = &'a Entity> {
        self.links_for_association(association_id)
            .filter_map(|l| self.entities.get(&l.entity_id))
    }

    /// Every entity attribute as `(entity name, attribute)`, the data
    /// dictionary view of the model.
    pub fn all_attributes(&self) -> Vec<(&str, &Attribute)> {
        self.entities
            .values()
            .flat_map(|e| e.attributes.iter().map(move |a| (e.name(), a)))
            .collect()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn association_count(&self) -> usize {
        self.associations.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}
