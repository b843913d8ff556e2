use super::{Attribute, ElementId, ModelError, push_attribute};

/// A conceptual object owning an ordered list of attributes.
///
/// Attribute names are unique within the entity; the only way to add one is
/// through a checked builder or the owning [`ConceptualModel`](super::ConceptualModel).
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: ElementId,
    pub(crate) name: String,
    pub(crate) attributes: Vec<Attribute>,
    pub x: f64,
    pub y: f64,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(ElementId::generate(), name)
    }

    pub fn with_id(id: ElementId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            attributes: Vec::new(),
            x: 0.0,
            y: 0.0,
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Result<Self, ModelError> {
        push_attribute(&self.name, &mut self.attributes, attribute)?;
        Ok(self)
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Primary-key attributes in declaration order.
    pub fn primary_keys(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| a.is_primary_key)
    }

    pub fn has_primary_key(&self) -> bool {
        self.attributes.iter().any(|a| a.is_primary_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcd::DataType;

    #[test]
    fn test_builder() {
        let entity = Entity::new("Client")
            .with_attribute(Attribute::new("id_client", DataType::Int).primary_key())
            .unwrap()
            .with_attribute(Attribute::new("nom", DataType::Varchar).with_size(100))
            .unwrap()
            .at(100.0, 200.0);

        assert_eq!(entity.name(), "Client");
        assert_eq!(entity.attributes().len(), 2);
        assert_eq!((entity.x, entity.y), (100.0, 200.0));
        assert!(!entity.id().as_str().is_empty());
    }

    #[test]
    fn test_duplicate_attribute_rejected() {
        let result = Entity::new("Client")
            .with_attribute(Attribute::new("id", DataType::Int))
            .unwrap()
            .with_attribute(Attribute::new("id", DataType::Varchar));
        assert!(matches!(result, Err(ModelError::DuplicateAttributeName { .. })));

        let result = Entity::new("Client")
            .with_attribute(Attribute::new("Nom", DataType::Text))
            .unwrap()
            .with_attribute(Attribute::new("nom", DataType::Text));
        assert!(matches!(result, Err(ModelError::DuplicateAttributeName { .. })));
    }

    #[test]
    fn test_zero_size_rejected() {
        let result = Entity::new("Client").with_attribute(Attribute::new("nom", DataType::Varchar).with_size(0));
        assert!(matches!(result, Err(ModelError::ZeroSize { .. })));
    }

    #[test]
    fn test_primary_keys() {
        let entity = Entity::new("Ligne")
            .with_attribute(Attribute::new("num_cmd", DataType::Int).primary_key())
            .unwrap()
            .with_attribute(Attribute::new("libelle", DataType::Text))
            .unwrap()
            .with_attribute(Attribute::new("num_ligne", DataType::Int).primary_key())
            .unwrap();
        let pks: Vec<&str> = entity.primary_keys().map(|a| a.name.as_str()).collect();
        assert_eq!(pks, vec!["num_cmd", "num_ligne"]);
        assert!(entity.has_primary_key());
    }
}
