use super::{Attribute, ElementId, ModelError, push_attribute};

/// A named relationship between entities, optionally carrying its own
/// attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Association {
    id: ElementId,
    pub(crate) name: String,
    pub(crate) attributes: Vec<Attribute>,
    pub x: f64,
    pub y: f64,
}

impl Association {
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

    /// Carrying attributes.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }
}
