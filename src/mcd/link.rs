use serde::{Deserialize, Serialize};
use std::fmt;

use super::ElementId;

/// Lower bound of a link cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CardinalityMin {
    #[default]
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
}

/// Upper bound of a link cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CardinalityMax {
    #[serde(rename = "1")]
    One,
    #[default]
    #[serde(rename = "N", alias = "n", alias = "*")]
    Many,
}

impl fmt::Display for CardinalityMin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Zero => "0",
            Self::One => "1",
        })
    }
}

impl fmt::Display for CardinalityMax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::One => "1",
            Self::Many => "N",
        })
    }
}

/// Edge between one entity and one association.
///
/// A link references both endpoints by id and owns neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: ElementId,
    pub entity_id: ElementId,
    pub association_id: ElementId,
    #[serde(rename = "card_min", default)]
    pub cardinality_min: CardinalityMin,
    #[serde(rename = "card_max", default)]
    pub cardinality_max: CardinalityMax,
}

impl Link {
    pub fn new(
        entity_id: ElementId,
        association_id: ElementId,
        cardinality_min: CardinalityMin,
        cardinality_max: CardinalityMax,
    ) -> Self {
        Self {
            id: ElementId::generate(),
            entity_id,
            association_id,
            cardinality_min,
            cardinality_max,
        }
    }

    /// Cardinality as written on a diagram, e.g. `0,N`.
    pub fn cardinality(&self) -> String {
        format!("{},{}", self.cardinality_min, self.cardinality_max)
    }

    pub fn is_multiple(&self) -> bool {
        self.cardinality_max == CardinalityMax::Many
    }

    pub fn is_mandatory(&self) -> bool {
        self.cardinality_min == CardinalityMin::One
    }
}
