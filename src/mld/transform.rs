//! Conceptual to logical transformation.
//!
//! Tables come out in a fixed order: one per entity in model order, then one
//! per association that needs a junction table, in model order. Columns
//! keep attribute order; propagated foreign keys are appended in the order
//! their links are found. Junction tables and foreign key propagation are
//! decided separately, so one association can produce both.

use std::collections::HashMap;
use tracing::debug;

use super::naming::{foreign_key_column, sanitize};
use super::{ColumnRef, LogicalColumn, LogicalTable, SourceKind};
use crate::mcd::{
    Association, Attribute, CardinalityMax, CardinalityMin, ConceptualModel, ElementId, Entity,
    Link,
};

/// How the cardinalities of two links of one association relate, seen from
/// the first link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// This side is `x,1`, the other `x,N`: this side's table receives a
    /// foreign key to the other side.
    ForeignKey { nullable: bool },
    /// Both sides `x,1`. No relational artifact is derived.
    OneToOne,
    /// This side is `x,N`, the other `x,1`: handled from the other side.
    Inverse,
    /// Both sides `x,N`: only representable as a junction table.
    ManyToMany,
}

impl Pairing {
    pub fn classify(this: &Link, other: &Link) -> Self {
        match (this.cardinality_max, other.cardinality_max) {
            (CardinalityMax::One, CardinalityMax::Many) => Pairing::ForeignKey {
                nullable: match this.cardinality_min {
                    CardinalityMin::Zero => true,
                    CardinalityMin::One => false,
                },
            },
            (CardinalityMax::One, CardinalityMax::One) => Pairing::OneToOne,
            (CardinalityMax::Many, CardinalityMax::One) => Pairing::Inverse,
            (CardinalityMax::Many, CardinalityMax::Many) => Pairing::ManyToMany,
        }
    }
}

/// Derives the logical schema of a conceptual model.
pub struct LogicalTransformer<'a> {
    model: &'a ConceptualModel,
}

/// Shorthand for `LogicalTransformer::new(model).transform()`.
pub fn transform(model: &ConceptualModel) -> Vec<LogicalTable> {
    LogicalTransformer::new(model).transform()
}

impl<'a> LogicalTransformer<'a> {
    pub fn new(model: &'a ConceptualModel) -> Self {
        Self { model }
    }

    pub fn transform(&self) -> Vec<LogicalTable> {
        let mut tables: Vec<LogicalTable> = self
            .model
            .entities()
            .map(|e| self.entity_table(e))
            .collect();

        tables.extend(
            self.model
                .associations()
                .filter_map(|a| self.junction_table(a)),
        );

        self.propagate_foreign_keys(&mut tables);
        tables
    }

    fn entity_table(&self, entity: &Entity) -> LogicalTable {
        let columns = entity
            .attributes()
            .iter()
            .map(|attr| LogicalColumn {
                name: sanitize(&attr.name),
                data_type: attr.sql_type(),
                is_primary_key: attr.is_primary_key,
                is_foreign_key: false,
                references: None,
                is_nullable: !attr.is_primary_key,
            })
            .collect();

        LogicalTable {
            name: sanitize(entity.name()),
            columns,
            source_kind: SourceKind::Entity,
            source_id: entity.id().clone(),
        }
    }

    /// A junction table is needed when at least two links are `x,N` or when
    /// the association carries attributes. Associations with fewer than two
    /// links never produce one.
    ///
    /// An entity linked more than once (reflexive association) gets its key
    /// columns suffixed by role: `fk_personne_id`, `fk_personne_id_2`, ...
    fn junction_table(&self, association: &Association) -> Option<LogicalTable> {
        let links: Vec<&Link> = self.model.links_for_association(association.id()).collect();
        if links.len() < 2 {
            debug!(
                "Association '{}' has {} link(s), no table derived",
                association.name(),
                links.len()
            );
            return None;
        }

        let many = links.iter().filter(|l| l.is_multiple()).count();
        if many < 2 && !association.has_attributes() {
            return None;
        }

        let mut table = LogicalTable {
            name: sanitize(association.name()),
            columns: Vec::new(),
            source_kind: SourceKind::Association,
            source_id: association.id().clone(),
        };

        let mut roles: HashMap<&ElementId, usize> = HashMap::new();
        for link in &links {
            let Some(entity) = self.model.entity(&link.entity_id) else {
                continue;
            };
            let role = roles.entry(entity.id()).or_insert(0);
            *role += 1;
            for pk in entity.primary_keys() {
                let mut column = foreign_key(entity, pk, false);
                column.is_primary_key = true;
                if *role > 1 {
                    column.name = format!("{}_{}", column.name, role);
                }
                if !table.push_unique(column) {
                    debug!(
                        "Junction '{}' already references {}.{}",
                        table.name,
                        entity.name(),
                        pk.name
                    );
                }
            }
        }

        for attr in association.attributes() {
            table.columns.push(LogicalColumn {
                name: sanitize(&attr.name),
                data_type: attr.sql_type(),
                is_primary_key: false,
                is_foreign_key: false,
                references: None,
                is_nullable: true,
            });
        }

        debug!(
            "Association '{}' becomes junction table '{}'",
            association.name(),
            table.name
        );
        Some(table)
    }

    /// Adds a foreign key to the `x,1` side of every `x,1`/`x,N` pair of
    /// links, whether or not the association also has a junction table.
    fn propagate_foreign_keys(&self, tables: &mut [LogicalTable]) {
        let entity_tables: HashMap<ElementId, usize> = tables
            .iter()
            .enumerate()
            .filter(|(_, t)| t.source_kind == SourceKind::Entity)
            .map(|(i, t)| (t.source_id.clone(), i))
            .collect();

        for entity in self.model.entities() {
            let Some(&index) = entity_tables.get(entity.id()) else {
                continue;
            };

            for link in self.model.links_for_entity(entity.id()) {
                for other in self.model.links_for_association(&link.association_id) {
                    if other.entity_id == *entity.id() {
                        continue;
                    }
                    let Some(target) = self.model.entity(&other.entity_id) else {
                        continue;
                    };

                    match Pairing::classify(link, other) {
                        Pairing::ForeignKey { nullable } => {
                            let table = &mut tables[index];
                            for pk in target.primary_keys() {
                                if table.push_unique(foreign_key(target, pk, nullable)) {
                                    debug!(
                                        "Foreign key {}.{} -> {}",
                                        table.name,
                                        foreign_key_column(target.name(), &pk.name),
                                        sanitize(target.name())
                                    );
                                }
                            }
                        }
                        Pairing::OneToOne => {
                            debug!(
                                "One-to-one between '{}' and '{}', no foreign key derived",
                                entity.name(),
                                target.name()
                            );
                        }
                        Pairing::Inverse | Pairing::ManyToMany => {}
                    }
                }
            }
        }
    }
}

fn foreign_key(target: &Entity, pk: &Attribute, nullable: bool) -> LogicalColumn {
    LogicalColumn {
        name: foreign_key_column(target.name(), &pk.name),
        data_type: pk.sql_type(),
        is_primary_key: false,
        is_foreign_key: true,
        references: Some(ColumnRef {
            table: sanitize(target.name()),
            column: sanitize(&pk.name),
        }),
        is_nullable: nullable,
    }
}
