use merisql::mld::{Identity, report};
use merisql::{
    Association, Attribute, ConceptualModel, DataType, Diagnostic, ElementId, Entity,
    LogicalTable, NameOverrideStore, Project, SourceKind, SqlOptions,
    generate_sql, transform, validate,
};
use pretty_assertions::assert_eq;

use merisql::CardinalityMax::{Many, One as MaxOne};
use merisql::CardinalityMin::{One, Zero};

fn entity(model: &mut ConceptualModel, name: &str, pks: &[&str]) -> ElementId {
    let mut entity = Entity::new(name);
    for pk in pks {
        entity = entity
            .with_attribute(Attribute::new(*pk, DataType::Int).primary_key())
            .unwrap();
    }
    model.add_entity(entity).unwrap()
}

fn table<'a>(tables: &'a [LogicalTable], name: &str) -> &'a LogicalTable {
    tables
        .iter()
        .find(|t| t.name == name)
        .unwrap_or_else(|| panic!("no table {}", name))
}

fn column_names(table: &LogicalTable) -> Vec<&str> {
    table.columns.iter().map(|c| c.name.as_str()).collect()
}

/// Client (0,N) -- Passer -- (1,1) Commande
fn client_commande() -> (ConceptualModel, ElementId) {
    let mut model = ConceptualModel::new();
    let client = entity(&mut model, "Client", &["id_client"]);
    let commande = entity(&mut model, "Commande", &["id_commande"]);
    let passer = model.add_association(Association::new("Passer")).unwrap();
    model.connect(&client, &passer, Zero, Many).unwrap();
    model.connect(&commande, &passer, One, MaxOne).unwrap();
    (model, passer)
}

#[test]
fn one_to_many_adds_foreign_key_to_single_side() {
    let (model, _) = client_commande();
    let tables = transform(&model);

    assert_eq!(tables.len(), 2);
    assert_eq!(column_names(table(&tables, "client")), vec!["id_client"]);

    let commande = table(&tables, "commande");
    assert_eq!(column_names(commande), vec!["id_commande", "fk_client_id_client"]);
    let fk = commande.column("fk_client_id_client").unwrap();
    assert!(fk.is_foreign_key);
    assert!(!fk.is_primary_key);
    assert!(!fk.is_nullable);
    assert_eq!(fk.data_type, "INT");
    assert_eq!(fk.references_table(), Some("client"));
    assert_eq!(fk.references_column(), Some("id_client"));
}

#[test]
fn optional_single_side_gives_nullable_foreign_key() {
    let mut model = ConceptualModel::new();
    let client = entity(&mut model, "Client", &["id_client"]);
    let commande = entity(&mut model, "Commande", &["id_commande"]);
    let passer = model.add_association(Association::new("Passer")).unwrap();
    model.connect(&client, &passer, One, Many).unwrap();
    model.connect(&commande, &passer, Zero, MaxOne).unwrap();

    let tables = transform(&model);
    let commande = table(&tables, "commande");
    assert!(commande.column("fk_client_id_client").unwrap().is_nullable);
    assert_eq!(commande.foreign_keys().count(), 1);
}

#[test]
fn many_to_many_with_carrying_attribute_gives_junction_table() {
    let mut model = ConceptualModel::new();
    let commande = entity(&mut model, "Commande", &["id_commande"]);
    let produit = entity(&mut model, "Produit", &["id_produit"]);
    let concerner = model
        .add_association(
            Association::new("Concerner")
                .with_attribute(Attribute::new("quantite", DataType::Int))
                .unwrap(),
        )
        .unwrap();
    model.connect(&commande, &concerner, One, Many).unwrap();
    model.connect(&produit, &concerner, Zero, Many).unwrap();

    let tables = transform(&model);
    assert_eq!(tables.len(), 3);

    let junction = &tables[2];
    assert_eq!(junction.name, "concerner");
    assert_eq!(junction.source_kind, SourceKind::Association);
    assert_eq!(junction.source_id, concerner);
    assert_eq!(
        column_names(junction),
        vec!["fk_commande_id_commande", "fk_produit_id_produit", "quantite"]
    );

    let keys: Vec<&str> = junction.primary_keys().map(|c| c.name.as_str()).collect();
    assert_eq!(keys, vec!["fk_commande_id_commande", "fk_produit_id_produit"]);
    assert!(junction.primary_keys().all(|c| c.is_foreign_key && !c.is_nullable));

    let quantite = junction.column("quantite").unwrap();
    assert!(quantite.is_nullable && !quantite.is_primary_key && !quantite.is_foreign_key);

    // Entity tables stay untouched
    assert_eq!(column_names(table(&tables, "commande")), vec!["id_commande"]);
    assert_eq!(column_names(table(&tables, "produit")), vec!["id_produit"]);
}

#[test]
fn junction_key_is_union_of_composite_keys() {
    let mut model = ConceptualModel::new();
    let ligne = entity(&mut model, "Ligne", &["num_cmd", "num_ligne"]);
    let lot = entity(&mut model, "Lot", &["code"]);
    let affecter = model.add_association(Association::new("Affecter")).unwrap();
    model.connect(&ligne, &affecter, Zero, Many).unwrap();
    model.connect(&lot, &affecter, Zero, Many).unwrap();

    let tables = transform(&model);
    let junction = table(&tables, "affecter");
    assert_eq!(
        column_names(junction),
        vec!["fk_ligne_num_cmd", "fk_ligne_num_ligne", "fk_lot_code"]
    );
    assert_eq!(junction.primary_keys().count(), 3);
}

#[test]
fn association_with_single_link_is_reported_and_skipped() {
    let mut model = ConceptualModel::new();
    let client = entity(&mut model, "Client", &["id_client"]);
    let seule = model.add_association(Association::new("Seule")).unwrap();
    model.connect(&client, &seule, Zero, Many).unwrap();

    assert_eq!(
        validate(&model),
        vec![Diagnostic::SparseAssociation {
            association: "Seule".to_string(),
            links: 1
        }]
    );

    let tables = transform(&model);
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].name, "client");
}

#[test]
fn one_to_one_derives_nothing() {
    let mut model = ConceptualModel::new();
    let personne = entity(&mut model, "Personne", &["id_personne"]);
    let passeport = entity(&mut model, "Passeport", &["num"]);
    let posseder = model.add_association(Association::new("Posseder")).unwrap();
    model.connect(&personne, &posseder, Zero, MaxOne).unwrap();
    model.connect(&passeport, &posseder, One, MaxOne).unwrap();

    let tables = transform(&model);
    assert_eq!(tables.len(), 2);
    assert!(tables.iter().all(|t| t.foreign_keys().next().is_none()));
}

#[test]
fn ternary_junction_and_one_side_foreign_keys() {
    let mut model = ConceptualModel::new();
    let seance = entity(&mut model, "Seance", &["id_seance"]);
    let prof = entity(&mut model, "Professeur", &["id_prof"]);
    let salle = entity(&mut model, "Salle", &["id_salle"]);
    let occuper = model.add_association(Association::new("Occuper")).unwrap();
    model.connect(&seance, &occuper, One, MaxOne).unwrap();
    model.connect(&prof, &occuper, Zero, Many).unwrap();
    model.connect(&salle, &occuper, Zero, Many).unwrap();

    let tables = transform(&model);
    assert_eq!(tables.len(), 4);
    assert_eq!(
        column_names(table(&tables, "occuper")),
        vec!["fk_seance_id_seance", "fk_professeur_id_prof", "fk_salle_id_salle"]
    );
    assert_eq!(
        column_names(table(&tables, "seance")),
        vec!["id_seance", "fk_professeur_id_prof", "fk_salle_id_salle"]
    );
    assert!(table(&tables, "seance").foreign_keys().all(|c| !c.is_nullable));
    assert_eq!(column_names(table(&tables, "salle")), vec!["id_salle"]);
}

#[test]
fn carrying_attributes_on_one_to_many_give_junction_and_foreign_key() {
    let mut model = ConceptualModel::new();
    let client = entity(&mut model, "Client", &["id_client"]);
    let commande = entity(&mut model, "Commande", &["id_commande"]);
    let passer = model
        .add_association(
            Association::new("Passer")
                .with_attribute(Attribute::new("date_passage", DataType::Date))
                .unwrap(),
        )
        .unwrap();
    model.connect(&client, &passer, Zero, Many).unwrap();
    model.connect(&commande, &passer, One, MaxOne).unwrap();

    let tables = transform(&model);
    assert_eq!(tables.len(), 3);
    assert_eq!(
        column_names(table(&tables, "passer")),
        vec!["fk_client_id_client", "fk_commande_id_commande", "date_passage"]
    );
    assert_eq!(
        column_names(table(&tables, "commande")),
        vec!["id_commande", "fk_client_id_client"]
    );
    assert_eq!(column_names(table(&tables, "client")), vec!["id_client"]);
}

#[test]
fn foreign_key_added_once_across_associations() {
    let (mut model, _) = client_commande();
    let client = model.entity_by_name("Client").unwrap().id().clone();
    let commande = model.entity_by_name("Commande").unwrap().id().clone();
    let regler = model.add_association(Association::new("Regler")).unwrap();
    model.connect(&client, &regler, One, Many).unwrap();
    model.connect(&commande, &regler, Zero, MaxOne).unwrap();

    let tables = transform(&model);
    let commande = table(&tables, "commande");
    assert_eq!(column_names(commande), vec!["id_commande", "fk_client_id_client"]);
    // First discovered link decides nullability
    assert!(!commande.column("fk_client_id_client").unwrap().is_nullable);
}

#[test]
fn transform_is_deterministic() {
    let mut model = ConceptualModel::new();
    let a = entity(&mut model, "A", &["id"]);
    let b = entity(&mut model, "B", &["id"]);
    let c = entity(&mut model, "C", &["id"]);
    let r1 = model.add_association(Association::new("R1")).unwrap();
    let r2 = model.add_association(Association::new("R2")).unwrap();
    model.connect(&a, &r1, Zero, Many).unwrap();
    model.connect(&b, &r1, One, Many).unwrap();
    model.connect(&c, &r2, One, MaxOne).unwrap();
    model.connect(&a, &r2, Zero, Many).unwrap();

    let first = transform(&model);
    let second = transform(&model);
    assert_eq!(first, second);

    let names: Vec<&str> = first.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", "r1"]);
    assert_eq!(column_names(&first[2]), vec!["id", "fk_a_id"]);
}

#[test]
fn removing_entity_updates_derivation() {
    let (mut model, passer) = client_commande();
    let client = model.entity_by_name("Client").unwrap().id().clone();
    model.remove_entity(&client);

    assert_eq!(model.links_for_association(&passer).count(), 1);
    let tables = transform(&model);
    assert_eq!(tables.len(), 1);
    assert_eq!(column_names(&tables[0]), vec!["id_commande"]);
}

#[test]
fn overrides_survive_retransformation() {
    let (mut model, _) = client_commande();
    let mut names = NameOverrideStore::new();
    names.set("commande", "fk_client_id_client", "client_ref");

    let before = generate_sql(&model, &names, SqlOptions::default());
    assert!(before.contains("client_ref"));

    let commande = model.entity_by_name("Commande").unwrap().id().clone();
    model
        .add_entity_attribute(&commande, Attribute::new("total", DataType::Decimal).with_size(12))
        .unwrap();

    let tables = transform(&model);
    assert_eq!(table(&tables, "commande").columns[2].name, "fk_client_id_client");
    assert!(names.stale_keys(&tables).is_empty());

    let after = generate_sql(&model, &names, SqlOptions::default());
    assert!(after.contains("client_ref"));
    assert!(after.contains("DECIMAL(12)"));
}

#[test]
fn mld_report_lists_every_table() {
    let (model, _) = client_commande();
    let text = report::render(&transform(&model), &Identity);
    assert!(text.starts_with("CLIENT (entity)\n"));
    assert!(text.contains("COMMANDE (entity)\n"));
    assert!(text.ends_with("Tables: 2 | Columns: 3 | Primary Keys: 2 | Foreign Keys: 1\n"));
}

#[test]
fn project_file_round_trip() {
    let (model, _) = client_commande();
    let mut project = Project::new();
    project.metadata.name = "Ventes".to_string();
    project.model = model;
    project.overrides.set("client", "id_client", "id");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ventes.json");
    project.save(&path).unwrap();

    let loaded = Project::load(&path).unwrap();
    assert_eq!(loaded, project);
    assert_eq!(transform(&loaded.model), transform(&project.model));
}

#[test]
fn failed_reload_keeps_current_state() {
    let (model, _) = client_commande();
    let mut project = Project::new();
    project.model = model;

    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ \"mcd\": ").unwrap();

    assert!(project.reload(&broken).is_err());
    assert!(project.reload(dir.path().join("missing.json")).is_err());
    assert_eq!(project.model.entity_count(), 2);
}
