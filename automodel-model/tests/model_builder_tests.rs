use automodel_model::{
    ConventionSet, EntityTypeBuilder, EntityTypeHandle, HostError, HostModelBuilder, ModelBuilder,
};
use automodel_types::TypeKey;
use pretty_assertions::assert_eq;

fn key(s: &str) -> TypeKey {
    TypeKey::new(s)
}

// ── Registration ─────────────────────────────────────────────────

#[test]
fn register_is_idempotent() {
    let mut builder = ModelBuilder::default();
    builder.register_entity(&key("Shop.Order")).unwrap();
    builder.register_entity(&key("Shop.Order")).unwrap();
    assert_eq!(builder.entity_count(), 1);
    assert!(builder.is_registered(&key("Shop.Order")));
}

#[test]
fn registration_order_is_kept() {
    let mut builder = ModelBuilder::default();
    for name in ["Shop.Order", "Shop.Customer", "Shop.Invoice"] {
        builder.register_entity(&key(name)).unwrap();
    }
    let order: Vec<&str> = builder.entity_types().map(TypeKey::as_str).collect();
    assert_eq!(order, vec!["Shop.Order", "Shop.Customer", "Shop.Invoice"]);
}

#[test]
fn entity_creates_missing_registration() {
    let mut builder = ModelBuilder::default();
    let handle = builder.entity(&key("Shop.Order")).unwrap();
    assert_eq!(handle.entity_type(), &key("Shop.Order"));
    assert_eq!(builder.entity_count(), 1);
}

#[test]
fn ignored_type_is_rejected() {
    let mut builder = ModelBuilder::default();
    builder.ignore(&key("Shop.Audit"));
    let err = builder.register_entity(&key("Shop.Audit")).unwrap_err();
    assert_eq!(err, HostError::Ignored(key("Shop.Audit")));
    assert!(builder.entity(&key("Shop.Audit")).is_err());
    assert_eq!(builder.entity_count(), 0);
}

#[test]
fn ignore_drops_existing_registration() {
    let mut builder = ModelBuilder::default();
    builder.register_entity(&key("Shop.Order")).unwrap();
    builder.register_entity(&key("Shop.Audit")).unwrap();
    builder.register_entity(&key("Shop.Customer")).unwrap();
    builder.ignore(&key("Shop.Audit"));

    assert_eq!(builder.entity_count(), 2);
    assert!(builder.entity_builder(&key("Shop.Customer")).is_some());
    assert!(!builder.is_registered(&key("Shop.Audit")));
}

#[test]
fn open_generic_definition_is_rejected() {
    let mut builder = ModelBuilder::default();
    let err = builder.register_entity(&key("Shop.Repository`1")).unwrap_err();
    assert!(matches!(err, HostError::Rejected { .. }));
}

// ── Conventions ──────────────────────────────────────────────────

#[test]
fn default_conventions_use_type_name_and_id_key() {
    let mut builder = ModelBuilder::default();
    builder.register_entity(&key("Shop.Order")).unwrap();
    let entity = builder.entity_builder(&key("Shop.Order")).unwrap();
    assert_eq!(entity.table.as_deref(), Some("Order"));
    assert_eq!(entity.keys, vec!["Id".to_string()]);
    assert_eq!(entity.schema, None);
}

#[test]
fn conventions_apply_prefix_plural_and_schema() {
    let conventions = ConventionSet {
        table_prefix: Some("tbl_".to_string()),
        pluralize_table_names: true,
        default_schema: Some("sales".to_string()),
        key_property: None,
    };
    let mut builder = ModelBuilder::new(conventions);
    builder.register_entity(&key("Shop.Category")).unwrap();
    let entity = builder.entity_builder(&key("Shop.Category")).unwrap();
    assert_eq!(entity.table.as_deref(), Some("tbl_Categories"));
    assert_eq!(entity.schema.as_deref(), Some("sales"));
    assert!(entity.keys.is_empty());
}

#[test]
fn closed_generic_table_name_drops_arity() {
    let conventions = ConventionSet::default();
    assert_eq!(conventions.table_name_for(&key("Shop.Envelope`1[Shop.Order]")), "Envelope");
}

// ── Handles ──────────────────────────────────────────────────────

#[test]
fn handle_downcasts_to_entity_type_builder() {
    let mut builder = ModelBuilder::default();
    let handle = builder.entity(&key("Shop.Order")).unwrap();
    let typed = handle
        .as_any_mut()
        .downcast_mut::<EntityTypeBuilder>()
        .expect("reference host hands out EntityTypeBuilder");
    typed.to_table("orders").property("Number").is_required();

    let entity = builder.entity_builder(&key("Shop.Order")).unwrap();
    assert_eq!(entity.table.as_deref(), Some("orders"));
    assert!(entity.find_property("Number").unwrap().required);
}

#[test]
fn handle_name_reports_concrete_type() {
    let entity = EntityTypeBuilder::new(key("Shop.Order"));
    assert!(entity.handle_name().ends_with("EntityTypeBuilder"));
}

#[test]
fn finish_produces_serializable_model() {
    let mut builder = ModelBuilder::default();
    builder.register_entity(&key("Shop.Order")).unwrap();
    let model = builder.finish();
    assert_eq!(model.len(), 1);
    let json = serde_json::to_value(&model).unwrap();
    assert_eq!(json["entities"][0]["entity_type"], "Shop.Order");
    assert_eq!(json["entities"][0]["table"], "Order");
}
