use automodel_model::{
    ContextInfo, ConventionSet, DbContext, DefaultModelCustomizer, HostError, HostModelBuilder,
    ModelBuilder, ModelCustomizer, build_model, discover_entity_sets,
};
use automodel_types::TypeKey;
use std::cell::RefCell;

fn key(s: &str) -> TypeKey {
    TypeKey::new(s)
}

fn shop_context() -> ContextInfo {
    ContextInfo::new("Shop.ShopContext")
        .with_entity_set("Shop.Order")
        .with_entity_set("Shop.Customer")
}

#[test]
fn context_info_reports_type_and_sets() {
    let context = shop_context();
    assert_eq!(context.context_type(), key("Shop.ShopContext"));
    assert_eq!(context.entity_sets(), vec![key("Shop.Order"), key("Shop.Customer")]);
}

#[test]
fn discover_entity_sets_registers_declared_sets() {
    let mut builder = ModelBuilder::default();
    let visited = discover_entity_sets(&shop_context(), &mut builder).unwrap();
    assert_eq!(visited, 2);
    assert_eq!(builder.entity_count(), 2);
}

#[test]
fn discover_entity_sets_propagates_host_rejection() {
    let mut builder = ModelBuilder::default();
    builder.ignore(&key("Shop.Customer"));
    let err = discover_entity_sets(&shop_context(), &mut builder).unwrap_err();
    assert_eq!(err, HostError::Ignored(key("Shop.Customer")));
}

#[test]
fn build_model_with_default_customizer() {
    let model = build_model(&shop_context(), &DefaultModelCustomizer, ConventionSet::default()).unwrap();
    assert_eq!(model.entity_types(), vec![&key("Shop.Order"), &key("Shop.Customer")]);
}

struct RecordingCustomizer {
    calls: RefCell<Vec<&'static str>>,
}

impl ModelCustomizer for RecordingCustomizer {
    type Error = HostError;

    fn modify_conventions(&self, conventions: &mut ConventionSet) -> Result<(), HostError> {
        self.calls.borrow_mut().push("conventions");
        conventions.pluralize_table_names = true;
        Ok(())
    }

    fn customize(
        &self,
        context: &dyn DbContext,
        builder: &mut dyn HostModelBuilder,
    ) -> Result<(), HostError> {
        self.calls.borrow_mut().push("customize");
        discover_entity_sets(context, builder)?;
        builder.register_entity(&key("Shop.Invoice"))
    }
}

#[test]
fn build_model_runs_conventions_before_customize() {
    let customizer = RecordingCustomizer {
        calls: RefCell::new(Vec::new()),
    };
    let model = build_model(&shop_context(), &customizer, ConventionSet::default()).unwrap();

    assert_eq!(*customizer.calls.borrow(), vec!["conventions", "customize"]);
    assert_eq!(model.len(), 3);
    assert_eq!(model.find(&key("Shop.Order")).unwrap().table.as_deref(), Some("Orders"));
}
