//! Property tests for discovery semantics.
//!
//! For any generated assembly and criteria set, a contributor yields
//! exactly the exported types satisfying every criterion, where the
//! base-type criterion is itself a disjunction over its targets.

use automodel_discovery::DiscoveryContributor;
use automodel_types::{Assembly, TypeCatalog, TypeDescriptor};
use proptest::prelude::*;

const BASES: [&str; 3] = ["Gen.BaseA", "Gen.BaseB", "Gen.BaseC"];
const NAMESPACES: [&str; 2] = ["Gen.Left", "Gen.Right"];

#[derive(Debug, Clone)]
struct GenType {
    base: Option<usize>,
    is_abstract: bool,
    exported: bool,
    namespace: usize,
}

fn gen_type() -> impl Strategy<Value = GenType> {
    (
        prop::option::of(0usize..BASES.len()),
        any::<bool>(),
        prop::bool::weighted(0.8),
        0usize..NAMESPACES.len(),
    )
        .prop_map(|(base, is_abstract, exported, namespace)| GenType {
            base,
            is_abstract,
            exported,
            namespace,
        })
}

fn build(types: &[GenType]) -> TypeCatalog {
    let mut catalog = TypeCatalog::new();
    let mut bases = Assembly::new("Gen.Bases");
    for base in BASES {
        bases = bases.with_type(TypeDescriptor::class(base).as_abstract());
    }
    catalog.register(bases).unwrap();

    let mut assembly = Assembly::new("Gen.Types");
    for (i, t) in types.iter().enumerate() {
        let mut descriptor = TypeDescriptor::class(format!("{}.T{i}", NAMESPACES[t.namespace]));
        if let Some(b) = t.base {
            descriptor = descriptor.with_base(BASES[b]);
        }
        if t.is_abstract {
            descriptor = descriptor.as_abstract();
        }
        if !t.exported {
            descriptor = descriptor.internal();
        }
        assembly = assembly.with_type(descriptor);
    }
    catalog.register(assembly).unwrap();
    catalog
}

proptest! {
    #[test]
    fn contributor_returns_exactly_the_satisfying_subset(
        types in prop::collection::vec(gen_type(), 0..24),
        targets in prop::collection::btree_set(0usize..BASES.len(), 1..=BASES.len()),
        namespace in prop::option::of(0usize..NAMESPACES.len()),
    ) {
        let catalog = build(&types);
        let mut contributor = DiscoveryContributor::new();
        contributor.add_assembly(catalog.assembly("Gen.Types").unwrap());
        for &t in &targets {
            contributor.base_type(BASES[t]).unwrap();
        }
        if let Some(ns) = namespace {
            contributor.in_namespace(NAMESPACES[ns]);
        }

        let actual: Vec<String> = contributor
            .get_types(&catalog)
            .map(|t| t.key.to_string())
            .collect();

        let expected: Vec<String> = types
            .iter()
            .enumerate()
            .filter(|(_, t)| t.exported && !t.is_abstract)
            .filter(|(_, t)| t.base.is_some_and(|b| targets.contains(&b)))
            .filter(|(_, t)| namespace.is_none_or(|ns| ns == t.namespace))
            .map(|(i, t)| format!("{}.T{i}", NAMESPACES[t.namespace]))
            .collect();

        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn adding_a_target_never_shrinks_results(
        types in prop::collection::vec(gen_type(), 0..24),
        first in 0usize..BASES.len(),
        second in 0usize..BASES.len(),
    ) {
        let catalog = build(&types);
        let assembly = catalog.assembly("Gen.Types").unwrap();

        let mut narrow = DiscoveryContributor::new();
        narrow.add_assembly(assembly.clone()).base_type(BASES[first]).unwrap();
        let mut wide = DiscoveryContributor::new();
        wide.add_assembly(assembly)
            .base_type(BASES[first])
            .unwrap()
            .base_type(BASES[second])
            .unwrap();

        let narrow_keys: Vec<_> = narrow.get_types(&catalog).map(|t| &t.key).collect();
        let wide_keys: Vec<_> = wide.get_types(&catalog).map(|t| &t.key).collect();
        prop_assert!(narrow_keys.iter().all(|k| wide_keys.contains(k)));
    }
}
