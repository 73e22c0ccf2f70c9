//! Predicates over type descriptors.
//!
//! A contributor combines its criteria with AND. [`BaseTypeCriterion`] is
//! the one criterion with an internal OR: it holds several targets and is
//! satisfied when any of them matches.

use automodel_types::{TypeCatalog, TypeDescriptor, TypeKey};
use std::any::Any;
use std::fmt;

/// A single discovery predicate.
///
/// The catalog is passed alongside the descriptor so criteria can follow
/// base types and interfaces across assemblies.
pub trait Criterion: Any + Send + Sync {
    fn is_satisfied_by(&self, ty: &TypeDescriptor, catalog: &TypeCatalog) -> bool;
}

/// Satisfied when the type is assignable to any held target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseTypeCriterion {
    targets: Vec<TypeKey>,
}

impl BaseTypeCriterion {
    pub fn new(target: impl Into<TypeKey>) -> Self {
        Self {
            targets: vec![target.into()],
        }
    }

    /// Adds another accepted target. Duplicates are ignored.
    pub fn add_target(&mut self, target: impl Into<TypeKey>) -> &mut Self {
        let target = target.into();
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }
        self
    }

    pub fn targets(&self) -> &[TypeKey] {
        &self.targets
    }
}

impl Criterion for BaseTypeCriterion {
    fn is_satisfied_by(&self, ty: &TypeDescriptor, catalog: &TypeCatalog) -> bool {
        self.targets
            .iter()
            .any(|target| catalog.is_assignable_to(&ty.key, target))
    }
}

/// Satisfied by concrete (non-abstract, non-interface) types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConcreteTypeCriterion;

impl Criterion for ConcreteTypeCriterion {
    fn is_satisfied_by(&self, ty: &TypeDescriptor, _catalog: &TypeCatalog) -> bool {
        !ty.is_abstract()
    }
}

type NamespacePredicate = dyn Fn(Option<&str>) -> bool + Send + Sync;

/// Satisfied when a predicate over the type's namespace holds.
pub struct NamespaceCriterion {
    predicate: Box<NamespacePredicate>,
}

impl NamespaceCriterion {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(Option<&str>) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
        }
    }

    /// Types declared directly in `namespace`.
    pub fn equals(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self::new(move |ns| ns == Some(namespace.as_str()))
    }

    /// Types in `namespace` or any namespace nested below it.
    pub fn within(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self::new(move |ns| {
            ns.is_some_and(|ns| {
                ns == namespace
                    || ns
                        .strip_prefix(namespace.as_str())
                        .is_some_and(|rest| rest.starts_with('.'))
            })
        })
    }
}

impl Criterion for NamespaceCriterion {
    fn is_satisfied_by(&self, ty: &TypeDescriptor, _catalog: &TypeCatalog) -> bool {
        (self.predicate)(ty.namespace())
    }
}

impl fmt::Debug for NamespaceCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespaceCriterion").finish_non_exhaustive()
    }
}

type TypePredicate = dyn Fn(&TypeDescriptor) -> bool + Send + Sync;

/// Satisfied when an arbitrary predicate over the descriptor holds.
pub struct ExpressionCriterion {
    predicate: Box<TypePredicate>,
}

impl ExpressionCriterion {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&TypeDescriptor) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
        }
    }
}

impl Criterion for ExpressionCriterion {
    fn is_satisfied_by(&self, ty: &TypeDescriptor, _catalog: &TypeCatalog) -> bool {
        (self.predicate)(ty)
    }
}

impl fmt::Debug for ExpressionCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressionCriterion").finish_non_exhaustive()
    }
}

/// True when `ty` satisfies every criterion. An empty set accepts all.
pub fn satisfies_all(
    criteria: &[Box<dyn Criterion>],
    ty: &TypeDescriptor,
    catalog: &TypeCatalog,
) -> bool {
    criteria.iter().all(|c| c.is_satisfied_by(ty, catalog))
}

pub(crate) fn is_kind<C: Criterion>(criterion: &dyn Criterion) -> bool {
    let any: &dyn Any = criterion;
    any.is::<C>()
}

pub(crate) fn downcast_mut<C: Criterion>(criterion: &mut dyn Criterion) -> Option<&mut C> {
    let any: &mut dyn Any = criterion;
    any.downcast_mut::<C>()
}
