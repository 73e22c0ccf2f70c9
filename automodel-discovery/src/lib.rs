//! Entity type discovery for automodel.
//!
//! A [`DiscoveryContributor`] scans a set of catalog assemblies and keeps
//! the exported types that satisfy all of its [`Criterion`]s. Contributors
//! and [`ExplicitTypeSource`]s both implement [`TypeSource`], the seam the
//! auto model builder enumerates.
//!
//! ```
//! use automodel_discovery::DiscoveryContributor;
//! use automodel_types::{Assembly, TypeCatalog, TypeDescriptor};
//!
//! let mut catalog = TypeCatalog::new();
//! let domain = catalog
//!     .register(
//!         Assembly::new("Shop.Domain")
//!             .with_type(TypeDescriptor::class("Shop.Entity").as_abstract())
//!             .with_type(TypeDescriptor::class("Shop.Order").with_base("Shop.Entity")),
//!     )
//!     .unwrap();
//!
//! let mut entities = DiscoveryContributor::new();
//! entities.add_assembly(domain).base_type("Shop.Entity").unwrap();
//!
//! let found: Vec<&str> = entities.get_types(&catalog).map(|t| t.key.as_str()).collect();
//! assert_eq!(found, vec!["Shop.Order"]);
//! ```

mod contributor;
mod criteria;

pub use contributor::{DiscoveryContributor, ExplicitTypeSource, TypeSource};
pub use criteria::{
    BaseTypeCriterion, ConcreteTypeCriterion, Criterion, ExpressionCriterion, NamespaceCriterion,
    satisfies_all,
};
