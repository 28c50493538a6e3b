//! Meta model core — types organized by multiple inheritance, each carrying
//! attributes that propagate down the derivation graph.
//!
//! The [`Model`] is the registry: it owns every [`Type`] and [`Attribute`],
//! issues unique ids, and enforces qualified-name (`group:name`) uniqueness.
//! Types derive from any number of base types; the base-type relation is
//! kept acyclic, and both the transitive base-type closure and the
//! inherited-attribute list are maintained eagerly so that membership tests
//! and attribute reads are cheap.
//!
//! The model is single-writer: mutations perform multi-step cache updates
//! across a subtree and must not interleave. Callers serialize access (or
//! wrap the model in a lock); only id allocation is concurrency-safe on its
//! own.
//!
//! ```
//! use meta_core::Model;
//!
//! let mut model = Model::new();
//! let account = model.create_type();
//! model.set_name(account, "Account")?;
//! let savings = model.create_type();
//! model.set_name(savings, "Savings")?;
//! model.derive_from(savings, account)?;
//!
//! let balance = model.add_attribute(account)?;
//! model.set_attribute_name(balance, "balance")?;
//! assert!(model.get_type(savings)?.all_attributes().contains(&balance));
//! # Ok::<(), meta_core::ModelError>(())
//! ```

pub mod attribute;
pub mod domain;
pub mod error;
pub mod id;
pub mod model;
pub mod ty;

pub use attribute::Attribute;
pub use domain::{Constraints, DataType, Domain};
pub use error::{ModelError, Result};
pub use id::{AttributeId, TypeId};
pub use model::Model;
pub use ty::Type;
