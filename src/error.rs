//! Error types for the meta model core.
//!
//! Every error is a caller-input error reported synchronously; nothing here
//! is retried or recovered automatically.

use thiserror::Error;

use crate::id::{AttributeId, TypeId};

/// Errors raised by [`Model`](crate::Model) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A rename would collide with another type's qualified name.
    /// The renamed type is left untouched.
    #[error("type '{qualified_name}' already exists")]
    DuplicateName { qualified_name: String },

    /// `derive_from` would create a derivation cycle. No edge is added.
    #[error("circular derivation: {parent} -> {child}")]
    CircularDerivation { child: String, parent: String },

    /// `underive_from` on a relationship that is only transitive.
    /// Only direct edges may be removed.
    #[error("{child} is not directly derived from {parent}")]
    NotDirectBase { child: String, parent: String },

    /// The given id does not name a live type in this model.
    #[error("unknown type id {id}")]
    UnknownType { id: TypeId },

    /// The given id does not name a live attribute in this model.
    /// Disposed attributes fall under this: disposal is terminal and their
    /// ids are never reused.
    #[error("unknown attribute id {id}")]
    UnknownAttribute { id: AttributeId },
}

/// Result alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
