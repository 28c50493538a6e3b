//! Identifier newtypes for model entities.
//!
//! Ids are issued by the owning [`Model`](crate::Model) from a single
//! monotonically increasing counter, so a `TypeId` and an `AttributeId` never
//! share a raw value within one model. They are plain `u64`s underneath:
//! cheap to copy, hashable, and stable for the life of the model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier of a type within a [`Model`](crate::Model).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TypeId(u64);

impl TypeId {
    /// Get the raw counter value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for TypeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<TypeId> for u64 {
    fn from(id: TypeId) -> Self {
        id.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier of an attribute within a [`Model`](crate::Model).
///
/// Stays valid until the attribute is disposed; disposal is terminal and the
/// id is never reissued.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AttributeId(u64);

impl AttributeId {
    /// Get the raw counter value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for AttributeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<AttributeId> for u64 {
    fn from(id: AttributeId) -> Self {
        id.0
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
