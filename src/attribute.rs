//! Attribute — a named field owned by exactly one type.
//!
//! Attributes are created through [`Model::add_attribute`](crate::Model::add_attribute)
//! and live until disposed. The attribute name carries no uniqueness
//! constraint (unlike type names). The optional [`Domain`] is stored and
//! exposed unchanged; this core never interprets it.

use std::fmt;

use crate::domain::Domain;
use crate::id::{AttributeId, TypeId};

/// A named field on a type, inherited by every transitive subtype.
#[derive(Debug, Clone)]
pub struct Attribute {
    id: AttributeId,
    name: String,
    owner: TypeId,
    domain: Option<Domain>,
}

impl Attribute {
    pub(crate) fn new(id: AttributeId, owner: TypeId) -> Self {
        Self {
            id,
            name: String::new(),
            owner,
            domain: None,
        }
    }

    pub fn id(&self) -> AttributeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type this attribute is defined on.
    pub fn owner(&self) -> TypeId {
        self.owner
    }

    pub fn domain(&self) -> Option<&Domain> {
        self.domain.as_ref()
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_domain(&mut self, domain: Domain) {
        self.domain = Some(domain);
    }
}

impl fmt::Display for Attribute {
    /// Formats as `owner-id@name`, e.g. `3@balance`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.owner, self.name)
    }
}
