//! Type — a named node in the multiple-inheritance graph.
//!
//! A `Type` owns its direct state (naming, direct base edges in registration
//! order, own attributes in declaration order) plus two eagerly-maintained
//! caches: the transitive base-type closure and the full inherited-attribute
//! list. The caches trade write cost for O(1)/O(n) reads; every mutation in
//! [`Model`](crate::Model) keeps them consistent across the affected subtree
//! before returning.
//!
//! All accessors return read-only views; the graph can only be mutated
//! through `Model` operations.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::id::{AttributeId, TypeId};

/// A uniquely-named type carrying attributes that propagate to subtypes.
#[derive(Debug, Clone)]
pub struct Type {
    id: TypeId,
    group: String,
    name: String,
    description: String,
    qualified_name: String,
    /// Direct base types, in registration order.
    pub(crate) base_types: Vec<TypeId>,
    /// Cached transitive closure of `base_types`.
    pub(crate) all_base_types: HashSet<TypeId>,
    /// Direct subtypes (back-references, not ownership).
    pub(crate) subtypes: BTreeSet<TypeId>,
    /// Attributes defined directly on this type, in declaration order.
    pub(crate) attributes: Vec<AttributeId>,
    /// Own attributes first, then inherited ones. Cached.
    pub(crate) all_attributes: Vec<AttributeId>,
}

impl Type {
    pub(crate) fn new(id: TypeId) -> Self {
        Self {
            id,
            group: String::new(),
            name: String::new(),
            description: String::new(),
            qualified_name: Self::qualify("", ""),
            base_types: Vec::new(),
            all_base_types: HashSet::new(),
            subtypes: BTreeSet::new(),
            attributes: Vec::new(),
            all_attributes: Vec::new(),
        }
    }

    /// Compose the qualified name from a group and a name.
    pub(crate) fn qualify(group: &str, name: &str) -> String {
        format!("{group}:{name}")
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// `group:name`, unique across the whole model.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = description;
    }

    pub(crate) fn set_qualified(&mut self, group: String, name: String) {
        self.qualified_name = Self::qualify(&group, &name);
        self.group = group;
        self.name = name;
    }

    /// Direct base types, in the order the derivations were registered.
    pub fn base_types(&self) -> &[TypeId] {
        &self.base_types
    }

    /// Every type this one transitively derives from.
    pub fn all_base_types(&self) -> &HashSet<TypeId> {
        &self.all_base_types
    }

    /// Direct subtypes of this type.
    pub fn subtypes(&self) -> &BTreeSet<TypeId> {
        &self.subtypes
    }

    /// Attributes defined directly on this type, in declaration order.
    pub fn attributes(&self) -> &[AttributeId] {
        &self.attributes
    }

    /// Own attributes first, then attributes inherited from base types.
    pub fn all_attributes(&self) -> &[AttributeId] {
        &self.all_attributes
    }

    /// O(1) membership test against the cached closure.
    pub fn is_derived_from(&self, other: TypeId) -> bool {
        self.all_base_types.contains(&other)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_type_has_placeholder_qualified_name() {
        let ty = Type::new(TypeId::from(1));
        assert_eq!(ty.qualified_name(), ":");
        assert_eq!(ty.group(), "");
        assert_eq!(ty.name(), "");
        assert!(ty.base_types().is_empty());
        assert!(ty.all_attributes().is_empty());
    }

    #[test]
    fn qualified_name_tracks_group_and_name() {
        let mut ty = Type::new(TypeId::from(1));
        ty.set_qualified("core".into(), "Party".into());
        assert_eq!(ty.qualified_name(), "core:Party");
        assert_eq!(ty.to_string(), "core:Party");
    }

    #[test]
    fn derivation_check_uses_the_closure() {
        let mut ty = Type::new(TypeId::from(2));
        ty.all_base_types.insert(TypeId::from(1));
        assert!(ty.is_derived_from(TypeId::from(1)));
        assert!(!ty.is_derived_from(TypeId::from(3)));
    }
}
