//! Model — the registry owning every type and attribute.
//!
//! The model is an arena: types and attributes live in id-keyed maps and all
//! relations between them are stored as id sets, so the cyclic
//! base-type/subtype back-references never become ownership cycles. All graph
//! mutation goes through `Model` methods; read accessors on [`Type`] and
//! [`Attribute`] return views that cannot mutate the graph.
//!
//! Mutations are multi-step (edge change, closure update, attribute
//! recollection across a subtree) and are not atomic with respect to
//! concurrent access — the model is single-writer by design. The one
//! exception is id allocation, which stays safe under concurrent callers.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::attribute::Attribute;
use crate::domain::Domain;
use crate::error::{ModelError, Result};
use crate::id::{AttributeId, TypeId};
use crate::ty::Type;

const LOG_TARGET: &str = "meta.model";

/// Registry of all types and attributes, and the single source of ids.
#[derive(Debug, Default)]
pub struct Model {
    id_seq: AtomicU64,
    types: HashMap<TypeId, Type>,
    types_by_name: HashMap<String, TypeId>,
    attributes: HashMap<AttributeId, Attribute>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh, strictly increasing id. Safe under concurrent
    /// callers even though graph mutation is not.
    fn next_id(&self) -> u64 {
        self.id_seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    // ── Lookup ────────────────────────────────────────────────────

    pub fn get_type(&self, id: TypeId) -> Result<&Type> {
        self.types.get(&id).ok_or(ModelError::UnknownType { id })
    }

    fn type_mut(&mut self, id: TypeId) -> Result<&mut Type> {
        self.types
            .get_mut(&id)
            .ok_or(ModelError::UnknownType { id })
    }

    pub fn get_attribute(&self, id: AttributeId) -> Result<&Attribute> {
        self.attributes
            .get(&id)
            .ok_or(ModelError::UnknownAttribute { id })
    }

    fn attribute_mut(&mut self, id: AttributeId) -> Result<&mut Attribute> {
        self.attributes
            .get_mut(&id)
            .ok_or(ModelError::UnknownAttribute { id })
    }

    /// Look up a type by its `group:name` qualified name.
    pub fn type_by_qualified_name(&self, qualified_name: &str) -> Option<&Type> {
        self.types_by_name
            .get(qualified_name)
            .and_then(|id| self.types.get(id))
    }

    /// All live types, in no particular order.
    pub fn types(&self) -> impl Iterator<Item = &Type> {
        self.types.values()
    }

    /// All live (non-disposed) attributes, in no particular order.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    // ── Type creation and naming ──────────────────────────────────

    /// Create a fresh type with empty group and name (qualified name `":"`).
    ///
    /// The placeholder name is entered into the name index only while no
    /// other type holds it; uniqueness is enforced from the first rename on.
    pub fn create_type(&mut self) -> TypeId {
        let id = TypeId::from(self.next_id());
        let ty = Type::new(id);
        self.types_by_name
            .entry(ty.qualified_name().to_string())
            .or_insert(id);
        self.types.insert(id, ty);
        tracing::debug!(target: LOG_TARGET, id = %id, "type created");
        id
    }

    /// Set the group part of the qualified name.
    ///
    /// Fails with [`ModelError::DuplicateName`] if `group:name` is already
    /// taken by a different type; the type is left untouched on failure.
    pub fn set_group(&mut self, id: TypeId, group: impl Into<String>) -> Result<()> {
        let name = self.get_type(id)?.name().to_string();
        self.rename(id, group.into(), name)
    }

    /// Set the name part of the qualified name.
    ///
    /// Same collision contract as [`Model::set_group`].
    pub fn set_name(&mut self, id: TypeId, name: impl Into<String>) -> Result<()> {
        let group = self.get_type(id)?.group().to_string();
        self.rename(id, group, name.into())
    }

    /// Unconditional description update; no uniqueness involved.
    pub fn set_description(&mut self, id: TypeId, description: impl Into<String>) -> Result<()> {
        self.type_mut(id)?.set_description(description.into());
        Ok(())
    }

    /// Validate-then-commit rename keeping the name index in exact sync.
    fn rename(&mut self, id: TypeId, group: String, name: String) -> Result<()> {
        let qualified = Type::qualify(&group, &name);
        if let Some(&other) = self.types_by_name.get(&qualified) {
            if other != id {
                return Err(ModelError::DuplicateName {
                    qualified_name: qualified,
                });
            }
        }
        let ty = self.type_mut(id)?;
        let old = ty.qualified_name().to_string();
        ty.set_qualified(group, name);
        // The old mapping may belong to another still-unnamed type.
        if self.types_by_name.get(&old).copied() == Some(id) {
            self.types_by_name.remove(&old);
        }
        self.types_by_name.insert(qualified, id);
        Ok(())
    }

    // ── Derivation ────────────────────────────────────────────────

    /// Make `child` derive directly from `parent`.
    ///
    /// Fails with [`ModelError::CircularDerivation`] if the edge would close
    /// a cycle (including `child == parent`); a no-op if `child` already
    /// derives from `parent`, directly or transitively. On success the
    /// base-type closure and inherited attributes of `child` and of every
    /// transitive subtype of `child` are brought up to date before returning.
    pub fn derive_from(&mut self, child: TypeId, parent: TypeId) -> Result<()> {
        let parent_ty = self.get_type(parent)?;
        let parent_qname = parent_ty.qualified_name().to_string();
        let closes_cycle = child == parent || parent_ty.is_derived_from(child);
        let mut gained: HashSet<TypeId> = parent_ty.all_base_types().clone();
        gained.insert(parent);

        let child_ty = self.get_type(child)?;
        if closes_cycle {
            return Err(ModelError::CircularDerivation {
                child: child_ty.qualified_name().to_string(),
                parent: parent_qname,
            });
        }
        if child_ty.is_derived_from(parent) {
            return Ok(());
        }

        self.type_mut(parent)?.subtypes.insert(child);
        {
            let ty = self.type_mut(child)?;
            ty.base_types.push(parent);
            ty.all_base_types.extend(gained.iter().copied());
        }
        self.recollect_attributes(child);

        // The new ancestor set now also applies to the whole subtree below
        // `child`, except where a subtype already reached `parent` by
        // another path (its closure then already contains `gained`).
        for sub in self.transitive_subtypes(child) {
            let already = self
                .types
                .get(&sub)
                .map(|t| t.is_derived_from(parent))
                .unwrap_or(true);
            if already {
                continue;
            }
            if let Some(ty) = self.types.get_mut(&sub) {
                ty.all_base_types.extend(gained.iter().copied());
            }
            self.recollect_attributes(sub);
        }

        tracing::debug!(target: LOG_TARGET, child = %child, parent = %parent, "derivation added");
        Ok(())
    }

    /// Remove the direct derivation edge from `child` to `parent`.
    ///
    /// A no-op if `child` does not derive from `parent` at all; fails with
    /// [`ModelError::NotDirectBase`] if the relationship is only transitive.
    /// On success the closure of `child` and of every transitive subtype is
    /// fully recomputed — an ancestor lost on one path may survive through
    /// another direct base.
    pub fn underive_from(&mut self, child: TypeId, parent: TypeId) -> Result<()> {
        let parent_qname = self.get_type(parent)?.qualified_name().to_string();
        let child_ty = self.get_type(child)?;
        if !child_ty.is_derived_from(parent) {
            return Ok(());
        }
        if !child_ty.base_types.contains(&parent) {
            return Err(ModelError::NotDirectBase {
                child: child_ty.qualified_name().to_string(),
                parent: parent_qname,
            });
        }

        self.type_mut(child)?.base_types.retain(|b| *b != parent);
        self.type_mut(parent)?.subtypes.remove(&child);
        self.recollect_base_types(child);
        self.recollect_attributes(child);

        // Subtree members must be recomputed parents-first: a subtype's
        // closure is rebuilt from its direct bases' closures, so any base
        // inside the subtree has to be up to date already.
        for sub in self.subtree_in_derivation_order(child) {
            self.recollect_base_types(sub);
            self.recollect_attributes(sub);
        }

        tracing::debug!(target: LOG_TARGET, child = %child, parent = %parent, "derivation removed");
        Ok(())
    }

    // ── Attributes ────────────────────────────────────────────────

    /// Define a new attribute on `owner` and propagate it to every
    /// transitive subtype's inherited-attribute list.
    pub fn add_attribute(&mut self, owner: TypeId) -> Result<AttributeId> {
        self.get_type(owner)?;
        let id = AttributeId::from(self.next_id());
        self.attributes.insert(id, Attribute::new(id, owner));
        {
            let ty = self.type_mut(owner)?;
            ty.attributes.push(id);
            ty.all_attributes.push(id);
        }
        for sub in self.transitive_subtypes(owner) {
            if let Some(ty) = self.types.get_mut(&sub) {
                ty.all_attributes.push(id);
            }
        }
        tracing::debug!(target: LOG_TARGET, attribute = %id, owner = %owner, "attribute added");
        Ok(id)
    }

    /// Rename an attribute. Attribute names carry no uniqueness constraint.
    pub fn set_attribute_name(&mut self, id: AttributeId, name: impl Into<String>) -> Result<()> {
        self.attribute_mut(id)?.set_name(name.into());
        Ok(())
    }

    /// Attach domain metadata to an attribute. Stored verbatim, never
    /// interpreted by this core.
    pub fn set_attribute_domain(&mut self, id: AttributeId, domain: Domain) -> Result<()> {
        self.attribute_mut(id)?.set_domain(domain);
        Ok(())
    }

    /// Dispose an attribute: remove it from its owner, from the inherited
    /// attributes of every transitive subtype, and from the registry.
    ///
    /// Terminal — the id becomes invalid and any later use of it yields
    /// [`ModelError::UnknownAttribute`].
    pub fn dispose_attribute(&mut self, id: AttributeId) -> Result<()> {
        let attr = self
            .attributes
            .remove(&id)
            .ok_or(ModelError::UnknownAttribute { id })?;
        let owner = attr.owner();
        if let Some(ty) = self.types.get_mut(&owner) {
            ty.attributes.retain(|a| *a != id);
            ty.all_attributes.retain(|a| *a != id);
        }
        for sub in self.transitive_subtypes(owner) {
            if let Some(ty) = self.types.get_mut(&sub) {
                ty.all_attributes.retain(|a| *a != id);
            }
        }
        tracing::debug!(target: LOG_TARGET, attribute = %id, owner = %owner, "attribute disposed");
        Ok(())
    }

    // ── Subtree traversal ─────────────────────────────────────────

    /// Visit every transitive subtype of `id` exactly once, even under
    /// diamond shapes.
    pub fn for_each_subtype<F>(&self, id: TypeId, mut f: F) -> Result<()>
    where
        F: FnMut(&Type),
    {
        self.get_type(id)?;
        for sub in self.transitive_subtypes(id) {
            if let Some(ty) = self.types.get(&sub) {
                f(ty);
            }
        }
        Ok(())
    }

    /// Transitive subtypes of `root` (excluding `root`), each exactly once.
    fn transitive_subtypes(&self, root: TypeId) -> Vec<TypeId> {
        let mut visited: HashSet<TypeId> = HashSet::new();
        let mut order: Vec<TypeId> = Vec::new();
        let mut stack: Vec<TypeId> = match self.types.get(&root) {
            Some(ty) => ty.subtypes.iter().copied().collect(),
            None => return order,
        };
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            order.push(id);
            if let Some(ty) = self.types.get(&id) {
                stack.extend(ty.subtypes.iter().copied());
            }
        }
        order
    }

    /// Transitive subtypes of `root` ordered so that every member comes
    /// after all of its direct bases that are themselves members. Used by
    /// closure recomputation, which reads direct bases' cached closures.
    fn subtree_in_derivation_order(&self, root: TypeId) -> Vec<TypeId> {
        let members = self.transitive_subtypes(root);
        let member_set: HashSet<TypeId> = members.iter().copied().collect();
        let mut indegree: HashMap<TypeId, usize> = HashMap::with_capacity(members.len());
        for &m in &members {
            let n = self
                .types
                .get(&m)
                .map(|t| t.base_types.iter().filter(|b| member_set.contains(*b)).count())
                .unwrap_or(0);
            indegree.insert(m, n);
        }
        let mut ready: Vec<TypeId> = members
            .iter()
            .copied()
            .filter(|m| indegree.get(m) == Some(&0))
            .collect();
        ready.sort_unstable();
        let mut order: Vec<TypeId> = Vec::with_capacity(members.len());
        let mut next = 0;
        while next < ready.len() {
            let id = ready[next];
            next += 1;
            order.push(id);
            if let Some(ty) = self.types.get(&id) {
                for &sub in &ty.subtypes {
                    if let Some(d) = indegree.get_mut(&sub) {
                        *d -= 1;
                        if *d == 0 {
                            ready.push(sub);
                        }
                    }
                }
            }
        }
        order
    }

    // ── Cache maintenance ─────────────────────────────────────────

    /// Rebuild `all_base_types` from the direct bases' cached closures.
    fn recollect_base_types(&mut self, id: TypeId) {
        let direct = match self.types.get(&id) {
            Some(ty) => ty.base_types.clone(),
            None => return,
        };
        let mut all: HashSet<TypeId> = HashSet::new();
        for base in &direct {
            all.insert(*base);
            if let Some(base_ty) = self.types.get(base) {
                all.extend(base_ty.all_base_types().iter().copied());
            }
        }
        if let Some(ty) = self.types.get_mut(&id) {
            ty.all_base_types = all;
        }
    }

    /// Rebuild `all_attributes`: own attributes in declaration order, then
    /// each base type's own attributes, bases visited depth-first in
    /// registration order, each base contributing exactly once.
    fn recollect_attributes(&mut self, id: TypeId) {
        let mut all: Vec<AttributeId> = Vec::new();
        let mut stack: Vec<TypeId> = match self.types.get(&id) {
            Some(ty) => {
                all.extend_from_slice(&ty.attributes);
                ty.base_types.iter().rev().copied().collect()
            }
            None => return,
        };
        let mut visited: HashSet<TypeId> = HashSet::new();
        while let Some(base) = stack.pop() {
            if !visited.insert(base) {
                continue;
            }
            if let Some(base_ty) = self.types.get(&base) {
                all.extend_from_slice(&base_ty.attributes);
                stack.extend(base_ty.base_types.iter().rev().copied());
            }
        }
        if let Some(ty) = self.types.get_mut(&id) {
            ty.all_attributes = all;
        }
    }
}
