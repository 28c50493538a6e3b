//! Meta model — foundational invariant tests.
//!
//! Six invariant tests documenting the non-negotiable properties of the
//! type-and-attribute graph:
//!
//! - INV-1: Name uniqueness — qualified names stay unique through any
//!   rename sequence; a colliding rename changes nothing
//! - INV-2: Acyclicity — no type ever appears in its own base-type closure
//! - INV-3: Closure correctness — the cached closure always equals a fresh
//!   transitive-closure computation over the direct edges
//! - INV-4: Attribute propagation — `all_attributes` is exactly own
//!   attributes plus the own attributes of every type in the closure
//! - INV-5: Disposal completeness — a disposed attribute is gone from its
//!   owner and from every transitive subtype
//! - INV-6: Idempotence — re-deriving an existing (even transitive)
//!   relationship observably changes nothing

use std::collections::HashSet;

use anyhow::Result;
use meta_core::{Model, ModelError, TypeId};

// ── Helpers ──────────────────────────────────────────────────────

/// Recompute a type's base-type closure from scratch off the direct edges.
fn fresh_closure(model: &Model, id: TypeId) -> HashSet<TypeId> {
    let mut seen: HashSet<TypeId> = HashSet::new();
    let mut stack: Vec<TypeId> = model.get_type(id).unwrap().base_types().to_vec();
    while let Some(t) = stack.pop() {
        if seen.insert(t) {
            stack.extend(model.get_type(t).unwrap().base_types().iter().copied());
        }
    }
    seen
}

fn assert_closure_fresh(model: &Model, id: TypeId) {
    assert_eq!(
        model.get_type(id).unwrap().all_base_types(),
        &fresh_closure(model, id),
        "cached closure diverged for type {id}"
    );
}

fn named_type(model: &mut Model, name: &str) -> Result<TypeId> {
    let id = model.create_type();
    model.set_name(id, name)?;
    Ok(id)
}

// ── INV-1: Name uniqueness ───────────────────────────────────────

#[test]
fn inv1_names_stay_unique_through_renames() -> Result<()> {
    let mut model = Model::new();
    let a = named_type(&mut model, "A")?;
    let b = named_type(&mut model, "B")?;
    let c = named_type(&mut model, "C")?;

    model.set_group(a, "g")?;
    model.set_name(b, "A")?; // fine: ":A" is free again
    let err = model.set_name(c, "A").unwrap_err();
    assert!(matches!(err, ModelError::DuplicateName { .. }));

    // both sides untouched by the failed rename
    assert_eq!(model.get_type(c).unwrap().qualified_name(), ":C");
    assert_eq!(model.get_type(b).unwrap().qualified_name(), ":A");

    let mut seen: HashSet<String> = HashSet::new();
    for ty in model.types() {
        assert!(
            seen.insert(ty.qualified_name().to_string()),
            "duplicate qualified name {}",
            ty.qualified_name()
        );
    }
    Ok(())
}

// ── INV-2: Acyclicity ────────────────────────────────────────────

#[test]
fn inv2_no_type_reaches_itself() -> Result<()> {
    let mut model = Model::new();
    let a = named_type(&mut model, "A")?;
    let c = named_type(&mut model, "C")?;
    let d = named_type(&mut model, "D")?;

    model.derive_from(d, c)?;
    model.derive_from(c, a)?;

    let a_bases = model.get_type(a).unwrap().base_types().to_vec();
    let err = model.derive_from(a, d).unwrap_err();
    assert!(matches!(err, ModelError::CircularDerivation { .. }));
    // graph identical to before the attempt
    assert_eq!(model.get_type(a).unwrap().base_types(), a_bases.as_slice());
    assert!(!model.get_type(d).unwrap().subtypes().contains(&a));

    for ty in model.types() {
        assert!(
            !ty.is_derived_from(ty.id()),
            "{} is in its own closure",
            ty.qualified_name()
        );
    }
    Ok(())
}

// ── INV-3: Closure correctness ───────────────────────────────────

#[test]
fn inv3_closures_match_fresh_recomputation() -> Result<()> {
    let mut model = Model::new();
    let a = named_type(&mut model, "A")?;
    let b = named_type(&mut model, "B")?;
    let c = named_type(&mut model, "C")?;
    let d = named_type(&mut model, "D")?;
    let e = named_type(&mut model, "E")?;

    // build a diamond with a tail, then tear parts of it down again
    model.derive_from(b, a)?;
    model.derive_from(c, a)?;
    model.derive_from(d, b)?;
    model.derive_from(d, c)?;
    model.derive_from(e, d)?;
    for id in [a, b, c, d, e] {
        assert_closure_fresh(&model, id);
    }

    model.underive_from(b, a)?;
    for id in [a, b, c, d, e] {
        assert_closure_fresh(&model, id);
    }
    // d and e still reach a through c
    assert!(model.get_type(d).unwrap().is_derived_from(a));
    assert!(model.get_type(e).unwrap().is_derived_from(a));

    model.underive_from(d, c)?;
    model.derive_from(b, c)?;
    for id in [a, b, c, d, e] {
        assert_closure_fresh(&model, id);
    }
    Ok(())
}

// ── INV-4: Attribute propagation ─────────────────────────────────

#[test]
fn inv4_all_attributes_equal_own_plus_closure_owns() -> Result<()> {
    let mut model = Model::new();
    let a = named_type(&mut model, "A")?;
    let b = named_type(&mut model, "B")?;
    let c = named_type(&mut model, "C")?;
    let d = named_type(&mut model, "D")?;

    model.add_attribute(a)?;
    model.add_attribute(b)?;
    model.derive_from(b, a)?;
    model.derive_from(c, b)?;
    model.derive_from(d, b)?;
    model.add_attribute(c)?;
    model.add_attribute(a)?; // lands after the subtree exists

    for ty in model.types() {
        let mut expected: Vec<_> = ty.attributes().to_vec();
        for base in ty.all_base_types() {
            expected.extend(model.get_type(*base).unwrap().attributes());
        }
        let mut actual = ty.all_attributes().to_vec();
        expected.sort_unstable();
        actual.sort_unstable();
        assert_eq!(actual, expected, "propagation wrong for {}", ty.qualified_name());
    }
    Ok(())
}

// ── INV-5: Disposal completeness ─────────────────────────────────

#[test]
fn inv5_disposed_attribute_vanishes_from_the_subtree() -> Result<()> {
    let mut model = Model::new();
    let a = named_type(&mut model, "A")?;
    let b = named_type(&mut model, "B")?;
    let c = named_type(&mut model, "C")?;

    model.derive_from(b, a)?;
    model.derive_from(c, b)?;
    let attr = model.add_attribute(a)?;
    model.set_attribute_name(attr, "doomed")?;

    model.dispose_attribute(attr)?;
    for id in [a, b, c] {
        let ty = model.get_type(id).unwrap();
        assert!(!ty.attributes().contains(&attr));
        assert!(!ty.all_attributes().contains(&attr));
    }
    assert!(model.get_attribute(attr).is_err());
    // terminal: a second dispose is an error, not a silent no-op
    assert!(matches!(
        model.dispose_attribute(attr).unwrap_err(),
        ModelError::UnknownAttribute { .. }
    ));
    Ok(())
}

// ── INV-6: Idempotence ───────────────────────────────────────────

#[test]
fn inv6_rederiving_changes_nothing() -> Result<()> {
    let mut model = Model::new();
    let a = named_type(&mut model, "A")?;
    let b = named_type(&mut model, "B")?;
    let c = named_type(&mut model, "C")?;

    model.derive_from(b, a)?;
    model.derive_from(c, b)?;
    model.add_attribute(a)?;

    let bases = model.get_type(c).unwrap().base_types().to_vec();
    let all_attrs = model.get_type(c).unwrap().all_attributes().to_vec();

    model.derive_from(c, b)?; // direct repeat
    model.derive_from(c, a)?; // transitive repeat
    assert_eq!(model.get_type(c).unwrap().base_types(), bases.as_slice());
    assert_eq!(model.get_type(c).unwrap().all_attributes(), all_attrs.as_slice());
    Ok(())
}

// ── End-to-end scenarios ─────────────────────────────────────────

#[test]
fn scenario_rename_group_leaves_siblings_alone() -> Result<()> {
    let mut model = Model::new();
    let a = named_type(&mut model, "A")?;
    let b = named_type(&mut model, "B")?;
    assert_eq!(model.get_type(a).unwrap().qualified_name(), ":A");
    assert_eq!(model.get_type(b).unwrap().qualified_name(), ":B");

    model.set_group(a, "g")?;
    assert_eq!(model.get_type(a).unwrap().qualified_name(), "g:A");
    assert_eq!(model.get_type(b).unwrap().qualified_name(), ":B");
    assert_eq!(
        model.type_by_qualified_name("g:A").map(|t| t.id()),
        Some(a)
    );
    assert!(model.type_by_qualified_name(":A").is_none());
    Ok(())
}

#[test]
fn scenario_inherited_attribute_is_not_an_own_attribute() -> Result<()> {
    let mut model = Model::new();
    let a = named_type(&mut model, "A")?;
    let b = named_type(&mut model, "B")?;
    let x = model.add_attribute(a)?;
    model.set_attribute_name(x, "x")?;

    model.derive_from(b, a)?;
    let b_ty = model.get_type(b).unwrap();
    assert!(b_ty.all_attributes().contains(&x));
    assert!(!b_ty.attributes().contains(&x));
    Ok(())
}

#[test]
fn scenario_underive_on_transitive_link_fails_then_direct_succeeds() -> Result<()> {
    let mut model = Model::new();
    let a = named_type(&mut model, "A")?;
    let c = named_type(&mut model, "C")?;
    let d = named_type(&mut model, "D")?;

    model.derive_from(c, a)?;
    model.derive_from(d, c)?;

    assert!(matches!(
        model.underive_from(d, a).unwrap_err(),
        ModelError::NotDirectBase { .. }
    ));
    model.underive_from(c, a)?;
    assert!(!model.get_type(c).unwrap().is_derived_from(a));
    assert!(!model.get_type(d).unwrap().is_derived_from(a));
    Ok(())
}
