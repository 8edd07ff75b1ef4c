//! Scheduler behaviors beyond the canonical graphs: phase order,
//! architecture-variant groups, cascades, and determinism.

use foredecl_model::{
    Arch, ArchSet, ConstValue, ConstantDef, Entity, EnumDef, Field, FunctionDef,
    FunctionPointerDef, InterfaceDef, Primitive, StructDef, TypeRef,
};
use foredecl_registry::NamespaceEntries;

use crate::{names, order, pointer_struct, sig_over, value_struct, NS};

fn enum_entity(name: &str) -> Entity {
    Entity::Enum(EnumDef {
        name: name.to_string(),
        backing: Primitive::UInt32,
        members: Vec::new(),
    })
}

// =============================================================================
// Phase Order
// =============================================================================

#[test]
fn unconstrained_batch_emits_in_phase_order() {
    let mut entries = NamespaceEntries::new(NS);
    entries.add(Entity::Interface(InterfaceDef {
        name: "IThing".to_string(),
        bases: vec![],
        methods: vec![],
    }));
    entries.add(Entity::Function(FunctionDef::new("DoThing", sig_over(&[]))));
    entries.add(Entity::Struct(StructDef::new("THING", vec![])));
    entries.add(Entity::FunctionPointer(FunctionPointerDef::new(
        "PFN_THING",
        sig_over(&[]),
    )));
    entries.add(Entity::Constant(ConstantDef {
        name: "THING_MAX".to_string(),
        ty: TypeRef::Primitive(Primitive::UInt32),
        value: ConstValue::UInt(16),
    }));
    entries.add(enum_entity("THING_KIND"));

    let schedule = order(&entries);
    assert_eq!(
        names(&schedule, &entries),
        ["THING_KIND", "THING_MAX", "PFN_THING", "THING", "DoThing", "IThing"]
    );
}

#[test]
fn function_waits_for_argument_struct() {
    let mut entries = NamespaceEntries::new(NS);
    // functions submit after structs, so this resolves without parking
    entries.add(Entity::Function(FunctionDef::new(
        "FillRect",
        sig_over(&["RECT"]),
    )));
    entries.add(Entity::Struct(StructDef::new("RECT", vec![])));

    let schedule = order(&entries);
    assert_eq!(names(&schedule, &entries), ["RECT", "FillRect"]);
}

// =============================================================================
// Architecture-Variant Groups
// =============================================================================

fn context_variants() -> (NamespaceEntries, [foredecl_registry::EntityIx; 2]) {
    let mut entries = NamespaceEntries::new(NS);
    let x86 = entries.add(Entity::Struct(
        StructDef::new(
            "CONTEXT",
            vec![Field::new("fsave", TypeRef::named(NS, "FSAVE_AREA"))],
        )
        .for_arch(ArchSet::only(Arch::X86)),
    ));
    entries.add(Entity::Struct(StructDef::new("FSAVE_AREA", vec![])));
    let x64 = entries.add(Entity::Struct(
        StructDef::new(
            "CONTEXT",
            vec![Field::new("xmm0", TypeRef::named(NS, "M128A"))],
        )
        .for_arch(ArchSet::only(Arch::X64)),
    ));
    entries.add(Entity::Struct(StructDef::new("M128A", vec![])));
    (entries, [x86, x64])
}

#[test]
fn variant_group_waits_for_the_union_of_dependencies() {
    let (entries, variants) = context_variants();
    let schedule = order(&entries);

    let order_names = names(&schedule, &entries);
    let pos = |n: &str| order_names.iter().position(|x| x == n).unwrap();
    // both variants' targets precede the group
    assert!(pos("FSAVE_AREA") < pos("CONTEXT"));
    assert!(pos("M128A") < pos("CONTEXT"));

    // group members are contiguous and in discovery order
    let group_positions: Vec<usize> = schedule
        .items
        .iter()
        .enumerate()
        .filter(|(_, item)| variants.contains(&item.ix))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(group_positions.len(), 2);
    assert_eq!(group_positions[1], group_positions[0] + 1);
    assert_eq!(schedule.items[group_positions[0]].ix, variants[0]);
    assert_eq!(schedule.items[group_positions[1]].ix, variants[1]);
}

#[test]
fn flag_propagates_to_every_variant() {
    // both variants point into a cycle partner that points back
    let mut entries = NamespaceEntries::new(NS);
    entries.add(Entity::Struct(
        StructDef::new(
            "NODE",
            vec![Field::new("peer", TypeRef::pointer(TypeRef::named(NS, "PEER")))],
        )
        .for_arch(ArchSet::only(Arch::X86)),
    ));
    entries.add(Entity::Struct(
        StructDef::new(
            "NODE",
            vec![Field::new("peer64", TypeRef::pointer(TypeRef::named(NS, "PEER")))],
        )
        .for_arch(ArchSet::only(Arch::X64)),
    ));
    entries.add(pointer_struct("PEER", &["NODE"]));

    let schedule = order(&entries);
    assert_eq!(schedule.items.len(), 3);

    let node_flags: Vec<bool> = schedule
        .items
        .iter()
        .filter(|item| entries.entity(item.ix).name() == "NODE")
        .map(|item| item.forward_declares)
        .collect();
    assert_eq!(node_flags.len(), 2);
    assert_eq!(
        node_flags[0], node_flags[1],
        "variants of one name must agree on the flag"
    );
}

// =============================================================================
// Warnings
// =============================================================================

#[test]
fn unresolved_names_warn_once_each() {
    let mut entries = NamespaceEntries::new(NS);
    entries.add(value_struct("A", &["GHOST"]));
    entries.add(value_struct("B", &["GHOST", "PHANTOM"]));

    let schedule = order(&entries);
    assert_eq!(names(&schedule, &entries), ["A", "B"]);

    let warned: Vec<&str> = schedule.warnings.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(warned, ["GHOST", "PHANTOM"]);
    assert!(schedule.warnings.iter().all(|w| w.namespace == NS));
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn repeated_runs_are_byte_identical() {
    let build = || {
        let mut entries = NamespaceEntries::new(NS);
        entries.add(pointer_struct("W1", &["W2", "W3"]));
        entries.add(pointer_struct("W2", &["W3", "W1"]));
        entries.add(pointer_struct("W3", &["W1", "W2"]));
        entries.add(value_struct("V", &["W1"]));
        entries.add(enum_entity("E"));
        entries
    };

    let first = order(&build());
    for _ in 0..10 {
        let again = order(&build());
        assert_eq!(first.items, again.items);
        assert_eq!(first.warnings, again.warnings);
    }
}

#[test]
fn widest_waiter_breaks_first() {
    // W3 waits on two names, the others on one; the sweep must pick W3
    let mut entries = NamespaceEntries::new(NS);
    entries.add(pointer_struct("W1", &["W3"]));
    entries.add(pointer_struct("W2", &["W3"]));
    entries.add(pointer_struct("W3", &["W1", "W2"]));

    let schedule = order(&entries);
    assert_eq!(names(&schedule, &entries)[0], "W3");
    assert!(schedule.items[0].forward_declares);
    // W3's emission frees W1 then W2 concretely
    assert!(!schedule.items[1].forward_declares);
    assert!(!schedule.items[2].forward_declares);
}
