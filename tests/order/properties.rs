//! Property tests for the ordering invariants.

use proptest::prelude::*;

use foredecl_model::{Entity, Field, StructDef, TypeRef};
use foredecl_order::order_namespace;
use foredecl_registry::{GlobalRegistry, NamespaceEntries};

use crate::NS;

const MAX_NODES: usize = 12;

/// Builds a namespace of `n` structs from edge masks. Value edges go only
/// from higher to lower index (acyclic by construction); pointer edges go
/// anywhere. Entities are added in reverse index order so every value edge
/// targets a later-added entity and actually exercises the parking path.
fn build(n: usize, value_masks: &[u32], pointer_masks: &[u32]) -> NamespaceEntries {
    let mut entries = NamespaceEntries::new(NS);
    for i in (0..n).rev() {
        let mut fields = Vec::new();
        for j in 0..i {
            if value_masks[i] & (1 << j) != 0 {
                fields.push(Field::new(
                    format!("v{j}"),
                    TypeRef::named(NS, format!("T{j}")),
                ));
            }
        }
        for j in 0..n {
            if j != i && pointer_masks[i] & (1 << j) != 0 {
                fields.push(Field::new(
                    format!("p{j}"),
                    TypeRef::pointer(TypeRef::named(NS, format!("T{j}"))),
                ));
            }
        }
        entries.add(Entity::Struct(StructDef::new(format!("T{i}"), fields)));
    }
    entries
}

fn positions(schedule: &foredecl_order::Schedule, entries: &NamespaceEntries) -> Vec<usize> {
    let n = entries.len();
    let mut pos = vec![usize::MAX; n];
    for (p, item) in schedule.items.iter().enumerate() {
        let name = entries.entity(item.ix).name();
        let i: usize = name[1..].parse().unwrap();
        pos[i] = p;
    }
    pos
}

proptest! {
    /// A graph with only value edges is a DAG: every entity schedules, no
    /// flags, and each target precedes its dependent.
    #[test]
    fn acyclic_value_graphs_schedule_cleanly(
        n in 2..MAX_NODES,
        value_masks in prop::collection::vec(any::<u32>(), MAX_NODES),
    ) {
        let entries = build(n, &value_masks, &vec![0; MAX_NODES]);
        let schedule = order_namespace(&entries, &GlobalRegistry::new()).unwrap();

        prop_assert_eq!(schedule.items.len(), n);
        prop_assert!(schedule.items.iter().all(|i| !i.forward_declares));

        let pos = positions(&schedule, &entries);
        for i in 0..n {
            for j in 0..i {
                if value_masks[i] & (1 << j) != 0 {
                    prop_assert!(pos[j] < pos[i], "T{} must precede T{}", j, i);
                }
            }
        }
    }

    /// Adding arbitrary pointer edges never breaks the schedule (pointer
    /// cycles are always breakable) and never reorders a value edge.
    #[test]
    fn pointer_edges_never_cause_failure(
        n in 2..MAX_NODES,
        value_masks in prop::collection::vec(any::<u32>(), MAX_NODES),
        pointer_masks in prop::collection::vec(any::<u32>(), MAX_NODES),
    ) {
        let entries = build(n, &value_masks, &pointer_masks);
        let schedule = order_namespace(&entries, &GlobalRegistry::new()).unwrap();

        prop_assert_eq!(schedule.items.len(), n);
        let pos = positions(&schedule, &entries);
        for i in 0..n {
            for j in 0..i {
                if value_masks[i] & (1 << j) != 0 {
                    prop_assert!(pos[j] < pos[i], "T{} must precede T{}", j, i);
                }
            }
        }
    }

    /// Scheduling is a pure function of the input batch.
    #[test]
    fn scheduling_is_deterministic(
        n in 2..MAX_NODES,
        value_masks in prop::collection::vec(any::<u32>(), MAX_NODES),
        pointer_masks in prop::collection::vec(any::<u32>(), MAX_NODES),
    ) {
        let first = order_namespace(
            &build(n, &value_masks, &pointer_masks),
            &GlobalRegistry::new(),
        ).unwrap();
        let second = order_namespace(
            &build(n, &value_masks, &pointer_masks),
            &GlobalRegistry::new(),
        ).unwrap();

        prop_assert_eq!(first.items, second.items);
        prop_assert_eq!(first.warnings, second.warnings);
    }
}
