//! Phase-ordered topological scheduling with cycle breaking.
//!
//! One [`Scheduler`] is constructed per namespace, consumed to completion (or
//! aborted on a malformed graph), and discarded. Entities are submitted in
//! phase order - enums first because their backing types are always primitive,
//! so they can never wait on anything - and either emitted immediately or
//! parked with their remaining dependency set. Emitting a name resolves it for
//! everything parked on it, cascading in registration order.
//!
//! Whatever is still parked after all phases must be cyclically dependent.
//! Since no two entities may embed each other by value, every cycle contains
//! pointer edges; repeated sweeps emit every entity whose remaining edges are
//! all pointer-strength, flagging it for forward declarations. A sweep that
//! makes no progress with entities still parked means a concrete-concrete
//! cycle: malformed input, reported and the namespace abandoned.

use std::collections::{HashMap, HashSet};
use std::fmt;

use foredecl_model::{EntityKind, Error, Result};
use foredecl_registry::{EntityIx, GlobalRegistry, NamespaceEntries};

use crate::classify::{Classifier, DependencySet};

// =============================================================================
// Output types
// =============================================================================

/// One scheduled entity in emission order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScheduledEntity {
    /// Index into the namespace's entity arena.
    pub ix: EntityIx,
    /// True when the emitter must route this entity's references through the
    /// forward-declaration manager before emitting its body.
    pub forward_declares: bool,
}

/// A non-fatal anomaly observed while classifying references.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Warning {
    /// The namespace being ordered.
    pub namespace: String,
    /// The name that could not be resolved.
    pub name: String,
}

impl Warning {
    /// Upgrades the warning for callers that treat unresolved references as
    /// fatal instead of degrading to no-edge.
    #[must_use]
    pub fn into_error(self) -> Error {
        Error::unresolved_reference(self.namespace, self.name)
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unresolved type reference '{}' in namespace '{}'",
            self.name, self.namespace
        )
    }
}

/// The completed emission order for one namespace.
#[derive(Debug, Default)]
pub struct Schedule {
    /// Entities in emission order; architecture-variant groups contiguous.
    pub items: Vec<ScheduledEntity>,
    /// Unresolved-reference warnings, first occurrence order, deduplicated.
    pub warnings: Vec<Warning>,
}

impl Schedule {
    /// Convenience: emission order as entity names.
    #[must_use]
    pub fn names<'a>(&self, entries: &'a NamespaceEntries) -> Vec<&'a str> {
        self.items
            .iter()
            .map(|item| entries.entity(item.ix).name())
            .collect()
    }
}

// =============================================================================
// Scheduler
// =============================================================================

/// An entity (or variant-group representative) parked on its remaining
/// dependency set.
#[derive(Debug)]
struct Waiting {
    ix: EntityIx,
    name: String,
    deps: DependencySet,
}

/// Phase-ordered topological engine for one namespace.
pub struct Scheduler<'a> {
    entries: &'a NamespaceEntries,
    registry: &'a GlobalRegistry,
    /// Names whose first definition is already in the output; what dependency
    /// edges resolve against. Never iterated.
    scheduled: HashSet<String>,
    /// (name, kind) pairs already in the output. A struct and a function may
    /// share a name; each kind emits once.
    emitted: HashSet<(String, EntityKind)>,
    /// Parked entities in discovery order; slots are taken when scheduled.
    waiting: Vec<Option<Waiting>>,
    /// Dependee name → waiting slots parked on it, registration order.
    pending_on: HashMap<String, Vec<usize>>,
    /// Variant groups whose representative was already submitted.
    groups_submitted: HashSet<(String, EntityKind)>,
    output: Vec<ScheduledEntity>,
    warnings: Vec<Warning>,
    warned: HashSet<String>,
}

impl<'a> Scheduler<'a> {
    /// Creates a scheduler over one namespace's entries.
    #[must_use]
    pub fn new(entries: &'a NamespaceEntries, registry: &'a GlobalRegistry) -> Self {
        Self {
            entries,
            registry,
            scheduled: HashSet::with_capacity(entries.len()),
            emitted: HashSet::with_capacity(entries.len()),
            waiting: Vec::new(),
            pending_on: HashMap::new(),
            groups_submitted: HashSet::new(),
            output: Vec::with_capacity(entries.len()),
            warnings: Vec::new(),
            warned: HashSet::new(),
        }
    }

    /// Runs the pass to completion.
    ///
    /// # Errors
    ///
    /// Returns [`foredecl_model::ErrorKind::MalformedGraph`] when entities
    /// remain parked on concrete dependencies after cycle breaking converges.
    pub fn run(mut self) -> Result<Schedule> {
        // Enums can never carry dependencies; emit them without classifying.
        for &ix in self.entries.enums() {
            self.emit(ix, false);
        }
        for &ix in self.entries.constants() {
            self.submit(ix);
        }
        for &ix in self.entries.function_pointers() {
            self.submit(ix);
        }
        for &ix in self.entries.structs() {
            self.submit(ix);
        }
        for &ix in self.entries.functions() {
            self.submit(ix);
        }
        for &ix in self.entries.interfaces() {
            self.submit(ix);
        }

        self.break_cycles()?;

        Ok(Schedule {
            items: self.output,
            warnings: self.warnings,
        })
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Computes an entity's remaining dependency set and either emits it or
    /// parks it. Later members of a variant group are skipped; the first
    /// member represents the whole group with the union of all members' sets.
    fn submit(&mut self, ix: EntityIx) {
        let entity = self.entries.entity(ix);
        let name = entity.name().to_string();
        let kind = entity.kind();

        let group = self.group_members(ix);
        if group.is_some() && !self.groups_submitted.insert((name.clone(), kind)) {
            return;
        }

        let classifier = Classifier::new(self.entries, self.registry);
        let mut deps = DependencySet::new();
        let mut unresolved = Vec::new();
        match group {
            Some(members) => {
                for member in members {
                    classifier.entity_dependencies(
                        self.entries.entity(member),
                        &self.scheduled,
                        &mut deps,
                        &mut unresolved,
                    );
                }
            }
            None => {
                classifier.entity_dependencies(entity, &self.scheduled, &mut deps, &mut unresolved);
            }
        }
        self.record_unresolved(unresolved);

        // A type may legally hold a pointer to itself.
        deps.remove(&name);

        if deps.is_empty() {
            self.emit(ix, false);
        } else {
            self.park(ix, name, deps);
        }
    }

    /// The variant group containing `ix`, when its (name, kind) pair really
    /// has multiple shape variants. Kinds that never group and same-named
    /// entities of other kinds both come back `None`.
    fn group_members(&self, ix: EntityIx) -> Option<Vec<EntityIx>> {
        let entity = self.entries.entity(ix);
        self.entries
            .variant_group(entity.name(), entity.kind())
            .map(<[EntityIx]>::to_vec)
    }

    fn park(&mut self, ix: EntityIx, name: String, deps: DependencySet) {
        let slot = self.waiting.len();
        for (dep_name, _) in deps.iter() {
            self.pending_on
                .entry(dep_name.to_string())
                .or_default()
                .push(slot);
        }
        self.waiting.push(Some(Waiting { ix, name, deps }));
    }

    fn record_unresolved(&mut self, unresolved: Vec<String>) {
        for name in unresolved {
            if self.warned.insert(name.clone()) {
                self.warnings.push(Warning {
                    namespace: self.entries.namespace().to_string(),
                    name,
                });
            }
        }
    }

    // =========================================================================
    // Emission and resolution
    // =========================================================================

    /// Appends an entity (or its whole variant group, contiguously, in
    /// discovery order) to the output and resolves its name for everything
    /// parked on it. Freed waiters are scheduled depth-first in registration
    /// order; the worklist is explicit so arbitrarily long dependency chains
    /// cannot exhaust the call stack.
    fn emit(&mut self, ix: EntityIx, forward_declares: bool) {
        let mut work = vec![(ix, forward_declares)];
        while let Some((ix, flagged)) = work.pop() {
            let entity = self.entries.entity(ix);
            let name = entity.name().to_string();
            if !self.emitted.insert((name.clone(), entity.kind())) {
                continue;
            }

            match self.group_members(ix) {
                Some(members) => {
                    for member in members {
                        self.output.push(ScheduledEntity {
                            ix: member,
                            forward_declares: flagged,
                        });
                    }
                }
                None => {
                    self.output.push(ScheduledEntity {
                        ix,
                        forward_declares: flagged,
                    });
                }
            }

            // A name resolves once; a later same-named entity of another kind
            // finds the parked sets already pruned.
            if !self.scheduled.insert(name.clone()) {
                continue;
            }

            // Prune the emitted name from every parked set; newly empty ones
            // go on the worklist, reversed so they pop in registration order.
            let Some(waiters) = self.pending_on.remove(&name) else {
                continue;
            };
            let mut freed = Vec::new();
            for slot in waiters {
                let Some(waiting) = self.waiting[slot].as_mut() else {
                    continue;
                };
                waiting.deps.remove(&name);
                if waiting.deps.is_empty() {
                    if let Some(done) = self.waiting[slot].take() {
                        freed.push(done.ix);
                    }
                }
            }
            work.extend(freed.into_iter().rev().map(|ix| (ix, false)));
        }
    }

    // =========================================================================
    // Cycle breaking
    // =========================================================================

    /// Sweeps the parked entities, scheduling every one whose remaining
    /// dependencies are all pointer-strength with the forward-declare flag
    /// set. Repeats until a sweep schedules nothing; anything still parked
    /// then sits on a concrete edge that will never resolve.
    fn break_cycles(&mut self) -> Result<()> {
        loop {
            // Most remaining dependencies first - scheduling the widest
            // waiter unblocks the most names per forward declaration.
            // Ties resolve to discovery order.
            let mut sweep: Vec<(usize, usize)> = self
                .waiting
                .iter()
                .enumerate()
                .filter_map(|(slot, entry)| {
                    entry
                        .as_ref()
                        .filter(|waiting| waiting.deps.all_pointer())
                        .map(|waiting| (slot, waiting.deps.len()))
                })
                .collect();
            if sweep.is_empty() {
                break;
            }
            sweep.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

            for (slot, _) in sweep {
                // May have been scheduled by cascade from an earlier pick.
                let Some(waiting) = self.waiting[slot].take() else {
                    continue;
                };
                self.emit(waiting.ix, true);
            }
        }

        let stuck: Vec<String> = self
            .waiting
            .iter()
            .flatten()
            .map(|waiting| waiting.name.clone())
            .collect();
        if stuck.is_empty() {
            Ok(())
        } else {
            Err(Error::malformed_graph(self.entries.namespace(), stuck))
        }
    }
}

// =============================================================================
// Entry point
// =============================================================================

/// Orders one namespace's entities for emission.
///
/// Constructs a [`Scheduler`], runs it to completion, and returns the
/// emission order plus any unresolved-reference warnings. State is fully
/// isolated per call; callers may process namespaces serially or in parallel
/// once the registry is populated.
///
/// # Errors
///
/// Returns [`foredecl_model::ErrorKind::MalformedGraph`] when the namespace
/// contains a concrete-concrete dependency cycle.
pub fn order_namespace(entries: &NamespaceEntries, registry: &GlobalRegistry) -> Result<Schedule> {
    Scheduler::new(entries, registry).run()
}

// =============================================================================
// Tests
// =============================================================================
