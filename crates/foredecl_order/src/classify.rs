//! Dependency classification.
//!
//! Turns an outgoing [`TypeRef`] into at most one dependency edge against the
//! current namespace. An edge is *concrete* when the using entity embeds the
//! target's layout (value field, array element, by-value argument) and
//! *pointer* when a lightweight forward declaration would satisfy it.
//!
//! Cross-namespace references never produce edges; namespaces are ordered
//! independently.

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fmt;

use foredecl_model::{Entity, TypeRef};
use foredecl_registry::{GlobalRegistry, NamespaceEntries};

// =============================================================================
// Dependency
// =============================================================================

/// How strongly a dependent needs its target.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DependencyKind {
    /// Full prior definition required (size/layout is embedded).
    Concrete,
    /// A forward declaration naming the target suffices.
    Pointer,
}

impl DependencyKind {
    /// Returns true for [`DependencyKind::Pointer`].
    #[must_use]
    pub const fn is_pointer(self) -> bool {
        matches!(self, Self::Pointer)
    }
}

/// One dependency edge: target name plus strength.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dependency {
    /// The target entity's name (exact spelling).
    pub name: String,
    /// Edge strength.
    pub kind: DependencyKind,
}

// =============================================================================
// DependencySet
// =============================================================================

/// A set of dependency edges, at most one per target name.
///
/// When the same target arises with both strengths (different fields, or
/// different architecture variants of the dependent), the stronger
/// `Concrete` wins. Backed by a sorted map so iteration is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencySet {
    edges: BTreeMap<String, DependencyKind>,
}

impl DependencySet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an edge; the stronger kind wins on collision.
    pub fn insert(&mut self, dep: Dependency) {
        self.edges
            .entry(dep.name)
            .and_modify(|kind| {
                if dep.kind == DependencyKind::Concrete {
                    *kind = DependencyKind::Concrete;
                }
            })
            .or_insert(dep.kind);
    }

    /// Removes the edge at `name`, returning true if one existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.edges.remove(name).is_some()
    }

    /// The strength of the edge at `name`, if present.
    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<DependencyKind> {
        self.edges.get(name).copied()
    }

    /// Number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if the set holds no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns true if every edge is pointer-strength (and the set is
    /// non-empty) - the condition for a cycle-break sweep to pick this
    /// entity.
    #[must_use]
    pub fn all_pointer(&self) -> bool {
        !self.is_empty() && self.edges.values().all(|kind| kind.is_pointer())
    }

    /// Iterates edges in target-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, DependencyKind)> {
        self.edges.iter().map(|(name, &kind)| (name.as_str(), kind))
    }
}

impl fmt::Display for DependencySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, kind) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            let tag = if kind.is_pointer() { "ptr" } else { "concrete" };
            write!(f, "{name} ({tag})")?;
            first = false;
        }
        Ok(())
    }
}

// =============================================================================
// Classifier
// =============================================================================

/// Classification context for one namespace pass.
///
/// Borrows the namespace's entries and the read-only global registry; the
/// scheduler owns the set of already-scheduled names and threads it through
/// each call.
pub(crate) struct Classifier<'a> {
    entries: &'a NamespaceEntries,
    registry: &'a GlobalRegistry,
}

impl<'a> Classifier<'a> {
    pub(crate) fn new(entries: &'a NamespaceEntries, registry: &'a GlobalRegistry) -> Self {
        Self { entries, registry }
    }

    /// Classifies one reference. Returns `None` when the reference does not
    /// constrain ordering; unresolvable names are additionally recorded in
    /// `unresolved`.
    pub(crate) fn classify(
        &self,
        ty: &TypeRef,
        scheduled: &HashSet<String>,
        force: Option<DependencyKind>,
        unresolved: &mut Vec<String>,
    ) -> Option<Dependency> {
        let (stripped, ptr_levels) = ty.strip_pointers();
        let base = stripped.element_type();
        let TypeRef::Named(target) = base else {
            return None;
        };
        if target.namespace != self.entries.namespace() {
            return None;
        }
        if scheduled.contains(&target.name) {
            return None;
        }

        let kinds = self.entries.kinds_of(&target.name);
        if kinds.is_empty() && !self.registry.knows(&target.namespace, &target.name) {
            unresolved.push(target.name.clone());
            return None;
        }

        let kind = force.unwrap_or_else(|| {
            // Interfaces are represented only by reference, even at zero
            // pointer levels. Opaque handles are likewise never embedded
            // by value.
            if kinds.contains(foredecl_model::EntityKind::Interface)
                || self.registry.is_interface(&target.namespace, &target.name)
            {
                DependencyKind::Pointer
            } else if ptr_levels == 0 {
                if self.registry.is_opaque_handle(&target.name, base) {
                    DependencyKind::Pointer
                } else {
                    DependencyKind::Concrete
                }
            } else {
                DependencyKind::Pointer
            }
        });

        Some(Dependency {
            name: target.name.clone(),
            kind,
        })
    }

    /// Classifies a list of references into a merged set.
    fn collect<'t>(
        &self,
        refs: impl Iterator<Item = &'t TypeRef>,
        scheduled: &HashSet<String>,
        set: &mut DependencySet,
        unresolved: &mut Vec<String>,
    ) {
        for ty in refs {
            if let Some(dep) = self.classify(ty, scheduled, None, unresolved) {
                set.insert(dep);
            }
        }
    }

    /// The full dependency set for one entity (variant union is the
    /// scheduler's job; this sees a single definition).
    ///
    /// Self-references are pruned by the caller after the variant union so a
    /// group referencing its own name schedules immediately.
    pub(crate) fn entity_dependencies(
        &self,
        entity: &Entity,
        scheduled: &HashSet<String>,
        set: &mut DependencySet,
        unresolved: &mut Vec<String>,
    ) {
        match entity {
            Entity::Enum(_) => {}
            Entity::Constant(c) => {
                self.collect(std::iter::once(&c.ty), scheduled, set, unresolved);
            }
            Entity::Struct(s) => {
                self.struct_field_refs(s, scheduled, set, unresolved);
            }
            Entity::Function(f) => {
                self.collect(f.sig.type_refs(), scheduled, set, unresolved);
            }
            Entity::FunctionPointer(p) => {
                self.collect(p.sig.type_refs(), scheduled, set, unresolved);
            }
            Entity::Interface(i) => {
                // Deriving from an interface needs its full member layout
                // (virtual dispatch order), unlike merely referencing one.
                for base in &i.bases {
                    let base_ref = TypeRef::Named(base.clone());
                    if let Some(dep) = self.classify(
                        &base_ref,
                        scheduled,
                        Some(DependencyKind::Concrete),
                        unresolved,
                    ) {
                        set.insert(dep);
                    }
                }
                for method in &i.methods {
                    self.collect(method.sig.type_refs(), scheduled, set, unresolved);
                }
            }
        }
    }

    /// Folds a struct's fields and, recursively, its anonymous nested inner
    /// types' fields into one reference list.
    fn struct_field_refs(
        &self,
        def: &foredecl_model::StructDef,
        scheduled: &HashSet<String>,
        set: &mut DependencySet,
        unresolved: &mut Vec<String>,
    ) {
        for inner in &def.nested {
            self.struct_field_refs(inner, scheduled, set, unresolved);
        }
        self.collect(def.fields.iter().map(|f| &f.ty), scheduled, set, unresolved);
    }
}

// =============================================================================
// Tests
// =============================================================================
