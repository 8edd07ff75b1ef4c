//! One namespace's insertion-ordered entity batch.
//!
//! Entities live in an arena addressed by [`EntityIx`]; insertion order is
//! discovery order and is what the scheduler's determinism guarantee is
//! defined against. Structs, functions, and function pointers sharing a name
//! are collected into architecture-variant buckets so the scheduler can treat
//! them as one unit.

use std::collections::HashMap;
use std::fmt;

use foredecl_model::{Entity, EntityKind};

use crate::kinds::KindSet;

// =============================================================================
// EntityIx
// =============================================================================

/// Index of an entity within its namespace's arena.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct EntityIx(u32);

impl EntityIx {
    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for EntityIx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityIx({})", self.0)
    }
}

// =============================================================================
// NamespaceEntries
// =============================================================================

/// The insertion-ordered batch of entities for one namespace.
#[derive(Debug, Default)]
pub struct NamespaceEntries {
    namespace: String,
    entities: Vec<Entity>,
    constants: Vec<EntityIx>,
    enums: Vec<EntityIx>,
    structs: Vec<EntityIx>,
    interfaces: Vec<EntityIx>,
    function_pointers: Vec<EntityIx>,
    functions: Vec<EntityIx>,
    /// Case-insensitive name → kinds it resolves to in this namespace.
    kinds: HashMap<String, KindSet>,
    /// Exact (name, kind) → same-named Struct/Function/FunctionPointer
    /// entities. One dictionary per kind in spirit; a struct and a function
    /// sharing a name land in separate buckets.
    variants: HashMap<(String, EntityKind), Vec<EntityIx>>,
}

impl NamespaceEntries {
    /// Creates an empty batch for the given namespace.
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// The owning namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Adds an entity, returning its arena index.
    ///
    /// # Panics
    ///
    /// Panics if the arena exceeds `u32::MAX` entities.
    pub fn add(&mut self, entity: Entity) -> EntityIx {
        let ix = EntityIx(u32::try_from(self.entities.len()).expect("too many entities"));
        let kind = entity.kind();
        let name = entity.name().to_string();

        self.kinds
            .entry(name.to_ascii_lowercase())
            .or_default()
            .insert(kind);

        match kind {
            EntityKind::Constant => self.constants.push(ix),
            EntityKind::Enum => self.enums.push(ix),
            EntityKind::Struct => self.structs.push(ix),
            EntityKind::Interface => self.interfaces.push(ix),
            EntityKind::FunctionPointer => self.function_pointers.push(ix),
            EntityKind::Function => self.functions.push(ix),
        }

        // Enums, interfaces, and constants are architecture-invariant and
        // never grouped.
        if matches!(
            kind,
            EntityKind::Struct | EntityKind::Function | EntityKind::FunctionPointer
        ) {
            self.variants.entry((name, kind)).or_default().push(ix);
        }

        self.entities.push(entity);
        ix
    }

    /// Looks up an entity by index.
    #[must_use]
    pub fn entity(&self, ix: EntityIx) -> &Entity {
        &self.entities[ix.index()]
    }

    /// Number of entities in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the batch holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Constants in insertion order.
    #[must_use]
    pub fn constants(&self) -> &[EntityIx] {
        &self.constants
    }

    /// Enums in insertion order.
    #[must_use]
    pub fn enums(&self) -> &[EntityIx] {
        &self.enums
    }

    /// Structs in insertion order.
    #[must_use]
    pub fn structs(&self) -> &[EntityIx] {
        &self.structs
    }

    /// Interfaces in insertion order.
    #[must_use]
    pub fn interfaces(&self) -> &[EntityIx] {
        &self.interfaces
    }

    /// Function pointers in insertion order.
    #[must_use]
    pub fn function_pointers(&self) -> &[EntityIx] {
        &self.function_pointers
    }

    /// Functions in insertion order.
    #[must_use]
    pub fn functions(&self) -> &[EntityIx] {
        &self.functions
    }

    /// The kinds a name resolves to in this namespace (case-insensitive).
    #[must_use]
    pub fn kinds_of(&self, name: &str) -> KindSet {
        self.kinds
            .get(&name.to_ascii_lowercase())
            .copied()
            .unwrap_or_default()
    }

    /// The architecture-variant group for a (name, kind) pair, if it actually
    /// has multiple shape variants. Single-definition names return `None`, as
    /// does a name whose other definitions are of a different kind.
    #[must_use]
    pub fn variant_group(&self, name: &str, kind: EntityKind) -> Option<&[EntityIx]> {
        self.variants
            .get(&(name.to_string(), kind))
            .map(Vec::as_slice)
            .filter(|group| group.len() > 1)
    }
}

// =============================================================================
// Tests
// =============================================================================
