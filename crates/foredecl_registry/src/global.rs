//! Cross-namespace name resolution.
//!
//! The global registry answers exactly two questions during ordering: what
//! kind of thing does this name resolve to, and what is the ultimate real
//! type behind a typedef-style alias. It never supplies scheduling
//! dependencies - cross-namespace references are resolved for *kind* only.
//!
//! Phase 1 populates it from every reachable namespace; phase 2 treats it as
//! read-only, which is what makes per-namespace ordering passes independent.

use std::collections::HashMap;

use foredecl_model::{EntityKind, Primitive, TypeRef};

use crate::kinds::KindSet;

/// Per-namespace lookup tables. Name keys are lowercased.
#[derive(Debug, Default)]
struct NamespaceIndex {
    /// Typedef-style aliases: name → the aliased type.
    aliases: HashMap<String, TypeRef>,
    /// Name → the kinds it resolves to.
    kinds: HashMap<String, KindSet>,
}

/// Read-only (after population) registry of every known name.
#[derive(Debug, Default)]
pub struct GlobalRegistry {
    namespaces: HashMap<String, NamespaceIndex>,
}

impl GlobalRegistry {
    /// Maximum alias-chain length [`Self::real_type`] will follow. Chains in
    /// real metadata are one or two hops; this bound only exists so a
    /// malformed alias cycle terminates.
    const MAX_ALIAS_DEPTH: usize = 32;

    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn index_mut(&mut self, namespace: &str) -> &mut NamespaceIndex {
        self.namespaces.entry(namespace.to_string()).or_default()
    }

    /// Records a typedef-style alias.
    pub fn add_alias(&mut self, namespace: &str, name: &str, target: TypeRef) {
        self.index_mut(namespace)
            .aliases
            .insert(name.to_ascii_lowercase(), target);
    }

    /// Records the kind an entity name resolves to.
    pub fn add_kind(&mut self, namespace: &str, name: &str, kind: EntityKind) {
        self.index_mut(namespace)
            .kinds
            .entry(name.to_ascii_lowercase())
            .or_default()
            .insert(kind);
    }

    /// Looks up the alias target for a name, if one was recorded.
    #[must_use]
    pub fn resolve_alias(&self, namespace: &str, name: &str) -> Option<&TypeRef> {
        self.namespaces
            .get(namespace)?
            .aliases
            .get(&name.to_ascii_lowercase())
    }

    /// The kinds a name resolves to in a namespace.
    #[must_use]
    pub fn kind_of(&self, namespace: &str, name: &str) -> KindSet {
        self.namespaces
            .get(namespace)
            .and_then(|ns| ns.kinds.get(&name.to_ascii_lowercase()))
            .copied()
            .unwrap_or_default()
    }

    /// Returns true if the name is known at all, as an alias or an entity.
    #[must_use]
    pub fn knows(&self, namespace: &str, name: &str) -> bool {
        !self.kind_of(namespace, name).is_empty()
            || self.resolve_alias(namespace, name).is_some()
    }

    /// Returns true if the name resolves to an interface.
    #[must_use]
    pub fn is_interface(&self, namespace: &str, name: &str) -> bool {
        self.kind_of(namespace, name).contains(EntityKind::Interface)
    }

    /// Chases alias chains through `Named` references to a fixpoint.
    ///
    /// Returns the input unchanged when it is not an alias. Bounded so a
    /// malformed alias cycle terminates at the last resolved hop.
    #[must_use]
    pub fn real_type<'a>(&'a self, ty: &'a TypeRef) -> &'a TypeRef {
        let mut current = ty;
        for _ in 0..Self::MAX_ALIAS_DEPTH {
            let TypeRef::Named(name) = current else {
                return current;
            };
            match self.resolve_alias(&name.namespace, &name.name) {
                Some(target) if target != current => current = target,
                _ => return current,
            }
        }
        current
    }

    /// The opaque-handle naming convention: a name starting with `H` whose
    /// fully resolved form is one-or-more pointer levels over `void`.
    ///
    /// Handles are never embedded by value in generated declarations, only
    /// referenced, so the classifier and the forward-declaration manager both
    /// treat them as pointer-like regardless of the reference site.
    #[must_use]
    pub fn is_opaque_handle(&self, name: &str, ty: &TypeRef) -> bool {
        let (stripped, levels) = ty.strip_pointers();
        if matches!(stripped, TypeRef::Named(_)) {
            let real = self.real_type(stripped);
            if real != stripped {
                return self.is_opaque_handle(name, real);
            }
            // unresolvable names fall through and fail the primitive check
        }
        name.starts_with('H')
            && levels > 0
            && matches!(stripped, TypeRef::Primitive(Primitive::Void))
    }
}

// =============================================================================
// Tests
// =============================================================================
