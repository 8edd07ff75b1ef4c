//! Forward-declaration bookkeeping for emitters.
//!
//! When the scheduler flags an entity (its cycle was broken on pointer
//! edges), the emitter routes every named reference in that entity's body
//! through a [`ForwardDecls`] before printing it. The manager answers with a
//! substitute reference that is legal to use before the target's real
//! definition, plus at most one declaration to print ahead of the entity -
//! the first request for a given base produces the declaration, every later
//! request reuses it.
//!
//! One manager per output unit (file), same lifetime as the emission pass.

use std::collections::HashMap;
use std::fmt;

use foredecl_model::{Error, Result, TypeName, TypeRef};
use foredecl_registry::GlobalRegistry;

// =============================================================================
// Declarations
// =============================================================================

/// A placeholder declaration the emitter must print before the entity that
/// triggered it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ForwardDecl {
    /// An opaque handle: declare an empty marker type and the handle name as
    /// a pointer to it.
    HandleMarker {
        /// The handle's declared name.
        name: String,
        /// The marker type name, `{name}__`.
        marker: String,
    },
    /// A typedef whose real form is already pointer-shaped: declare the name
    /// itself as an alias of that form, collapsing the chain.
    Alias {
        /// The declared name.
        name: String,
        /// The fully resolved pointer-shaped target.
        target: TypeRef,
    },
    /// The general case: declare a synthetic `{base}_fwd_` name the
    /// substitute reference points at instead of the real type.
    Placeholder {
        /// The synthetic placeholder name.
        placeholder: String,
        /// The real base the placeholder stands in for.
        target: TypeName,
    },
}

impl fmt::Display for ForwardDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HandleMarker { name, marker } => {
                write!(f, "{marker} (opaque); {name} = {marker} ptr")
            }
            Self::Alias { name, target } => write!(f, "{name} = {target}"),
            Self::Placeholder {
                placeholder,
                target,
            } => write!(f, "{placeholder} (stands for {target})"),
        }
    }
}

/// The manager's answer for one reference site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForwardRequest {
    /// The reference to emit in place of the original, with the site's
    /// pointer levels restored.
    pub substitute: TypeRef,
    /// Declaration to print before the entity; `None` when an earlier request
    /// already produced it.
    pub declaration: Option<ForwardDecl>,
}

// =============================================================================
// ForwardDecls
// =============================================================================

/// What the manager knows about one base name.
#[derive(Clone, Debug)]
enum State {
    /// The real definition was emitted; requests need no substitution.
    Concrete,
    /// A placeholder exists; remembers the pointer-stripped substitute base.
    Declared { substitute_base: TypeRef },
}

/// Per-output-unit registry of forward declarations, keyed by the
/// pointer-stripped base reference's textual form.
#[derive(Debug)]
pub struct ForwardDecls {
    namespace: String,
    states: HashMap<String, State>,
}

impl ForwardDecls {
    /// Creates an empty manager for one output unit in `namespace`.
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            states: HashMap::new(),
        }
    }

    /// Requests a forward substitute for a reference site.
    ///
    /// `force` is set when the entity holding the reference was flagged by
    /// the scheduler; without it, same-namespace references need no
    /// substitution (the scheduler already ordered their targets first).
    ///
    /// Returns `None` when the site may use the original reference as-is:
    /// non-named bases, unflagged same-namespace references, bases already
    /// concretely declared, and by-value uses nothing can stand in for.
    pub fn request(
        &mut self,
        ty: &TypeRef,
        registry: &GlobalRegistry,
        force: bool,
    ) -> Option<ForwardRequest> {
        let (base, site_levels) = ty.strip_pointers();
        let TypeRef::Named(target) = base else {
            return None;
        };
        if target.namespace == self.namespace && !force {
            return None;
        }

        let key = base.to_string();
        match self.states.get(&key) {
            Some(State::Concrete) => return None,
            Some(State::Declared { substitute_base }) => {
                return Some(ForwardRequest {
                    substitute: substitute_base.clone().wrap_pointers(site_levels),
                    declaration: None,
                });
            }
            None => {}
        }

        let (decl, substitute_base) = create_decl(target, base, site_levels, registry)?;
        self.states.insert(
            key,
            State::Declared {
                substitute_base: substitute_base.clone(),
            },
        );
        Some(ForwardRequest {
            substitute: substitute_base.wrap_pointers(site_levels),
            declaration: Some(decl),
        })
    }

    /// Records that `base`'s real definition was emitted. Later requests for
    /// it return `None`; already-issued substitutes remain valid because the
    /// placeholder declaration stays in the output.
    ///
    /// # Errors
    ///
    /// Returns [`foredecl_model::ErrorKind::Internal`] when the same base is
    /// declared concrete twice in one output unit. That is a logic bug in the
    /// caller, not bad input.
    pub fn declare_concrete(&mut self, base: &TypeRef) -> Result<()> {
        let prior = self.states.insert(base.to_string(), State::Concrete);
        if matches!(prior, Some(State::Concrete)) {
            return Err(Error::internal(format!(
                "definition of {base} declared twice in one output unit"
            )));
        }
        Ok(())
    }

    /// Returns true if a placeholder has been issued for `base` and its real
    /// definition has not yet been declared.
    #[must_use]
    pub fn is_pending(&self, base: &TypeRef) -> bool {
        matches!(
            self.states.get(&base.to_string()),
            Some(State::Declared { .. })
        )
    }
}

/// Decides the declaration shape for a base seen for the first time.
fn create_decl(
    target: &TypeName,
    base: &TypeRef,
    site_levels: usize,
    registry: &GlobalRegistry,
) -> Option<(ForwardDecl, TypeRef)> {
    // Opaque handles get a named marker so distinct handle kinds stay
    // distinct types rather than all collapsing to an untyped pointer.
    if registry.is_opaque_handle(&target.name, base) {
        let marker = format!("{}__", target.name);
        return Some((
            ForwardDecl::HandleMarker {
                name: target.name.clone(),
                marker,
            },
            base.clone(),
        ));
    }

    // A typedef whose resolved form is itself pointer-shaped can be declared
    // outright under its own name; the chain collapses into a single alias
    // and the site keeps its spelling.
    if site_levels == 0 {
        let real = registry.real_type(base);
        if real != base {
            let (_, real_levels) = real.strip_pointers();
            if real_levels > 0 {
                return Some((
                    ForwardDecl::Alias {
                        name: target.name.clone(),
                        target: real.clone(),
                    },
                    base.clone(),
                ));
            }
        }
        // A by-value use of a plain type cannot be satisfied by any
        // placeholder.
        return None;
    }

    // General pointer-site case: a synthetic incomplete type.
    let placeholder = format!("{}_fwd_", target.name);
    let substitute = TypeRef::named(target.namespace.clone(), placeholder.clone());
    Some((
        ForwardDecl::Placeholder {
            placeholder,
            target: target.clone(),
        },
        substitute,
    ))
}

// =============================================================================
// Tests
// =============================================================================
