//! Error types for the Foredecl system.
//!
//! Uses `thiserror` for ergonomic error definition with namespace context.

use thiserror::Error;

/// Convenient result alias for Foredecl operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Foredecl operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Creates a malformed-graph error for a namespace whose remaining
    /// entities are concretely cyclic.
    #[must_use]
    pub fn malformed_graph(namespace: impl Into<String>, stuck: Vec<String>) -> Self {
        Self::new(ErrorKind::MalformedGraph {
            namespace: namespace.into(),
            stuck,
        })
    }

    /// Creates an unresolved-reference error.
    #[must_use]
    pub fn unresolved_reference(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnresolvedReference {
            namespace: namespace.into(),
            name: name.into(),
        })
    }

    /// Creates an internal error (logic bug in this engine, not bad input).
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A concrete-concrete dependency cycle survived every cycle-break sweep.
    /// The namespace's ordering is aborted; other namespaces are unaffected.
    #[error("malformed dependency graph in namespace '{namespace}': {} entities stuck on concrete cycles: {}", stuck.len(), stuck.join(", "))]
    MalformedGraph {
        /// The namespace whose ordering failed.
        namespace: String,
        /// Names still waiting on a concrete dependency, in discovery order.
        stuck: Vec<String>,
    },

    /// A named reference resolved in neither the namespace's own index nor
    /// the global registry. Non-fatal: classification degrades to
    /// "no dependency" and the reference is reported as a warning.
    #[error("unresolved type reference '{name}' in namespace '{namespace}'")]
    UnresolvedReference {
        /// The namespace doing the referencing.
        namespace: String,
        /// The name that could not be resolved.
        name: String,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}
