//! Declaration ordering and cycle breaking for Foredecl.
//!
//! This crate provides:
//! - [`DependencySet`] and the edge-strength rules behind it
//! - [`Scheduler`] / [`order_namespace`] - Phase-ordered topological
//!   scheduling with pointer-cycle breaking
//! - [`ForwardDecls`] - Forward-declaration bookkeeping for emitters
//!
//! The contract: feed one namespace's [`NamespaceEntries`] and the populated
//! [`GlobalRegistry`] to [`order_namespace`]; walk the returned schedule in
//! order, routing flagged entities' references through a [`ForwardDecls`].
//! Every target a declaration needs concretely precedes it; surviving
//! concrete cycles abort with a malformed-graph error.
//!
//! [`NamespaceEntries`]: foredecl_registry::NamespaceEntries
//! [`GlobalRegistry`]: foredecl_registry::GlobalRegistry

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod classify;
pub mod forward;
pub mod scheduler;

pub use classify::{Dependency, DependencyKind, DependencySet};
pub use forward::{ForwardDecl, ForwardDecls, ForwardRequest};
pub use scheduler::{order_namespace, Schedule, ScheduledEntity, Scheduler, Warning};
