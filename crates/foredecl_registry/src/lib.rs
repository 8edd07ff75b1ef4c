//! Per-namespace entity batches and the global type registry for Foredecl.
//!
//! This crate provides:
//! - [`NamespaceEntries`] - One namespace's insertion-ordered entity batch
//! - [`GlobalRegistry`] - Read-only name→kind/alias resolution across namespaces
//! - [`KindSet`] - The kinds a case-insensitive name resolves to
//!
//! The registry follows a strict two-phase protocol: phase 1 populates every
//! namespace's entries and the global registry; phase 2 orders each namespace
//! independently, reading the registry but never writing it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entries;
pub mod global;
pub mod kinds;

pub use entries::{EntityIx, NamespaceEntries};
pub use global::GlobalRegistry;
pub use kinds::KindSet;
