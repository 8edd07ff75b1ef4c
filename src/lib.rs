//! Foredecl - Declaration ordering and cycle-breaking for code generation
//!
//! This crate re-exports all layers of the Foredecl system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: foredecl_order    — Dependency classifier, scheduler, forward declarations
//! Layer 1: foredecl_registry — Per-namespace entries, global type registry
//! Layer 0: foredecl_model    — Type references, entities, errors
//! ```

pub use foredecl_model as model;
pub use foredecl_order as order;
pub use foredecl_registry as registry;
