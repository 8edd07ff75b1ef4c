//! Integration tests for the model layer.
//!
//! Tests for type references, entities, and error types.

mod typerefs;
