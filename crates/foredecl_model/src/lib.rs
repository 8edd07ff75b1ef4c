//! Type references, entities, and errors for Foredecl.
//!
//! This crate provides:
//! - [`TypeRef`] - The recursive type-reference model
//! - [`Entity`] - Schedulable declaration units
//! - [`Error`] - Error types with namespace context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod typeref;

pub use entity::{
    Arch, ArchSet, ConstValue, ConstantDef, Entity, EntityKind, EnumDef, EnumMember, Field,
    FunctionDef, FunctionPointerDef, InterfaceDef, Method, Signature, StructDef,
};
pub use error::{Error, ErrorKind, Result};
pub use typeref::{ArrayBounds, ArrayDim, Primitive, TypeName, TypeRef};
