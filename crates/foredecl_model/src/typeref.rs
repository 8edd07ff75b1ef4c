//! The recursive type-reference model.
//!
//! Every outgoing reference an entity holds - a field type, an argument type,
//! a return type, a base type - is a [`TypeRef`]. Pointer and array nesting is
//! arbitrarily deep; the ordering engine only ever cares about the
//! pointer-stripped base and how many pointer levels were removed to reach it.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Primitive
// =============================================================================

/// Scalar type kinds already decoded from the metadata.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Primitive {
    /// The untyped unit, also the pointee of untyped pointers.
    Void,
    /// Boolean.
    Bool,
    /// UTF-16 code unit.
    Char16,
    /// 8-bit signed integer.
    Int8,
    /// 8-bit unsigned integer.
    UInt8,
    /// 16-bit signed integer.
    Int16,
    /// 16-bit unsigned integer.
    UInt16,
    /// 32-bit signed integer.
    Int32,
    /// 32-bit unsigned integer.
    UInt32,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit unsigned integer.
    UInt64,
    /// Pointer-sized signed integer.
    IntPtr,
    /// Pointer-sized unsigned integer.
    UIntPtr,
    /// 32-bit float.
    Float32,
    /// 64-bit float.
    Float64,
    /// Decoded wide (UTF-16) string pointer.
    WideStr,
    /// Decoded byte (ANSI) string pointer.
    ByteStr,
}

impl Primitive {
    /// Returns true for the fixed-size numeric/boolean kinds.
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        !matches!(self, Self::Void | Self::WideStr | Self::ByteStr)
    }

    /// Returns true for the decoded string-pointer kinds.
    #[must_use]
    pub const fn is_string_pointer(self) -> bool {
        matches!(self, Self::WideStr | Self::ByteStr)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Void => "void",
            Self::Bool => "bool",
            Self::Char16 => "char16",
            Self::Int8 => "i8",
            Self::UInt8 => "u8",
            Self::Int16 => "i16",
            Self::UInt16 => "u16",
            Self::Int32 => "i32",
            Self::UInt32 => "u32",
            Self::Int64 => "i64",
            Self::UInt64 => "u64",
            Self::IntPtr => "iptr",
            Self::UIntPtr => "uptr",
            Self::Float32 => "f32",
            Self::Float64 => "f64",
            Self::WideStr => "wstr",
            Self::ByteStr => "zstr",
        };
        write!(f, "{name}")
    }
}

// =============================================================================
// TypeName
// =============================================================================

/// A namespace-qualified reference to a declared type by name.
///
/// The namespace is already final: any rename or relocation policy has been
/// applied by the collaborator that built the entity graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeName {
    /// Owning namespace (lowercased by the graph builder).
    pub namespace: String,
    /// Declared name within the namespace.
    pub name: String,
}

impl TypeName {
    /// Creates a qualified type name.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// =============================================================================
// Array bounds
// =============================================================================

/// One rank of an array: explicit lower bound and element count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArrayDim {
    /// Lower bound of this rank.
    pub lower: i32,
    /// Number of elements in this rank.
    pub length: u32,
}

impl ArrayDim {
    /// Creates a dimension starting at zero.
    #[must_use]
    pub const fn of(length: u32) -> Self {
        Self { lower: 0, length }
    }
}

/// Multi-rank array bounds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArrayBounds {
    /// Per-rank dimensions, outermost first.
    pub dims: Vec<ArrayDim>,
}

impl ArrayBounds {
    /// Creates single-rank bounds of the given length.
    #[must_use]
    pub fn single(length: u32) -> Self {
        Self {
            dims: vec![ArrayDim::of(length)],
        }
    }

    /// Number of ranks.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }
}

// =============================================================================
// TypeRef
// =============================================================================

/// A type reference as it appears in an entity's body.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeRef {
    /// A primitive scalar or string-pointer kind.
    Primitive(Primitive),
    /// Pointer to an inner type.
    Pointer(Box<TypeRef>),
    /// Fixed-bounds array of an element type.
    Array(Box<TypeRef>, ArrayBounds),
    /// Reference to a declared type by qualified name.
    Named(TypeName),
}

impl TypeRef {
    /// Creates a pointer to `inner`.
    #[must_use]
    pub fn pointer(inner: TypeRef) -> Self {
        Self::Pointer(Box::new(inner))
    }

    /// Creates an array of `element` with the given bounds.
    #[must_use]
    pub fn array(element: TypeRef, bounds: ArrayBounds) -> Self {
        Self::Array(Box::new(element), bounds)
    }

    /// Creates a named reference.
    #[must_use]
    pub fn named(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Named(TypeName::new(namespace, name))
    }

    /// Strips all pointer levels, returning the base and how many were removed.
    #[must_use]
    pub fn strip_pointers(&self) -> (&TypeRef, usize) {
        let mut current = self;
        let mut levels = 0;
        while let Self::Pointer(inner) = current {
            current = inner;
            levels += 1;
        }
        (current, levels)
    }

    /// Unwraps one array layer to its element type, or returns self.
    #[must_use]
    pub fn element_type(&self) -> &TypeRef {
        match self {
            Self::Array(element, _) => element,
            other => other,
        }
    }

    /// Re-wraps a type in `levels` pointer levels.
    #[must_use]
    pub fn wrap_pointers(self, levels: usize) -> Self {
        (0..levels).fold(self, |ty, _| Self::pointer(ty))
    }

    /// Returns the named base if this is (a pointer/array chain over) a name.
    #[must_use]
    pub fn named_base(&self) -> Option<&TypeName> {
        let (base, _) = self.element_type().strip_pointers();
        match base.element_type() {
            Self::Named(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    /// Stable textual form, used as the forward-declaration registry key.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{p}"),
            Self::Pointer(inner) => write!(f, "{inner} ptr"),
            Self::Array(element, bounds) => {
                write!(f, "{element}")?;
                for dim in &bounds.dims {
                    write!(f, "[{}..{}]", dim.lower, i64::from(dim.lower) + i64::from(dim.length))?;
                }
                Ok(())
            }
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
