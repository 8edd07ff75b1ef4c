//! Schedulable declaration units.
//!
//! Entities are immutable inputs to the ordering engine: the graph builder
//! hands over one insertion-ordered batch per namespace, each entity already
//! annotated with its outgoing [`TypeRef`]s. Names are unique within a
//! namespace after case-insensitive comparison.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::typeref::{Primitive, TypeName, TypeRef};

// =============================================================================
// Architecture variants
// =============================================================================

/// A target CPU architecture a declaration may be specific to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Arch {
    /// 32-bit x86.
    X86,
    /// 64-bit x86.
    X64,
    /// 64-bit ARM.
    Arm64,
}

/// The set of architectures a declaration applies to.
///
/// Explicit membership flags rather than a bitmask; the scheduler never
/// inspects this beyond variant-group sanity checks, the emitter turns it
/// into architecture guards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArchSet {
    x86: bool,
    x64: bool,
    arm64: bool,
}

impl ArchSet {
    /// All architectures (the default for architecture-invariant entities).
    #[must_use]
    pub const fn all() -> Self {
        Self {
            x86: true,
            x64: true,
            arm64: true,
        }
    }

    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            x86: false,
            x64: false,
            arm64: false,
        }
    }

    /// A single-architecture set.
    #[must_use]
    pub const fn only(arch: Arch) -> Self {
        let mut set = Self::empty();
        match arch {
            Arch::X86 => set.x86 = true,
            Arch::X64 => set.x64 = true,
            Arch::Arm64 => set.arm64 = true,
        }
        set
    }

    /// Adds an architecture.
    #[must_use]
    pub const fn with(mut self, arch: Arch) -> Self {
        match arch {
            Arch::X86 => self.x86 = true,
            Arch::X64 => self.x64 = true,
            Arch::Arm64 => self.arm64 = true,
        }
        self
    }

    /// Membership test.
    #[must_use]
    pub const fn contains(self, arch: Arch) -> bool {
        match arch {
            Arch::X86 => self.x86,
            Arch::X64 => self.x64,
            Arch::Arm64 => self.arm64,
        }
    }

    /// Returns true if no architecture is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        !(self.x86 || self.x64 || self.arm64)
    }

    /// Returns true if every architecture is set.
    #[must_use]
    pub const fn is_all(self) -> bool {
        self.x86 && self.x64 && self.arm64
    }

    /// Returns true if the two sets share no architecture.
    #[must_use]
    pub const fn is_disjoint(self, other: Self) -> bool {
        !((self.x86 && other.x86) || (self.x64 && other.x64) || (self.arm64 && other.arm64))
    }
}

impl Default for ArchSet {
    fn default() -> Self {
        Self::all()
    }
}

// =============================================================================
// EntityKind
// =============================================================================

/// The six schedulable entity kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntityKind {
    /// A named constant value.
    Constant,
    /// An enumeration; backing types are always primitive.
    Enum,
    /// A value type with fields.
    Struct,
    /// A virtual-dispatch interface; referenced only indirectly.
    Interface,
    /// A named function-pointer type.
    FunctionPointer,
    /// A free function declaration.
    Function,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Constant => "constant",
            Self::Enum => "enum",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::FunctionPointer => "function-pointer",
            Self::Function => "function",
        };
        write!(f, "{name}")
    }
}

// =============================================================================
// Building blocks
// =============================================================================

/// A named, typed slot: a struct field or a function argument.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Field {
    /// Slot name.
    pub name: String,
    /// Slot type.
    pub ty: TypeRef,
}

impl Field {
    /// Creates a field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Argument and return types of a callable.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Signature {
    /// Ordered arguments.
    pub args: Vec<Field>,
    /// Return type; `void` for procedures.
    pub ret: TypeRef,
}

impl Signature {
    /// Creates a signature.
    #[must_use]
    pub fn new(args: Vec<Field>, ret: TypeRef) -> Self {
        Self { args, ret }
    }

    /// All outgoing references: every argument type, then the return type.
    pub fn type_refs(&self) -> impl Iterator<Item = &TypeRef> {
        self.args.iter().map(|a| &a.ty).chain(std::iter::once(&self.ret))
    }
}

/// A constant's decoded value, carried opaquely for the emitter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConstValue {
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point.
    Float(f64),
    /// String literal.
    Str(String),
}

// =============================================================================
// Entity definitions
// =============================================================================

/// A named constant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstantDef {
    /// Constant name.
    pub name: String,
    /// The value's type; the constant's only outgoing reference.
    pub ty: TypeRef,
    /// Decoded value.
    pub value: ConstValue,
}

/// One enum member.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnumMember {
    /// Member name.
    pub name: String,
    /// Member value.
    pub value: i64,
}

/// An enumeration. Backing types are always primitive, so enums never carry
/// scheduling dependencies.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnumDef {
    /// Enum name.
    pub name: String,
    /// Primitive backing type.
    pub backing: Primitive,
    /// Ordered members.
    pub members: Vec<EnumMember>,
}

/// A value type with fields, possibly with anonymous nested inner types.
///
/// Nested inner types are not independent scheduling units; their field
/// references fold into the parent's reference list.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StructDef {
    /// Struct name.
    pub name: String,
    /// Ordered fields.
    pub fields: Vec<Field>,
    /// Anonymous nested inner types.
    pub nested: Vec<StructDef>,
    /// Architectures this shape applies to.
    pub arch: ArchSet,
}

impl StructDef {
    /// Creates an architecture-invariant struct.
    #[must_use]
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
            nested: Vec::new(),
            arch: ArchSet::all(),
        }
    }

    /// Restricts this shape to the given architectures.
    #[must_use]
    pub fn for_arch(mut self, arch: ArchSet) -> Self {
        self.arch = arch;
        self
    }

    /// Adds an anonymous nested inner type.
    #[must_use]
    pub fn with_nested(mut self, inner: StructDef) -> Self {
        self.nested.push(inner);
        self
    }
}

/// An interface method.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Method {
    /// Method name.
    pub name: String,
    /// Method signature.
    pub sig: Signature,
}

/// A virtual-dispatch interface.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterfaceDef {
    /// Interface name.
    pub name: String,
    /// Declared base interfaces. Deriving needs the base's full member
    /// layout, so these classify as concrete dependencies.
    pub bases: Vec<TypeName>,
    /// Ordered methods.
    pub methods: Vec<Method>,
}

/// A free function declaration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionDef {
    /// Function name.
    pub name: String,
    /// Signature.
    pub sig: Signature,
    /// Architectures this shape applies to.
    pub arch: ArchSet,
}

impl FunctionDef {
    /// Creates an architecture-invariant function.
    #[must_use]
    pub fn new(name: impl Into<String>, sig: Signature) -> Self {
        Self {
            name: name.into(),
            sig,
            arch: ArchSet::all(),
        }
    }
}

/// A named function-pointer type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionPointerDef {
    /// Type name.
    pub name: String,
    /// Pointed-to signature.
    pub sig: Signature,
    /// Architectures this shape applies to.
    pub arch: ArchSet,
}

impl FunctionPointerDef {
    /// Creates an architecture-invariant function pointer type.
    #[must_use]
    pub fn new(name: impl Into<String>, sig: Signature) -> Self {
        Self {
            name: name.into(),
            sig,
            arch: ArchSet::all(),
        }
    }
}

// =============================================================================
// Entity
// =============================================================================

/// One schedulable unit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Entity {
    /// A named constant.
    Constant(ConstantDef),
    /// An enumeration.
    Enum(EnumDef),
    /// A value type.
    Struct(StructDef),
    /// An interface.
    Interface(InterfaceDef),
    /// A named function-pointer type.
    FunctionPointer(FunctionPointerDef),
    /// A free function.
    Function(FunctionDef),
}

impl Entity {
    /// The entity's declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Constant(c) => &c.name,
            Self::Enum(e) => &e.name,
            Self::Struct(s) => &s.name,
            Self::Interface(i) => &i.name,
            Self::FunctionPointer(p) => &p.name,
            Self::Function(f) => &f.name,
        }
    }

    /// The entity's kind.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Constant(_) => EntityKind::Constant,
            Self::Enum(_) => EntityKind::Enum,
            Self::Struct(_) => EntityKind::Struct,
            Self::Interface(_) => EntityKind::Interface,
            Self::FunctionPointer(_) => EntityKind::FunctionPointer,
            Self::Function(_) => EntityKind::Function,
        }
    }

    /// The architectures this entity applies to; `all` for the
    /// architecture-invariant kinds.
    #[must_use]
    pub fn arch(&self) -> ArchSet {
        match self {
            Self::Struct(s) => s.arch,
            Self::FunctionPointer(p) => p.arch,
            Self::Function(f) => f.arch,
            Self::Constant(_) | Self::Enum(_) | Self::Interface(_) => ArchSet::all(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
