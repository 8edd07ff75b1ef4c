//! The set of kinds a name resolves to.
//!
//! One case-insensitive name can legally be several kinds at once - a constant
//! and a function sharing a name, for instance. Explicit membership flags
//! rather than an OR-ed bitmask.

use std::fmt;

use foredecl_model::EntityKind;

/// A small set of [`EntityKind`] values.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct KindSet {
    kinds: [bool; 6],
}

impl KindSet {
    const ALL: [EntityKind; 6] = [
        EntityKind::Constant,
        EntityKind::Enum,
        EntityKind::Struct,
        EntityKind::Interface,
        EntityKind::FunctionPointer,
        EntityKind::Function,
    ];

    const fn slot(kind: EntityKind) -> usize {
        match kind {
            EntityKind::Constant => 0,
            EntityKind::Enum => 1,
            EntityKind::Struct => 2,
            EntityKind::Interface => 3,
            EntityKind::FunctionPointer => 4,
            EntityKind::Function => 5,
        }
    }

    /// The empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { kinds: [false; 6] }
    }

    /// A single-kind set.
    #[must_use]
    pub const fn of(kind: EntityKind) -> Self {
        let mut set = Self::new();
        set.kinds[Self::slot(kind)] = true;
        set
    }

    /// Adds a kind.
    pub const fn insert(&mut self, kind: EntityKind) {
        self.kinds[Self::slot(kind)] = true;
    }

    /// Membership test.
    #[must_use]
    pub const fn contains(self, kind: EntityKind) -> bool {
        self.kinds[Self::slot(kind)]
    }

    /// Returns true if no kind is set.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.kinds.iter().all(|&k| !k)
    }

    /// Iterates the contained kinds in declaration order.
    pub fn iter(self) -> impl Iterator<Item = EntityKind> {
        Self::ALL.into_iter().filter(move |&k| self.contains(k))
    }
}

impl FromIterator<EntityKind> for KindSet {
    fn from_iter<I: IntoIterator<Item = EntityKind>>(iter: I) -> Self {
        let mut set = Self::new();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl fmt::Display for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for kind in self.iter() {
            if !first {
                write!(f, "|")?;
            }
            write!(f, "{kind}")?;
            first = false;
        }
        Ok(())
    }
}
