//! Arena handles.
//!
//! Scopes link to each other through [`ScopeId`] and jump sites are named by
//! [`LabelId`]. Both are plain positions in an append-only vector: the
//! scope tree never compacts its arena and a scope never forgets a label,
//! so a stale handle fails lookup instead of pointing at someone else.

use std::fmt;

macro_rules! arena_index {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Position in the owning arena.
            #[inline]
            pub const fn index(self) -> u32 {
                self.0
            }

            /// The handle issued right after this one.
            #[inline]
            pub const fn next(self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

arena_index!(
    /// A method, block, or class body in a scope tree.
    ///
    /// ```
    /// use rite_core::ScopeId;
    ///
    /// let root = ScopeId::new(0);
    /// assert!(root < root.next());
    /// ```
    ScopeId,
    "scope_"
);

arena_index!(
    /// A reserved jump operand, local to the scope that reserved it.
    LabelId,
    "L"
);
