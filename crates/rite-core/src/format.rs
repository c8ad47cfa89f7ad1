//! Constants and tags of the RITE binary container.
//!
//! Only the parts the code generator needs to size and tag its tables live
//! here; writing the container itself belongs to the serializer.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Fixed size of the container file header.
pub const RITE_HEADER_SIZE: usize = 32;

/// Fixed size of the container footer.
pub const RITE_FOOTER_SIZE: usize = 8;

/// Fixed size of the per-unit IREP record header
/// (record size u32, nlocals u16, nregs u16, rlen u16, ilen u32).
pub const IREP_HEADER_SIZE: usize = 14;

/// Size of one exception-table entry (kind u8, begin u32, end u32, target u32).
pub const EXC_HANDLER_SIZE: usize = 13;

/// Payload capacity of one code chunk; used as the code buffer growth step.
pub const CODE_POOL_SIZE: usize = 25;

/// Pool tag flag marking a numeric (non-string) literal.
pub const IREP_TT_NFLAG: u32 = 1;

/// Pool tag flag marking a static (non-owned) string literal.
pub const IREP_TT_SFLAG: u32 = 2;

/// Constant-pool entry kinds.
///
/// The discriminants are the on-disk tag values. String kinds additionally
/// carry their byte length in the tag's high bits, see
/// [`LiteralType::tag_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum LiteralType {
    /// Heap string owned by the unit.
    String = 0,
    /// 32-bit integer.
    Int32 = 1,
    /// Static string, not owned by the unit.
    SString = 2,
    /// 64-bit integer.
    Int64 = 3,
    /// Double-precision float.
    Float = 5,
    /// Arbitrary-precision integer, stored as digit text.
    BigInt = 7,
}

impl LiteralType {
    /// Whether this kind is one of the two string kinds.
    #[inline]
    pub fn is_string(self) -> bool {
        u32::from(u8::from(self)) & IREP_TT_NFLAG == 0
    }

    /// Whether this kind is a static string.
    #[inline]
    pub fn is_static(self) -> bool {
        self.is_string() && u32::from(u8::from(self)) & IREP_TT_SFLAG != 0
    }

    /// Compute the stored tag for a value of `len` bytes.
    ///
    /// Numeric kinds use the bare type; strings shift the length into the
    /// bits above the two flag bits.
    pub fn tag_for(self, len: usize) -> u32 {
        let ty = u32::from(u8::from(self));
        if self.is_string() {
            ty | ((len as u32) << 2)
        } else {
            ty
        }
    }

    /// Recover the literal kind from a stored tag.
    pub fn from_tag(tag: u32) -> Option<Self> {
        if tag & IREP_TT_NFLAG == 0 {
            LiteralType::try_from((tag & 0b11) as u8).ok()
        } else {
            LiteralType::try_from(tag as u8).ok()
        }
    }
}

/// Kind of an exception-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum CatchKind {
    /// Handler entered for matching exceptions.
    Rescue = 0,
    /// Handler entered on every exit from the region.
    Ensure = 1,
}
