//! Packed parameter signature of a scope.
//!
//! The VM's method entry instruction takes the whole signature as one
//! 23-bit operand:
//!
//! ```text
//! 22..18 required | 17..13 optional | 12 rest | 11..7 post | 6..2 keywords | 1 kwrest | 0 block
//! ```

use bitflags::bitflags;
use rite_core::{CodegenError, CodegenResult};

bitflags! {
    /// Single-bit parts of the packed signature, at their packed positions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ParamFlags: u32 {
        /// Takes a `*rest` parameter.
        const REST = 1 << 12;
        /// Takes a `**kwrest` parameter.
        const KEYWORD_REST = 1 << 1;
        /// Takes an explicit `&block` parameter.
        const BLOCK = 1;
    }
}

const COUNT_MAX: u8 = 0x1f;

/// Parameter signature of a method or block scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParameterSpec {
    pub required: u8,
    pub optional: u8,
    pub post: u8,
    pub keywords: u8,
    pub flags: ParamFlags,
}

impl ParameterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pack into the entry operand, checking every count fits 5 bits.
    pub fn pack(&self) -> CodegenResult<u32> {
        let field = |what: &'static str, count: u8| {
            if count > COUNT_MAX {
                Err(CodegenError::ParameterOverflow {
                    what,
                    count: count as usize,
                })
            } else {
                Ok(count as u32)
            }
        };
        Ok((field("required", self.required)? << 18)
            | (field("optional", self.optional)? << 13)
            | (field("post", self.post)? << 7)
            | (field("keyword", self.keywords)? << 2)
            | self.flags.bits())
    }

    /// Unpack an entry operand.
    pub fn unpack(packed: u32) -> Self {
        let count = |shift: u32| ((packed >> shift) & COUNT_MAX as u32) as u8;
        Self {
            required: count(18),
            optional: count(13),
            post: count(7),
            keywords: count(2),
            flags: ParamFlags::from_bits_truncate(packed),
        }
    }

    /// Number of registers the parameters occupy on entry.
    pub fn register_count(&self) -> usize {
        let mut n = self.required as usize + self.optional as usize + self.post as usize;
        if self.flags.contains(ParamFlags::REST) {
            n += 1;
        }
        if self.keywords > 0 || self.flags.contains(ParamFlags::KEYWORD_REST) {
            n += 1;
        }
        // block slot is always reserved
        n + 1
    }
}
