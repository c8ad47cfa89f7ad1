//! Byte layout of a finished scope's IREP record.
//!
//! The serializer writes the records; the generator only has to know how
//! large they will be so that offsets can be computed before anything is
//! written. A record is laid out as:
//!
//! ```text
//! header            IREP_HEADER_SIZE
//! catch count       u16
//! handlers          EXC_HANDLER_SIZE * count
//! instructions      ilen
//! literal count     u16
//! literals          tag u8 + payload, per entry
//! symbol count      u16
//! symbols           len u16 + bytes + NUL, per entry
//! ```

use rite_core::format::{IREP_HEADER_SIZE, RITE_FOOTER_SIZE, RITE_HEADER_SIZE};
use rite_core::{CodegenError, CodegenResult, LiteralType};

use super::{ExcHandlerTable, Literal, LiteralPool};

/// A serialized name-table record: length-prefixed bytes.
///
/// Symbols and local variable names share this shape on disk; the register
/// number of a local is generator metadata and is not part of the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    len: u16,
    bytes: Box<[u8]>,
}

impl NameRecord {
    /// Build a record, failing if the name does not fit the u16 prefix.
    pub fn from_name(name: &str) -> CodegenResult<Self> {
        let len = u16::try_from(name.len())
            .map_err(|_| CodegenError::NameTooLong { len: name.len() })?;
        Ok(Self {
            len,
            bytes: name.as_bytes().into(),
        })
    }

    pub fn len(&self) -> u16 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size on disk: length prefix, bytes, NUL terminator.
    pub fn encoded_size(&self) -> usize {
        2 + self.len as usize + 1
    }
}

/// On-disk size of one literal-pool entry, tag byte included.
pub fn literal_size(literal: &Literal) -> usize {
    let payload = match literal.ty() {
        LiteralType::String | LiteralType::SString => 2 + literal.value().len() + 1,
        LiteralType::Int32 => 4,
        LiteralType::Int64 | LiteralType::Float => 8,
        // length byte, sign/base byte, digits
        LiteralType::BigInt => 2 + literal.value().len(),
    };
    1 + payload
}

/// Size of the literal section, count prefix included.
pub fn literal_section_size(pool: &LiteralPool) -> usize {
    2 + pool.literals().iter().map(literal_size).sum::<usize>()
}

/// Size of the symbol section, count prefix included.
pub fn symbol_section_size<'a>(names: impl IntoIterator<Item = &'a str>) -> usize {
    2 + names
        .into_iter()
        .map(|name| 2 + name.len() + 1)
        .sum::<usize>()
}

/// Size of one scope's record, excluding its children.
pub fn record_size<'a>(
    ilen: usize,
    handlers: &ExcHandlerTable,
    literals: &LiteralPool,
    symbols: impl IntoIterator<Item = &'a str>,
) -> usize {
    IREP_HEADER_SIZE
        + handlers.encoded_size()
        + ilen
        + literal_section_size(literals)
        + symbol_section_size(symbols)
}

/// Size of the whole container given the total size of the record tree.
pub fn container_size(tree_size: usize) -> usize {
    RITE_HEADER_SIZE + tree_size + RITE_FOOTER_SIZE
}
