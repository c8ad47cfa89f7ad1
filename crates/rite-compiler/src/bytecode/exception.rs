//! Exception-handler table.
//!
//! Each protected region of a scope becomes one fixed-width record in the
//! order the regions are *closed*. Nested regions close innermost-first, so
//! an inner handler always precedes the handler of the region around it,
//! which is the lookup order the VM relies on.

use rite_core::format::EXC_HANDLER_SIZE;
use rite_core::{CatchKind, CodegenError, CodegenResult, PoolKind};

/// One exception-table record in its on-disk layout:
/// `kind u8 | begin u32 | end u32 | target u32`, big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExcHandler {
    table: [u8; EXC_HANDLER_SIZE],
}

impl ExcHandler {
    pub fn new(kind: CatchKind, begin: u32, end: u32, target: u32) -> Self {
        let mut table = [0u8; EXC_HANDLER_SIZE];
        table[0] = kind.into();
        table[1..5].copy_from_slice(&begin.to_be_bytes());
        table[5..9].copy_from_slice(&end.to_be_bytes());
        table[9..13].copy_from_slice(&target.to_be_bytes());
        Self { table }
    }

    /// The raw record bytes.
    pub fn as_bytes(&self) -> &[u8; EXC_HANDLER_SIZE] {
        &self.table
    }

    pub fn kind(&self) -> Option<CatchKind> {
        CatchKind::try_from(self.table[0]).ok()
    }

    pub fn begin(&self) -> u32 {
        self.word(1)
    }

    pub fn end(&self) -> u32 {
        self.word(5)
    }

    pub fn target(&self) -> u32 {
        self.word(9)
    }

    fn word(&self, at: usize) -> u32 {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.table[at..at + 4]);
        u32::from_be_bytes(bytes)
    }
}

/// An open protected region, waiting for its handler to be emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a protected region must be closed to produce its handler record"]
pub struct ProtectedRegion {
    begin: u32,
}

impl ProtectedRegion {
    pub(crate) fn new(begin: u32) -> Self {
        Self { begin }
    }

    /// Start of the protected range.
    pub fn begin(&self) -> u32 {
        self.begin
    }
}

/// Append-ordered exception table of one scope.
#[derive(Debug, Clone, Default)]
pub struct ExcHandlerTable {
    handlers: Vec<ExcHandler>,
}

impl ExcHandlerTable {
    pub fn push(&mut self, handler: ExcHandler) -> CodegenResult<()> {
        if self.handlers.len() >= u16::MAX as usize {
            return Err(CodegenError::PoolOverflow {
                pool: PoolKind::ExcHandler,
            });
        }
        self.handlers.push(handler);
        Ok(())
    }

    pub fn handlers(&self) -> &[ExcHandler] {
        &self.handlers
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Size of the table section: a u16 record count plus the records.
    pub fn encoded_size(&self) -> usize {
        2 + self.handlers.len() * EXC_HANDLER_SIZE
    }

    /// Write the table section: u16 record count, then records in order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_size());
        out.extend_from_slice(&(self.handlers.len() as u16).to_be_bytes());
        for handler in &self.handlers {
            out.extend_from_slice(handler.as_bytes());
        }
        out
    }
}
