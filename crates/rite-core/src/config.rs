//! Code generator configuration.
//!
//! The defaults describe the embedded target VM: 8-bit register operands
//! and 16-bit relative jump operands. Tests and alternative targets can
//! narrow the limits with the `with_*` setters.

use crate::format::CODE_POOL_SIZE;
use crate::{CodegenError, CodegenResult};

/// Limits and tuning knobs shared by every scope of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodegenConfig {
    /// Maximum number of simultaneously live registers.
    pub register_limit: u16,
    /// Growth step of the per-scope code buffer in bytes.
    pub code_chunk: usize,
    /// Largest backward distance a relative jump may encode.
    pub jump_min: i32,
    /// Largest forward distance a relative jump may encode.
    pub jump_max: i32,
}

impl CodegenConfig {
    /// Configuration for the default target VM.
    pub const fn new() -> Self {
        Self {
            register_limit: 256,
            code_chunk: CODE_POOL_SIZE,
            jump_min: i16::MIN as i32,
            jump_max: i16::MAX as i32,
        }
    }

    /// Override the register limit.
    pub fn with_register_limit(mut self, limit: u16) -> Self {
        self.register_limit = limit;
        self
    }

    /// Override the code buffer growth step.
    pub fn with_code_chunk(mut self, chunk: usize) -> Self {
        self.code_chunk = chunk;
        self
    }

    /// Override the encodable jump range.
    pub fn with_jump_range(mut self, min: i32, max: i32) -> Self {
        self.jump_min = min;
        self.jump_max = max;
        self
    }

    /// Check that the configuration is usable.
    ///
    /// Registers are addressed by a one-byte operand, so the limit can be at
    /// most 256; jump bounds must fit the two-byte operand.
    pub fn validate(&self) -> CodegenResult<()> {
        if self.register_limit == 0 || self.register_limit > 256 {
            return Err(CodegenError::invalid_config(format!(
                "register limit {} outside 1..=256",
                self.register_limit
            )));
        }
        if self.code_chunk == 0 {
            return Err(CodegenError::invalid_config("code chunk must be non-zero"));
        }
        if self.jump_min > 0
            || self.jump_max < 0
            || self.jump_min < i16::MIN as i32
            || self.jump_max > i16::MAX as i32
        {
            return Err(CodegenError::invalid_config(format!(
                "jump range {}..={} does not fit a 16-bit operand",
                self.jump_min, self.jump_max
            )));
        }
        Ok(())
    }
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self::new()
    }
}
