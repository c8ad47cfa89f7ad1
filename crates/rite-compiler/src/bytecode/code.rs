//! Instruction byte buffer for one scope.
//!
//! A `CodeBuffer` accumulates the emitted instruction bytes of a single
//! scope. It only ever appends; the one exception is [`CodeBuffer::patch_i16`],
//! which rewrites a previously reserved jump operand once its target is known.

use rite_core::{CodegenError, CodegenResult};

/// Append-only byte buffer with bounds-checked operand patching.
#[derive(Debug, Clone)]
pub struct CodeBuffer {
    code: Vec<u8>,
    /// Capacity is grown in multiples of this many bytes.
    chunk: usize,
}

impl CodeBuffer {
    /// Create an empty buffer growing in `chunk`-byte steps.
    pub fn new(chunk: usize) -> Self {
        Self {
            code: Vec::with_capacity(chunk),
            chunk: chunk.max(1),
        }
    }

    fn reserve_for(&mut self, additional: usize) {
        let free = self.code.capacity() - self.code.len();
        if free < additional {
            let steps = (additional - free).div_ceil(self.chunk);
            self.code.reserve_exact(steps * self.chunk);
        }
    }

    /// Append one byte.
    pub fn push(&mut self, byte: u8) {
        self.reserve_for(1);
        self.code.push(byte);
    }

    /// Append a byte sequence.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.reserve_for(bytes.len());
        self.code.extend_from_slice(bytes);
    }

    /// Append a 16-bit operand (big-endian).
    pub fn push_u16(&mut self, value: u16) {
        self.extend(&value.to_be_bytes());
    }

    /// Absolute write position: number of bytes emitted so far.
    pub fn position(&self) -> usize {
        self.code.len()
    }

    /// Overwrite two bytes at `at` with a signed 16-bit operand (big-endian).
    pub fn patch_i16(&mut self, at: usize, value: i16) -> CodegenResult<()> {
        let len = self.code.len();
        let slot = at
            .checked_add(2)
            .and_then(|end| self.code.get_mut(at..end))
            .ok_or(CodegenError::PatchOutOfBounds { at, len })?;
        slot.copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    /// Read a 16-bit operand at the given offset (big-endian).
    pub fn read_i16(&self, at: usize) -> Option<i16> {
        let bytes = self.code.get(at..at.checked_add(2)?)?;
        Some(i16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Read a byte at the given offset.
    pub fn read_byte(&self, at: usize) -> Option<u8> {
        self.code.get(at).copied()
    }

    /// The bytes emitted so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Flatten into the immutable instruction buffer.
    pub fn into_boxed(self) -> Box<[u8]> {
        self.code.into_boxed_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_empty() {
        let code = CodeBuffer::new(25);
        assert!(code.is_empty());
        assert_eq!(code.position(), 0);
    }

    #[test]
    fn push_and_extend_preserve_order() {
        let mut code = CodeBuffer::new(4);
        code.push(1);
        code.extend(&[2, 3, 4, 5, 6]);
        code.push(7);

        assert_eq!(code.as_bytes(), &[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(code.position(), 7);
    }

    #[test]
    fn growth_is_chunked() {
        let mut code = CodeBuffer::new(25);
        code.extend(&[0; 30]);
        assert_eq!(code.len(), 30);
        assert!(code.code.capacity() >= 50);
    }

    #[test]
    fn push_u16_big_endian() {
        let mut code = CodeBuffer::new(25);
        code.push_u16(0x1234);
        assert_eq!(code.as_bytes(), &[0x12, 0x34]);
    }

    #[test]
    fn patch_overwrites_only_operand() {
        let mut code = CodeBuffer::new(25);
        code.extend(&[9, 0, 0, 9]);
        code.patch_i16(1, -2).unwrap();

        assert_eq!(code.as_bytes(), &[9, 0xFF, 0xFE, 9]);
        assert_eq!(code.read_i16(1), Some(-2));
    }

    #[test]
    fn patch_out_of_bounds() {
        let mut code = CodeBuffer::new(25);
        code.push(0);
        assert_eq!(
            code.patch_i16(0, 1),
            Err(CodegenError::PatchOutOfBounds { at: 0, len: 1 })
        );
        assert!(code.patch_i16(usize::MAX, 1).is_err());
    }

    #[test]
    fn read_out_of_bounds() {
        let code = CodeBuffer::new(25);
        assert_eq!(code.read_byte(0), None);
        assert_eq!(code.read_i16(0), None);
    }
}
