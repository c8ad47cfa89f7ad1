//! Break and retry control stacks.
//!
//! Each scope keeps two independent stacks: one frame per active loop (for
//! `break`, `next` and `redo`) and one frame per active rescue body that
//! supports `retry`. Popping always closes the innermost frame. Choosing
//! which frame a particular `break` targets is left to the caller.

use rite_core::{CodegenError, CodegenResult, ControlStack};

use super::JmpLabel;

/// Frame of one active loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakFrame {
    /// Start of the loop body, the `redo` target.
    pub redo_pos: u32,
    /// Resume position after the loop, known once the frame is closed.
    pub next_pos: Option<u32>,
    /// Pending `break` jumps to patch when the loop exits.
    pub exits: Vec<JmpLabel>,
}

/// Frame of one active retry-capable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryFrame {
    /// Position `retry` jumps back to.
    pub pos: u32,
}

/// Both control stacks of a scope (innermost frame last).
#[derive(Debug, Clone, Default)]
pub struct ControlStacks {
    breaks: Vec<BreakFrame>,
    retries: Vec<RetryFrame>,
}

impl ControlStacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a loop whose body starts at `redo_pos`.
    pub fn push_break(&mut self, redo_pos: u32) {
        self.breaks.push(BreakFrame {
            redo_pos,
            next_pos: None,
            exits: Vec::new(),
        });
    }

    /// Register a `break` jump against the innermost loop.
    pub fn add_break_exit(&mut self, label: JmpLabel) -> CodegenResult<()> {
        let frame = self
            .breaks
            .last_mut()
            .ok_or(CodegenError::StackFrameUnderflow {
                stack: ControlStack::Break,
            })?;
        frame.exits.push(label);
        Ok(())
    }

    /// Close the innermost loop at `next_pos`.
    ///
    /// Returns the frame; its exits still have to be patched to `next_pos`.
    pub fn pop_break(&mut self, next_pos: u32) -> CodegenResult<BreakFrame> {
        let mut frame = self.breaks.pop().ok_or(CodegenError::StackFrameUnderflow {
            stack: ControlStack::Break,
        })?;
        frame.next_pos = Some(next_pos);
        Ok(frame)
    }

    pub fn break_top(&self) -> Option<&BreakFrame> {
        self.breaks.last()
    }

    /// Enter a retry-capable region that restarts at `pos`.
    pub fn push_retry(&mut self, pos: u32) {
        self.retries.push(RetryFrame { pos });
    }

    pub fn pop_retry(&mut self) -> CodegenResult<RetryFrame> {
        self.retries.pop().ok_or(CodegenError::StackFrameUnderflow {
            stack: ControlStack::Retry,
        })
    }

    pub fn retry_top(&self) -> Option<&RetryFrame> {
        self.retries.last()
    }

    pub fn break_depth(&self) -> usize {
        self.breaks.len()
    }

    pub fn retry_depth(&self) -> usize {
        self.retries.len()
    }

    /// Fail if any frame is still open.
    pub fn ensure_closed(&self) -> CodegenResult<()> {
        if !self.breaks.is_empty() {
            return Err(CodegenError::UnclosedControlFrame {
                stack: ControlStack::Break,
                depth: self.breaks.len(),
            });
        }
        if !self.retries.is_empty() {
            return Err(CodegenError::UnclosedControlFrame {
                stack: ControlStack::Retry,
                depth: self.retries.len(),
            });
        }
        Ok(())
    }
}
