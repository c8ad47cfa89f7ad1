//! Jump labels and deferred operand patching.
//!
//! A jump whose target is not known yet is emitted with a two-byte
//! placeholder operand. The returned [`JmpLabel`] remembers where that
//! operand lives; resolving the label later overwrites exactly those two
//! bytes with the distance from the end of the operand to the target.

use std::collections::VecDeque;

use log::trace;
use rite_core::{CodegenConfig, CodegenError, CodegenResult, LabelId};

use crate::bytecode::CodeBuffer;

/// A reserved jump operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JmpLabel {
    id: LabelId,
    /// Position of the first placeholder byte.
    operand_at: u32,
    /// Position right after the operand; offsets are relative to it.
    pos: u32,
}

impl JmpLabel {
    pub fn id(&self) -> LabelId {
        self.id
    }

    pub fn operand_at(&self) -> u32 {
        self.operand_at
    }

    pub fn pos(&self) -> u32 {
        self.pos
    }
}

#[derive(Debug, Clone)]
struct LabelSlot {
    label: JmpLabel,
    target: Option<u32>,
}

/// Label registry and pending-backpatch queue of one scope.
#[derive(Debug, Clone, Default)]
pub struct Backpatches {
    slots: Vec<LabelSlot>,
    /// Registered forward jumps, oldest first.
    pending: VecDeque<LabelId>,
    unresolved: usize,
}

impl Backpatches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a placeholder operand at the end of `code` and label it.
    pub fn reserve(&mut self, code: &mut CodeBuffer) -> JmpLabel {
        let operand_at = position(code);
        code.push_u16(0);
        let label = JmpLabel {
            id: LabelId::new(self.slots.len() as u32),
            operand_at,
            pos: position(code),
        };
        self.slots.push(LabelSlot {
            label,
            target: None,
        });
        self.unresolved += 1;
        label
    }

    /// Queue `label` for later resolution.
    pub fn push(&mut self, label: JmpLabel) -> CodegenResult<()> {
        self.slot(label)?;
        self.pending.push_back(label.id);
        Ok(())
    }

    /// Remove and return the oldest queued label.
    pub fn shift(&mut self) -> Option<JmpLabel> {
        let id = self.pending.pop_front()?;
        self.slots.get(id.index() as usize).map(|slot| slot.label)
    }

    /// Resolve `label` to `target`, patching its operand in `code`.
    ///
    /// Every queued entry for the label is dropped from the queue.
    pub fn resolve(
        &mut self,
        code: &mut CodeBuffer,
        label: JmpLabel,
        target: u32,
        config: &CodegenConfig,
    ) -> CodegenResult<()> {
        let slot = self.slot(label)?;
        if slot.target.is_some() {
            return Err(CodegenError::LabelAlreadyResolved {
                id: label.id.index(),
            });
        }
        let stored = slot.label;

        let distance = target as i64 - stored.pos as i64;
        if distance < config.jump_min as i64 || distance > config.jump_max as i64 {
            return Err(CodegenError::JumpOutOfRange {
                from: stored.pos,
                to: target,
            });
        }
        code.patch_i16(stored.operand_at as usize, distance as i16)?;
        trace!("resolved {} at {} -> {} ({:+})", stored.id, stored.pos, target, distance);

        self.slots[label.id.index() as usize].target = Some(target);
        self.unresolved -= 1;
        self.pending.retain(|id| *id != label.id);
        Ok(())
    }

    /// Look up the slot of a label issued by this registry.
    fn slot(&self, label: JmpLabel) -> CodegenResult<&LabelSlot> {
        self.slots
            .get(label.id.index() as usize)
            .filter(|slot| slot.label == label)
            .ok_or(CodegenError::UnknownLabel {
                id: label.id.index(),
            })
    }

    /// Resolved target of a label, if any.
    pub fn target(&self, label: JmpLabel) -> Option<u32> {
        self.slots
            .get(label.id.index() as usize)
            .and_then(|slot| slot.target)
    }

    /// Labels reserved but not yet resolved.
    pub fn unresolved(&self) -> usize {
        self.unresolved
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

fn position(code: &CodeBuffer) -> u32 {
    u32::try_from(code.position()).unwrap_or(u32::MAX)
}
