//! Emission bookkeeping shared by every scope.
//!
//! - [`label`]: jump labels and deferred operand patching
//! - [`control`]: break/retry frames for loops and rescue bodies
//! - [`splat`]: array and argument-list generation state

pub mod control;
pub mod label;
pub mod splat;

pub use control::{BreakFrame, ControlStacks, RetryFrame};
pub use label::{Backpatches, JmpLabel};
pub use splat::{ArrayGen, ArrayShape, ArrayStatus, SplatStatus};
