//! Error types for RITE code generation.
//!
//! Every failure the scope and emission engine can detect is a variant of
//! [`CodegenError`]. Errors are reported synchronously to the tree-walking
//! emitter at the point of detection; none of them are retried here.
//!
//! ## Error Taxonomy
//!
//! ```text
//! CodegenError
//! ├── register stack   - RegisterOverflow, RegisterUnderflow
//! ├── locals           - DuplicateLocal
//! ├── jumps            - UnresolvedBackpatch, JumpOutOfRange, UnknownLabel, ...
//! ├── control frames   - StackFrameUnderflow, UnclosedControlFrame
//! ├── tables           - PoolOverflow, NameTooLong, ParameterOverflow
//! └── scope tree       - UnknownScope, ScopeFinished, UnfinishedChild, ...
//! ```
//!
//! Source locations are deliberately absent: the caller knows which node it
//! was emitting and attaches the location when it surfaces the error.

use std::fmt;

use thiserror::Error;

use crate::ScopeId;

/// Result alias used throughout the code generator.
pub type CodegenResult<T> = Result<T, CodegenError>;

/// Which of the two per-scope control stacks an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlStack {
    /// Loop / breakable-block frames.
    Break,
    /// Retry-capable rescue frames.
    Retry,
}

impl fmt::Display for ControlStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlStack::Break => write!(f, "break"),
            ControlStack::Retry => write!(f, "retry"),
        }
    }
}

/// Which interned table an overflow refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    Symbol,
    Literal,
    Lvar,
    ExcHandler,
    Children,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PoolKind::Symbol => "symbol",
            PoolKind::Literal => "literal",
            PoolKind::Lvar => "local variable",
            PoolKind::ExcHandler => "exception handler",
            PoolKind::Children => "child scope",
        };
        f.write_str(name)
    }
}

/// Errors raised while building per-scope bytecode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// Pushing would leave the register stack beyond the VM operand width.
    #[error("register stack overflow: more than {limit} registers required")]
    RegisterOverflow { limit: u16 },

    /// Popping more registers than are currently live.
    #[error("register stack underflow: cannot pop {requested} from sp {sp}")]
    RegisterUnderflow { sp: u16, requested: u16 },

    /// A local was declared twice in the same scope.
    #[error("local variable '{name}' already declared in this scope")]
    DuplicateLocal { name: String },

    /// Labels were still waiting for a target when the scope finished.
    #[error("{count} jump label(s) never resolved before finish")]
    UnresolvedBackpatch { count: usize },

    /// Popping a control frame that was never pushed.
    #[error("{stack} stack underflow: no open frame")]
    StackFrameUnderflow { stack: ControlStack },

    /// A control frame was still open when the scope finished.
    #[error("{depth} {stack} frame(s) still open at finish")]
    UnclosedControlFrame { stack: ControlStack, depth: usize },

    /// A relative jump does not fit the signed 16-bit operand.
    #[error("jump from {from} to {to} does not fit a 16-bit operand")]
    JumpOutOfRange { from: u32, to: u32 },

    /// A label handle that this scope never issued.
    #[error("unknown jump label #{id}")]
    UnknownLabel { id: u32 },

    /// A label can be resolved only once.
    #[error("jump label #{id} already resolved")]
    LabelAlreadyResolved { id: u32 },

    /// An operand write outside the emitted code.
    #[error("patch at {at} is outside the {len}-byte code buffer")]
    PatchOutOfBounds { at: usize, len: usize },

    /// An index no longer fits the 16-bit table operand.
    #[error("{pool} table overflow")]
    PoolOverflow { pool: PoolKind },

    /// A name longer than the 16-bit length prefix allows.
    #[error("name of {len} bytes exceeds the name-table record limit")]
    NameTooLong { len: usize },

    /// A parameter count does not fit its 5-bit field.
    #[error("too many {what} parameters: {count}")]
    ParameterOverflow { what: &'static str, count: usize },

    /// Closure lookup walked more scopes than the hop operand holds.
    #[error("variable lookup crossed more than 255 scopes")]
    NestingTooDeep,

    /// A scope id that is not (or no longer) in the tree.
    #[error("unknown scope {id}")]
    UnknownScope { id: ScopeId },

    /// Emission or finish attempted on an already finished scope.
    #[error("scope {id} is already finished")]
    ScopeFinished { id: ScopeId },

    /// Output requested from a scope that has not been finished.
    #[error("scope {id} is not finished")]
    ScopeNotFinished { id: ScopeId },

    /// The scope hit a fatal error earlier and accepts no more work.
    #[error("scope {id} was aborted by an earlier fatal error")]
    ScopeFailed { id: ScopeId },

    /// A parent cannot finish before all of its children.
    #[error("scope {parent} cannot finish before its child {child}")]
    UnfinishedChild { parent: ScopeId, child: ScopeId },

    /// The flattened instruction buffer disagrees with the recorded length.
    #[error("instruction buffer is {actual} bytes but ilen is {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Invalid configuration value.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl CodegenError {
    /// Whether this error aborts generation of the current unit.
    ///
    /// A duplicate local is left to the caller: the core cannot tell a
    /// language-level redefinition from an internal inconsistency.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, CodegenError::DuplicateLocal { .. })
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        CodegenError::InvalidConfig {
            message: message.into(),
        }
    }
}
