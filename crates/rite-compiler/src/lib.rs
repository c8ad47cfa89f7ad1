//! RITE Code Generator
//!
//! The scope and emission engine behind a RITE bytecode compiler. A driver
//! walking a syntax tree opens one scope per method, block, or class body,
//! emits instructions into it, and finishes it into a flat record whose
//! size feeds the container writer.
//!
//! ## Modules
//!
//! - [`tree`]: Scope arena with creation, finishing, freeing and lookup
//! - [`scope`]: Per-scope registers, tables, code and control state
//! - [`bytecode`]: Code buffer, literal pool, exception table, record layout
//! - [`emit`]: Jump labels, break/retry frames, array generation state
//! - [`symbols`]: Symbol table and setter-selector stack
//! - [`nest`]: Method/block/loop nesting markers
//! - [`params`]: Packed parameter signatures

pub mod bytecode;
pub mod emit;
pub mod nest;
pub mod params;
pub mod scope;
pub mod symbols;
pub mod tree;

pub use bytecode::{ExcHandler, ExcHandlerTable, Literal, LiteralPool, NameRecord, ProtectedRegion};
pub use emit::{ArrayGen, ArrayShape, BreakFrame, JmpLabel, RetryFrame};
pub use nest::{NestKind, NestStack};
pub use params::{ParamFlags, ParameterSpec};
pub use scope::{FinishedScope, Lvar, LvarScopeReg, RegisterRequest, Scope, ScopeState};
pub use symbols::{AssignSymbol, Symbol, SymbolOrigin, SymbolTable};
pub use tree::ScopeTree;

// Re-export the error type from core for convenience
pub use rite_core::{CodegenConfig, CodegenError, CodegenResult};
