//! RITE bytecode generation.
//!
//! Facade over the workspace crates:
//!
//! - [`core`]: errors, ids, format constants and configuration
//! - [`compiler`]: the scope tree and emission engine
//!
//! ```
//! use rite::prelude::*;
//!
//! let mut tree = ScopeTree::new();
//! let root = tree.create(None, true).unwrap();
//! let scope = tree.scope_mut(root).unwrap();
//! let reg = scope.new_lvar("x", RegisterRequest::Next).unwrap();
//! scope.push_code(0x10).unwrap();
//! scope.push_code(reg).unwrap();
//! tree.finish(root).unwrap();
//!
//! assert!(tree.container_size(root).unwrap() > 0);
//! ```

pub use rite_compiler as compiler;
pub use rite_core as core;

pub mod prelude {
    pub use rite_compiler::bytecode::layout;
    pub use rite_compiler::{
        ArrayGen, ArrayShape, BreakFrame, ExcHandler, FinishedScope, JmpLabel, Lvar,
        LvarScopeReg, NameRecord, NestKind, ParamFlags, ParameterSpec, ProtectedRegion,
        RegisterRequest, RetryFrame, Scope, ScopeState, ScopeTree,
    };
    pub use rite_core::{
        CatchKind, CodegenConfig, CodegenError, CodegenResult, LabelId, LiteralType, ScopeId,
    };
}
