//! Shared types for the RITE code generator.
//!
//! This crate holds everything the emission engine and its callers agree
//! on without depending on the engine itself:
//!
//! - [`error`]: the [`CodegenError`] taxonomy
//! - [`ids`]: arena ids for scopes and jump labels
//! - [`format`]: container size constants and byte tags
//! - [`config`]: target limits ([`CodegenConfig`])

pub mod config;
pub mod error;
pub mod format;
pub mod ids;

pub use config::CodegenConfig;
pub use error::{CodegenError, CodegenResult, ControlStack, PoolKind};
pub use format::{CatchKind, LiteralType};
pub use ids::{LabelId, ScopeId};
