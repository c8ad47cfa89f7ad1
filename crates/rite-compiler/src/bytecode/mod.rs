//! Per-scope output tables.
//!
//! - [`CodeBuffer`] - emitted instruction bytes
//! - [`Literal`] and [`LiteralPool`] - deduplicated constant pool
//! - [`GenLiterals`] - generator-synthesized literal stack
//! - [`ExcHandler`] and [`ExcHandlerTable`] - exception table records
//! - [`layout`] - record sizes for the serializer

mod code;
mod exception;
pub mod layout;
mod literal;

pub use code::CodeBuffer;
pub use exception::{ExcHandler, ExcHandlerTable, ProtectedRegion};
pub use layout::NameRecord;
pub use literal::{GenLiterals, Literal, LiteralPool};
