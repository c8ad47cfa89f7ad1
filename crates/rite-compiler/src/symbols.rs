//! Symbol table and synthesized selector stack.
//!
//! Every name an instruction refers to (instance, global and constant names,
//! call selectors) is interned here. Setter selectors such as `[]=` or
//! `attr=` never appear in the source text; the generator synthesizes them
//! and tracks them on a separate stack so a selector reused within one
//! construct resolves without touching the table again.

use rite_core::{CodegenError, CodegenResult, PoolKind};
use rustc_hash::FxHashMap;

/// Where a symbol name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolOrigin {
    /// Copied from the source tree.
    Source,
    /// Created by the generator, e.g. a setter selector.
    Synthesized,
}

/// One interned name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub origin: SymbolOrigin,
}

/// A synthesized selector and the table index it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignSymbol {
    pub selector: String,
    pub index: u16,
}

/// Insertion-ordered symbol table of one scope.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    index: FxHashMap<String, u16>,
    /// Most recent synthesized selector last.
    assign_stack: Vec<AssignSymbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a source name and return its index.
    pub fn add(&mut self, name: &str) -> CodegenResult<u16> {
        self.intern(name, SymbolOrigin::Source)
    }

    fn intern(&mut self, name: &str, origin: SymbolOrigin) -> CodegenResult<u16> {
        if let Some(&idx) = self.index.get(name) {
            return Ok(idx);
        }
        let idx = u16::try_from(self.symbols.len()).map_err(|_| CodegenError::PoolOverflow {
            pool: PoolKind::Symbol,
        })?;
        self.symbols.push(Symbol {
            name: name.to_string(),
            origin,
        });
        self.index.insert(name.to_string(), idx);
        Ok(idx)
    }

    /// Resolve the setter selector for `method_name` (`attr` -> `attr=`).
    ///
    /// A selector still on the assign stack is answered from the stack.
    /// Otherwise it is interned through the table (marked synthesized if the
    /// source never used it) and pushed onto the stack.
    pub fn assign_index(&mut self, method_name: &str) -> CodegenResult<u16> {
        let selector = format!("{method_name}=");
        if let Some(entry) = self.assign_stack.iter().rev().find(|e| e.selector == selector) {
            return Ok(entry.index);
        }
        let index = self.intern(&selector, SymbolOrigin::Synthesized)?;
        self.assign_stack.push(AssignSymbol { selector, index });
        Ok(index)
    }

    /// Drop the most recent synthesized selector once it has been consumed.
    ///
    /// The table entry stays; only the stack shortcut goes away.
    pub fn pop_assign_symbol(&mut self) -> Option<AssignSymbol> {
        self.assign_stack.pop()
    }

    pub fn last_assign_symbol(&self) -> Option<&AssignSymbol> {
        self.assign_stack.last()
    }

    pub fn assign_symbols(&self) -> &[AssignSymbol] {
        &self.assign_stack
    }

    pub fn get(&self, index: u16) -> Option<&Symbol> {
        self.symbols.get(index as usize)
    }

    pub fn find(&self, name: &str) -> Option<u16> {
        self.index.get(name).copied()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Names in index order, as written to the symbol section.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
