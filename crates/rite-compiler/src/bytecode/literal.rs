//! Constant pool for one scope.
//!
//! The literal pool stores the constants referenced by a scope's
//! instructions. Entries keep their source text; the serializer converts
//! the text into the on-disk representation selected by the entry's tag.

use rite_core::{CodegenError, CodegenResult, LiteralType, PoolKind};
use rustc_hash::FxHashMap;

/// One constant-pool entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    /// Stored tag: the type, plus the byte length for string kinds.
    tag: u32,
    /// Raw textual value.
    value: String,
}

impl Literal {
    /// Create an entry, computing the tag from the value length.
    pub fn new(value: impl Into<String>, ty: LiteralType) -> Self {
        let value = value.into();
        Self {
            tag: ty.tag_for(value.len()),
            value,
        }
    }

    /// The on-disk tag.
    pub fn tag(&self) -> u32 {
        self.tag
    }

    /// The literal kind encoded in the tag.
    pub fn ty(&self) -> LiteralType {
        LiteralType::from_tag(self.tag).unwrap_or(LiteralType::String)
    }

    /// The raw value text.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Literal pool with deduplication.
///
/// Two literals merge only when both the tag and the text match, so `"hi"`
/// as a heap string and `"hi"` as a static string occupy two entries.
#[derive(Debug, Clone, Default)]
pub struct LiteralPool {
    /// Entries in first-seen order.
    literals: Vec<Literal>,
    /// Deduplication index: (tag, value) to entry index.
    index: FxHashMap<(u32, String), u16>,
}

impl LiteralPool {
    /// Create a new empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or get an existing literal, returning its index.
    pub fn add(&mut self, value: &str, ty: LiteralType) -> CodegenResult<u16> {
        let literal = Literal::new(value, ty);
        let key = (literal.tag, literal.value);

        if let Some(&idx) = self.index.get(&key) {
            return Ok(idx);
        }

        let idx = u16::try_from(self.literals.len()).map_err(|_| CodegenError::PoolOverflow {
            pool: PoolKind::Literal,
        })?;
        self.literals.push(Literal {
            tag: key.0,
            value: key.1.clone(),
        });
        self.index.insert(key, idx);
        Ok(idx)
    }

    /// Get a literal by index.
    pub fn get(&self, index: u16) -> Option<&Literal> {
        self.literals.get(index as usize)
    }

    /// All entries in index order.
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

/// Stack of literal texts synthesized by the generator itself.
///
/// Unlike pool entries these are pushed around one generation step and
/// popped again, so the most recent one is always on top.
#[derive(Debug, Clone, Default)]
pub struct GenLiterals {
    stack: Vec<String>,
}

impl GenLiterals {
    pub fn push(&mut self, value: impl Into<String>) {
        self.stack.push(value.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
