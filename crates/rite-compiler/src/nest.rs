//! Lexical nesting markers.
//!
//! A scope records the chain of constructs it is nested in, innermost last.
//! The chain starts with a [`NestKind::Method`] marker for scopes that open
//! a fresh local-variable scope; block scopes inherit their parent's chain
//! and add a [`NestKind::Block`] marker. Loops compiled inline (no scope of
//! their own) push and pop [`NestKind::Loop`] markers while they are emitted.
//!
//! Two questions are answered from the chain:
//!
//! - whether a `break` can be compiled as a local jump (innermost marker is
//!   a loop) or has to unwind out of a block;
//! - how many block boundaries separate the scope from its enclosing
//!   method, which bounds how far a local-variable lookup may walk outward.

/// One nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestKind {
    /// Method, class/module body or top level: a fresh local scope.
    Method,
    /// Block or closure body: sees the enclosing locals.
    Block,
    /// Loop emitted inline in the current scope.
    Loop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestStack {
    levels: Vec<NestKind>,
}

impl NestStack {
    /// Chain for a scope that starts a fresh local scope.
    pub fn method() -> Self {
        Self {
            levels: vec![NestKind::Method],
        }
    }

    /// Chain for a block nested in a scope with chain `outer`.
    pub fn block_in(outer: &NestStack) -> Self {
        let mut levels = outer.levels.clone();
        levels.push(NestKind::Block);
        Self { levels }
    }

    pub fn enter_loop(&mut self) {
        self.levels.push(NestKind::Loop);
    }

    /// Leave the innermost inline loop.
    ///
    /// Returns `false` when the innermost level is not a loop; scope-level
    /// markers are never popped.
    pub fn leave_loop(&mut self) -> bool {
        if self.innermost() == NestKind::Loop {
            self.levels.pop();
            true
        } else {
            false
        }
    }

    pub fn innermost(&self) -> NestKind {
        self.levels.last().copied().unwrap_or(NestKind::Method)
    }

    /// Whether `break` here is a jump within the current scope.
    pub fn breaks_locally(&self) -> bool {
        self.innermost() == NestKind::Loop
    }

    /// Block boundaries between this scope and its enclosing method.
    pub fn block_depth(&self) -> usize {
        self.levels
            .iter()
            .rev()
            .take_while(|k| **k != NestKind::Method)
            .filter(|k| **k == NestKind::Block)
            .count()
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn levels(&self) -> &[NestKind] {
        &self.levels
    }
}

impl Default for NestStack {
    fn default() -> Self {
        Self::method()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_chain() {
        let nest = NestStack::method();
        assert_eq!(nest.depth(), 1);
        assert_eq!(nest.block_depth(), 0);
        assert!(!nest.breaks_locally());
    }

    #[test]
    fn blocks_accumulate() {
        let outer = NestStack::method();
        let block = NestStack::block_in(&outer);
        let inner = NestStack::block_in(&block);

        assert_eq!(inner.block_depth(), 2);
        assert_eq!(inner.innermost(), NestKind::Block);
        assert_eq!(inner.depth(), 3);
    }

    #[test]
    fn loops_break_locally() {
        let mut nest = NestStack::method();
        nest.enter_loop();
        assert!(nest.breaks_locally());

        let block = NestStack::block_in(&nest);
        assert!(!block.breaks_locally());
        assert_eq!(block.block_depth(), 1);

        assert!(nest.leave_loop());
        assert!(!nest.leave_loop());
        assert_eq!(nest.depth(), 1);
    }
}
