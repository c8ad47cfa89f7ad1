//! Array and argument-list generation state.
//!
//! While an array literal or argument list is emitted, elements are
//! buffered in consecutive registers so they can be collected by a single
//! array instruction. A splat in the middle of the list changes the plan:
//! elements seen so far are flushed into an array and the rest is appended
//! with a concat sequence. [`ArrayGen`] tracks which of the two shapes the
//! current list has and how many elements are waiting.

/// Position relative to the first splat of the current list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplatStatus {
    #[default]
    None,
    BeforeSplat,
    AfterSplat,
}

/// Shape of the list being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayStatus {
    #[default]
    None,
    /// Single array instruction.
    Generating,
    /// Build-then-concat sequence.
    GeneratingSplit,
}

/// How the finished list must be collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayShape {
    /// All `count` elements in one instruction.
    Literal { count: u16 },
    /// Split at a splat: `before_splat` elements preceded the first splat,
    /// `trailing` elements are still buffered after the last one.
    Split { before_splat: u16, trailing: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArrayGen {
    pub splat: SplatStatus,
    pub array: ArrayStatus,
    /// Buffered elements since the list began or the last flush.
    pub count: u16,
    pub nargs_before_splat: u16,
}

impl ArrayGen {
    /// Start a new list, returning the state of any enclosing list.
    pub fn begin(&mut self) -> ArrayGen {
        std::mem::replace(
            self,
            ArrayGen {
                splat: SplatStatus::BeforeSplat,
                array: ArrayStatus::Generating,
                count: 0,
                nargs_before_splat: 0,
            },
        )
    }

    /// Restore the enclosing list after a nested one finished.
    pub fn restore(&mut self, outer: ArrayGen) {
        *self = outer;
    }

    pub fn push_element(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    /// Record a splat, returning the number of elements to flush first.
    pub fn mark_splat(&mut self) -> u16 {
        let flushed = self.count;
        if self.splat != SplatStatus::AfterSplat {
            self.nargs_before_splat = flushed;
        }
        self.splat = SplatStatus::AfterSplat;
        self.array = ArrayStatus::GeneratingSplit;
        self.count = 0;
        flushed
    }

    pub fn is_generating(&self) -> bool {
        self.array != ArrayStatus::None
    }

    /// Close the list and reset to the idle state.
    pub fn finish(&mut self) -> ArrayShape {
        let shape = match self.array {
            ArrayStatus::GeneratingSplit => ArrayShape::Split {
                before_splat: self.nargs_before_splat,
                trailing: self.count,
            },
            _ => ArrayShape::Literal { count: self.count },
        };
        *self = ArrayGen::default();
        shape
    }
}
