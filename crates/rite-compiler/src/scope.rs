//! Per-unit code generation state.
//!
//! A [`Scope`] holds everything needed to emit one method, block, or
//! class body:
//! - the virtual register stack (`sp`/`max_sp`) and local bindings
//! - symbol and literal tables
//! - the instruction buffer with its jump labels
//! - break/retry frames and the exception table
//!
//! Scopes are created, linked and finished through
//! [`ScopeTree`](crate::ScopeTree); this module only deals with the state
//! of a single scope.

use log::warn;
use rite_core::{
    CatchKind, CodegenConfig, CodegenError, CodegenResult, LiteralType, PoolKind, ScopeId,
};

use crate::bytecode::{
    CodeBuffer, ExcHandler, ExcHandlerTable, GenLiterals, LiteralPool, NameRecord,
    ProtectedRegion, layout,
};
use crate::emit::{ArrayGen, Backpatches, BreakFrame, ControlStacks, JmpLabel, RetryFrame};
use crate::nest::NestStack;
use crate::params::ParameterSpec;
use crate::symbols::{AssignSymbol, SymbolTable};

// ============================================================================
// Types
// ============================================================================

/// A local variable bound to a register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lvar {
    pub name: String,
    pub regnum: u8,
}

impl TryFrom<&Lvar> for NameRecord {
    type Error = CodegenError;

    fn try_from(lvar: &Lvar) -> CodegenResult<Self> {
        NameRecord::from_name(&lvar.name)
    }
}

/// Where a variable name resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LvarScopeReg {
    /// Number of enclosing scopes walked (0 = declared here).
    pub scope_num: u8,
    /// Register in the declaring scope.
    pub reg_num: u8,
}

/// Register choice for a new local.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterRequest {
    /// The register at the current stack pointer.
    Next,
    /// A specific register, e.g. a parameter slot.
    Fixed(u8),
}

/// Lifecycle state of a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeState {
    Open,
    Finished,
    /// A fatal error was reported; no output will be produced.
    Failed,
}

/// Immutable output of a finished scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedScope {
    /// Instruction bytes.
    pub ilen: u32,
    /// Symbol count.
    pub slen: u16,
    /// Literal pool count.
    pub plen: u16,
    /// Child scope count.
    pub clen: u16,
    pub nlocals: u16,
    /// Registers required (the stack high-water mark).
    pub nregs: u16,
    vm_code: Box<[u8]>,
}

impl FinishedScope {
    pub fn vm_code(&self) -> &[u8] {
        &self.vm_code
    }

    pub fn vm_code_size(&self) -> usize {
        self.vm_code.len()
    }
}

// ============================================================================
// Scope
// ============================================================================

/// Code generation state of one method, block, or class body.
#[derive(Debug)]
pub struct Scope {
    id: ScopeId,
    upper: Option<ScopeId>,
    pub(crate) children: Vec<ScopeId>,
    lvar_top: bool,
    nest: NestStack,
    params: ParameterSpec,
    config: CodegenConfig,

    sp: u16,
    max_sp: u16,
    nlocals: u16,

    symbols: SymbolTable,
    lvars: Vec<Lvar>,
    literals: LiteralPool,
    gen_literals: GenLiterals,

    code: CodeBuffer,
    backpatches: Backpatches,
    control: ControlStacks,
    exc_handlers: ExcHandlerTable,
    array_gen: ArrayGen,

    state: ScopeState,
    finished: Option<FinishedScope>,
}

impl Scope {
    pub(crate) fn new(
        id: ScopeId,
        upper: Option<ScopeId>,
        lvar_top: bool,
        nest: NestStack,
        config: CodegenConfig,
    ) -> Self {
        Self {
            id,
            upper,
            children: Vec::new(),
            lvar_top,
            nest,
            params: ParameterSpec::default(),
            config,
            sp: 0,
            max_sp: 0,
            nlocals: 0,
            symbols: SymbolTable::new(),
            lvars: Vec::new(),
            literals: LiteralPool::new(),
            gen_literals: GenLiterals::default(),
            code: CodeBuffer::new(config.code_chunk),
            backpatches: Backpatches::new(),
            control: ControlStacks::new(),
            exc_handlers: ExcHandlerTable::default(),
            array_gen: ArrayGen::default(),
            state: ScopeState::Open,
            finished: None,
        }
    }

    // ==========================================================================
    // Identity
    // ==========================================================================

    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// Enclosing scope, `None` for the root.
    pub fn upper(&self) -> Option<ScopeId> {
        self.upper
    }

    /// Direct children in creation order.
    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    /// Whether this scope starts a fresh local-variable scope.
    pub fn lvar_top(&self) -> bool {
        self.lvar_top
    }

    pub fn nest(&self) -> &NestStack {
        &self.nest
    }

    pub fn nest_mut(&mut self) -> CodegenResult<&mut NestStack> {
        self.ensure_open()?;
        Ok(&mut self.nest)
    }

    pub fn params(&self) -> &ParameterSpec {
        &self.params
    }

    pub fn set_params(&mut self, params: ParameterSpec) -> CodegenResult<()> {
        self.ensure_open()?;
        params.pack().map_err(|e| self.fail(e))?;
        self.params = params;
        Ok(())
    }

    pub fn state(&self) -> ScopeState {
        self.state
    }

    // ==========================================================================
    // State Guards
    // ==========================================================================

    fn ensure_open(&self) -> CodegenResult<()> {
        match self.state {
            ScopeState::Open => Ok(()),
            ScopeState::Finished => Err(CodegenError::ScopeFinished { id: self.id }),
            ScopeState::Failed => Err(CodegenError::ScopeFailed { id: self.id }),
        }
    }

    /// Record `err`; a fatal error aborts the scope.
    fn fail(&mut self, err: CodegenError) -> CodegenError {
        if err.is_fatal() && self.state == ScopeState::Open {
            warn!("{} aborted: {}", self.id, err);
            self.state = ScopeState::Failed;
        }
        err
    }

    // ==========================================================================
    // Register Stack
    // ==========================================================================

    pub fn sp(&self) -> u16 {
        self.sp
    }

    pub fn max_sp(&self) -> u16 {
        self.max_sp
    }

    pub fn nlocals(&self) -> u16 {
        self.nlocals
    }

    /// Reserve one more register.
    pub fn push(&mut self) -> CodegenResult<()> {
        self.set_sp(self.sp as u32 + 1)
    }

    /// Release one register.
    pub fn pop(&mut self) -> CodegenResult<()> {
        self.pop_n(1)
    }

    /// Release `n` registers.
    pub fn pop_n(&mut self, n: u16) -> CodegenResult<()> {
        self.ensure_open()?;
        match self.sp.checked_sub(n) {
            Some(sp) => {
                self.sp = sp;
                Ok(())
            }
            None => Err(self.fail(CodegenError::RegisterUnderflow {
                sp: self.sp,
                requested: n,
            })),
        }
    }

    /// Move the stack pointer to `sp`, raising the high-water mark if needed.
    pub fn set_sp(&mut self, sp: u32) -> CodegenResult<()> {
        self.ensure_open()?;
        if sp > self.config.register_limit as u32 {
            return Err(self.fail(CodegenError::RegisterOverflow {
                limit: self.config.register_limit,
            }));
        }
        self.sp = sp as u16;
        self.max_sp = self.max_sp.max(self.sp);
        Ok(())
    }

    // ==========================================================================
    // Code Emission
    // ==========================================================================

    /// Absolute write position in this scope's instruction stream.
    pub fn position(&self) -> u32 {
        u32::try_from(self.code.position()).unwrap_or(u32::MAX)
    }

    pub fn push_code(&mut self, byte: u8) -> CodegenResult<()> {
        self.ensure_open()?;
        self.code.push(byte);
        Ok(())
    }

    pub fn push_n_code(&mut self, bytes: &[u8]) -> CodegenResult<()> {
        self.ensure_open()?;
        self.code.extend(bytes);
        Ok(())
    }

    /// Emit an opcode followed by a 16-bit operand.
    pub fn push_op_u16(&mut self, op: u8, operand: u16) -> CodegenResult<()> {
        self.ensure_open()?;
        self.code.push(op);
        self.code.push_u16(operand);
        Ok(())
    }

    /// Bytes emitted so far (empty once the scope is finished).
    pub fn code(&self) -> &[u8] {
        self.code.as_bytes()
    }

    // ==========================================================================
    // Tables
    // ==========================================================================

    /// Intern a literal, returning its pool index.
    pub fn new_lit(&mut self, value: &str, ty: LiteralType) -> CodegenResult<u16> {
        self.ensure_open()?;
        self.literals.add(value, ty).map_err(|e| self.fail(e))
    }

    /// Intern a symbol, returning its table index.
    pub fn new_sym(&mut self, value: &str) -> CodegenResult<u16> {
        self.ensure_open()?;
        self.symbols.add(value).map_err(|e| self.fail(e))
    }

    /// Resolve the setter selector of `method_name` at a call site.
    pub fn assign_sym_index(&mut self, method_name: &str) -> CodegenResult<u16> {
        self.ensure_open()?;
        self.symbols
            .assign_index(method_name)
            .map_err(|e| self.fail(e))
    }

    pub fn pop_assign_symbol(&mut self) -> CodegenResult<Option<AssignSymbol>> {
        self.ensure_open()?;
        Ok(self.symbols.pop_assign_symbol())
    }

    pub fn push_gen_literal(&mut self, value: impl Into<String>) -> CodegenResult<()> {
        self.ensure_open()?;
        self.gen_literals.push(value);
        Ok(())
    }

    pub fn pop_gen_literal(&mut self) -> CodegenResult<Option<String>> {
        self.ensure_open()?;
        Ok(self.gen_literals.pop())
    }

    pub fn top_gen_literal(&self) -> Option<&str> {
        self.gen_literals.top()
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn literals(&self) -> &LiteralPool {
        &self.literals
    }

    // ==========================================================================
    // Local Variables
    // ==========================================================================

    /// Declare a local in this scope.
    ///
    /// Shadowing a local of an enclosing scope is fine; declaring the same
    /// name twice in this scope reports [`CodegenError::DuplicateLocal`]
    /// and leaves the scope usable.
    pub fn new_lvar(&mut self, name: &str, request: RegisterRequest) -> CodegenResult<u8> {
        self.ensure_open()?;
        if self.lvar(name).is_some() {
            return Err(CodegenError::DuplicateLocal {
                name: name.to_string(),
            });
        }
        if self.lvars.len() >= u16::MAX as usize {
            return Err(self.fail(CodegenError::PoolOverflow {
                pool: PoolKind::Lvar,
            }));
        }

        let regnum = match request {
            RegisterRequest::Next => {
                let reg = self.sp;
                self.push()?;
                reg as u8
            }
            RegisterRequest::Fixed(reg) => {
                if reg as u16 >= self.sp {
                    self.set_sp(reg as u32 + 1)?;
                }
                reg
            }
        };

        self.lvars.push(Lvar {
            name: name.to_string(),
            regnum,
        });
        self.nlocals += 1;
        Ok(regnum)
    }

    /// Look up a local declared in this scope only.
    pub fn lvar(&self, name: &str) -> Option<&Lvar> {
        self.lvars.iter().find(|lvar| lvar.name == name)
    }

    pub fn lvars(&self) -> &[Lvar] {
        &self.lvars
    }

    /// Local names as serialized name-table records.
    pub fn lvar_name_table(&self) -> CodegenResult<Vec<NameRecord>> {
        self.lvars.iter().map(NameRecord::try_from).collect()
    }

    // ==========================================================================
    // Jump Labels
    // ==========================================================================

    /// Emit a placeholder jump operand and return its label.
    pub fn reserve_jmp_label(&mut self) -> CodegenResult<JmpLabel> {
        self.ensure_open()?;
        Ok(self.backpatches.reserve(&mut self.code))
    }

    /// Queue `label` for later resolution.
    pub fn push_backpatch(&mut self, label: JmpLabel) -> CodegenResult<()> {
        self.ensure_open()?;
        self.backpatches.push(label).map_err(|e| self.fail(e))
    }

    /// Take the oldest queued label.
    pub fn shift_backpatch(&mut self) -> CodegenResult<Option<JmpLabel>> {
        self.ensure_open()?;
        Ok(self.backpatches.shift())
    }

    /// Point `label` at `position`.
    pub fn backpatch_jmp_label(&mut self, label: JmpLabel, position: u32) -> CodegenResult<()> {
        self.ensure_open()?;
        self.backpatches
            .resolve(&mut self.code, label, position, &self.config)
            .map_err(|e| self.fail(e))
    }

    /// Labels reserved but not resolved yet.
    pub fn unresolved_labels(&self) -> usize {
        self.backpatches.unresolved()
    }

    // ==========================================================================
    // Control Frames
    // ==========================================================================

    /// Enter a loop whose body starts at the current position.
    pub fn push_break_stack(&mut self) -> CodegenResult<()> {
        self.ensure_open()?;
        let pos = self.position();
        self.control.push_break(pos);
        Ok(())
    }

    /// Register a `break` jump against the innermost loop.
    pub fn add_break_exit(&mut self, label: JmpLabel) -> CodegenResult<()> {
        self.ensure_open()?;
        self.control.add_break_exit(label).map_err(|e| self.fail(e))
    }

    /// Close the innermost loop at the current position, patching its exits.
    pub fn pop_break_stack(&mut self) -> CodegenResult<BreakFrame> {
        self.ensure_open()?;
        let next_pos = self.position();
        let frame = self.control.pop_break(next_pos).map_err(|e| self.fail(e))?;
        for label in &frame.exits {
            self.backpatches
                .resolve(&mut self.code, *label, next_pos, &self.config)
                .map_err(|e| self.fail(e))?;
        }
        Ok(frame)
    }

    pub fn break_top(&self) -> Option<&BreakFrame> {
        self.control.break_top()
    }

    /// Enter a retry-capable region restarting at the current position.
    pub fn push_retry_stack(&mut self) -> CodegenResult<()> {
        self.ensure_open()?;
        let pos = self.position();
        self.control.push_retry(pos);
        Ok(())
    }

    pub fn pop_retry_stack(&mut self) -> CodegenResult<RetryFrame> {
        self.ensure_open()?;
        self.control.pop_retry().map_err(|e| self.fail(e))
    }

    pub fn retry_top(&self) -> Option<&RetryFrame> {
        self.control.retry_top()
    }

    // ==========================================================================
    // Exception Table
    // ==========================================================================

    /// Start a protected region at the current position.
    pub fn open_protected_region(&self) -> CodegenResult<ProtectedRegion> {
        self.ensure_open()?;
        Ok(ProtectedRegion::new(self.position()))
    }

    /// End `region` at the current position and record its handler.
    pub fn close_protected_region(
        &mut self,
        region: ProtectedRegion,
        kind: CatchKind,
        target: u32,
    ) -> CodegenResult<()> {
        let handler = ExcHandler::new(kind, region.begin(), self.position(), target);
        self.push_exc_handler(handler)
    }

    pub fn push_exc_handler(&mut self, handler: ExcHandler) -> CodegenResult<()> {
        self.ensure_open()?;
        self.exc_handlers.push(handler).map_err(|e| self.fail(e))
    }

    pub fn exc_handlers(&self) -> &ExcHandlerTable {
        &self.exc_handlers
    }

    // ==========================================================================
    // Array Generation
    // ==========================================================================

    pub fn array_gen(&self) -> &ArrayGen {
        &self.array_gen
    }

    pub fn array_gen_mut(&mut self) -> CodegenResult<&mut ArrayGen> {
        self.ensure_open()?;
        Ok(&mut self.array_gen)
    }

    // ==========================================================================
    // Finish
    // ==========================================================================

    /// Flatten into the immutable output.
    ///
    /// The tree checks children before calling this.
    pub(crate) fn finish(&mut self, clen: u16) -> CodegenResult<()> {
        self.ensure_open()?;
        let unresolved = self.backpatches.unresolved();
        if unresolved > 0 {
            return Err(self.fail(CodegenError::UnresolvedBackpatch { count: unresolved }));
        }
        self.control.ensure_closed().map_err(|e| self.fail(e))?;

        let count = |len: usize, pool: PoolKind| {
            u16::try_from(len).map_err(|_| CodegenError::PoolOverflow { pool })
        };
        let slen = count(self.symbols.len(), PoolKind::Symbol).map_err(|e| self.fail(e))?;
        let plen = count(self.literals.len(), PoolKind::Literal).map_err(|e| self.fail(e))?;

        let code = std::mem::replace(&mut self.code, CodeBuffer::new(1));
        let vm_code = code.into_boxed();
        self.finished = Some(FinishedScope {
            ilen: u32::try_from(vm_code.len()).unwrap_or(u32::MAX),
            slen,
            plen,
            clen,
            nlocals: self.nlocals,
            nregs: self.max_sp,
            vm_code,
        });
        self.state = ScopeState::Finished;
        Ok(())
    }

    /// Finished output, if the scope has been finished.
    pub fn finished(&self) -> Option<&FinishedScope> {
        self.finished.as_ref()
    }

    /// The flattened instruction buffer, once finished.
    pub fn vm_code(&self) -> Option<&[u8]> {
        self.finished.as_ref().map(FinishedScope::vm_code)
    }

    /// Size of this scope's own record, children excluded.
    pub fn record_size(&self) -> CodegenResult<usize> {
        let finished = self
            .finished
            .as_ref()
            .ok_or(CodegenError::ScopeNotFinished { id: self.id })?;
        if finished.vm_code_size() != finished.ilen as usize {
            return Err(CodegenError::SizeMismatch {
                expected: finished.ilen as usize,
                actual: finished.vm_code_size(),
            });
        }
        Ok(layout::record_size(
            finished.vm_code_size(),
            &self.exc_handlers,
            &self.literals,
            self.symbols.names(),
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> Scope {
        Scope::new(
            ScopeId::new(0),
            None,
            true,
            NestStack::method(),
            CodegenConfig::default(),
        )
    }

    #[test]
    fn new_scope_is_empty() {
        let scope = scope();
        assert_eq!(scope.sp(), 0);
        assert_eq!(scope.max_sp(), 0);
        assert_eq!(scope.nlocals(), 0);
        assert_eq!(scope.state(), ScopeState::Open);
        assert!(scope.vm_code().is_none());
    }

    #[test]
    fn push_tracks_high_water_mark() {
        let mut scope = scope();
        scope.push().unwrap();
        scope.push().unwrap();
        scope.pop().unwrap();
        scope.push().unwrap();
        scope.pop_n(2).unwrap();

        assert_eq!(scope.sp(), 0);
        assert_eq!(scope.max_sp(), 2);
    }

    #[test]
    fn register_overflow_is_fatal() {
        let mut scope = Scope::new(
            ScopeId::new(0),
            None,
            true,
            NestStack::method(),
            CodegenConfig::default().with_register_limit(2),
        );
        scope.push().unwrap();
        scope.push().unwrap();

        assert_eq!(
            scope.push(),
            Err(CodegenError::RegisterOverflow { limit: 2 })
        );
        assert_eq!(scope.state(), ScopeState::Failed);
        assert!(matches!(
            scope.push_code(0),
            Err(CodegenError::ScopeFailed { .. })
        ));
    }

    #[test]
    fn register_underflow() {
        let mut scope = scope();
        assert_eq!(
            scope.pop(),
            Err(CodegenError::RegisterUnderflow { sp: 0, requested: 1 })
        );
    }

    #[test]
    fn declare_variable() {
        let mut scope = scope();
        let reg = scope.new_lvar("x", RegisterRequest::Next).unwrap();
        assert_eq!(reg, 0);
        assert_eq!(scope.sp(), 1);
        assert_eq!(scope.nlocals(), 1);
        assert_eq!(scope.lvar("x").unwrap().regnum, 0);
    }

    #[test]
    fn fixed_register_raises_sp() {
        let mut scope = scope();
        let reg = scope.new_lvar("y", RegisterRequest::Fixed(3)).unwrap();
        assert_eq!(reg, 3);
        assert_eq!(scope.sp(), 4);
        assert_eq!(scope.max_sp(), 4);
    }

    #[test]
    fn redeclaration_error_is_recoverable() {
        let mut scope = scope();
        scope.new_lvar("x", RegisterRequest::Next).unwrap();

        let result = scope.new_lvar("x", RegisterRequest::Next);
        assert_eq!(
            result,
            Err(CodegenError::DuplicateLocal { name: "x".into() })
        );
        assert_eq!(scope.state(), ScopeState::Open);
        assert_eq!(scope.nlocals(), 1);
    }

    #[test]
    fn lvar_names_convert_to_records() {
        let mut scope = scope();
        scope.new_lvar("a", RegisterRequest::Next).unwrap();
        scope.new_lvar("bb", RegisterRequest::Next).unwrap();

        let records = scope.lvar_name_table().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].bytes(), b"bb");
    }

    #[test]
    fn break_exits_patch_to_loop_end() {
        let mut scope = scope();
        scope.push_code(0x01).unwrap();
        scope.push_break_stack().unwrap();
        scope.push_code(0x20).unwrap();
        let label = scope.reserve_jmp_label().unwrap();
        scope.add_break_exit(label).unwrap();
        scope.push_n_code(&[0x02, 0x03]).unwrap();

        let frame = scope.pop_break_stack().unwrap();
        assert_eq!(frame.redo_pos, 1);
        assert_eq!(frame.next_pos, Some(6));
        assert_eq!(scope.code(), &[0x01, 0x20, 0x00, 0x02, 0x02, 0x03]);
        assert_eq!(scope.unresolved_labels(), 0);
    }

    #[test]
    fn finish_flattens_code() {
        let mut scope = scope();
        scope.push_op_u16(0x11, 0x0203).unwrap();
        scope.new_sym("puts").unwrap();
        scope.new_lit("1", LiteralType::Int32).unwrap();
        scope.finish(0).unwrap();

        let out = scope.finished().unwrap();
        assert_eq!(out.vm_code(), &[0x11, 0x02, 0x03]);
        assert_eq!(out.ilen, 3);
        assert_eq!(out.slen, 1);
        assert_eq!(out.plen, 1);
        assert_eq!(scope.state(), ScopeState::Finished);
        assert!(matches!(
            scope.push_code(0),
            Err(CodegenError::ScopeFinished { .. })
        ));
    }

    #[test]
    fn finish_with_open_loop_fails() {
        let mut scope = scope();
        scope.push_break_stack().unwrap();
        assert!(matches!(
            scope.finish(0),
            Err(CodegenError::UnclosedControlFrame { .. })
        ));
        assert!(scope.vm_code().is_none());
    }

    #[test]
    fn failed_scope_rejects_side_state() {
        let mut scope = scope();
        let label = scope.reserve_jmp_label().unwrap();
        scope.push_backpatch(label).unwrap();
        scope.assign_sym_index("name").unwrap();
        assert!(scope.finish(0).is_err());

        let failed = CodegenError::ScopeFailed { id: scope.id() };
        assert_eq!(scope.shift_backpatch(), Err(failed.clone()));
        assert_eq!(scope.pop_assign_symbol(), Err(failed.clone()));
        assert_eq!(scope.push_gen_literal("x"), Err(failed.clone()));
        assert_eq!(scope.open_protected_region(), Err(failed.clone()));
        assert!(scope.array_gen_mut().is_err());
        assert!(scope.nest_mut().is_err());
    }

    #[test]
    fn finished_scope_rejects_side_state() {
        let mut scope = scope();
        scope.finish(0).unwrap();
        assert!(matches!(
            scope.pop_gen_literal(),
            Err(CodegenError::ScopeFinished { .. })
        ));
        assert!(matches!(
            scope.array_gen_mut(),
            Err(CodegenError::ScopeFinished { .. })
        ));
    }

    #[test]
    fn protected_regions_close_inner_first() {
        let mut scope = scope();
        let outer = scope.open_protected_region().unwrap();
        scope.push_n_code(&[0; 4]).unwrap();
        let inner = scope.open_protected_region().unwrap();
        scope.push_n_code(&[0; 2]).unwrap();
        scope
            .close_protected_region(inner, CatchKind::Rescue, 10)
            .unwrap();
        scope.push_code(0).unwrap();
        scope
            .close_protected_region(outer, CatchKind::Ensure, 20)
            .unwrap();

        let handlers = scope.exc_handlers().handlers();
        assert_eq!(handlers.len(), 2);
        assert_eq!((handlers[0].begin(), handlers[0].end()), (4, 6));
        assert_eq!((handlers[1].begin(), handlers[1].end()), (0, 7));
    }

    #[test]
    fn record_size_requires_finish() {
        let scope = scope();
        assert!(matches!(
            scope.record_size(),
            Err(CodegenError::ScopeNotFinished { .. })
        ));
    }
}
