//! Arena of scopes for one compilation.
//!
//! Scopes refer to their parent and children by [`ScopeId`]; the tree owns
//! every scope and is the only place where scopes are created, finished and
//! freed.

use log::debug;
use rite_core::{CodegenConfig, CodegenError, CodegenResult, PoolKind, ScopeId};

use crate::bytecode::layout;
use crate::nest::NestStack;
use crate::scope::{LvarScopeReg, Scope, ScopeState};

/// Owner of all scopes of a compilation.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Option<Scope>>,
    config: CodegenConfig,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            scopes: Vec::new(),
            config: CodegenConfig::default(),
        }
    }

    /// Create a tree with a custom configuration.
    pub fn with_config(config: CodegenConfig) -> CodegenResult<Self> {
        config.validate()?;
        Ok(Self {
            scopes: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    // ==========================================================================
    // Access
    // ==========================================================================

    pub fn scope(&self, id: ScopeId) -> CodegenResult<&Scope> {
        self.scopes
            .get(id.index() as usize)
            .and_then(Option::as_ref)
            .ok_or(CodegenError::UnknownScope { id })
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> CodegenResult<&mut Scope> {
        self.scopes
            .get_mut(id.index() as usize)
            .and_then(Option::as_mut)
            .ok_or(CodegenError::UnknownScope { id })
    }

    /// First live scope without a parent.
    pub fn root(&self) -> Option<ScopeId> {
        self.iter().find(|s| s.upper().is_none()).map(Scope::id)
    }

    pub fn children(&self, id: ScopeId) -> CodegenResult<&[ScopeId]> {
        Ok(self.scope(id)?.children())
    }

    pub fn upper(&self, id: ScopeId) -> CodegenResult<Option<ScopeId>> {
        Ok(self.scope(id)?.upper())
    }

    /// Number of live scopes.
    pub fn len(&self) -> usize {
        self.scopes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live scopes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter().flatten()
    }

    // ==========================================================================
    // Lifecycle
    // ==========================================================================

    /// Create a scope as the last child of `parent`.
    ///
    /// `lvar_top` starts a fresh local-variable scope (a method or class
    /// body); otherwise the scope is a block that can see its parent's locals.
    pub fn create(&mut self, parent: Option<ScopeId>, lvar_top: bool) -> CodegenResult<ScopeId> {
        let id = ScopeId::new(
            u32::try_from(self.scopes.len()).map_err(|_| CodegenError::PoolOverflow {
                pool: PoolKind::Children,
            })?,
        );

        let nest = match parent {
            Some(parent_id) => {
                let parent = self.scope_mut(parent_id)?;
                match parent.state() {
                    ScopeState::Open => {}
                    ScopeState::Finished => {
                        return Err(CodegenError::ScopeFinished { id: parent_id });
                    }
                    ScopeState::Failed => {
                        return Err(CodegenError::ScopeFailed { id: parent_id });
                    }
                }
                if parent.children.len() >= u16::MAX as usize {
                    return Err(CodegenError::PoolOverflow {
                        pool: PoolKind::Children,
                    });
                }
                parent.children.push(id);
                if lvar_top {
                    NestStack::method()
                } else {
                    NestStack::block_in(parent.nest())
                }
            }
            None => NestStack::method(),
        };

        self.scopes
            .push(Some(Scope::new(id, parent, lvar_top, nest, self.config)));
        debug!(
            "created {} (parent: {:?}, lvar_top: {})",
            id,
            parent.map(|p| p.index()),
            lvar_top
        );
        Ok(id)
    }

    /// Freeze `id` into its flattened output.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn finish(&mut self, id: ScopeId) -> CodegenResult<()> {
        let scope = self.scope(id)?;
        for &child in scope.children() {
            if self.scope(child)?.state() != ScopeState::Finished {
                return Err(CodegenError::UnfinishedChild { parent: id, child });
            }
        }
        let clen = u16::try_from(scope.children().len()).map_err(|_| {
            CodegenError::PoolOverflow {
                pool: PoolKind::Children,
            }
        })?;

        let scope = self.scope_mut(id)?;
        scope.finish(clen)?;
        debug!(
            "finished {} (ilen: {}, nregs: {})",
            id,
            scope.finished().map_or(0, |f| f.ilen),
            scope.max_sp()
        );
        Ok(())
    }

    /// Release `id` and all of its descendants, returning how many scopes
    /// were released.
    ///
    /// A finished parent has already counted its children, so a subtree
    /// can only be detached while its parent is still open (or failed).
    pub fn free(&mut self, id: ScopeId) -> CodegenResult<usize> {
        let upper = self.scope(id)?.upper();
        if let Some(upper) = upper {
            if let Ok(parent) = self.scope_mut(upper) {
                if parent.state() == ScopeState::Finished {
                    return Err(CodegenError::ScopeFinished { id: upper });
                }
                parent.children.retain(|&child| child != id);
            }
        }

        let mut freed = 0;
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(scope) = self
                .scopes
                .get_mut(next.index() as usize)
                .and_then(Option::take)
            {
                pending.extend_from_slice(scope.children());
                freed += 1;
            }
        }
        debug!("freed {} ({} scopes)", id, freed);
        Ok(freed)
    }

    /// Serialized size of `id` and its whole subtree.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn update_vm_code_size_then_return_total_size(&self, id: ScopeId) -> CodegenResult<usize> {
        let mut total = 0;
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            let scope = self.scope(next)?;
            total += scope.record_size()?;
            pending.extend_from_slice(scope.children());
        }
        Ok(total)
    }

    /// Size of a whole container holding the tree rooted at `root`.
    pub fn container_size(&self, root: ScopeId) -> CodegenResult<usize> {
        self.update_vm_code_size_then_return_total_size(root)
            .map(layout::container_size)
    }

    // ==========================================================================
    // Variable Lookup
    // ==========================================================================

    /// Resolve `name` from `id` outwards.
    ///
    /// The walk stops after the first scope with `lvar_top` set, so a block
    /// sees the locals of its enclosing method but a method never sees the
    /// locals around its definition.
    pub fn lvar_find_regnum(
        &self,
        id: ScopeId,
        name: &str,
    ) -> CodegenResult<Option<LvarScopeReg>> {
        let mut current = self.scope(id)?;
        let mut hops: u32 = 0;
        loop {
            if let Some(lvar) = current.lvar(name) {
                let scope_num = u8::try_from(hops).map_err(|_| CodegenError::NestingTooDeep)?;
                return Ok(Some(LvarScopeReg {
                    scope_num,
                    reg_num: lvar.regnum,
                }));
            }
            if current.lvar_top() {
                return Ok(None);
            }
            match current.upper() {
                Some(upper) => {
                    current = self.scope(upper)?;
                    hops += 1;
                }
                None => return Ok(None),
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nest::NestKind;
    use crate::scope::RegisterRequest;

    #[test]
    fn create_links_children_in_order() {
        let mut tree = ScopeTree::new();
        let root = tree.create(None, true).unwrap();
        let a = tree.create(Some(root), true).unwrap();
        let b = tree.create(Some(root), false).unwrap();

        assert_eq!(tree.root(), Some(root));
        assert_eq!(tree.children(root).unwrap(), &[a, b]);
        assert_eq!(tree.upper(b).unwrap(), Some(root));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn block_inherits_nesting() {
        let mut tree = ScopeTree::new();
        let root = tree.create(None, true).unwrap();
        let block = tree.create(Some(root), false).unwrap();
        let method = tree.create(Some(block), true).unwrap();

        assert_eq!(
            tree.scope(block).unwrap().nest().levels(),
            &[NestKind::Method, NestKind::Block]
        );
        assert_eq!(
            tree.scope(method).unwrap().nest().levels(),
            &[NestKind::Method]
        );
    }

    #[test]
    fn finish_requires_finished_children() {
        let mut tree = ScopeTree::new();
        let root = tree.create(None, true).unwrap();
        let child = tree.create(Some(root), false).unwrap();

        assert_eq!(
            tree.finish(root),
            Err(CodegenError::UnfinishedChild {
                parent: root,
                child
            })
        );
        tree.finish(child).unwrap();
        tree.finish(root).unwrap();
        assert_eq!(tree.scope(root).unwrap().finished().unwrap().clen, 1);
        assert_eq!(
            tree.finish(root),
            Err(CodegenError::ScopeFinished { id: root })
        );
    }

    #[test]
    fn unresolved_label_fails_finish() {
        let mut tree = ScopeTree::new();
        let root = tree.create(None, true).unwrap();
        tree.scope_mut(root).unwrap().reserve_jmp_label().unwrap();

        assert_eq!(
            tree.finish(root),
            Err(CodegenError::UnresolvedBackpatch { count: 1 })
        );
        let scope = tree.scope(root).unwrap();
        assert_eq!(scope.state(), ScopeState::Failed);
        assert!(scope.vm_code().is_none());
    }

    #[test]
    fn create_under_finished_parent_fails() {
        let mut tree = ScopeTree::new();
        let root = tree.create(None, true).unwrap();
        tree.finish(root).unwrap();
        assert_eq!(
            tree.create(Some(root), false),
            Err(CodegenError::ScopeFinished { id: root })
        );
    }

    #[test]
    fn free_releases_subtree_only() {
        let mut tree = ScopeTree::new();
        let root = tree.create(None, true).unwrap();
        let a = tree.create(Some(root), true).unwrap();
        tree.create(Some(a), false).unwrap();
        tree.create(Some(a), false).unwrap();
        let b = tree.create(Some(root), true).unwrap();

        assert_eq!(tree.free(a).unwrap(), 3);
        assert_eq!(tree.children(root).unwrap(), &[b]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.scope(a).err(), Some(CodegenError::UnknownScope { id: a }));
    }

    #[test]
    fn free_under_finished_parent_is_rejected() {
        let mut tree = ScopeTree::new();
        let root = tree.create(None, true).unwrap();
        let child = tree.create(Some(root), false).unwrap();
        tree.finish(child).unwrap();
        tree.finish(root).unwrap();

        assert_eq!(
            tree.free(child),
            Err(CodegenError::ScopeFinished { id: root })
        );
        let clen = tree.scope(root).unwrap().finished().unwrap().clen;
        assert_eq!(clen as usize, tree.children(root).unwrap().len());
        assert!(tree.update_vm_code_size_then_return_total_size(root).is_ok());

        // releasing from the top still works
        assert_eq!(tree.free(root).unwrap(), 2);
        assert!(tree.is_empty());
    }

    #[test]
    fn freed_ids_are_not_reused() {
        let mut tree = ScopeTree::new();
        let root = tree.create(None, true).unwrap();
        let gone = tree.create(Some(root), false).unwrap();
        tree.free(gone).unwrap();

        let fresh = tree.create(Some(root), false).unwrap();
        assert_eq!(fresh, gone.next());
        assert_eq!(tree.scope(gone).err(), Some(CodegenError::UnknownScope { id: gone }));
        assert_eq!(tree.children(root).unwrap(), &[fresh]);
    }

    #[test]
    fn lookup_stops_at_method_boundary() {
        let mut tree = ScopeTree::new();
        let root = tree.create(None, true).unwrap();
        tree.scope_mut(root)
            .unwrap()
            .new_lvar("x", RegisterRequest::Next)
            .unwrap();
        let method = tree.create(Some(root), true).unwrap();
        let block = tree.create(Some(method), false).unwrap();
        tree.scope_mut(method)
            .unwrap()
            .new_lvar("y", RegisterRequest::Fixed(1))
            .unwrap();

        assert_eq!(
            tree.lvar_find_regnum(block, "y").unwrap(),
            Some(LvarScopeReg {
                scope_num: 1,
                reg_num: 1
            })
        );
        assert_eq!(tree.lvar_find_regnum(block, "x").unwrap(), None);
        assert_eq!(
            tree.lvar_find_regnum(root, "x").unwrap(),
            Some(LvarScopeReg {
                scope_num: 0,
                reg_num: 0
            })
        );
    }

    #[test]
    fn total_size_requires_finish() {
        let mut tree = ScopeTree::new();
        let root = tree.create(None, true).unwrap();
        assert_eq!(
            tree.update_vm_code_size_then_return_total_size(root),
            Err(CodegenError::ScopeNotFinished { id: root })
        );
    }

    #[test]
    fn invalid_config_rejected() {
        let config = CodegenConfig::default().with_code_chunk(0);
        assert!(ScopeTree::with_config(config).is_err());
    }
}
