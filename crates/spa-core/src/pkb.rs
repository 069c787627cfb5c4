use crate::affects::Affects;
use crate::calls::CallsStore;
use crate::config::PkbConfig;
use crate::follows::FollowsStore;
use crate::parent::ParentStore;
use crate::pattern::PatternStore;
use crate::registry::{Registry, StatementKind, StmtNo};
use crate::usage::{UsageKind, UsageStore};
use crate::{PkbError, Result};
use spa_parser::NormalizedExpr;
use std::collections::HashSet;
use tracing::debug;

/// The program knowledge base.
///
/// Mutators take `&mut self` and belong to the build phase; everything the query phase needs is
/// reachable through `&self`. Once built, a `Pkb` can be shared across threads for concurrent
/// read-only evaluation. A store is reused for another program only after [`Pkb::reset`].
#[derive(Debug, Clone)]
pub struct Pkb {
    config: PkbConfig,
    registry: Registry,
    follows: FollowsStore,
    parent: ParentStore,
    uses: UsageStore,
    modifies: UsageStore,
    calls: CallsStore,
    patterns: PatternStore,
}

impl Default for Pkb {
    fn default() -> Self {
        Self::with_config(PkbConfig::default())
    }
}

fn logged<T>(operation: &'static str, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        debug!(operation, %err, "rejected mutation");
    }
    result
}

impl Pkb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PkbConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
            follows: FollowsStore::new(),
            parent: ParentStore::new(),
            uses: UsageStore::new(UsageKind::Uses),
            modifies: UsageStore::new(UsageKind::Modifies),
            calls: CallsStore::new(),
            patterns: PatternStore::new(),
        }
    }

    pub fn config(&self) -> &PkbConfig {
        &self.config
    }

    /// Clears every store. The config is kept.
    pub fn reset(&mut self) {
        debug!(statements = self.registry.total_statements(), "resetting knowledge base");
        self.registry.clear();
        self.follows.clear();
        self.parent.clear();
        self.uses.clear();
        self.modifies.clear();
        self.calls.clear();
        self.patterns.clear();
    }

    fn check_stmt(&self, stmt: StmtNo) -> Result<()> {
        if self.config.accepts_statement(stmt) {
            Ok(())
        } else {
            Err(PkbError::InvalidStatement(stmt))
        }
    }

    fn check_order(&self, relation: &'static str, left: StmtNo, right: StmtNo) -> Result<()> {
        self.check_stmt(left)?;
        self.check_stmt(right)?;
        if self.config.strict_follows_order && right <= left && left != right {
            return Err(PkbError::DescendingPair {
                relation,
                left,
                right,
            });
        }
        Ok(())
    }

    fn check_stmt_set(&self, stmts: &HashSet<StmtNo>) -> Result<()> {
        stmts.iter().try_for_each(|&stmt| self.check_stmt(stmt))
    }

    // Registry

    pub fn add_procedure(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            return logged("add_procedure", Err(PkbError::EmptyName("procedure")));
        }
        self.registry.add_procedure(name);
        Ok(())
    }

    pub fn add_variable(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            return logged("add_variable", Err(PkbError::EmptyName("variable")));
        }
        self.registry.add_variable(name);
        Ok(())
    }

    pub fn add_constant(&mut self, value: &str) -> Result<()> {
        if value.is_empty() {
            return logged("add_constant", Err(PkbError::EmptyName("constant")));
        }
        self.registry.add_constant(value);
        Ok(())
    }

    pub fn add_statement(&mut self, stmt: StmtNo, kind: StatementKind) -> Result<()> {
        let result = self
            .check_stmt(stmt)
            .and_then(|_| self.registry.add_statement(stmt, kind));
        logged("add_statement", result)
    }

    // Follows

    pub fn add_follow(&mut self, stmt1: StmtNo, stmt2: StmtNo) -> Result<()> {
        let result = self
            .check_order("Follows", stmt1, stmt2)
            .and_then(|_| self.follows.add_pair(stmt1, stmt2));
        logged("add_follow", result)
    }

    pub fn set_all_following(&mut self, stmt: StmtNo, following: HashSet<StmtNo>) -> Result<()> {
        let result = self
            .check_stmt(stmt)
            .and_then(|_| self.check_stmt_set(&following))
            .and_then(|_| self.follows.set_all_following(stmt, following));
        logged("set_all_following", result)
    }

    pub fn set_all_followed_by(&mut self, stmt: StmtNo, followed: HashSet<StmtNo>) -> Result<()> {
        let result = self
            .check_stmt(stmt)
            .and_then(|_| self.check_stmt_set(&followed))
            .and_then(|_| self.follows.set_all_followed_by(stmt, followed));
        logged("set_all_followed_by", result)
    }

    // Parent

    pub fn add_parent(&mut self, container: StmtNo, child: StmtNo) -> Result<()> {
        let result = self
            .check_order("Parent", container, child)
            .and_then(|_| self.parent.add_pair(container, child));
        logged("add_parent", result)
    }

    pub fn set_ancestors(&mut self, stmt: StmtNo, ancestors: HashSet<StmtNo>) -> Result<()> {
        let result = self
            .check_stmt(stmt)
            .and_then(|_| self.check_stmt_set(&ancestors))
            .and_then(|_| self.parent.set_ancestors(stmt, ancestors));
        logged("set_ancestors", result)
    }

    pub fn set_descendants(&mut self, stmt: StmtNo, descendants: HashSet<StmtNo>) -> Result<()> {
        let result = self
            .check_stmt(stmt)
            .and_then(|_| self.check_stmt_set(&descendants))
            .and_then(|_| self.parent.set_descendants(stmt, descendants));
        logged("set_descendants", result)
    }

    // Uses / Modifies

    pub fn add_uses_stmt(&mut self, stmt: StmtNo, variable: &str) -> Result<()> {
        let result = self
            .check_stmt(stmt)
            .and_then(|_| self.uses.record_stmt(stmt, variable));
        logged("add_uses_stmt", result)
    }

    pub fn add_uses_proc(&mut self, procedure: &str, variable: &str) -> Result<()> {
        logged("add_uses_proc", self.uses.record_proc(procedure, variable))
    }

    pub fn add_modifies_stmt(&mut self, stmt: StmtNo, variable: &str) -> Result<()> {
        let result = self
            .check_stmt(stmt)
            .and_then(|_| self.modifies.record_stmt(stmt, variable));
        logged("add_modifies_stmt", result)
    }

    pub fn add_modifies_proc(&mut self, procedure: &str, variable: &str) -> Result<()> {
        logged("add_modifies_proc", self.modifies.record_proc(procedure, variable))
    }

    // Calls

    pub fn add_call(&mut self, caller: &str, callee: &str) -> Result<()> {
        logged("add_call", self.calls.add_call(caller, callee))
    }

    pub fn set_call_ancestors(&mut self, procedure: &str, ancestors: HashSet<String>) -> Result<()> {
        logged(
            "set_call_ancestors",
            self.calls.set_call_ancestors(procedure, ancestors),
        )
    }

    pub fn set_call_descendants(&mut self, procedure: &str, descendants: HashSet<String>) -> Result<()> {
        logged(
            "set_call_descendants",
            self.calls.set_call_descendants(procedure, descendants),
        )
    }

    pub fn add_call_site(&mut self, stmt: StmtNo, callee: &str) -> Result<()> {
        let result = self
            .check_stmt(stmt)
            .and_then(|_| self.calls.add_call_site(stmt, callee));
        logged("add_call_site", result)
    }

    // Pattern

    pub fn add_assign_pattern(&mut self, stmt: StmtNo, variable: &str, expr: NormalizedExpr) -> Result<()> {
        let result = self
            .check_stmt(stmt)
            .and_then(|_| self.patterns.record(stmt, variable, expr));
        logged("add_assign_pattern", result)
    }

    // Read access

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn follows(&self) -> &FollowsStore {
        &self.follows
    }

    pub fn parent(&self) -> &ParentStore {
        &self.parent
    }

    pub fn uses(&self) -> &UsageStore {
        &self.uses
    }

    pub fn modifies(&self) -> &UsageStore {
        &self.modifies
    }

    pub fn usage(&self, kind: UsageKind) -> &UsageStore {
        match kind {
            UsageKind::Uses => &self.uses,
            UsageKind::Modifies => &self.modifies,
        }
    }

    pub fn calls(&self) -> &CallsStore {
        &self.calls
    }

    pub fn patterns(&self) -> &PatternStore {
        &self.patterns
    }

    pub fn statement_kind(&self, stmt: StmtNo) -> Result<StatementKind> {
        self.registry.statement_kind(stmt)
    }

    /// Affects, derived from the stored relations on every call.
    pub fn affects(&self) -> Affects<'_> {
        Affects::new(self)
    }
}
