//! Affects, derived on demand.
//!
//! `Affects(a, b)` holds when both are assignments, `a` modifies some `v` that `b` uses, and
//! control can pass from `a` to `b` (at least one step, inside one procedure) without
//! going through a read, assignment or call that modifies `v`. Containers on the way only
//! evaluate their condition, so they never overwrite anything.
//!
//! There is no stored control-flow graph. Successors come from Follows and Parent: after a
//! statement comes its follower; the last statement of a while body goes back to the while;
//! the last statement of an if branch continues after the if. Branch heads are the children
//! with no predecessor. Statement numbers are textual, so the lower head starts the then-branch.
//! Nothing here is cached. Every query walks the current store again.

use crate::pkb::Pkb;
use crate::registry::{StatementKind, StmtNo};
use std::collections::HashSet;

pub struct Affects<'a> {
    pkb: &'a Pkb,
}

impl<'a> Affects<'a> {
    pub fn new(pkb: &'a Pkb) -> Self {
        Self { pkb }
    }

    fn is_assign(&self, stmt: StmtNo) -> bool {
        self.pkb.registry().is_kind(stmt, StatementKind::Assign)
    }

    fn assignments(&self) -> Vec<StmtNo> {
        let mut stmts: Vec<_> = self
            .pkb
            .registry()
            .statements_of(StatementKind::Assign)
            .into_iter()
            .collect();
        stmts.sort_unstable();
        stmts
    }

    /// Whether passing through `stmt` overwrites `variable`.
    fn kills(&self, stmt: StmtNo, variable: &str) -> bool {
        match self.pkb.registry().kind_of(stmt) {
            Some(StatementKind::Assign) | Some(StatementKind::Read) => {
                self.pkb.modifies().stmt_has(stmt, variable)
            }
            Some(StatementKind::Call) => {
                self.pkb.modifies().stmt_has(stmt, variable)
                    || self
                        .pkb
                        .calls()
                        .callee_at(stmt)
                        .map_or(false, |callee| self.pkb.modifies().proc_has(callee, variable))
            }
            Some(StatementKind::While)
            | Some(StatementKind::If)
            | Some(StatementKind::Print)
            | None => false,
        }
    }

    /// Heads of the statement lists directly inside `container`, lowest first.
    fn branch_heads(&self, container: StmtNo) -> Vec<StmtNo> {
        let follows = self.pkb.follows();
        let mut heads: Vec<_> = self
            .pkb
            .parent()
            .children_of(container)
            .into_iter()
            .filter(|&child| follows.followed_by(child).is_none())
            .collect();
        heads.sort_unstable();
        heads
    }

    /// Where control goes once `stmt` (including anything nested in it) has finished.
    fn exit_of(&self, stmt: StmtNo) -> Option<StmtNo> {
        let mut current = stmt;
        loop {
            if let Some(next) = self.pkb.follows().follower(current) {
                return Some(next);
            }
            let container = self.pkb.parent().parent_of(current)?;
            match self.pkb.registry().kind_of(container) {
                Some(StatementKind::While) => return Some(container),
                _ => current = container,
            }
        }
    }

    /// Control-flow successors of `stmt`.
    pub fn successors(&self, stmt: StmtNo) -> Vec<StmtNo> {
        match self.pkb.registry().kind_of(stmt) {
            Some(StatementKind::While) => {
                let mut next = self.branch_heads(stmt);
                next.truncate(1);
                next.extend(self.exit_of(stmt));
                next
            }
            Some(StatementKind::If) => {
                let heads = self.branch_heads(stmt);
                if heads.is_empty() {
                    self.exit_of(stmt).into_iter().collect()
                } else {
                    heads
                }
            }
            _ => self.exit_of(stmt).into_iter().collect(),
        }
    }

    // Walks forward from `from` while `variable` stays live, handing every assignment that uses it
    // to `visit`. Stops as soon as `visit` returns true.
    fn walk(&self, from: StmtNo, variable: &str, mut visit: impl FnMut(StmtNo) -> bool) {
        let mut visited = HashSet::new();
        let mut worklist = self.successors(from);

        while let Some(stmt) = worklist.pop() {
            if !visited.insert(stmt) {
                continue;
            }
            if self.is_assign(stmt) && self.pkb.uses().stmt_has(stmt, variable) && visit(stmt) {
                return;
            }
            if self.kills(stmt, variable) {
                continue;
            }
            worklist.extend(self.successors(stmt));
        }
    }

    fn written_by(&self, stmt: StmtNo) -> Vec<String> {
        if !self.is_assign(stmt) {
            return Vec::new();
        }
        let mut vars: Vec<_> = self.pkb.modifies().vars_of_stmt(stmt).into_iter().collect();
        vars.sort();
        vars
    }

    pub fn has_affect_pair(&self, affector: StmtNo, affected: StmtNo) -> bool {
        if !self.is_assign(affected) {
            return false;
        }
        self.written_by(affector).iter().any(|variable| {
            if !self.pkb.uses().stmt_has(affected, variable) {
                return false;
            }
            let mut found = false;
            self.walk(affector, variable, |stmt| {
                found = stmt == affected;
                found
            });
            found
        })
    }

    /// Statements affected by `affector`.
    pub fn affected_by(&self, affector: StmtNo) -> HashSet<StmtNo> {
        let mut affected = HashSet::new();
        for variable in self.written_by(affector) {
            self.walk(affector, &variable, |stmt| {
                affected.insert(stmt);
                false
            });
        }
        affected
    }

    /// Statements that affect `affected`.
    pub fn affectors_of(&self, affected: StmtNo) -> HashSet<StmtNo> {
        if !self.is_assign(affected) {
            return HashSet::new();
        }
        let mut candidates = HashSet::new();
        for variable in self.pkb.uses().vars_of_stmt(affected) {
            candidates.extend(
                self.pkb
                    .modifies()
                    .stmts_with(&variable)
                    .into_iter()
                    .filter(|&stmt| self.is_assign(stmt)),
            );
        }
        candidates
            .into_iter()
            .filter(|&candidate| self.has_affect_pair(candidate, affected))
            .collect()
    }

    pub fn is_affector(&self, stmt: StmtNo) -> bool {
        self.written_by(stmt).iter().any(|variable| {
            let mut found = false;
            self.walk(stmt, variable, |_| {
                found = true;
                true
            });
            found
        })
    }

    pub fn is_affected(&self, stmt: StmtNo) -> bool {
        !self.affectors_of(stmt).is_empty()
    }

    pub fn has_affects_relation(&self) -> bool {
        self.assignments()
            .into_iter()
            .any(|stmt| self.is_affector(stmt))
    }

    pub fn all_affectors(&self) -> HashSet<StmtNo> {
        self.assignments()
            .into_iter()
            .filter(|&stmt| self.is_affector(stmt))
            .collect()
    }

    pub fn all_affected(&self) -> HashSet<StmtNo> {
        self.assignments()
            .into_iter()
            .flat_map(|stmt| self.affected_by(stmt))
            .collect()
    }

    pub fn affect_pairs(&self) -> HashSet<(StmtNo, StmtNo)> {
        let mut pairs = HashSet::new();
        for affector in self.assignments() {
            for affected in self.affected_by(affector) {
                pairs.insert((affector, affected));
            }
        }
        pairs
    }
}
