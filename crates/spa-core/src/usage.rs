use crate::{PkbError, Result, StmtNo};
use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageKind {
    Uses,
    Modifies,
}

impl UsageKind {
    pub fn name(&self) -> &'static str {
        match self {
            UsageKind::Uses => "Uses",
            UsageKind::Modifies => "Modifies",
        }
    }
}

impl fmt::Display for UsageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Statement-to-variable and procedure-to-variable facts for one of Uses or Modifies.
///
/// Facts are sets: recording the same fact twice is accepted and changes nothing, since
/// extraction reaches a container's facts through each nested statement.
#[derive(Debug, Clone)]
pub struct UsageStore {
    kind: UsageKind,
    stmt_vars: HashMap<StmtNo, HashSet<String>>,
    var_stmts: HashMap<String, HashSet<StmtNo>>,
    proc_vars: HashMap<String, HashSet<String>>,
    var_procs: HashMap<String, HashSet<String>>,
    stmt_pairs: HashSet<(StmtNo, String)>,
    proc_pairs: HashSet<(String, String)>,
}

impl UsageStore {
    pub fn new(kind: UsageKind) -> Self {
        Self {
            kind,
            stmt_vars: HashMap::new(),
            var_stmts: HashMap::new(),
            proc_vars: HashMap::new(),
            var_procs: HashMap::new(),
            stmt_pairs: HashSet::new(),
            proc_pairs: HashSet::new(),
        }
    }

    pub fn kind(&self) -> UsageKind {
        self.kind
    }

    pub(crate) fn record_stmt(&mut self, stmt: StmtNo, variable: &str) -> Result<()> {
        if stmt == 0 {
            return Err(PkbError::InvalidStatement(stmt));
        }
        if variable.is_empty() {
            return Err(PkbError::EmptyName(self.kind.name()));
        }
        if self.stmt_pairs.insert((stmt, variable.to_string())) {
            self.stmt_vars
                .entry(stmt)
                .or_default()
                .insert(variable.to_string());
            self.var_stmts
                .entry(variable.to_string())
                .or_default()
                .insert(stmt);
        }
        Ok(())
    }

    pub(crate) fn record_proc(&mut self, procedure: &str, variable: &str) -> Result<()> {
        if procedure.is_empty() || variable.is_empty() {
            return Err(PkbError::EmptyName(self.kind.name()));
        }
        if self
            .proc_pairs
            .insert((procedure.to_string(), variable.to_string()))
        {
            self.proc_vars
                .entry(procedure.to_string())
                .or_default()
                .insert(variable.to_string());
            self.var_procs
                .entry(variable.to_string())
                .or_default()
                .insert(procedure.to_string());
        }
        Ok(())
    }

    pub fn has_relation(&self) -> bool {
        !self.stmt_pairs.is_empty()
    }

    pub fn has_proc_relation(&self) -> bool {
        !self.proc_pairs.is_empty()
    }

    pub fn stmt_has(&self, stmt: StmtNo, variable: &str) -> bool {
        self.stmt_vars
            .get(&stmt)
            .map_or(false, |vars| vars.contains(variable))
    }

    pub fn proc_has(&self, procedure: &str, variable: &str) -> bool {
        self.proc_vars
            .get(procedure)
            .map_or(false, |vars| vars.contains(variable))
    }

    /// Whether `stmt` has at least one fact.
    pub fn stmt_has_any(&self, stmt: StmtNo) -> bool {
        self.stmt_vars.contains_key(&stmt)
    }

    pub fn proc_has_any(&self, procedure: &str) -> bool {
        self.proc_vars.contains_key(procedure)
    }

    pub fn vars_of_stmt(&self, stmt: StmtNo) -> HashSet<String> {
        self.stmt_vars.get(&stmt).cloned().unwrap_or_default()
    }

    pub fn vars_of_proc(&self, procedure: &str) -> HashSet<String> {
        self.proc_vars.get(procedure).cloned().unwrap_or_default()
    }

    pub fn stmts_with(&self, variable: &str) -> HashSet<StmtNo> {
        self.var_stmts.get(variable).cloned().unwrap_or_default()
    }

    pub fn procs_with(&self, variable: &str) -> HashSet<String> {
        self.var_procs.get(variable).cloned().unwrap_or_default()
    }

    pub fn all_stmts(&self) -> HashSet<StmtNo> {
        self.stmt_vars.keys().copied().collect()
    }

    pub fn all_procs(&self) -> HashSet<String> {
        self.proc_vars.keys().cloned().collect()
    }

    pub fn all_stmt_vars(&self) -> HashSet<String> {
        self.var_stmts.keys().cloned().collect()
    }

    pub fn all_proc_vars(&self) -> HashSet<String> {
        self.var_procs.keys().cloned().collect()
    }

    pub fn stmt_var_pairs(&self) -> HashSet<(StmtNo, String)> {
        self.stmt_pairs.clone()
    }

    pub fn proc_var_pairs(&self) -> HashSet<(String, String)> {
        self.proc_pairs.clone()
    }

    pub(crate) fn clear(&mut self) {
        self.stmt_vars.clear();
        self.var_stmts.clear();
        self.proc_vars.clear();
        self.var_procs.clear();
        self.stmt_pairs.clear();
        self.proc_pairs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_statement_facts() {
        let mut uses = UsageStore::new(UsageKind::Uses);
        uses.record_stmt(3, "x").unwrap();
        uses.record_stmt(3, "y").unwrap();
        uses.record_stmt(5, "x").unwrap();

        assert!(uses.stmt_has(3, "y"));
        assert!(!uses.stmt_has(5, "y"));
        assert_eq!(uses.vars_of_stmt(3), strings(&["x", "y"]));
        assert_eq!(uses.stmts_with("x"), HashSet::from([3, 5]));
        assert!(uses.stmts_with("z").is_empty());
        assert_eq!(uses.stmt_var_pairs().len(), 3);
    }

    #[test]
    fn test_duplicate_records_are_idempotent() {
        let mut modifies = UsageStore::new(UsageKind::Modifies);
        modifies.record_stmt(1, "x").unwrap();
        modifies.record_proc("main", "x").unwrap();
        let stmt_pairs = modifies.stmt_var_pairs();
        let proc_pairs = modifies.proc_var_pairs();

        assert!(modifies.record_stmt(1, "x").is_ok());
        assert!(modifies.record_proc("main", "x").is_ok());
        assert_eq!(modifies.stmt_var_pairs(), stmt_pairs);
        assert_eq!(modifies.proc_var_pairs(), proc_pairs);
        assert_eq!(modifies.procs_with("x"), strings(&["main"]));
    }

    #[test]
    fn test_invalid_records() {
        let mut uses = UsageStore::new(UsageKind::Uses);
        assert_eq!(uses.record_stmt(0, "x"), Err(PkbError::InvalidStatement(0)));
        assert_eq!(uses.record_stmt(1, ""), Err(PkbError::EmptyName("Uses")));
        assert_eq!(uses.record_proc("", "x"), Err(PkbError::EmptyName("Uses")));
        assert_eq!(uses.record_proc("main", ""), Err(PkbError::EmptyName("Uses")));
        assert!(!uses.has_relation());
        assert!(!uses.has_proc_relation());
    }
}
