use crate::closure::ClosureIndex;
use crate::{PkbError, Result, StmtNo};
use std::collections::{HashMap, HashSet};

const RELATION: &str = "Calls";

/// Procedure call graph, its closure, and the procedure invoked at each call statement.
#[derive(Debug, Clone)]
pub struct CallsStore {
    callees: HashMap<String, HashSet<String>>,
    callers: HashMap<String, HashSet<String>>,
    pairs: HashSet<(String, String)>,
    star: ClosureIndex<String>,
    call_sites: HashMap<StmtNo, String>,
}

impl Default for CallsStore {
    fn default() -> Self {
        Self {
            callees: HashMap::new(),
            callers: HashMap::new(),
            pairs: HashSet::new(),
            star: ClosureIndex::new("Calls*"),
            call_sites: HashMap::new(),
        }
    }
}

impl CallsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_call(&mut self, caller: &str, callee: &str) -> Result<()> {
        if caller.is_empty() || callee.is_empty() {
            return Err(PkbError::EmptyName(RELATION));
        }
        if caller == callee {
            return Err(PkbError::SelfRelation {
                relation: RELATION,
                subject: caller.to_string(),
            });
        }
        let pair = (caller.to_string(), callee.to_string());
        if self.pairs.contains(&pair) {
            return Err(PkbError::DuplicatePair {
                relation: RELATION,
                left: pair.0,
                right: pair.1,
            });
        }

        self.callees
            .entry(caller.to_string())
            .or_default()
            .insert(callee.to_string());
        self.callers
            .entry(callee.to_string())
            .or_default()
            .insert(caller.to_string());
        self.pairs.insert(pair);
        Ok(())
    }

    pub(crate) fn set_call_ancestors(&mut self, procedure: &str, ancestors: HashSet<String>) -> Result<()> {
        if procedure.is_empty() {
            return Err(PkbError::EmptyName("Calls*"));
        }
        self.star.set_backward(procedure.to_string(), ancestors)
    }

    pub(crate) fn set_call_descendants(&mut self, procedure: &str, descendants: HashSet<String>) -> Result<()> {
        if procedure.is_empty() {
            return Err(PkbError::EmptyName("Calls*"));
        }
        self.star.set_forward(procedure.to_string(), descendants)
    }

    /// A call statement invokes exactly one procedure.
    pub(crate) fn add_call_site(&mut self, stmt: StmtNo, callee: &str) -> Result<()> {
        if stmt == 0 {
            return Err(PkbError::InvalidStatement(stmt));
        }
        if callee.is_empty() {
            return Err(PkbError::EmptyName("call site"));
        }
        match self.call_sites.get(&stmt) {
            Some(existing) if existing != callee => Err(PkbError::ConflictingSuccessor {
                relation: "call site",
                left: stmt.to_string(),
                existing: existing.clone(),
            }),
            _ => {
                self.call_sites.insert(stmt, callee.to_string());
                Ok(())
            }
        }
    }

    pub fn has_call_relation(&self) -> bool {
        !self.pairs.is_empty()
    }

    pub fn has_call_pair(&self, caller: &str, callee: &str) -> bool {
        self.callees
            .get(caller)
            .map_or(false, |callees| callees.contains(callee))
    }

    pub fn has_call_star_relation(&self) -> bool {
        !self.star.is_empty()
    }

    pub fn has_call_star_pair(&self, caller: &str, callee: &str) -> bool {
        self.star.contains(&caller.to_string(), &callee.to_string())
    }

    pub fn is_caller(&self, procedure: &str) -> bool {
        self.callees.contains_key(procedure)
    }

    pub fn is_callee(&self, procedure: &str) -> bool {
        self.callers.contains_key(procedure)
    }

    pub fn is_caller_star(&self, procedure: &str) -> bool {
        self.star.has_targets(&procedure.to_string())
    }

    pub fn is_callee_star(&self, procedure: &str) -> bool {
        self.star.has_sources(&procedure.to_string())
    }

    pub fn callees_of(&self, procedure: &str) -> HashSet<String> {
        self.callees.get(procedure).cloned().unwrap_or_default()
    }

    pub fn callers_of(&self, procedure: &str) -> HashSet<String> {
        self.callers.get(procedure).cloned().unwrap_or_default()
    }

    pub fn call_descendants(&self, procedure: &str) -> HashSet<String> {
        self.star.targets_of(&procedure.to_string())
    }

    pub fn call_ancestors(&self, procedure: &str) -> HashSet<String> {
        self.star.sources_of(&procedure.to_string())
    }

    pub fn all_callers(&self) -> HashSet<String> {
        self.callees.keys().cloned().collect()
    }

    pub fn all_callees(&self) -> HashSet<String> {
        self.callers.keys().cloned().collect()
    }

    pub fn all_callers_star(&self) -> HashSet<String> {
        self.star.all_sources()
    }

    pub fn all_callees_star(&self) -> HashSet<String> {
        self.star.all_targets()
    }

    pub fn call_pairs(&self) -> HashSet<(String, String)> {
        self.pairs.clone()
    }

    pub fn call_star_pairs(&self) -> HashSet<(String, String)> {
        self.star.pairs()
    }

    pub fn callee_at(&self, stmt: StmtNo) -> Option<&str> {
        self.call_sites.get(&stmt).map(String::as_str)
    }

    pub(crate) fn clear(&mut self) {
        self.callees.clear();
        self.callers.clear();
        self.pairs.clear();
        self.star.clear();
        self.call_sites.clear();
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
    fn test_call_graph() {
        let mut calls = CallsStore::new();
        calls.add_call("main", "helper").unwrap();
        calls.add_call("helper", "leaf").unwrap();
        calls
            .set_call_descendants("main", strings(&["helper", "leaf"]))
            .unwrap();
        calls.set_call_descendants("helper", strings(&["leaf"])).unwrap();

        assert!(calls.has_call_pair("main", "helper"));
        assert!(!calls.has_call_pair("main", "leaf"));
        assert!(calls.has_call_star_pair("main", "leaf"));
        assert_eq!(calls.call_ancestors("leaf"), strings(&["main", "helper"]));
        assert_eq!(calls.all_callers(), strings(&["main", "helper"]));
        assert_eq!(calls.all_callees(), strings(&["helper", "leaf"]));
        assert!(calls.is_caller("main"));
        assert!(!calls.is_callee("main"));
    }

    #[test]
    fn test_rejected_calls() {
        let mut calls = CallsStore::new();
        calls.add_call("main", "helper").unwrap();
        assert!(matches!(
            calls.add_call("main", "main"),
            Err(PkbError::SelfRelation { .. })
        ));
        assert!(matches!(
            calls.add_call("main", "helper"),
            Err(PkbError::DuplicatePair { .. })
        ));
        assert_eq!(calls.add_call("", "helper"), Err(PkbError::EmptyName("Calls")));
        assert_eq!(calls.call_pairs().len(), 1);
    }

    #[test]
    fn test_call_sites() {
        let mut calls = CallsStore::new();
        calls.add_call_site(4, "helper").unwrap();
        assert!(calls.add_call_site(4, "helper").is_ok());
        assert!(calls.add_call_site(4, "other").is_err());
        assert_eq!(calls.callee_at(4), Some("helper"));
        assert_eq!(calls.callee_at(5), None);
    }
}
