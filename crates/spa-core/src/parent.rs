use crate::closure::ClosureIndex;
use crate::{PkbError, Result, StmtNo};
use std::collections::{HashMap, HashSet};

const RELATION: &str = "Parent";

/// Direct and transitive containment of statements in while/if statements.
#[derive(Debug, Clone)]
pub struct ParentStore {
    parent: HashMap<StmtNo, StmtNo>,
    children: HashMap<StmtNo, HashSet<StmtNo>>,
    pairs: HashSet<(StmtNo, StmtNo)>,
    star: ClosureIndex<StmtNo>,
}

impl Default for ParentStore {
    fn default() -> Self {
        Self {
            parent: HashMap::new(),
            children: HashMap::new(),
            pairs: HashSet::new(),
            star: ClosureIndex::new("Parent*"),
        }
    }
}

impl ParentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_pair(&mut self, container: StmtNo, child: StmtNo) -> Result<()> {
        if container == child {
            return Err(PkbError::SelfRelation {
                relation: RELATION,
                subject: container.to_string(),
            });
        }
        for stmt in [container, child] {
            if stmt == 0 {
                return Err(PkbError::InvalidStatement(stmt));
            }
        }
        if self.pairs.contains(&(container, child)) {
            return Err(PkbError::DuplicatePair {
                relation: RELATION,
                left: container.to_string(),
                right: child.to_string(),
            });
        }
        if let Some(&existing) = self.parent.get(&child) {
            return Err(PkbError::ConflictingPredecessor {
                relation: RELATION,
                right: child.to_string(),
                existing: existing.to_string(),
            });
        }
        if self.is_above(child, container) {
            return Err(PkbError::Cycle {
                relation: RELATION,
                left: container,
                right: child,
            });
        }

        self.parent.insert(child, container);
        self.children.entry(container).or_default().insert(child);
        self.pairs.insert((container, child));
        Ok(())
    }

    /// Whether `upper` is `stmt` or one of its containers.
    fn is_above(&self, upper: StmtNo, stmt: StmtNo) -> bool {
        let mut current = stmt;
        loop {
            if current == upper {
                return true;
            }
            match self.parent.get(&current) {
                Some(&container) => current = container,
                None => return false,
            }
        }
    }

    pub(crate) fn set_ancestors(&mut self, stmt: StmtNo, ancestors: HashSet<StmtNo>) -> Result<()> {
        self.star.set_backward(stmt, ancestors)
    }

    pub(crate) fn set_descendants(&mut self, stmt: StmtNo, descendants: HashSet<StmtNo>) -> Result<()> {
        self.star.set_forward(stmt, descendants)
    }

    pub fn has_parent_relation(&self) -> bool {
        !self.pairs.is_empty()
    }

    pub fn has_parent_pair(&self, container: StmtNo, child: StmtNo) -> bool {
        self.pairs.contains(&(container, child))
    }

    pub fn has_parent_star_relation(&self) -> bool {
        !self.star.is_empty()
    }

    pub fn has_anc_desc_pair(&self, ancestor: StmtNo, descendant: StmtNo) -> bool {
        self.star.contains(&ancestor, &descendant)
    }

    pub fn is_parent(&self, stmt: StmtNo) -> bool {
        self.children.contains_key(&stmt)
    }

    pub fn is_child(&self, stmt: StmtNo) -> bool {
        self.parent.contains_key(&stmt)
    }

    pub fn is_ancestor(&self, stmt: StmtNo) -> bool {
        self.star.has_targets(&stmt)
    }

    pub fn is_descendant(&self, stmt: StmtNo) -> bool {
        self.star.has_sources(&stmt)
    }

    pub fn parent_of(&self, stmt: StmtNo) -> Option<StmtNo> {
        self.parent.get(&stmt).copied()
    }

    pub fn children_of(&self, stmt: StmtNo) -> HashSet<StmtNo> {
        self.children.get(&stmt).cloned().unwrap_or_default()
    }

    pub fn ancestors_of(&self, stmt: StmtNo) -> HashSet<StmtNo> {
        self.star.sources_of(&stmt)
    }

    pub fn descendants_of(&self, stmt: StmtNo) -> HashSet<StmtNo> {
        self.star.targets_of(&stmt)
    }

    pub fn all_parents(&self) -> HashSet<StmtNo> {
        self.children.keys().copied().collect()
    }

    pub fn all_children(&self) -> HashSet<StmtNo> {
        self.parent.keys().copied().collect()
    }

    pub fn all_ancestors(&self) -> HashSet<StmtNo> {
        self.star.all_sources()
    }

    pub fn all_descendants(&self) -> HashSet<StmtNo> {
        self.star.all_targets()
    }

    pub fn parent_child_pairs(&self) -> HashSet<(StmtNo, StmtNo)> {
        self.pairs.clone()
    }

    pub fn anc_desc_pairs(&self) -> HashSet<(StmtNo, StmtNo)> {
        self.star.pairs()
    }

    pub(crate) fn clear(&mut self) {
        self.parent.clear();
        self.children.clear();
        self.pairs.clear();
        self.star.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // 1: x = 0; 2: while { 3: ...; 4: if { 5: ... } }
    fn nested() -> ParentStore {
        let mut store = ParentStore::new();
        store.add_pair(2, 3).unwrap();
        store.add_pair(2, 4).unwrap();
        store.add_pair(4, 5).unwrap();
        store.set_descendants(2, HashSet::from([3, 4, 5])).unwrap();
        store.set_descendants(4, HashSet::from([5])).unwrap();
        store.set_ancestors(5, HashSet::from([2, 4])).unwrap();
        store
    }

    #[test]
    fn test_while_with_children() {
        let store = nested();
        assert_eq!(store.children_of(2), HashSet::from([3, 4]));
        assert!(store.is_parent(2));
        assert!(store.is_child(3));
        assert!(!store.is_child(2));
        assert!(!store.is_parent(1));
        assert_eq!(store.parent_of(5), Some(4));
        assert_eq!(store.parent_of(2), None);
        assert!(store.children_of(1).is_empty());
    }

    #[test]
    fn test_ancestors_and_descendants() {
        let store = nested();
        assert!(store.has_anc_desc_pair(2, 5));
        assert!(!store.has_parent_pair(2, 5));
        assert_eq!(store.ancestors_of(5), HashSet::from([2, 4]));
        assert_eq!(store.descendants_of(4), HashSet::from([5]));
        assert_eq!(store.all_ancestors(), HashSet::from([2, 4]));
        assert_eq!(store.all_descendants(), HashSet::from([3, 4, 5]));
    }

    #[test]
    fn test_child_has_one_parent() {
        let mut store = nested();
        assert!(matches!(
            store.add_pair(4, 3),
            Err(PkbError::ConflictingPredecessor { .. })
        ));
        assert!(matches!(
            store.add_pair(2, 3),
            Err(PkbError::DuplicatePair { .. })
        ));
        assert!(store.add_pair(4, 6).is_ok());
        assert_eq!(store.children_of(4), HashSet::from([5, 6]));
    }

    #[test]
    fn test_containment_stays_a_forest() {
        let mut store = nested();
        assert_eq!(
            store.add_pair(5, 2),
            Err(PkbError::Cycle {
                relation: "Parent",
                left: 5,
                right: 2,
            })
        );
        assert_eq!(store.parent_of(2), None);

        let mut store = ParentStore::new();
        store.add_pair(3, 4).unwrap();
        assert!(matches!(store.add_pair(4, 3), Err(PkbError::Cycle { .. })));
        assert_eq!(store.parent_child_pairs(), HashSet::from([(3, 4)]));
    }

    #[test]
    fn test_closure_set_once() {
        let mut store = nested();
        assert!(matches!(
            store.set_ancestors(5, HashSet::from([2])),
            Err(PkbError::ClosureAlreadySet { .. })
        ));
        assert_eq!(store.ancestors_of(5), HashSet::from([2, 4]));
    }
}
