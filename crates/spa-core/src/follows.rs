use crate::closure::ClosureIndex;
use crate::{PkbError, Result, StmtNo};
use std::collections::{HashMap, HashSet};

const RELATION: &str = "Follows";

/// Same-level sequencing of statements: each statement has at most one direct successor and at
/// most one direct predecessor.
#[derive(Debug, Clone)]
pub struct FollowsStore {
    successor: HashMap<StmtNo, StmtNo>,
    predecessor: HashMap<StmtNo, StmtNo>,
    pairs: HashSet<(StmtNo, StmtNo)>,
    star: ClosureIndex<StmtNo>,
}

impl Default for FollowsStore {
    fn default() -> Self {
        Self {
            successor: HashMap::new(),
            predecessor: HashMap::new(),
            pairs: HashSet::new(),
            star: ClosureIndex::new("Follows*"),
        }
    }
}

impl FollowsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_pair(&mut self, stmt1: StmtNo, stmt2: StmtNo) -> Result<()> {
        if stmt1 == stmt2 {
            return Err(PkbError::SelfRelation {
                relation: RELATION,
                subject: stmt1.to_string(),
            });
        }
        for stmt in [stmt1, stmt2] {
            if stmt == 0 {
                return Err(PkbError::InvalidStatement(stmt));
            }
        }
        if self.pairs.contains(&(stmt1, stmt2)) {
            return Err(PkbError::DuplicatePair {
                relation: RELATION,
                left: stmt1.to_string(),
                right: stmt2.to_string(),
            });
        }
        if let Some(&existing) = self.successor.get(&stmt1) {
            return Err(PkbError::ConflictingSuccessor {
                relation: RELATION,
                left: stmt1.to_string(),
                existing: existing.to_string(),
            });
        }
        if let Some(&existing) = self.predecessor.get(&stmt2) {
            return Err(PkbError::ConflictingPredecessor {
                relation: RELATION,
                right: stmt2.to_string(),
                existing: existing.to_string(),
            });
        }
        if self.reaches(stmt2, stmt1) {
            return Err(PkbError::Cycle {
                relation: RELATION,
                left: stmt1,
                right: stmt2,
            });
        }

        self.successor.insert(stmt1, stmt2);
        self.predecessor.insert(stmt2, stmt1);
        self.pairs.insert((stmt1, stmt2));
        Ok(())
    }

    // Successor chains are simple paths, so this terminates while the store stays acyclic.
    fn reaches(&self, from: StmtNo, to: StmtNo) -> bool {
        let mut current = from;
        while let Some(&next) = self.successor.get(&current) {
            if next == to {
                return true;
            }
            current = next;
        }
        false
    }

    pub(crate) fn set_all_following(&mut self, stmt: StmtNo, following: HashSet<StmtNo>) -> Result<()> {
        self.star.set_forward(stmt, following)
    }

    pub(crate) fn set_all_followed_by(&mut self, stmt: StmtNo, followed: HashSet<StmtNo>) -> Result<()> {
        self.star.set_backward(stmt, followed)
    }

    pub fn has_follow_relation(&self) -> bool {
        !self.pairs.is_empty()
    }

    pub fn has_follow_pair(&self, stmt1: StmtNo, stmt2: StmtNo) -> bool {
        self.pairs.contains(&(stmt1, stmt2))
    }

    pub fn has_follow_star_relation(&self) -> bool {
        !self.star.is_empty()
    }

    pub fn has_follow_star_pair(&self, stmt1: StmtNo, stmt2: StmtNo) -> bool {
        self.star.contains(&stmt1, &stmt2)
    }

    /// The statement directly before `stmt`.
    pub fn followed_by(&self, stmt: StmtNo) -> Option<StmtNo> {
        self.predecessor.get(&stmt).copied()
    }

    /// The statement directly after `stmt`.
    pub fn follower(&self, stmt: StmtNo) -> Option<StmtNo> {
        self.successor.get(&stmt).copied()
    }

    pub fn all_following(&self, stmt: StmtNo) -> HashSet<StmtNo> {
        self.star.targets_of(&stmt)
    }

    pub fn all_followed_by(&self, stmt: StmtNo) -> HashSet<StmtNo> {
        self.star.sources_of(&stmt)
    }

    pub fn is_followed(&self, stmt: StmtNo) -> bool {
        self.successor.contains_key(&stmt)
    }

    pub fn is_follower(&self, stmt: StmtNo) -> bool {
        self.predecessor.contains_key(&stmt)
    }

    pub fn is_followed_star(&self, stmt: StmtNo) -> bool {
        self.star.has_targets(&stmt)
    }

    pub fn is_follower_star(&self, stmt: StmtNo) -> bool {
        self.star.has_sources(&stmt)
    }

    /// Statements that directly follow some statement.
    pub fn all_followers(&self) -> HashSet<StmtNo> {
        self.predecessor.keys().copied().collect()
    }

    /// Statements that are directly followed by some statement.
    pub fn all_followed(&self) -> HashSet<StmtNo> {
        self.successor.keys().copied().collect()
    }

    pub fn all_followers_star(&self) -> HashSet<StmtNo> {
        self.star.all_targets()
    }

    pub fn all_followed_star(&self) -> HashSet<StmtNo> {
        self.star.all_sources()
    }

    pub fn follow_pairs(&self) -> HashSet<(StmtNo, StmtNo)> {
        self.pairs.clone()
    }

    pub fn follow_star_pairs(&self) -> HashSet<(StmtNo, StmtNo)> {
        self.star.pairs()
    }

    pub(crate) fn clear(&mut self) {
        self.successor.clear();
        self.predecessor.clear();
        self.pairs.clear();
        self.star.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sequence() -> FollowsStore {
        let mut store = FollowsStore::new();
        store.add_pair(1, 2).unwrap();
        store.add_pair(2, 3).unwrap();
        store.set_all_following(1, HashSet::from([2, 3])).unwrap();
        store.set_all_following(2, HashSet::from([3])).unwrap();
        store.set_all_followed_by(3, HashSet::from([1, 2])).unwrap();
        store.set_all_followed_by(2, HashSet::from([1])).unwrap();
        store
    }

    #[test]
    fn test_simple_sequence() {
        let store = sequence();
        assert!(store.has_follow_star_pair(1, 3));
        assert!(!store.has_follow_pair(1, 3));
        assert_eq!(store.followed_by(3), Some(2));
        assert_eq!(store.follower(1), Some(2));
        assert_eq!(store.follower(3), None);
        assert_eq!(store.all_following(1), HashSet::from([2, 3]));
        assert_eq!(store.all_followed_by(3), HashSet::from([1, 2]));
        assert_eq!(store.all_followers(), HashSet::from([2, 3]));
        assert_eq!(store.all_followed(), HashSet::from([1, 2]));
    }

    #[test]
    fn test_rejections_leave_store_unchanged() {
        let mut store = sequence();
        let before = store.follow_pairs();

        assert!(matches!(
            store.add_pair(4, 4),
            Err(PkbError::SelfRelation { .. })
        ));
        assert_eq!(store.add_pair(0, 4), Err(PkbError::InvalidStatement(0)));
        assert!(matches!(
            store.add_pair(1, 2),
            Err(PkbError::DuplicatePair { .. })
        ));
        assert!(matches!(
            store.add_pair(1, 5),
            Err(PkbError::ConflictingSuccessor { .. })
        ));
        assert!(matches!(
            store.add_pair(5, 2),
            Err(PkbError::ConflictingPredecessor { .. })
        ));
        assert!(matches!(
            store.set_all_following(1, HashSet::from([2, 3, 4])),
            Err(PkbError::ClosureAlreadySet { .. })
        ));

        assert_eq!(store.follow_pairs(), before);
        assert!(!store.has_follow_star_pair(1, 4));
    }

    #[test]
    fn test_rejects_pairs_closing_a_cycle() {
        let mut store = sequence();
        assert_eq!(
            store.add_pair(3, 1),
            Err(PkbError::Cycle {
                relation: "Follows",
                left: 3,
                right: 1,
            })
        );
        assert!(store.follower(3).is_none());

        let mut store = FollowsStore::new();
        store.add_pair(1, 2).unwrap();
        assert!(matches!(store.add_pair(2, 1), Err(PkbError::Cycle { .. })));
        assert_eq!(store.follow_pairs(), HashSet::from([(1, 2)]));
    }

    #[test]
    fn test_descending_numbers_are_allowed() {
        let mut store = FollowsStore::new();
        assert!(store.add_pair(7, 3).is_ok());
        assert_eq!(store.follower(7), Some(3));
    }

    #[test]
    fn test_closure_is_transitive_over_base_pairs() {
        let store = sequence();
        for (a, b) in store.follow_pairs() {
            for c in store.all_following(b) {
                assert!(store.has_follow_star_pair(a, c));
            }
        }
    }
}
