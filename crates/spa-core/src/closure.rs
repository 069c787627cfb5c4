//! Write-once transitive closure shared by Follows*, Parent* and Calls*.
//!
//! The extraction stage computes each node's complete closure and hands it over in one call per
//! direction. Every resulting pair lands in one pair index that is then indexed both ways, so
//! forward and backward lookups agree no matter which direction a caller chose to set.

use crate::{PkbError, Result};
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct ClosureIndex<K> {
    relation: &'static str,
    forward_set: HashSet<K>,
    backward_set: HashSet<K>,
    pairs: HashSet<(K, K)>,
    targets: HashMap<K, HashSet<K>>,
    sources: HashMap<K, HashSet<K>>,
}

impl<K> ClosureIndex<K>
where
    K: Clone + Eq + Hash + Display,
{
    pub fn new(relation: &'static str) -> Self {
        Self {
            relation,
            forward_set: HashSet::new(),
            backward_set: HashSet::new(),
            pairs: HashSet::new(),
            targets: HashMap::new(),
            sources: HashMap::new(),
        }
    }

    /// Records every `(node, t)` for `t` in `targets`.
    pub fn set_forward(&mut self, node: K, targets: HashSet<K>) -> Result<()> {
        self.check(&node, &targets, &self.forward_set)?;
        for target in targets {
            self.insert_pair(node.clone(), target);
        }
        self.forward_set.insert(node);
        Ok(())
    }

    /// Records every `(s, node)` for `s` in `sources`.
    pub fn set_backward(&mut self, node: K, sources: HashSet<K>) -> Result<()> {
        self.check(&node, &sources, &self.backward_set)?;
        for source in sources {
            self.insert_pair(source, node.clone());
        }
        self.backward_set.insert(node);
        Ok(())
    }

    fn check(&self, node: &K, others: &HashSet<K>, already: &HashSet<K>) -> Result<()> {
        if already.contains(node) {
            return Err(PkbError::ClosureAlreadySet {
                relation: self.relation,
                subject: node.to_string(),
            });
        }
        if others.contains(node) {
            return Err(PkbError::SelfRelation {
                relation: self.relation,
                subject: node.to_string(),
            });
        }
        Ok(())
    }

    fn insert_pair(&mut self, left: K, right: K) {
        if self.pairs.insert((left.clone(), right.clone())) {
            self.targets
                .entry(left.clone())
                .or_default()
                .insert(right.clone());
            self.sources.entry(right).or_default().insert(left);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains(&self, left: &K, right: &K) -> bool {
        self.pairs.contains(&(left.clone(), right.clone()))
    }

    pub fn targets_of(&self, node: &K) -> HashSet<K> {
        self.targets.get(node).cloned().unwrap_or_default()
    }

    pub fn sources_of(&self, node: &K) -> HashSet<K> {
        self.sources.get(node).cloned().unwrap_or_default()
    }

    pub fn has_targets(&self, node: &K) -> bool {
        self.targets.contains_key(node)
    }

    pub fn has_sources(&self, node: &K) -> bool {
        self.sources.contains_key(node)
    }

    pub fn all_sources(&self) -> HashSet<K> {
        self.targets.keys().cloned().collect()
    }

    pub fn all_targets(&self) -> HashSet<K> {
        self.sources.keys().cloned().collect()
    }

    pub fn pairs(&self) -> HashSet<(K, K)> {
        self.pairs.clone()
    }

    pub fn clear(&mut self) {
        self.forward_set.clear();
        self.backward_set.clear();
        self.pairs.clear();
        self.targets.clear();
        self.sources.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_forward_and_backward_share_pairs() {
        let mut index = ClosureIndex::new("Follows*");
        index.set_forward(1u32, HashSet::from([2, 3])).unwrap();
        index.set_backward(3u32, HashSet::from([1, 2])).unwrap();

        assert!(index.contains(&1, &3));
        assert!(index.contains(&2, &3));
        assert_eq!(index.sources_of(&3), HashSet::from([1, 2]));
        assert_eq!(index.targets_of(&2), HashSet::from([3]));
        assert_eq!(index.pairs().len(), 3);
    }

    #[test]
    fn test_second_set_is_rejected_without_mutation() {
        let mut index = ClosureIndex::new("Parent*");
        index.set_forward(1u32, HashSet::from([2])).unwrap();

        let err = index.set_forward(1, HashSet::from([2, 3])).unwrap_err();
        assert!(matches!(err, PkbError::ClosureAlreadySet { .. }));
        assert!(!index.contains(&1, &3));

        // the backward direction of the same node is still open
        assert!(index.set_backward(1, HashSet::from([0])).is_ok());
    }

    #[test]
    fn test_reflexive_closure_is_rejected() {
        let mut index = ClosureIndex::new("Calls*");
        let err = index
            .set_forward("a".to_string(), HashSet::from(["a".to_string()]))
            .unwrap_err();
        assert!(matches!(err, PkbError::SelfRelation { .. }));
        assert!(index.is_empty());
    }
}
