use super::sample;
use crate::{mirror, ClauseKind, Declarations, DesignEntity};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn declarations() -> Declarations {
    Declarations::new()
        .declare("s", DesignEntity::Stmt)
        .declare("t", DesignEntity::Stmt)
}

#[test]
fn test_trivial_agrees_with_table_membership() {
    let pkb = sample();
    let decls = declarations();
    for kind in ClauseKind::ALL {
        let evaluator = kind.evaluator(&pkb);
        let lefts = evaluator.evaluate(&decls, "s", "_").unwrap();
        let rights = evaluator.evaluate(&decls, "_", "s").unwrap();
        for stmt in 1..=9u32 {
            let literal = stmt.to_string();
            assert_eq!(
                evaluator.is_trivial(&literal, "_").unwrap(),
                lefts.column("s").unwrap().contains(&literal),
                "{kind}({literal}, _)"
            );
            assert_eq!(
                evaluator.is_trivial("_", &literal).unwrap(),
                rights.column("s").unwrap().contains(&literal),
                "{kind}(_, {literal})"
            );
        }
    }
}

#[test]
fn test_self_pair_is_union_of_projections() {
    let pkb = sample();
    let decls = declarations();
    for kind in ClauseKind::ALL {
        let evaluator = kind.evaluator(&pkb);
        let pairs = evaluator.evaluate(&decls, "s", "t").unwrap();
        let pairs: HashSet<(String, String)> = pairs
            .rows()
            .into_iter()
            .map(|row| (row[0].to_string(), row[1].to_string()))
            .collect();
        let mirrored = evaluator.evaluate(&decls, "s", "s").unwrap();
        let mirrored: HashSet<String> = mirrored.column("s").unwrap().iter().cloned().collect();
        assert_eq!(mirrored, mirror(&pairs), "{kind}(s, s)");
    }
}

#[test]
fn test_pair_table_matches_trivial_pairs() {
    let pkb = sample();
    let decls = declarations();
    for kind in [ClauseKind::Follows, ClauseKind::ParentStar, ClauseKind::Affects] {
        let evaluator = kind.evaluator(&pkb);
        let table = evaluator.evaluate(&decls, "s", "t").unwrap();
        let pairs: HashSet<(String, String)> = table
            .rows()
            .into_iter()
            .map(|row| (row[0].to_string(), row[1].to_string()))
            .collect();
        for left in 1..=8u32 {
            for right in 1..=8u32 {
                let (left, right) = (left.to_string(), right.to_string());
                assert_eq!(
                    evaluator.is_trivial(&left, &right).unwrap(),
                    pairs.contains(&(left.clone(), right.clone())),
                    "{kind}({left}, {right})"
                );
            }
        }
    }
}
