use crate::testing::{assign, call, if_else, print, read, while_loop, ProgramBuilder};
use crate::{Pkb, StatementKind};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn build(body: Vec<crate::testing::Stmt>) -> Pkb {
    ProgramBuilder::new().procedure("main", body).build().unwrap()
}

#[test]
fn test_straight_line_overwrite() {
    // 1 x = 1; 2 y = x + 1; 3 x = 2; 4 z = x
    let pkb = build(vec![
        assign("x", "1"),
        assign("y", "x + 1"),
        assign("x", "2"),
        assign("z", "x"),
    ]);
    let affects = pkb.affects();

    assert!(affects.has_affect_pair(1, 2));
    assert!(!affects.has_affect_pair(1, 4));
    assert!(affects.has_affect_pair(3, 4));
    assert_eq!(affects.affect_pairs(), HashSet::from([(1, 2), (3, 4)]));
    assert!(affects.has_affects_relation());
    assert!(affects.is_affector(1));
    assert!(!affects.is_affector(2));
    assert!(affects.is_affected(4));
    assert!(!affects.is_affected(3));
}

#[test]
fn test_while_loop_back_edge() {
    // 1 x = 0; 2 while i { 3 x = x + 1; 4 y = x }; 5 z = x
    let pkb = build(vec![
        assign("x", "0"),
        while_loop(&["i"], vec![assign("x", "x + 1"), assign("y", "x")]),
        assign("z", "x"),
    ]);
    let affects = pkb.affects();

    assert_eq!(affects.successors(4), vec![2]);
    assert_eq!(affects.successors(2), vec![3, 5]);
    assert_eq!(affects.affected_by(1), HashSet::from([3, 5]));
    assert_eq!(affects.affected_by(3), HashSet::from([3, 4, 5]));
    assert!(affects.has_affect_pair(3, 3));
    assert!(!affects.has_affect_pair(1, 4));
    assert_eq!(affects.affectors_of(5), HashSet::from([1, 3]));
    assert_eq!(affects.all_affectors(), HashSet::from([1, 3]));
    assert_eq!(affects.all_affected(), HashSet::from([3, 4, 5]));
}

#[test]
fn test_if_branches() {
    // 1 x = 1; 2 if c { 3 x = 2 } else { 4 y = x }; 5 z = x
    let pkb = build(vec![
        assign("x", "1"),
        if_else(&["c"], vec![assign("x", "2")], vec![assign("y", "x")]),
        assign("z", "x"),
    ]);
    let affects = pkb.affects();

    assert_eq!(affects.successors(2), vec![3, 4]);
    assert_eq!(affects.successors(3), vec![5]);
    assert_eq!(
        affects.affect_pairs(),
        HashSet::from([(1, 4), (1, 5), (3, 5)])
    );
    assert!(!affects.has_affect_pair(3, 4));
}

#[test]
fn test_read_and_called_writes_kill() {
    // main: 1 x = 1; 2 call p; 3 y = x; 4 read y; 5 z = y; 6 call q; 7 w = x + z
    // p:    8 x = 5
    // q:    9 print x
    let pkb = ProgramBuilder::new()
        .procedure(
            "main",
            vec![
                assign("x", "1"),
                call("p"),
                assign("y", "x"),
                read("y"),
                assign("z", "y"),
                call("q"),
                assign("w", "x + z"),
            ],
        )
        .procedure("p", vec![assign("x", "5")])
        .procedure("q", vec![print("x")])
        .build()
        .unwrap();
    let affects = pkb.affects();

    assert!(!affects.has_affect_pair(1, 3));
    assert!(!affects.has_affect_pair(3, 5));
    assert!(affects.has_affect_pair(5, 7));
    // calls never count as affected statements themselves
    assert!(!affects.has_affect_pair(1, 2));
    // procedures are separate control-flow graphs
    assert!(!affects.has_affect_pair(8, 3));
    assert!(affects.affected_by(8).is_empty());
    assert_eq!(affects.affect_pairs(), HashSet::from([(5, 7)]));
}

// 1 x = 1; 2 call p; 3 y = x, recorded by hand so the call has no statement-level Modifies.
fn call_between(callee_modifies: &[&str]) -> Pkb {
    let mut pkb = Pkb::new();
    pkb.add_procedure("main").unwrap();
    pkb.add_procedure("p").unwrap();
    pkb.add_statement(1, StatementKind::Assign).unwrap();
    pkb.add_statement(2, StatementKind::Call).unwrap();
    pkb.add_statement(3, StatementKind::Assign).unwrap();
    pkb.add_follow(1, 2).unwrap();
    pkb.add_follow(2, 3).unwrap();
    pkb.add_modifies_stmt(1, "x").unwrap();
    pkb.add_modifies_stmt(3, "y").unwrap();
    pkb.add_uses_stmt(3, "x").unwrap();
    pkb.add_call("main", "p").unwrap();
    pkb.add_call_site(2, "p").unwrap();
    for variable in callee_modifies {
        pkb.add_modifies_proc("p", variable).unwrap();
    }
    pkb
}

#[test]
fn test_callee_summary_kills_without_statement_facts() {
    let pkb = call_between(&["x"]);
    assert!(pkb.modifies().vars_of_stmt(2).is_empty());
    assert!(!pkb.affects().has_affect_pair(1, 3));
    assert!(pkb.affects().affect_pairs().is_empty());

    let pkb = call_between(&["z"]);
    assert!(pkb.affects().has_affect_pair(1, 3));
    assert_eq!(pkb.affects().affect_pairs(), HashSet::from([(1, 3)]));
}

#[test]
fn test_container_does_not_kill() {
    // 1 x = 1; 2 while x { 3 print x }; 4 y = x
    let pkb = build(vec![
        assign("x", "1"),
        while_loop(&["x"], vec![print("x")]),
        assign("y", "x"),
    ]);
    assert!(pkb.affects().has_affect_pair(1, 4));
}

#[test]
fn test_nested_exit_from_if_inside_while() {
    // 1 while i { 2 if c { 3 a = b } else { 4 b = a } }; 5 c = a
    let pkb = build(vec![
        while_loop(
            &["i"],
            vec![if_else(&["c"], vec![assign("a", "b")], vec![assign("b", "a")])],
        ),
        assign("c", "a"),
    ]);
    let affects = pkb.affects();

    assert_eq!(affects.successors(3), vec![1]);
    assert_eq!(affects.successors(1), vec![2, 5]);
    assert!(affects.has_affect_pair(3, 4));
    assert!(affects.has_affect_pair(4, 3));
    assert!(affects.has_affect_pair(3, 5));
    assert!(!affects.has_affect_pair(3, 3));
}

#[test]
fn test_empty_store() {
    let pkb = Pkb::new();
    let affects = pkb.affects();
    assert!(!affects.has_affects_relation());
    assert!(affects.affect_pairs().is_empty());
    assert!(!affects.is_affected(1));
    assert!(affects.successors(1).is_empty());
}
