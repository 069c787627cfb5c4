//! Store access strategies, one per relation kind.
//!
//! The evaluator only knows the argument shapes; these types map each shape to the store query
//! that answers it.

use crate::value::{Procedure, Value, Variable};
use spa_core::{Pkb, StmtNo, UsageKind};
use std::collections::HashSet;

pub trait Relation {
    type Left: Value;
    type Right: Value;

    fn name(&self) -> &'static str;

    /// At least one pair exists.
    fn exists(&self, pkb: &Pkb) -> bool;

    fn holds(&self, pkb: &Pkb, left: &Self::Left, right: &Self::Right) -> bool;

    /// `left` relates to at least one right-hand value.
    fn has_right(&self, pkb: &Pkb, left: &Self::Left) -> bool;

    /// At least one left-hand value relates to `right`.
    fn has_left(&self, pkb: &Pkb, right: &Self::Right) -> bool;

    fn rights_of(&self, pkb: &Pkb, left: &Self::Left) -> HashSet<Self::Right>;

    fn lefts_of(&self, pkb: &Pkb, right: &Self::Right) -> HashSet<Self::Left>;

    fn all_lefts(&self, pkb: &Pkb) -> HashSet<Self::Left>;

    fn all_rights(&self, pkb: &Pkb) -> HashSet<Self::Right>;

    fn pairs(&self, pkb: &Pkb) -> HashSet<(Self::Left, Self::Right)>;
}

fn procs(names: HashSet<String>) -> HashSet<Procedure> {
    names.into_iter().map(Procedure).collect()
}

fn vars(names: HashSet<String>) -> HashSet<Variable> {
    names.into_iter().map(Variable).collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Follows;

impl Relation for Follows {
    type Left = StmtNo;
    type Right = StmtNo;

    fn name(&self) -> &'static str {
        "Follows"
    }

    fn exists(&self, pkb: &Pkb) -> bool {
        pkb.follows().has_follow_relation()
    }

    fn holds(&self, pkb: &Pkb, left: &StmtNo, right: &StmtNo) -> bool {
        pkb.follows().has_follow_pair(*left, *right)
    }

    fn has_right(&self, pkb: &Pkb, left: &StmtNo) -> bool {
        pkb.follows().is_followed(*left)
    }

    fn has_left(&self, pkb: &Pkb, right: &StmtNo) -> bool {
        pkb.follows().is_follower(*right)
    }

    fn rights_of(&self, pkb: &Pkb, left: &StmtNo) -> HashSet<StmtNo> {
        pkb.follows().follower(*left).into_iter().collect()
    }

    fn lefts_of(&self, pkb: &Pkb, right: &StmtNo) -> HashSet<StmtNo> {
        pkb.follows().followed_by(*right).into_iter().collect()
    }

    fn all_lefts(&self, pkb: &Pkb) -> HashSet<StmtNo> {
        pkb.follows().all_followed()
    }

    fn all_rights(&self, pkb: &Pkb) -> HashSet<StmtNo> {
        pkb.follows().all_followers()
    }

    fn pairs(&self, pkb: &Pkb) -> HashSet<(StmtNo, StmtNo)> {
        pkb.follows().follow_pairs()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FollowsStar;

impl Relation for FollowsStar {
    type Left = StmtNo;
    type Right = StmtNo;

    fn name(&self) -> &'static str {
        "Follows*"
    }

    fn exists(&self, pkb: &Pkb) -> bool {
        pkb.follows().has_follow_star_relation()
    }

    fn holds(&self, pkb: &Pkb, left: &StmtNo, right: &StmtNo) -> bool {
        pkb.follows().has_follow_star_pair(*left, *right)
    }

    fn has_right(&self, pkb: &Pkb, left: &StmtNo) -> bool {
        pkb.follows().is_followed_star(*left)
    }

    fn has_left(&self, pkb: &Pkb, right: &StmtNo) -> bool {
        pkb.follows().is_follower_star(*right)
    }

    fn rights_of(&self, pkb: &Pkb, left: &StmtNo) -> HashSet<StmtNo> {
        pkb.follows().all_following(*left)
    }

    fn lefts_of(&self, pkb: &Pkb, right: &StmtNo) -> HashSet<StmtNo> {
        pkb.follows().all_followed_by(*right)
    }

    fn all_lefts(&self, pkb: &Pkb) -> HashSet<StmtNo> {
        pkb.follows().all_followed_star()
    }

    fn all_rights(&self, pkb: &Pkb) -> HashSet<StmtNo> {
        pkb.follows().all_followers_star()
    }

    fn pairs(&self, pkb: &Pkb) -> HashSet<(StmtNo, StmtNo)> {
        pkb.follows().follow_star_pairs()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Parent;

impl Relation for Parent {
    type Left = StmtNo;
    type Right = StmtNo;

    fn name(&self) -> &'static str {
        "Parent"
    }

    fn exists(&self, pkb: &Pkb) -> bool {
        pkb.parent().has_parent_relation()
    }

    fn holds(&self, pkb: &Pkb, left: &StmtNo, right: &StmtNo) -> bool {
        pkb.parent().has_parent_pair(*left, *right)
    }

    fn has_right(&self, pkb: &Pkb, left: &StmtNo) -> bool {
        pkb.parent().is_parent(*left)
    }

    fn has_left(&self, pkb: &Pkb, right: &StmtNo) -> bool {
        pkb.parent().is_child(*right)
    }

    fn rights_of(&self, pkb: &Pkb, left: &StmtNo) -> HashSet<StmtNo> {
        pkb.parent().children_of(*left)
    }

    fn lefts_of(&self, pkb: &Pkb, right: &StmtNo) -> HashSet<StmtNo> {
        pkb.parent().parent_of(*right).into_iter().collect()
    }

    fn all_lefts(&self, pkb: &Pkb) -> HashSet<StmtNo> {
        pkb.parent().all_parents()
    }

    fn all_rights(&self, pkb: &Pkb) -> HashSet<StmtNo> {
        pkb.parent().all_children()
    }

    fn pairs(&self, pkb: &Pkb) -> HashSet<(StmtNo, StmtNo)> {
        pkb.parent().parent_child_pairs()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParentStar;

impl Relation for ParentStar {
    type Left = StmtNo;
    type Right = StmtNo;

    fn name(&self) -> &'static str {
        "Parent*"
    }

    fn exists(&self, pkb: &Pkb) -> bool {
        pkb.parent().has_parent_star_relation()
    }

    fn holds(&self, pkb: &Pkb, left: &StmtNo, right: &StmtNo) -> bool {
        pkb.parent().has_anc_desc_pair(*left, *right)
    }

    fn has_right(&self, pkb: &Pkb, left: &StmtNo) -> bool {
        pkb.parent().is_ancestor(*left)
    }

    fn has_left(&self, pkb: &Pkb, right: &StmtNo) -> bool {
        pkb.parent().is_descendant(*right)
    }

    fn rights_of(&self, pkb: &Pkb, left: &StmtNo) -> HashSet<StmtNo> {
        pkb.parent().descendants_of(*left)
    }

    fn lefts_of(&self, pkb: &Pkb, right: &StmtNo) -> HashSet<StmtNo> {
        pkb.parent().ancestors_of(*right)
    }

    fn all_lefts(&self, pkb: &Pkb) -> HashSet<StmtNo> {
        pkb.parent().all_ancestors()
    }

    fn all_rights(&self, pkb: &Pkb) -> HashSet<StmtNo> {
        pkb.parent().all_descendants()
    }

    fn pairs(&self, pkb: &Pkb) -> HashSet<(StmtNo, StmtNo)> {
        pkb.parent().anc_desc_pairs()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Calls;

impl Relation for Calls {
    type Left = Procedure;
    type Right = Procedure;

    fn name(&self) -> &'static str {
        "Calls"
    }

    fn exists(&self, pkb: &Pkb) -> bool {
        pkb.calls().has_call_relation()
    }

    fn holds(&self, pkb: &Pkb, left: &Procedure, right: &Procedure) -> bool {
        pkb.calls().has_call_pair(&left.0, &right.0)
    }

    fn has_right(&self, pkb: &Pkb, left: &Procedure) -> bool {
        pkb.calls().is_caller(&left.0)
    }

    fn has_left(&self, pkb: &Pkb, right: &Procedure) -> bool {
        pkb.calls().is_callee(&right.0)
    }

    fn rights_of(&self, pkb: &Pkb, left: &Procedure) -> HashSet<Procedure> {
        procs(pkb.calls().callees_of(&left.0))
    }

    fn lefts_of(&self, pkb: &Pkb, right: &Procedure) -> HashSet<Procedure> {
        procs(pkb.calls().callers_of(&right.0))
    }

    fn all_lefts(&self, pkb: &Pkb) -> HashSet<Procedure> {
        procs(pkb.calls().all_callers())
    }

    fn all_rights(&self, pkb: &Pkb) -> HashSet<Procedure> {
        procs(pkb.calls().all_callees())
    }

    fn pairs(&self, pkb: &Pkb) -> HashSet<(Procedure, Procedure)> {
        pkb.calls()
            .call_pairs()
            .into_iter()
            .map(|(caller, callee)| (Procedure(caller), Procedure(callee)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CallsStar;

impl Relation for CallsStar {
    type Left = Procedure;
    type Right = Procedure;

    fn name(&self) -> &'static str {
        "Calls*"
    }

    fn exists(&self, pkb: &Pkb) -> bool {
        pkb.calls().has_call_star_relation()
    }

    fn holds(&self, pkb: &Pkb, left: &Procedure, right: &Procedure) -> bool {
        pkb.calls().has_call_star_pair(&left.0, &right.0)
    }

    fn has_right(&self, pkb: &Pkb, left: &Procedure) -> bool {
        pkb.calls().is_caller_star(&left.0)
    }

    fn has_left(&self, pkb: &Pkb, right: &Procedure) -> bool {
        pkb.calls().is_callee_star(&right.0)
    }

    fn rights_of(&self, pkb: &Pkb, left: &Procedure) -> HashSet<Procedure> {
        procs(pkb.calls().call_descendants(&left.0))
    }

    fn lefts_of(&self, pkb: &Pkb, right: &Procedure) -> HashSet<Procedure> {
        procs(pkb.calls().call_ancestors(&right.0))
    }

    fn all_lefts(&self, pkb: &Pkb) -> HashSet<Procedure> {
        procs(pkb.calls().all_callers_star())
    }

    fn all_rights(&self, pkb: &Pkb) -> HashSet<Procedure> {
        procs(pkb.calls().all_callees_star())
    }

    fn pairs(&self, pkb: &Pkb) -> HashSet<(Procedure, Procedure)> {
        pkb.calls()
            .call_star_pairs()
            .into_iter()
            .map(|(caller, callee)| (Procedure(caller), Procedure(callee)))
            .collect()
    }
}

/// Statement form of Uses or Modifies.
#[derive(Debug, Clone, Copy)]
pub struct StmtUsage(pub UsageKind);

impl Relation for StmtUsage {
    type Left = StmtNo;
    type Right = Variable;

    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn exists(&self, pkb: &Pkb) -> bool {
        pkb.usage(self.0).has_relation()
    }

    fn holds(&self, pkb: &Pkb, left: &StmtNo, right: &Variable) -> bool {
        pkb.usage(self.0).stmt_has(*left, &right.0)
    }

    fn has_right(&self, pkb: &Pkb, left: &StmtNo) -> bool {
        pkb.usage(self.0).stmt_has_any(*left)
    }

    fn has_left(&self, pkb: &Pkb, right: &Variable) -> bool {
        !pkb.usage(self.0).stmts_with(&right.0).is_empty()
    }

    fn rights_of(&self, pkb: &Pkb, left: &StmtNo) -> HashSet<Variable> {
        vars(pkb.usage(self.0).vars_of_stmt(*left))
    }

    fn lefts_of(&self, pkb: &Pkb, right: &Variable) -> HashSet<StmtNo> {
        pkb.usage(self.0).stmts_with(&right.0)
    }

    fn all_lefts(&self, pkb: &Pkb) -> HashSet<StmtNo> {
        pkb.usage(self.0).all_stmts()
    }

    fn all_rights(&self, pkb: &Pkb) -> HashSet<Variable> {
        vars(pkb.usage(self.0).all_stmt_vars())
    }

    fn pairs(&self, pkb: &Pkb) -> HashSet<(StmtNo, Variable)> {
        pkb.usage(self.0)
            .stmt_var_pairs()
            .into_iter()
            .map(|(stmt, var)| (stmt, Variable(var)))
            .collect()
    }
}

/// Procedure form of Uses or Modifies.
#[derive(Debug, Clone, Copy)]
pub struct ProcUsage(pub UsageKind);

impl Relation for ProcUsage {
    type Left = Procedure;
    type Right = Variable;

    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn exists(&self, pkb: &Pkb) -> bool {
        pkb.usage(self.0).has_proc_relation()
    }

    fn holds(&self, pkb: &Pkb, left: &Procedure, right: &Variable) -> bool {
        pkb.usage(self.0).proc_has(&left.0, &right.0)
    }

    fn has_right(&self, pkb: &Pkb, left: &Procedure) -> bool {
        pkb.usage(self.0).proc_has_any(&left.0)
    }

    fn has_left(&self, pkb: &Pkb, right: &Variable) -> bool {
        !pkb.usage(self.0).procs_with(&right.0).is_empty()
    }

    fn rights_of(&self, pkb: &Pkb, left: &Procedure) -> HashSet<Variable> {
        vars(pkb.usage(self.0).vars_of_proc(&left.0))
    }

    fn lefts_of(&self, pkb: &Pkb, right: &Variable) -> HashSet<Procedure> {
        procs(pkb.usage(self.0).procs_with(&right.0))
    }

    fn all_lefts(&self, pkb: &Pkb) -> HashSet<Procedure> {
        procs(pkb.usage(self.0).all_procs())
    }

    fn all_rights(&self, pkb: &Pkb) -> HashSet<Variable> {
        vars(pkb.usage(self.0).all_proc_vars())
    }

    fn pairs(&self, pkb: &Pkb) -> HashSet<(Procedure, Variable)> {
        pkb.usage(self.0)
            .proc_var_pairs()
            .into_iter()
            .map(|(proc, var)| (Procedure(proc), Variable(var)))
            .collect()
    }
}

/// Affects, answered by the derived predicate rather than stored pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AffectsRelation;

impl Relation for AffectsRelation {
    type Left = StmtNo;
    type Right = StmtNo;

    fn name(&self) -> &'static str {
        "Affects"
    }

    fn exists(&self, pkb: &Pkb) -> bool {
        pkb.affects().has_affects_relation()
    }

    fn holds(&self, pkb: &Pkb, left: &StmtNo, right: &StmtNo) -> bool {
        pkb.affects().has_affect_pair(*left, *right)
    }

    fn has_right(&self, pkb: &Pkb, left: &StmtNo) -> bool {
        pkb.affects().is_affector(*left)
    }

    fn has_left(&self, pkb: &Pkb, right: &StmtNo) -> bool {
        pkb.affects().is_affected(*right)
    }

    fn rights_of(&self, pkb: &Pkb, left: &StmtNo) -> HashSet<StmtNo> {
        pkb.affects().affected_by(*left)
    }

    fn lefts_of(&self, pkb: &Pkb, right: &StmtNo) -> HashSet<StmtNo> {
        pkb.affects().affectors_of(*right)
    }

    fn all_lefts(&self, pkb: &Pkb) -> HashSet<StmtNo> {
        pkb.affects().all_affectors()
    }

    fn all_rights(&self, pkb: &Pkb) -> HashSet<StmtNo> {
        pkb.affects().all_affected()
    }

    fn pairs(&self, pkb: &Pkb) -> HashSet<(StmtNo, StmtNo)> {
        pkb.affects().affect_pairs()
    }
}
