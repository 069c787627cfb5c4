//! The shared clause dispatch.
//!
//! Every relation clause takes two argument tokens. Tokens are classified once, then the shape
//! pair picks a [`Relation`] query: wildcard and literal shapes reduce to a truth value, synonym
//! shapes produce a [`ResultTable`] filtered by the synonyms' declared types.

use crate::argument::Argument;
use crate::declaration::{Declarations, DesignEntity};
use crate::relation::{
    AffectsRelation, Calls, CallsStar, Follows, FollowsStar, Parent, ParentStar, ProcUsage,
    Relation, StmtUsage,
};
use crate::table::{mirror, ResultTable};
use crate::value::Value;
use crate::{QueryError, Result};
use spa_core::{Pkb, UsageKind};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Two entry points per clause kind. Callers use `is_trivial` when neither argument is a synonym
/// and `evaluate` otherwise; neither relies on the other having run.
pub trait ClauseEvaluator: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_trivial(&self, first: &str, second: &str) -> Result<bool>;

    fn evaluate(&self, declarations: &Declarations, first: &str, second: &str)
        -> Result<ResultTable>;
}

/// A clause evaluator for any relation, parameterized by how the relation reads the store.
pub struct RelationEvaluator<'a, R> {
    pkb: &'a Pkb,
    relation: R,
}

pub type AffectsEvaluator<'a> = RelationEvaluator<'a, AffectsRelation>;

impl<'a> AffectsEvaluator<'a> {
    pub fn affects(pkb: &'a Pkb) -> Self {
        Self::new(pkb, AffectsRelation)
    }
}

impl<'a, R: Relation> RelationEvaluator<'a, R> {
    pub fn new(pkb: &'a Pkb, relation: R) -> Self {
        Self { pkb, relation }
    }

    /// A literal of the wrong class (a name where a statement is expected) matches nothing.
    pub(crate) fn trivial(&self, first: &Argument<'_>, second: &Argument<'_>) -> bool {
        let pkb = self.pkb;
        match (first, second) {
            (Argument::Wildcard, Argument::Wildcard) => self.relation.exists(pkb),
            (Argument::Wildcard, right) => R::Right::from_argument(right)
                .map_or(false, |right| self.relation.has_left(pkb, &right)),
            (left, Argument::Wildcard) => R::Left::from_argument(left)
                .map_or(false, |left| self.relation.has_right(pkb, &left)),
            (left, right) => match (R::Left::from_argument(left), R::Right::from_argument(right)) {
                (Some(left), Some(right)) => self.relation.holds(pkb, &left, &right),
                _ => false,
            },
        }
    }

    /// Callers guarantee at least one argument is a synonym.
    pub(crate) fn non_trivial(
        &self,
        declarations: &Declarations,
        first: &Argument<'_>,
        second: &Argument<'_>,
    ) -> Result<ResultTable> {
        let pkb = self.pkb;
        match (first, second) {
            (Argument::Synonym(left), Argument::Synonym(right)) if left == right => {
                let entity = declarations.entity_of(left)?;
                let rendered: HashSet<(String, String)> = self
                    .relation
                    .pairs(pkb)
                    .into_iter()
                    .filter(|(l, r)| l.conforms(pkb, entity) && r.conforms(pkb, entity))
                    .map(|(l, r)| (l.to_string(), r.to_string()))
                    .collect();
                Ok(ResultTable::rendered(left, mirror(&rendered)))
            }
            (Argument::Synonym(left), Argument::Synonym(right)) => {
                let left_entity = declarations.entity_of(left)?;
                let right_entity = declarations.entity_of(right)?;
                let pairs = self.relation.pairs(pkb).into_iter().filter(|(l, r)| {
                    l.conforms(pkb, left_entity) && r.conforms(pkb, right_entity)
                });
                Ok(ResultTable::pairs(left, right, pairs))
            }
            (Argument::Synonym(left), other) => {
                let entity = declarations.entity_of(left)?;
                let values = match other {
                    Argument::Wildcard => self.relation.all_lefts(pkb),
                    literal => R::Right::from_argument(literal)
                        .map(|right| self.relation.lefts_of(pkb, &right))
                        .unwrap_or_default(),
                };
                Ok(ResultTable::single(
                    left,
                    values.into_iter().filter(|v| v.conforms(pkb, entity)),
                ))
            }
            (other, Argument::Synonym(right)) => {
                let entity = declarations.entity_of(right)?;
                let values = match other {
                    Argument::Wildcard => self.relation.all_rights(pkb),
                    literal => R::Left::from_argument(literal)
                        .map(|left| self.relation.rights_of(pkb, &left))
                        .unwrap_or_default(),
                };
                Ok(ResultTable::single(
                    right,
                    values.into_iter().filter(|v| v.conforms(pkb, entity)),
                ))
            }
            (first, second) => Err(QueryError::NoSynonym(
                self.relation.name(),
                describe(first),
                describe(second),
            )),
        }
    }
}

impl<'a, R> ClauseEvaluator for RelationEvaluator<'a, R>
where
    R: Relation + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.relation.name()
    }

    fn is_trivial(&self, first: &str, second: &str) -> Result<bool> {
        let (first, second) = (Argument::classify(first)?, Argument::classify(second)?);
        if first.is_synonym() || second.is_synonym() {
            return Err(QueryError::UnexpectedSynonym(
                self.name(),
                describe(&first),
                describe(&second),
            ));
        }
        Ok(self.trivial(&first, &second))
    }

    fn evaluate(
        &self,
        declarations: &Declarations,
        first: &str,
        second: &str,
    ) -> Result<ResultTable> {
        let (first, second) = (Argument::classify(first)?, Argument::classify(second)?);
        self.non_trivial(declarations, &first, &second)
    }
}

/// Uses and Modifies, which take either a statement or a procedure as the first argument.
pub struct UsageEvaluator<'a> {
    pkb: &'a Pkb,
    kind: UsageKind,
}

impl<'a> UsageEvaluator<'a> {
    pub fn new(pkb: &'a Pkb, kind: UsageKind) -> Self {
        Self { pkb, kind }
    }

    fn statement_form(&self) -> RelationEvaluator<'a, StmtUsage> {
        RelationEvaluator::new(self.pkb, StmtUsage(self.kind))
    }

    fn procedure_form(&self) -> RelationEvaluator<'a, ProcUsage> {
        RelationEvaluator::new(self.pkb, ProcUsage(self.kind))
    }

    /// A quoted name or a procedure synonym selects the procedure form. Anything else, including
    /// a wildcard, selects the statement form.
    fn is_procedure_form(
        declarations: Option<&Declarations>,
        first: &Argument<'_>,
    ) -> Result<bool> {
        match (first, declarations) {
            (Argument::Name(_), _) => Ok(true),
            (Argument::Synonym(synonym), Some(declarations)) => {
                Ok(declarations.entity_of(synonym)? == DesignEntity::Procedure)
            }
            _ => Ok(false),
        }
    }
}

impl<'a> ClauseEvaluator for UsageEvaluator<'a> {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn is_trivial(&self, first: &str, second: &str) -> Result<bool> {
        let (first, second) = (Argument::classify(first)?, Argument::classify(second)?);
        if first.is_synonym() || second.is_synonym() {
            return Err(QueryError::UnexpectedSynonym(
                self.name(),
                describe(&first),
                describe(&second),
            ));
        }
        if Self::is_procedure_form(None, &first)? {
            Ok(self.procedure_form().trivial(&first, &second))
        } else {
            Ok(self.statement_form().trivial(&first, &second))
        }
    }

    fn evaluate(
        &self,
        declarations: &Declarations,
        first: &str,
        second: &str,
    ) -> Result<ResultTable> {
        let (first, second) = (Argument::classify(first)?, Argument::classify(second)?);
        if Self::is_procedure_form(Some(declarations), &first)? {
            self.procedure_form().non_trivial(declarations, &first, &second)
        } else {
            self.statement_form().non_trivial(declarations, &first, &second)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    Follows,
    FollowsStar,
    Parent,
    ParentStar,
    Calls,
    CallsStar,
    Uses,
    Modifies,
    Affects,
}

impl ClauseKind {
    pub const ALL: [ClauseKind; 9] = [
        ClauseKind::Follows,
        ClauseKind::FollowsStar,
        ClauseKind::Parent,
        ClauseKind::ParentStar,
        ClauseKind::Calls,
        ClauseKind::CallsStar,
        ClauseKind::Uses,
        ClauseKind::Modifies,
        ClauseKind::Affects,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ClauseKind::Follows => "Follows",
            ClauseKind::FollowsStar => "Follows*",
            ClauseKind::Parent => "Parent",
            ClauseKind::ParentStar => "Parent*",
            ClauseKind::Calls => "Calls",
            ClauseKind::CallsStar => "Calls*",
            ClauseKind::Uses => "Uses",
            ClauseKind::Modifies => "Modifies",
            ClauseKind::Affects => "Affects",
        }
    }

    pub fn evaluator<'a>(&self, pkb: &'a Pkb) -> Box<dyn ClauseEvaluator + 'a> {
        match self {
            ClauseKind::Follows => Box::new(RelationEvaluator::new(pkb, Follows)),
            ClauseKind::FollowsStar => Box::new(RelationEvaluator::new(pkb, FollowsStar)),
            ClauseKind::Parent => Box::new(RelationEvaluator::new(pkb, Parent)),
            ClauseKind::ParentStar => Box::new(RelationEvaluator::new(pkb, ParentStar)),
            ClauseKind::Calls => Box::new(RelationEvaluator::new(pkb, Calls)),
            ClauseKind::CallsStar => Box::new(RelationEvaluator::new(pkb, CallsStar)),
            ClauseKind::Uses => Box::new(UsageEvaluator::new(pkb, UsageKind::Uses)),
            ClauseKind::Modifies => Box::new(UsageEvaluator::new(pkb, UsageKind::Modifies)),
            ClauseKind::Affects => Box::new(AffectsEvaluator::affects(pkb)),
        }
    }
}

impl FromStr for ClauseKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        ClauseKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| QueryError::UnknownClause(s.to_string()))
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseResult {
    Boolean(bool),
    Table(ResultTable),
}

/// Runs one clause, choosing the trivial or table form from the argument shapes.
pub fn evaluate_clause(
    pkb: &Pkb,
    kind: ClauseKind,
    declarations: &Declarations,
    first: &str,
    second: &str,
) -> Result<ClauseResult> {
    let has_synonym =
        Argument::classify(first)?.is_synonym() || Argument::classify(second)?.is_synonym();
    trace!(clause = %kind, first, second, has_synonym, "evaluating clause");
    let evaluator = kind.evaluator(pkb);
    if has_synonym {
        evaluator
            .evaluate(declarations, first, second)
            .map(ClauseResult::Table)
    } else {
        evaluator.is_trivial(first, second).map(ClauseResult::Boolean)
    }
}

fn describe(argument: &Argument<'_>) -> String {
    match argument {
        Argument::Wildcard => "_".to_string(),
        Argument::Integer(stmt) => stmt.to_string(),
        Argument::Name(name) => format!("\"{name}\""),
        Argument::Synonym(synonym) => synonym.to_string(),
    }
}
