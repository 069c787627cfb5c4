/*! Evaluate single query clauses against the knowledge base.
 *
 * A clause names a relation and two arguments, each a wildcard, a literal, or a synonym. Clauses
 * without synonyms reduce to one truth value. Clauses with synonyms produce a result table that
 * an outer join stage can combine with other clauses. Every relation shares the same argument
 * dispatch; only the store lookups behind it differ.
 */

pub mod argument;
pub mod declaration;
pub mod evaluator;
pub mod pattern;
pub mod relation;
pub mod table;
pub mod value;

pub use argument::{parse_expr_spec, Argument};
pub use declaration::{Declarations, DesignEntity};
pub use evaluator::{
    evaluate_clause, AffectsEvaluator, ClauseEvaluator, ClauseKind, ClauseResult,
    RelationEvaluator, UsageEvaluator,
};
pub use pattern::PatternEvaluator;
pub use relation::Relation;
pub use table::{mirror, truth_value, ResultTable};
pub use value::{Procedure, Value, Variable};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Malformed argument: {0}")]
    MalformedArgument(String),
    #[error("Undeclared synonym: {0}")]
    UndeclaredSynonym(String),
    #[error("Unknown design entity: {0}")]
    UnknownDesignEntity(String),
    #[error("Unknown clause: {0}")]
    UnknownClause(String),
    #[error("Clause has no synonym: {0}({1}, {2})")]
    NoSynonym(&'static str, String, String),
    #[error("Trivial evaluation given a synonym: {0}({1}, {2})")]
    UnexpectedSynonym(&'static str, String, String),
    #[error("Invalid pattern argument: {0}")]
    InvalidPatternArgument(String),
    #[error("Expression error: {0}")]
    Expr(#[from] spa_parser::ExprError),
    #[error("Store error: {0}")]
    Store(#[from] spa_core::PkbError),
}

pub type Result<T> = std::result::Result<T, QueryError>;

#[cfg(test)]
mod tests;
