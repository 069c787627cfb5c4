/*! Program knowledge base for static analysis of a small imperative language.
 *
 * An extraction pass walks a parsed program once and records what it finds here: statements and
 * their kinds, procedures, variables, constants, and the Follows, Parent, Uses, Modifies and Calls
 * relations together with their transitive closures. Queries then read the store without mutating
 * it. Affects is never stored; it is derived on demand from the other relations.
 */

pub mod affects;
pub mod calls;
pub mod closure;
pub mod config;
pub mod follows;
pub mod parent;
pub mod pattern;
pub mod pkb;
pub mod registry;
pub mod usage;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use affects::Affects;
pub use calls::CallsStore;
pub use closure::ClosureIndex;
pub use config::PkbConfig;
pub use follows::FollowsStore;
pub use parent::ParentStore;
pub use pattern::{ExprSpec, PatternStore};
pub use pkb::Pkb;
pub use registry::{Registry, StatementKind, StmtNo};
pub use usage::{UsageKind, UsageStore};

pub use spa_parser::NormalizedExpr;

use thiserror::Error;

/// Reasons a mutation was rejected. A rejected mutation leaves the store unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PkbError {
    #[error("{relation}: statement or procedure cannot relate to itself: {subject}")]
    SelfRelation {
        relation: &'static str,
        subject: String,
    },
    #[error("Invalid statement number: {0}")]
    InvalidStatement(StmtNo),
    #[error("{relation}: pair ({left}, {right}) already recorded")]
    DuplicatePair {
        relation: &'static str,
        left: String,
        right: String,
    },
    #[error("{relation}: {left} already has successor {existing}")]
    ConflictingSuccessor {
        relation: &'static str,
        left: String,
        existing: String,
    },
    #[error("{relation}: {right} already has predecessor {existing}")]
    ConflictingPredecessor {
        relation: &'static str,
        right: String,
        existing: String,
    },
    #[error("{relation}: closure of {subject} already set")]
    ClosureAlreadySet {
        relation: &'static str,
        subject: String,
    },
    #[error("{relation}: pair ({left}, {right}) would close a cycle")]
    Cycle {
        relation: &'static str,
        left: StmtNo,
        right: StmtNo,
    },
    #[error("{relation}: pair ({left}, {right}) is not in ascending statement order")]
    DescendingPair {
        relation: &'static str,
        left: StmtNo,
        right: StmtNo,
    },
    #[error("Empty name in {0}")]
    EmptyName(&'static str),
    #[error("Statement {stmt} already registered as {existing}, cannot re-register as {requested}")]
    StatementKindConflict {
        stmt: StmtNo,
        existing: StatementKind,
        requested: StatementKind,
    },
    #[error("Statement {0} already has a different assignment pattern")]
    PatternConflict(StmtNo),
    #[error("Undefined statement: {0}")]
    UndefinedStatement(StmtNo),
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PkbError>;

#[cfg(test)]
mod tests;
