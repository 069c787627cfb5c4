/*! Knowledge base and clause evaluation for a static program analyzer.
 *
 * One import for the whole pipeline core: build a `Pkb` from extracted facts, then answer
 * relation and pattern clauses against it. The query parser and join stage sit outside.
 */

pub use spa_core as core;
pub use spa_parser as parser;
pub use spa_query as query;

pub use spa_core::{
    ExprSpec, Pkb, PkbConfig, PkbError, StatementKind, StmtNo, UsageKind,
};

pub use spa_parser::NormalizedExpr;

pub use spa_query::{
    evaluate_clause, truth_value, ClauseEvaluator, ClauseKind, ClauseResult, Declarations,
    DesignEntity, PatternEvaluator, QueryError, ResultTable,
};
