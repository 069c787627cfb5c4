use crate::argument::{parse_expr_spec, Argument};
use crate::declaration::{Declarations, DesignEntity};
use crate::table::ResultTable;
use crate::value::Variable;
use crate::{QueryError, Result};
use spa_core::Pkb;
use tracing::trace;

/// Evaluates `pattern a(v, spec)` against the recorded assignment patterns.
pub struct PatternEvaluator<'a> {
    pkb: &'a Pkb,
}

impl<'a> PatternEvaluator<'a> {
    pub fn new(pkb: &'a Pkb) -> Self {
        Self { pkb }
    }

    /// `assign` must be an assign synonym. `variable` is `_`, a quoted name or a variable synonym.
    /// `expr` is `_`, `"expr"` or `_"expr"_`.
    pub fn evaluate(
        &self,
        declarations: &Declarations,
        assign: &str,
        variable: &str,
        expr: &str,
    ) -> Result<ResultTable> {
        trace!(assign, variable, expr, "evaluating pattern clause");
        let assign = assign.trim();
        if declarations.entity_of(assign)? != DesignEntity::Assign {
            return Err(QueryError::InvalidPatternArgument(assign.to_string()));
        }
        let spec = parse_expr_spec(expr)?;
        let patterns = self.pkb.patterns();

        match Argument::classify(variable)? {
            Argument::Wildcard => Ok(ResultTable::single(assign, patterns.find_any_pattern(&spec))),
            Argument::Name(name) => Ok(ResultTable::single(
                assign,
                patterns.find_pattern(name, &spec),
            )),
            Argument::Synonym(synonym) => {
                if declarations.entity_of(synonym)? != DesignEntity::Variable {
                    return Err(QueryError::InvalidPatternArgument(synonym.to_string()));
                }
                let pairs = patterns
                    .find_pattern_pairs(&spec)
                    .into_iter()
                    .map(|(stmt, var)| (stmt, Variable(var)));
                Ok(ResultTable::pairs(assign, synonym, pairs))
            }
            Argument::Integer(stmt) => Err(QueryError::InvalidPatternArgument(stmt.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spa_core::testing::{assign, print, while_loop, ProgramBuilder};

    // 1 a = x + 1
    // 2 while x {
    // 3   b = a * (x + 1)
    //   }
    // 4 print b
    fn program() -> Pkb {
        ProgramBuilder::new()
            .procedure(
                "main",
                vec![
                    assign("a", "x + 1"),
                    while_loop(&["x"], vec![assign("b", "a * (x + 1)")]),
                    print("b"),
                ],
            )
            .build()
            .unwrap()
    }

    fn declarations() -> Declarations {
        Declarations::new()
            .declare("a", DesignEntity::Assign)
            .declare("v", DesignEntity::Variable)
            .declare("s", DesignEntity::Stmt)
    }

    #[test]
    fn test_wildcard_variable() {
        let pkb = program();
        let evaluator = PatternEvaluator::new(&pkb);
        let decls = declarations();

        let table = evaluator.evaluate(&decls, "a", "_", "_\"x + 1\"_").unwrap();
        assert_eq!(table.column("a").unwrap(), ["1", "3"]);

        let table = evaluator.evaluate(&decls, "a", "_", "\"x+1\"").unwrap();
        assert_eq!(table.column("a").unwrap(), ["1"]);

        let table = evaluator.evaluate(&decls, "a", "_", "_\"a * x\"_").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_named_variable() {
        let pkb = program();
        let evaluator = PatternEvaluator::new(&pkb);
        let table = evaluator
            .evaluate(&declarations(), "a", "\"b\"", "_")
            .unwrap();
        assert_eq!(table.column("a").unwrap(), ["3"]);
    }

    #[test]
    fn test_variable_synonym() {
        let pkb = program();
        let evaluator = PatternEvaluator::new(&pkb);
        let table = evaluator.evaluate(&declarations(), "a", "v", "_\"x\"_").unwrap();
        assert_eq!(table.rows(), vec![vec!["1", "a"], vec!["3", "b"]]);
    }

    #[test]
    fn test_rejects_misdeclared_synonyms() {
        let pkb = program();
        let evaluator = PatternEvaluator::new(&pkb);
        let decls = declarations();
        assert!(matches!(
            evaluator.evaluate(&decls, "s", "_", "_"),
            Err(QueryError::InvalidPatternArgument(_))
        ));
        assert!(matches!(
            evaluator.evaluate(&decls, "a", "s", "_"),
            Err(QueryError::InvalidPatternArgument(_))
        ));
        assert!(matches!(
            evaluator.evaluate(&decls, "a", "3", "_"),
            Err(QueryError::InvalidPatternArgument(_))
        ));
        assert!(matches!(
            evaluator.evaluate(&decls, "q", "_", "_"),
            Err(QueryError::UndeclaredSynonym(_))
        ));
    }
}
