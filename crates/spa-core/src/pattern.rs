use crate::{PkbError, Result, StmtNo};
use spa_parser::NormalizedExpr;
use std::collections::{HashMap, HashSet};

/// Right-hand side constraint of a pattern query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprSpec {
    Any,
    /// The whole right-hand side equals the expression.
    Exact(NormalizedExpr),
    /// The expression is a sub-expression of the right-hand side.
    Partial(NormalizedExpr),
}

impl ExprSpec {
    pub fn matches(&self, rhs: &NormalizedExpr) -> bool {
        match self {
            ExprSpec::Any => true,
            ExprSpec::Exact(expr) => rhs == expr,
            ExprSpec::Partial(expr) => rhs.contains(expr),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AssignPattern {
    variable: String,
    expr: NormalizedExpr,
}

#[derive(Debug, Clone, Default)]
pub struct PatternStore {
    patterns: HashMap<StmtNo, AssignPattern>,
    by_variable: HashMap<String, HashSet<StmtNo>>,
}

impl PatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, stmt: StmtNo, variable: &str, expr: NormalizedExpr) -> Result<()> {
        if stmt == 0 {
            return Err(PkbError::InvalidStatement(stmt));
        }
        if variable.is_empty() {
            return Err(PkbError::EmptyName("pattern"));
        }
        let pattern = AssignPattern {
            variable: variable.to_string(),
            expr,
        };
        match self.patterns.get(&stmt) {
            Some(existing) if *existing != pattern => Err(PkbError::PatternConflict(stmt)),
            Some(_) => Ok(()),
            None => {
                self.by_variable
                    .entry(pattern.variable.clone())
                    .or_default()
                    .insert(stmt);
                self.patterns.insert(stmt, pattern);
                Ok(())
            }
        }
    }

    /// Assignments to `variable` whose right-hand side satisfies `spec`.
    pub fn find_pattern(&self, variable: &str, spec: &ExprSpec) -> HashSet<StmtNo> {
        self.by_variable
            .get(variable)
            .into_iter()
            .flatten()
            .filter(|stmt| self.rhs_matches(**stmt, spec))
            .copied()
            .collect()
    }

    /// Assignments to any variable whose right-hand side satisfies `spec`.
    pub fn find_any_pattern(&self, spec: &ExprSpec) -> HashSet<StmtNo> {
        self.patterns
            .iter()
            .filter(|(_, pattern)| spec.matches(&pattern.expr))
            .map(|(&stmt, _)| stmt)
            .collect()
    }

    /// `(statement, assigned variable)` for every assignment whose right-hand side satisfies `spec`.
    pub fn find_pattern_pairs(&self, spec: &ExprSpec) -> HashSet<(StmtNo, String)> {
        self.patterns
            .iter()
            .filter(|(_, pattern)| spec.matches(&pattern.expr))
            .map(|(&stmt, pattern)| (stmt, pattern.variable.clone()))
            .collect()
    }

    pub fn pattern_of(&self, stmt: StmtNo) -> Option<(&str, &NormalizedExpr)> {
        self.patterns
            .get(&stmt)
            .map(|p| (p.variable.as_str(), &p.expr))
    }

    fn rhs_matches(&self, stmt: StmtNo, spec: &ExprSpec) -> bool {
        self.patterns
            .get(&stmt)
            .map_or(false, |p| spec.matches(&p.expr))
    }

    pub(crate) fn clear(&mut self) {
        self.patterns.clear();
        self.by_variable.clear();
    }
}
