/*! Normalize assignment expressions for pattern matching.
 *
 * Pattern clauses compare the right-hand side of an assignment against a query expression, either
 * as a whole or as a sub-expression. Comparing raw source text gets both wrong: whitespace and
 * redundant parentheses differ, and `b` would match inside `ab`. This crate parses infix expressions
 * and renders them in a canonical postfix form where whole-expression and sub-expression matching
 * become plain string comparisons.
 */

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct ExprParser;

#[derive(Error, Debug)]
pub enum ExprError {
    #[error("Malformed expression: {0}")]
    Syntax(#[from] Box<pest::error::Error<Rule>>),
}

pub type ExprResult<T> = Result<T, ExprError>;

/// Postfix rendering of an expression with every token padded by single spaces, e.g. ` x 1 + `.
///
/// In postfix order the tokens of any subtree are contiguous and no other contiguous, well-formed
/// token run exists, so a substring test on this form is a subtree test. The padding keeps names
/// from matching inside longer names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NormalizedExpr(String);

impl NormalizedExpr {
    pub fn parse(source: &str) -> ExprResult<Self> {
        let pairs = ExprParser::parse(Rule::expression, source).map_err(Box::new)?;

        let mut tokens = Vec::new();
        for pair in pairs {
            if pair.as_rule() == Rule::expr {
                emit_postfix(pair, &mut tokens);
            }
        }

        let mut rendered = String::from(" ");
        for token in &tokens {
            rendered.push_str(token);
            rendered.push(' ');
        }
        Ok(Self(rendered))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `other` is a sub-expression of `self`, including `self` itself.
    pub fn contains(&self, other: &NormalizedExpr) -> bool {
        self.0.contains(&other.0)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }

    /// Variable names referenced by the expression, in order of first appearance.
    pub fn variables(&self) -> Vec<&str> {
        self.collect_tokens(|t| t.starts_with(|c: char| c.is_ascii_alphabetic()))
    }

    /// Integer constants referenced by the expression, in order of first appearance.
    pub fn constants(&self) -> Vec<&str> {
        self.collect_tokens(|t| t.starts_with(|c: char| c.is_ascii_digit()))
    }

    fn collect_tokens(&self, keep: impl Fn(&str) -> bool) -> Vec<&str> {
        let mut seen = Vec::new();
        for token in self.tokens() {
            if keep(token) && !seen.contains(&token) {
                seen.push(token);
            }
        }
        seen
    }
}

impl fmt::Display for NormalizedExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.trim())
    }
}

impl std::str::FromStr for NormalizedExpr {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// `expr` and `term` alternate operands and operators; emitting each operator after its right
// operand yields left-associative postfix.
fn emit_postfix(pair: Pair<'_, Rule>, out: &mut Vec<String>) {
    match pair.as_rule() {
        Rule::expr | Rule::term => {
            let mut inner = pair.into_inner();
            if let Some(first) = inner.next() {
                emit_postfix(first, out);
            }
            while let (Some(op), Some(operand)) = (inner.next(), inner.next()) {
                emit_postfix(operand, out);
                out.push(op.as_str().to_string());
            }
        }
        Rule::name | Rule::integer => out.push(pair.as_str().to_string()),
        _ => {}
    }
}

pub fn check(input: &str) -> bool {
    NormalizedExpr::parse(input).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn norm(src: &str) -> NormalizedExpr {
        NormalizedExpr::parse(src).unwrap()
    }

    #[test]
    fn test_single_tokens() {
        assert_eq!(norm("x").as_str(), " x ");
        assert_eq!(norm("42").as_str(), " 42 ");
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(norm("a + b * c").as_str(), " a b c * + ");
        assert_eq!(norm("a - b - c").as_str(), " a b - c - ");
        assert_eq!(norm("a * (b + c)").as_str(), " a b c + * ");
        assert_eq!(norm("(a + b) % 3").as_str(), " a b + 3 % ");
    }

    #[test]
    fn test_whitespace_and_parentheses_are_normalized() {
        assert_eq!(norm("x+1"), norm("  x +   1 "));
        assert_eq!(norm("((x)) + (1)"), norm("x + 1"));
    }

    #[test]
    fn test_subexpression_respects_tree_boundaries() {
        let full = norm("a + b + c");
        assert!(full.contains(&norm("a + b")));
        assert!(full.contains(&norm("c")));
        assert!(!full.contains(&norm("b + c")));

        let product = norm("a + b * c");
        assert!(product.contains(&norm("b * c")));
        assert!(!product.contains(&norm("a + b")));
    }

    #[test]
    fn test_names_do_not_match_inside_longer_names() {
        let expr = norm("abc + 1");
        assert!(!expr.contains(&norm("b")));
        assert!(!expr.contains(&norm("ab")));
        assert!(expr.contains(&norm("abc")));
        assert!(!norm("x + 10").contains(&norm("1")));
    }

    #[test]
    fn test_variables_and_constants() {
        let expr = norm("x * (y + x) - 2 + 10");
        assert_eq!(expr.variables(), vec!["x", "y"]);
        assert_eq!(expr.constants(), vec!["2", "10"]);
    }

    #[test]
    fn test_malformed_input() {
        assert!(!check(""));
        assert!(!check("x +"));
        assert!(!check("(x + 1"));
        assert!(!check("1x"));
        assert!(!check("x = 1"));
    }

    #[test]
    fn test_display_trims_padding() {
        assert_eq!(norm("x+1").to_string(), "x 1 +");
    }
}
