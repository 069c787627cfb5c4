use crate::{QueryError, Result};
use spa_core::{ExprSpec, NormalizedExpr, StmtNo};

/// One clause argument, classified by shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument<'a> {
    Wildcard,
    /// Statement number literal.
    Integer(StmtNo),
    /// Quoted procedure or variable name, without the quotes.
    Name(&'a str),
    Synonym(&'a str),
}

impl<'a> Argument<'a> {
    /// Anything that is not `_`, digits, a quoted identifier or an identifier is a defect in
    /// whatever produced the query and is reported as malformed.
    pub fn classify(token: &'a str) -> Result<Self> {
        let token = token.trim();
        if token == "_" {
            return Ok(Argument::Wildcard);
        }
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            return token
                .parse()
                .map(Argument::Integer)
                .map_err(|_| QueryError::MalformedArgument(token.to_string()));
        }
        if let Some(inner) = token
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            let inner = inner.trim();
            if is_identifier(inner) {
                return Ok(Argument::Name(inner));
            }
        } else if is_identifier(token) {
            return Ok(Argument::Synonym(token));
        }
        Err(QueryError::MalformedArgument(token.to_string()))
    }

    pub fn is_synonym(&self) -> bool {
        matches!(self, Argument::Synonym(_))
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Argument::Wildcard)
    }
}

pub fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next().map_or(false, |c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Parses the expression argument of a pattern clause: `_`, `"expr"` or `_"expr"_`.
pub fn parse_expr_spec(token: &str) -> Result<ExprSpec> {
    let token = token.trim();
    if token == "_" {
        return Ok(ExprSpec::Any);
    }
    if let Some(inner) = token
        .strip_prefix('_')
        .and_then(|rest| rest.strip_suffix('_'))
    {
        let quoted = unquote(inner.trim())
            .ok_or_else(|| QueryError::InvalidPatternArgument(token.to_string()))?;
        return Ok(ExprSpec::Partial(NormalizedExpr::parse(quoted)?));
    }
    let quoted = unquote(token).ok_or_else(|| QueryError::InvalidPatternArgument(token.to_string()))?;
    Ok(ExprSpec::Exact(NormalizedExpr::parse(quoted)?))
}

fn unquote(token: &str) -> Option<&str> {
    token.strip_prefix('"')?.strip_suffix('"')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_shapes() {
        assert_eq!(Argument::classify("_").unwrap(), Argument::Wildcard);
        assert_eq!(Argument::classify("12").unwrap(), Argument::Integer(12));
        assert_eq!(Argument::classify(" s1 ").unwrap(), Argument::Synonym("s1"));
        assert_eq!(Argument::classify("\"main\"").unwrap(), Argument::Name("main"));
        assert_eq!(Argument::classify("\" x \"").unwrap(), Argument::Name("x"));
    }

    #[test]
    fn test_classify_rejects_malformed_tokens() {
        for token in ["", "1a", "a_b", "\"\"", "\"1x\"", "\"", "-3", "99999999999"] {
            assert!(
                matches!(Argument::classify(token), Err(QueryError::MalformedArgument(_))),
                "{token:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_expr_spec() {
        assert_eq!(parse_expr_spec("_").unwrap(), ExprSpec::Any);
        assert_eq!(
            parse_expr_spec("\"x + 1\"").unwrap(),
            ExprSpec::Exact(NormalizedExpr::parse("x+1").unwrap())
        );
        assert_eq!(
            parse_expr_spec("_\"x\"_").unwrap(),
            ExprSpec::Partial(NormalizedExpr::parse("x").unwrap())
        );
        assert_eq!(
            parse_expr_spec("_ \"x\" _").unwrap(),
            ExprSpec::Partial(NormalizedExpr::parse("x").unwrap())
        );
        assert!(matches!(
            parse_expr_spec("x + 1"),
            Err(QueryError::InvalidPatternArgument(_))
        ));
        assert!(matches!(parse_expr_spec("\"x +\""), Err(QueryError::Expr(_))));
    }
}
