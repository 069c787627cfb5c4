use crate::{QueryError, Result};
use spa_core::StatementKind;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Declared type of a synonym.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DesignEntity {
    Stmt,
    ProgLine,
    Read,
    Print,
    Assign,
    While,
    If,
    Call,
    Procedure,
    Variable,
    Constant,
}

impl DesignEntity {
    /// Whether a statement of `kind` can be bound to a synonym of this type.
    pub fn admits(&self, kind: StatementKind) -> bool {
        match self {
            DesignEntity::Stmt | DesignEntity::ProgLine => true,
            DesignEntity::Read => kind == StatementKind::Read,
            DesignEntity::Print => kind == StatementKind::Print,
            DesignEntity::Assign => kind == StatementKind::Assign,
            DesignEntity::While => kind == StatementKind::While,
            DesignEntity::If => kind == StatementKind::If,
            DesignEntity::Call => kind == StatementKind::Call,
            DesignEntity::Procedure | DesignEntity::Variable | DesignEntity::Constant => false,
        }
    }

    pub fn is_statement(&self) -> bool {
        !matches!(
            self,
            DesignEntity::Procedure | DesignEntity::Variable | DesignEntity::Constant
        )
    }
}

impl FromStr for DesignEntity {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "stmt" => Ok(DesignEntity::Stmt),
            "prog_line" => Ok(DesignEntity::ProgLine),
            "read" => Ok(DesignEntity::Read),
            "print" => Ok(DesignEntity::Print),
            "assign" => Ok(DesignEntity::Assign),
            "while" => Ok(DesignEntity::While),
            "if" => Ok(DesignEntity::If),
            "call" => Ok(DesignEntity::Call),
            "procedure" => Ok(DesignEntity::Procedure),
            "variable" => Ok(DesignEntity::Variable),
            "constant" => Ok(DesignEntity::Constant),
            other => Err(QueryError::UnknownDesignEntity(other.to_string())),
        }
    }
}

impl fmt::Display for DesignEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DesignEntity::Stmt => "stmt",
            DesignEntity::ProgLine => "prog_line",
            DesignEntity::Read => "read",
            DesignEntity::Print => "print",
            DesignEntity::Assign => "assign",
            DesignEntity::While => "while",
            DesignEntity::If => "if",
            DesignEntity::Call => "call",
            DesignEntity::Procedure => "procedure",
            DesignEntity::Variable => "variable",
            DesignEntity::Constant => "constant",
        };
        write!(f, "{}", name)
    }
}

/// Synonym name to declared type, as produced by the query parser.
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    synonyms: HashMap<String, DesignEntity>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(mut self, synonym: &str, entity: DesignEntity) -> Self {
        self.synonyms.insert(synonym.to_string(), entity);
        self
    }

    /// Builds declarations from textual `(synonym, design entity)` pairs.
    pub fn parse<'s, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'s str, &'s str)>,
    {
        let mut declarations = Self::new();
        for (synonym, entity) in pairs {
            declarations = declarations.declare(synonym, entity.parse()?);
        }
        Ok(declarations)
    }

    pub fn entity_of(&self, synonym: &str) -> Result<DesignEntity> {
        self.synonyms
            .get(synonym)
            .copied()
            .ok_or_else(|| QueryError::UndeclaredSynonym(synonym.to_string()))
    }
}
