use crate::{PkbError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Statement numbers are positive and unique across the whole program. Zero is never a statement.
pub type StmtNo = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    Read,
    Print,
    Assign,
    While,
    If,
    Call,
}

impl StatementKind {
    pub const ALL: [StatementKind; 6] = [
        StatementKind::Read,
        StatementKind::Print,
        StatementKind::Assign,
        StatementKind::While,
        StatementKind::If,
        StatementKind::Call,
    ];

    pub fn is_container(&self) -> bool {
        matches!(self, StatementKind::While | StatementKind::If)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatementKind::Read => "read",
            StatementKind::Print => "print",
            StatementKind::Assign => "assign",
            StatementKind::While => "while",
            StatementKind::If => "if",
            StatementKind::Call => "call",
        };
        write!(f, "{}", name)
    }
}

/// Entity sets and the statement-number to statement-kind map.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    procedures: HashSet<String>,
    variables: HashSet<String>,
    constants: HashSet<String>,
    statements: BTreeMap<StmtNo, StatementKind>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_procedure(&mut self, name: &str) {
        self.procedures.insert(name.to_string());
    }

    pub(crate) fn add_variable(&mut self, name: &str) {
        self.variables.insert(name.to_string());
    }

    pub(crate) fn add_constant(&mut self, value: &str) {
        self.constants.insert(value.to_string());
    }

    /// Re-registering a statement with its existing kind is accepted.
    pub(crate) fn add_statement(&mut self, stmt: StmtNo, kind: StatementKind) -> Result<()> {
        match self.statements.get(&stmt) {
            Some(&existing) if existing != kind => Err(PkbError::StatementKindConflict {
                stmt,
                existing,
                requested: kind,
            }),
            Some(_) => Ok(()),
            None => {
                self.statements.insert(stmt, kind);
                Ok(())
            }
        }
    }

    pub fn procedures(&self) -> HashSet<String> {
        self.procedures.clone()
    }

    pub fn variables(&self) -> HashSet<String> {
        self.variables.clone()
    }

    pub fn constants(&self) -> HashSet<String> {
        self.constants.clone()
    }

    pub fn has_procedure(&self, name: &str) -> bool {
        self.procedures.contains(name)
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.contains(name)
    }

    pub fn has_constant(&self, value: &str) -> bool {
        self.constants.contains(value)
    }

    /// Fails for statements that were never registered.
    pub fn statement_kind(&self, stmt: StmtNo) -> Result<StatementKind> {
        self.kind_of(stmt).ok_or(PkbError::UndefinedStatement(stmt))
    }

    pub fn kind_of(&self, stmt: StmtNo) -> Option<StatementKind> {
        self.statements.get(&stmt).copied()
    }

    pub fn is_kind(&self, stmt: StmtNo, kind: StatementKind) -> bool {
        self.kind_of(stmt) == Some(kind)
    }

    pub fn total_statements(&self) -> usize {
        self.statements.len()
    }

    pub fn statements(&self) -> HashSet<StmtNo> {
        self.statements.keys().copied().collect()
    }

    pub fn statements_of(&self, kind: StatementKind) -> HashSet<StmtNo> {
        self.statements
            .iter()
            .filter(|(_, &k)| k == kind)
            .map(|(&stmt, _)| stmt)
            .collect()
    }

    pub(crate) fn clear(&mut self) {
        self.procedures.clear();
        self.variables.clear();
        self.constants.clear();
        self.statements.clear();
    }
}
