use crate::{PkbError, Result, StmtNo};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PkbConfig {
    /// Reject pairs whose second statement is not numbered after the first. Applies to Parent
    /// pairs as well as Follows pairs.
    pub strict_follows_order: bool,
    /// Highest statement number the store accepts.
    pub max_statements: Option<StmtNo>,
}

impl Default for PkbConfig {
    fn default() -> Self {
        Self {
            strict_follows_order: false,
            max_statements: None,
        }
    }
}

impl PkbConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PkbError::Config(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PkbError::Config(e.to_string()))
    }

    pub(crate) fn accepts_statement(&self, stmt: StmtNo) -> bool {
        stmt > 0 && self.max_statements.map_or(true, |max| stmt <= max)
    }
}
