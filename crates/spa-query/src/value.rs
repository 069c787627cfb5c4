use crate::argument::Argument;
use crate::declaration::DesignEntity;
use spa_core::{Pkb, StmtNo};
use std::fmt::{self, Display};
use std::hash::Hash;

/// A value that can occupy one side of a relation.
pub trait Value: Clone + Eq + Hash + Ord + Display {
    /// The literal argument naming this value, if the argument has the right shape.
    fn from_argument(argument: &Argument<'_>) -> Option<Self>;

    /// Whether the value may be bound to a synonym declared as `entity`.
    fn conforms(&self, pkb: &Pkb, entity: DesignEntity) -> bool;
}

impl Value for StmtNo {
    fn from_argument(argument: &Argument<'_>) -> Option<Self> {
        match argument {
            Argument::Integer(stmt) => Some(*stmt),
            _ => None,
        }
    }

    fn conforms(&self, pkb: &Pkb, entity: DesignEntity) -> bool {
        pkb.registry()
            .kind_of(*self)
            .map_or(false, |kind| entity.admits(kind))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Procedure(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(pub String);

impl Value for Procedure {
    fn from_argument(argument: &Argument<'_>) -> Option<Self> {
        match argument {
            Argument::Name(name) => Some(Procedure(name.to_string())),
            _ => None,
        }
    }

    fn conforms(&self, _pkb: &Pkb, entity: DesignEntity) -> bool {
        entity == DesignEntity::Procedure
    }
}

impl Value for Variable {
    fn from_argument(argument: &Argument<'_>) -> Option<Self> {
        match argument {
            Argument::Name(name) => Some(Variable(name.to_string())),
            _ => None,
        }
    }

    fn conforms(&self, _pkb: &Pkb, entity: DesignEntity) -> bool {
        entity == DesignEntity::Variable
    }
}

impl Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
