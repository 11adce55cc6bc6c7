use arcstr::ArcStr;
use thiserror::Error;

use crate::units::{Quantity, Unit};

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node {0} does not belong to this graph")]
    ForeignNode(ArcStr),

    #[error("parameter {0} does not belong to this graph")]
    ForeignParam(ArcStr),

    #[error("unit mismatch between {name} ({expected}) and {other} ({found})")]
    UnitMismatch {
        name: ArcStr,
        expected: Unit,
        other: ArcStr,
        found: Unit,
    },

    #[error("conflicting constraints on {name}: {a} != {b}")]
    ConflictingConstraint {
        name: ArcStr,
        a: Quantity,
        b: Quantity,
    },
}

pub type Result<T> = std::result::Result<T, GraphError>;
