use thiserror::Error;

use crate::graph::GraphError;
use crate::heuristic::PinMatchError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("composition error: {0}")]
    Composition(#[from] GraphError),

    #[error("pin association error: {0}")]
    PinMatch(#[from] PinMatchError),
}

pub type Result<T> = std::result::Result<T, Error>;
