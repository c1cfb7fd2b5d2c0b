//! Infrastructure result domain errors

use thiserror::Error;

/// Errors that can occur in the infrastructure result domain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InfraError {
    #[error("Invalid infrastructure combination: {0}")]
    InvalidCombination(String),

    #[error("Unknown infrastructure status: {0}")]
    UnknownStatus(String),
}
