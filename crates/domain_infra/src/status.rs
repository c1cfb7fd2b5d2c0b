//! Infrastructure status
//!
//! The stored form of each status is its SCREAMING_SNAKE_CASE name, which
//! is what the `infra_result.status` column holds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InfraError;

/// Outcome of preparing or tearing down an infrastructure combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InfraStatus {
    /// Provisioning the infrastructure failed
    InfrastructurePreparationError,
    /// Tearing down the infrastructure failed
    InfrastructureDestroyError,
    /// The infrastructure was provisioned successfully
    InfrastructureSuccess,
}

impl InfraStatus {
    pub const ALL: [InfraStatus; 3] = [
        InfraStatus::InfrastructurePreparationError,
        InfraStatus::InfrastructureDestroyError,
        InfraStatus::InfrastructureSuccess,
    ];

    /// Returns the stored form of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            InfraStatus::InfrastructurePreparationError => "INFRASTRUCTURE_PREPARATION_ERROR",
            InfraStatus::InfrastructureDestroyError => "INFRASTRUCTURE_DESTROY_ERROR",
            InfraStatus::InfrastructureSuccess => "INFRASTRUCTURE_SUCCESS",
        }
    }

    /// Returns a human readable label
    pub fn label(&self) -> &'static str {
        match self {
            InfraStatus::InfrastructurePreparationError => "Infrastructure Preparation Error",
            InfraStatus::InfrastructureDestroyError => "Infrastructure Destroy Error",
            InfraStatus::InfrastructureSuccess => "Infrastructure Success",
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, InfraStatus::InfrastructureSuccess)
    }
}

impl fmt::Display for InfraStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InfraStatus {
    type Err = InfraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        InfraStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| InfraError::UnknownStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        let status: InfraStatus = "infrastructure_destroy_error".parse().unwrap();
        assert_eq!(status, InfraStatus::InfrastructureDestroyError);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "SUCCESS".parse::<InfraStatus>().unwrap_err();
        assert_eq!(err, InfraError::UnknownStatus("SUCCESS".to_string()));
    }

    #[test]
    fn test_is_error() {
        assert!(InfraStatus::InfrastructurePreparationError.is_error());
        assert!(InfraStatus::InfrastructureDestroyError.is_error());
        assert!(!InfraStatus::InfrastructureSuccess.is_error());
    }
}
