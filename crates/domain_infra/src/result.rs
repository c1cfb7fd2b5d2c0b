//! Infrastructure result entity

use core_kernel::{AuditTimestamps, InfraResultId};
use serde::{Deserialize, Serialize};

use crate::combination::InfraCombination;
use crate::status::InfraStatus;

/// The outcome of provisioning one infrastructure combination
///
/// A result is created when infrastructure for a combination has been
/// prepared (or failed to be), and updated if tearing it down fails later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfraResult {
    id: InfraResultId,
    status: InfraStatus,
    infra_combination: InfraCombination,
    /// Present once the result has been read back from the database
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamps: Option<AuditTimestamps>,
}

impl InfraResult {
    pub const TABLE: &'static str = "infra_result";
    pub const ID_COLUMN: &'static str = "id";
    pub const STATUS_COLUMN: &'static str = "status";
    pub const INFRA_COMBINATION_COLUMN: &'static str = "infra_combination";
    pub const CREATED_TIMESTAMP_COLUMN: &'static str = "created_timestamp";
    pub const MODIFIED_TIMESTAMP_COLUMN: &'static str = "modified_timestamp";

    /// Creates a new, not yet persisted result with a time-ordered id
    pub fn new(status: InfraStatus, infra_combination: InfraCombination) -> Self {
        Self::with_id(InfraResultId::new_v7(), status, infra_combination)
    }

    /// Creates a new, not yet persisted result with a caller-chosen id
    pub fn with_id(
        id: InfraResultId,
        status: InfraStatus,
        infra_combination: InfraCombination,
    ) -> Self {
        Self {
            id,
            status,
            infra_combination,
            timestamps: None,
        }
    }

    /// Rebuilds a result from its persisted state
    pub fn restore(
        id: InfraResultId,
        status: InfraStatus,
        infra_combination: InfraCombination,
        timestamps: AuditTimestamps,
    ) -> Self {
        Self {
            id,
            status,
            infra_combination,
            timestamps: Some(timestamps),
        }
    }

    pub fn id(&self) -> InfraResultId {
        self.id
    }

    pub fn status(&self) -> InfraStatus {
        self.status
    }

    pub fn infra_combination(&self) -> &InfraCombination {
        &self.infra_combination
    }

    pub fn timestamps(&self) -> Option<&AuditTimestamps> {
        self.timestamps.as_ref()
    }

    /// Returns true if the result was loaded from (or written to) the database
    pub fn is_persisted(&self) -> bool {
        self.timestamps.is_some()
    }

    pub fn is_success(&self) -> bool {
        !self.status.is_error()
    }

    pub fn set_status(&mut self, status: InfraStatus) {
        self.status = status;
    }

    /// Records that tearing down the infrastructure failed
    pub fn mark_destroy_error(&mut self) {
        self.status = InfraStatus::InfrastructureDestroyError;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combination() -> InfraCombination {
        InfraCombination::new("CentOS-7_PostgreSQL-9.6_OracleJDK-8").unwrap()
    }

    #[test]
    fn test_new_result_is_not_persisted() {
        let result = InfraResult::new(InfraStatus::InfrastructureSuccess, combination());
        assert!(!result.is_persisted());
        assert!(result.is_success());
    }

    #[test]
    fn test_mark_destroy_error() {
        let mut result = InfraResult::new(InfraStatus::InfrastructureSuccess, combination());
        let id = result.id();
        result.mark_destroy_error();
        assert_eq!(result.status(), InfraStatus::InfrastructureDestroyError);
        assert!(!result.is_success());
        assert_eq!(result.id(), id);
    }
}
