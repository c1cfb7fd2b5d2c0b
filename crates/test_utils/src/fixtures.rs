//! Pre-built Test Fixtures
//!
//! Ready-to-use infrastructure results and combinations. Values are fixed so
//! tests can assert on them directly.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::{AuditTimestamps, InfraResultId};
use domain_infra::{InfraCombination, InfraResult, InfraStatus};
use uuid::Uuid;

/// Fixture for infrastructure combinations and results
pub struct InfraFixtures;

impl InfraFixtures {
    /// Combination on Ubuntu with MySQL and OpenJDK
    pub fn ubuntu_mysql() -> InfraCombination {
        Self::combination("Ubuntu-16.04_MySQL-5.7_OpenJDK-8")
    }

    /// Combination on CentOS with PostgreSQL and Oracle JDK
    pub fn centos_postgres() -> InfraCombination {
        Self::combination("CentOS-7_PostgreSQL-9.6_OracleJDK-8")
    }

    /// Combination on Windows with SQL Server
    pub fn windows_mssql() -> InfraCombination {
        Self::combination("Windows-2016_MSSQL-2017_OpenJDK-8")
    }

    /// Fixed identifier for deterministic tests
    pub fn fixed_id() -> InfraResultId {
        InfraResultId::from_uuid(Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0001))
    }

    /// A freshly provisioned, not yet persisted result
    pub fn success() -> InfraResult {
        InfraResult::new(InfraStatus::InfrastructureSuccess, Self::ubuntu_mysql())
    }

    /// A result whose infrastructure failed to come up
    pub fn preparation_error() -> InfraResult {
        InfraResult::new(InfraStatus::InfrastructurePreparationError, Self::centos_postgres())
    }

    /// A result whose infrastructure could not be torn down
    pub fn destroy_error() -> InfraResult {
        InfraResult::new(InfraStatus::InfrastructureDestroyError, Self::windows_mssql())
    }

    /// One result per status, each on a different combination
    pub fn one_of_each_status() -> Vec<InfraResult> {
        vec![Self::success(), Self::preparation_error(), Self::destroy_error()]
    }

    /// A result as it would look after being read from the database
    pub fn persisted_success() -> InfraResult {
        let created = Self::recorded_at();
        InfraResult::restore(
            Self::fixed_id(),
            InfraStatus::InfrastructureSuccess,
            Self::ubuntu_mysql(),
            AuditTimestamps::new(created, created),
        )
    }

    /// Timestamp used for persisted fixtures (Oct 20, 2017)
    pub fn recorded_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 10, 20, 9, 30, 0).unwrap()
    }

    fn combination(name: &str) -> InfraCombination {
        InfraCombination::new(name).expect("fixture combination is valid")
    }
}
