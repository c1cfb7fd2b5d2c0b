//! Infrastructure Result Domain
//!
//! This crate models the outcome of provisioning one infrastructure
//! combination for a TestGrid test run.
//!
//! # Key Concepts
//!
//! - **Infrastructure Combination**: The named set of infrastructure
//!   parameters a test runs against (operating system, database, JDK, ...)
//! - **Infrastructure Status**: Whether preparing or destroying that
//!   infrastructure succeeded
//! - **Infrastructure Result**: A persisted record pairing the two

pub mod combination;
pub mod status;
pub mod result;
pub mod error;

pub use combination::InfraCombination;
pub use status::InfraStatus;
pub use result::InfraResult;
pub use error::InfraError;
