//! Repository implementations for TestGrid entities
//!
//! Each repository binds the generic [`crate::repository::Repository`] to
//! one entity type and exposes its operations under entity-specific
//! signatures.

pub mod infra_result;

pub use infra_result::{InfraResultRepository, InfraResultRow};
