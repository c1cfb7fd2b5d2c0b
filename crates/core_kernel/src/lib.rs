//! Core Kernel - Foundational types shared by TestGrid entities
//!
//! This crate provides the building blocks every persisted entity uses:
//! - Strongly-typed UUID identifiers
//! - Database-assigned audit timestamps

pub mod identifiers;
pub mod audit;

pub use identifiers::InfraResultId;
pub use audit::AuditTimestamps;
