//! Infrastructure Database Layer
//!
//! This crate provides the persistence layer for TestGrid on PostgreSQL
//! using SQLx.
//!
//! # Architecture
//!
//! A single generic [`Repository`] implements persist, delete, lookup by
//! primary key, lookup by field, and full scans for any type implementing
//! [`Entity`]. Entity-specific repositories such as
//! [`InfraResultRepository`] are thin facades over it.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, InfraResultRepository};
//!
//! let pool = create_pool(DatabaseConfig::from_env()?).await?;
//! run_migrations(&pool).await?;
//!
//! let repo = InfraResultRepository::new(pool);
//! let stored = repo.persist(&result).await?;
//! ```

pub mod pool;
pub mod config;
pub mod error;
pub mod field;
pub mod repository;
pub mod repositories;

pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool};
pub use error::DatabaseError;
pub use field::{Column, ColumnKind, FieldValue};
pub use repository::{Entity, Repository};
pub use repositories::InfraResultRepository;
