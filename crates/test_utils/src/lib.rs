//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! TestGrid persistence test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built infrastructure results and combinations
//! - `builders`: Builder for test infrastructure results
//! - `database`: PostgreSQL test containers with migrations applied
//! - `assertions`: Comparisons that ignore database-assigned columns
//! - `generators`: Property-based test data generators
//! - `logging`: One-time tracing setup for test binaries

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;
pub mod logging;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
pub use logging::init_test_tracing;
