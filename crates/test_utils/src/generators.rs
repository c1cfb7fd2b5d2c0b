//! Property-Based Test Generators
//!
//! Proptest strategies producing values that satisfy the domain invariants.

use core_kernel::InfraResultId;
use domain_infra::{InfraCombination, InfraResult, InfraStatus};
use proptest::prelude::*;
use uuid::Uuid;

/// Strategy for generating any infrastructure status
pub fn status_strategy() -> impl Strategy<Value = InfraStatus> {
    prop::sample::select(InfraStatus::ALL.to_vec())
}

/// Strategy for generating a single infrastructure parameter, e.g. `MySQL-5.7`
pub fn parameter_strategy() -> impl Strategy<Value = String> {
    ("[A-Z][a-zA-Z]{1,11}", 1u8..30, 0u8..10)
        .prop_map(|(name, major, minor)| format!("{}-{}.{}", name, major, minor))
}

/// Strategy for generating valid combination names of one to five parameters
pub fn combination_strategy() -> impl Strategy<Value = InfraCombination> {
    prop::collection::vec(parameter_strategy(), 1..=5).prop_map(|parameters| {
        InfraCombination::from_parameters(parameters).expect("generated parameters are valid")
    })
}

/// Strategy for generating identifiers
pub fn id_strategy() -> impl Strategy<Value = InfraResultId> {
    any::<u128>().prop_map(|bits| InfraResultId::from_uuid(Uuid::from_u128(bits)))
}

/// Strategy for generating unpersisted infrastructure results
pub fn infra_result_strategy() -> impl Strategy<Value = InfraResult> {
    (id_strategy(), status_strategy(), combination_strategy())
        .prop_map(|(id, status, combination)| InfraResult::with_id(id, status, combination))
}
