//! Test Data Builders
//!
//! Builders let a test name only the fields it cares about; everything else
//! gets a sensible default.

use core_kernel::InfraResultId;
use domain_infra::{InfraCombination, InfraResult, InfraStatus};
use fake::faker::lorem::en::Word;
use fake::Fake;

use crate::fixtures::InfraFixtures;

/// Builder for constructing test infrastructure results
pub struct TestInfraResultBuilder {
    id: InfraResultId,
    status: InfraStatus,
    infra_combination: InfraCombination,
}

impl Default for TestInfraResultBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestInfraResultBuilder {
    /// Creates a builder for a successful result on the default combination
    pub fn new() -> Self {
        Self {
            id: InfraResultId::new_v7(),
            status: InfraStatus::InfrastructureSuccess,
            infra_combination: InfraFixtures::ubuntu_mysql(),
        }
    }

    pub fn with_id(mut self, id: InfraResultId) -> Self {
        self.id = id;
        self
    }

    pub fn with_status(mut self, status: InfraStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the combination name
    ///
    /// # Panics
    ///
    /// Panics if the name is not a valid combination
    pub fn with_combination(mut self, name: &str) -> Self {
        self.infra_combination = InfraCombination::new(name).expect("valid combination name");
        self
    }

    /// Uses a randomly generated combination name
    pub fn with_random_combination(mut self) -> Self {
        self.infra_combination = random_combination();
        self
    }

    pub fn build(self) -> InfraResult {
        InfraResult::with_id(self.id, self.status, self.infra_combination)
    }
}

/// Generates a plausible combination name such as `Lorem-4_Ipsum-12_Dolor-7`
pub fn random_combination() -> InfraCombination {
    let parameters: Vec<String> = (0..3)
        .map(|_| {
            let name: String = Word().fake();
            let version: u8 = (1u8..20).fake();
            format!("{}-{}", capitalize(&name), version)
        })
        .collect();

    InfraCombination::from_parameters(parameters).expect("generated combination is valid")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
