//! Infrastructure combination names

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::InfraError;

/// Width of the `infra_combination` column
pub const MAX_COMBINATION_LENGTH: usize = 255;

/// Name of the infrastructure combination a result belongs to
///
/// A combination is usually the infrastructure parameters joined together,
/// e.g. `Ubuntu-16.04_MySQL-5.7_OpenJDK-8`. The value is trimmed and must be
/// non-empty and at most [`MAX_COMBINATION_LENGTH`] characters long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InfraCombination(String);

impl InfraCombination {
    /// Creates a validated combination name
    ///
    /// # Errors
    ///
    /// Returns `InfraError::InvalidCombination` if the trimmed value is empty
    /// or longer than the column allows
    pub fn new(value: impl AsRef<str>) -> Result<Self, InfraError> {
        let trimmed = value.as_ref().trim();

        if trimmed.is_empty() {
            return Err(InfraError::InvalidCombination(
                "combination must not be empty".to_string(),
            ));
        }

        let length = trimmed.chars().count();
        if length > MAX_COMBINATION_LENGTH {
            return Err(InfraError::InvalidCombination(format!(
                "combination is {} characters long, maximum is {}",
                length, MAX_COMBINATION_LENGTH
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Builds a combination from individual infrastructure parameters,
    /// joined with `_`
    pub fn from_parameters<I, S>(parameters: I) -> Result<Self, InfraError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = parameters
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("_");
        Self::new(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InfraCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for InfraCombination {
    type Error = InfraError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<InfraCombination> for String {
    fn from(combination: InfraCombination) -> String {
        combination.0
    }
}

impl AsRef<str> for InfraCombination {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
