//! Custom Test Assertions
//!
//! Compare infrastructure results on the columns the application writes,
//! ignoring the timestamps the database assigns.

use domain_infra::InfraResult;

/// Asserts that two results agree on id, status and combination
///
/// # Panics
///
/// Panics with a field-level message on the first mismatch
pub fn assert_same_infra_result(actual: &InfraResult, expected: &InfraResult) {
    assert_eq!(actual.id(), expected.id(), "InfraResult id mismatch");
    assert_eq!(
        actual.status(),
        expected.status(),
        "InfraResult status mismatch for {}",
        expected.id()
    );
    assert_eq!(
        actual.infra_combination(),
        expected.infra_combination(),
        "InfraResult combination mismatch for {}",
        expected.id()
    );
}

/// Asserts that both slices hold the same results, in any order
pub fn assert_same_infra_results(actual: &[InfraResult], expected: &[InfraResult]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Expected {} results, got {}",
        expected.len(),
        actual.len()
    );

    for wanted in expected {
        let found = actual
            .iter()
            .find(|candidate| candidate.id() == wanted.id())
            .unwrap_or_else(|| panic!("Missing InfraResult {}", wanted.id()));
        assert_same_infra_result(found, wanted);
    }
}

/// Asserts that a result carries database-assigned timestamps
pub fn assert_persisted(result: &InfraResult) {
    let timestamps = result
        .timestamps()
        .unwrap_or_else(|| panic!("InfraResult {} has no timestamps", result.id()));
    assert!(
        timestamps.modified_at >= timestamps.created_at,
        "modified_at precedes created_at for {}",
        result.id()
    );
}
