use eqcov::{UnitVerdict, testing::TestGuard};

#[ctor::ctor]
fn init_logging() {
    eqcov::testing::init_global_test_logging();
}

/// Record the verdict in the per-test log (when test logging is enabled) and
/// fail with every unit-level failure message when the unit did not pass.
pub fn assert_unit_passes(test_name: &str, verdict: &UnitVerdict) {
    let guard = TestGuard::new(test_name);
    guard.log_verdict(verdict);

    let failures: Vec<String> = verdict
        .failed_cases()
        .map(|outcome| format!("{}: {:?}", outcome.name, outcome.status))
        .chain(verdict.unit_failures.iter().map(ToString::to_string))
        .collect();
    assert!(
        verdict.is_success(),
        "unit {} failed:\n{}",
        verdict.unit,
        failures.join("\n")
    );
}
