use eqcov::{
    AuditError, CheckOutcome, CheckerConfig, Cover, CoverageChecker, MethodAnalysis, TestCase,
    TestUnit, UnitAnalysis, UnitRunner,
};

use super::common::{covered_case, f_int_unit};

#[test]
fn test_partial_valid_coverage_fails_unit() {
    crate::test_log!("TEST START: test_partial_valid_coverage_fails_unit");

    let unit = f_int_unit()
        .case(covered_case("positive", Cover::new("f(int)").valid_ecs([1])))
        .case(covered_case("negative", Cover::new("f(int)").valid_ecs([2])));

    let verdict = UnitRunner::with_coverage_checker().run(&unit);
    assert_eq!(verdict.passed_count(), 2);
    assert!(!verdict.is_success());

    let failure = verdict.unit_failure().expect("unit should fail");
    assert_eq!(
        failure.to_string(),
        ">>> Uncovered\nmethodSignature: f(int)\nvalidECs: [5]"
    );
    let entry = failure.report().unwrap().get("f(int)").unwrap();
    assert_eq!(entry.valid_ecs, vec![5]);
    assert!(entry.invalid_ecs.is_empty());
    assert!(entry.boundaries.is_empty());

    crate::test_log!("TEST PASS: test_partial_valid_coverage_fails_unit");
}

#[test]
fn test_full_boundary_coverage_passes_unit() {
    let unit = TestUnit::new("boundaries")
        .analysis(
            UnitAnalysis::new().method(
                MethodAnalysis::new("clamp(int)")
                    .boundary(1, "minimum")
                    .boundary(2, "zero")
                    .boundary(3, "maximum"),
            ),
        )
        .case(covered_case(
            "edges",
            Cover::new("clamp(int)").boundaries([1, 2, 3]),
        ));

    let verdict = UnitRunner::with_coverage_checker().run(&unit);
    assert!(verdict.is_success(), "unexpected failures: {:?}", verdict.unit_failures);
}

#[test]
fn test_method_without_declarations_is_fully_uncovered() {
    let unit = f_int_unit()
        .analysis(
            UnitAnalysis::new()
                .method(MethodAnalysis::new("g()").condition(
                    eqcov::EquivalenceCondition::new("state").valid(9, "ready"),
                )),
        )
        .case(covered_case("other", Cover::new("f(int)").valid_ecs([1])));

    let verdict = UnitRunner::with_coverage_checker().run(&unit);
    let message = verdict.unit_failure().unwrap().to_string();
    assert_eq!(message, ">>> Uncovered\nmethodSignature: g()\nvalidECs: [9]");
    assert!(!message.contains("invalidECs"));
    assert!(!message.contains("boundaries"));
}

#[test]
fn test_skipped_declaration_does_not_count() {
    let unit = TestUnit::new("skipped")
        .analysis(UnitAnalysis::new().method(MethodAnalysis::new("h()").boundary(4, "limit")))
        .case(covered_case("limit", Cover::new("h()").boundaries([4])).skip());

    let verdict = UnitRunner::with_coverage_checker().run(&unit);
    assert!(verdict.failed_cases().next().is_none());
    let failure = verdict.unit_failure().unwrap();
    assert!(failure.is_uncovered());
    assert_eq!(
        failure.to_string(),
        ">>> Uncovered\nmethodSignature: h()\nboundaries: [4]"
    );
}

#[test]
fn test_unit_without_metadata_always_passes() {
    let unit = TestUnit::new("plain")
        .case(covered_case("declares", Cover::new("f(int)").valid_ecs([1, 2])))
        .case(TestCase::new("also_passes", || Ok(())));

    let verdict = UnitRunner::with_coverage_checker().run(&unit);
    assert!(verdict.is_success());

    let summary = CoverageChecker::default().check(&unit).unwrap();
    assert_eq!(summary.outcome, CheckOutcome::NoMetadata);
}

#[test]
fn test_case_failures_are_independent_of_coverage_verdict() {
    let unit = f_int_unit()
        .case(TestCase::new("broken", || anyhow::bail!("assertion failed")).cover(
            Cover::new("f(int)").valid_ecs([1, 2, 5]),
        ));

    let verdict = UnitRunner::with_coverage_checker().run(&unit);
    assert!(verdict.unit_failures.is_empty());
    assert_eq!(verdict.failed_cases().count(), 1);
    assert!(!verdict.is_success());
}

#[test]
fn test_multiple_methods_are_reported_in_expectation_order() {
    let unit = TestUnit::new("two_methods")
        .analysis(
            UnitAnalysis::new()
                .method(MethodAnalysis::new("b()").boundary(1, "b1"))
                .method(MethodAnalysis::new("a()").boundary(2, "a2")),
        )
        .case(covered_case("unrelated", Cover::new("c()").boundaries([1])));

    let verdict = UnitRunner::with_coverage_checker().run(&unit);
    assert_eq!(
        verdict.unit_failure().unwrap().to_string(),
        ">>> Uncovered\nmethodSignature: b()\nboundaries: [1]\n\
         >>> Uncovered\nmethodSignature: a()\nboundaries: [2]"
    );
}

#[test]
fn test_strict_checker_rejects_unit_without_metadata() {
    let runner = UnitRunner::new().with_hook(CoverageChecker::new(CheckerConfig::strict()));
    let verdict = runner.run(&TestUnit::new("bare").case(TestCase::new("ok", || Ok(()))));

    assert_eq!(verdict.passed_count(), 1);
    assert!(matches!(
        verdict.unit_failure(),
        Some(AuditError::Configuration { unit }) if unit == "bare"
    ));
}

#[test]
fn test_analysis_loaded_from_toml_drives_check() {
    let analysis = UnitAnalysis::from_toml_str(
        r#"
[[methods]]
signature = "parse(str)"

[[methods.equivalence_conditions]]
name = "input"
valid = [{ id = 1, description = "digits" }]
invalid = [{ id = 2, description = "letters" }]
"#,
    )
    .unwrap();

    let unit = TestUnit::new("parser")
        .analysis(analysis)
        .case(covered_case("digits", Cover::new("parse(str)").valid_ecs([1])))
        .case(covered_case(
            "letters",
            Cover::new("parse(str)")
                .invalid_ecs([2])
                .conditions(["input = \"abc\""]),
        ));

    assert!(UnitRunner::with_coverage_checker().run(&unit).is_success());
}
