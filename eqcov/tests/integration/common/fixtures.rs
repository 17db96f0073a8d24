use eqcov::{Cover, EquivalenceCondition, MethodAnalysis, TestCase, TestUnit, UnitAnalysis};

/// Unit expecting valid classes 1, 2 and 5 for `f(int)`.
pub fn f_int_unit() -> TestUnit {
    TestUnit::new("f_int").analysis(
        UnitAnalysis::new().method(
            MethodAnalysis::new("f(int)").condition(
                EquivalenceCondition::new("x")
                    .valid(1, "x > 0")
                    .valid(2, "x < 0")
                    .valid(5, "x = i32::MAX"),
            ),
        ),
    )
}

/// A passing case declaring `cover`.
pub fn covered_case(name: &str, cover: Cover) -> TestCase {
    TestCase::new(name, || Ok(())).cover(cover)
}
