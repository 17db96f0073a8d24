use std::collections::BTreeSet;

use eqcov::{
    AuditError, ClassId, Cover, CoverageChecker, CoverageDeclaration, MethodSignature, TestCase,
    TestUnit, UnitDescriptor, combine, diff, residuals, select,
};
use proptest::prelude::*;

fn ids() -> impl Strategy<Value = Vec<ClassId>> {
    prop::collection::vec(-4i32..32, 0..12)
}

fn signature() -> impl Strategy<Value = String> {
    "[a-z]{1,8}\\((int|str)?\\)"
}

fn blank_signature() -> impl Strategy<Value = String> {
    "[ \\t]{0,4}"
}

fn expectation(signature: &str, valid: &[ClassId], invalid: &[ClassId], bounds: &[ClassId]) -> UnitDescriptor {
    UnitDescriptor::builder(signature)
        .valid_ecs(valid.iter().copied())
        .invalid_ecs(invalid.iter().copied())
        .boundaries(bounds.iter().copied())
        .build()
}

fn superset(base: &[ClassId], extra: &[ClassId]) -> Vec<ClassId> {
    let mut ids = extra.to_vec();
    ids.extend_from_slice(base);
    ids
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_superset_coverage_leaves_nothing_uncovered(
        sig in signature(),
        valid in ids(),
        invalid in ids(),
        bounds in ids(),
        extra in ids(),
    ) {
        let expected = vec![expectation(&sig, &valid, &invalid, &bounds)];
        let covered = vec![expectation(
            &sig,
            &superset(&valid, &extra),
            &superset(&invalid, &extra),
            &superset(&bounds, &extra),
        )];

        let report = diff(&expected, &covered).unwrap();
        prop_assert!(report.is_empty());
    }

    #[test]
    fn test_residuals_obey_set_difference(
        sig in signature(),
        valid in ids(),
        invalid in ids(),
        bounds in ids(),
        covered_valid in ids(),
        covered_invalid in ids(),
        covered_bounds in ids(),
    ) {
        let expected = vec![expectation(&sig, &valid, &invalid, &bounds)];
        let covered = vec![expectation(&sig, &covered_valid, &covered_invalid, &covered_bounds)];
        let report = residuals(&expected, &covered).unwrap();

        let categories = [
            (&valid, &covered_valid, report.get(&sig).map(|e| e.valid_ecs.clone())),
            (&invalid, &covered_invalid, report.get(&sig).map(|e| e.invalid_ecs.clone())),
            (&bounds, &covered_bounds, report.get(&sig).map(|e| e.boundaries.clone())),
        ];
        for (original, claimed, uncovered) in categories {
            let uncovered = uncovered.unwrap_or_default();
            for id in &uncovered {
                prop_assert!(original.contains(id));
                prop_assert!(!claimed.contains(id));
            }
            let original_left: BTreeSet<_> =
                original.iter().filter(|id| !claimed.contains(*id)).collect();
            let reported: BTreeSet<_> = uncovered.iter().collect();
            prop_assert_eq!(original_left, reported);
        }
    }

    #[test]
    fn test_select_missing_signature_is_absent(
        present in prop::collection::vec(signature(), 0..6),
        wanted in signature(),
    ) {
        let declarations: Vec<CoverageDeclaration> = present
            .iter()
            .filter(|sig| **sig != wanted)
            .map(|sig| CoverageDeclaration::from_cover("case", &Cover::new(sig.as_str()).valid_ecs([1])))
            .collect();
        let merged = combine(&declarations);

        prop_assert!(select(&merged, &MethodSignature::new(wanted.as_str())).unwrap().is_none());
        prop_assert!(select(&[], &MethodSignature::new(wanted.as_str())).unwrap().is_none());
    }

    #[test]
    fn test_unset_signature_is_rejected(
        blank in blank_signature(),
        present in prop::collection::vec(signature(), 0..6),
    ) {
        let declarations: Vec<CoverageDeclaration> = present
            .iter()
            .map(|sig| CoverageDeclaration::from_cover("case", &Cover::new(sig.as_str())))
            .collect();
        let merged = combine(&declarations);
        let unset = MethodSignature::new(blank.as_str());

        let is_invalid_argument = |err: AuditError| matches!(err, AuditError::InvalidArgument { .. });
        prop_assert!(is_invalid_argument(select(&merged, &unset).unwrap_err()));

        let expected = vec![expectation(&blank, &[1], &[], &[])];
        prop_assert!(is_invalid_argument(diff(&expected, &merged).unwrap_err()));
    }

    #[test]
    fn test_combine_is_union_per_category(
        sig in signature(),
        first in ids(),
        second in ids(),
    ) {
        let declarations = vec![
            CoverageDeclaration::from_cover("a", &Cover::new(sig.as_str()).boundaries(first.clone())),
            CoverageDeclaration::from_cover("b", &Cover::new(sig.as_str()).boundaries(second.clone())),
        ];
        let merged = combine(&declarations);
        prop_assert_eq!(merged.len(), 1);

        let union: BTreeSet<_> = first.iter().chain(&second).copied().collect();
        let merged_ids: BTreeSet<_> = merged[0].boundaries().iter().copied().collect();
        prop_assert_eq!(union, merged_ids);
    }

    #[test]
    fn test_unit_without_metadata_passes(
        covers in prop::collection::vec((signature(), ids(), any::<bool>()), 0..6),
    ) {
        let unit = covers.iter().enumerate().fold(
            TestUnit::new("uninstrumented"),
            |unit, (index, (sig, valid, fails))| {
                let fails = *fails;
                unit.case(
                    TestCase::new(format!("case_{index}"), move || {
                        if fails {
                            anyhow::bail!("case failed");
                        }
                        Ok(())
                    })
                    .cover(Cover::new(sig.as_str()).valid_ecs(valid.clone())),
                )
            },
        );

        prop_assert!(CoverageChecker::default().check(&unit).is_ok());
    }
}

#[test]
fn test_merge_of_disjoint_declarations() {
    let declarations = vec![
        CoverageDeclaration::from_cover("a", &Cover::new("f(int)").valid_ecs([1, 2])),
        CoverageDeclaration::from_cover("b", &Cover::new("f(int)").valid_ecs([3])),
    ];
    let merged = combine(&declarations);
    assert_eq!(merged[0].valid_ecs(), &[1, 2, 3]);
}

#[test]
fn test_duplicate_expected_ids_removed_by_single_cover() {
    let expected = vec![expectation("f(int)", &[1, 1, 2], &[], &[])];
    let covered = vec![expectation("f(int)", &[1], &[], &[])];

    let report = residuals(&expected, &covered).unwrap();
    assert_eq!(report.get("f(int)").unwrap().valid_ecs, vec![2]);
}
