use eqcov::schema::{cover_schema, export_schemas, unit_analysis_schema};
use eqcov::{AuditError, CheckerConfig, Cover, ErrorCode, TestUnit, UnitAnalysis, UnitRunner};

use super::common::covered_case;

const ARRAY_ANALYSIS: &str = r#"
[[methods]]
signature = "equals(byte[], int, byte[], int, int)"

[[methods.equivalence_conditions]]
name = "src"
valid = [{ id = 1, description = "non-null" }]
invalid = [{ id = 2, description = "null" }]

[[methods.equivalence_conditions]]
name = "length"
valid = [{ id = 3, description = ">= 0" }]
invalid = [{ id = 4, description = "< 0" }]

[[methods.boundaries]]
id = 1
description = "length = 0"
"#;

#[test]
fn test_analysis_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("array.toml");
    std::fs::write(&path, ARRAY_ANALYSIS).unwrap();

    let analysis = UnitAnalysis::from_toml_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let expectations = analysis.expectations().unwrap();
    assert_eq!(expectations.len(), 1);
    assert_eq!(expectations[0].valid_ecs(), &[1, 3]);
    assert_eq!(expectations[0].invalid_ecs(), &[2, 4]);
}

#[test]
fn test_analysis_json_round_trips_through_toml_model() {
    let from_toml = UnitAnalysis::from_toml_str(ARRAY_ANALYSIS).unwrap();
    let json = serde_json::to_string(&from_toml).unwrap();
    assert_eq!(UnitAnalysis::from_json_str(&json).unwrap(), from_toml);
}

#[test]
fn test_report_json_lists_residuals() {
    let unit = TestUnit::new("array")
        .analysis(UnitAnalysis::from_toml_str(ARRAY_ANALYSIS).unwrap())
        .case(covered_case(
            "null_src",
            Cover::new("equals(byte[], int, byte[], int, int)")
                .invalid_ecs([2])
                .valid_ecs([3])
                .conditions(["src = null"]),
        ));

    let verdict = UnitRunner::with_coverage_checker().run(&unit);
    let failure = verdict.unit_failure().unwrap();
    assert_eq!(failure.code(), ErrorCode::CoverageIncomplete);

    let json: serde_json::Value =
        serde_json::from_str(&failure.report().unwrap().to_json().unwrap()).unwrap();
    let entry = &json["entries"][0];
    assert_eq!(entry["signature"], "equals(byte[], int, byte[], int, int)");
    assert_eq!(entry["valid_ecs"], serde_json::json!([1]));
    assert_eq!(entry["invalid_ecs"], serde_json::json!([4]));
    assert_eq!(entry["boundaries"], serde_json::json!([1]));
}

#[test]
fn test_malformed_metadata_is_reported() {
    let err = UnitAnalysis::from_json_str("{\"methods\": 7}").unwrap_err();
    assert!(matches!(err, AuditError::Metadata { format: "json", .. }));
    assert_eq!(err.code(), ErrorCode::MetadataMalformed);
    assert!(err.entry().format_full().contains("EQCOV-E002"));
}

#[test]
fn test_checker_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eqcov.toml");
    std::fs::write(&path, "enabled = false\n").unwrap();

    let config = CheckerConfig::from_toml_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(!config.enabled);
}

#[test]
fn test_exported_schemas_describe_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let result = export_schemas(dir.path()).unwrap();
    assert_eq!(result.files_generated, 3);

    let analysis = serde_json::to_value(unit_analysis_schema()).unwrap();
    assert_eq!(analysis["title"], "UnitAnalysis");
    let cover = serde_json::to_value(cover_schema()).unwrap();
    assert!(cover["required"]
        .as_array()
        .unwrap()
        .iter()
        .any(|field| field == "signature"));
}
