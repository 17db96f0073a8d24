//! JSON Schema generation for coverage metadata.
//!
//! Lets metadata authors validate analysis tables and coverage claims before a
//! suite runs, and exposes the error catalog in machine-readable form.
//!
//! # Generated Files
//!
//! - `unit-analysis.schema.json` - expected coverage model of a unit
//! - `cover.schema.json` - coverage claim of a single test case
//! - `error-codes.json` - error code catalog

use schemars::schema::RootSchema;
use schemars::schema_for;
use serde::{Deserialize, Serialize};

use crate::errors::catalog::{ErrorCategory, ErrorCode};
use crate::metadata::{Cover, UnitAnalysis};

/// JSON Schema for [`UnitAnalysis`] tables.
#[must_use]
pub fn unit_analysis_schema() -> RootSchema {
    schema_for!(UnitAnalysis)
}

/// JSON Schema for [`Cover`] declarations.
#[must_use]
pub fn cover_schema() -> RootSchema {
    schema_for!(Cover)
}

/// Machine-readable error code entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorCodeEntry {
    /// Error code in EQCOV-Exxx format.
    pub code: String,
    pub number: u16,
    pub category: ErrorCategory,
    pub message: String,
    pub remediation: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorCategoryEntry {
    pub category: ErrorCategory,
    pub name: String,
    pub description: String,
    /// Code range (e.g., "001-099").
    pub code_range: String,
}

/// Complete error catalog for machine consumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorCatalog {
    pub schema_version: String,
    pub categories: Vec<ErrorCategoryEntry>,
    pub errors: Vec<ErrorCodeEntry>,
}

#[must_use]
pub fn generate_error_catalog() -> ErrorCatalog {
    let categories = ErrorCategory::all()
        .iter()
        .map(|category| ErrorCategoryEntry {
            category: *category,
            name: category.name().to_string(),
            description: category.description().to_string(),
            code_range: category.code_range().to_string(),
        })
        .collect();

    let errors = ErrorCode::all()
        .iter()
        .map(|code| ErrorCodeEntry {
            code: code.code_string(),
            number: code.code_number(),
            category: code.category(),
            message: code.message().to_string(),
            remediation: code
                .remediation()
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        })
        .collect();

    ErrorCatalog {
        schema_version: "1.0".to_string(),
        categories,
        errors,
    }
}

/// Summary of an [`export_schemas`] run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaExportResult {
    pub files_generated: usize,
    pub files: Vec<String>,
    pub output_dir: String,
}

/// Write every schema and the error catalog into `output_dir`.
///
/// # Errors
///
/// Returns error if directory creation or file writing fails.
pub fn export_schemas(output_dir: &std::path::Path) -> std::io::Result<SchemaExportResult> {
    use std::fs;

    fs::create_dir_all(output_dir)?;

    let documents = [
        (
            "unit-analysis.schema.json",
            serde_json::to_string_pretty(&unit_analysis_schema())?,
        ),
        (
            "cover.schema.json",
            serde_json::to_string_pretty(&cover_schema())?,
        ),
        (
            "error-codes.json",
            serde_json::to_string_pretty(&generate_error_catalog())?,
        ),
    ];

    let mut files = Vec::with_capacity(documents.len());
    for (name, content) in documents {
        let path = output_dir.join(name);
        fs::write(&path, content)?;
        files.push(path.display().to_string());
    }

    tracing::debug!(dir = %output_dir.display(), count = files.len(), "exported schemas");
    Ok(SchemaExportResult {
        files_generated: files.len(),
        files,
        output_dir: output_dir.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_analysis_schema_fields() {
        let json = serde_json::to_string(&unit_analysis_schema()).unwrap();
        assert!(json.contains("methods"));
        assert!(json.contains("equivalence_conditions"));
        assert!(json.contains("boundaries"));
        assert!(json.contains("signature"));
    }

    #[test]
    fn test_cover_schema_fields() {
        let json = serde_json::to_string(&cover_schema()).unwrap();
        assert!(json.contains("valid_ecs"));
        assert!(json.contains("invalid_ecs"));
        assert!(json.contains("conditions"));
    }

    #[test]
    fn test_generate_error_catalog() {
        let catalog = generate_error_catalog();
        assert_eq!(catalog.schema_version, "1.0");
        assert_eq!(catalog.categories.len(), 3);
        assert_eq!(catalog.errors.len(), ErrorCode::all().len());

        let first = &catalog.errors[0];
        assert_eq!(first.code, "EQCOV-E001");
        assert_eq!(first.category, ErrorCategory::Config);
        assert!(!first.remediation.is_empty());

        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.contains("\"coverage\""));
        assert!(json.contains("EQCOV-E200"));
    }

    #[test]
    fn test_export_schemas_to_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = export_schemas(dir.path()).unwrap();

        assert_eq!(result.files_generated, 3);
        for file in &result.files {
            let content = std::fs::read_to_string(file).unwrap();
            let _: serde_json::Value = serde_json::from_str(&content).unwrap();
        }
    }
}
