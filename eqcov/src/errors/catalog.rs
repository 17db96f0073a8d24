//! Error Catalog for eqcov
//!
//! Each error code carries:
//! - A unique code (EQCOV-E001 through EQCOV-E299)
//! - A human-readable message
//! - Remediation steps
//!
//! # Example
//!
//! ```rust
//! use eqcov::errors::catalog::ErrorCode;
//!
//! let entry = ErrorCode::CoverageIncomplete.entry();
//! println!("Error {}: {}", entry.code, entry.message);
//! for step in entry.remediation {
//!     println!("  - {}", step);
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code enumeration covering every eqcov failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    // =========================================================================
    // Config Errors (E001-E099)
    // =========================================================================
    /// Expectation metadata required but absent
    MetadataMissing,
    /// Expectation or coverage metadata could not be decoded
    MetadataMalformed,
    /// Environment variable has invalid value
    ConfigEnvError,
    /// Checker configuration file contains invalid TOML
    ConfigParseError,

    // =========================================================================
    // Contract Errors (E100-E199)
    // =========================================================================
    /// Lookup or diff invoked with an unset method signature
    SignatureUnset,

    // =========================================================================
    // Coverage Errors (E200-E299)
    // =========================================================================
    /// Declared coverage leaves expected classes or boundaries uncovered
    CoverageIncomplete,
}

impl ErrorCode {
    /// Returns the numeric error code (without prefix).
    #[must_use]
    pub const fn code_number(&self) -> u16 {
        match self {
            Self::MetadataMissing => 1,
            Self::MetadataMalformed => 2,
            Self::ConfigEnvError => 3,
            Self::ConfigParseError => 4,
            Self::SignatureUnset => 100,
            Self::CoverageIncomplete => 200,
        }
    }

    /// Returns the formatted error code string (e.g., "EQCOV-E001").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("EQCOV-E{:03}", self.code_number())
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self.code_number() {
            1..=99 => ErrorCategory::Config,
            100..=199 => ErrorCategory::Contract,
            _ => ErrorCategory::Coverage,
        }
    }

    /// Returns the error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::MetadataMissing => "Expectation metadata is required but not present on the unit",
            Self::MetadataMalformed => "Expectation or coverage metadata could not be decoded",
            Self::ConfigEnvError => "Environment variable has invalid value",
            Self::ConfigParseError => "Checker configuration contains invalid TOML",
            Self::SignatureUnset => "Method signature is empty where a lookup key is required",
            Self::CoverageIncomplete => {
                "Test cases do not cover every expected equivalence class and boundary"
            }
        }
    }

    /// Returns remediation steps.
    #[must_use]
    pub const fn remediation(&self) -> &'static [&'static str] {
        match self {
            Self::MetadataMissing => &[
                "Attach a UnitAnalysis to the unit with TestUnit::analysis",
                "Or set EQCOV_REQUIRE_METADATA=0 to let units without metadata pass",
            ],
            Self::MetadataMalformed => &[
                "Check the metadata table against schema::unit_analysis_schema()",
                "Every method entry needs a non-empty signature",
                "Class and boundary ids must be 32-bit signed integers",
            ],
            Self::ConfigEnvError => &[
                "Check EQCOV_ENABLED and EQCOV_REQUIRE_METADATA",
                "Boolean variables accept 1/0, true/false, yes/no, on/off",
            ],
            Self::ConfigParseError => &[
                "Validate the configuration with a TOML linter",
                "Only `enabled` and `require_metadata` keys are recognized",
            ],
            Self::SignatureUnset => &[
                "Give every MethodAnalysis a non-empty signature",
                "Pass the signature of the method being looked up",
            ],
            Self::CoverageIncomplete => &[
                "Add test cases covering the ids listed in the failure message",
                "Declare the covered ids on existing cases with Cover",
                "Remove ids from the analysis if they no longer describe the method",
            ],
        }
    }

    /// Returns the full error entry with all metadata.
    #[must_use]
    pub fn entry(&self) -> ErrorEntry {
        ErrorEntry {
            code: self.code_string(),
            category: self.category(),
            message: self.message().to_string(),
            remediation: self
                .remediation()
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Returns all error codes.
    #[must_use]
    pub fn all() -> &'static [ErrorCode] {
        &[
            Self::MetadataMissing,
            Self::MetadataMalformed,
            Self::ConfigEnvError,
            Self::ConfigParseError,
            Self::SignatureUnset,
            Self::CoverageIncomplete,
        ]
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code_string(), self.message())
    }
}

/// Error category for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// Metadata and configuration errors (E001-E099)
    Config,
    /// Caller contract violations (E100-E199)
    Contract,
    /// Incomplete coverage (E200-E299)
    Coverage,
}

impl ErrorCategory {
    /// Returns a human-readable name for the category.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Config => "Configuration",
            Self::Contract => "Contract",
            Self::Coverage => "Coverage",
        }
    }

    /// Returns a short description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Config => "Expectation metadata or checker configuration is missing or invalid",
            Self::Contract => "An operation was called with arguments that break its contract",
            Self::Coverage => "Declared coverage does not satisfy the expected model",
        }
    }

    /// Inclusive code range owned by the category.
    #[must_use]
    pub const fn code_range(&self) -> &'static str {
        match self {
            Self::Config => "001-099",
            Self::Contract => "100-199",
            Self::Coverage => "200-299",
        }
    }

    /// Returns all categories in code order.
    #[must_use]
    pub fn all() -> &'static [ErrorCategory] {
        &[Self::Config, Self::Contract, Self::Coverage]
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Complete error entry with all metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Error code string (e.g., "EQCOV-E001")
    pub code: String,
    /// Error category
    pub category: ErrorCategory,
    /// Human-readable error message
    pub message: String,
    /// Steps to remediate the error
    pub remediation: Vec<String>,
}

impl ErrorEntry {
    /// Formats the error for display with full remediation steps.
    #[must_use]
    pub fn format_full(&self) -> String {
        let mut output = format!("[{}] {}\n", self.code, self.message);

        if !self.remediation.is_empty() {
            output.push_str("\nRemediation steps:\n");
            for (i, step) in self.remediation.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, step));
            }
        }

        output
    }

    /// Formats the error as a single line.
    #[must_use]
    pub fn format_brief(&self) -> String {
        format!("[{}] {}", self.code, self.message)
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_brief())
    }
}
