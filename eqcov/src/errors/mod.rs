//! Error types and the error catalog for eqcov.
//!
//! Every failure surfaced by the checker is an [`AuditError`]. Each variant maps
//! onto a catalog entry with a stable code and remediation steps.
//!
//! # Error Code Ranges
//!
//! | Range      | Category  | Description                                |
//! |------------|-----------|--------------------------------------------|
//! | E001-E099  | Config    | Metadata and checker configuration errors  |
//! | E100-E199  | Contract  | Caller contract violations                 |
//! | E200-E299  | Coverage  | Declared coverage does not meet the model  |

pub mod catalog;

pub use catalog::{ErrorCategory, ErrorCode, ErrorEntry};

use crate::config::EnvError;
use crate::report::ResidualReport;
use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T, E = AuditError> = std::result::Result<T, E>;

/// Errors produced while building descriptors or checking a unit.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Expectation metadata is absent where the caller requires it.
    #[error("expectation metadata is not present on unit {unit}")]
    Configuration { unit: String },

    /// A lookup or diff was invoked with an unset method signature.
    #[error("invalid argument to {operation}: {reason}")]
    InvalidArgument {
        operation: &'static str,
        reason: String,
    },

    /// At least one expected class or boundary is not covered by any test case.
    #[error("{message}")]
    UncoveredCases {
        message: String,
        report: ResidualReport,
    },

    /// Expectation or coverage metadata could not be decoded.
    #[error("malformed {format} metadata: {reason}")]
    Metadata {
        format: &'static str,
        reason: String,
    },

    /// A checker configuration file could not be decoded.
    #[error("invalid checker configuration: {reason}")]
    ConfigParse { reason: String },

    /// One or more `EQCOV_*` environment variables hold invalid values.
    #[error("invalid environment configuration: {}", join_env_errors(.errors))]
    Env { errors: Vec<EnvError> },
}

impl AuditError {
    pub(crate) fn unset_signature(operation: &'static str) -> Self {
        Self::InvalidArgument {
            operation,
            reason: "method signature should not be empty".to_string(),
        }
    }

    /// Catalog code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Configuration { .. } => ErrorCode::MetadataMissing,
            Self::Metadata { .. } => ErrorCode::MetadataMalformed,
            Self::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Self::Env { .. } => ErrorCode::ConfigEnvError,
            Self::InvalidArgument { .. } => ErrorCode::SignatureUnset,
            Self::UncoveredCases { .. } => ErrorCode::CoverageIncomplete,
        }
    }

    /// Catalog entry for this error.
    pub fn entry(&self) -> ErrorEntry {
        self.code().entry()
    }

    /// True for the designed terminal failure, false for contract or setup faults.
    pub fn is_uncovered(&self) -> bool {
        matches!(self, Self::UncoveredCases { .. })
    }

    /// The residual report carried by an [`AuditError::UncoveredCases`].
    pub fn report(&self) -> Option<&ResidualReport> {
        match self {
            Self::UncoveredCases { report, .. } => Some(report),
            _ => None,
        }
    }
}

fn join_env_errors(errors: &[EnvError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
