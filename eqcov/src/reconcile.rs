//! Diffing expected coverage against merged declarations.
//!
//! Removal policy: a covered id removes every occurrence of that id from the
//! expected list (set difference by value). Ids that stay uncovered keep their
//! original order and multiplicity.

use crate::aggregate::select;
use crate::errors::{AuditError, Result};
use crate::model::{ClassId, ExpectationDescriptor, MergedCoverageDescriptor};
use crate::report::{ResidualReport, UncoveredEntry, format_report};

/// Compute the residual report without failing on uncovered ids.
pub fn residuals(
    expected: &[ExpectationDescriptor],
    covered: &[MergedCoverageDescriptor],
) -> Result<ResidualReport> {
    let mut report = ResidualReport::new();

    for expectation in expected {
        let signature = expectation.signature();
        if signature.is_unset() {
            return Err(AuditError::unset_signature("diff"));
        }

        let entry = match select(covered, signature)? {
            Some(coverage) => UncoveredEntry {
                signature: signature.clone(),
                valid_ecs: remove_covered(expectation.valid_ecs(), coverage.valid_ecs()),
                invalid_ecs: remove_covered(expectation.invalid_ecs(), coverage.invalid_ecs()),
                boundaries: remove_covered(expectation.boundaries(), coverage.boundaries()),
            },
            None => {
                tracing::debug!(signature = %signature, "no coverage declared for method");
                UncoveredEntry {
                    signature: signature.clone(),
                    valid_ecs: expectation.valid_ecs().to_vec(),
                    invalid_ecs: expectation.invalid_ecs().to_vec(),
                    boundaries: expectation.boundaries().to_vec(),
                }
            }
        };

        report.push(entry);
    }

    Ok(report)
}

/// Diff expectations against coverage, failing when anything is uncovered.
///
/// On success the returned report is empty.
pub fn diff(
    expected: &[ExpectationDescriptor],
    covered: &[MergedCoverageDescriptor],
) -> Result<ResidualReport> {
    let report = residuals(expected, covered)?;
    if report.is_empty() {
        return Ok(report);
    }

    for entry in report.entries() {
        tracing::warn!(
            signature = %entry.signature,
            valid = ?entry.valid_ecs,
            invalid = ?entry.invalid_ecs,
            boundaries = ?entry.boundaries,
            "uncovered cases"
        );
    }

    Err(AuditError::UncoveredCases {
        message: format_report(&report),
        report,
    })
}

fn remove_covered(expected: &[ClassId], covered: &[ClassId]) -> Vec<ClassId> {
    expected
        .iter()
        .copied()
        .filter(|id| !covered.contains(id))
        .collect()
}
