//! Declarative equivalence-class and boundary coverage auditing.
//!
//! A unit under test carries an expected coverage model ([`UnitAnalysis`]): for
//! each method, the valid equivalence classes, invalid equivalence classes and
//! boundaries a complete suite must exercise. Each test case may carry a
//! [`Cover`] declaring which of those ids it exercises. Once every case of the
//! unit has run, the [`CoverageChecker`] merges the declarations, diffs them
//! against the expectations and fails the unit if anything is left uncovered.
//!
//! ```ignore
//! use eqcov::{
//!     Cover, EquivalenceCondition, MethodAnalysis, TestCase, TestUnit, UnitAnalysis, UnitRunner,
//! };
//!
//! let analysis = UnitAnalysis::new().method(
//!     MethodAnalysis::new("f(int)")
//!         .condition(EquivalenceCondition::new("x").valid(1, "x > 0").valid(2, "x < 0"))
//!         .boundary(1, "x = 0"),
//! );
//! let unit = TestUnit::new("f_tests")
//!     .analysis(analysis)
//!     .case(TestCase::new("positive", || Ok(())).cover(Cover::new("f(int)").valid_ecs([1, 2])))
//!     .case(TestCase::new("zero", || Ok(())).cover(Cover::new("f(int)").boundaries([1])));
//!
//! let verdict = UnitRunner::with_coverage_checker().run(&unit);
//! assert!(verdict.is_success());
//! ```

pub mod aggregate;
pub mod checker;
pub mod config;
pub mod errors;
pub mod host;
pub mod metadata;
pub mod model;
pub mod reconcile;
pub mod report;
pub mod schema;
pub mod testing;

pub use aggregate::{combine, select};
pub use checker::{
    CaseRecord, CheckOutcome, CheckPhase, CheckSummary, CoverageChecker, ExecutedUnit, UnitCheck,
};
pub use config::{CheckerConfig, EnvError, EnvParser};
pub use errors::{AuditError, ErrorCategory, ErrorCode, ErrorEntry, Result};
pub use host::{CaseOutcome, CaseStatus, TestCase, TestUnit, UnitLifecycle, UnitRunner, UnitVerdict};
pub use metadata::{Boundary, Condition, Cover, EquivalenceCondition, MethodAnalysis, UnitAnalysis};
pub use model::{
    ClassId, CoverageDeclaration, ExpectationDescriptor, MergedCoverageDescriptor,
    MethodSignature, UnitDescriptor,
};
pub use reconcile::{diff, residuals};
pub use report::{ResidualReport, UncoveredEntry, format_report};
