//! Post-run coverage check for one unit under test.
//!
//! The checker never interferes with individual test cases. Once the host
//! reports that every case of a unit has finished, it collects the coverage
//! declarations of runnable, non-skipped cases, merges them, and diffs them
//! against the unit's expectation metadata.
//!
//! Lifecycle per unit: `Idle -> Executing` when the host starts the unit
//! ([`CoverageChecker::start_unit`]), `Executing -> Reconciling -> Done` when
//! it finishes ([`CoverageChecker::finish_unit`]).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::aggregate::combine;
use crate::config::CheckerConfig;
use crate::errors::{AuditError, Result};
use crate::metadata::{Cover, UnitAnalysis};
use crate::model::{CoverageDeclaration, MethodSignature};
use crate::reconcile::diff;

/// One executed test case as reported by the host.
#[derive(Debug, Clone, Copy)]
pub struct CaseRecord<'a> {
    pub name: &'a str,
    /// Recognized by the host as a test case (as opposed to a helper).
    pub runnable: bool,
    /// Marked skipped or disabled; its declaration is ignored.
    pub skipped: bool,
    pub cover: Option<&'a Cover>,
}

/// What the checker needs from a host once a unit has finished.
pub trait ExecutedUnit {
    fn unit_name(&self) -> &str;

    /// Expectation metadata; `None` when the unit did not opt in.
    fn analysis(&self) -> Option<&UnitAnalysis>;

    fn cases(&self) -> Vec<CaseRecord<'_>>;
}

/// Where a unit's check currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckPhase {
    Idle,
    Executing,
    Reconciling,
    Done,
}

impl std::fmt::Display for CheckPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Executing => write!(f, "executing"),
            Self::Reconciling => write!(f, "reconciling"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Why a passing check passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    /// Checking is turned off by configuration.
    Disabled,
    /// The unit carries no expectation metadata.
    NoMetadata,
    /// Every expected class and boundary is covered.
    Covered,
}

/// Result of a passing check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    pub unit: String,
    pub outcome: CheckOutcome,
    pub expected_methods: usize,
    /// Declarations that took part in the diff.
    pub declarations: usize,
    /// Declarations on skipped or non-runnable cases.
    pub ignored_declarations: usize,
    /// Signatures declared by test cases but absent from the expectations.
    pub orphaned_signatures: Vec<MethodSignature>,
}

impl CheckSummary {
    fn passed_without_diff(unit: &str, outcome: CheckOutcome) -> Self {
        Self {
            unit: unit.to_string(),
            outcome,
            expected_methods: 0,
            declarations: 0,
            ignored_declarations: 0,
            orphaned_signatures: Vec::new(),
        }
    }
}

/// Lifecycle adapter that turns declared coverage into a unit verdict.
///
/// Units started through the lifecycle hooks are tracked until they finish,
/// so [`phase_of`](Self::phase_of) reports `Executing` while their cases run.
#[derive(Debug, Default)]
pub struct CoverageChecker {
    config: CheckerConfig,
    in_flight: Mutex<HashMap<String, UnitCheck>>,
}

impl Clone for CoverageChecker {
    fn clone(&self) -> Self {
        Self::new(self.config.clone())
    }
}

impl CoverageChecker {
    pub fn new(config: CheckerConfig) -> Self {
        Self {
            config,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Checker configured from `EQCOV_*` variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(CheckerConfig::from_env()?))
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Start tracking a unit whose cases are about to execute.
    pub fn begin(&self, unit: &str) -> UnitCheck {
        let mut check = UnitCheck {
            config: self.config.clone(),
            unit: unit.to_string(),
            phase: CheckPhase::Idle,
        };
        check.transition(CheckPhase::Executing);
        check
    }

    /// Check a unit whose cases have all finished.
    pub fn check(&self, unit: &dyn ExecutedUnit) -> Result<CheckSummary> {
        self.begin(unit.unit_name()).finish(unit)
    }

    /// Like [`check`](Self::check), but a unit without metadata is a
    /// configuration error regardless of the configured mode.
    pub fn check_required(&self, unit: &dyn ExecutedUnit) -> Result<CheckSummary> {
        let mut check = self.begin(unit.unit_name());
        check.config.require_metadata = true;
        check.finish(unit)
    }

    /// Phase of a unit tracked between [`start_unit`](Self::start_unit) and
    /// [`finish_unit`](Self::finish_unit); `Idle` when none is in flight.
    pub fn phase_of(&self, unit: &str) -> CheckPhase {
        self.tracked()
            .get(unit)
            .map_or(CheckPhase::Idle, UnitCheck::phase)
    }

    /// Begin a unit and keep its check until [`finish_unit`](Self::finish_unit).
    pub fn start_unit(&self, unit: &str) {
        let check = self.begin(unit);
        if let Some(previous) = self.tracked().insert(unit.to_string(), check) {
            tracing::warn!(unit, phase = %previous.phase(), "unit restarted before it finished");
        }
    }

    /// Finish the check opened by [`start_unit`](Self::start_unit). A unit
    /// that was never started is checked from `Idle` in one step.
    pub fn finish_unit(&self, executed: &dyn ExecutedUnit) -> Result<CheckSummary> {
        let name = executed.unit_name();
        let started = self.tracked().remove(name);
        let check = started.unwrap_or_else(|| {
            tracing::debug!(unit = name, "finishing a unit that was not started");
            self.begin(name)
        });
        check.finish(executed)
    }

    fn tracked(&self) -> MutexGuard<'_, HashMap<String, UnitCheck>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Verification pass for one unit.
#[derive(Debug)]
pub struct UnitCheck {
    config: CheckerConfig,
    unit: String,
    phase: CheckPhase,
}

impl UnitCheck {
    pub fn phase(&self) -> CheckPhase {
        self.phase
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    fn transition(&mut self, next: CheckPhase) {
        tracing::debug!(unit = %self.unit, from = %self.phase, to = %next, "unit check phase");
        self.phase = next;
    }

    /// Reconcile the unit's declarations against its expectations.
    ///
    /// Fails with [`AuditError::UncoveredCases`] when anything is left uncovered,
    /// and with [`AuditError::Configuration`] when metadata is required but absent.
    pub fn finish(mut self, executed: &dyn ExecutedUnit) -> Result<CheckSummary> {
        self.transition(CheckPhase::Reconciling);
        let result = self.reconcile(executed);
        self.transition(CheckPhase::Done);

        match &result {
            Ok(summary) => tracing::info!(
                unit = %self.unit,
                outcome = ?summary.outcome,
                methods = summary.expected_methods,
                declarations = summary.declarations,
                "coverage check passed"
            ),
            Err(err) => tracing::warn!(
                unit = %self.unit,
                code = %err.code().code_string(),
                "coverage check failed"
            ),
        }
        result
    }

    fn reconcile(&self, executed: &dyn ExecutedUnit) -> Result<CheckSummary> {
        if !self.config.enabled {
            return Ok(CheckSummary::passed_without_diff(
                &self.unit,
                CheckOutcome::Disabled,
            ));
        }

        let Some(analysis) = executed.analysis() else {
            if self.config.require_metadata {
                return Err(AuditError::Configuration {
                    unit: self.unit.clone(),
                });
            }
            return Ok(CheckSummary::passed_without_diff(
                &self.unit,
                CheckOutcome::NoMetadata,
            ));
        };

        let expected = analysis.expectations()?;

        let mut declarations = Vec::new();
        let mut ignored_declarations = 0;
        for case in executed.cases() {
            let Some(cover) = case.cover else {
                continue;
            };
            if !case.runnable || case.skipped {
                tracing::debug!(unit = %self.unit, case = case.name, "ignoring declaration of skipped case");
                ignored_declarations += 1;
                continue;
            }
            if !cover.conditions.is_empty() {
                tracing::trace!(case = case.name, conditions = ?cover.conditions, "declared conditions");
            }
            declarations.push(CoverageDeclaration::from_cover(case.name, cover));
        }

        let merged = combine(&declarations);
        let orphaned_signatures: Vec<MethodSignature> = merged
            .iter()
            .map(|descriptor| descriptor.signature())
            .filter(|signature| !expected.iter().any(|e| e.signature() == *signature))
            .cloned()
            .collect();
        for signature in &orphaned_signatures {
            tracing::warn!(
                unit = %self.unit,
                signature = %signature,
                "coverage declared for a method without expectations"
            );
        }

        diff(&expected, &merged)?;

        Ok(CheckSummary {
            unit: self.unit.clone(),
            outcome: CheckOutcome::Covered,
            expected_methods: expected.len(),
            declarations: declarations.len(),
            ignored_declarations,
            orphaned_signatures,
        })
    }
}
