//! Minimal test host.
//!
//! Provides the unit lifecycle the coverage checker plugs into:
//! - [`TestUnit`]: a named group of cases with optional expectation metadata
//! - [`UnitRunner`]: executes every case, then notifies lifecycle hooks
//! - [`UnitVerdict`]: per-case outcomes plus any unit-level failure
//!
//! A failing case never stops the remaining cases, and a hook failure never
//! changes the outcome of an individual case.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::checker::{CaseRecord, CoverageChecker, ExecutedUnit};
use crate::errors::{AuditError, Result};
use crate::metadata::{Cover, UnitAnalysis};

type CaseBody = Box<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// A single test case.
pub struct TestCase {
    name: String,
    body: CaseBody,
    cover: Option<Cover>,
    runnable: bool,
    skipped: bool,
}

impl TestCase {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Box::new(body),
            cover: None,
            runnable: true,
            skipped: false,
        }
    }

    /// A member of the unit that is not itself a test case. It never runs and
    /// its coverage declaration is ignored.
    pub fn helper(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: Box::new(|| Ok(())),
            cover: None,
            runnable: false,
            skipped: false,
        }
    }

    #[must_use]
    pub fn cover(mut self, cover: Cover) -> Self {
        self.cover = Some(cover);
        self
    }

    /// Mark the case disabled. It is reported as skipped and its coverage
    /// declaration is ignored.
    #[must_use]
    pub fn skip(mut self) -> Self {
        self.skipped = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_cover(&self) -> Option<&Cover> {
        self.cover.as_ref()
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    fn execute(&self) -> CaseStatus {
        match catch_unwind(AssertUnwindSafe(|| (self.body)())) {
            Ok(Ok(())) => CaseStatus::Passed,
            Ok(Err(err)) => CaseStatus::Failed(format!("{err:#}")),
            Err(payload) => CaseStatus::Failed(panic_message(payload.as_ref())),
        }
    }
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("cover", &self.cover)
            .field("runnable", &self.runnable)
            .field("skipped", &self.skipped)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}

/// A unit under test: a named group of cases sharing expectation metadata.
#[derive(Debug)]
pub struct TestUnit {
    name: String,
    analysis: Option<UnitAnalysis>,
    cases: Vec<TestCase>,
}

impl TestUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            analysis: None,
            cases: Vec::new(),
        }
    }

    #[must_use]
    pub fn analysis(mut self, analysis: UnitAnalysis) -> Self {
        self.analysis = Some(analysis);
        self
    }

    #[must_use]
    pub fn case(mut self, case: TestCase) -> Self {
        self.cases.push(case);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn test_cases(&self) -> &[TestCase] {
        &self.cases
    }
}

impl ExecutedUnit for TestUnit {
    fn unit_name(&self) -> &str {
        &self.name
    }

    fn analysis(&self) -> Option<&UnitAnalysis> {
        self.analysis.as_ref()
    }

    fn cases(&self) -> Vec<CaseRecord<'_>> {
        self.cases
            .iter()
            .map(|case| CaseRecord {
                name: &case.name,
                runnable: case.runnable,
                skipped: case.skipped,
                cover: case.cover.as_ref(),
            })
            .collect()
    }
}

/// Hooks invoked by [`UnitRunner`] around each unit.
pub trait UnitLifecycle: Send + Sync {
    /// Called before the first case of a unit runs.
    fn unit_started(&self, _unit: &str) {}

    /// Called once after every case of the unit has finished. An error fails
    /// the unit as a whole.
    fn unit_finished(&self, unit: &dyn ExecutedUnit) -> Result<()>;
}

impl UnitLifecycle for CoverageChecker {
    fn unit_started(&self, unit: &str) {
        tracing::debug!(unit, enabled = self.config().enabled, "coverage tracking started");
        self.start_unit(unit);
    }

    fn unit_finished(&self, unit: &dyn ExecutedUnit) -> Result<()> {
        self.finish_unit(unit).map(|_| ())
    }
}

impl<T: UnitLifecycle + ?Sized> UnitLifecycle for Arc<T> {
    fn unit_started(&self, unit: &str) {
        (**self).unit_started(unit);
    }

    fn unit_finished(&self, unit: &dyn ExecutedUnit) -> Result<()> {
        (**self).unit_finished(unit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum CaseStatus {
    Passed,
    Failed(String),
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseOutcome {
    pub name: String,
    #[serde(flatten)]
    pub status: CaseStatus,
    pub duration: Duration,
}

/// Result of running one unit.
#[derive(Debug)]
pub struct UnitVerdict {
    pub unit: String,
    pub cases: Vec<CaseOutcome>,
    /// Failures raised by lifecycle hooks after the cases finished.
    pub unit_failures: Vec<AuditError>,
}

impl UnitVerdict {
    /// True when no case failed and no hook failed the unit.
    pub fn is_success(&self) -> bool {
        self.unit_failures.is_empty() && self.failed_cases().next().is_none()
    }

    pub fn failed_cases(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.cases
            .iter()
            .filter(|outcome| matches!(outcome.status, CaseStatus::Failed(_)))
    }

    pub fn passed_count(&self) -> usize {
        self.cases
            .iter()
            .filter(|outcome| outcome.status == CaseStatus::Passed)
            .count()
    }

    /// First unit-level failure, if any.
    pub fn unit_failure(&self) -> Option<&AuditError> {
        self.unit_failures.first()
    }

    pub fn outcome(&self, case: &str) -> Option<&CaseOutcome> {
        self.cases.iter().find(|outcome| outcome.name == case)
    }
}

/// Sequential unit runner.
#[derive(Default)]
pub struct UnitRunner {
    hooks: Vec<Box<dyn UnitLifecycle>>,
}

impl UnitRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner with a [`CoverageChecker`] using the default configuration.
    pub fn with_coverage_checker() -> Self {
        Self::new().with_hook(CoverageChecker::default())
    }

    #[must_use]
    pub fn with_hook(mut self, hook: impl UnitLifecycle + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Run every case of `unit`, then hand the finished unit to each hook.
    pub fn run(&self, unit: &TestUnit) -> UnitVerdict {
        let span = tracing::info_span!("unit", unit = %unit.name);
        let _enter = span.enter();

        for hook in &self.hooks {
            hook.unit_started(&unit.name);
        }

        let mut cases = Vec::with_capacity(unit.cases.len());
        for case in unit.cases.iter().filter(|case| case.runnable) {
            if case.skipped {
                tracing::debug!(case = %case.name, "case skipped");
                cases.push(CaseOutcome {
                    name: case.name.clone(),
                    status: CaseStatus::Skipped,
                    duration: Duration::ZERO,
                });
                continue;
            }

            let start = Instant::now();
            let status = case.execute();
            let duration = start.elapsed();
            match &status {
                CaseStatus::Failed(reason) => {
                    tracing::warn!(case = %case.name, %reason, "case failed");
                }
                _ => tracing::debug!(case = %case.name, ?duration, "case passed"),
            }
            cases.push(CaseOutcome {
                name: case.name.clone(),
                status,
                duration,
            });
        }

        let unit_failures: Vec<AuditError> = self
            .hooks
            .iter()
            .filter_map(|hook| hook.unit_finished(unit).err())
            .collect();

        let verdict = UnitVerdict {
            unit: unit.name.clone(),
            cases,
            unit_failures,
        };
        tracing::info!(
            passed = verdict.passed_count(),
            failed = verdict.failed_cases().count(),
            unit_failures = verdict.unit_failures.len(),
            "unit finished"
        );
        verdict
    }
}
