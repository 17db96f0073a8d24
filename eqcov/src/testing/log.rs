//! Structured JSONL logging for suites that run under the coverage checker.
//!
//! Call [`init_global_test_logging`] once per test binary to route every
//! tracing event (including the checker's own) to
//! `target/test-logs/all_tests.jsonl` and to the test writer:
//!
//! ```ignore
//! #[ctor::ctor]
//! fn setup() {
//!     eqcov::testing::init_global_test_logging();
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `EQCOV_TEST_LOGGING`: `1` enables per-test JSONL files (default: only in CI)
//! - `EQCOV_TEST_LOG_LEVEL`: filter level for the `eqcov` target (default: `info`)
//! - `EQCOV_TEST_LOG_FILE`: aggregated log path override

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, Once};
use std::time::Instant;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;

use crate::config::EnvParser;
use crate::host::UnitVerdict;

/// Test execution phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestPhase {
    Setup,
    Execute,
    /// Post-run coverage reconciliation.
    Reconcile,
    Verify,
}

impl std::fmt::Display for TestPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Setup => write!(f, "setup"),
            Self::Execute => write!(f, "execute"),
            Self::Reconcile => write!(f, "reconcile"),
            Self::Verify => write!(f, "verify"),
        }
    }
}

static GLOBAL_LOGGING_INIT: Once = Once::new();

/// Initialize global JSONL logging for all tests.
///
/// Safe to call multiple times; initialization only happens once.
pub fn init_global_test_logging() {
    GLOBAL_LOGGING_INIT.call_once(|| {
        let mut parser = EnvParser::new();
        let level = parser.get_log_level("TEST_LOG_LEVEL", "info").value;
        let custom_path = parser.get_optional_string("TEST_LOG_FILE").value;
        for error in parser.take_errors() {
            eprintln!("eqcov test logging: {error}");
        }

        let file_layer = create_global_log_file(custom_path).map(|file| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(Mutex::new(file))
                .with_span_events(FmtSpan::CLOSE)
                .with_current_span(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
        });

        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_level(true)
            .compact();

        let filter = tracing_subscriber::EnvFilter::try_new(format!(
            "eqcov={level},eqcov_samples={level}"
        ))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(stderr_layer);

        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

fn create_global_log_file(custom_path: Option<String>) -> Option<std::fs::File> {
    if let Some(custom_path) = custom_path {
        if let Some(parent) = PathBuf::from(&custom_path).parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        return std::fs::File::create(&custom_path).ok();
    }

    let log_dir = find_target_dir().join("test-logs");
    let _ = std::fs::create_dir_all(&log_dir);
    std::fs::File::create(log_dir.join("all_tests.jsonl")).ok()
}

/// Find the target directory by searching up from current dir.
fn find_target_dir() -> PathBuf {
    if let Ok(target_dir) = std::env::var("CARGO_TARGET_DIR") {
        return PathBuf::from(target_dir);
    }

    let mut cwd = std::env::current_dir().unwrap_or_default();
    loop {
        let target = cwd.join("target");
        if target.is_dir() {
            return target;
        }
        if !cwd.pop() {
            return PathBuf::from("target");
        }
    }
}

/// A structured log entry for test execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestLogEntry {
    /// RFC 3339 timestamp.
    pub timestamp: String,
    pub test_name: String,
    pub phase: TestPhase,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Duration since test start in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl TestLogEntry {
    pub fn new(test_name: &str, phase: TestPhase, message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            test_name: test_name.to_string(),
            phase,
            message: message.into(),
            data: None,
            duration_ms: None,
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

/// Structured test logger that writes one JSONL file per test in
/// `target/test-logs/`.
pub struct TestLogger {
    test_name: String,
    start_time: Instant,
    logs: Mutex<Vec<TestLogEntry>>,
    log_file: Option<Mutex<std::fs::File>>,
}

impl TestLogger {
    pub fn for_test(test_name: &str) -> Self {
        let log_file = Self::create_log_file(test_name).ok();

        let logger = Self {
            test_name: test_name.to_string(),
            start_time: Instant::now(),
            logs: Mutex::new(Vec::new()),
            log_file: log_file.map(Mutex::new),
        };
        logger.log(TestPhase::Setup, "TEST START");
        logger
    }

    fn create_log_file(test_name: &str) -> std::io::Result<std::fs::File> {
        let log_dir = find_target_dir().join("test-logs");
        std::fs::create_dir_all(&log_dir)?;

        let safe_name = test_name.replace("::", "_").replace(['/', '\\'], "_");
        std::fs::File::create(log_dir.join(format!("{safe_name}.jsonl")))
    }

    pub fn log(&self, phase: TestPhase, message: impl Into<String>) {
        let entry = TestLogEntry::new(&self.test_name, phase, message)
            .with_duration(self.elapsed_ms());
        self.write_entry(&entry);
    }

    pub fn log_with_data(
        &self,
        phase: TestPhase,
        message: impl Into<String>,
        data: serde_json::Value,
    ) {
        let entry = TestLogEntry::new(&self.test_name, phase, message)
            .with_duration(self.elapsed_ms())
            .with_data(data);
        self.write_entry(&entry);
    }

    /// Record a unit verdict: one execute entry per case, then the
    /// reconciliation result with the residual report when there is one.
    pub fn log_verdict(&self, verdict: &UnitVerdict) {
        for outcome in &verdict.cases {
            let data = serde_json::to_value(outcome).unwrap_or_default();
            self.log_with_data(TestPhase::Execute, format!("case {}", outcome.name), data);
        }

        let failed = verdict.failed_cases().count();
        let failures: Vec<serde_json::Value> = verdict
            .unit_failures
            .iter()
            .map(|err| {
                serde_json::json!({
                    "code": err.code().code_string(),
                    "message": err.to_string(),
                    "report": err.report(),
                })
            })
            .collect();
        self.log_with_data(
            TestPhase::Reconcile,
            format!("unit {}", verdict.unit),
            serde_json::json!({
                "success": verdict.is_success(),
                "failed_cases": failed,
                "unit_failures": failures,
            }),
        );
    }

    fn write_entry(&self, entry: &TestLogEntry) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.push(entry.clone());
        }

        if let Some(file) = &self.log_file
            && let Ok(mut f) = file.lock()
            && let Ok(json) = serde_json::to_string(entry)
        {
            let _ = writeln!(f, "{json}");
        }

        tracing::info!(
            test = %self.test_name,
            phase = %entry.phase,
            duration_ms = entry.duration_ms,
            "{}",
            entry.message
        );
    }

    pub fn pass(self) {
        self.log(TestPhase::Verify, "TEST PASS");
    }

    pub fn fail(self, reason: impl Into<String>) {
        self.log_with_data(
            TestPhase::Verify,
            "TEST FAIL",
            serde_json::json!({ "reason": reason.into() }),
        );
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// Entries recorded so far.
    pub fn entries(&self) -> Vec<TestLogEntry> {
        self.logs.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

/// Test logger that logs TEST PASS on normal drop and TEST FAIL when dropped
/// during a panic.
///
/// Enabled when `EQCOV_TEST_LOGGING` is true, or in CI unless it is false.
/// When disabled the guard is a no-op.
pub struct TestGuard {
    inner: Option<TestLogger>,
}

impl TestGuard {
    pub fn new(test_name: &str) -> Self {
        Self {
            inner: if Self::is_enabled() {
                init_global_test_logging();
                Some(TestLogger::for_test(test_name))
            } else {
                None
            },
        }
    }

    fn is_enabled() -> bool {
        let ci = std::env::var("CI").is_ok();
        EnvParser::new().get_bool("TEST_LOGGING", ci).value
    }

    /// Whether this guard writes a per-test log file.
    pub fn is_active(&self) -> bool {
        self.inner.is_some()
    }

    pub fn log(&self, phase: TestPhase, message: impl Into<String>) {
        if let Some(logger) = &self.inner {
            logger.log(phase, message);
        }
    }

    pub fn log_with_data(
        &self,
        phase: TestPhase,
        message: impl Into<String>,
        data: serde_json::Value,
    ) {
        if let Some(logger) = &self.inner {
            logger.log_with_data(phase, message, data);
        }
    }

    pub fn log_verdict(&self, verdict: &UnitVerdict) {
        if let Some(logger) = &self.inner {
            logger.log_verdict(verdict);
        }
    }
}

impl Drop for TestGuard {
    fn drop(&mut self) {
        if let Some(logger) = self.inner.take() {
            if std::thread::panicking() {
                logger.fail("test panicked");
            } else {
                logger.pass();
            }
        }
    }
}

/// Create a [`TestGuard`] named after the enclosing function.
///
/// ```ignore
/// #[test]
/// fn test_something() {
///     let _guard = eqcov::test_guard!();
/// }
/// ```
#[macro_export]
macro_rules! test_guard {
    () => {{
        fn _f() {}
        fn _type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        let name = _type_name_of(_f);
        let name = name.strip_suffix("::_f").unwrap_or(name);
        let name = name.rsplit("::").next().unwrap_or(name);
        $crate::testing::TestGuard::new(name)
    }};
}
