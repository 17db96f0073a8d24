//! Residual report and its failure-message rendering.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::model::{ClassId, MethodSignature};

/// Uncovered ids of one method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncoveredEntry {
    pub signature: MethodSignature,
    pub valid_ecs: Vec<ClassId>,
    pub invalid_ecs: Vec<ClassId>,
    pub boundaries: Vec<ClassId>,
}

impl UncoveredEntry {
    pub fn is_empty(&self) -> bool {
        self.valid_ecs.is_empty() && self.invalid_ecs.is_empty() && self.boundaries.is_empty()
    }
}

/// Methods with at least one uncovered id, in expectation order.
///
/// A method absent from the report is fully covered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidualReport {
    entries: Vec<UncoveredEntry>,
}

impl ResidualReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry; fully covered entries are dropped.
    pub fn push(&mut self, entry: UncoveredEntry) {
        if !entry.is_empty() {
            self.entries.push(entry);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[UncoveredEntry] {
        &self.entries
    }

    pub fn get(&self, signature: &str) -> Option<&UncoveredEntry> {
        self.entries
            .iter()
            .find(|entry| entry.signature.as_str() == signature)
    }

    /// Render the report as a JSON document.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Format a report as the multi-line failure message.
///
/// ```text
/// >>> Uncovered
/// methodSignature: f(int)
/// validECs: [5]
/// ```
///
/// Category lines are omitted when empty; an empty report formats as "".
pub fn format_report(report: &ResidualReport) -> String {
    let mut message = String::new();
    for (index, entry) in report.entries().iter().enumerate() {
        if index > 0 {
            message.push('\n');
        }
        let _ = write!(message, ">>> Uncovered\nmethodSignature: {}", entry.signature);
        write_category(&mut message, "validECs", &entry.valid_ecs);
        write_category(&mut message, "invalidECs", &entry.invalid_ecs);
        write_category(&mut message, "boundaries", &entry.boundaries);
    }
    message
}

fn write_category(message: &mut String, label: &str, ids: &[ClassId]) {
    if !ids.is_empty() {
        let _ = write!(message, "\n{label}: {ids:?}");
    }
}
