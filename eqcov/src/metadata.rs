//! Declarative coverage metadata.
//!
//! [`UnitAnalysis`] is the expected model attached to a unit under test and
//! [`Cover`] is the claim attached to an individual test case. Both can be built
//! in code or loaded from TOML/JSON tables:
//!
//! ```toml
//! [[methods]]
//! signature = "InputStreamProvider(String)"
//!
//! [[methods.equivalence_conditions]]
//! name = "path of the file"
//! valid = [{ id = 1, description = "non-empty string" }]
//! invalid = [{ id = 2, description = "null" }, { id = 3, description = "''" }]
//!
//! [[methods.boundaries]]
//! id = 1
//! description = "null"
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::{AuditError, Result};
use crate::model::{ClassId, ExpectationDescriptor, MethodSignature, UnitDescriptor};

/// Expected coverage model for every analyzed method of a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UnitAnalysis {
    #[serde(default)]
    pub methods: Vec<MethodAnalysis>,
}

impl UnitAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn method(mut self, method: MethodAnalysis) -> Self {
        self.methods.push(method);
        self
    }

    /// Decode an analysis table from TOML.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| AuditError::Metadata {
            format: "toml",
            reason: e.to_string(),
        })
    }

    /// Decode an analysis table from JSON.
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| AuditError::Metadata {
            format: "json",
            reason: e.to_string(),
        })
    }

    /// Build one expectation per analyzed method, in declaration order.
    ///
    /// Fails when two methods share a signature, since the join key must be
    /// unique within a unit.
    pub fn expectations(&self) -> Result<Vec<ExpectationDescriptor>> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.methods.len());
        for method in &self.methods {
            if !seen.insert(method.signature.as_str()) {
                return Err(AuditError::Metadata {
                    format: "analysis",
                    reason: format!("duplicate method signature '{}'", method.signature),
                });
            }
        }

        Ok(self.methods.iter().map(UnitDescriptor::from_analysis).collect())
    }
}

/// Expected model for one method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MethodAnalysis {
    pub signature: MethodSignature,
    #[serde(default)]
    pub equivalence_conditions: Vec<EquivalenceCondition>,
    #[serde(default)]
    pub boundaries: Vec<Boundary>,
}

impl MethodAnalysis {
    pub fn new(signature: impl Into<MethodSignature>) -> Self {
        Self {
            signature: signature.into(),
            equivalence_conditions: Vec::new(),
            boundaries: Vec::new(),
        }
    }

    #[must_use]
    pub fn condition(mut self, condition: EquivalenceCondition) -> Self {
        self.equivalence_conditions.push(condition);
        self
    }

    #[must_use]
    pub fn boundary(mut self, id: ClassId, description: impl Into<String>) -> Self {
        self.boundaries.push(Boundary {
            id,
            description: description.into(),
        });
        self
    }
}

/// A named input condition split into valid and invalid classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EquivalenceCondition {
    pub name: String,
    #[serde(default)]
    pub valid: Vec<Condition>,
    #[serde(default)]
    pub invalid: Vec<Condition>,
}

impl EquivalenceCondition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            valid: Vec::new(),
            invalid: Vec::new(),
        }
    }

    #[must_use]
    pub fn valid(mut self, id: ClassId, description: impl Into<String>) -> Self {
        self.valid.push(Condition {
            id,
            description: description.into(),
        });
        self
    }

    #[must_use]
    pub fn invalid(mut self, id: ClassId, description: impl Into<String>) -> Self {
        self.invalid.push(Condition {
            id,
            description: description.into(),
        });
        self
    }
}

/// One equivalence class of a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Condition {
    pub id: ClassId,
    #[serde(default)]
    pub description: String,
}

/// One boundary case of a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Boundary {
    pub id: ClassId,
    #[serde(default)]
    pub description: String,
}

/// Coverage claim attached to a single test case.
///
/// `conditions` are free-text labels for readers of the test; they are never
/// consulted when computing coverage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Cover {
    pub signature: MethodSignature,
    #[serde(default)]
    pub valid_ecs: Vec<ClassId>,
    #[serde(default)]
    pub invalid_ecs: Vec<ClassId>,
    #[serde(default)]
    pub boundaries: Vec<ClassId>,
    #[serde(default)]
    pub conditions: Vec<String>,
}

impl Cover {
    pub fn new(signature: impl Into<MethodSignature>) -> Self {
        Self {
            signature: signature.into(),
            valid_ecs: Vec::new(),
            invalid_ecs: Vec::new(),
            boundaries: Vec::new(),
            conditions: Vec::new(),
        }
    }

    #[must_use]
    pub fn valid_ecs(mut self, ids: impl IntoIterator<Item = ClassId>) -> Self {
        self.valid_ecs.extend(ids);
        self
    }

    #[must_use]
    pub fn invalid_ecs(mut self, ids: impl IntoIterator<Item = ClassId>) -> Self {
        self.invalid_ecs.extend(ids);
        self
    }

    #[must_use]
    pub fn boundaries(mut self, ids: impl IntoIterator<Item = ClassId>) -> Self {
        self.boundaries.extend(ids);
        self
    }

    #[must_use]
    pub fn conditions<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.conditions.extend(labels.into_iter().map(Into::into));
        self
    }
}
