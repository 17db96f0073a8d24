//! Descriptor model shared by the aggregator, reconciler and reporter.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

use crate::metadata::{Cover, MethodAnalysis};

/// Identifier of an equivalence class or boundary within one method's model.
pub type ClassId = i32;

/// Opaque identifier naming a method, e.g. `equals(byte[], int, byte[], int, int)`.
///
/// Used as the join key between expectations and coverage. A blank signature is
/// "unset" and is rejected wherever it would be used as a lookup key.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(transparent)]
pub struct MethodSignature(String);

impl MethodSignature {
    pub fn new(signature: impl Into<String>) -> Self {
        Self(signature.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the signature is empty or whitespace only.
    pub fn is_unset(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MethodSignature {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MethodSignature {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for MethodSignature {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Per-method view of equivalence classes and boundaries.
///
/// The same shape serves both as the expected model of a method and as the
/// merged coverage of every declaration targeting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDescriptor {
    signature: MethodSignature,
    valid_ecs: Vec<ClassId>,
    invalid_ecs: Vec<ClassId>,
    boundaries: Vec<ClassId>,
}

/// Full expected coverage model for one method.
pub type ExpectationDescriptor = UnitDescriptor;

/// Union of every coverage declaration sharing one signature.
pub type MergedCoverageDescriptor = UnitDescriptor;

impl UnitDescriptor {
    pub fn builder(signature: impl Into<MethodSignature>) -> UnitDescriptorBuilder {
        UnitDescriptorBuilder::new(signature)
    }

    /// Build the expectation for one analyzed method.
    ///
    /// Ids of every equivalence-condition group are concatenated in declaration
    /// order. A method with no groups and no boundaries yields empty lists.
    pub fn from_analysis(analysis: &MethodAnalysis) -> Self {
        let mut valid_ecs = Vec::new();
        let mut invalid_ecs = Vec::new();
        for group in &analysis.equivalence_conditions {
            valid_ecs.extend(group.valid.iter().map(|condition| condition.id));
            invalid_ecs.extend(group.invalid.iter().map(|condition| condition.id));
        }

        Self {
            signature: analysis.signature.clone(),
            valid_ecs,
            invalid_ecs,
            boundaries: analysis.boundaries.iter().map(|b| b.id).collect(),
        }
    }

    pub fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    pub fn valid_ecs(&self) -> &[ClassId] {
        &self.valid_ecs
    }

    pub fn invalid_ecs(&self) -> &[ClassId] {
        &self.invalid_ecs
    }

    pub fn boundaries(&self) -> &[ClassId] {
        &self.boundaries
    }

    /// True when no category lists any id.
    pub fn is_empty(&self) -> bool {
        self.valid_ecs.is_empty() && self.invalid_ecs.is_empty() && self.boundaries.is_empty()
    }
}

/// Builder for [`UnitDescriptor`]; unset categories build as empty lists.
#[derive(Debug, Clone)]
pub struct UnitDescriptorBuilder {
    signature: MethodSignature,
    valid_ecs: Option<Vec<ClassId>>,
    invalid_ecs: Option<Vec<ClassId>>,
    boundaries: Option<Vec<ClassId>>,
}

impl UnitDescriptorBuilder {
    fn new(signature: impl Into<MethodSignature>) -> Self {
        Self {
            signature: signature.into(),
            valid_ecs: None,
            invalid_ecs: None,
            boundaries: None,
        }
    }

    #[must_use]
    pub fn valid_ecs(mut self, ids: impl IntoIterator<Item = ClassId>) -> Self {
        self.valid_ecs = Some(ids.into_iter().collect());
        self
    }

    #[must_use]
    pub fn invalid_ecs(mut self, ids: impl IntoIterator<Item = ClassId>) -> Self {
        self.invalid_ecs = Some(ids.into_iter().collect());
        self
    }

    #[must_use]
    pub fn boundaries(mut self, ids: impl IntoIterator<Item = ClassId>) -> Self {
        self.boundaries = Some(ids.into_iter().collect());
        self
    }

    pub fn build(self) -> UnitDescriptor {
        UnitDescriptor {
            signature: self.signature,
            valid_ecs: self.valid_ecs.unwrap_or_default(),
            invalid_ecs: self.invalid_ecs.unwrap_or_default(),
            boundaries: self.boundaries.unwrap_or_default(),
        }
    }
}

/// One test case's claim about which classes and boundaries it exercises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageDeclaration {
    /// Name of the test case making the claim.
    pub case_name: String,
    pub signature: MethodSignature,
    pub valid_ecs: Vec<ClassId>,
    pub invalid_ecs: Vec<ClassId>,
    pub boundaries: Vec<ClassId>,
}

impl CoverageDeclaration {
    pub fn from_cover(case_name: impl Into<String>, cover: &Cover) -> Self {
        Self {
            case_name: case_name.into(),
            signature: cover.signature.clone(),
            valid_ecs: cover.valid_ecs.clone(),
            invalid_ecs: cover.invalid_ecs.clone(),
            boundaries: cover.boundaries.clone(),
        }
    }
}
