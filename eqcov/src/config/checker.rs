//! Checker configuration.
//!
//! ```toml
//! enabled = true
//! require_metadata = false
//! ```
//!
//! Environment variables override table values:
//! - `EQCOV_ENABLED`: run the coverage check at all (default: true)
//! - `EQCOV_REQUIRE_METADATA`: fail units without expectation metadata (default: false)

use serde::{Deserialize, Serialize};

use super::env::EnvParser;
use super::source::ConfigSource;
use crate::errors::{AuditError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Whether the coverage check runs after each unit.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Whether a unit without expectation metadata is a configuration error.
    #[serde(default)]
    pub require_metadata: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            require_metadata: false,
        }
    }
}

fn default_true() -> bool {
    true
}

impl CheckerConfig {
    /// Config requiring every unit to carry expectation metadata.
    pub fn strict() -> Self {
        Self {
            require_metadata: true,
            ..Self::default()
        }
    }

    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| AuditError::ConfigParse {
            reason: e.to_string(),
        })
    }

    /// Defaults overridden by `EQCOV_*` variables.
    pub fn from_env() -> Result<Self> {
        Self::default().apply_env()
    }

    /// Override fields with any `EQCOV_*` variables that are set.
    ///
    /// Every invalid variable is reported at once.
    pub fn apply_env(mut self) -> Result<Self> {
        let mut parser = EnvParser::new();

        let enabled = parser.get_bool("ENABLED", self.enabled);
        if enabled.source == ConfigSource::Environment {
            self.enabled = enabled.value;
        }
        let require_metadata = parser.get_bool("REQUIRE_METADATA", self.require_metadata);
        if require_metadata.source == ConfigSource::Environment {
            self.require_metadata = require_metadata.value;
        }

        if parser.has_errors() {
            return Err(AuditError::Env {
                errors: parser.take_errors(),
            });
        }

        tracing::debug!(
            enabled = self.enabled,
            enabled_source = %enabled.source,
            require_metadata = self.require_metadata,
            require_metadata_source = %require_metadata.source,
            "resolved checker configuration"
        );
        Ok(self)
    }
}
