//! Reconciler configuration file support.
//!
//! Loads and validates reconciler settings from TOML. Every field has a
//! default, so an empty or missing file yields the provider's behavior.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::association::UndeclaredSubnetPolicy;
use crate::baseline::{ProviderBaseline, DEFAULT_BASELINE_RULE_NUMBER};
use crate::error::{ReconcileError, ReconcileResult};
use crate::rule::MAX_USER_RULE_NUMBER;

/// Baseline rule configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineConfig {
    /// Rule number of the provider's catch-all deny entry
    #[serde(default = "default_baseline_rule_number")]
    pub rule_number: u16,
}

/// Subnet association configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationConfig {
    /// Handling of attached subnets missing from the declaration
    #[serde(default)]
    pub undeclared: UndeclaredSubnetPolicy,
}

/// Complete reconciler configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    #[serde(default)]
    pub baseline: BaselineConfig,

    #[serde(default)]
    pub associations: AssociationConfig,
}

fn default_baseline_rule_number() -> u16 {
    DEFAULT_BASELINE_RULE_NUMBER
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            rule_number: default_baseline_rule_number(),
        }
    }
}

impl ReconcilerConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> ReconcileResult<Self> {
        toml::from_str(content)
            .map_err(|e| ReconcileError::invalid_config("toml", format!("Failed to parse: {}", e)))
    }

    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> ReconcileResult<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => {
                let config = toml::from_str(&content).map_err(|e| {
                    ReconcileError::invalid_config(
                        path.display().to_string(),
                        format!("Failed to parse config file: {}", e),
                    )
                })?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Config file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(ReconcileError::Io(e)),
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> ReconcileResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            ReconcileError::invalid_config("toml", format!("Failed to serialize config: {}", e))
        })?;
        fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Baseline oracle described by this configuration.
    pub fn provider_baseline(&self) -> ProviderBaseline {
        ProviderBaseline::new(self.baseline.rule_number)
    }

    /// Validate configuration
    pub fn validate(&self) -> ReconcileResult<()> {
        if self.baseline.rule_number <= MAX_USER_RULE_NUMBER {
            return Err(ReconcileError::invalid_config(
                "baseline.rule_number",
                format!(
                    "must be greater than the highest user rule number {}",
                    MAX_USER_RULE_NUMBER
                ),
            ));
        }

        Ok(())
    }
}
