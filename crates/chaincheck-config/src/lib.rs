//! Configuration management for chaincheck
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. CLI arguments (highest precedence, applied by the caller)
//! 2. Environment variables (CHAINCHECK_* prefix, `__` between sections)
//! 3. chaincheck.local.toml (gitignored, local overrides)
//! 4. chaincheck.toml (git-tracked, project config)
//! 5. ~/.config/chaincheck/config.toml (user defaults)
//! 6. Built-in defaults (lowest precedence)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use chaincheck::{StructuralThresholds, TransactionalThresholds};

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::{ConfigLayer, user_config_dir};

/// Main chaincheck configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaincheckConfig {
    pub fixtures: FixtureConfig,
    pub structural: StructuralThresholds,
    pub transactional: TransactionalThresholds,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    /// Directory holding `<i>.chain`, `<i>.trx` and `<i>.trx_count`.
    pub dir: PathBuf,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("expt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Color diagnostics on the terminal. The report itself is never colored.
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl ChaincheckConfig {
    /// Resolve relative paths to absolute
    pub fn resolve_paths(&mut self, base_dir: impl AsRef<Path>) {
        let base = base_dir.as_ref();

        if self.fixtures.dir.is_relative() {
            self.fixtures.dir = base.join(&self.fixtures.dir);
        }
    }

    /// Rejects thresholds that can never be met or make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let trx = &self.transactional;

        if trx.window_minutes == 0 {
            return Err(ConfigError::ValidationError(
                "transactional.window_minutes must be at least 1".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&trx.min_unique_fraction) {
            return Err(ConfigError::ValidationError(format!(
                "transactional.min_unique_fraction must be within [0, 1], got {}",
                trx.min_unique_fraction
            )));
        }

        if trx.min_trx_per_block > trx.max_trx_per_block() {
            return Err(ConfigError::ValidationError(format!(
                "transactional.min_trx_per_block ({}) exceeds the upper bound ({})",
                trx.min_trx_per_block,
                trx.max_trx_per_block()
            )));
        }

        Ok(())
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
