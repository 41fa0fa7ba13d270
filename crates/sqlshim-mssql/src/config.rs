//! Configuration for assembling the driver stack

use serde::{Deserialize, Serialize};
use sqlshim_core::Result;

/// Controls which layers [`crate::assemble_driver`] installs.
///
/// Every field is optional in TOML; missing fields keep their defaults.
///
/// ```
/// use sqlshim_mssql::CompatConfig;
///
/// let config = CompatConfig::from_toml_str("log_statements = true").unwrap();
/// assert!(config.enabled());
/// assert!(config.log_statements());
/// assert!(!config.log_args());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatConfig {
    /// Install the SQL Server rewrites for `mssql`/`sqlserver` drivers
    enabled: bool,
    /// Log every statement after rewriting
    log_statements: bool,
    /// Include argument values in statement logs
    log_args: bool,
}

impl CompatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        tracing::debug!(?config, "loaded compat configuration");
        Ok(config)
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_log_statements(mut self, log_statements: bool) -> Self {
        self.log_statements = log_statements;
        self
    }

    pub fn with_log_args(mut self, log_args: bool) -> Self {
        self.log_args = log_args;
        self
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn log_statements(&self) -> bool {
        self.log_statements
    }

    pub fn log_args(&self) -> bool {
        self.log_args
    }
}

impl Default for CompatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_statements: false,
            log_args: false,
        }
    }
}
