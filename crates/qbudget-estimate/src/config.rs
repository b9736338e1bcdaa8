//! Session configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with QBUDGET_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values
//!
//! Hardware noise and timing constants are not configurable; only the
//! budget ceilings and the grouping/allocation policies are.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::allocation::{AllocationPolicy, Remainder, ShotAllocator};
use crate::grouping::GroupingStrategy;
use crate::ledger::BudgetLimits;

/// Complete session configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Budget ceilings
    #[serde(default)]
    pub limits: BudgetLimits,

    /// Shot allocation policy
    #[serde(default)]
    pub allocation: AllocationConfig,

    /// Measurement grouping strategy
    #[serde(default)]
    pub grouping: GroupingStrategy,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Shot allocation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationConfig {
    /// Policy: "equal" or "proportional"
    #[serde(default)]
    pub policy: AllocationPolicy,

    /// Equal-split leftover: "distribute" or "drop"
    #[serde(default)]
    pub remainder: Remainder,
}

impl AllocationConfig {
    /// Build the configured allocator.
    pub fn allocator(&self) -> Box<dyn ShotAllocator> {
        self.policy.allocator(self.remainder)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_yaml_ng::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => SessionConfig::default(),
        };
        let config = config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Merge `QBUDGET_*` environment variables into this configuration.
    ///
    /// Only variables that are set override the current values.
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Merge overrides from any key lookup using the environment variable names.
    pub fn merge_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Limits
        if let Some(v) = lookup("QBUDGET_MAX_CIRCUIT_TIME") {
            self.limits.max_circuit_time = parse_number("QBUDGET_MAX_CIRCUIT_TIME", &v)?;
        }
        if let Some(v) = lookup("QBUDGET_MAX_WALL_TIME") {
            self.limits.max_wall_time = parse_number("QBUDGET_MAX_WALL_TIME", &v)?;
        }

        // Policies
        if let Some(v) = lookup("QBUDGET_ALLOCATION") {
            self.allocation.policy = v
                .parse()
                .map_err(|_| ConfigError::ValidationError(format!("Invalid QBUDGET_ALLOCATION: {v}")))?;
        }
        if let Some(v) = lookup("QBUDGET_GROUPING") {
            self.grouping = v
                .parse()
                .map_err(|_| ConfigError::ValidationError(format!("Invalid QBUDGET_GROUPING: {v}")))?;
        }

        // Logging
        if let Some(v) = lookup("QBUDGET_LOG_LEVEL") {
            self.logging.level = v;
        }

        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate ceilings
        for (name, value) in [
            ("max_circuit_time", self.limits.max_circuit_time),
            ("max_wall_time", self.limits.max_wall_time),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be a positive number of seconds, got {value}"
                )));
            }
        }

        // Validate log level
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        Ok(())
    }
}

fn parse_number(key: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::ValidationError(format!("Invalid {key}: {value}")))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
