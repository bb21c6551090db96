//! Configuration management
//!
//! This module handles loading, validation, and management of the engine
//! configuration. Configuration is stored in TOML format at
//! ~/.cocomo/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Log level
//! - **estimation**: Cost per person-month, function-point ratio
//! - **simulation**: Iteration defaults and cap, worker pool, fixed seed
//! - **model**: Paths to trained regression models (optional)
//!
//! # Path Expansion
//!
//! Model paths may start with `~`, which is expanded to the user's home
//! directory. Model files are not checked here; a missing file is reported
//! when a predictor is selected.
//!
//! # Examples
//!
//! ```no_run
//! use cocomo_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//! println!("Cost per PM: {}", config.estimation.cost_per_person_month);
//! # Ok(())
//! # }
//! ```

use crate::features::DEFAULT_FP_TO_SIZE_RATIO;
use crate::schedule::DEFAULT_COST_PER_PERSON_MONTH;
use sdk::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Core engine settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Estimation constants
    #[serde(default)]
    pub estimation: EstimationConfig,

    /// Monte Carlo settings
    #[serde(default)]
    pub simulation: SimulationSettings,

    /// Trained model locations
    #[serde(default)]
    pub model: ModelConfig,
}

/// Core engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Estimation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationConfig {
    /// Cost of one person-month
    #[serde(default = "default_cost_per_person_month")]
    pub cost_per_person_month: f64,

    /// Size units per unadjusted function point
    #[serde(default = "default_fp_to_size_ratio")]
    pub fp_to_size_ratio: f64,
}

/// Monte Carlo configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Trials run when a request does not say
    #[serde(default = "default_iterations")]
    pub default_iterations: u64,

    /// Requests above this many trials are rejected
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u64,

    /// Spread trials over the rayon worker pool
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Fixed base seed for reproducible runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Trained model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ModelConfig {
    /// Basic-layout model (supports ~ expansion)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_path: Option<PathBuf>,

    /// Advanced-layout model (supports ~ expansion)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_path: Option<PathBuf>,
}

// Default value functions
fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

fn default_cost_per_person_month() -> f64 {
    DEFAULT_COST_PER_PERSON_MONTH
}

fn default_fp_to_size_ratio() -> f64 {
    DEFAULT_FP_TO_SIZE_RATIO
}

fn default_iterations() -> u64 {
    1000
}

fn default_max_iterations() -> u64 {
    1_000_000
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            cost_per_person_month: default_cost_per_person_month(),
            fp_to_size_ratio: default_fp_to_size_ratio(),
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            default_iterations: default_iterations(),
            max_iterations: default_max_iterations(),
            parallel: true,
            seed: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.cocomo/config.toml)
    ///
    /// If the configuration file doesn't exist, creates a default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read or written
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_or_create() -> Result<Self, EngineError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate_and_process()?;

        tracing::debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Create default configuration and save to path
    fn create_default(path: &Path) -> Result<Self, EngineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                EngineError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let mut config = Self::default();
        config.validate_and_process()?;

        let toml_string = config.to_toml()?;
        fs::write(path, toml_string)
            .map_err(|e| EngineError::Config(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Created default configuration at {:?}", path);
        Ok(config)
    }

    /// Get the default configuration file path (~/.cocomo/config.toml)
    pub fn default_config_path() -> Result<PathBuf, EngineError> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".cocomo").join("config.toml"))
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Validate and process configuration
    ///
    /// Checks value ranges and expands ~ in model paths.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Config` on the first invalid value.
    pub fn validate_and_process(&mut self) -> Result<(), EngineError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        let positive = [
            ("cost_per_person_month", self.estimation.cost_per_person_month),
            ("fp_to_size_ratio", self.estimation.fp_to_size_ratio),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::Config(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if self.simulation.default_iterations == 0 {
            return Err(EngineError::Config(
                "default_iterations must be at least 1".to_string(),
            ));
        }
        if self.simulation.max_iterations < self.simulation.default_iterations {
            return Err(EngineError::Config(format!(
                "max_iterations ({}) must not be below default_iterations ({})",
                self.simulation.max_iterations, self.simulation.default_iterations
            )));
        }

        if let Some(path) = self.model.basic_path.take() {
            self.model.basic_path = Some(expand_path(&path)?);
        }
        if let Some(path) = self.model.advanced_path.take() {
            self.model.advanced_path = Some(expand_path(&path)?);
        }

        Ok(())
    }
}

/// Expand ~ in path to user's home directory
fn expand_path(path: &Path) -> Result<PathBuf, EngineError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| EngineError::Config("Invalid UTF-8 in path".to_string()))?;

    if let Some(rest) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(rest))
    } else if path_str == "~" {
        dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))
    } else {
        Ok(path.to_path_buf())
    }
}
