//! Error types and handling
//!
//! This module provides the error taxonomy used throughout the estimation engine.
//! All errors implement the `EstimationErrorExt` trait which provides user-friendly
//! hints and indicates whether errors are recoverable.
//!
//! # Propagation
//!
//! - Unknown driver labels never become errors; they are encoded as the
//!   driver's nominal rating.
//! - `PredictorUnavailable` is recovered locally on paths that allow a
//!   formula fallback, and is fatal on paths that require a trained model.
//! - Numeric failures are always fatal and are never clamped away.

use thiserror::Error;

/// Trait for estimation error extensions
///
/// This trait provides additional context for errors, including user-friendly
/// hints and recoverability information. All engine errors implement this trait.
pub trait EstimationErrorExt {
    /// Returns a user-friendly hint for the error
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Recoverable errors can be fixed by the caller (new input) or worked
    /// around (formula fallback). Non-recoverable errors mean the requested
    /// computation has no meaningful result.
    fn is_recoverable(&self) -> bool;

    /// Stable machine-readable label for the error category
    fn kind(&self) -> &'static str;
}

/// Main engine error type
///
/// # Error Categories
///
/// - **Input**: Missing fields, malformed JSON, out-of-range values
/// - **Predictor**: The external predictive capability failed to load
/// - **Numeric**: Division by zero or non-finite results
/// - **Simulation**: A Monte Carlo trial failed numerically
/// - **Configuration**: Invalid or unreadable configuration
///
/// # Examples
///
/// ```
/// use sdk::errors::{EngineError, EstimationErrorExt};
///
/// let error = EngineError::InvalidInput("size must be positive".to_string());
/// println!("Hint: {}", error.user_hint());
/// assert!(error.is_recoverable());
///
/// let fatal_error = EngineError::Numeric("schedule is zero".to_string());
/// assert!(!fatal_error.is_recoverable());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    // Input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Predictor errors
    #[error("Predictor unavailable: {0}")]
    PredictorUnavailable(String),

    // Numeric errors
    #[error("Numeric error: {0}")]
    Numeric(String),

    #[error("Simulation failed at trial {trial} ({inputs}): {reason}")]
    SimulationFailed {
        trial: u64,
        inputs: String,
        reason: String,
    },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Reading the request or a local file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Convenience constructor for input errors
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Convenience constructor for numeric errors
    pub fn numeric(message: impl Into<String>) -> Self {
        Self::Numeric(message.into())
    }
}

impl EstimationErrorExt for EngineError {
    fn user_hint(&self) -> &str {
        match self {
            Self::InvalidInput(_) => "Check the request fields and their values",
            Self::PredictorUnavailable(_) => {
                "Check the model path in config.toml or use the formula predictor"
            }
            Self::Numeric(_) => "The inputs drive the estimate to a degenerate value",
            Self::SimulationFailed { .. } => {
                "A simulated scenario was degenerate. Review size and driver ranges"
            }
            Self::Config(_) => "Check your config.toml file for errors",
            Self::Io(_) => "Could not read the request. Check stdin or the file path",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Numeric(_) | Self::SimulationFailed { .. } => false,
            _ => true,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::PredictorUnavailable(_) => "predictor_unavailable",
            Self::Numeric(_) => "numeric",
            Self::SimulationFailed { .. } => "simulation_failed",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
        }
    }
}
