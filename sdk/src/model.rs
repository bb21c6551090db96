//! External predictive capability
//!
//! A trained regression model is consumed only through this trait. The engine
//! acquires one instance per request, before any estimation starts, and shares
//! it read-only across simulation workers.

use crate::errors::EngineError;

/// Trait that all trained effort models must implement
pub trait RegressionModel: Send + Sync {
    /// Returns a short description of the model (for logs)
    fn name(&self) -> &str;

    /// Number of features the model was trained on
    fn feature_count(&self) -> usize;

    /// Predict effort in person-months from an ordered feature slice
    ///
    /// Implementations must not mutate internal state; the same model is
    /// called concurrently from several threads.
    fn predict(&self, features: &[f64]) -> Result<f64, EngineError>;
}
