//! Effort predictor abstraction
//!
//! This module provides a common interface for the two ways of turning a
//! feature vector into effort (person-months): the closed-form COCOMO
//! equations and a trained regression model. The predictor is chosen once,
//! when a request is set up, and shared read-only with every simulation
//! trial. Callers never branch on which variant they hold.

use crate::config::ModelConfig;
use sdk::errors::{EngineError, EstimationErrorExt};
use sdk::types::{FeatureLayout, FeatureVector};
use std::path::Path;
use std::sync::Arc;

pub mod formula;
pub mod model;

pub use formula::FormulaPredictor;
pub use model::{LinearRegressionModel, ModelPredictor};

/// Capability shared by every effort predictor
pub trait EffortPredictor: Send + Sync {
    /// Returns the name of the predictor (for logs)
    fn name(&self) -> &str;

    /// Estimate effort in person-months
    fn estimate(&self, features: &FeatureVector) -> Result<f64, EngineError>;

    /// Estimate with the formula's leading coefficient scaled by `coefficient_factor`
    ///
    /// Used by basic-model simulation to perturb the `a` coefficient. Opaque
    /// models have no such coefficient, so the default ignores the factor.
    fn estimate_perturbed(
        &self,
        features: &FeatureVector,
        _coefficient_factor: f64,
    ) -> Result<f64, EngineError> {
        self.estimate(features)
    }
}

/// How the advanced path obtains its predictor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PredictorSource {
    /// Trained model, required
    #[default]
    Model,
    /// Closed-form equations, selected explicitly by the caller
    Formula,
}

/// Apply the schedule compression/expansion percentage to a predicted effort
///
/// # Errors
///
/// Returns `InvalidInput` when `sced` is not finite or is at or below -100%.
pub fn apply_sced(effort: f64, sced: Option<f64>) -> Result<f64, EngineError> {
    match sced {
        None => Ok(effort),
        Some(sced) if sced.is_finite() && sced > -100.0 => Ok(effort * (1.0 + sced / 100.0)),
        Some(sced) => Err(EngineError::InvalidInput(format!(
            "sced must be greater than -100, got {}",
            sced
        ))),
    }
}

/// Predictor for the basic paths, falling back to the formula
///
/// The fallback decision is made here, once; it is never revisited per trial.
pub fn basic_predictor(config: &ModelConfig) -> Arc<dyn EffortPredictor> {
    let Some(path) = config.basic_path.as_deref() else {
        tracing::debug!("No basic model configured, using formula predictor");
        return Arc::new(FormulaPredictor::new());
    };

    match load_model(path, FeatureLayout::Basic) {
        Ok(predictor) => predictor,
        Err(e) => {
            tracing::warn!(
                "Basic model unavailable ({}); falling back to formula predictor. {}",
                e,
                e.user_hint()
            );
            Arc::new(FormulaPredictor::new())
        }
    }
}

/// Predictor for the advanced point estimate
///
/// # Errors
///
/// With `PredictorSource::Model`, returns `PredictorUnavailable` if no
/// advanced model is configured or it fails to load. There is no fallback.
pub fn advanced_predictor(
    config: &ModelConfig,
    source: PredictorSource,
) -> Result<Arc<dyn EffortPredictor>, EngineError> {
    match source {
        PredictorSource::Formula => Ok(Arc::new(FormulaPredictor::new())),
        PredictorSource::Model => {
            let path = config.advanced_path.as_deref().ok_or_else(|| {
                EngineError::PredictorUnavailable(
                    "no advanced model configured (model.advanced_path)".to_string(),
                )
            })?;
            load_model(path, FeatureLayout::Advanced)
        }
    }
}

fn load_model(path: &Path, layout: FeatureLayout) -> Result<Arc<dyn EffortPredictor>, EngineError> {
    let model = LinearRegressionModel::load(path, layout)?;
    tracing::debug!("Loaded {:?} model from {:?}", layout, path);
    let predictor = ModelPredictor::new(Arc::new(model), layout)?;
    Ok(Arc::new(predictor))
}
