//! Closed-form COCOMO predictor
//!
//! - Basic: `effort = a * KLOC^b * reliability * complexity`, `(a, b)` by mode
//! - Advanced: `effort = 2.94 * KLOC^E * product(EM(cost code))`,
//!   `E = 0.91 + 0.01 * sum(scale codes)`

use super::EffortPredictor;
use crate::features::Mode;
use crate::schedule::effort_exponent;
use sdk::errors::EngineError;
use sdk::types::{FeatureLayout, FeatureVector};

/// Leading coefficient of the advanced equation
pub const ADVANCED_COEFFICIENT: f64 = 2.94;

/// Effort multiplier of a cost driver code
pub fn effort_multiplier(code: f64) -> Result<f64, EngineError> {
    let multiplier = match code {
        c if c == 1.0 => 1.30,
        c if c == 2.0 => 1.15,
        c if c == 3.0 => 1.00,
        c if c == 4.0 => 0.85,
        c if c == 5.0 => 0.70,
        c if c == 6.0 => 0.55,
        other => {
            return Err(EngineError::InvalidInput(format!(
                "cost driver code {} is outside 1..=6",
                other
            )))
        }
    };
    Ok(multiplier)
}

fn kloc(size: f64) -> f64 {
    size / 1000.0
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormulaPredictor;

impl FormulaPredictor {
    pub fn new() -> Self {
        Self
    }

    fn basic(&self, features: &FeatureVector, coefficient_factor: f64) -> Result<f64, EngineError> {
        let (Some(mode_code), Some(reliability), Some(complexity)) = (
            features.mode_code(),
            features.reliability(),
            features.complexity(),
        ) else {
            return Err(EngineError::invalid_input("basic feature vector is incomplete"));
        };

        let mode = Mode::from_code(mode_code).ok_or_else(|| {
            EngineError::InvalidInput(format!("mode code {} is not 1, 2 or 3", mode_code))
        })?;
        let (a, b) = mode.coefficients();

        Ok(a * coefficient_factor * kloc(features.size()).powf(b) * reliability * complexity)
    }

    fn advanced(&self, features: &FeatureVector, coefficient_factor: f64) -> Result<f64, EngineError> {
        let (Some(scale), Some(cost)) = (features.scale_codes(), features.cost_codes()) else {
            return Err(EngineError::invalid_input("advanced feature vector is incomplete"));
        };

        let exponent = effort_exponent(scale.iter().sum());
        let multiplier = cost
            .iter()
            .map(|&code| effort_multiplier(code))
            .product::<Result<f64, EngineError>>()?;

        Ok(ADVANCED_COEFFICIENT
            * coefficient_factor
            * kloc(features.size()).powf(exponent)
            * multiplier)
    }
}

impl EffortPredictor for FormulaPredictor {
    fn name(&self) -> &str {
        "formula"
    }

    fn estimate(&self, features: &FeatureVector) -> Result<f64, EngineError> {
        self.estimate_perturbed(features, 1.0)
    }

    fn estimate_perturbed(
        &self,
        features: &FeatureVector,
        coefficient_factor: f64,
    ) -> Result<f64, EngineError> {
        match features.layout() {
            FeatureLayout::Basic => self.basic(features, coefficient_factor),
            FeatureLayout::Advanced => self.advanced(features, coefficient_factor),
        }
    }
}
