//! Trained-model predictor
//!
//! Wraps any [`RegressionModel`] behind [`EffortPredictor`]. The bundled
//! implementation is a linear regression persisted as JSON:
//!
//! ```json
//! { "intercept": 1.5, "coefficients": [0.002, 3.1, 4.0, 2.2] }
//! ```

use super::EffortPredictor;
use sdk::errors::EngineError;
use sdk::model::RegressionModel;
use sdk::types::{FeatureLayout, FeatureVector};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Adapts a regression model to one feature layout
pub struct ModelPredictor {
    model: Arc<dyn RegressionModel>,
    layout: FeatureLayout,
}

impl ModelPredictor {
    /// # Errors
    ///
    /// Returns `PredictorUnavailable` if the model was trained on a different
    /// number of features than `layout` carries.
    pub fn new(model: Arc<dyn RegressionModel>, layout: FeatureLayout) -> Result<Self, EngineError> {
        if model.feature_count() != layout.len() {
            return Err(EngineError::PredictorUnavailable(format!(
                "model '{}' expects {} features, {:?} layout has {}",
                model.name(),
                model.feature_count(),
                layout,
                layout.len()
            )));
        }
        Ok(Self { model, layout })
    }
}

impl EffortPredictor for ModelPredictor {
    fn name(&self) -> &str {
        self.model.name()
    }

    fn estimate(&self, features: &FeatureVector) -> Result<f64, EngineError> {
        if features.layout() != self.layout {
            return Err(EngineError::InvalidInput(format!(
                "{:?} feature vector given to a {:?} model",
                features.layout(),
                self.layout
            )));
        }
        self.model.predict(features.values())
    }
}

/// Ordinary least-squares model: `intercept + sum(coefficient_i * x_i)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressionModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(skip)]
    name: String,
}

impl LinearRegressionModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
            name: "linear-regression".to_string(),
        }
    }

    /// Load a model file and check it fits `layout`
    ///
    /// # Errors
    ///
    /// Every failure (missing file, bad JSON, wrong coefficient count,
    /// non-finite parameters) is reported as `PredictorUnavailable`.
    pub fn load(path: &Path, layout: FeatureLayout) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::PredictorUnavailable(format!("cannot read model {:?}: {}", path, e))
        })?;
        let mut model: Self = serde_json::from_str(&content).map_err(|e| {
            EngineError::PredictorUnavailable(format!("cannot parse model {:?}: {}", path, e))
        })?;

        if model.coefficients.len() != layout.len() {
            return Err(EngineError::PredictorUnavailable(format!(
                "model {:?} has {} coefficients, expected {}",
                path,
                model.coefficients.len(),
                layout.len()
            )));
        }
        if !model.intercept.is_finite() || model.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(EngineError::PredictorUnavailable(format!(
                "model {:?} has non-finite parameters",
                path
            )));
        }

        model.name = match path.file_stem() {
            Some(stem) => format!("linear-regression:{}", stem.to_string_lossy()),
            None => "linear-regression".to_string(),
        };
        Ok(model)
    }
}

impl RegressionModel for LinearRegressionModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn feature_count(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, features: &[f64]) -> Result<f64, EngineError> {
        if features.len() != self.coefficients.len() {
            return Err(EngineError::InvalidInput(format!(
                "expected {} features, got {}",
                self.coefficients.len(),
                features.len()
            )));
        }
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum();
        Ok(self.intercept + dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_model(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_linear_prediction() {
        let model = LinearRegressionModel::new(1.0, vec![0.001, 2.0, 3.0, 4.0]);
        let effort = model.predict(&[10000.0, 1.0, 1.0, 1.0]).unwrap();
        assert!((effort - 20.0).abs() < 1e-9);
        assert!(model.predict(&[1.0]).is_err());
    }

    #[test]
    fn test_load_valid_model() {
        let file = write_model(r#"{"intercept": 0.5, "coefficients": [0.01, 1.0, 1.0, 1.0]}"#);
        let model = LinearRegressionModel::load(file.path(), FeatureLayout::Basic).unwrap();
        assert_eq!(model.feature_count(), 4);
        assert!(model.name().starts_with("linear-regression"));
    }

    #[test]
    fn test_load_rejects_wrong_width() {
        let file = write_model(r#"{"intercept": 0.5, "coefficients": [0.01, 1.0, 1.0, 1.0]}"#);
        let result = LinearRegressionModel::load(file.path(), FeatureLayout::Advanced);
        assert!(matches!(result, Err(EngineError::PredictorUnavailable(_))));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let file = write_model("not json");
        let result = LinearRegressionModel::load(file.path(), FeatureLayout::Basic);
        assert!(matches!(result, Err(EngineError::PredictorUnavailable(_))));
    }

    #[test]
    fn test_predictor_rejects_mismatched_layout() {
        let model = Arc::new(LinearRegressionModel::new(0.0, vec![1.0; 4]));
        assert!(ModelPredictor::new(Arc::clone(&model) as Arc<dyn RegressionModel>, FeatureLayout::Advanced).is_err());

        let predictor = ModelPredictor::new(model, FeatureLayout::Basic).unwrap();
        let advanced = FeatureVector::new(FeatureLayout::Advanced, vec![1.0; 22]).unwrap();
        assert!(matches!(
            predictor.estimate(&advanced),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_model_ignores_coefficient_factor() {
        let model = Arc::new(LinearRegressionModel::new(2.0, vec![0.0; 4]));
        let predictor = ModelPredictor::new(model, FeatureLayout::Basic).unwrap();
        let features = FeatureVector::new(FeatureLayout::Basic, vec![1000.0, 1.0, 1.0, 1.0]).unwrap();
        assert_eq!(predictor.estimate_perturbed(&features, 1.15).unwrap(), 2.0);
    }
}
