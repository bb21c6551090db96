//! Feature vector, sample and summary types
//!
//! The feature vector layout is a contract with every predictor. The order of
//! its elements must never change:
//!
//! - **Basic**: `[size, mode_code, reliability, complexity]`
//! - **Advanced**: `[size, 5 scale driver codes, 16 cost driver codes]`

use crate::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Number of scale drivers in an advanced feature vector
pub const SCALE_DRIVER_COUNT: usize = 5;

/// Number of cost drivers in an advanced feature vector
pub const COST_DRIVER_COUNT: usize = 16;

const SCALE_RANGE: Range<usize> = 1..1 + SCALE_DRIVER_COUNT;
const COST_RANGE: Range<usize> = 1 + SCALE_DRIVER_COUNT..1 + SCALE_DRIVER_COUNT + COST_DRIVER_COUNT;

/// Which of the two feature layouts a vector follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureLayout {
    /// `[size, mode_code, reliability, complexity]`
    Basic,
    /// `[size, scale codes..., cost codes...]`
    Advanced,
}

impl FeatureLayout {
    /// Number of elements in a vector of this layout
    pub const fn len(self) -> usize {
        match self {
            FeatureLayout::Basic => 4,
            FeatureLayout::Advanced => 1 + SCALE_DRIVER_COUNT + COST_DRIVER_COUNT,
        }
    }
}

/// Ordered numeric input for a predictor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFeatureVector")]
pub struct FeatureVector {
    layout: FeatureLayout,
    values: Vec<f64>,
}

/// Wire form of a feature vector, checked by `FeatureVector::new`
#[derive(Deserialize)]
struct RawFeatureVector {
    layout: FeatureLayout,
    values: Vec<f64>,
}

impl TryFrom<RawFeatureVector> for FeatureVector {
    type Error = EngineError;

    fn try_from(raw: RawFeatureVector) -> Result<Self, Self::Error> {
        FeatureVector::new(raw.layout, raw.values)
    }
}

impl FeatureVector {
    /// Create a feature vector, checking its length against the layout
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the length does not match the layout or a
    /// value is not finite.
    pub fn new(layout: FeatureLayout, values: Vec<f64>) -> Result<Self, EngineError> {
        if values.len() != layout.len() {
            return Err(EngineError::InvalidInput(format!(
                "{:?} feature vector needs {} values, got {}",
                layout,
                layout.len(),
                values.len()
            )));
        }
        if let Some(position) = values.iter().position(|v| !v.is_finite()) {
            return Err(EngineError::InvalidInput(format!(
                "feature {} is not a finite number",
                position
            )));
        }
        Ok(Self { layout, values })
    }

    pub fn layout(&self) -> FeatureLayout {
        self.layout
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Size in source lines (always the first element)
    pub fn size(&self) -> f64 {
        self.values[0]
    }

    /// Mode code (1 organic, 2 semi-detached, 3 embedded) of a basic vector
    pub fn mode_code(&self) -> Option<f64> {
        self.basic_value(1)
    }

    pub fn reliability(&self) -> Option<f64> {
        self.basic_value(2)
    }

    pub fn complexity(&self) -> Option<f64> {
        self.basic_value(3)
    }

    /// Scale driver codes of an advanced vector, in fixed driver order
    pub fn scale_codes(&self) -> Option<&[f64]> {
        self.advanced_slice(SCALE_RANGE)
    }

    /// Cost driver codes of an advanced vector, in fixed driver order
    pub fn cost_codes(&self) -> Option<&[f64]> {
        self.advanced_slice(COST_RANGE)
    }

    fn basic_value(&self, index: usize) -> Option<f64> {
        match self.layout {
            FeatureLayout::Basic => self.values.get(index).copied(),
            FeatureLayout::Advanced => None,
        }
    }

    fn advanced_slice(&self, range: Range<usize>) -> Option<&[f64]> {
        match self.layout {
            FeatureLayout::Advanced => self.values.get(range),
            FeatureLayout::Basic => None,
        }
    }
}

/// One trial's outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Person-months
    pub effort: f64,
    /// Calendar months
    pub schedule: f64,
    /// Average headcount, always `effort / schedule`
    pub team_size: f64,
    pub cost: f64,
}

/// Empirical percentile summary of one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub min: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub max: f64,
}

impl Percentiles {
    /// Values in ascending-rank order: min, p10, p25, p50, p75, p90, max
    pub fn as_array(&self) -> [f64; 7] {
        [
            self.min, self.p10, self.p25, self.p50, self.p75, self.p90, self.max,
        ]
    }

    /// Check the ordering invariant `min <= p10 <= ... <= max`
    pub fn is_monotonic(&self) -> bool {
        self.as_array().windows(2).all(|pair| pair[0] <= pair[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_lengths() {
        assert_eq!(FeatureLayout::Basic.len(), 4);
        assert_eq!(FeatureLayout::Advanced.len(), 22);
    }

    #[test]
    fn test_basic_accessors() {
        let v = FeatureVector::new(FeatureLayout::Basic, vec![50000.0, 1.0, 1.1, 0.9]).unwrap();
        assert_eq!(v.size(), 50000.0);
        assert_eq!(v.mode_code(), Some(1.0));
        assert_eq!(v.reliability(), Some(1.1));
        assert_eq!(v.complexity(), Some(0.9));
        assert!(v.scale_codes().is_none());
        assert!(v.cost_codes().is_none());
    }

    #[test]
    fn test_advanced_accessors() {
        let mut values = vec![10000.0];
        values.extend([4.0; SCALE_DRIVER_COUNT]);
        values.extend([3.0; COST_DRIVER_COUNT]);
        let v = FeatureVector::new(FeatureLayout::Advanced, values).unwrap();
        assert_eq!(v.scale_codes().unwrap(), &[4.0; 5]);
        assert_eq!(v.cost_codes().unwrap(), &[3.0; 16]);
        assert!(v.mode_code().is_none());
    }

    #[test]
    fn test_wrong_length_rejected() {
        let result = FeatureVector::new(FeatureLayout::Advanced, vec![1.0, 2.0]);
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_non_finite_rejected() {
        let result = FeatureVector::new(FeatureLayout::Basic, vec![1.0, f64::NAN, 1.0, 1.0]);
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_deserialize_checks_length() {
        let empty = serde_json::from_str::<FeatureVector>(r#"{"layout":"basic","values":[]}"#);
        assert!(empty.is_err());

        let v: FeatureVector =
            serde_json::from_str(r#"{"layout":"basic","values":[1000.0,2.0,1.0,1.0]}"#).unwrap();
        assert_eq!(v.size(), 1000.0);
        assert_eq!(v.mode_code(), Some(2.0));
    }

    #[test]
    fn test_sample_serializes_camel_case() {
        let sample = Sample {
            effort: 10.0,
            schedule: 5.0,
            team_size: 2.0,
            cost: 100000.0,
        };
        let json = serde_json::to_value(sample).unwrap();
        assert_eq!(json["teamSize"], 2.0);
    }
}
