//! Feature vector construction
//!
//! Builds the fixed-order numeric vectors predictors consume. The advanced
//! path applies its two size adjustments here, once, in this order:
//!
//! 1. Function points to size: `size = fp * fp_to_size_ratio`
//! 2. RCPX: `size *= 1 + rcpx / 100`
//!
//! Simulation perturbs the already-adjusted size and never re-applies them.

use crate::drivers::DriverCodes;
use sdk::api::SizingMethod;
use sdk::errors::EngineError;
use sdk::types::{FeatureLayout, FeatureVector};
use std::fmt;
use std::str::FromStr;

/// Default function-point-to-size ratio
pub const DEFAULT_FP_TO_SIZE_RATIO: f64 = 50.0;

/// Basic-model development mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Organic,
    SemiDetached,
    #[default]
    Embedded,
}

impl Mode {
    /// Formula coefficients `(a, b)`
    pub fn coefficients(&self) -> (f64, f64) {
        match self {
            Mode::Organic => (2.4, 1.05),
            Mode::SemiDetached => (3.0, 1.12),
            Mode::Embedded => (3.6, 1.20),
        }
    }

    /// Exponent `k` in `schedule = 2.5 * effort^k`
    pub fn schedule_exponent(&self) -> f64 {
        match self {
            Mode::Organic => 0.38,
            Mode::SemiDetached => 0.35,
            Mode::Embedded => 0.32,
        }
    }

    /// Code placed in a basic feature vector
    pub fn code(&self) -> u8 {
        match self {
            Mode::Organic => 1,
            Mode::SemiDetached => 2,
            Mode::Embedded => 3,
        }
    }

    pub fn from_code(code: f64) -> Option<Self> {
        match code {
            c if c == 1.0 => Some(Mode::Organic),
            c if c == 2.0 => Some(Mode::SemiDetached),
            c if c == 3.0 => Some(Mode::Embedded),
            _ => None,
        }
    }

    /// Parse an optional request mode, defaulting to embedded
    pub fn parse_or_default(mode: Option<&str>) -> Result<Self, EngineError> {
        mode.map_or(Ok(Mode::default()), str::parse)
    }
}

impl FromStr for Mode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "organic" => Ok(Mode::Organic),
            "semi-detached" | "semidetached" => Ok(Mode::SemiDetached),
            "embedded" => Ok(Mode::Embedded),
            other => Err(EngineError::InvalidInput(format!(
                "Unknown mode '{}'. Must be one of: organic, semi-detached, embedded",
                other
            ))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Organic => write!(f, "organic"),
            Mode::SemiDetached => write!(f, "semi-detached"),
            Mode::Embedded => write!(f, "embedded"),
        }
    }
}

/// Size inputs of an advanced request, before adjustment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeInput {
    pub size: f64,
    pub sizing_method: SizingMethod,
    pub unadjusted_fp: Option<f64>,
    pub rcpx: Option<f64>,
}

impl SizeInput {
    /// Plain source-line size with no adjustments
    pub fn sloc(size: f64) -> Self {
        Self {
            size,
            sizing_method: SizingMethod::Sloc,
            unadjusted_fp: None,
            rcpx: None,
        }
    }
}

/// Assembles feature vectors from size, mode and driver codes
#[derive(Debug, Clone, Copy)]
pub struct FeatureVectorBuilder {
    fp_to_size_ratio: f64,
}

impl FeatureVectorBuilder {
    pub fn new(fp_to_size_ratio: f64) -> Self {
        Self { fp_to_size_ratio }
    }

    /// Apply the function-point conversion and the RCPX adjustment
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the resulting size is not a positive finite
    /// number.
    pub fn adjusted_size(&self, input: &SizeInput) -> Result<f64, EngineError> {
        let mut size = match input.sizing_method {
            SizingMethod::Sloc => input.size,
            SizingMethod::FunctionPoints => {
                let fp = input.unadjusted_fp.unwrap_or(input.size);
                fp * self.fp_to_size_ratio
            }
        };

        if let Some(rcpx) = input.rcpx {
            if !rcpx.is_finite() {
                return Err(EngineError::invalid_input("rcpx must be a finite number"));
            }
            size *= 1.0 + rcpx / 100.0;
        }

        validate_size(size)?;
        Ok(size)
    }

    /// `[size, mode_code, reliability, complexity]`
    pub fn basic(
        &self,
        size: f64,
        mode: Mode,
        reliability: f64,
        complexity: f64,
    ) -> Result<FeatureVector, EngineError> {
        validate_size(size)?;
        validate_multiplier("reliability", reliability)?;
        validate_multiplier("complexity", complexity)?;

        FeatureVector::new(
            FeatureLayout::Basic,
            vec![size, f64::from(mode.code()), reliability, complexity],
        )
    }

    /// `[size, scale codes..., cost codes...]` from an already-adjusted size
    pub fn advanced(&self, size: f64, codes: &DriverCodes) -> Result<FeatureVector, EngineError> {
        validate_size(size)?;

        let mut values = Vec::with_capacity(FeatureLayout::Advanced.len());
        values.push(size);
        values.extend(codes.scale.iter().map(|&c| f64::from(c)));
        values.extend(codes.cost.iter().map(|&c| f64::from(c)));

        FeatureVector::new(FeatureLayout::Advanced, values)
    }
}

impl Default for FeatureVectorBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_FP_TO_SIZE_RATIO)
    }
}

/// Size must be strictly positive and finite
pub fn validate_size(size: f64) -> Result<(), EngineError> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidInput(format!(
            "size must be a positive number, got {}",
            size
        )))
    }
}

fn validate_multiplier(name: &str, value: f64) -> Result<(), EngineError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidInput(format!(
            "{} must be a positive number, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("organic".parse::<Mode>().unwrap(), Mode::Organic);
        assert_eq!("Semi-Detached".parse::<Mode>().unwrap(), Mode::SemiDetached);
        assert_eq!(" EMBEDDED ".parse::<Mode>().unwrap(), Mode::Embedded);
        assert!("hybrid".parse::<Mode>().is_err());
        assert_eq!(Mode::parse_or_default(None).unwrap(), Mode::Embedded);
    }

    #[test]
    fn test_mode_code_round_trip() {
        for mode in [Mode::Organic, Mode::SemiDetached, Mode::Embedded] {
            assert_eq!(Mode::from_code(f64::from(mode.code())), Some(mode));
        }
        assert_eq!(Mode::from_code(2.5), None);
    }

    #[test]
    fn test_basic_vector_order() {
        let builder = FeatureVectorBuilder::default();
        let v = builder.basic(50000.0, Mode::Organic, 1.2, 0.8).unwrap();
        assert_eq!(v.values(), &[50000.0, 1.0, 1.2, 0.8]);
    }

    #[test]
    fn test_advanced_vector_order() {
        let builder = FeatureVectorBuilder::default();
        let mut codes = DriverCodes::nominal();
        codes.scale[0] = 6;
        codes.cost[15] = 1;
        let v = builder.advanced(10000.0, &codes).unwrap();
        assert_eq!(v.values().len(), 22);
        assert_eq!(v.values()[0], 10000.0);
        assert_eq!(v.values()[1], 6.0);
        assert_eq!(v.values()[21], 1.0);
    }

    #[test]
    fn test_function_points_conversion() {
        let builder = FeatureVectorBuilder::default();
        let input = SizeInput {
            size: 1.0,
            sizing_method: SizingMethod::FunctionPoints,
            unadjusted_fp: Some(200.0),
            rcpx: None,
        };
        assert_eq!(builder.adjusted_size(&input).unwrap(), 10000.0);
    }

    #[test]
    fn test_function_points_fall_back_to_size() {
        let builder = FeatureVectorBuilder::new(40.0);
        let input = SizeInput {
            size: 100.0,
            sizing_method: SizingMethod::FunctionPoints,
            unadjusted_fp: None,
            rcpx: None,
        };
        assert_eq!(builder.adjusted_size(&input).unwrap(), 4000.0);
    }

    #[test]
    fn test_rcpx_applied_after_conversion() {
        let builder = FeatureVectorBuilder::default();
        let input = SizeInput {
            size: 0.0,
            sizing_method: SizingMethod::FunctionPoints,
            unadjusted_fp: Some(100.0),
            rcpx: Some(20.0),
        };
        let size = builder.adjusted_size(&input).unwrap();
        assert!((size - 6000.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_positive_size_rejected() {
        let builder = FeatureVectorBuilder::default();
        assert!(builder.adjusted_size(&SizeInput::sloc(0.0)).is_err());
        assert!(builder.adjusted_size(&SizeInput::sloc(-5.0)).is_err());

        let shrink_to_zero = SizeInput {
            rcpx: Some(-100.0),
            ..SizeInput::sloc(1000.0)
        };
        assert!(matches!(
            builder.adjusted_size(&shrink_to_zero),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_basic_rejects_bad_multipliers() {
        let builder = FeatureVectorBuilder::default();
        assert!(builder.basic(1000.0, Mode::Organic, 0.0, 1.0).is_err());
        assert!(builder.basic(1000.0, Mode::Organic, 1.0, f64::NAN).is_err());
    }
}
