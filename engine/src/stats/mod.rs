//! Percentile summaries of simulated samples
//!
//! Percentiles use the nearest-rank style rule without interpolation:
//! `index = floor(n * p / 100)` into the ascending-sorted samples. For small
//! `n` several named percentiles share an index; that is intended.
//! `max` is read from index `n - 1` directly, never through the rule.

use sdk::errors::EngineError;
use sdk::types::Percentiles;

/// Value at `floor(n * p / 100)` of an ascending-sorted slice
///
/// # Errors
///
/// Returns `Numeric` when the index falls outside the slice, which happens
/// for an empty slice or `p >= 100`.
pub fn percentile(sorted: &[f64], p: u32) -> Result<f64, EngineError> {
    let index = sorted.len() * p as usize / 100;
    sorted.get(index).copied().ok_or_else(|| {
        EngineError::Numeric(format!(
            "percentile {} index {} outside {} samples",
            p,
            index,
            sorted.len()
        ))
    })
}

/// Summarize an ascending-sorted slice
pub fn summarize(sorted: &[f64]) -> Result<Percentiles, EngineError> {
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Err(EngineError::invalid_input(
            "cannot summarize an empty sample set",
        ));
    };
    debug_assert!(sorted.windows(2).all(|pair| pair[0] <= pair[1]));

    Ok(Percentiles {
        min,
        p10: percentile(sorted, 10)?,
        p25: percentile(sorted, 25)?,
        p50: percentile(sorted, 50)?,
        p75: percentile(sorted, 75)?,
        p90: percentile(sorted, 90)?,
        max,
    })
}

/// Sorted samples of one metric with their precomputed summary
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    samples: Vec<f64>,
    summary: Percentiles,
}

impl Distribution {
    /// Sort the samples ascending and summarize them
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty buffer and `Numeric` if any sample
    /// is not finite.
    pub fn from_samples(mut samples: Vec<f64>) -> Result<Self, EngineError> {
        if let Some(bad) = samples.iter().find(|v| !v.is_finite()) {
            return Err(EngineError::Numeric(format!(
                "cannot summarize non-finite sample {}",
                bad
            )));
        }
        samples.sort_by(f64::total_cmp);
        let summary = summarize(&samples)?;
        Ok(Self { samples, summary })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn summary(&self) -> Percentiles {
        self.summary
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
