//! JSON request and response types
//!
//! Field names follow the camelCase wire format. Every response is a single
//! JSON object; failures are reported as [`ErrorResponse`].

use crate::types::Percentiles;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Basic point estimate request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicEstimateRequest {
    /// Size in source lines
    #[serde(alias = "softwareSize")]
    pub size: f64,

    /// Development mode (defaults to embedded)
    #[serde(default)]
    pub mode: Option<String>,

    /// Reliability multiplier (defaults to 1.0)
    #[serde(default)]
    pub reliability: Option<f64>,

    /// Complexity multiplier (defaults to 1.0)
    #[serde(default)]
    pub complexity: Option<f64>,
}

/// How the request expresses project size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SizingMethod {
    /// Source lines of code
    #[default]
    #[serde(rename = "SLOC")]
    Sloc,
    /// Unadjusted function points
    #[serde(rename = "Function Points")]
    FunctionPoints,
}

/// Advanced point estimate request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedEstimateRequest {
    /// Size in source lines (or function points, see `sizing_method`)
    pub size: f64,

    #[serde(default)]
    pub sizing_method: SizingMethod,

    /// Scale driver key to rating label
    #[serde(default)]
    pub scale_drivers: HashMap<String, String>,

    /// Cost driver key to rating label
    #[serde(default)]
    pub cost_drivers: HashMap<String, String>,

    /// Unadjusted function point count
    #[serde(default, rename = "unadjustedFP", alias = "unadustedFP")]
    pub unadjusted_fp: Option<f64>,

    /// Schedule compression/expansion percentage
    #[serde(default)]
    pub sced: Option<f64>,

    /// Risk/complexity size adjustment percentage
    #[serde(default)]
    pub rcpx: Option<f64>,

    /// Attach a Monte Carlo risk analysis to the response
    #[serde(default)]
    pub risk_analysis: bool,
}

/// Monte Carlo request (basic model)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonteCarloRequest {
    pub size: f64,

    #[serde(default)]
    pub mode: Option<String>,

    /// Trial count; signed so that negative input is reported, not wrapped
    #[serde(default)]
    pub iterations: Option<i64>,

    /// Fixed seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Basic point estimate response
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicEstimateResponse {
    pub effort: f64,
    pub schedule: f64,
    pub team_size: f64,
}

/// Informational size class of a project by effort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectCategory {
    #[serde(rename = "Very Small")]
    VerySmall,
    #[serde(rename = "Small")]
    Small,
    #[serde(rename = "Medium")]
    Medium,
    #[serde(rename = "Large")]
    Large,
    #[serde(rename = "Very Large")]
    VeryLarge,
}

impl ProjectCategory {
    /// Classify by effort in person-months
    pub fn from_effort(effort: f64) -> Self {
        if effort < 2.0 {
            ProjectCategory::VerySmall
        } else if effort < 8.0 {
            ProjectCategory::Small
        } else if effort < 24.0 {
            ProjectCategory::Medium
        } else if effort < 300.0 {
            ProjectCategory::Large
        } else {
            ProjectCategory::VeryLarge
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectCategory::VerySmall => "Very Small",
            ProjectCategory::Small => "Small",
            ProjectCategory::Medium => "Medium",
            ProjectCategory::Large => "Large",
            ProjectCategory::VeryLarge => "Very Large",
        }
    }
}

impl fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Percentile summaries of every simulated metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionReport {
    pub effort: Percentiles,
    pub schedule: Percentiles,
    pub team_size: Percentiles,
    pub cost: Percentiles,
}

/// Advanced point estimate response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedEstimateResponse {
    pub effort: f64,
    pub schedule: f64,
    pub team_size: f64,
    pub weeks: f64,
    pub cost: f64,
    pub project_category: ProjectCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_analysis: Option<DistributionReport>,
}

/// Monte Carlo response
pub type MonteCarloResponse = DistributionReport;

/// Payload printed to stderr when a request fails
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
