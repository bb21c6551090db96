//! Cocomo SDK
//!
//! Shared library providing the error taxonomy, feature and sample types, wire
//! types, and the trait external predictive models implement.
//! This crate is used by the engine and by model integrations.

/// Error types and handling
pub mod errors;

/// Feature vector, sample and percentile types
pub mod types;

/// Request and response types
pub mod api;

/// External regression model trait
pub mod model;

// Re-export commonly used types
pub use api::{
    AdvancedEstimateRequest, AdvancedEstimateResponse, BasicEstimateRequest,
    BasicEstimateResponse, DistributionReport, ErrorResponse, MonteCarloRequest,
    MonteCarloResponse, ProjectCategory, SizingMethod,
};
pub use errors::{EngineError, EstimationErrorExt};
pub use model::RegressionModel;
pub use types::{FeatureLayout, FeatureVector, Percentiles, Sample};
