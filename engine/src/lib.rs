//! Cocomo Engine Library
//!
//! This library provides the estimation and simulation core of the cocomo
//! tool. It is used by both the main binary and integration tests.

/// Configuration management module
pub mod config;

/// Scale and cost driver encoding
pub mod drivers;

/// Feature vector construction
pub mod features;

/// Effort predictors (formula and trained model)
pub mod predictor;

/// Schedule, team size and cost derivation
pub mod schedule;

/// Monte Carlo simulation
pub mod simulation;

/// Percentile summaries
pub mod stats;

/// Estimation service wiring the pipeline together
pub mod estimator;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
