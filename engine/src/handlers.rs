//! Command handlers
//!
//! Each handler reads a JSON request, runs it through the [`Estimator`] and
//! writes exactly one JSON object to stdout.

use crate::config::Config;
use crate::drivers;
use crate::estimator::{Estimator, RunOptions};
use crate::predictor::PredictorSource;
use anyhow::{Context, Result};
use sdk::api::{AdvancedEstimateRequest, BasicEstimateRequest, MonteCarloRequest};
use sdk::errors::EngineError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Read;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single-line JSON
    Compact,
    /// Indented JSON
    Pretty,
}

/// Read a request document from the argument, or stdin when it is absent or "-"
pub fn read_request_text(argument: Option<&str>) -> Result<String> {
    match argument {
        Some(text) if text != "-" => Ok(text.to_string()),
        _ => read_document(&mut std::io::stdin()).context("Failed to read request from stdin"),
    }
}

fn read_document<R: Read>(reader: &mut R) -> Result<String, EngineError> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Parse a request document; malformed JSON is an input error
pub fn parse_request<T: DeserializeOwned>(text: &str) -> Result<T, EngineError> {
    serde_json::from_str(text)
        .map_err(|e| EngineError::InvalidInput(format!("Malformed request: {}", e)))
}

/// Render a response in the chosen format
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Compact => serde_json::to_string(value)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
    };
    Ok(rendered)
}

fn emit<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}

/// Basic point estimate
pub fn handle_basic(request: Option<String>, config: &Config, format: OutputFormat) -> Result<()> {
    let request: BasicEstimateRequest = parse_request(&read_request_text(request.as_deref())?)?;
    tracing::debug!("Basic request: {:?}", request);

    let response = Estimator::new(config).estimate_basic(&request)?;
    emit(&response, format)
}

/// Advanced point estimate
pub fn handle_advanced(
    request: Option<String>,
    formula: bool,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let request: AdvancedEstimateRequest =
        parse_request(&read_request_text(request.as_deref())?)?;
    tracing::debug!("Advanced request: {:?}", request);

    let source = if formula {
        PredictorSource::Formula
    } else {
        PredictorSource::Model
    };
    let response = Estimator::new(config).estimate_advanced(&request, source)?;
    emit(&response, format)
}

/// Basic-model Monte Carlo distribution
pub fn handle_monte_carlo(
    request: Option<String>,
    seed: Option<u64>,
    sequential: bool,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let request: MonteCarloRequest = parse_request(&read_request_text(request.as_deref())?)?;
    tracing::debug!("Monte Carlo request: {:?}", request);

    let options = RunOptions {
        seed,
        parallel: sequential.then_some(false),
    };
    let response = Estimator::new(config).monte_carlo(&request, options)?;
    emit(&response, format)
}

/// Driver catalogue
pub fn handle_drivers(format: OutputFormat) -> Result<()> {
    emit(&drivers::catalogue(), format)
}

/// Effective configuration as TOML
pub fn handle_config_show(config: &Config) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
