//! Estimation service
//!
//! Wires the pipeline for each request type:
//!
//! ```text
//! request -> DriverEncoder -> FeatureVectorBuilder -> EffortPredictor
//!         -> ScheduleCalculator                       (point estimate)
//!         -> MonteCarloSimulator -> percentiles        (distribution)
//! ```
//!
//! The predictor is selected once per request and handed to the simulator;
//! nothing is cached between requests.

use crate::config::Config;
use crate::drivers::DriverEncoder;
use crate::features::{FeatureVectorBuilder, Mode, SizeInput};
use crate::predictor::{
    advanced_predictor, apply_sced, basic_predictor, EffortPredictor, PredictorSource,
};
use crate::schedule::{ScheduleBasis, ScheduleCalculator};
use crate::simulation::{MonteCarloSimulator, SimulationConfig, SimulationInputs};
use sdk::api::{
    AdvancedEstimateRequest, AdvancedEstimateResponse, BasicEstimateRequest,
    BasicEstimateResponse, DistributionReport, MonteCarloRequest, MonteCarloResponse,
};
use sdk::errors::EngineError;
use std::sync::Arc;

/// Caller overrides for a Monte Carlo run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Takes precedence over the request and configured seeds
    pub seed: Option<u64>,
    /// Overrides `simulation.parallel`
    pub parallel: Option<bool>,
}

pub struct Estimator {
    config: Config,
    calculator: ScheduleCalculator,
    builder: FeatureVectorBuilder,
    encoder: DriverEncoder,
}

impl Estimator {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            calculator: ScheduleCalculator::new(config.estimation.cost_per_person_month),
            builder: FeatureVectorBuilder::new(config.estimation.fp_to_size_ratio),
            encoder: DriverEncoder::new(),
        }
    }

    /// Basic point estimate with the configured predictor
    pub fn estimate_basic(
        &self,
        request: &BasicEstimateRequest,
    ) -> Result<BasicEstimateResponse, EngineError> {
        let predictor = basic_predictor(&self.config.model);
        self.estimate_basic_with(request, predictor.as_ref())
    }

    pub fn estimate_basic_with(
        &self,
        request: &BasicEstimateRequest,
        predictor: &dyn EffortPredictor,
    ) -> Result<BasicEstimateResponse, EngineError> {
        let mode = Mode::parse_or_default(request.mode.as_deref())?;
        let features = self.builder.basic(
            request.size,
            mode,
            request.reliability.unwrap_or(1.0),
            request.complexity.unwrap_or(1.0),
        )?;

        let effort = predictor.estimate(&features)?;
        let estimate = self.calculator.derive(effort, ScheduleBasis::Basic(mode))?;

        tracing::info!(
            "Basic estimate ({}, {}): {:.2} PM over {:.2} months",
            mode,
            predictor.name(),
            estimate.effort,
            estimate.schedule
        );

        Ok(BasicEstimateResponse {
            effort: estimate.effort,
            schedule: estimate.schedule,
            team_size: estimate.team_size,
        })
    }

    /// Advanced point estimate, with risk analysis when requested
    ///
    /// # Errors
    ///
    /// Returns `PredictorUnavailable` when `source` is `Model` and no
    /// advanced model can be loaded.
    pub fn estimate_advanced(
        &self,
        request: &AdvancedEstimateRequest,
        source: PredictorSource,
    ) -> Result<AdvancedEstimateResponse, EngineError> {
        let predictor = advanced_predictor(&self.config.model, source)?;
        self.estimate_advanced_with(request, predictor)
    }

    pub fn estimate_advanced_with(
        &self,
        request: &AdvancedEstimateRequest,
        predictor: Arc<dyn EffortPredictor>,
    ) -> Result<AdvancedEstimateResponse, EngineError> {
        let size = self.builder.adjusted_size(&SizeInput {
            size: request.size,
            sizing_method: request.sizing_method,
            unadjusted_fp: request.unadjusted_fp,
            rcpx: request.rcpx,
        })?;
        let codes = self
            .encoder
            .encode_all(&request.scale_drivers, &request.cost_drivers);
        let features = self.builder.advanced(size, &codes)?;

        let effort = apply_sced(predictor.estimate(&features)?, request.sced)?;
        let estimate = self.calculator.derive(
            effort,
            ScheduleBasis::Advanced {
                scale_factor: codes.scale_factor(),
            },
        )?;

        let risk_analysis = if request.risk_analysis {
            let config = SimulationConfig::new(
                self.config.simulation.default_iterations,
                self.config.simulation.seed,
                self.config.simulation.parallel,
            );
            let inputs = SimulationInputs::Advanced {
                size,
                codes,
                sced: request.sced,
            };
            Some(self.run(Arc::clone(&predictor), config, &inputs)?)
        } else {
            None
        };

        tracing::info!(
            "Advanced estimate ({}): {:.2} PM over {:.2} months, {}",
            predictor.name(),
            estimate.effort,
            estimate.schedule,
            estimate.category()
        );

        Ok(AdvancedEstimateResponse {
            effort: estimate.effort,
            schedule: estimate.schedule,
            team_size: estimate.team_size,
            weeks: estimate.weeks,
            cost: estimate.cost,
            project_category: estimate.category(),
            risk_analysis,
        })
    }

    /// Basic-model Monte Carlo with the configured predictor
    pub fn monte_carlo(
        &self,
        request: &MonteCarloRequest,
        options: RunOptions,
    ) -> Result<MonteCarloResponse, EngineError> {
        let predictor = basic_predictor(&self.config.model);
        self.monte_carlo_with(request, options, predictor)
    }

    pub fn monte_carlo_with(
        &self,
        request: &MonteCarloRequest,
        options: RunOptions,
        predictor: Arc<dyn EffortPredictor>,
    ) -> Result<MonteCarloResponse, EngineError> {
        let mode = Mode::parse_or_default(request.mode.as_deref())?;
        crate::features::validate_size(request.size)?;
        let iterations = self.iterations(request.iterations)?;

        let config = SimulationConfig::new(
            iterations,
            options
                .seed
                .or(request.seed)
                .or(self.config.simulation.seed),
            options.parallel.unwrap_or(self.config.simulation.parallel),
        );
        let inputs = SimulationInputs::Basic {
            size: request.size,
            mode,
        };
        self.run(predictor, config, &inputs)
    }

    /// Resolve a requested trial count against the configured default and cap
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for zero, negative, or over-cap counts.
    pub fn iterations(&self, requested: Option<i64>) -> Result<u64, EngineError> {
        let settings = &self.config.simulation;
        let Some(requested) = requested else {
            return Ok(settings.default_iterations);
        };

        match u64::try_from(requested) {
            Ok(0) | Err(_) => Err(EngineError::InvalidInput(format!(
                "iterations must be a positive integer, got {}",
                requested
            ))),
            Ok(n) if n > settings.max_iterations => Err(EngineError::InvalidInput(format!(
                "iterations {} exceeds the maximum of {}",
                n, settings.max_iterations
            ))),
            Ok(n) => Ok(n),
        }
    }

    fn run(
        &self,
        predictor: Arc<dyn EffortPredictor>,
        config: SimulationConfig,
        inputs: &SimulationInputs,
    ) -> Result<DistributionReport, EngineError> {
        let simulator = MonteCarloSimulator::new(predictor, self.calculator, config);
        Ok(simulator.simulate(inputs)?.report())
    }
}
