//! Integration tests for the Monte Carlo simulator
//!
//! Covers reproducibility across execution strategies, failure reporting for
//! degenerate predictors, and the state machine.

use cocomo_engine::drivers::DriverCodes;
use cocomo_engine::features::Mode;
use cocomo_engine::predictor::{EffortPredictor, FormulaPredictor, ModelPredictor};
use cocomo_engine::schedule::ScheduleCalculator;
use cocomo_engine::simulation::{
    MonteCarloSimulator, SimulationConfig, SimulationInputs, SimulationState,
};
use sdk::errors::EngineError;
use sdk::model::RegressionModel;
use sdk::types::{FeatureLayout, FeatureVector};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Returns a fixed effort for every input
struct ConstantModel {
    effort: f64,
    width: usize,
}

impl RegressionModel for ConstantModel {
    fn name(&self) -> &str {
        "constant"
    }

    fn feature_count(&self) -> usize {
        self.width
    }

    fn predict(&self, _features: &[f64]) -> Result<f64, EngineError> {
        Ok(self.effort)
    }
}

/// Counts calls and reports the perturbed size as effort
struct SizeEchoPredictor {
    calls: AtomicU64,
}

impl EffortPredictor for SizeEchoPredictor {
    fn name(&self) -> &str {
        "size-echo"
    }

    fn estimate(&self, features: &FeatureVector) -> Result<f64, EngineError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(features.size() / 1000.0)
    }
}

fn config(iterations: u64, seed: u64, parallel: bool) -> SimulationConfig {
    SimulationConfig {
        iterations,
        seed,
        parallel,
    }
}

fn constant_predictor(effort: f64, layout: FeatureLayout) -> Arc<dyn EffortPredictor> {
    let model = Arc::new(ConstantModel {
        effort,
        width: layout.len(),
    });
    Arc::new(ModelPredictor::new(model, layout).unwrap())
}

fn advanced_inputs() -> SimulationInputs {
    SimulationInputs::Advanced {
        size: 40000.0,
        codes: DriverCodes::nominal(),
        sced: None,
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let predictor: Arc<dyn EffortPredictor> = Arc::new(FormulaPredictor::new());
    let inputs = advanced_inputs();

    let parallel = MonteCarloSimulator::new(
        Arc::clone(&predictor),
        ScheduleCalculator::default(),
        config(2000, 99, true),
    )
    .simulate(&inputs)
    .unwrap();
    let sequential = MonteCarloSimulator::new(
        predictor,
        ScheduleCalculator::default(),
        config(2000, 99, false),
    )
    .simulate(&inputs)
    .unwrap();

    assert_eq!(parallel.report(), sequential.report());
    assert_eq!(parallel.effort.samples(), sequential.effort.samples());
}

#[test]
fn test_different_seeds_differ() {
    let predictor: Arc<dyn EffortPredictor> = Arc::new(FormulaPredictor::new());
    let inputs = SimulationInputs::Basic {
        size: 20000.0,
        mode: Mode::Organic,
    };
    let a = MonteCarloSimulator::new(
        Arc::clone(&predictor),
        ScheduleCalculator::default(),
        config(100, 1, true),
    )
    .simulate(&inputs)
    .unwrap();
    let b = MonteCarloSimulator::new(predictor, ScheduleCalculator::default(), config(100, 2, true))
        .simulate(&inputs)
        .unwrap();
    assert_ne!(a.report(), b.report());
}

#[test]
fn test_every_trial_calls_predictor_once() {
    let predictor = Arc::new(SizeEchoPredictor {
        calls: AtomicU64::new(0),
    });
    let simulator = MonteCarloSimulator::new(
        Arc::clone(&predictor) as Arc<dyn EffortPredictor>,
        ScheduleCalculator::default(),
        config(750, 3, true),
    );
    let outcome = simulator.simulate(&advanced_inputs()).unwrap();

    assert_eq!(predictor.calls.load(Ordering::Relaxed), 750);
    assert_eq!(outcome.trials(), 750);
    // size +/-15% around 40 KLOC
    assert!(outcome.effort.summary().min >= 34.0 - 1e-9);
    assert!(outcome.effort.summary().max <= 46.0 + 1e-9);
}

#[test]
fn test_basic_size_spread() {
    let predictor = Arc::new(SizeEchoPredictor {
        calls: AtomicU64::new(0),
    });
    let outcome = MonteCarloSimulator::new(
        predictor,
        ScheduleCalculator::default(),
        config(500, 8, true),
    )
    .simulate(&SimulationInputs::Basic {
        size: 10000.0,
        mode: Mode::Embedded,
    })
    .unwrap();

    // size +/-20% around 10 KLOC
    assert!(outcome.effort.summary().min >= 8.0 - 1e-9);
    assert!(outcome.effort.summary().max <= 12.0 + 1e-9);
}

#[test]
fn test_zero_effort_fails_with_trial_report() {
    let simulator = MonteCarloSimulator::new(
        constant_predictor(0.0, FeatureLayout::Basic),
        ScheduleCalculator::default(),
        config(50, 5, false),
    );
    let result = simulator.simulate(&SimulationInputs::Basic {
        size: 10000.0,
        mode: Mode::Organic,
    });

    match result {
        Err(EngineError::SimulationFailed {
            trial,
            inputs,
            reason,
        }) => {
            assert_eq!(trial, 0);
            assert!(inputs.contains("size"));
            assert!(!reason.is_empty());
        }
        other => panic!("expected SimulationFailed, got {:?}", other),
    }
    assert_eq!(simulator.state(), SimulationState::Failed { trial: 0 });
}

#[test]
fn test_nan_effort_fails_in_parallel() {
    let simulator = MonteCarloSimulator::new(
        constant_predictor(f64::NAN, FeatureLayout::Advanced),
        ScheduleCalculator::default(),
        config(200, 5, true),
    );
    let result = simulator.simulate(&advanced_inputs());

    assert!(matches!(result, Err(EngineError::SimulationFailed { .. })));
    assert!(matches!(simulator.state(), SimulationState::Failed { .. }));
}

#[test]
fn test_sced_applied_per_trial() {
    let inputs_with = SimulationInputs::Advanced {
        size: 40000.0,
        codes: DriverCodes::nominal(),
        sced: Some(50.0),
    };
    let predictor = constant_predictor(10.0, FeatureLayout::Advanced);

    let outcome = MonteCarloSimulator::new(
        predictor,
        ScheduleCalculator::default(),
        config(20, 4, true),
    )
    .simulate(&inputs_with)
    .unwrap();

    assert!(outcome.effort.samples().iter().all(|&e| (e - 15.0).abs() < 1e-9));
}

#[test]
fn test_completed_state_and_config() {
    let simulator = MonteCarloSimulator::new(
        Arc::new(FormulaPredictor::new()),
        ScheduleCalculator::default(),
        config(25, 10, true),
    );
    assert_eq!(simulator.state(), SimulationState::Idle);
    assert_eq!(simulator.config().iterations, 25);

    simulator.simulate(&advanced_inputs()).unwrap();
    assert_eq!(simulator.state(), SimulationState::Completed { trials: 25 });
}
