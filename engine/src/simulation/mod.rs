//! Monte Carlo simulation
//!
//! Each trial perturbs the inputs, predicts effort with the shared predictor
//! and derives schedule, team size and cost. Trial `i` draws from its own
//! `StdRng` seeded with [`trial_seed`]`(seed, i)`, a splitmix64 mix of the
//! base seed and the trial index. A run is reproducible from its seed and
//! does not depend on how trials are spread over threads. Runs under
//! neighbouring seeds share no trials.
//!
//! # Perturbation
//!
//! - **Basic**: size x U(0.8, 1.2), coefficient `a` x U(0.85, 1.15),
//!   reliability and complexity each drawn from U(0.7, 1.65)
//! - **Advanced**: size x U(0.85, 1.15), every driver code shifted by one of
//!   {-1, 0, +1} and clamped to 1..=6; SCED applied to each trial's effort
//!
//! A trial that yields a non-finite or non-positive value aborts the run
//! with `SimulationFailed`; the percentiles are never computed over it.

use crate::drivers::{DriverCodes, MAX_CODE, MIN_CODE};
use crate::features::{FeatureVectorBuilder, Mode};
use crate::predictor::{apply_sced, EffortPredictor};
use crate::schedule::{ScheduleBasis, ScheduleCalculator, ScheduleEstimate};
use crate::stats::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;
use sdk::api::DistributionReport;
use sdk::errors::EngineError;
use sdk::types::Sample;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

const BASIC_SIZE_SPREAD: f64 = 0.20;
const BASIC_COEFFICIENT_SPREAD: f64 = 0.15;
const BASIC_MULTIPLIER_RANGE: (f64, f64) = (0.7, 1.65);
const ADVANCED_SIZE_SPREAD: f64 = 0.15;

/// Settings for one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    pub iterations: u64,
    /// Base seed; trial `i` uses `trial_seed(seed, i)`
    pub seed: u64,
    pub parallel: bool,
}

impl SimulationConfig {
    pub fn new(iterations: u64, seed: Option<u64>, parallel: bool) -> Self {
        Self {
            iterations,
            seed: seed.unwrap_or_else(|| rand::thread_rng().next_u64()),
            parallel,
        }
    }
}

/// Lifecycle of a simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    Idle,
    Running { completed: u64, total: u64 },
    Completed { trials: u64 },
    Failed { trial: u64 },
}

/// Unperturbed inputs of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimulationInputs {
    Basic {
        size: f64,
        mode: Mode,
    },
    Advanced {
        /// Size after function-point conversion and RCPX
        size: f64,
        codes: DriverCodes,
        sced: Option<f64>,
    },
}

/// Perturbed inputs drawn for one trial
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrialInputs {
    Basic {
        size: f64,
        coefficient_factor: f64,
        reliability: f64,
        complexity: f64,
    },
    Advanced {
        size: f64,
        codes: DriverCodes,
    },
}

/// Shift a driver code and clamp it to the valid range
pub fn perturb_code(code: u8, delta: i8) -> u8 {
    let shifted = i16::from(code) + i16::from(delta);
    shifted.clamp(i16::from(MIN_CODE), i16::from(MAX_CODE)) as u8
}

impl TrialInputs {
    fn draw(inputs: &SimulationInputs, rng: &mut StdRng) -> Self {
        let (low, high) = BASIC_MULTIPLIER_RANGE;
        match *inputs {
            SimulationInputs::Basic { size, .. } => TrialInputs::Basic {
                size: size * rng.gen_range(1.0 - BASIC_SIZE_SPREAD..=1.0 + BASIC_SIZE_SPREAD),
                coefficient_factor: rng
                    .gen_range(1.0 - BASIC_COEFFICIENT_SPREAD..=1.0 + BASIC_COEFFICIENT_SPREAD),
                reliability: rng.gen_range(low..=high),
                complexity: rng.gen_range(low..=high),
            },
            SimulationInputs::Advanced { size, codes, .. } => {
                let size =
                    size * rng.gen_range(1.0 - ADVANCED_SIZE_SPREAD..=1.0 + ADVANCED_SIZE_SPREAD);
                let mut perturbed = codes;
                for code in perturbed.scale.iter_mut().chain(perturbed.cost.iter_mut()) {
                    *code = perturb_code(*code, rng.gen_range(-1..=1));
                }
                TrialInputs::Advanced {
                    size,
                    codes: perturbed,
                }
            }
        }
    }
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// RNG seed of one trial
///
/// The trial index is mixed before it meets the base seed, so `(s, i + 1)`
/// and `(s + 1, i)` land on unrelated streams.
pub fn trial_seed(seed: u64, trial: u64) -> u64 {
    splitmix64(seed ^ splitmix64(trial))
}

/// Per-metric distributions of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub effort: Distribution,
    pub schedule: Distribution,
    pub team_size: Distribution,
    pub cost: Distribution,
}

impl SimulationOutcome {
    fn from_samples(samples: &[Sample]) -> Result<Self, EngineError> {
        let column = |f: fn(&Sample) -> f64| samples.iter().map(f).collect::<Vec<f64>>();
        Ok(Self {
            effort: Distribution::from_samples(column(|s| s.effort))?,
            schedule: Distribution::from_samples(column(|s| s.schedule))?,
            team_size: Distribution::from_samples(column(|s| s.team_size))?,
            cost: Distribution::from_samples(column(|s| s.cost))?,
        })
    }

    pub fn trials(&self) -> usize {
        self.effort.len()
    }

    pub fn report(&self) -> DistributionReport {
        DistributionReport {
            effort: self.effort.summary(),
            schedule: self.schedule.summary(),
            team_size: self.team_size.summary(),
            cost: self.cost.summary(),
        }
    }
}

pub struct MonteCarloSimulator {
    predictor: Arc<dyn EffortPredictor>,
    calculator: ScheduleCalculator,
    builder: FeatureVectorBuilder,
    config: SimulationConfig,
    state: Mutex<SimulationState>,
    completed: AtomicU64,
}

impl MonteCarloSimulator {
    pub fn new(
        predictor: Arc<dyn EffortPredictor>,
        calculator: ScheduleCalculator,
        config: SimulationConfig,
    ) -> Self {
        Self {
            predictor,
            calculator,
            builder: FeatureVectorBuilder::default(),
            config,
            state: Mutex::new(SimulationState::Idle),
            completed: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> SimulationConfig {
        self.config
    }

    /// Current state; `Running` reports live progress
    pub fn state(&self) -> SimulationState {
        let state = *self.state.lock().unwrap_or_else(|e| e.into_inner());
        match state {
            SimulationState::Running { total, .. } => SimulationState::Running {
                completed: self.completed.load(Ordering::Relaxed),
                total,
            },
            other => other,
        }
    }

    fn set_state(&self, state: SimulationState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// Run every trial and summarize the samples
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for zero iterations and `SimulationFailed` for
    /// the first failing trial found. With parallel execution, which failing
    /// trial is reported first may vary between runs.
    pub fn simulate(&self, inputs: &SimulationInputs) -> Result<SimulationOutcome, EngineError> {
        let total = self.config.iterations;
        if total == 0 {
            return Err(EngineError::invalid_input("iterations must be at least 1"));
        }

        self.completed.store(0, Ordering::Relaxed);
        self.set_state(SimulationState::Running {
            completed: 0,
            total,
        });
        tracing::info!(
            "Starting simulation: {} trials, seed {}, predictor '{}', parallel={}",
            total,
            self.config.seed,
            self.predictor.name(),
            self.config.parallel
        );

        let samples: Result<Vec<Sample>, EngineError> = if self.config.parallel {
            (0..total)
                .into_par_iter()
                .map(|i| self.run_trial(i, inputs))
                .collect()
        } else {
            (0..total).map(|i| self.run_trial(i, inputs)).collect()
        };

        let outcome = samples.and_then(|samples| SimulationOutcome::from_samples(&samples));
        match &outcome {
            Ok(outcome) => {
                self.set_state(SimulationState::Completed {
                    trials: total,
                });
                tracing::info!(
                    "Simulation completed: median effort {:.2} PM over {} trials",
                    outcome.effort.summary().p50,
                    outcome.trials()
                );
            }
            Err(e) => {
                let trial = match e {
                    EngineError::SimulationFailed { trial, .. } => *trial,
                    _ => self.completed.load(Ordering::Relaxed),
                };
                self.set_state(SimulationState::Failed { trial });
                tracing::error!("Simulation aborted: {}", e);
            }
        }
        outcome
    }

    fn run_trial(&self, trial: u64, inputs: &SimulationInputs) -> Result<Sample, EngineError> {
        let mut rng = StdRng::seed_from_u64(trial_seed(self.config.seed, trial));
        let drawn = TrialInputs::draw(inputs, &mut rng);

        let sample = self
            .evaluate(inputs, &drawn)
            .and_then(|estimate| check_sample(estimate.sample()))
            .map_err(|e| EngineError::SimulationFailed {
                trial,
                inputs: format!("{:?}", drawn),
                reason: e.to_string(),
            })?;

        self.completed.fetch_add(1, Ordering::Relaxed);
        Ok(sample)
    }

    fn evaluate(
        &self,
        inputs: &SimulationInputs,
        drawn: &TrialInputs,
    ) -> Result<ScheduleEstimate, EngineError> {
        match (*inputs, *drawn) {
            (
                SimulationInputs::Basic { mode, .. },
                TrialInputs::Basic {
                    size,
                    coefficient_factor,
                    reliability,
                    complexity,
                },
            ) => {
                let features = self.builder.basic(size, mode, reliability, complexity)?;
                let effort = self
                    .predictor
                    .estimate_perturbed(&features, coefficient_factor)?;
                self.calculator.derive(effort, ScheduleBasis::Basic(mode))
            }
            (SimulationInputs::Advanced { sced, .. }, TrialInputs::Advanced { size, codes }) => {
                let features = self.builder.advanced(size, &codes)?;
                let effort = apply_sced(self.predictor.estimate(&features)?, sced)?;
                self.calculator.derive(
                    effort,
                    ScheduleBasis::Advanced {
                        scale_factor: codes.scale_factor(),
                    },
                )
            }
            _ => Err(EngineError::invalid_input(
                "trial inputs do not match the simulation inputs",
            )),
        }
    }
}

fn check_sample(sample: Sample) -> Result<Sample, EngineError> {
    let values = [
        ("effort", sample.effort),
        ("schedule", sample.schedule),
        ("team size", sample.team_size),
        ("cost", sample.cost),
    ];
    match values.iter().find(|(_, v)| !v.is_finite() || *v <= 0.0) {
        Some((name, value)) => Err(EngineError::numeric(format!("{} is {}", name, value))),
        None => Ok(sample),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::FormulaPredictor;

    fn simulator(iterations: u64, seed: u64, parallel: bool) -> MonteCarloSimulator {
        MonteCarloSimulator::new(
            Arc::new(FormulaPredictor::new()),
            ScheduleCalculator::default(),
            SimulationConfig {
                iterations,
                seed,
                parallel,
            },
        )
    }

    #[test]
    fn test_perturb_code_clamps() {
        assert_eq!(perturb_code(1, -1), 1);
        assert_eq!(perturb_code(6, 1), 6);
        assert_eq!(perturb_code(3, 1), 4);
        assert_eq!(perturb_code(3, -1), 2);
        assert_eq!(perturb_code(4, 0), 4);
    }

    #[test]
    fn test_basic_draws_stay_in_range() {
        let inputs = SimulationInputs::Basic {
            size: 10000.0,
            mode: Mode::Organic,
        };
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let TrialInputs::Basic {
                size,
                coefficient_factor,
                reliability,
                complexity,
            } = TrialInputs::draw(&inputs, &mut rng)
            else {
                panic!("expected basic trial inputs");
            };
            assert!((8000.0..=12000.0).contains(&size));
            assert!((0.85..=1.15).contains(&coefficient_factor));
            assert!((0.7..=1.65).contains(&reliability));
            assert!((0.7..=1.65).contains(&complexity));
        }
    }

    #[test]
    fn test_advanced_draws_stay_in_range() {
        let mut codes = DriverCodes::nominal();
        codes.scale = [1, 6, 1, 6, 1];
        let inputs = SimulationInputs::Advanced {
            size: 20000.0,
            codes,
            sced: None,
        };
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let TrialInputs::Advanced { size, codes: drawn } = TrialInputs::draw(&inputs, &mut rng)
            else {
                panic!("expected advanced trial inputs");
            };
            assert!((17000.0..=23000.0).contains(&size));
            for (before, after) in codes.scale.iter().zip(drawn.scale.iter()) {
                assert!((1..=6).contains(after));
                assert!((i16::from(*after) - i16::from(*before)).abs() <= 1);
            }
            assert!(drawn.cost.iter().all(|c| (1..=6).contains(c)));
        }
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let inputs = SimulationInputs::Basic {
            size: 50000.0,
            mode: Mode::SemiDetached,
        };
        let first = simulator(300, 42, true).simulate(&inputs).unwrap();
        let second = simulator(300, 42, true).simulate(&inputs).unwrap();
        let sequential = simulator(300, 42, false).simulate(&inputs).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, sequential);
    }

    #[test]
    fn test_trial_seeds_do_not_shift_with_base_seed() {
        for trial in 0..1000 {
            assert_ne!(trial_seed(1, trial + 1), trial_seed(2, trial));
            assert_ne!(trial_seed(1, trial), trial_seed(2, trial));
        }
    }

    #[test]
    fn test_adjacent_seeds_share_no_samples() {
        let inputs = SimulationInputs::Basic {
            size: 50000.0,
            mode: Mode::Organic,
        };
        let first = simulator(1000, 1, false).simulate(&inputs).unwrap();
        let second = simulator(1000, 2, false).simulate(&inputs).unwrap();
        let shared = first
            .effort
            .samples()
            .iter()
            .filter(|effort| second.effort.samples().contains(*effort))
            .count();
        assert_eq!(shared, 0);
        assert_ne!(first.report(), second.report());
    }

    #[test]
    fn test_state_transitions() {
        let sim = simulator(10, 1, false);
        assert_eq!(sim.state(), SimulationState::Idle);
        sim.simulate(&SimulationInputs::Basic {
            size: 1000.0,
            mode: Mode::Embedded,
        })
        .unwrap();
        assert_eq!(sim.state(), SimulationState::Completed { trials: 10 });
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let result = simulator(0, 1, true).simulate(&SimulationInputs::Basic {
            size: 1000.0,
            mode: Mode::Embedded,
        });
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_check_sample_rejects_zero_and_nan() {
        let good = Sample {
            effort: 1.0,
            schedule: 2.0,
            team_size: 0.5,
            cost: 10.0,
        };
        assert!(check_sample(good).is_ok());
        assert!(check_sample(Sample { effort: f64::NAN, ..good }).is_err());
        assert!(check_sample(Sample { team_size: 0.0, ..good }).is_err());
    }
}
