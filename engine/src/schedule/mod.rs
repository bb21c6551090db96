//! Schedule, team size and cost derivation
//!
//! - Basic: `schedule = 2.5 * effort^k`, `k` per mode (0.38 / 0.35 / 0.32)
//! - Advanced: `schedule = 3.67 * effort^(0.28 + 0.2 * (E - 0.91))` with
//!   `E = 0.91 + 0.01 * scale_factor`
//!
//! `team_size = effort / schedule` is guarded: a schedule that is not a
//! positive finite number is a `Numeric` error, never infinity or NaN.

use crate::features::Mode;
use sdk::api::ProjectCategory;
use sdk::errors::EngineError;
use sdk::types::Sample;

/// Default cost of one person-month
pub const DEFAULT_COST_PER_PERSON_MONTH: f64 = 10_000.0;

/// Average weeks in a calendar month
pub const WEEKS_PER_MONTH: f64 = 4.33;

/// Effort exponent of the advanced model
pub fn effort_exponent(scale_factor: f64) -> f64 {
    0.91 + 0.01 * scale_factor
}

/// What the schedule formula is keyed on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScheduleBasis {
    Basic(Mode),
    /// Sum of the five scale driver codes
    Advanced { scale_factor: f64 },
}

/// Derived schedule figures for one effort value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleEstimate {
    pub effort: f64,
    pub schedule: f64,
    pub team_size: f64,
    pub weeks: f64,
    pub cost: f64,
}

impl ScheduleEstimate {
    pub fn category(&self) -> ProjectCategory {
        ProjectCategory::from_effort(self.effort)
    }

    pub fn sample(&self) -> Sample {
        Sample {
            effort: self.effort,
            schedule: self.schedule,
            team_size: self.team_size,
            cost: self.cost,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScheduleCalculator {
    cost_per_person_month: f64,
}

impl ScheduleCalculator {
    pub fn new(cost_per_person_month: f64) -> Self {
        Self {
            cost_per_person_month,
        }
    }

    /// Calendar months for an effort value
    pub fn schedule(&self, effort: f64, basis: ScheduleBasis) -> f64 {
        match basis {
            ScheduleBasis::Basic(mode) => 2.5 * effort.powf(mode.schedule_exponent()),
            ScheduleBasis::Advanced { scale_factor } => {
                let exponent = effort_exponent(scale_factor);
                3.67 * effort.powf(0.28 + 0.2 * (exponent - 0.91))
            }
        }
    }

    /// Derive schedule, team size, weeks and cost
    ///
    /// # Errors
    ///
    /// Returns `Numeric` if effort is not finite, if the schedule is not a
    /// positive finite number (effort 0 drives it to 0), or if team size is
    /// not finite.
    pub fn derive(&self, effort: f64, basis: ScheduleBasis) -> Result<ScheduleEstimate, EngineError> {
        if !effort.is_finite() {
            return Err(EngineError::Numeric(format!(
                "effort is not finite ({})",
                effort
            )));
        }

        let schedule = self.schedule(effort, basis);
        if !schedule.is_finite() || schedule <= 0.0 {
            return Err(EngineError::Numeric(format!(
                "schedule {} for effort {} is not positive; team size is undefined",
                schedule, effort
            )));
        }

        let team_size = effort / schedule;
        if !team_size.is_finite() {
            return Err(EngineError::Numeric(format!(
                "team size is not finite (effort {}, schedule {})",
                effort, schedule
            )));
        }

        Ok(ScheduleEstimate {
            effort,
            schedule,
            team_size,
            weeks: schedule * WEEKS_PER_MONTH,
            cost: effort * self.cost_per_person_month,
        })
    }
}

impl Default for ScheduleCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_COST_PER_PERSON_MONTH)
    }
}
