//! Driver encoding module
//!
//! This module maps categorical COCOMO II driver ratings to ordinal codes in
//! `[1, 6]`. Two driver families exist, with opposite code directions:
//!
//! - **Scale drivers** (5): Very Low = 6 ... Extra High = 1, nominal = 4.
//!   Lower codes are more favorable and shrink the effort exponent.
//! - **Cost drivers** (16): Very Low = 1 ... Extra High = 6, nominal = 3.
//!
//! # Tolerance
//!
//! A missing label, or label text that is not one of the six canonical
//! strings, encodes as the driver's nominal code. This is never an error.
//! Unknown driver *names* in a request are ignored with a warning.

use sdk::types::{COST_DRIVER_COUNT, SCALE_DRIVER_COUNT};
use serde::Serialize;
use std::collections::HashMap;

/// Lowest valid driver code
pub const MIN_CODE: u8 = 1;

/// Highest valid driver code
pub const MAX_CODE: u8 = 6;

/// Nominal code of every scale driver
pub const SCALE_NOMINAL_CODE: u8 = 4;

/// Nominal code of every cost driver
pub const COST_NOMINAL_CODE: u8 = 3;

/// Canonical rating labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rating {
    VeryLow,
    Low,
    Nominal,
    High,
    VeryHigh,
    ExtraHigh,
}

impl Rating {
    /// All ratings, lowest first
    pub const ALL: [Rating; 6] = [
        Rating::VeryLow,
        Rating::Low,
        Rating::Nominal,
        Rating::High,
        Rating::VeryHigh,
        Rating::ExtraHigh,
    ];

    /// Parse one of the six canonical label strings (exact match)
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Very Low" => Some(Rating::VeryLow),
            "Low" => Some(Rating::Low),
            "Nominal" => Some(Rating::Nominal),
            "High" => Some(Rating::High),
            "Very High" => Some(Rating::VeryHigh),
            "Extra High" => Some(Rating::ExtraHigh),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::VeryLow => "Very Low",
            Rating::Low => "Low",
            Rating::Nominal => "Nominal",
            Rating::High => "High",
            Rating::VeryHigh => "Very High",
            Rating::ExtraHigh => "Extra High",
        }
    }

    /// Position in the rating scale, Very Low = 1
    fn ordinal(&self) -> u8 {
        match self {
            Rating::VeryLow => 1,
            Rating::Low => 2,
            Rating::Nominal => 3,
            Rating::High => 4,
            Rating::VeryHigh => 5,
            Rating::ExtraHigh => 6,
        }
    }
}

/// Project-level factors that shape the effort exponent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleDriver {
    Precedentedness,
    DevelopmentFlexibility,
    ArchitectureResolution,
    TeamCohesion,
    ProcessMaturity,
}

impl ScaleDriver {
    /// Fixed feature-vector order
    pub const ALL: [ScaleDriver; SCALE_DRIVER_COUNT] = [
        ScaleDriver::Precedentedness,
        ScaleDriver::DevelopmentFlexibility,
        ScaleDriver::ArchitectureResolution,
        ScaleDriver::TeamCohesion,
        ScaleDriver::ProcessMaturity,
    ];

    /// Request key
    pub fn key(&self) -> &'static str {
        match self {
            ScaleDriver::Precedentedness => "precedentedness",
            ScaleDriver::DevelopmentFlexibility => "developmentFlexibility",
            ScaleDriver::ArchitectureResolution => "architectureResolution",
            ScaleDriver::TeamCohesion => "teamCohesion",
            ScaleDriver::ProcessMaturity => "processMaturity",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "precedentedness" => Some(ScaleDriver::Precedentedness),
            "developmentFlexibility" => Some(ScaleDriver::DevelopmentFlexibility),
            "architectureResolution" => Some(ScaleDriver::ArchitectureResolution),
            "teamCohesion" => Some(ScaleDriver::TeamCohesion),
            // Older clients send the misspelled key
            "processMaturity" | "processMaturiy" => Some(ScaleDriver::ProcessMaturity),
            _ => None,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Factors that scale effort through a multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CostDriver {
    Reliability,
    DatabaseSize,
    Complexity,
    Reusability,
    Documentation,
    ExecutionTimeConstraint,
    StorageConstraint,
    PlatformVolatility,
    AnalystCapability,
    ProgrammerCapability,
    ApplicationExperience,
    PlatformExperience,
    LanguageExperience,
    ToolUse,
    MultisiteDevelopment,
    Schedule,
}

impl CostDriver {
    /// Fixed feature-vector order
    pub const ALL: [CostDriver; COST_DRIVER_COUNT] = [
        CostDriver::Reliability,
        CostDriver::DatabaseSize,
        CostDriver::Complexity,
        CostDriver::Reusability,
        CostDriver::Documentation,
        CostDriver::ExecutionTimeConstraint,
        CostDriver::StorageConstraint,
        CostDriver::PlatformVolatility,
        CostDriver::AnalystCapability,
        CostDriver::ProgrammerCapability,
        CostDriver::ApplicationExperience,
        CostDriver::PlatformExperience,
        CostDriver::LanguageExperience,
        CostDriver::ToolUse,
        CostDriver::MultisiteDevelopment,
        CostDriver::Schedule,
    ];

    /// Request key
    pub fn key(&self) -> &'static str {
        match self {
            CostDriver::Reliability => "reliability",
            CostDriver::DatabaseSize => "databaseSize",
            CostDriver::Complexity => "complexity",
            CostDriver::Reusability => "reusability",
            CostDriver::Documentation => "documentation",
            CostDriver::ExecutionTimeConstraint => "executionTimeConstraint",
            CostDriver::StorageConstraint => "storageConstraint",
            CostDriver::PlatformVolatility => "platformVolatility",
            CostDriver::AnalystCapability => "analystCapability",
            CostDriver::ProgrammerCapability => "programmerCapability",
            CostDriver::ApplicationExperience => "applicationExperience",
            CostDriver::PlatformExperience => "platformExperience",
            CostDriver::LanguageExperience => "languageExperience",
            CostDriver::ToolUse => "toolUse",
            CostDriver::MultisiteDevelopment => "multisiteDevelopment",
            CostDriver::Schedule => "schedule",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|driver| driver.key() == key)
    }

    /// Ratings the COCOMO II.2000 multiplier tables define for this driver
    ///
    /// Informational only; encoding accepts every canonical label.
    pub fn defined_ratings(&self) -> &'static [Rating] {
        use Rating::*;
        match self {
            CostDriver::Reliability
            | CostDriver::Documentation
            | CostDriver::AnalystCapability
            | CostDriver::ProgrammerCapability
            | CostDriver::ApplicationExperience
            | CostDriver::PlatformExperience
            | CostDriver::LanguageExperience
            | CostDriver::ToolUse
            | CostDriver::Schedule => &[VeryLow, Low, Nominal, High, VeryHigh],
            CostDriver::DatabaseSize | CostDriver::PlatformVolatility => {
                &[Low, Nominal, High, VeryHigh]
            }
            CostDriver::Complexity | CostDriver::MultisiteDevelopment => &Rating::ALL,
            CostDriver::Reusability => &[Low, Nominal, High, VeryHigh, ExtraHigh],
            CostDriver::ExecutionTimeConstraint | CostDriver::StorageConstraint => {
                &[Nominal, High, VeryHigh, ExtraHigh]
            }
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Any recognized driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Driver {
    Scale(ScaleDriver),
    Cost(CostDriver),
}

impl Driver {
    /// Look up a driver by request key, scale drivers first
    pub fn from_key(key: &str) -> Option<Self> {
        ScaleDriver::from_key(key)
            .map(Driver::Scale)
            .or_else(|| CostDriver::from_key(key).map(Driver::Cost))
    }

    /// Code used when the label is missing or unrecognized
    pub fn nominal_code(&self) -> u8 {
        match self {
            Driver::Scale(_) => SCALE_NOMINAL_CODE,
            Driver::Cost(_) => COST_NOMINAL_CODE,
        }
    }
}

/// Stateless label-to-code encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct DriverEncoder;

impl DriverEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode a rating label for a driver
    ///
    /// # Examples
    ///
    /// ```
    /// use cocomo_engine::drivers::{CostDriver, Driver, DriverEncoder, ScaleDriver};
    ///
    /// let encoder = DriverEncoder::new();
    /// let scale = Driver::Scale(ScaleDriver::TeamCohesion);
    /// assert_eq!(encoder.encode(scale, Some("Very Low")), 6);
    /// assert_eq!(encoder.encode(scale, Some("Nominal")), 4);
    /// assert_eq!(encoder.encode(scale, Some("nominal")), 4);
    ///
    /// let cost = Driver::Cost(CostDriver::Complexity);
    /// assert_eq!(encoder.encode(cost, Some("Very Low")), 1);
    /// assert_eq!(encoder.encode(cost, None), 3);
    /// ```
    pub fn encode(&self, driver: Driver, label: Option<&str>) -> u8 {
        let Some(rating) = label.and_then(Rating::from_label) else {
            return driver.nominal_code();
        };

        match driver {
            Driver::Scale(_) => MAX_CODE + 1 - rating.ordinal(),
            Driver::Cost(_) => rating.ordinal(),
        }
    }

    /// Encode a request's driver maps into fixed-order codes
    pub fn encode_all(
        &self,
        scale_labels: &HashMap<String, String>,
        cost_labels: &HashMap<String, String>,
    ) -> DriverCodes {
        let mut codes = DriverCodes::nominal();

        for (key, label) in scale_labels {
            match ScaleDriver::from_key(key) {
                Some(driver) => {
                    codes.scale[driver.index()] =
                        self.encode(Driver::Scale(driver), Some(label.as_str()));
                }
                None => tracing::warn!("Ignoring unknown scale driver '{}'", key),
            }
        }

        for (key, label) in cost_labels {
            match CostDriver::from_key(key) {
                Some(driver) => {
                    codes.cost[driver.index()] =
                        self.encode(Driver::Cost(driver), Some(label.as_str()));
                }
                None => tracing::warn!("Ignoring unknown cost driver '{}'", key),
            }
        }

        codes
    }
}

/// Encoded driver codes in feature-vector order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverCodes {
    pub scale: [u8; SCALE_DRIVER_COUNT],
    pub cost: [u8; COST_DRIVER_COUNT],
}

impl DriverCodes {
    /// Every driver at its nominal code
    pub fn nominal() -> Self {
        Self {
            scale: [SCALE_NOMINAL_CODE; SCALE_DRIVER_COUNT],
            cost: [COST_NOMINAL_CODE; COST_DRIVER_COUNT],
        }
    }

    /// Sum of the scale driver codes
    pub fn scale_factor(&self) -> f64 {
        self.scale.iter().map(|&code| f64::from(code)).sum()
    }
}

impl Default for DriverCodes {
    fn default() -> Self {
        Self::nominal()
    }
}

/// Catalogue entry describing one driver
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverInfo {
    pub key: &'static str,
    pub category: &'static str,
    pub nominal_code: u8,
    pub ratings: Vec<&'static str>,
}

/// All recognized drivers, scale drivers first, in feature-vector order
pub fn catalogue() -> Vec<DriverInfo> {
    let scale = ScaleDriver::ALL.iter().map(|driver| DriverInfo {
        key: driver.key(),
        category: "scale",
        nominal_code: SCALE_NOMINAL_CODE,
        ratings: Rating::ALL.iter().map(Rating::label).collect(),
    });

    let cost = CostDriver::ALL.iter().map(|driver| DriverInfo {
        key: driver.key(),
        category: "cost",
        nominal_code: COST_NOMINAL_CODE,
        ratings: driver.defined_ratings().iter().map(Rating::label).collect(),
    });

    scale.chain(cost).collect()
}
