//! Schedule configuration stored as JSON
//!
//! One configuration = one table: policy, drivetrain, engine limits, speed
//! range and minimum dwell. Missing fields take the stock heavy-truck
//! values.

use crate::builder::{BuildReport, ScheduleBuilder};
use crate::drivetrain::{DrivetrainPreset, GearRatios};
use crate::engine::TruckEngine;
use crate::error::Result;
use crate::policy::ShiftPolicy;
use crate::table::ShiftTable;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Engine section of a schedule configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Peak torque in N·m for the reference truck model
    pub rating: f64,
    /// Idle RPM
    pub idle_rpm: f64,
    /// Nominal peak RPM
    pub peak_rpm: f64,
    /// Redline RPM
    pub maximum_rpm: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rating: 3550.0,
            idle_rpm: 400.0,
            peak_rpm: 1750.0,
            maximum_rpm: 2100.0,
        }
    }
}

impl EngineConfig {
    /// Instantiate the reference engine model
    pub fn engine(&self) -> Result<TruckEngine> {
        TruckEngine::new(self.rating, self.idle_rpm, self.peak_rpm, self.maximum_rpm)
    }
}

/// Complete description of one shift schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Gear selection policy
    #[serde(default)]
    pub policy: ShiftPolicy,

    /// Gear ratio profile
    #[serde(default)]
    pub drivetrain: DrivetrainPreset,

    /// Reference engine parameters
    #[serde(default)]
    pub engine: EngineConfig,

    /// Highest speed bin in the table
    #[serde(default = "default_maximum_speed")]
    pub maximum_speed: u32,

    /// Minimum consecutive speed bins per gear
    #[serde(default = "default_minimum_dwell_bins")]
    pub minimum_dwell_bins: usize,
}

fn default_maximum_speed() -> u32 {
    150
}

fn default_minimum_dwell_bins() -> usize {
    3
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            policy: ShiftPolicy::default(),
            drivetrain: DrivetrainPreset::default(),
            engine: EngineConfig::default(),
            maximum_speed: default_maximum_speed(),
            minimum_dwell_bins: default_minimum_dwell_bins(),
        }
    }
}

impl ScheduleConfig {
    /// Parse a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serialize as pretty JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// Validated gear ratios for the configured drivetrain
    pub fn gear_ratios(&self) -> Result<GearRatios> {
        self.drivetrain.gear_ratios()
    }

    /// Validate everything and build the finished table with the reference
    /// engine model
    pub fn build(&self) -> Result<ShiftTable> {
        Ok(self.build_with_report()?.0)
    }

    /// Like [`build`](Self::build), also returning build diagnostics
    pub fn build_with_report(&self) -> Result<(ShiftTable, BuildReport)> {
        let ratios = self.gear_ratios()?;
        let engine = self.engine.engine()?;
        Ok(ScheduleBuilder::new(&engine, &ratios, self.maximum_speed)
            .build(self.policy, self.minimum_dwell_bins))
    }
}
