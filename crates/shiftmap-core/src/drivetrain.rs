//! Gear Ratio Table
//!
//! Converts road speed to engine RPM per gear: `rpm = ratio[gear] * speed`.
//! Gears are numbered from 1 (lowest) to `gears()` (highest).

use crate::error::{Result, ScheduleError};
use serde::{Deserialize, Serialize};

/// Axle-side scaling shared by both built-in gearboxes
const FINAL_DRIVE: f64 = 18.3 / 3.6;

const STANDARD_RATIOS: [f64; 12] = [
    9.16, 7.33, 5.82, 4.66, 3.72, 3.0, 2.44, 1.96, 1.55, 1.24, 1.0, 0.8,
];
const STANDARD_DIFFERENTIAL: f64 = 3.04;

const LOW_GEARED_RATIOS: [f64; 12] = [
    11.73, 9.21, 7.09, 5.57, 4.35, 3.41, 2.7, 2.12, 1.63, 1.28, 1.0, 0.78,
];
const LOW_GEARED_DIFFERENTIAL: f64 = 3.4;

/// Ordered per-gear ratios, already scaled to "RPM per unit of speed"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GearRatios {
    ratios: Vec<f64>,
}

impl GearRatios {
    /// Create from already-scaled ratios, lowest gear first
    pub fn new(ratios: Vec<f64>) -> Result<Self> {
        if ratios.is_empty() {
            return Err(ScheduleError::EmptyGearSet);
        }
        if ratios.len() > u8::MAX as usize {
            return Err(ScheduleError::TooManyGears(ratios.len()));
        }
        for (i, &ratio) in ratios.iter().enumerate() {
            if !ratio.is_finite() || ratio <= 0.0 {
                return Err(ScheduleError::InvalidRatio { gear: i + 1, ratio });
            }
        }
        Ok(Self { ratios })
    }

    /// Create from gearbox ratios and the axle reduction they are multiplied by
    pub fn from_gearbox(gearbox: &[f64], differential: f64, final_drive: f64) -> Result<Self> {
        Self::new(
            gearbox
                .iter()
                .map(|ratio| ratio * differential * final_drive)
                .collect(),
        )
    }

    /// Number of gears
    pub fn gears(&self) -> u8 {
        // bounded by the check in `new`
        self.ratios.len() as u8
    }

    /// Scaled ratio of a 1-based gear
    pub fn ratio(&self, gear: u8) -> Option<f64> {
        let index = usize::from(gear).checked_sub(1)?;
        self.ratios.get(index).copied()
    }

    /// Engine RPM for a 1-based gear at `speed`
    pub fn rpm(&self, gear: u8, speed: f64) -> Option<f64> {
        self.ratio(gear).map(|ratio| ratio * speed)
    }

    /// Iterate `(gear, ratio)` pairs, lowest gear first
    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.ratios
            .iter()
            .enumerate()
            .map(|(i, &ratio)| (i as u8 + 1, ratio))
    }

    /// Raw scaled ratios
    pub fn as_slice(&self) -> &[f64] {
        &self.ratios
    }
}

/// Drivetrain profile selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DrivetrainPreset {
    /// 12 speeds, 9.16 to 0.80, differential 3.04
    #[default]
    Standard,
    /// 12 speeds, 11.73 to 0.78, differential 3.4
    LowGeared,
    /// Explicit gearbox ratios
    Custom {
        gearbox: Vec<f64>,
        differential: f64,
        #[serde(default = "default_final_drive")]
        final_drive: f64,
    },
}

fn default_final_drive() -> f64 {
    FINAL_DRIVE
}

impl DrivetrainPreset {
    /// Resolve the preset into a validated ratio table
    pub fn gear_ratios(&self) -> Result<GearRatios> {
        match self {
            DrivetrainPreset::Standard => {
                GearRatios::from_gearbox(&STANDARD_RATIOS, STANDARD_DIFFERENTIAL, FINAL_DRIVE)
            }
            DrivetrainPreset::LowGeared => {
                GearRatios::from_gearbox(&LOW_GEARED_RATIOS, LOW_GEARED_DIFFERENTIAL, FINAL_DRIVE)
            }
            DrivetrainPreset::Custom {
                gearbox,
                differential,
                final_drive,
            } => GearRatios::from_gearbox(gearbox, *differential, *final_drive),
        }
    }
}
