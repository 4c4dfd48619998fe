//! Engine Performance Model
//!
//! The schedule builder only needs a narrow view of the engine: power and
//! fuel flow at an operating point, the throttle needed for a target power,
//! and a few fixed RPM limits. Anything implementing [`EnginePerformance`]
//! can drive it; [`TruckEngine`] is the reference heavy-truck model.

mod truck;

pub use truck::TruckEngine;

use crate::error::{Result, ScheduleError};
use serde::{Deserialize, Serialize};

/// Fixed RPM limits of an engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineCharacteristics {
    /// Below this RPM a gear is considered unusable
    pub stall_rpm: f64,
    /// Idle speed, the floor of the load-scaled shift RPM
    pub idle_rpm: f64,
    /// Nominal operating target
    pub peak_rpm: f64,
    /// Redline
    pub maximum_rpm: f64,
}

impl EngineCharacteristics {
    /// Check that all limits are finite and ordered
    /// `stall <= idle <= peak <= maximum`
    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("stall", self.stall_rpm),
            ("idle", self.idle_rpm),
            ("peak", self.peak_rpm),
            ("maximum", self.maximum_rpm),
        ];
        for (name, rpm) in limits {
            if !rpm.is_finite() || rpm < 0.0 {
                return Err(ScheduleError::InvalidEngine(format!(
                    "{name} RPM must be a finite, non-negative number (got {rpm})"
                )));
            }
        }
        for pair in limits.windows(2) {
            let (lo_name, lo) = pair[0];
            let (hi_name, hi) = pair[1];
            if lo > hi {
                return Err(ScheduleError::InvalidEngine(format!(
                    "{lo_name} RPM ({lo}) is above {hi_name} RPM ({hi})"
                )));
            }
        }
        Ok(())
    }

    /// Linear interpolation between idle and maximum RPM by load
    pub fn load_scaled_rpm(&self, load: f64) -> f64 {
        self.idle_rpm + (self.maximum_rpm - self.idle_rpm) * load
    }
}

/// Queries the schedule builder makes against an engine model.
///
/// Implementations may return NaN or infinite values for operating points
/// they cannot reach; callers filter those out rather than propagating them.
pub trait EnginePerformance {
    /// Fixed RPM limits
    fn characteristics(&self) -> EngineCharacteristics;

    /// Power output at `rpm` with throttle/load fraction `load`
    fn power(&self, rpm: f64, load: f64) -> f64;

    /// Fuel flow at `rpm` with throttle/load fraction `load`
    fn fuel_consumption(&self, rpm: f64, load: f64) -> f64;

    /// Throttle fraction needed to produce `power` at `rpm`
    fn throttle_for_power(&self, rpm: f64, power: f64) -> f64;
}

impl<E: EnginePerformance + ?Sized> EnginePerformance for &E {
    fn characteristics(&self) -> EngineCharacteristics {
        (**self).characteristics()
    }

    fn power(&self, rpm: f64, load: f64) -> f64 {
        (**self).power(rpm, load)
    }

    fn fuel_consumption(&self, rpm: f64, load: f64) -> f64 {
        (**self).fuel_consumption(rpm, load)
    }

    fn throttle_for_power(&self, rpm: f64, power: f64) -> f64 {
        (**self).throttle_for_power(rpm, power)
    }
}
