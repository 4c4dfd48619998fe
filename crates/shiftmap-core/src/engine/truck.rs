//! Reference heavy-truck engine model
//!
//! Power comes from a normalized full-load torque curve scaled by the
//! engine's torque rating. Fuel flow is a brake-specific fuel consumption
//! (BSFC) term proportional to power plus a friction term proportional to
//! RPM, so specific efficiency peaks in the mid range like a real diesel.

use super::{EngineCharacteristics, EnginePerformance};
use crate::error::{Result, ScheduleError};

/// Full-load torque as a fraction of the rating, by RPM.
///
/// The curve starts at standstill: below idle the clutch slips, so the
/// driveline can be held at any speed.
const STOCK_TORQUE_CURVE: [(f64, f64); 8] = [
    (0.0, 0.0),
    (400.0, 0.45),
    (700.0, 0.80),
    (1000.0, 1.0),
    (1400.0, 1.0),
    (1900.0, 0.77),
    (2100.0, 0.62),
    (2400.0, 0.0),
];

/// Best-case BSFC in g/kWh
const MIN_BSFC: f64 = 195.0;

/// Friction fuel flow at idle, in g/s per N·m of rating
const IDLE_FLOW_PER_NM: f64 = 0.00018;

/// Reference truck engine
#[derive(Debug, Clone)]
pub struct TruckEngine {
    /// Peak torque in N·m
    rating: f64,
    characteristics: EngineCharacteristics,
    torque_curve: Vec<(f64, f64)>,
}

impl TruckEngine {
    /// Create an engine with the stock torque curve.
    ///
    /// # Arguments
    /// * `rating` - Peak torque in N·m (e.g. 3550)
    /// * `idle_rpm`, `peak_rpm`, `maximum_rpm` - Operating limits
    pub fn new(rating: f64, idle_rpm: f64, peak_rpm: f64, maximum_rpm: f64) -> Result<Self> {
        Self::with_torque_curve(
            rating,
            idle_rpm,
            peak_rpm,
            maximum_rpm,
            STOCK_TORQUE_CURVE.to_vec(),
        )
    }

    /// Create an engine with a custom normalized torque curve.
    ///
    /// The curve's first point sets the stall RPM.
    pub fn with_torque_curve(
        rating: f64,
        idle_rpm: f64,
        peak_rpm: f64,
        maximum_rpm: f64,
        torque_curve: Vec<(f64, f64)>,
    ) -> Result<Self> {
        if !rating.is_finite() || rating <= 0.0 {
            return Err(ScheduleError::InvalidEngine(format!(
                "torque rating must be positive (got {rating})"
            )));
        }
        if torque_curve.len() < 2 {
            return Err(ScheduleError::InvalidEngine(
                "torque curve needs at least two points".to_string(),
            ));
        }
        if torque_curve.windows(2).any(|w| w[0].0 >= w[1].0) {
            return Err(ScheduleError::InvalidEngine(
                "torque curve RPM points must be strictly increasing".to_string(),
            ));
        }

        let characteristics = EngineCharacteristics {
            stall_rpm: torque_curve[0].0,
            idle_rpm,
            peak_rpm,
            maximum_rpm,
        };
        characteristics.validate()?;

        Ok(Self {
            rating,
            characteristics,
            torque_curve,
        })
    }

    /// Peak torque in N·m
    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// Full-load torque in N·m at `rpm`
    pub fn full_load_torque(&self, rpm: f64) -> f64 {
        self.rating * interpolate_curve(&self.torque_curve, rpm)
    }

    /// Full-load power in kW at `rpm`
    pub fn full_load_power(&self, rpm: f64) -> f64 {
        torque_to_kw(self.full_load_torque(rpm), rpm)
    }

    /// BSFC in g/kWh; lowest around 70% of peak RPM
    fn bsfc(&self, rpm: f64) -> f64 {
        let c = &self.characteristics;
        let sweet_spot = c.peak_rpm * 0.7;
        let span = (c.maximum_rpm - c.idle_rpm).max(1.0);
        let offset = (rpm - sweet_spot) / span;
        MIN_BSFC * (1.0 + 0.35 * offset * offset)
    }
}

impl EnginePerformance for TruckEngine {
    fn characteristics(&self) -> EngineCharacteristics {
        self.characteristics
    }

    fn power(&self, rpm: f64, load: f64) -> f64 {
        self.full_load_power(rpm) * load.clamp(0.0, 1.0)
    }

    /// Fuel flow in g/s
    fn fuel_consumption(&self, rpm: f64, load: f64) -> f64 {
        let idle_flow = self.rating * IDLE_FLOW_PER_NM;
        let friction = idle_flow * rpm.max(0.0) / self.characteristics.idle_rpm.max(1.0);
        let useful = self.bsfc(rpm) * self.power(rpm, load) / 3600.0;
        friction + useful
    }

    /// NaN or infinite when the engine makes no power at `rpm`
    fn throttle_for_power(&self, rpm: f64, power: f64) -> f64 {
        power / self.full_load_power(rpm)
    }
}

fn torque_to_kw(torque_nm: f64, rpm: f64) -> f64 {
    torque_nm * rpm * 2.0 * std::f64::consts::PI / 60_000.0
}

/// Piecewise-linear curve lookup, clamped to the end points
fn interpolate_curve(curve: &[(f64, f64)], rpm: f64) -> f64 {
    let (first, last) = match (curve.first(), curve.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return 0.0,
    };
    if rpm <= first.0 {
        return first.1;
    }
    if rpm >= last.0 {
        return last.1;
    }
    for pair in curve.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if rpm >= x0 && rpm <= x1 {
            return y0 + (y1 - y0) * (rpm - x0) / (x1 - x0);
        }
    }
    last.1
}
