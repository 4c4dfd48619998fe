//! Gear Selection Policies
//!
//! Each policy answers one question: which gear should a given
//! (speed, load) cell map to? The builder runs the same outer loop for all
//! of them.
//!
//! - `PeakRpm`: lowest gear whose RPM stays under a load-scaled ceiling
//! - `Performance`: most power
//! - `Efficiency`: most power per unit of fuel
//! - `Economy`: least fuel while delivering a load-proportional power target

use crate::drivetrain::GearRatios;
use crate::engine::EnginePerformance;
use crate::error::ScheduleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gear used when a search policy finds no candidate
pub const FALLBACK_GEAR: u8 = 3;

/// The two lowest gears are kept for manoeuvring and never searched
const SEARCH_SKIP_GEARS: usize = 2;

/// Throttle floor for power comparisons
const PERFORMANCE_MIN_LOAD: f64 = 0.2;

/// Throttle floor for efficiency comparisons
const EFFICIENCY_MIN_LOAD: f64 = 0.10;

/// Power demand at full load for the economy policy, in the engine model's units
const ECONOMY_POWER_SCALE: f64 = 600.0;

/// Shift table construction policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftPolicy {
    /// Upshift once RPM would exceed a ceiling between idle and redline
    #[default]
    PeakRpm,
    /// Maximize instantaneous power
    Performance,
    /// Maximize power per fuel flow
    Efficiency,
    /// Minimize fuel at a required power
    Economy,
}

/// Outcome of a single cell decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GearChoice {
    /// Selected gear, 1-based
    pub gear: u8,
    /// True when no candidate qualified and the policy's default was used
    pub fallback: bool,
}

impl GearChoice {
    fn selected(gear: u8) -> Self {
        Self {
            gear,
            fallback: false,
        }
    }

    fn fallback(gear: u8) -> Self {
        Self {
            gear,
            fallback: true,
        }
    }
}

impl ShiftPolicy {
    /// All policies, in declaration order
    pub const ALL: [ShiftPolicy; 4] = [
        ShiftPolicy::PeakRpm,
        ShiftPolicy::Performance,
        ShiftPolicy::Efficiency,
        ShiftPolicy::Economy,
    ];

    /// Short, stable name (`peak-rpm`, `performance`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            ShiftPolicy::PeakRpm => "peak-rpm",
            ShiftPolicy::Performance => "performance",
            ShiftPolicy::Efficiency => "efficiency",
            ShiftPolicy::Economy => "economy",
        }
    }

    /// Pick the gear for one (speed, load) cell
    pub fn select_gear<E>(&self, engine: &E, ratios: &GearRatios, speed: f64, load: f64) -> GearChoice
    where
        E: EnginePerformance + ?Sized,
    {
        match self {
            ShiftPolicy::PeakRpm => peak_rpm(engine, ratios, speed, load),
            ShiftPolicy::Performance => performance(engine, ratios, speed, load),
            ShiftPolicy::Efficiency => efficiency(engine, ratios, speed, load),
            ShiftPolicy::Economy => economy(engine, ratios, speed, load),
        }
    }
}

fn peak_rpm<E>(engine: &E, ratios: &GearRatios, speed: f64, load: f64) -> GearChoice
where
    E: EnginePerformance + ?Sized,
{
    let limits = engine.characteristics();
    let shift_rpm = limits.load_scaled_rpm(load);

    ratios
        .iter()
        .find(|&(_, ratio)| {
            let rpm = ratio * speed;
            rpm >= limits.stall_rpm && rpm <= shift_rpm
        })
        .map(|(gear, _)| GearChoice::selected(gear))
        .unwrap_or_else(|| GearChoice::fallback(ratios.gears()))
}

fn performance<E>(engine: &E, ratios: &GearRatios, speed: f64, load: f64) -> GearChoice
where
    E: EnginePerformance + ?Sized,
{
    let limits = engine.characteristics();
    let throttle = load.max(PERFORMANCE_MIN_LOAD);

    best_candidate(ratios, |ratio| {
        let rpm = (ratio * speed).max(limits.stall_rpm);
        Some(engine.power(rpm, throttle))
    })
    .map(GearChoice::selected)
    .unwrap_or_else(|| search_fallback(ratios))
}

fn efficiency<E>(engine: &E, ratios: &GearRatios, speed: f64, load: f64) -> GearChoice
where
    E: EnginePerformance + ?Sized,
{
    let limits = engine.characteristics();
    let throttle = load.max(EFFICIENCY_MIN_LOAD);

    best_candidate(ratios, |ratio| {
        let rpm = ratio * speed;
        if rpm < limits.stall_rpm || rpm > limits.maximum_rpm {
            return None;
        }
        let power = engine.power(rpm, throttle);
        let fuel = engine.fuel_consumption(rpm, throttle);
        Some(power / fuel)
    })
    .map(GearChoice::selected)
    .unwrap_or_else(|| search_fallback(ratios))
}

fn economy<E>(engine: &E, ratios: &GearRatios, speed: f64, load: f64) -> GearChoice
where
    E: EnginePerformance + ?Sized,
{
    let limits = engine.characteristics();
    let required_power = load * ECONOMY_POWER_SCALE;

    // Lowest fuel wins, so rank by negated fuel flow
    best_candidate(ratios, |ratio| {
        let rpm = ratio * speed;
        if rpm < limits.stall_rpm || rpm > limits.maximum_rpm {
            return None;
        }
        let throttle = engine.throttle_for_power(rpm, required_power);
        if !throttle.is_finite() || !(0.0..=1.0).contains(&throttle) {
            return None;
        }
        Some(-engine.fuel_consumption(rpm, throttle))
    })
    .map(GearChoice::selected)
    .unwrap_or_else(|| search_fallback(ratios))
}

/// Highest-scoring gear among the searchable gears (3 and up).
///
/// Candidates scored `None` or with a non-finite score are skipped. Ties go
/// to the lower gear.
fn best_candidate<F>(ratios: &GearRatios, mut score: F) -> Option<u8>
where
    F: FnMut(f64) -> Option<f64>,
{
    let mut best: Option<(u8, f64)> = None;
    for (gear, ratio) in ratios.iter().skip(SEARCH_SKIP_GEARS) {
        let Some(value) = score(ratio).filter(|v| v.is_finite()) else {
            continue;
        };
        if best.map_or(true, |(_, best_value)| value > best_value) {
            best = Some((gear, value));
        }
    }
    best.map(|(gear, _)| gear)
}

/// Gear 3, or the top gear on gearboxes with fewer than three gears
fn search_fallback(ratios: &GearRatios) -> GearChoice {
    GearChoice::fallback(FALLBACK_GEAR.min(ratios.gears()))
}

impl fmt::Display for ShiftPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShiftPolicy {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "peak-rpm" | "peakrpm" => Ok(ShiftPolicy::PeakRpm),
            "performance" => Ok(ShiftPolicy::Performance),
            "efficiency" => Ok(ShiftPolicy::Efficiency),
            "economy" => Ok(ShiftPolicy::Economy),
            _ => Err(ScheduleError::UnknownPolicy(s.to_string())),
        }
    }
}
