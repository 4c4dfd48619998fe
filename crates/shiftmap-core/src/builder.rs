//! Schedule Builder
//!
//! Fills every (speed, load) cell with the gear chosen by a
//! [`ShiftPolicy`], then applies the dwell smoother.

use crate::axis::{LoadAxis, SpeedAxis};
use crate::drivetrain::GearRatios;
use crate::engine::EnginePerformance;
use crate::policy::ShiftPolicy;
use crate::smoothing::{smooth_dwell, SmoothingReport};
use crate::table::ShiftTable;

/// Diagnostics gathered while filling a table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Cells filled
    pub cells: usize,
    /// Cells filled through a policy's fallback branch
    pub fallback_cells: usize,
    /// Smoothing pass summary (empty for raw builds)
    pub smoothing: SmoothingReport,
}

/// Builds shift tables for one engine and drivetrain
pub struct ScheduleBuilder<'a, E: EnginePerformance + ?Sized> {
    engine: &'a E,
    ratios: &'a GearRatios,
    speed_axis: SpeedAxis,
}

impl<'a, E: EnginePerformance + ?Sized> ScheduleBuilder<'a, E> {
    /// Create a builder covering speeds `0..=maximum_speed`
    pub fn new(engine: &'a E, ratios: &'a GearRatios, maximum_speed: u32) -> Self {
        Self {
            engine,
            ratios,
            speed_axis: SpeedAxis::new(maximum_speed),
        }
    }

    /// Fill a table with `policy` without smoothing
    pub fn build_raw(&self, policy: ShiftPolicy) -> (ShiftTable, BuildReport) {
        let mut table = ShiftTable::filled(self.speed_axis, self.ratios.gears(), 1);
        let mut report = BuildReport::default();

        for speed_bin in self.speed_axis.bins() {
            let speed = f64::from(speed_bin);
            for (load_bin, load) in LoadAxis.bins() {
                let choice = policy.select_gear(self.engine, self.ratios, speed, load);
                table.set(speed_bin as usize, load_bin, choice.gear);
                report.cells += 1;
                if choice.fallback {
                    report.fallback_cells += 1;
                }
            }
        }

        tracing::debug!(
            policy = %policy,
            gears = self.ratios.gears(),
            speed_bins = self.speed_axis.len(),
            fallback_cells = report.fallback_cells,
            "shift table filled"
        );
        if report.fallback_cells * 2 > report.cells {
            tracing::warn!(
                "{} policy fell back on {} of {} cells; check the engine model and gear ratios",
                policy,
                report.fallback_cells,
                report.cells
            );
        }

        (table, report)
    }

    /// Fill a table with `policy`, then enforce `minimum_dwell_bins`
    pub fn build(&self, policy: ShiftPolicy, minimum_dwell_bins: usize) -> (ShiftTable, BuildReport) {
        let (mut table, mut report) = self.build_raw(policy);
        report.smoothing = smooth_dwell(&mut table, minimum_dwell_bins);
        (table, report)
    }
}

/// Build a finished schedule: fill with `policy` over `0..=maximum_speed`,
/// then smooth with `minimum_dwell_bins`.
pub fn build_schedule<E>(
    policy: ShiftPolicy,
    ratios: &GearRatios,
    engine: &E,
    maximum_speed: u32,
    minimum_dwell_bins: usize,
) -> ShiftTable
where
    E: EnginePerformance + ?Sized,
{
    ScheduleBuilder::new(engine, ratios, maximum_speed)
        .build(policy, minimum_dwell_bins)
        .0
}
