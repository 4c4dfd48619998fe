//! Shift Table
//!
//! Dense speed × load → gear storage. Cells live in one flat vector,
//! speed-major, so a speed row is contiguous and a load column is strided.

use crate::axis::{load_fraction, SpeedAxis, LOAD_BINS};
use crate::lookup::{self, LookupResult};
use serde::Serialize;

/// A finished (or raw, before smoothing) shift schedule.
///
/// Every cell holds a gear in `1..=gears()`. Only the builder and the dwell
/// smoother write to a table; once handed out it is read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftTable {
    speed_axis: SpeedAxis,
    gears: u8,
    cells: Vec<u8>,
}

impl ShiftTable {
    /// Table with every cell set to `fill`
    pub(crate) fn filled(speed_axis: SpeedAxis, gears: u8, fill: u8) -> Self {
        Self {
            speed_axis,
            gears,
            cells: vec![fill; speed_axis.len() * LOAD_BINS],
        }
    }

    fn index(&self, speed_bin: usize, load_bin: usize) -> Option<usize> {
        (speed_bin < self.speed_axis.len() && load_bin < LOAD_BINS)
            .then(|| speed_bin * LOAD_BINS + load_bin)
    }

    /// Gear stored at a grid cell
    pub fn gear(&self, speed_bin: usize, load_bin: usize) -> Option<u8> {
        self.index(speed_bin, load_bin).map(|i| self.cells[i])
    }

    pub(crate) fn set(&mut self, speed_bin: usize, load_bin: usize, gear: u8) {
        if let Some(i) = self.index(speed_bin, load_bin) {
            self.cells[i] = gear;
        }
    }

    /// Number of gears the table was built for
    pub fn gears(&self) -> u8 {
        self.gears
    }

    /// Highest speed bin
    pub fn maximum_speed(&self) -> u32 {
        self.speed_axis.maximum_speed()
    }

    /// Speed axis
    pub fn speed_axis(&self) -> SpeedAxis {
        self.speed_axis
    }

    /// Number of speed bins
    pub fn speed_bins(&self) -> usize {
        self.speed_axis.len()
    }

    /// Number of load bins
    pub fn load_bins(&self) -> usize {
        LOAD_BINS
    }

    /// Speed keys in ascending order
    pub fn speeds(&self) -> Vec<f64> {
        (0..self.speed_bins()).map(|bin| self.speed_axis.speed(bin)).collect()
    }

    /// Load keys in ascending order
    pub fn loads(&self) -> Vec<f64> {
        (0..LOAD_BINS).map(load_fraction).collect()
    }

    /// One speed row: gears for every load bin
    pub fn row(&self, speed_bin: usize) -> Option<&[u8]> {
        let start = self.index(speed_bin, 0)?;
        Some(&self.cells[start..start + LOAD_BINS])
    }

    /// One load column: gears along the speed axis
    pub fn column(&self, load_bin: usize) -> impl Iterator<Item = u8> + '_ {
        self.cells
            .iter()
            .skip(load_bin)
            .step_by(LOAD_BINS)
            .take(if load_bin < LOAD_BINS { self.speed_bins() } else { 0 })
            .copied()
    }

    pub(crate) fn column_vec(&self, load_bin: usize) -> Vec<u8> {
        self.column(load_bin).collect()
    }

    pub(crate) fn write_column(&mut self, load_bin: usize, column: &[u8]) {
        for (speed_bin, &gear) in column.iter().enumerate() {
            self.set(speed_bin, load_bin, gear);
        }
    }

    /// Answer a point query; see [`lookup::lookup`]
    pub fn lookup(&self, speed: f64, load: f64) -> LookupResult {
        lookup::lookup(self, speed, load)
    }
}
