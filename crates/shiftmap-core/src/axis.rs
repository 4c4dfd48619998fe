//! Table Axes
//!
//! Both axes of a shift table are fixed-step and fixed-range, so they are
//! addressed by integer bin number. Load fractions are always derived from
//! the bin (`bin / 10`), never by accumulating a floating-point step.

use serde::{Deserialize, Serialize};

/// Number of load bins: 0.0, 0.1, ..., 1.0
pub const LOAD_BINS: usize = 11;

/// Speed axis: integer bins `0..=maximum_speed`, step 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedAxis {
    maximum_speed: u32,
}

impl SpeedAxis {
    /// Create an axis covering `0..=maximum_speed`
    pub fn new(maximum_speed: u32) -> Self {
        Self { maximum_speed }
    }

    /// Highest speed bin (inclusive)
    pub fn maximum_speed(&self) -> u32 {
        self.maximum_speed
    }

    /// Number of speed bins
    pub fn len(&self) -> usize {
        self.maximum_speed as usize + 1
    }

    /// Always false; an axis holds at least the zero bin
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Speed value of a bin
    pub fn speed(&self, bin: usize) -> f64 {
        bin as f64
    }

    /// Iterate speed bins in ascending order
    pub fn bins(&self) -> impl Iterator<Item = u32> {
        0..=self.maximum_speed
    }
}

/// Load axis: 11 bins from 0.0 to 1.0 inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadAxis;

impl LoadAxis {
    /// Number of load bins
    pub fn len(&self) -> usize {
        LOAD_BINS
    }

    /// Always false
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Load fraction of a bin
    pub fn load(&self, bin: usize) -> f64 {
        load_fraction(bin)
    }

    /// Iterate `(bin, fraction)` pairs in ascending order
    pub fn bins(&self) -> impl Iterator<Item = (usize, f64)> {
        (0..LOAD_BINS).map(|bin| (bin, load_fraction(bin)))
    }
}

/// Load fraction for a load bin
pub fn load_fraction(bin: usize) -> f64 {
    bin as f64 / 10.0
}

/// Find the bracketing pair of bins `(a, a + 1)` with
/// `key(a) <= value <= key(a + 1)`, taking the first pair that matches.
///
/// `key` maps a bin in `0..len` to its axis value; keys must be ascending
/// and evenly spaced. Returns `None` when the value lies outside the keys
/// (or is NaN), or when fewer than two keys exist.
pub(crate) fn bracket(len: usize, key: impl Fn(usize) -> f64, value: f64) -> Option<(usize, usize)> {
    if len < 2 || !(key(0) <= value && value <= key(len - 1)) {
        return None;
    }

    let last = len - 1;
    let step = key(1) - key(0);
    let mut upper = ((value - key(0)) / step).ceil().clamp(1.0, last as f64) as usize;
    // The estimate can be one bin off from rounding; settle on the keys
    while upper > 1 && key(upper - 1) >= value {
        upper -= 1;
    }
    while upper < last && key(upper) < value {
        upper += 1;
    }
    Some((upper - 1, upper))
}

/// Bin whose key is numerically closest to `value`; ties go to the lower bin
/// and NaN resolves to bin 0
pub(crate) fn nearest(len: usize, key: impl Fn(usize) -> f64, value: f64) -> usize {
    if len < 2 || value.is_nan() || value <= key(0) {
        return 0;
    }
    if value >= key(len - 1) {
        return len - 1;
    }
    match bracket(len, &key, value) {
        Some((a, b)) if (key(b) - value).abs() < (value - key(a)).abs() => b,
        Some((a, _)) => a,
        None => 0,
    }
}
