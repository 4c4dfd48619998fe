//! Interpolated Lookup
//!
//! Point queries at arbitrary (speed, load) pairs. Two answers are computed:
//!
//! - a bilinear blend of the four grid cells around the query, kept on the
//!   result as a diagnostic (`interpolated`, `interpolated_gear`);
//! - the gear stored at the nearest grid point, which is the authoritative
//!   recommendation (`gear`).
//!
//! The nearest-neighbour answer is what control loops act on; the blended
//! value is reported so callers can see how close a query sits to a shift
//! boundary.

use crate::axis::{bracket, load_fraction, nearest};
use crate::table::ShiftTable;
use serde::Serialize;

/// Gear reported when the bilinear blend is undefined
const DEGENERATE_GEAR: f64 = 1.0;

/// Answer to a point query
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LookupResult {
    /// Recommended gear (exact table value at the nearest grid point)
    pub gear: u8,
    /// Speed bin of the nearest grid point
    pub nearest_speed: u32,
    /// Load fraction of the nearest grid point
    pub nearest_load: f64,
    /// Bilinear blend of the surrounding cells
    pub interpolated: f64,
    /// `interpolated` rounded and clamped to a valid gear
    pub interpolated_gear: u8,
}

/// Look up the gear for `speed` and `load`.
///
/// Never fails: queries outside the grid fall back to the first two keys of
/// the affected axis for the blend, and the nearest grid point always exists.
pub fn lookup(table: &ShiftTable, speed: f64, load: f64) -> LookupResult {
    let speed_bins = table.speed_bins();
    let load_bins = table.load_bins();

    let interpolated = bilinear(table, speed, load);
    let interpolated_gear = interpolated
        .round()
        .clamp(1.0, f64::from(table.gears().max(1))) as u8;

    let speed_bin = nearest(speed_bins, speed_key, speed);
    let load_bin = nearest(load_bins, load_fraction, load);
    // Both indices come from the table's own keys
    let gear = table.gear(speed_bin, load_bin).unwrap_or(1);

    LookupResult {
        gear,
        nearest_speed: speed_bin as u32,
        nearest_load: load_fraction(load_bin),
        interpolated,
        interpolated_gear,
    }
}

fn speed_key(bin: usize) -> f64 {
    bin as f64
}

/// Bracketing bins, or the first two bins when `value` is not inside the axis
fn bracket_or_first(len: usize, key: impl Fn(usize) -> f64, value: f64) -> (usize, usize) {
    bracket(len, key, value).unwrap_or((0, 1.min(len.saturating_sub(1))))
}

fn bilinear(table: &ShiftTable, speed: f64, load: f64) -> f64 {
    let (sa, sb) = bracket_or_first(table.speed_bins(), speed_key, speed);
    let (la, lb) = bracket_or_first(table.load_bins(), load_fraction, load);

    let cell = |s: usize, l: usize| f64::from(table.gear(s, l).unwrap_or(1));
    let (speed_a, speed_b) = (speed_key(sa), speed_key(sb));
    let (load_a, load_b) = (load_fraction(la), load_fraction(lb));

    let value = 1.0 / (speed_b - speed_a) / (load_b - load_a)
        * (cell(sa, la) * (speed_b - speed) * (load_b - load)
            + cell(sb, la) * (speed - speed_a) * (load_b - load)
            + cell(sa, lb) * (speed_b - speed) * (load - load_a)
            + cell(sb, lb) * (speed - speed_a) * (load - load_a));

    if value.is_finite() {
        value
    } else {
        DEGENERATE_GEAR
    }
}
