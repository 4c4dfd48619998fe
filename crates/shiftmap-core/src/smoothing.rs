//! Dwell Smoother
//!
//! Stops a schedule from hunting between gears over a few speed bins.
//! Each load column is run-length encoded along the speed axis; any run
//! narrower than the minimum dwell width is merged forward into the run
//! after it and takes that run's gear. Merging stops once the run reaches
//! the width or the top gear. A short run at the end of the column has no
//! successor, so it joins the run before it instead.

use crate::table::ShiftTable;

/// A maximal stretch of equal gears along the speed axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GearRun {
    /// Gear held across the run
    pub gear: u8,
    /// Number of speed bins
    pub len: usize,
}

/// Summary of one smoothing pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmoothingReport {
    /// Number of short runs absorbed into a neighbour
    pub merged_runs: usize,
    /// Number of cells whose gear changed
    pub changed_cells: usize,
}

/// Run-length encode a column
pub fn encode_runs(column: &[u8]) -> Vec<GearRun> {
    let mut runs: Vec<GearRun> = Vec::new();
    for &gear in column {
        match runs.last_mut() {
            Some(run) if run.gear == gear => run.len += 1,
            _ => runs.push(GearRun { gear, len: 1 }),
        }
    }
    runs
}

/// Expand runs back into a column
pub fn decode_runs(runs: &[GearRun]) -> Vec<u8> {
    runs.iter()
        .flat_map(|run| std::iter::repeat(run.gear).take(run.len))
        .collect()
}

/// Merge short runs of one column; returns the compressed runs and the
/// number of merges performed.
///
/// Afterwards every run is at least `min_width` long unless it is on
/// `top_gear` or covers the whole column.
pub fn compress_runs(runs: &[GearRun], min_width: usize, top_gear: u8) -> (Vec<GearRun>, usize) {
    let mut out: Vec<GearRun> = Vec::with_capacity(runs.len());
    let mut merges = 0;
    let mut pending = runs.iter().copied();

    while let Some(mut run) = pending.next() {
        while run.len < min_width && run.gear < top_gear {
            let Some(next) = pending.next() else {
                break;
            };
            run = GearRun {
                gear: next.gear,
                len: run.len + next.len,
            };
            merges += 1;
        }

        match out.last_mut() {
            // Relabelled runs can land on their predecessor's gear
            Some(prev) if prev.gear == run.gear => prev.len += run.len,
            // Still short here means the column ran out
            Some(prev) if run.len < min_width && run.gear < top_gear => {
                prev.len += run.len;
                merges += 1;
            }
            _ => out.push(run),
        }
    }

    (out, merges)
}

/// Enforce a minimum dwell width on every load column of `table`.
///
/// Widths of 0 or 1 leave the table untouched.
pub fn smooth_dwell(table: &mut ShiftTable, min_width: usize) -> SmoothingReport {
    let mut report = SmoothingReport::default();
    if min_width <= 1 {
        return report;
    }

    let top_gear = table.gears();
    for load_bin in 0..table.load_bins() {
        let column = table.column_vec(load_bin);
        let (runs, merges) = compress_runs(&encode_runs(&column), min_width, top_gear);
        if merges == 0 {
            continue;
        }

        let smoothed = decode_runs(&runs);
        report.merged_runs += merges;
        report.changed_cells += column
            .iter()
            .zip(&smoothed)
            .filter(|(before, after)| before != after)
            .count();
        table.write_column(load_bin, &smoothed);
    }

    tracing::debug!(
        min_width,
        merged_runs = report.merged_runs,
        changed_cells = report.changed_cells,
        "dwell smoothing applied"
    );
    report
}
