//! Shared schedule handle for hosts with concurrent readers
//!
//! Tables are published whole: a reader holds an `Arc` to a finished,
//! smoothed table and never observes one mid-build. Rebuilding swaps in a
//! new `Arc`; readers still holding the old one keep using it until they
//! ask again.

use crate::drivetrain::GearRatios;
use crate::engine::EnginePerformance;
use crate::lookup::LookupResult;
use crate::policy::ShiftPolicy;
use crate::table::ShiftTable;
use std::sync::{Arc, RwLock};

/// Publish-once, read-many holder for the live shift table
#[derive(Debug)]
pub struct SharedSchedule {
    current: RwLock<Arc<ShiftTable>>,
}

impl SharedSchedule {
    /// Publish an initial table
    pub fn new(table: ShiftTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
        }
    }

    /// The table readers should use right now
    pub fn current(&self) -> Arc<ShiftTable> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replace the live table; returns the previous one
    pub fn publish(&self, table: ShiftTable) -> Arc<ShiftTable> {
        let next = Arc::new(table);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        tracing::info!(
            gears = next.gears(),
            maximum_speed = next.maximum_speed(),
            "publishing shift table"
        );
        std::mem::replace(&mut *guard, next)
    }

    /// Build a fresh table off to the side and publish it
    pub fn rebuild<E>(
        &self,
        policy: ShiftPolicy,
        ratios: &GearRatios,
        engine: &E,
        maximum_speed: u32,
        minimum_dwell_bins: usize,
    ) -> Arc<ShiftTable>
    where
        E: EnginePerformance + ?Sized,
    {
        let table =
            crate::builder::build_schedule(policy, ratios, engine, maximum_speed, minimum_dwell_bins);
        self.publish(table)
    }

    /// Query the live table
    pub fn lookup(&self, speed: f64, load: f64) -> LookupResult {
        self.current().lookup(speed, load)
    }
}
