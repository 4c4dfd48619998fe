//! # ShiftMap Core Library
//!
//! Core functionality for automated transmission shift schedules.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - Shift table synthesis under four policies (peak RPM, performance,
//!   efficiency, economy)
//! - Dwell smoothing to stop gear hunting along the speed axis
//! - Point lookups at arbitrary speed/load pairs
//! - A reference heavy-truck engine model and built-in 12-speed drivetrains
//! - JSON schedule configuration
//!
//! ## Example
//!
//! ```rust
//! use shiftmap_core::prelude::*;
//!
//! let ratios = DrivetrainPreset::Standard.gear_ratios()?;
//! let engine = TruckEngine::new(3550.0, 400.0, 1750.0, 2100.0)?;
//!
//! let table = build_schedule(ShiftPolicy::PeakRpm, &ratios, &engine, 150, 3);
//! let result = table.lookup(22.4, 0.35);
//! assert!((1..=12).contains(&result.gear));
//! # Ok::<(), shiftmap_core::error::ScheduleError>(())
//! ```

pub mod axis;
pub mod builder;
pub mod config;
pub mod drivetrain;
pub mod engine;
pub mod error;
pub mod lookup;
pub mod policy;
pub mod shared;
pub mod smoothing;
pub mod table;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::builder::{build_schedule, BuildReport, ScheduleBuilder};
    pub use crate::config::{EngineConfig, ScheduleConfig};
    pub use crate::drivetrain::{DrivetrainPreset, GearRatios};
    pub use crate::engine::{EngineCharacteristics, EnginePerformance, TruckEngine};
    pub use crate::error::ScheduleError;
    pub use crate::lookup::{lookup, LookupResult};
    pub use crate::policy::{GearChoice, ShiftPolicy};
    pub use crate::shared::SharedSchedule;
    pub use crate::smoothing::{smooth_dwell, SmoothingReport};
    pub use crate::table::ShiftTable;
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
