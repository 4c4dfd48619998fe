//! Schedule configuration errors

use thiserror::Error;

/// Errors raised while validating a drivetrain, an engine or a configuration.
///
/// Building and querying a schedule never fail; everything that can go wrong
/// is rejected here, before a table exists.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// Drivetrain with zero gears
    #[error("Gear ratio profile has no gears")]
    EmptyGearSet,

    /// Gear count does not fit a `u8`
    #[error("Gear ratio profile has {0} gears, at most 255 are supported")]
    TooManyGears(usize),

    /// Non-positive or non-finite ratio
    #[error("Invalid ratio for gear {gear}: {ratio}")]
    InvalidRatio {
        /// 1-based gear number
        gear: usize,
        /// Rejected ratio
        ratio: f64,
    },

    /// Engine limits not finite or not ordered
    #[error("Invalid engine characteristics: {0}")]
    InvalidEngine(String),

    /// Policy name that does not parse
    #[error("Unknown shift policy: '{0}'")]
    UnknownPolicy(String),

    /// Malformed configuration JSON
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Configuration file could not be read or written
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for ScheduleError {
    fn from(err: serde_json::Error) -> Self {
        ScheduleError::ConfigError(err.to_string())
    }
}

/// Convenience result alias
pub type Result<T> = std::result::Result<T, ScheduleError>;
