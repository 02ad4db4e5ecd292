//! Parameters structure for the drive controller

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use std::time::Duration;

// Internal
use crate::{move_cmd, power_gov};
use util::time::millis_f64;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the drive controller, as loaded from `drive_ctrl.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveCtrlParams {
    /// Period of the PD and power governor tasks.
    ///
    /// Units: milliseconds
    pub tick_period_ms: f64,

    /// Period at which waits check their condition.
    ///
    /// Units: milliseconds
    pub poll_period_ms: f64,

    pub move_cmd: move_cmd::Params,

    pub power_gov: power_gov::Params
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveCtrlParams {
    pub fn tick_period(&self) -> Duration {
        millis_f64(self.tick_period_ms)
    }

    pub fn poll_period(&self) -> Duration {
        millis_f64(self.poll_period_ms)
    }
}

/// Parameters used throughout the tests, with short periods.
#[cfg(test)]
pub(crate) fn test_drive_ctrl_params() -> DriveCtrlParams {
    DriveCtrlParams {
        tick_period_ms: 5.0,
        poll_period_ms: 2.0,
        move_cmd: move_cmd::test_params(),
        power_gov: power_gov::Params {
            ramp_power: 10.0,
            max_power: 100.0
        }
    }
}
