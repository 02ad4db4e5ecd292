//! Movement command module
//!
//! Converts motion goals (drive a distance, turn to a bearing, drive to a
//! field coordinate) into encoder setpoint deltas and a gain pair. The
//! calculations here are pure, applying the result to the shared registers is
//! done by [`crate::drive_ctrl::DriveCtrl`].

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd;
mod params;
mod calc_move;
mod calc_turn;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use cmd::*;
pub use params::*;
pub use calc_move::*;
pub use calc_turn::*;

use crate::registers::{EncoderTarget, GainPair};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The result of a movement calculation, to be applied to the registers as a
/// single unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetpointDelta {
    /// Amount to add to each side's encoder target.
    ///
    /// Units: encoder degrees
    pub delta: EncoderTarget,

    /// Gains to replace the active pair with.
    pub gains: GainPair
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors in the movement command parameters.
#[derive(Debug, thiserror::Error)]
pub enum MoveCmdError {
    #[error("Parameter `{0}` must be positive and finite, found {1}")]
    NotPositive(&'static str, f64),

    #[error("Parameter `{0}` must not be negative, found {1}")]
    Negative(&'static str, f64)
}
