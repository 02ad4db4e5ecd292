//! PD setpoint controller module
//!
//! Turns the error between each side's encoder setpoint and its measured
//! position into an unclamped power target. Clamping and ramping are left to
//! the power governor.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use state::*;
