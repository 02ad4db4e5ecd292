//! Power governor module
//!
//! Slews the applied power of each side towards the PD controller's target by
//! at most the ramp power per cycle, then bounds it by the active power cap
//! (or the maximum power when no cap is set).

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors during PowerGov initialisation.
#[derive(Debug, thiserror::Error)]
pub enum PowerGovError {
    #[error("The ramp power must be positive, found {0}")]
    InvalidRampPower(f64),

    #[error("The maximum power must be positive, found {0}")]
    InvalidMaxPower(f64)
}
