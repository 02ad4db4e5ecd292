//! Parameters structure for the power governor

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the power governor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Params {
    /// Largest change in applied power allowed in one cycle.
    pub ramp_power: f64,

    /// Bound on the magnitude of applied power when no cap is active.
    pub max_power: f64
}
