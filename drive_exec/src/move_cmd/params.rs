//! Parameters structure for the movement commands

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::{MoveCmdError, MoveOpts};
use crate::registers::GainPair;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the movement commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {

    // ---- GEOMETRY ----

    /// Distance the robot travels per encoder degree of wheel rotation.
    ///
    /// Units: inches/degree
    pub in_per_deg: f64,

    /// Distance between the left and right wheels.
    ///
    /// Units: inches
    pub track_width_in: f64,

    // ---- GAINS ----

    /// Default proportional gain for straight moves.
    pub drive_kp: f64,

    /// Default derivative gain for straight moves.
    pub drive_kd: f64,

    /// Default proportional gain for turns.
    pub turn_kp: f64,

    /// Default derivative gain for turns.
    pub turn_kd: f64,

    // ---- ARRIVAL ----

    /// Error within which a side is considered to have reached its target.
    ///
    /// Units: encoder degrees
    pub distance_leeway_deg: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {

    /// Check the parameters can be used without producing non-finite
    /// setpoints.
    pub fn validate(&self) -> Result<(), MoveCmdError> {
        for (name, value) in [
            ("in_per_deg", self.in_per_deg),
            ("track_width_in", self.track_width_in)
        ].iter() {
            if !(value.is_finite() && *value > 0.0) {
                return Err(MoveCmdError::NotPositive(*name, *value));
            }
        }

        if self.distance_leeway_deg < 0.0 {
            return Err(MoveCmdError::Negative(
                "distance_leeway_deg", self.distance_leeway_deg
            ));
        }

        Ok(())
    }

    /// Gains for a straight move, falling back to the drive defaults.
    pub fn drive_gains(&self, opts: &MoveOpts) -> GainPair {
        GainPair::new(
            opts.kp.unwrap_or(self.drive_kp),
            opts.kd.unwrap_or(self.drive_kd)
        )
    }

    /// Gains for a turn, falling back to the turn defaults.
    pub fn turn_gains(&self, opts: &MoveOpts) -> GainPair {
        GainPair::new(
            opts.kp.unwrap_or(self.turn_kp),
            opts.kd.unwrap_or(self.turn_kd)
        )
    }

    /// Convert a distance into encoder degrees.
    pub fn in_to_deg(&self, distance_in: f64) -> f64 {
        distance_in / self.in_per_deg
    }
}

/// Parameters used throughout the tests.
#[cfg(test)]
pub(crate) fn test_params() -> Params {
    Params {
        in_per_deg: 0.08,
        track_width_in: 12.0,
        drive_kp: 0.3,
        drive_kd: 0.5,
        turn_kp: 0.6,
        turn_kd: 0.2,
        distance_leeway_deg: 5.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(test_params().validate().is_ok());

        let mut p = test_params();
        p.in_per_deg = 0.0;
        assert!(matches!(p.validate(), Err(MoveCmdError::NotPositive("in_per_deg", _))));

        let mut p = test_params();
        p.track_width_in = std::f64::NAN;
        assert!(matches!(p.validate(), Err(MoveCmdError::NotPositive("track_width_in", _))));

        let mut p = test_params();
        p.distance_leeway_deg = -1.0;
        assert!(matches!(p.validate(), Err(MoveCmdError::Negative(..))));
    }

    #[test]
    fn test_default_gains() {
        let p = test_params();

        assert_eq!(p.drive_gains(&MoveOpts::default()), GainPair::new(0.3, 0.5));
        assert_eq!(p.turn_gains(&MoveOpts::default()), GainPair::new(0.6, 0.2));
        assert_eq!(
            p.turn_gains(&MoveOpts::default().with_gains(1.0, 2.0)),
            GainPair::new(1.0, 2.0)
        );
        assert_eq!(
            p.drive_gains(&MoveOpts { kp: Some(0.9), ..MoveOpts::default() }),
            GainPair::new(0.9, 0.5)
        );
    }
}
