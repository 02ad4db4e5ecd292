//! Commands accepted by the drive controller

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Options common to all movement commands.
///
/// Gains left as `None` resolve to the defaults in the movement parameters:
/// the drive gains for straight moves and the turn gains for turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveOpts {
    /// Proportional gain override.
    pub kp: Option<f64>,

    /// Derivative gain override.
    pub kd: Option<f64>,

    /// Face away from the target point, so that a following
    /// `move_to_point` approaches it backwards. Only used by
    /// `turn_to_point`.
    pub reverse: bool
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A single drive controller operation, as found in command scripts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DriveCmd {
    /// Drive straight by a distance, negative to reverse.
    MoveStraight {
        distance_in: f64,
        #[serde(default)]
        opts: MoveOpts
    },

    /// Drive straight to a point. Must follow a `TurnToPoint` to the same
    /// point.
    MoveToPoint {
        x: f64,
        y: f64,
        #[serde(default)]
        opts: MoveOpts
    },

    /// Turn to an absolute bearing.
    TurnToBearing {
        angle_deg: f64,
        #[serde(default)]
        opts: MoveOpts
    },

    /// Turn to face a point (or face away from it with `opts.reverse`).
    TurnToPoint {
        x: f64,
        y: f64,
        #[serde(default)]
        opts: MoveOpts
    },

    /// Turn by an angle relative to the current setpoints.
    TurnRelative {
        angle_deg: f64,
        #[serde(default)]
        opts: MoveOpts
    },

    /// Drive the motors at raw power for a duration, bypassing the control
    /// loops.
    TimedRawPower {
        power_left: f64,
        power_right: f64,
        duration_ms: f64
    },

    /// Block until the setpoints are reached or the timeout elapses.
    WaitForArrival {
        timeout_ms: f64
    },

    /// Re-anchor the pose and zero the setpoints.
    ResetCoordinates {
        x: f64,
        y: f64,
        angle_deg: f64
    },

    SetPowerCap {
        limit: f64
    },

    ClearPowerCap,

    SetPaused {
        paused: bool
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MoveOpts {
    /// Override both gains.
    pub fn with_gains(mut self, kp: f64, kd: f64) -> Self {
        self.kp = Some(kp);
        self.kd = Some(kd);
        self
    }

    /// Set the reverse flag.
    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cmd_from_json() {
        let cmd: DriveCmd = serde_json::from_str(
            r#"{"TurnToPoint": {"x": 1.0, "y": 2.0, "opts": {"reverse": true}}}"#
        ).unwrap();
        assert_eq!(cmd, DriveCmd::TurnToPoint {
            x: 1.0,
            y: 2.0,
            opts: MoveOpts::default().reversed()
        });

        let cmd: DriveCmd = serde_json::from_str(
            r#"{"MoveStraight": {"distance_in": 24.0}}"#
        ).unwrap();
        assert_eq!(cmd, DriveCmd::MoveStraight {
            distance_in: 24.0,
            opts: MoveOpts::default()
        });

        let cmd: DriveCmd = serde_json::from_str(r#""ClearPowerCap""#).unwrap();
        assert_eq!(cmd, DriveCmd::ClearPowerCap);
    }
}
