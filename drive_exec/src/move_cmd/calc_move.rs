//! Straight line movement calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use std::f64::consts::FRAC_PI_2;

// Internal
use super::{MoveOpts, Params, SetpointDelta};
use crate::{loc::Pose, registers::SidePair};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Calculate the setpoint change for driving straight by `distance_in`.
///
/// Both sides move by the same amount, a negative distance drives backwards.
pub fn calc_move_straight(
    params: &Params,
    distance_in: f64,
    opts: &MoveOpts
) -> SetpointDelta {
    SetpointDelta {
        delta: SidePair::splat(params.in_to_deg(distance_in)),
        gains: params.drive_gains(opts)
    }
}

/// Calculate the setpoint change for driving straight to the point `(x, y)`.
///
/// # Preconditions
///
/// The robot must already be facing the point (or facing directly away from
/// it), i.e. a `turn_to_point` to the same point must come first. The
/// direction of travel is chosen by comparing the bearing to the point with
/// the current bearing: a quarter turn or more apart drives backwards. If the
/// robot was not turned first this gives the wrong direction, it is not
/// detected.
pub fn calc_move_to_point(
    params: &Params,
    pose: &Pose,
    x: f64,
    y: f64,
    opts: &MoveOpts
) -> SetpointDelta {
    let distance_in = pose.distance_to(x, y);
    let target_bearing = pose.bearing_to(x, y);
    let sign = direction_sign(target_bearing, pose.bearing);

    debug!(
        "Move to ({:.2}, {:.2}): {:.2} in, target bearing {:.3} rad, current {:.3} rad, {}",
        x, y, distance_in, target_bearing, pose.bearing,
        if sign < 0.0 { "reverse" } else { "forward" }
    );

    SetpointDelta {
        delta: SidePair::splat(params.in_to_deg(distance_in) * sign),
        gains: params.drive_gains(opts)
    }
}

/// Direction to drive in to reach a point at `target_bearing`.
///
/// Returns `-1.0` (reverse) when the bearings are a quarter turn or more
/// apart, `1.0` (forward) otherwise. The bearings are compared as given, with
/// no wrapping.
pub fn direction_sign(target_bearing: f64, current_bearing: f64) -> f64 {
    if (target_bearing - current_bearing).abs() >= FRAC_PI_2 {
        -1.0
    }
    else {
        1.0
    }
}
