//! Turn calculations
//!
//! All turns are differential: the left side's setpoint moves forward by half
//! the arc length and the right side's moves back by the same amount, so a
//! positive angle turns clockwise.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use std::f64::consts::PI;

// Internal
use super::{MoveOpts, Params, SetpointDelta};
use crate::{loc::Pose, registers::{EncoderTarget, SidePair}};
use util::maths::wrap_pi_once;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert a turn angle into the setpoint change of each side.
///
/// Each wheel travels `angle * track_width / 2` along its arc.
pub fn turn_differential(params: &Params, angle_rad: f64) -> EncoderTarget {
    let diff_deg = params.in_to_deg(angle_rad * params.track_width_in);

    SidePair::new(diff_deg / 2.0, -diff_deg / 2.0)
}

/// Calculate the setpoint change for turning to the absolute bearing
/// `angle_deg`.
///
/// The turn is the plain difference between the target and current bearing,
/// it is not wrapped.
pub fn calc_turn_to_bearing(
    params: &Params,
    pose: &Pose,
    angle_deg: f64,
    opts: &MoveOpts
) -> SetpointDelta {
    let error_rad = angle_deg.to_radians() - pose.bearing;

    SetpointDelta {
        delta: turn_differential(params, error_rad),
        gains: params.turn_gains(opts)
    }
}

/// Calculate the setpoint change for turning to face the point `(x, y)`, or
/// to face directly away from it if `opts.reverse` is set.
///
/// The turn is wrapped into (-pi, pi] so the robot never turns the long way
/// round. The target is assumed to be less than a full turn away, only one
/// correction is made.
pub fn calc_turn_to_point(
    params: &Params,
    pose: &Pose,
    x: f64,
    y: f64,
    opts: &MoveOpts
) -> SetpointDelta {
    let mut target_bearing = pose.bearing_to(x, y);
    if opts.reverse {
        target_bearing += PI;
    }

    let turn_rad = wrap_pi_once(target_bearing - pose.bearing);

    debug!(
        "Turn to ({:.2}, {:.2}){}: target bearing {:.3} rad, turning {:.3} rad",
        x, y,
        if opts.reverse { " reversed" } else { "" },
        target_bearing, turn_rad
    );

    SetpointDelta {
        delta: turn_differential(params, turn_rad),
        gains: params.turn_gains(opts)
    }
}

/// Calculate the setpoint change for turning by `angle_deg` relative to the
/// current setpoints.
pub fn calc_turn_relative(
    params: &Params,
    angle_deg: f64,
    opts: &MoveOpts
) -> SetpointDelta {
    SetpointDelta {
        delta: turn_differential(params, angle_deg.to_radians()),
        gains: params.turn_gains(opts)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::move_cmd::test_params;
    use crate::registers::GainPair;
    use std::f64::consts::FRAC_PI_2;

    fn assert_turn(sp: &SetpointDelta, params: &Params, angle_rad: f64) {
        let half = angle_rad * params.track_width_in / params.in_per_deg / 2.0;
        assert!(
            (sp.delta.left - half).abs() < 1e-9 && (sp.delta.right + half).abs() < 1e-9,
            "expected a turn of {} rad, got {:?}", angle_rad, sp.delta
        );
    }

    #[test]
    fn test_turn_to_bearing() {
        let p = test_params();
        let pose = Pose::default();

        let sp = calc_turn_to_bearing(&p, &pose, 90.0, &MoveOpts::default());
        assert_turn(&sp, &p, FRAC_PI_2);
        assert_eq!(sp.gains, GainPair::new(p.turn_kp, p.turn_kd));

        // 90 deg over a 12 in track at 0.08 in/deg
        assert!((sp.delta.left - 117.809724509617).abs() < 1e-9);
    }

    #[test]
    fn test_turn_to_bearing_again_adds_nothing() {
        let p = test_params();

        // Once odometry reports the first turn complete the second call has
        // no error left
        let pose = Pose::from_degrees(0.0, 0.0, 90.0);
        let sp = calc_turn_to_bearing(&p, &pose, 90.0, &MoveOpts::default());

        assert_eq!(sp.delta, SidePair::new(0.0, 0.0));
    }

    #[test]
    fn test_turn_to_bearing_not_wrapped() {
        let p = test_params();
        let pose = Pose::default();

        let sp = calc_turn_to_bearing(&p, &pose, 270.0, &MoveOpts::default());
        assert_turn(&sp, &p, 1.5 * PI);
    }

    #[test]
    fn test_turn_to_point_wraps() {
        let p = test_params();

        // Target bearing 1.5 rad from a bearing of -2.0 rad is 3.5 rad
        // clockwise, which should become a 2.78 rad anticlockwise turn
        let pose = Pose { x: 0.0, y: 0.0, bearing: -2.0 };
        let (x, y) = (10.0 * 1.5f64.sin(), 10.0 * 1.5f64.cos());

        let sp = calc_turn_to_point(&p, &pose, x, y, &MoveOpts::default());
        assert_turn(&sp, &p, 3.5 - 2.0 * PI);
        assert!(sp.delta.left < 0.0);

        // And the other way round
        let pose = Pose { x: 0.0, y: 0.0, bearing: 2.0 };
        let (x, y) = (10.0 * (-1.5f64).sin(), 10.0 * (-1.5f64).cos());

        let sp = calc_turn_to_point(&p, &pose, x, y, &MoveOpts::default());
        assert_turn(&sp, &p, 2.0 * PI - 3.5);
    }

    #[test]
    fn test_turn_to_point_reverse() {
        let p = test_params();
        let pose = Pose::default();

        // Face away from a point on the +x axis: the back points at +x
        let sp = calc_turn_to_point(&p, &pose, 10.0, 0.0, &MoveOpts::default().reversed());
        assert_turn(&sp, &p, -FRAC_PI_2);

        let sp = calc_turn_to_point(&p, &pose, 10.0, 0.0, &MoveOpts::default());
        assert_turn(&sp, &p, FRAC_PI_2);
    }

    #[test]
    fn test_turn_to_point_from_offset_pose() {
        let p = test_params();
        let pose = Pose { x: 5.0, y: 5.0, bearing: FRAC_PI_2 };

        // Point directly ahead along +x from (5, 5), no turn needed
        let sp = calc_turn_to_point(&p, &pose, 15.0, 5.0, &MoveOpts::default());
        assert_turn(&sp, &p, 0.0);
    }

    #[test]
    fn test_turn_relative() {
        let p = test_params();

        let sp = calc_turn_relative(&p, -45.0, &MoveOpts::default().with_gains(2.0, 1.0));
        assert_turn(&sp, &p, -PI / 4.0);
        assert_eq!(sp.gains, GainPair::new(2.0, 1.0));

        // Matches an absolute turn from a zero bearing
        let abs = calc_turn_to_bearing(&p, &Pose::default(), 30.0, &MoveOpts::default());
        let rel = calc_turn_relative(&p, 30.0, &MoveOpts::default());
        assert_eq!(abs.delta, rel.delta);
    }
}
