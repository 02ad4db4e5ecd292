//! Movement and calibration commands of the drive controller
//!
//! These run on the caller's thread. Setpoint changes are applied to the
//! registers in a single update and picked up by the control tasks on their
//! next tick. The waits block the caller only, never the control tasks.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use std::time::Duration;

// Internal
use super::DriveCtrl;
use crate::{
    hal::{DriveHardware, HalError, Side},
    loc::Pose,
    move_cmd::{self, DriveCmd, MoveOpts, SetpointDelta},
    registers::{EncoderTarget, PowerCap},
    wait::{poll_until, WaitOutcome}
};
use util::time::millis_f64;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<H> DriveCtrl<H>
where
    H: DriveHardware
{
    // ---- MOVEMENT ----

    /// Drive straight by `distance_in`, negative to reverse.
    pub fn move_straight(&self, distance_in: f64, opts: &MoveOpts) {
        debug!("MoveStraight {:.2} in", distance_in);
        self.apply(move_cmd::calc_move_straight(
            &self.params.move_cmd, distance_in, opts
        ));
    }

    /// Drive straight to the point `(x, y)`.
    ///
    /// # Preconditions
    ///
    /// Must follow a [`DriveCtrl::turn_to_point`] to the same point, which
    /// may have been reversed. See [`move_cmd::calc_move_to_point`].
    pub fn move_to_point(&self, x: f64, y: f64, opts: &MoveOpts) {
        self.apply(move_cmd::calc_move_to_point(
            &self.params.move_cmd, &self.pose.get(), x, y, opts
        ));
    }

    /// Turn to the absolute bearing `angle_deg`.
    pub fn turn_to_bearing(&self, angle_deg: f64, opts: &MoveOpts) {
        debug!("TurnToBearing {:.1} deg", angle_deg);
        self.apply(move_cmd::calc_turn_to_bearing(
            &self.params.move_cmd, &self.pose.get(), angle_deg, opts
        ));
    }

    /// Turn to face the point `(x, y)`, or away from it with `opts.reverse`.
    pub fn turn_to_point(&self, x: f64, y: f64, opts: &MoveOpts) {
        self.apply(move_cmd::calc_turn_to_point(
            &self.params.move_cmd, &self.pose.get(), x, y, opts
        ));
    }

    /// Turn by `angle_deg` relative to the current setpoints.
    pub fn turn_relative(&self, angle_deg: f64, opts: &MoveOpts) {
        debug!("TurnRelative {:.1} deg", angle_deg);
        self.apply(move_cmd::calc_turn_relative(
            &self.params.move_cmd, angle_deg, opts
        ));
    }

    /// Drive the motors at raw power for `duration`, bypassing the control
    /// loops.
    ///
    /// The power governor is paused for the duration so it doesn't fight the
    /// raw power, and unpaused afterwards whatever happens. The setpoints are
    /// not changed, so a `reset_coordinates` should follow before any more
    /// closed loop movement.
    ///
    /// Returns `TimedOut` when the full duration was driven or `Cancelled`
    /// if the controller's cancel token stopped it early.
    pub fn timed_raw_power(
        &self,
        power_left: f64,
        power_right: f64,
        duration: Duration
    ) -> Result<WaitOutcome, HalError> {
        debug!(
            "TimedRawPower {:.1} {:.1} for {:.3} s",
            power_left, power_right, duration.as_secs_f64()
        );

        self.set_paused(true);

        let result = self.hw.set_side_power(Side::Left, power_left)
            .and_then(|_| self.hw.set_side_power(Side::Right, power_right))
            .map(|_| poll_until(
                || false,
                self.params.poll_period(),
                duration,
                &self.cancel
            ));

        let stop = self.hw.stop_all();

        self.set_paused(false);

        let outcome = result?;
        stop?;

        Ok(outcome)
    }

    /// Block until both sides are within the leeway of their setpoints, the
    /// timeout elapses or the controller's cancel token is cancelled.
    ///
    /// All four motors are commanded to zero once before returning, whatever
    /// the outcome. The control tasks keep running, so they will drive the
    /// motors again on their next tick if the setpoints haven't been reached.
    pub fn wait_for_arrival(&self, timeout: Duration) -> WaitOutcome {
        let outcome = poll_until(
            || self.is_arrived(),
            self.params.poll_period(),
            timeout,
            &self.cancel
        );

        if let Err(e) = self.hw.stop_all() {
            warn!("Could not stop all motors after waiting: {}", e);
        }

        match outcome {
            WaitOutcome::Arrived => debug!("Arrived at setpoints"),
            _ => info!("WaitForArrival ended without arriving: {:?}", outcome)
        }

        outcome
    }

    /// Whether both sides are within the leeway of their setpoints.
    ///
    /// Unreadable feedback counts as not arrived.
    pub fn is_arrived(&self) -> bool {
        let leeway = self.params.move_cmd.distance_leeway_deg;
        let target = self.regs.snapshot().target;

        match self.feedback() {
            Ok(fb) => Side::BOTH
                .iter()
                .all(|s| (target.get(*s) - fb.get(*s)).abs() <= leeway),
            Err(e) => {
                warn!("Could not read feedback while waiting: {}", e);
                false
            }
        }
    }

    // ---- COORDINATES ----

    /// Re-anchor the pose at `(x, y)` facing `angle_deg`, zero the motor
    /// position counters and the setpoints.
    ///
    /// If the counters can't be zeroed the setpoints are left alone, the pose
    /// has already been set.
    pub fn reset_coordinates(
        &self,
        x: f64,
        y: f64,
        angle_deg: f64
    ) -> Result<(), HalError> {
        self.pose.set(Pose::from_degrees(x, y, angle_deg));

        self.hw.tare_all()?;

        self.regs.update(|r| r.target = EncoderTarget::default());

        info!(
            "Coordinates reset to ({:.2}, {:.2}) facing {:.1} deg",
            x, y, angle_deg
        );

        Ok(())
    }

    // ---- CALIBRATION ----

    /// Cap the magnitude of applied power at `limit` in place of the maximum
    /// power.
    pub fn set_power_cap(&self, limit: f64) {
        self.regs.update(|r| r.power_cap = PowerCap { active: true, limit });
    }

    /// Go back to bounding applied power by the maximum power.
    pub fn clear_power_cap(&self) {
        self.regs.update(|r| r.power_cap.active = false);
    }

    pub fn set_paused(&self, paused: bool) {
        self.regs.update(|r| r.paused = paused);
    }

    // ---- SCRIPTED ----

    /// Execute a single command.
    ///
    /// Waiting commands return how the wait ended, all others `None`.
    pub fn exec(&self, cmd: &DriveCmd) -> Result<Option<WaitOutcome>, HalError> {
        match *cmd {
            DriveCmd::MoveStraight { distance_in, ref opts } =>
                self.move_straight(distance_in, opts),
            DriveCmd::MoveToPoint { x, y, ref opts } =>
                self.move_to_point(x, y, opts),
            DriveCmd::TurnToBearing { angle_deg, ref opts } =>
                self.turn_to_bearing(angle_deg, opts),
            DriveCmd::TurnToPoint { x, y, ref opts } =>
                self.turn_to_point(x, y, opts),
            DriveCmd::TurnRelative { angle_deg, ref opts } =>
                self.turn_relative(angle_deg, opts),
            DriveCmd::TimedRawPower { power_left, power_right, duration_ms } =>
                return self.timed_raw_power(
                    power_left, power_right, millis_f64(duration_ms)
                ).map(Some),
            DriveCmd::WaitForArrival { timeout_ms } =>
                return Ok(Some(self.wait_for_arrival(millis_f64(timeout_ms)))),
            DriveCmd::ResetCoordinates { x, y, angle_deg } =>
                self.reset_coordinates(x, y, angle_deg)?,
            DriveCmd::SetPowerCap { limit } => self.set_power_cap(limit),
            DriveCmd::ClearPowerCap => self.clear_power_cap(),
            DriveCmd::SetPaused { paused } => self.set_paused(paused)
        }

        Ok(None)
    }

    /// Apply a setpoint change and its gains as one update.
    fn apply(&self, sp: SetpointDelta) {
        let target = self.regs.update(|r| {
            r.apply_setpoint(sp.delta, sp.gains);
            r.target
        });

        debug!(
            "Setpoints moved by ({:.1}, {:.1}) to ({:.1}, {:.1}), kp = {}, kd = {}",
            sp.delta.left, sp.delta.right, target.left, target.right,
            sp.gains.kp, sp.gains.kd
        );
    }
}
