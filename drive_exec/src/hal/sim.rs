//! # Simulated drive hardware
//!
//! A simple model of the four drive motors. Each motor's speed follows its
//! commanded power with a first order lag, and its position counter
//! integrates that speed. When given a [`PoseStore`] the simulation also
//! integrates the drive's differential kinematics into it, standing in for
//! the odometry task.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, trace};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

// Internal
use super::{DriveHardware, HalError, MotorId, PhaseSignal, Side};
use crate::{loc::PoseStore, registers::lock};
use util::maths::{abs_cap, lin_map};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the simulated drive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimParams {
    /// Power at which a motor reaches its free speed. Commands beyond this
    /// are saturated.
    pub max_power: f64,

    /// Motor speed at `max_power`.
    ///
    /// Units: encoder degrees/second
    pub free_speed_dps: f64,

    /// Time constant of the motor speed response.
    ///
    /// Units: seconds
    pub time_constant_s: f64,

    /// Distance travelled per encoder degree.
    ///
    /// Units: inches/degree
    pub in_per_deg: f64,

    /// Distance between the left and right wheels.
    ///
    /// Units: inches
    pub track_width_in: f64
}

#[derive(Debug, Clone, Copy, Default)]
struct SimMotor {
    power: f64,
    velocity_dps: f64,
    position_deg: f64,
    disconnected: bool
}

/// Simulated drive hardware.
pub struct SimDrive {
    params: SimParams,
    motors: Mutex<[SimMotor; 4]>,
    pose: Option<PoseStore>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimDrive {
    /// Create a new simulation with all motors stopped at zero.
    pub fn new(params: SimParams) -> Self {
        Self {
            params,
            motors: Mutex::new([SimMotor::default(); 4]),
            pose: None
        }
    }

    /// Create a new simulation which also integrates the robot's pose.
    pub fn with_pose(params: SimParams, pose: PoseStore) -> Self {
        Self {
            pose: Some(pose),
            ..Self::new(params)
        }
    }

    /// The last power commanded to a motor.
    pub fn power(&self, motor: MotorId) -> f64 {
        lock(&self.motors)[motor.index()].power
    }

    /// Force the position counters of both motors on a side.
    pub fn set_position(&self, side: Side, position_deg: f64) {
        let mut motors = lock(&self.motors);
        for motor in MotorId::on_side(side).iter() {
            motors[motor.index()].position_deg = position_deg;
        }
    }

    /// Simulate a motor being unplugged (or plugged back in).
    pub fn set_disconnected(&self, motor: MotorId, disconnected: bool) {
        lock(&self.motors)[motor.index()].disconnected = disconnected;
    }

    /// Advance the simulation by `dt_s` seconds.
    pub fn step(&self, dt_s: f64) {
        let max_power = self.params.max_power;
        let free_speed = self.params.free_speed_dps;
        let alpha = if self.params.time_constant_s > 0.0 {
            (dt_s / self.params.time_constant_s).min(1.0)
        }
        else {
            1.0
        };

        let mut travel_deg = [0f64; 4];

        {
            let mut motors = lock(&self.motors);

            for (i, m) in motors.iter_mut().enumerate() {
                let power = if m.disconnected {
                    0.0
                }
                else {
                    abs_cap(m.power, max_power)
                };
                let target_dps = lin_map(
                    (-max_power, max_power),
                    (-free_speed, free_speed),
                    power
                );

                m.velocity_dps += (target_dps - m.velocity_dps) * alpha;
                travel_deg[i] = m.velocity_dps * dt_s;
                m.position_deg += travel_deg[i];
            }
        }

        if let Some(ref pose) = self.pose {
            let left_in = 0.5 * (travel_deg[0] + travel_deg[1]) * self.params.in_per_deg;
            let right_in = 0.5 * (travel_deg[2] + travel_deg[3]) * self.params.in_per_deg;

            let dist_in = 0.5 * (left_in + right_in);
            let dbearing = (left_in - right_in) / self.params.track_width_in;

            pose.update(|p| {
                let mid_bearing = p.bearing + 0.5 * dbearing;
                p.x += dist_in * mid_bearing.sin();
                p.y += dist_in * mid_bearing.cos();
                p.bearing += dbearing;
            });
        }
    }

    /// Spawn a thread which steps the simulation in real time every `period`
    /// for as long as the phase is autonomous.
    pub fn spawn_stepper<P>(
        self: &Arc<Self>,
        phase: P,
        period: Duration
    ) -> std::io::Result<JoinHandle<()>>
    where
        P: PhaseSignal + 'static
    {
        let sim = Arc::clone(self);

        thread::Builder::new()
            .name("sim_drive".into())
            .spawn(move || {
                info!("SimDrive stepper started");

                let mut last = Instant::now();

                while phase.is_autonomous() {
                    thread::sleep(period);

                    let now = Instant::now();
                    sim.step((now - last).as_secs_f64());
                    last = now;

                    trace!(
                        "SimDrive feedback: {:.1} {:.1}",
                        sim.position_deg(Side::Left).unwrap_or(std::f64::NAN),
                        sim.position_deg(Side::Right).unwrap_or(std::f64::NAN)
                    );
                }

                info!("SimDrive stepper stopped");
            })
    }
}

impl DriveHardware for SimDrive {
    fn set_power(&self, motor: MotorId, power: f64) -> Result<(), HalError> {
        let mut motors = lock(&self.motors);
        let m = &mut motors[motor.index()];

        if m.disconnected {
            return Err(HalError::Disconnected(motor));
        }

        m.power = power;
        Ok(())
    }

    /// Feedback is taken from the back motor of each side.
    fn position_deg(&self, side: Side) -> Result<f64, HalError> {
        let motor = match side {
            Side::Left => MotorId::BackLeft,
            Side::Right => MotorId::BackRight
        };

        let motors = lock(&self.motors);
        let m = &motors[motor.index()];

        if m.disconnected {
            return Err(HalError::Disconnected(motor));
        }

        Ok(m.position_deg)
    }

    fn tare_all(&self) -> Result<(), HalError> {
        let mut motors = lock(&self.motors);

        if let Some(i) = motors.iter().position(|m| m.disconnected) {
            return Err(HalError::Disconnected(MotorId::ALL[i]));
        }

        for m in motors.iter_mut() {
            m.position_deg = 0.0;
        }

        Ok(())
    }
}

/// Parameters used throughout the tests.
#[cfg(test)]
pub(crate) fn test_sim_params() -> SimParams {
    SimParams {
        max_power: 100.0,
        free_speed_dps: 1000.0,
        time_constant_s: 0.0,
        in_per_deg: 0.05,
        track_width_in: 10.0
    }
}
