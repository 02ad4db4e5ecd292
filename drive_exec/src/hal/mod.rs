//! # Hardware abstraction module
//!
//! The drive controller talks to the robot through the [`DriveHardware`]
//! trait: four independent motor outputs taking a signed power, and one
//! position feedback per side in encoder degrees. Whether the controller's
//! periodic tasks should be running is given by a [`PhaseSignal`].

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Simulated drive hardware.
pub mod sim;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc
};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A side of the drivetrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right
}

/// Identifies one of the four drive motors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotorId {
    FrontLeft,
    BackLeft,
    FrontRight,
    BackRight
}

/// Errors raised by the drive hardware.
#[derive(Debug, thiserror::Error)]
pub enum HalError {
    #[error("Motor {0:?} is not connected")]
    Disconnected(MotorId),

    #[error("Motor {0:?} reported a fault: {1}")]
    Fault(MotorId, String)
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Access to the drivetrain's motors and position feedback.
///
/// Implementations must be shareable between the periodic tasks and the
/// caller issuing movement commands, so all methods take `&self`.
pub trait DriveHardware: Send + Sync {

    /// Command a signed power to a single motor.
    fn set_power(&self, motor: MotorId, power: f64) -> Result<(), HalError>;

    /// Get the position feedback of one side of the drive.
    ///
    /// Units: encoder degrees
    fn position_deg(&self, side: Side) -> Result<f64, HalError>;

    /// Reset all motor position counters to zero.
    fn tare_all(&self) -> Result<(), HalError>;

    /// Command the same power to both motors on one side.
    fn set_side_power(&self, side: Side, power: f64) -> Result<(), HalError> {
        for motor in MotorId::on_side(side).iter() {
            self.set_power(*motor, power)?;
        }
        Ok(())
    }

    /// Command zero power to all four motors.
    ///
    /// Every motor is commanded even if an earlier one fails, the first error
    /// is returned.
    fn stop_all(&self) -> Result<(), HalError> {
        let mut result = Ok(());

        for motor in MotorId::ALL.iter() {
            if let Err(e) = self.set_power(*motor, 0.0) {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }

        result
    }
}

/// The competition phase signal.
///
/// The controller's periodic tasks run while `is_autonomous` is true and
/// exit once it goes false.
pub trait PhaseSignal: Send + Sync {
    fn is_autonomous(&self) -> bool;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A phase signal backed by a shared flag.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct AutonPhase {
    active: Arc<AtomicBool>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Side {
    /// Both sides, left first.
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];
}

impl MotorId {
    /// All four motors.
    pub const ALL: [MotorId; 4] = [
        MotorId::FrontLeft,
        MotorId::BackLeft,
        MotorId::FrontRight,
        MotorId::BackRight
    ];

    /// The side this motor drives.
    pub fn side(self) -> Side {
        match self {
            MotorId::FrontLeft | MotorId::BackLeft => Side::Left,
            MotorId::FrontRight | MotorId::BackRight => Side::Right
        }
    }

    /// The front and back motors of a side.
    pub fn on_side(side: Side) -> [MotorId; 2] {
        match side {
            Side::Left => [MotorId::FrontLeft, MotorId::BackLeft],
            Side::Right => [MotorId::FrontRight, MotorId::BackRight]
        }
    }

    /// Index of this motor in [`MotorId::ALL`].
    pub fn index(self) -> usize {
        match self {
            MotorId::FrontLeft => 0,
            MotorId::BackLeft => 1,
            MotorId::FrontRight => 2,
            MotorId::BackRight => 3
        }
    }
}

impl AutonPhase {
    /// Create a new phase signal, initially not autonomous.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the autonomous phase is active.
    pub fn set_autonomous(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }
}

impl PhaseSignal for AutonPhase {
    fn is_autonomous(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_motor_sides() {
        for side in Side::BOTH.iter() {
            for motor in MotorId::on_side(*side).iter() {
                assert_eq!(motor.side(), *side);
            }
        }

        for (i, motor) in MotorId::ALL.iter().enumerate() {
            assert_eq!(motor.index(), i);
        }
    }

    #[test]
    fn test_auton_phase_shared() {
        let phase = AutonPhase::new();
        let other = phase.clone();

        assert!(!other.is_autonomous());
        phase.set_autonomous(true);
        assert!(other.is_autonomous());
        phase.set_autonomous(false);
        assert!(!other.is_autonomous());
    }
}
