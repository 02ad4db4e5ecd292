//! # Shared registers
//!
//! The state shared between the movement commands and the two periodic
//! control tasks: encoder setpoints, the active gain pair, the PD target
//! power, the power cap and the pause flag.
//!
//! All of it lives in one [`Registers`] value behind [`SharedRegisters`].
//! Readers take a consistent [`SharedRegisters::snapshot`], writers apply a
//! whole change in one [`SharedRegisters::update`], so a tick can never see a
//! new setpoint paired with old gains (or one command's `kp` with another's
//! `kd`).

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::hal::Side;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A value for each side of the drivetrain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SidePair {
    pub left: f64,
    pub right: f64
}

/// Target positions of the two sides.
///
/// Units: encoder degrees
pub type EncoderTarget = SidePair;

/// Unclamped power demanded by the PD controller for each side.
pub type PowerTarget = SidePair;

/// Proportional and derivative gains for the PD controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GainPair {
    pub kp: f64,
    pub kd: f64
}

/// Custom cap on applied power magnitude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerCap {
    /// If false the governor falls back to its maximum power.
    pub active: bool,

    /// Cap on the magnitude of applied power while active.
    pub limit: f64
}

/// The full register set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Registers {
    /// Encoder setpoints, changed additively by movement commands.
    pub target: EncoderTarget,

    /// Gains used by the PD controller, replaced whole by each movement
    /// command.
    pub gains: GainPair,

    /// Output of the PD controller, input to the power governor.
    pub power_target: PowerTarget,

    pub power_cap: PowerCap,

    /// While set the power governor computes but does not command the
    /// motors.
    pub paused: bool
}

/// Shared handle to the registers.
///
/// Clones share the same registers.
#[derive(Debug, Clone, Default)]
pub struct SharedRegisters {
    regs: Arc<Mutex<Registers>>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SidePair {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// The same value on both sides.
    pub fn splat(value: f64) -> Self {
        Self::new(value, value)
    }

    pub fn get(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right
        }
    }

    /// Apply `f` to each side.
    pub fn map<F>(self, mut f: F) -> Self
    where
        F: FnMut(f64) -> f64
    {
        Self::new(f(self.left), f(self.right))
    }

    /// Combine each side with the same side of `other`.
    pub fn zip_with<F>(self, other: Self, mut f: F) -> Self
    where
        F: FnMut(f64, f64) -> f64
    {
        Self::new(f(self.left, other.left), f(self.right, other.right))
    }
}

impl std::ops::Add for SidePair {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl std::ops::Sub for SidePair {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl GainPair {
    pub fn new(kp: f64, kd: f64) -> Self {
        Self { kp, kd }
    }
}

impl Registers {
    /// Add a setpoint delta and replace the gain pair, as every movement
    /// command does.
    pub fn apply_setpoint(&mut self, delta: EncoderTarget, gains: GainPair) {
        self.target = self.target + delta;
        self.gains = gains;
    }
}

impl SharedRegisters {
    /// Create new registers with zero setpoints, no cap, not paused, and the
    /// given gains.
    pub fn new(gains: GainPair) -> Self {
        Self {
            regs: Arc::new(Mutex::new(Registers {
                gains,
                ..Registers::default()
            }))
        }
    }

    /// Get a consistent copy of all registers.
    pub fn snapshot(&self) -> Registers {
        *lock(&self.regs)
    }

    /// Apply a change to the registers as a single unit.
    pub fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Registers) -> R
    {
        f(&mut *lock(&self.regs))
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Lock a mutex, recovering the data if another thread panicked while
/// holding it.
///
/// The registers only hold plain values, a panic mid-update can't leave them
/// in a state the control loops can't carry on from.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
