//! # Drive library.
//!
//! Closed-loop drivetrain motion control for a four motor differential drive
//! robot. Movement commands write encoder setpoints into shared registers,
//! a PD task turns setpoint error into target power and a governor task
//! ramps, caps and gates that power before it reaches the motors.
//!
//! The executable in `main.rs` drives these modules from a command script
//! against simulated hardware.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Drive controller - the owned context tying the registers, tasks and commands together
pub mod drive_ctrl;

/// Hardware abstraction - motor outputs, position feedback and the competition phase
pub mod hal;

/// Localisation - the shared pose written by odometry
pub mod loc;

/// Movement command layer - converts motion goals into encoder setpoint deltas and gains
pub mod move_cmd;

/// PD setpoint controller - converts setpoint error into target power
pub mod pd_ctrl;

/// Power governor - ramps and caps target power before it reaches the motors
pub mod power_gov;

/// Shared setpoint, gain and power registers
pub mod registers;

/// Timeout bounded, cancellable waiting
pub mod wait;
