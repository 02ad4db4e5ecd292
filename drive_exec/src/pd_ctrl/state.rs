//! Implementations for the PdCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;
use std::convert::Infallible;

// Internal
use crate::registers::{EncoderTarget, GainPair, PowerTarget, SidePair};
use util::module::State;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// PD controller module state
#[derive(Debug, Default)]
pub struct PdCtrl {
    /// Error from the previous cycle, zero before the first.
    prev_error: SidePair,

    report: StatusReport
}

/// Input data to the PD controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputData {
    /// Current setpoints.
    pub target: EncoderTarget,

    /// Measured position of each side.
    ///
    /// Units: encoder degrees
    pub feedback: SidePair,

    /// Gains to use this cycle.
    pub gains: GainPair
}

/// Status report for PdCtrl processing.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusReport {
    /// Setpoint error this cycle.
    pub error: SidePair,

    /// Change in error since the previous cycle.
    pub delta_error: SidePair
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for PdCtrl {
    type InitData = ();
    type InitError = Infallible;

    type InputData = InputData;
    type OutputData = PowerTarget;
    type StatusReport = StatusReport;
    type ProcError = Infallible;

    /// Initialise the PdCtrl module, clearing the previous error.
    fn init(&mut self, _init_data: Self::InitData)
        -> Result<(), Self::InitError>
    {
        *self = Self::default();
        Ok(())
    }

    /// Perform one cycle of the PD controller.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let GainPair { kp, kd } = input_data.gains;

        let error = input_data.target - input_data.feedback;
        let delta_error = error - self.prev_error;

        let power = error.zip_with(delta_error, |e, d| kp * e + kd * d);

        self.prev_error = error;
        self.report = StatusReport { error, delta_error };

        trace!(
            "PdCtrl error: {:.2} {:.2}, power: {:.2} {:.2}",
            error.left, error.right, power.left, power.right
        );

        Ok((power, self.report))
    }
}

impl PdCtrl {
    /// Status report from the most recent cycle.
    pub fn report(&self) -> StatusReport {
        self.report
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn input(target: f64, feedback: f64, kp: f64, kd: f64) -> InputData {
        InputData {
            target: SidePair::new(target, -target),
            feedback: SidePair::new(feedback, -feedback),
            gains: GainPair::new(kp, kd)
        }
    }

    #[test]
    fn test_first_cycle() {
        let mut pd = PdCtrl::default();

        // Previous error starts at zero so the first derivative term is the
        // full error
        let (power, report) = pd.proc(&input(100.0, 0.0, 0.5, 0.1)).unwrap();

        assert!((power.left - 60.0).abs() < 1e-9);
        assert!((power.right + 60.0).abs() < 1e-9);
        assert_eq!(report.error, SidePair::new(100.0, -100.0));
        assert_eq!(report.delta_error, SidePair::new(100.0, -100.0));
    }

    #[test]
    fn test_derivative_damps() {
        let mut pd = PdCtrl::default();

        pd.proc(&input(100.0, 0.0, 0.5, 0.1)).unwrap();
        let (power, report) = pd.proc(&input(100.0, 40.0, 0.5, 0.1)).unwrap();

        // 0.5 * 60 + 0.1 * (60 - 100)
        assert!((power.left - 26.0).abs() < 1e-9);
        assert_eq!(report.delta_error.left, -40.0);
        assert_eq!(pd.report().error.left, 60.0);
    }

    #[test]
    fn test_unclamped() {
        let mut pd = PdCtrl::default();
        let (power, _) = pd.proc(&input(10_000.0, 0.0, 1.0, 0.0)).unwrap();

        assert_eq!(power.left, 10_000.0);
    }

    #[test]
    fn test_init_resets() {
        let mut pd = PdCtrl::default();

        pd.proc(&input(100.0, 0.0, 1.0, 1.0)).unwrap();
        pd.init(()).unwrap();

        let (_, report) = pd.proc(&input(100.0, 0.0, 1.0, 1.0)).unwrap();
        assert_eq!(report.delta_error.left, 100.0);
    }
}
