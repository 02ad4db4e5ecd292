//! Implementations for the PowerGov state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;
use std::convert::Infallible;

// Internal
use super::{Params, PowerGovError};
use crate::registers::{PowerCap, PowerTarget, SidePair};
use util::{maths::abs_cap, module::State};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Power governor module state
#[derive(Debug, Default)]
pub struct PowerGov {
    params: Params,

    /// Power applied on the previous cycle.
    applied: SidePair,

    report: StatusReport
}

/// Input data to the power governor.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputData {
    /// Power demanded by the PD controller.
    pub target: PowerTarget,

    pub cap: PowerCap
}

/// A flag for each side of the drivetrain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SideFlags {
    pub left: bool,
    pub right: bool
}

/// Status report for PowerGov processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// The change in applied power was limited by the ramp power.
    pub ramp_limited: SideFlags,

    /// The applied power was limited by the cap or the maximum power.
    pub power_limited: SideFlags
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for PowerGov {
    type InitData = Params;
    type InitError = PowerGovError;

    type InputData = InputData;
    type OutputData = SidePair;
    type StatusReport = StatusReport;
    type ProcError = Infallible;

    /// Initialise the PowerGov module.
    ///
    /// The applied power is reset to zero.
    fn init(&mut self, init_data: Self::InitData)
        -> Result<(), Self::InitError>
    {
        if !(init_data.ramp_power > 0.0) {
            return Err(PowerGovError::InvalidRampPower(init_data.ramp_power));
        }
        if !(init_data.max_power > 0.0) {
            return Err(PowerGovError::InvalidMaxPower(init_data.max_power));
        }

        *self = Self {
            params: init_data,
            ..Self::default()
        };

        Ok(())
    }

    /// Perform one cycle of the power governor.
    ///
    /// The output is the power to apply to each side. Whether it is actually
    /// commanded is up to the caller.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let limit = if input_data.cap.active {
            input_data.cap.limit
        }
        else {
            self.params.max_power
        };

        let left = self.govern(self.applied.left, input_data.target.left, limit);
        let right = self.govern(self.applied.right, input_data.target.right, limit);

        self.applied = SidePair::new(left.0, right.0);
        self.report = StatusReport {
            ramp_limited: SideFlags { left: left.1, right: right.1 },
            power_limited: SideFlags { left: left.2, right: right.2 }
        };

        trace!(
            "PowerGov applied: {:.2} {:.2} (limit {:.1})",
            self.applied.left, self.applied.right, limit
        );

        Ok((self.applied, self.report))
    }
}

impl PowerGov {
    /// Power applied on the most recent cycle.
    pub fn applied(&self) -> SidePair {
        self.applied
    }

    pub fn report(&self) -> StatusReport {
        self.report
    }

    /// Ramp then bound one side's power, returning the new applied power and
    /// whether the ramp and power limits were hit.
    fn govern(&self, applied: f64, target: f64, limit: f64) -> (f64, bool, bool) {
        let delta = target - applied;
        let ramped_delta = abs_cap(delta, self.params.ramp_power);
        let ramped = applied + ramped_delta;

        let bounded = abs_cap(ramped, limit);

        (bounded, ramped_delta != delta, bounded != ramped)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn gov(ramp_power: f64, max_power: f64) -> PowerGov {
        let mut gov = PowerGov::default();
        gov.init(Params { ramp_power, max_power }).unwrap();
        gov
    }

    fn input(left: f64, right: f64, cap: Option<f64>) -> InputData {
        InputData {
            target: SidePair::new(left, right),
            cap: match cap {
                Some(limit) => PowerCap { active: true, limit },
                None => PowerCap::default()
            }
        }
    }

    #[test]
    fn test_init_validates() {
        let mut g = PowerGov::default();

        assert!(matches!(
            g.init(Params { ramp_power: 0.0, max_power: 100.0 }),
            Err(PowerGovError::InvalidRampPower(_))
        ));
        assert!(matches!(
            g.init(Params { ramp_power: 5.0, max_power: -1.0 }),
            Err(PowerGovError::InvalidMaxPower(_))
        ));
        assert!(matches!(
            g.init(Params { ramp_power: std::f64::NAN, max_power: 100.0 }),
            Err(PowerGovError::InvalidRampPower(_))
        ));
        assert!(g.init(Params { ramp_power: 5.0, max_power: 100.0 }).is_ok());
    }

    #[test]
    fn test_ramp_bound() {
        let mut g = gov(5.0, 100.0);
        let mut prev = SidePair::default();

        // Alternate between extreme targets, each cycle must move by no
        // more than the ramp power
        for i in 0..200 {
            let t = if (i / 30) % 2 == 0 { 1000.0 } else { -1000.0 };
            let (applied, _) = g.proc(&input(t, -t, None)).unwrap();

            assert!((applied.left - prev.left).abs() <= 5.0 + 1e-9);
            assert!((applied.right - prev.right).abs() <= 5.0 + 1e-9);
            prev = applied;
        }
    }

    #[test]
    fn test_ramp_reaches_target() {
        let mut g = gov(5.0, 100.0);

        let (applied, report) = g.proc(&input(12.0, -3.0, None)).unwrap();
        assert_eq!(applied, SidePair::new(5.0, -3.0));
        assert_eq!(report.ramp_limited, SideFlags { left: true, right: false });

        g.proc(&input(12.0, -3.0, None)).unwrap();
        let (applied, report) = g.proc(&input(12.0, -3.0, None)).unwrap();
        assert_eq!(applied, SidePair::new(12.0, -3.0));
        assert_eq!(report, StatusReport::default());
    }

    #[test]
    fn test_power_bound() {
        let mut g = gov(50.0, 100.0);

        for _ in 0..10 {
            let (applied, _) = g.proc(&input(1000.0, -1000.0, None)).unwrap();
            assert!(applied.left.abs() <= 100.0);
            assert!(applied.right.abs() <= 100.0);
        }
        assert_eq!(g.applied(), SidePair::new(100.0, -100.0));
        assert_eq!(g.report().power_limited, SideFlags { left: true, right: true });

        // A cap takes over from the maximum power straight away
        for _ in 0..10 {
            let (applied, _) = g.proc(&input(1000.0, -1000.0, Some(30.0))).unwrap();
            assert!(applied.left.abs() <= 30.0);
            assert!(applied.right.abs() <= 30.0);
        }
        assert_eq!(g.applied(), SidePair::new(30.0, -30.0));

        // Clearing the cap ramps back up
        let (applied, _) = g.proc(&input(1000.0, -1000.0, None)).unwrap();
        assert_eq!(applied, SidePair::new(80.0, -80.0));
    }

    #[test]
    fn test_cap_above_max() {
        let mut g = gov(500.0, 100.0);

        // An active cap replaces the maximum, it doesn't combine with it
        let (applied, report) = g.proc(&input(150.0, 0.0, Some(120.0))).unwrap();
        assert_eq!(applied.left, 120.0);
        assert!(report.power_limited.left);
    }
}
