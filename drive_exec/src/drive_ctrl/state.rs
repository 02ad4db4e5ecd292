//! Implementations for the DriveCtrl structure and its control ticks

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;
use std::sync::{Arc, Mutex};

// Internal
use super::{DriveCtrlError, DriveCtrlParams};
use crate::{
    hal::{DriveHardware, HalError, Side},
    loc::{Pose, PoseStore},
    move_cmd::MoveOpts,
    pd_ctrl::{self, PdCtrl},
    power_gov::{self, PowerGov},
    registers::{lock, Registers, SharedRegisters, SidePair},
    wait::CancelToken
};
use util::module::State;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The drive controller.
pub struct DriveCtrl<H> {
    pub(crate) params: DriveCtrlParams,

    pub(crate) hw: Arc<H>,

    pub(crate) regs: SharedRegisters,

    pub(crate) pose: PoseStore,

    pub(crate) cancel: CancelToken,

    pd_ctrl: Mutex<PdCtrl>,

    power_gov: Mutex<PowerGov>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<H> DriveCtrl<H>
where
    H: DriveHardware
{
    /// Create a new drive controller.
    ///
    /// The setpoints start at zero, so the hardware's position counters
    /// should be zero too (or `reset_coordinates` called before moving). The
    /// active gains start as the drive defaults.
    pub fn new(
        params: DriveCtrlParams,
        hw: Arc<H>,
        pose: PoseStore
    ) -> Result<Self, DriveCtrlError> {
        params.move_cmd.validate()?;

        let mut power_gov = PowerGov::default();
        power_gov.init(params.power_gov.clone())?;

        let regs = SharedRegisters::new(
            params.move_cmd.drive_gains(&MoveOpts::default())
        );

        info!(
            "DriveCtrl created with a {:.1} ms tick",
            params.tick_period_ms
        );

        Ok(Self {
            params,
            hw,
            regs,
            pose,
            cancel: CancelToken::new(),
            pd_ctrl: Mutex::new(PdCtrl::default()),
            power_gov: Mutex::new(power_gov)
        })
    }

    pub fn params(&self) -> &DriveCtrlParams {
        &self.params
    }

    /// A consistent copy of the shared registers.
    pub fn registers(&self) -> Registers {
        self.regs.snapshot()
    }

    pub fn pose(&self) -> Pose {
        self.pose.get()
    }

    /// The token which cancels this controller's waits.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Read the position feedback of both sides.
    pub fn feedback(&self) -> Result<SidePair, HalError> {
        Ok(SidePair::new(
            self.hw.position_deg(Side::Left)?,
            self.hw.position_deg(Side::Right)?
        ))
    }

    /// Reset the cyclic state of the PD controller and power governor.
    pub(crate) fn init_modules(&self) -> Result<(), DriveCtrlError> {
        lock(&self.pd_ctrl).init(()).unwrap_or_else(|never| match never {});
        lock(&self.power_gov).init(self.params.power_gov.clone())?;

        Ok(())
    }

    /// Run one cycle of the PD controller.
    ///
    /// If the feedback can't be read the error is returned and the registers
    /// are left untouched.
    pub fn pd_tick(&self) -> Result<pd_ctrl::StatusReport, HalError> {
        let feedback = self.feedback()?;
        let regs = self.regs.snapshot();

        let input = pd_ctrl::InputData {
            target: regs.target,
            feedback,
            gains: regs.gains
        };

        let (power, report) = match lock(&self.pd_ctrl).proc(&input) {
            Ok(o) => o,
            Err(never) => match never {}
        };

        self.regs.update(|r| r.power_target = power);

        Ok(report)
    }

    /// Run one cycle of the power governor.
    ///
    /// The new applied power is commanded to the motors unless the registers
    /// are paused. Both sides are commanded even if the first fails.
    pub fn gov_tick(&self) -> Result<power_gov::StatusReport, HalError> {
        let regs = self.regs.snapshot();

        let input = power_gov::InputData {
            target: regs.power_target,
            cap: regs.power_cap
        };

        let (applied, report) = match lock(&self.power_gov).proc(&input) {
            Ok(o) => o,
            Err(never) => match never {}
        };

        if !regs.paused {
            let left = self.hw.set_side_power(Side::Left, applied.left);
            let right = self.hw.set_side_power(Side::Right, applied.right);
            left.and(right)?;
        }

        Ok(report)
    }
}

/// A controller over a fresh simulated drive, with the test parameters.
#[cfg(test)]
pub(crate) fn sim_drive_ctrl() -> (Arc<crate::hal::sim::SimDrive>, DriveCtrl<crate::hal::sim::SimDrive>) {
    use crate::hal::sim::{test_sim_params, SimDrive};

    let sim = Arc::new(SimDrive::new(test_sim_params()));
    let ctrl = DriveCtrl::new(
        super::test_drive_ctrl_params(),
        Arc::clone(&sim),
        PoseStore::default()
    ).unwrap();

    (sim, ctrl)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hal::MotorId;
    use crate::registers::GainPair;

    #[test]
    fn test_new_validates() {
        let sim = Arc::new(crate::hal::sim::SimDrive::new(
            crate::hal::sim::test_sim_params()
        ));

        let mut params = super::super::test_drive_ctrl_params();
        params.move_cmd.in_per_deg = -1.0;
        assert!(matches!(
            DriveCtrl::new(params, Arc::clone(&sim), PoseStore::default()),
            Err(DriveCtrlError::MoveCmd(_))
        ));

        let mut params = super::super::test_drive_ctrl_params();
        params.power_gov.ramp_power = 0.0;
        assert!(matches!(
            DriveCtrl::new(params, sim, PoseStore::default()),
            Err(DriveCtrlError::PowerGov(_))
        ));
    }

    #[test]
    fn test_initial_gains() {
        let (_, ctrl) = sim_drive_ctrl();
        assert_eq!(ctrl.registers().gains, GainPair::new(0.3, 0.5));
    }

    #[test]
    fn test_ticks() {
        let (sim, ctrl) = sim_drive_ctrl();

        ctrl.move_straight(12.0, &MoveOpts::default());

        // 0.3 * 150 + 0.5 * (150 - 0)
        let report = ctrl.pd_tick().unwrap();
        assert_eq!(report.error, SidePair::splat(150.0));
        assert!((ctrl.registers().power_target.left - 120.0).abs() < 1e-9);

        // Ramped by 10 per tick
        ctrl.gov_tick().unwrap();
        for motor in MotorId::ALL.iter() {
            assert!((sim.power(*motor) - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_pd_tick_skipped_without_feedback() {
        let (sim, ctrl) = sim_drive_ctrl();

        ctrl.move_straight(12.0, &MoveOpts::default());
        sim.set_disconnected(MotorId::BackRight, true);

        assert!(matches!(
            ctrl.pd_tick(),
            Err(HalError::Disconnected(MotorId::BackRight))
        ));
        assert_eq!(ctrl.registers().power_target, SidePair::default());
    }

    #[test]
    fn test_paused_gov_tick_does_not_command() {
        let (sim, ctrl) = sim_drive_ctrl();

        ctrl.regs.update(|r| r.power_target = SidePair::new(50.0, -50.0));
        ctrl.set_paused(true);

        let report = ctrl.gov_tick().unwrap();
        assert!(report.ramp_limited.left && report.ramp_limited.right);
        for motor in MotorId::ALL.iter() {
            assert_eq!(sim.power(*motor), 0.0);
        }

        // The ramp kept going while paused
        ctrl.set_paused(false);
        ctrl.gov_tick().unwrap();
        assert_eq!(sim.power(MotorId::FrontLeft), 20.0);
        assert_eq!(sim.power(MotorId::BackRight), -20.0);
    }

    #[test]
    fn test_gov_tick_commands_both_sides_on_error() {
        let (sim, ctrl) = sim_drive_ctrl();

        ctrl.regs.update(|r| r.power_target = SidePair::new(5.0, 5.0));
        sim.set_disconnected(MotorId::FrontLeft, true);

        assert!(ctrl.gov_tick().is_err());
        assert_eq!(sim.power(MotorId::FrontRight), 5.0);
        assert_eq!(sim.power(MotorId::BackRight), 5.0);
    }
}
