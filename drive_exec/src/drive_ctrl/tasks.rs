//! Periodic control tasks
//!
//! The PD controller and the power governor each run on their own thread at
//! the controller's tick period for as long as the phase signal reports the
//! autonomous phase.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, warn};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

// Internal
use super::{DriveCtrl, DriveCtrlError};
use crate::hal::{DriveHardware, PhaseSignal};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Handles to the running control tasks.
pub struct TaskHandles {
    pd_ctrl: JoinHandle<()>,
    power_gov: JoinHandle<()>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<H> DriveCtrl<H>
where
    H: DriveHardware + 'static
{
    /// Start the PD controller and power governor tasks.
    ///
    /// Both modules are reset first. The tasks exit at the end of the first
    /// tick after `phase` stops reporting autonomous.
    pub fn spawn_tasks<P>(self: &Arc<Self>, phase: P) -> Result<TaskHandles, DriveCtrlError>
    where
        P: PhaseSignal + Clone + 'static
    {
        self.init_modules()?;

        let period = self.params.tick_period();

        let ctrl = Arc::clone(self);
        let pd_ctrl = spawn_periodic("pd_ctrl", period, phase.clone(), move || {
            if let Err(e) = ctrl.pd_tick() {
                warn!("PdCtrl tick skipped, could not read feedback: {}", e);
            }
        })?;

        let ctrl = Arc::clone(self);
        let power_gov = spawn_periodic("power_gov", period, phase, move || {
            if let Err(e) = ctrl.gov_tick() {
                warn!("PowerGov could not command the motors: {}", e);
            }
        })?;

        info!("Control tasks started");

        Ok(TaskHandles { pd_ctrl, power_gov })
    }
}

impl TaskHandles {
    /// Wait for both tasks to exit.
    ///
    /// If either task panicked the panic payload is returned.
    pub fn join(self) -> thread::Result<()> {
        let pd_ctrl = self.pd_ctrl.join();
        let power_gov = self.power_gov.join();

        pd_ctrl.and(power_gov)
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Spawn a thread calling `tick` once every `period` while `phase` is
/// autonomous.
fn spawn_periodic<P, F>(
    name: &'static str,
    period: Duration,
    phase: P,
    mut tick: F
) -> Result<JoinHandle<()>, DriveCtrlError>
where
    P: PhaseSignal + 'static,
    F: FnMut() + Send + 'static
{
    thread::Builder::new()
        .name(name.into())
        .spawn(move || {
            info!("Task {} started", name);

            while phase.is_autonomous() {
                let cycle_start_instant = Instant::now();

                tick();

                // ---- CYCLE MANAGEMENT ----

                let cycle_dur = Instant::now() - cycle_start_instant;

                match period.checked_sub(cycle_dur) {
                    Some(d) => thread::sleep(d),
                    None => warn!(
                        "Task {} cycle overran by {:.06} s",
                        name,
                        cycle_dur.as_secs_f64() - period.as_secs_f64()
                    )
                }
            }

            info!("Task {} stopped", name);
        })
        .map_err(DriveCtrlError::Spawn)
}
