//! Drive controller module
//!
//! [`DriveCtrl`] owns everything the drive needs at run time: the hardware
//! handle, the shared registers, the pose store, the cancel token used by
//! waits, and the PD and power governor module states. Movement commands are
//! methods on it, called from whichever thread is running the autonomous
//! routine, while [`DriveCtrl::spawn_tasks`] runs the two control loops on
//! their own threads.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod commands;
mod params;
mod state;
mod tasks;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use state::*;
pub use tasks::*;

use crate::{move_cmd::MoveCmdError, power_gov::PowerGovError};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors when setting up or starting the drive controller.
#[derive(Debug, thiserror::Error)]
pub enum DriveCtrlError {
    #[error("Invalid movement parameters: {0}")]
    MoveCmd(#[from] MoveCmdError),

    #[error("Could not initialise the power governor: {0}")]
    PowerGov(#[from] PowerGovError),

    #[error("Could not spawn a control task: {0}")]
    Spawn(std::io::Error)
}
