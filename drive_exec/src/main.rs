//! Drive executable entry point.
//!
//! # Architecture
//!
//! Runs a command script against the simulated drive:
//!
//!     - Initialise the session, logging and parameters
//!     - Create the simulated hardware and the drive controller
//!     - Enter the autonomous phase:
//!         - Start the simulation stepper and the control tasks
//!         - Execute the script's commands in order
//!     - Leave the autonomous phase and wait for the tasks to stop
//!
//! The script is the only argument.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::{eyre, WrapErr}, Report};
use log::{debug, info, warn};
use std::env;
use std::sync::Arc;
use std::time::Duration;

// Internal
use drive_lib::{
    drive_ctrl::{DriveCtrl, DriveCtrlParams},
    hal::{sim::{SimDrive, SimParams}, AutonPhase},
    loc::PoseStore,
    move_cmd::DriveCmd,
    wait::WaitOutcome
};
use util::{
    logger::{logger_init, LevelFilter},
    script_interpreter::ScriptInterpreter,
    session::Session
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Period at which the simulation is stepped.
const SIM_STEP_PERIOD: Duration = Duration::from_millis(5);

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    // ---- EARLY INITIALISATION ----

    color_eyre::install()?;

    // Initialise session
    let session = Session::new(
        "drive_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Drive Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let ctrl_params: DriveCtrlParams = util::params::load("drive_ctrl.toml")
        .wrap_err("Could not load drive controller params")?;
    let sim_params: SimParams = util::params::load("sim_drive.toml")
        .wrap_err("Could not load simulated drive params")?;

    info!("Exec parameters loaded");

    // ---- LOAD SCRIPT ----

    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    if args.len() != 2 {
        return Err(eyre!(
            "Expected a single script argument, found {}", args.len() - 1
        ));
    }

    info!("Loading script from \"{}\"", &args[1]);

    let mut si: ScriptInterpreter<DriveCmd> = ScriptInterpreter::new(&args[1])
        .wrap_err("Failed to load script")?;

    info!(
        "Loaded script {:?} contains {} commands\n",
        si.script_path(),
        si.get_num_cmds()
    );

    // ---- INITIALISE MODULES ----

    let pose = PoseStore::default();
    let sim = Arc::new(SimDrive::with_pose(sim_params, pose.clone()));

    let ctrl = Arc::new(
        DriveCtrl::new(ctrl_params, Arc::clone(&sim), pose)
            .wrap_err("Failed to initialise DriveCtrl")?
    );
    info!("DriveCtrl init complete");

    // ---- AUTONOMOUS PHASE ----

    let phase = AutonPhase::new();
    phase.set_autonomous(true);

    let stepper = sim.spawn_stepper(phase.clone(), SIM_STEP_PERIOD)
        .wrap_err("Failed to start the simulation")?;
    let tasks = ctrl.spawn_tasks(phase.clone())
        .wrap_err("Failed to start the control tasks")?;

    info!("Begining script execution\n");

    let mut result = Ok(());

    while let Some(cmd) = si.next_cmd() {
        debug!("Executing {:?}", cmd);

        match ctrl.exec(&cmd) {
            Ok(Some(WaitOutcome::Arrived)) | Ok(None) => (),
            // Raw power always runs for its full duration
            Ok(Some(WaitOutcome::TimedOut))
                if matches!(cmd, DriveCmd::TimedRawPower { .. }) => (),
            Ok(Some(outcome)) => warn!("{:?} ended with {:?}", cmd, outcome),
            Err(e) => {
                result = Err(e).wrap_err_with(|| format!("Failed to execute {:?}", cmd));
                break;
            }
        }
    }

    // ---- SHUTDOWN ----

    phase.set_autonomous(false);

    tasks.join().map_err(|_| eyre!("A control task panicked"))?;
    stepper.join().map_err(|_| eyre!("The simulation stepper panicked"))?;

    let p = ctrl.pose();
    info!(
        "Final pose: ({:.2}, {:.2}) facing {:.1} deg",
        p.x, p.y, p.bearing.to_degrees()
    );

    info!("End of execution");

    result
}
