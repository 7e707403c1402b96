//! Main drive executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and modules
//!     - Load or generate the trajectory to follow
//!     - Main loop:
//!         - Tracking command execution (sample -> control -> kinematics)
//!         - Archive writing
//!         - Completion polling
//!         - Cycle management
//!
//! The executable drives the tracking command against simulated odometry, so
//! it can run on any host. Swapping `SimOdom` for a real localisation client
//! and module servo client is the only hardware-specific work.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use drive_lib::{
    holo_ctrl::{self, HoloCtrl},
    loc::Pose,
    sim_odom::SimOdom,
    swerve_kin::{self, SwerveKin},
    traj::{Traj, TrajPoint},
    traj_ctrl::{self, TrajCtrl},
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::{eyre, WrapErr}, Report};
use log::{info, warn};
use std::cell::RefCell;
use std::env;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    archive::Archiver,
    command::{Command, ResourceToken},
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one control cycle.
const CYCLE_PERIOD_S: f64 = 0.02;

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
    logger_init(LevelFilter::Trace, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Hydra Drive Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let traj_ctrl_params: traj_ctrl::Params = util::params::load("traj_ctrl.toml")
        .wrap_err("Could not load traj_ctrl params")?;
    let holo_ctrl_params: holo_ctrl::Params = util::params::load("holo_ctrl.toml")
        .wrap_err("Could not load holo_ctrl params")?;
    let swerve_kin_params: swerve_kin::Params = util::params::load("swerve_kin.toml")
        .wrap_err("Could not load swerve_kin params")?;

    info!("Exec parameters loaded");

    // ---- LOAD TRAJECTORY ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    // If we have a single argument use it as the trajectory file path,
    // otherwise follow the built-in demonstration arc.
    let traj = if args.len() == 2 {
        info!("Loading trajectory from \"{}\"", &args[1]);

        let traj_str = std::fs::read_to_string(&args[1])
            .wrap_err("Failed to read the trajectory file")?;
        let points: Vec<TrajPoint> = serde_json::from_str(&traj_str)
            .wrap_err("Failed to parse the trajectory file")?;

        Traj::new(points).wrap_err("Trajectory file is invalid")?
    }
    else if args.len() == 1 {
        info!("No trajectory provided, following the built-in demo arc");
        demo_traj()
    }
    else {
        return Err(eyre!(
            "Expected either zero or one argument, found {}", args.len() - 1)
        );
    };

    info!(
        "Trajectory lasts {:.02} s and contains {} points\n",
        traj.duration_s(),
        traj.num_points()
    );

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let kin = SwerveKin::new(&swerve_kin_params)
        .wrap_err("Failed to initialise SwerveKin")?;
    info!("SwerveKin init complete ({} modules)", kin.num_modules());

    let ctrl = HoloCtrl::new(&holo_ctrl_params);
    info!("HoloCtrl init complete");

    // Simulated odometry starting on the trajectory's first pose
    let sim = Rc::new(RefCell::new(SimOdom::new(
        traj.sample(0.0).pose,
        kin.clone(),
        CYCLE_PERIOD_S
    )));

    let mut cmd = TrajCtrl::new(
        traj,
        Box::new(sim.clone()),
        Box::new(sim.clone()),
        kin,
        ctrl,
        traj_ctrl_params,
        vec![ResourceToken("drivetrain")]
    );

    info!("Module initialisation complete\n");

    // ---- INITIALISE ARCHIVES ----

    let mut arch_report = Archiver::from_path(
        &session, "traj_ctrl/status_report.csv"
    ).map_err(|e| eyre!("Failed to create the status report archive: {}", e))?;

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    cmd.init();

    let mut num_cycles: u64 = 0;

    loop {

        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // ---- TRACKING ----

        cmd.execute();

        // ---- WRITE ARCHIVES ----

        if let Err(e) = arch_report.serialise(cmd.report()) {
            warn!("Could not archive the status report: {}", e);
        }

        // ---- COMPLETION ----

        if cmd.is_finished() {
            break;
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S)
            .checked_sub(cycle_dur)
        {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64()
                    - Duration::from_secs_f64(CYCLE_PERIOD_S).as_secs_f64()
            )
        }

        // Increment cycle counter
        num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    cmd.end(false);

    let report = cmd.report();
    let end_pose = sim.borrow().pose();

    if report.arrived {
        info!(
            "Arrived after {:.02} s ({} cycles)",
            report.elapsed_s, num_cycles
        );
    }
    else {
        warn!(
            "Timed out after {:.02} s ({} cycles) without arriving",
            report.elapsed_s, num_cycles
        );
    }

    info!(
        "Final pose: ({:.03}, {:.03}) m, {:.03} rad",
        end_pose.position_m[0],
        end_pose.position_m[1],
        end_pose.heading_rad
    );

    info!("End of execution");

    Ok(())
}

/// Generate the built-in demonstration trajectory.
///
/// A quarter-circle arc of 2 m radius traversed in 4 s at constant speed,
/// with the heading following the path tangent, ending stationary at
/// (2, 2, pi/2).
fn demo_traj() -> Traj {
    const DURATION_S: f64 = 4.0;
    const RADIUS_M: f64 = 2.0;
    const NUM_POINTS: usize = 41;

    let quarter_turn_rad = std::f64::consts::FRAC_PI_2;
    let speed_ms = RADIUS_M * quarter_turn_rad / DURATION_S;

    let mut points = Vec::with_capacity(NUM_POINTS);
    for i in 0..NUM_POINTS {
        let frac = i as f64 / (NUM_POINTS - 1) as f64;
        let theta_rad = quarter_turn_rad * frac;

        points.push(TrajPoint {
            time_s: DURATION_S * frac,
            pose: Pose::new(
                RADIUS_M * theta_rad.sin(),
                RADIUS_M * (1.0 - theta_rad.cos()),
                theta_rad
            ),
            speed_ms: if i + 1 == NUM_POINTS { 0.0 } else { speed_ms },
            curv_m: 1.0 / RADIUS_M
        });
    }

    // Unwrap is safe as the point sequence above is non-empty and monotonic
    Traj::new(points).unwrap()
}
