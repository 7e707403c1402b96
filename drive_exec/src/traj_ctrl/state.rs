//! Trajectory control command state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;

// Internal
use super::{ModuleOutput, Params};
use crate::holo_ctrl::HoloCtrl;
use crate::loc::PoseSource;
use crate::swerve_kin::SwerveKin;
use crate::traj::Traj;
use util::command::{Command, ResourceToken};
use util::time::Stopwatch;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The trajectory tracking command.
///
/// One instance follows one trajectory per run. A run starts at `init` and
/// ends when the scheduler sees `is_finished` return true (or cancels the
/// command). Calling `init` again starts a fresh run over the same
/// trajectory.
pub struct TrajCtrl {
    params: Params,

    /// The trajectory to follow, fixed for the lifetime of the command
    traj: Traj,

    /// Source of pose estimates, read freshly each cycle
    pose_source: Box<dyn PoseSource>,

    /// Sink for the per-module demands, written once per cycle
    output: Box<dyn ModuleOutput>,

    kin: SwerveKin,
    ctrl: HoloCtrl,

    /// Elapsed run time
    stopwatch: Stopwatch,

    /// Latched true once the arrival tolerances have been met.
    ///
    /// Stays true for the remainder of the run even if the robot later
    /// drifts back out of tolerance.
    arrived: bool,

    report: StatusReport,

    requirements: Vec<ResourceToken>
}

/// The status report containing monitoring quantities for the current cycle.
#[derive(Debug, Default, Copy, Clone, Serialize)]
pub struct StatusReport {
    /// Elapsed run time at the last `execute`
    pub elapsed_s: f64,

    /// X error from the sampled desired state
    pub x_error_m: f64,

    /// Y error from the sampled desired state
    pub y_error_m: f64,

    /// Wrapped heading error from the sampled desired state
    pub head_error_rad: f64,

    /// True once the arrival tolerances have been met this run
    pub arrived: bool,

    /// True once the run has exceeded the trajectory duration plus grace
    pub timed_out: bool
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajCtrl {
    /// Create a new tracking command.
    ///
    /// The trajectory and wheel geometry have already been validated by
    /// their own constructors, so this cannot fail.
    pub fn new(
        traj: Traj,
        pose_source: Box<dyn PoseSource>,
        output: Box<dyn ModuleOutput>,
        kin: SwerveKin,
        ctrl: HoloCtrl,
        params: Params,
        requirements: Vec<ResourceToken>
    ) -> Self {
        Self {
            params,
            traj,
            pose_source,
            output,
            kin,
            ctrl,
            stopwatch: Stopwatch::new(),
            arrived: false,
            report: StatusReport::default(),
            requirements
        }
    }

    /// Get the status report for the current cycle.
    pub fn report(&self) -> StatusReport {
        self.report
    }

    /// Check the arrival tolerances against a fresh pose estimate, latching
    /// the result.
    fn check_arrival(&mut self) {
        let delta = self
            .pose_source
            .pose()
            .delta_to(&self.traj.end_point().pose);

        if delta.x_m.abs() < self.params.pos_tol_m
            && delta.y_m.abs() < self.params.pos_tol_m
            && delta.heading_rad.abs() < self.params.head_tol_rad
        {
            self.arrived = true;
        }
    }
}

impl Command for TrajCtrl {
    /// Start a fresh run: zero the stopwatch and clear the arrival latch.
    ///
    /// No demand is produced until the first `execute`.
    fn init(&mut self) {
        self.stopwatch.restart();
        self.arrived = false;
        self.report = StatusReport::default();

        if self.params.reset_ctrl_on_init {
            self.ctrl.reset();
        }
    }

    /// Perform one tracking cycle.
    fn execute(&mut self) {
        let elapsed_s = self.stopwatch.elapsed_s();

        // Sample the desired state at the elapsed time. Samples past the end
        // of the trajectory hold the final state, so we keep correcting
        // towards the endpoint after the nominal path time has passed.
        let desired = self.traj.sample(elapsed_s);

        // Track the heading the trajectory itself demands at this sample
        let desired_head_rad = desired.pose.heading_rad;

        // Chassis demand from a fresh pose estimate
        let pose = self.pose_source.pose();
        let speeds = self.ctrl.calculate(&pose, &desired, desired_head_rad);

        // Convert to module demands, limited to what the wheels can do
        let mut states = self.kin.to_module_states(&speeds);
        self.kin.desaturate(&mut states);

        trace!("TrajCtrl demand: {:?}, modules: {:?}", speeds, states);

        self.output.accept(&states);

        // Update the monitoring quantities
        let delta = pose.delta_to(&desired.pose);
        self.report.elapsed_s = elapsed_s;
        self.report.x_error_m = delta.x_m;
        self.report.y_error_m = delta.y_m;
        self.report.head_error_rad = delta.heading_rad;
    }

    /// Poll for completion of the run.
    ///
    /// Two independent conditions end a run:
    ///
    /// - arrival: all components of the error to the trajectory's final pose
    ///   are within tolerance. Checked every cycle regardless of elapsed
    ///   time, and latched - arrival can be declared before the nominal
    ///   trajectory duration has passed.
    /// - timeout: the elapsed time has reached the trajectory duration plus
    ///   the grace period. This bounds the run when the tolerance is never
    ///   met.
    fn is_finished(&mut self) -> bool {
        self.check_arrival();

        let timed_out = self.stopwatch.elapsed_s()
            >= self.traj.duration_s() + self.params.grace_s;

        self.report.arrived = self.arrived;
        self.report.timed_out = timed_out;

        self.arrived || timed_out
    }

    /// Stop the run.
    ///
    /// The stopwatch is stopped but no zero demand is emitted - see the
    /// module docs.
    fn end(&mut self, _interrupted: bool) {
        self.stopwatch.stop();
    }

    fn requirements(&self) -> &[ResourceToken] {
        &self.requirements
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
