//! Trajectory control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for trajectory control
#[derive(Deserialize, Debug, Clone)]
pub struct Params {

    /// Arrival tolerance on the X and Y position errors.
    ///
    /// Units: meters
    pub pos_tol_m: f64,

    /// Arrival tolerance on the heading error.
    ///
    /// Units: radians
    pub head_tol_rad: f64,

    /// Grace period added to the trajectory duration before the run times
    /// out.
    ///
    /// Units: seconds
    pub grace_s: f64,

    /// If true the feedback controllers are reset at the start of each run.
    ///
    /// When false, integral and derivative state carries over from the
    /// previous run of the same command instance.
    pub reset_ctrl_on_init: bool
}
