//! Holonomic drive controller parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the holonomic drive controller
#[derive(Deserialize, Debug, Clone)]
pub struct Params {

    /// X position controller proportional gain
    pub x_k_p: f64,

    /// X position controller integral gain
    pub x_k_i: f64,

    /// X position controller derivative gain
    pub x_k_d: f64,

    /// Y position controller proportional gain
    pub y_k_p: f64,

    /// Y position controller integral gain
    pub y_k_i: f64,

    /// Y position controller derivative gain
    pub y_k_d: f64,

    /// Heading controller proportional gain
    pub head_k_p: f64,

    /// Heading controller integral gain
    pub head_k_i: f64,

    /// Heading controller derivative gain
    pub head_k_d: f64,

    /// Maximum angular velocity demand from the heading controller
    pub head_max_vel_rads: f64,

    /// Maximum angular acceleration demand from the heading controller
    pub head_max_acc_radss: f64
}
