//! Swerve kinematics parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the swerve kinematics converter
#[derive(Deserialize, Debug, Clone)]
pub struct Params {

    /// The position of each module's steer axis in the robot body frame.
    ///
    /// One entry per module, [X, Y], X forward, Y left.
    ///
    /// Units: meters
    pub module_pos_m_rb: Vec<[f64; 2]>,

    /// The maximum speed attainable by a wheel.
    ///
    /// Module demands are scaled down uniformly so that no wheel exceeds
    /// this.
    ///
    /// Units: meters/second
    pub max_wheel_speed_ms: f64
}
