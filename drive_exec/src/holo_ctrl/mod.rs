//! # Holonomic drive controller
//!
//! The holonomic drive controller turns a desired trajectory state and a
//! fresh pose estimate into a single body-frame chassis speed demand. It
//! composes three independent feedback loops:
//!
//! - two PID position controllers, one per field axis, correcting the
//!   position error on top of the trajectory's velocity feedforward,
//! - one profile-constrained heading controller producing the angular
//!   velocity demand.
//!
//! The heading tracked is supplied by the caller each cycle and is not
//! necessarily the path's direction of travel - a holonomic drivetrain can
//! translate one way while facing another.
//!
//! No input validation is performed: a NaN pose propagates straight through
//! to the output demand. Pose sources are trusted to deliver valid
//! snapshots.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod controllers;
mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::loc::Pose;
use crate::traj::TrajPoint;
pub use controllers::{HeadingCtrl, PidController};
pub use params::Params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A chassis speed demand in the robot body frame.
///
/// Ephemeral - computed and consumed within a single control cycle.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct ChassisSpeeds {
    /// Linear velocity along the body X (forward) axis.
    ///
    /// Units: meters/second
    pub vx_ms: f64,

    /// Linear velocity along the body Y (left) axis.
    ///
    /// Units: meters/second
    pub vy_ms: f64,

    /// Angular velocity about the body Z (up) axis.
    ///
    /// Units: radians/second, right hand rule
    pub omega_rads: f64
}

/// The holonomic drive controller.
#[derive(Debug, Clone)]
pub struct HoloCtrl {
    /// X axis position controller
    x_ctrl: PidController,

    /// Y axis position controller
    y_ctrl: PidController,

    /// Heading controller
    head_ctrl: HeadingCtrl
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ChassisSpeeds {
    /// Build a body-frame demand from a field-frame demand and the current
    /// heading of the robot.
    pub fn from_field_relative(
        vx_ms: f64,
        vy_ms: f64,
        omega_rads: f64,
        heading_rad: f64
    ) -> Self {
        let (sin_h, cos_h) = heading_rad.sin_cos();

        Self {
            vx_ms: vx_ms * cos_h + vy_ms * sin_h,
            vy_ms: -vx_ms * sin_h + vy_ms * cos_h,
            omega_rads
        }
    }
}

impl HoloCtrl {

    /// Create a new instance of the controller from the parameters.
    pub fn new(params: &Params) -> Self {
        Self {
            x_ctrl: PidController::new(params.x_k_p, params.x_k_i, params.x_k_d),
            y_ctrl: PidController::new(params.y_k_p, params.y_k_i, params.y_k_d),
            head_ctrl: HeadingCtrl::new(
                params.head_k_p,
                params.head_k_i,
                params.head_k_d,
                params.head_max_vel_rads,
                params.head_max_acc_radss
            )
        }
    }

    /// Get the chassis speed demand for the current pose, desired trajectory
    /// state and desired heading.
    ///
    /// The desired state's own heading is treated as the direction of
    /// travel for the velocity feedforward; `desired_head_rad` drives the
    /// heading loop independently.
    pub fn calculate(
        &mut self,
        current: &Pose,
        desired: &TrajPoint,
        desired_head_rad: f64
    ) -> ChassisSpeeds {

        // Velocity feedforward, projected onto the direction of travel (field
        // frame)
        let x_ff_ms = desired.speed_ms * desired.pose.heading_rad.cos();
        let y_ff_ms = desired.speed_ms * desired.pose.heading_rad.sin();

        // Position feedback per field axis
        let x_fb_ms = self
            .x_ctrl
            .get(desired.pose.position_m[0] - current.position_m[0]);
        let y_fb_ms = self
            .y_ctrl
            .get(desired.pose.position_m[1] - current.position_m[1]);

        // Heading feedback
        let omega_rads = self.head_ctrl.get(current.heading_rad, desired_head_rad);

        // Combine in the field frame and rotate into the body frame
        ChassisSpeeds::from_field_relative(
            x_ff_ms + x_fb_ms,
            y_ff_ms + y_fb_ms,
            omega_rads,
            current.heading_rad
        )
    }

    /// Reset all three feedback loops, clearing integral and rate limiter
    /// state.
    pub fn reset(&mut self) {
        self.x_ctrl.reset();
        self.y_ctrl.reset();
        self.head_ctrl.reset();
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;

    fn test_params() -> Params {
        Params {
            x_k_p: 1.0,
            x_k_i: 0.0,
            x_k_d: 0.0,
            y_k_p: 1.0,
            y_k_i: 0.0,
            y_k_d: 0.0,
            head_k_p: 4.0,
            head_k_i: 0.0,
            head_k_d: 0.0,
            head_max_vel_rads: 10.0,
            head_max_acc_radss: 1000.0
        }
    }

    fn desired_at(x_m: f64, y_m: f64, head_rad: f64, speed_ms: f64) -> TrajPoint {
        TrajPoint {
            time_s: 0.0,
            pose: Pose::new(x_m, y_m, head_rad),
            speed_ms,
            curv_m: 0.0
        }
    }

    #[test]
    fn test_on_path_is_pure_feedforward() {
        let mut ctrl = HoloCtrl::new(&test_params());

        // Robot exactly on the desired state, travelling along +X
        let current = Pose::new(1.0, 0.0, 0.0);
        let desired = desired_at(1.0, 0.0, 0.0, 1.5);

        let speeds = ctrl.calculate(&current, &desired, 0.0);

        assert!((speeds.vx_ms - 1.5).abs() < 1e-9);
        assert!(speeds.vy_ms.abs() < 1e-9);
        assert!(speeds.omega_rads.abs() < 1e-9);
    }

    #[test]
    fn test_position_error_produces_correction() {
        let mut ctrl = HoloCtrl::new(&test_params());

        // Robot lagging 0.5 m behind the desired state, no feedforward
        let current = Pose::new(0.5, 0.0, 0.0);
        let desired = desired_at(1.0, 0.0, 0.0, 0.0);

        let speeds = ctrl.calculate(&current, &desired, 0.0);

        assert!((speeds.vx_ms - 0.5).abs() < 1e-9);
        assert!(speeds.vy_ms.abs() < 1e-9);
    }

    #[test]
    fn test_field_to_body_rotation() {
        let mut ctrl = HoloCtrl::new(&test_params());

        // Robot facing +Y while the error is along field +X: the body-frame
        // correction is to the robot's right (negative body Y)
        let current = Pose::new(0.0, 0.0, PI / 2.0);
        let desired = desired_at(1.0, 0.0, PI / 2.0, 0.0);

        let speeds = ctrl.calculate(&current, &desired, PI / 2.0);

        assert!(speeds.vx_ms.abs() < 1e-9);
        assert!((speeds.vy_ms + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_heading_decoupled_from_travel() {
        let mut ctrl = HoloCtrl::new(&test_params());

        // On the desired state but commanded to face a different way to the
        // direction of travel
        let current = Pose::new(0.0, 0.0, 0.0);
        let desired = desired_at(0.0, 0.0, 0.0, 0.0);

        let speeds = ctrl.calculate(&current, &desired, 0.1);

        assert!((speeds.omega_rads - 0.4).abs() < 1e-9);
    }
}
