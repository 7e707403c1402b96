//! # Localisation types
//!
//! This module provides the pose of the robot on the field and the interface
//! through which pose estimates are supplied to the rest of the software.
//! Estimation itself (odometry fusion, vision, etc.) happens elsewhere.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use util::maths::get_ang_dist_pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The pose (2D position and heading) of the robot in the field frame.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Default)]
pub struct Pose {
    /// The position in the field frame.
    ///
    /// Units: meters
    pub position_m: Vector2<f64>,

    /// The heading (angle to the positive field X axis).
    ///
    /// Units: radians, right hand rule about field Z+, in [-pi, pi]
    pub heading_rad: f64
}

/// Componentwise difference between two poses.
#[derive(Debug, Copy, Clone, Serialize, Default)]
pub struct PoseDelta {
    pub x_m: f64,
    pub y_m: f64,

    /// Heading difference wrapped to the shortest arc.
    pub heading_rad: f64
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A source of pose estimates.
///
/// Implementors return a snapshot of the current best estimate. The query
/// has no side effects and may be made any number of times per control
/// cycle. Implementors must return valid (non-NaN) poses - downstream
/// controllers do not check.
pub trait PoseSource {
    fn pose(&self) -> Pose;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    /// Create a new pose from its components.
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x_m, y_m),
            heading_rad
        }
    }

    /// Get the unit vector pointing in the heading direction (in 2D).
    pub fn forward2(&self) -> Vector2<f64> {
        Vector2::new(self.heading_rad.cos(), self.heading_rad.sin())
    }

    /// Get the componentwise delta from this pose to `other`.
    ///
    /// The heading component is the signed shortest arc from this pose's
    /// heading to the other's.
    pub fn delta_to(&self, other: &Pose) -> PoseDelta {
        PoseDelta {
            x_m: other.position_m[0] - self.position_m[0],
            y_m: other.position_m[1] - self.position_m[1],
            heading_rad: get_ang_dist_pi(self.heading_rad, other.heading_rad)
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;

    #[test]
    fn test_delta_wraps_heading() {
        let a = Pose::new(0.0, 0.0, 3.0);
        let b = Pose::new(1.0, -2.0, -3.0);

        let delta = a.delta_to(&b);

        assert_eq!(delta.x_m, 1.0);
        assert_eq!(delta.y_m, -2.0);

        // The short way round from 3.0 to -3.0 is forwards through pi
        assert!((delta.heading_rad - (2.0 * PI - 6.0)).abs() < 1e-9);
    }

    #[test]
    fn test_forward2() {
        let pose = Pose::new(0.0, 0.0, PI / 2.0);
        let fwd = pose.forward2();

        assert!(fwd[0].abs() < 1e-9);
        assert!((fwd[1] - 1.0).abs() < 1e-9);
    }
}
