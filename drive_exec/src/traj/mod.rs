//! # Trajectory
//!
//! A trajectory is an ordered, time-parameterised sequence of desired states
//! produced by an upstream planner. It is immutable once built and is
//! consumed by the tracking command purely through time-indexed sampling.
//!
//! Samples past either end of the trajectory saturate - the first and final
//! states are held rather than extrapolated. Holding the final state is what
//! allows the tracking controllers to keep correcting towards the endpoint
//! after the nominal path time has elapsed.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::loc::Pose;
use util::maths::{get_ang_dist_pi, wrap_pi};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single timestamped state along a trajectory.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct TrajPoint {
    /// Time offset from the start of the trajectory.
    ///
    /// Units: seconds
    pub time_s: f64,

    /// The desired pose at this time.
    pub pose: Pose,

    /// The desired linear speed along the path.
    ///
    /// Units: meters/second
    pub speed_ms: f64,

    /// The curvature of the path at this point.
    ///
    /// Units: 1/meters
    pub curv_m: f64
}

/// A time-parameterised trajectory.
///
/// Construction validates the point sequence, so a `Traj` always contains at
/// least one point with strictly increasing timestamps.
#[derive(Debug, Clone, Serialize)]
pub struct Traj {
    points: Vec<TrajPoint>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised while building a trajectory.
#[derive(Debug, thiserror::Error)]
pub enum TrajError {
    /// Attempted to create a trajectory with no points in it.
    #[error("Attempted to create a trajectory with no points")]
    Empty,

    /// A point's timestamp does not increase over its predecessor's. The
    /// contained index is that of the offending point.
    #[error("Trajectory point {0} does not increase in time over its predecessor")]
    NonMonotonic(usize)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Traj {
    /// Build a trajectory from a sequence of points.
    ///
    /// The sequence must be non-empty and strictly increasing in time.
    pub fn new(points: Vec<TrajPoint>) -> Result<Self, TrajError> {
        if points.is_empty() {
            return Err(TrajError::Empty)
        }

        for i in 1..points.len() {
            if points[i].time_s <= points[i - 1].time_s {
                return Err(TrajError::NonMonotonic(i))
            }
        }

        Ok(Self { points })
    }

    /// Get the total duration of the trajectory in seconds.
    pub fn duration_s(&self) -> f64 {
        self.end_point().time_s
    }

    /// Get the final point of the trajectory.
    pub fn end_point(&self) -> &TrajPoint {
        // Unwrap is safe as construction guarantees at least one point
        self.points.last().unwrap()
    }

    /// Get the number of points in the trajectory.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Sample the desired state at the given time offset.
    ///
    /// Times before the first point return the first point, times at or
    /// beyond the final point return the final point. Interior samples are
    /// interpolated linearly between the bracketing points, with heading
    /// interpolated along the shortest arc.
    pub fn sample(&self, time_s: f64) -> TrajPoint {
        // Saturate at both ends
        if time_s <= self.points[0].time_s {
            return self.points[0];
        }
        if time_s >= self.duration_s() {
            return *self.end_point();
        }

        // Find the first point past the sample time.
        //
        // The unwrap is safe as the saturation above guarantees the sample
        // lies strictly inside the point sequence.
        let next_idx = self
            .points
            .iter()
            .position(|p| p.time_s > time_s)
            .unwrap();
        let prev = &self.points[next_idx - 1];
        let next = &self.points[next_idx];

        // Interpolation factor between the bracketing points
        let s = (time_s - prev.time_s) / (next.time_s - prev.time_s);

        TrajPoint {
            time_s,
            pose: Pose {
                position_m: prev.pose.position_m
                    + (next.pose.position_m - prev.pose.position_m) * s,
                heading_rad: wrap_pi(
                    prev.pose.heading_rad
                        + get_ang_dist_pi(prev.pose.heading_rad, next.pose.heading_rad) * s
                )
            },
            speed_ms: prev.speed_ms + (next.speed_ms - prev.speed_ms) * s,
            curv_m: prev.curv_m + (next.curv_m - prev.curv_m) * s
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

    /// A straight two-point test trajectory along +X.
    fn straight_traj() -> Traj {
        Traj::new(vec![
            TrajPoint {
                time_s: 0.0,
                pose: Pose::new(0.0, 0.0, 0.0),
                speed_ms: 1.5,
                curv_m: 0.0
            },
            TrajPoint {
                time_s: 2.0,
                pose: Pose::new(3.0, 0.0, 0.0),
                speed_ms: 0.0,
                curv_m: 0.0
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_validation() {
        assert!(matches!(Traj::new(vec![]), Err(TrajError::Empty)));

        let mut points = vec![
            TrajPoint {
                time_s: 0.0,
                pose: Pose::default(),
                speed_ms: 0.0,
                curv_m: 0.0
            };
            3
        ];
        points[1].time_s = 1.0;
        points[2].time_s = 1.0;

        assert!(matches!(
            Traj::new(points),
            Err(TrajError::NonMonotonic(2))
        ));
    }

    #[test]
    fn test_sample_saturates_at_ends() {
        let traj = straight_traj();

        // Before the start the first point is held
        let start = traj.sample(-1.0);
        assert_eq!(start.pose.position_m[0], 0.0);

        // Beyond the end the final point is held, for all times
        for t in &[2.0, 2.001, 5.0, 1000.0] {
            let end = traj.sample(*t);
            assert_eq!(end.pose.position_m[0], 3.0);
            assert_eq!(end.speed_ms, 0.0);
        }
    }

    #[test]
    fn test_sample_interpolates() {
        let traj = straight_traj();

        let mid = traj.sample(1.0);
        assert!((mid.pose.position_m[0] - 1.5).abs() < 1e-9);
        assert!((mid.speed_ms - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_heading_interpolates_shortest_arc() {
        let traj = Traj::new(vec![
            TrajPoint {
                time_s: 0.0,
                pose: Pose::new(0.0, 0.0, 3.0),
                speed_ms: 0.0,
                curv_m: 0.0
            },
            TrajPoint {
                time_s: 1.0,
                pose: Pose::new(0.0, 0.0, -3.0),
                speed_ms: 0.0,
                curv_m: 0.0
            },
        ])
        .unwrap();

        // Halfway between 3.0 and -3.0 the short way round is just past pi,
        // which wraps negative
        let mid = traj.sample(0.5);
        let expected = wrap_pi(3.0 + (PI - 3.0));
        assert!((mid.pose.heading_rad - expected).abs() < 1e-9);
    }
}
