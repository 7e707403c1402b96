//! # Feedback controllers
//!
//! This module provides the low-level feedback controllers composed by
//! `HoloCtrl`: a generic PID controller and the profile-constrained heading
//! controller.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;
use std::time::Instant;

// Internal
use util::maths::{clamp, get_ang_dist_pi};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID controller
#[derive(Debug, Serialize, Clone)]
pub struct PidController {
    /// Previous instant that the error was passed in
    #[serde(skip)]
    prev_time: Option<Instant>,

    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Dervative gain
    k_d: f64,

    /// Previous error
    prev_error: Option<f64>,

    /// The integral accumulation
    integral: f64
}

/// A heading controller with bounded output velocity and acceleration.
///
/// The controller runs a PID on the wrapped heading error. The resulting
/// angular velocity demand is clamped to the maximum rate, and its change
/// between updates is limited by the maximum acceleration, so the demand is
/// always achievable by the drivetrain.
#[derive(Debug, Serialize, Clone)]
pub struct HeadingCtrl {
    pid: PidController,

    /// Maximum angular velocity demand
    max_vel_rads: f64,

    /// Maximum change in angular velocity demand per second
    max_acc_radss: f64,

    /// Previous output demand
    prev_dem_rads: Option<f64>,

    /// Previous instant a demand was produced
    #[serde(skip)]
    prev_time: Option<Instant>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidController {

    /// Create a new controller with the given gains.
    pub fn new(k_p: f64, k_i: f64, k_d: f64) -> Self {
        Self {
            k_p, k_i, k_d,
            integral: 0f64,
            prev_time: None,
            prev_error: None
        }
    }

    /// Get the value of the controller for the given error.
    ///
    /// This function is time-aware so there is no need to pass in a delta-time
    /// value.
    pub fn get(&mut self, error: f64) -> f64 {
        // Get current time
        let curr_time = Instant::now();

        // Calculate dt
        let dt = self.prev_time.map(|t0| (curr_time - t0).as_secs_f64());

        // Accumulate the integral term.
        //
        // If there's no time difference then we don't accumulate the integral.
        // The other option is to add on the error and that will produce a
        // large spike in integral compared to normal operation, so we don't do
        // this.
        self.integral += match dt {
            Some(t) => error * t,
            None => 0f64
        };

        // Calculate the derivative.
        //
        // If there's no time difference again we assume no derivative, for the
        // same reasons as for integral.
        let deriv = match self.prev_error {
            Some(e) => match dt {
                Some(t) => (error - e) / t,
                None => 0f64
            },
            None => 0f64
        };

        // Calculate the output
        let out =
            self.k_p * error
            + self.k_i * self.integral
            + self.k_d * deriv;

        // Remember the previous error and time
        self.prev_error = Some(error);
        self.prev_time = Some(curr_time);

        // Return
        out
    }

    /// Clear the accumulated integral and derivative state.
    ///
    /// Call this between runs of the same controller instance, otherwise the
    /// integral wound up during one run will bleed into the next.
    pub fn reset(&mut self) {
        self.integral = 0f64;
        self.prev_error = None;
        self.prev_time = None;
    }
}

impl HeadingCtrl {

    /// Create a new heading controller from gains and profile limits.
    pub fn new(
        k_p: f64, k_i: f64, k_d: f64,
        max_vel_rads: f64, max_acc_radss: f64
    ) -> Self {
        Self {
            pid: PidController::new(k_p, k_i, k_d),
            max_vel_rads,
            max_acc_radss,
            prev_dem_rads: None,
            prev_time: None
        }
    }

    /// Get the angular velocity demand driving the current heading towards
    /// the desired heading.
    ///
    /// The error fed to the controller is the wrapped shortest arc, so the
    /// demand always turns the short way round.
    pub fn get(&mut self, current_rad: f64, desired_rad: f64) -> f64 {
        let error_rad = get_ang_dist_pi(current_rad, desired_rad);

        // PID on the wrapped error, clamped to the achievable rate
        let mut dem_rads = self.pid.get(error_rad);
        dem_rads = clamp(&dem_rads, &-self.max_vel_rads, &self.max_vel_rads);

        // Limit the change in demand to the achievable acceleration
        let curr_time = Instant::now();
        if let (Some(prev_dem), Some(t0)) = (self.prev_dem_rads, self.prev_time) {
            let max_delta = self.max_acc_radss * (curr_time - t0).as_secs_f64();
            dem_rads = clamp(&dem_rads, &(prev_dem - max_delta), &(prev_dem + max_delta));
        }

        self.prev_dem_rads = Some(dem_rads);
        self.prev_time = Some(curr_time);

        dem_rads
    }

    /// Clear the controller state, including the rate limiter's memory of the
    /// previous demand.
    pub fn reset(&mut self) {
        self.pid.reset();
        self.prev_dem_rads = None;
        self.prev_time = None;
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
    fn test_pid_proportional() {
        let mut pid = PidController::new(2.0, 0.0, 0.0);

        // First call has no history, so the output is purely proportional
        assert_eq!(pid.get(1.5), 3.0);

        // Reset clears the history, so the same holds again
        pid.reset();
        assert_eq!(pid.get(-0.5), -1.0);
    }

    #[test]
    fn test_heading_ctrl_wraps_and_clamps() {
        let mut ctrl = HeadingCtrl::new(10.0, 0.0, 0.0, 2.0, 1000.0);

        // Large error saturates at the maximum rate
        assert_eq!(ctrl.get(0.0, PI / 2.0), 2.0);

        // An error across the wrap point turns the short way (negative here)
        ctrl.reset();
        assert_eq!(ctrl.get(3.0, -3.0), 2.0);
        ctrl.reset();
        assert_eq!(ctrl.get(-3.0, 3.0), -2.0);
    }

    #[test]
    fn test_heading_ctrl_small_error_proportional() {
        let mut ctrl = HeadingCtrl::new(4.0, 0.0, 0.0, 10.0, 1000.0);

        let dem = ctrl.get(0.0, 0.1);
        assert!((dem - 0.4).abs() < 1e-9);
    }
}
