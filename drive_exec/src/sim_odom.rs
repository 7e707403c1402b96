//! # Simulated odometry
//!
//! A perfect-odometry stand-in for the localisation system, used by the
//! executable and by integration tests. The simulator consumes the module
//! demands produced by the tracking command, recovers the chassis speeds
//! through the forward kinematics, and integrates them over the control
//! cycle. The resulting pose is served back as a `PoseSource`.
//!
//! The wheels are assumed to respond instantly, so the tracking loop sees
//! an idealised drivetrain.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::cell::RefCell;
use std::rc::Rc;

// Internal
use crate::loc::{Pose, PoseSource};
use crate::swerve_kin::{SwerveKin, SwerveModuleState};
use crate::traj_ctrl::ModuleOutput;
use util::maths::wrap_pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Simulated odometry state.
pub struct SimOdom {
    /// The current simulated pose in the field frame
    pose: Pose,

    /// Kinematics used to recover chassis speeds from module demands
    kin: SwerveKin,

    /// Integration step, equal to the control cycle period
    cycle_period_s: f64,

    /// The most recent module demands received
    last_states: Vec<SwerveModuleState>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimOdom {
    /// Create a new simulator at the given initial pose.
    pub fn new(initial_pose: Pose, kin: SwerveKin, cycle_period_s: f64) -> Self {
        Self {
            pose: initial_pose,
            kin,
            cycle_period_s,
            last_states: Vec::new()
        }
    }

    /// Get the current simulated pose.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Get the most recent module demands received, empty before the first
    /// cycle.
    pub fn last_states(&self) -> &[SwerveModuleState] {
        &self.last_states
    }

    /// Apply one cycle's module demands, advancing the simulated pose.
    pub fn apply(&mut self, states: &[SwerveModuleState]) {
        let speeds = self.kin.to_chassis_speeds(states);

        // Rotate the body-frame velocity into the field frame and integrate
        let (sin_h, cos_h) = self.pose.heading_rad.sin_cos();
        let vx_field_ms = speeds.vx_ms * cos_h - speeds.vy_ms * sin_h;
        let vy_field_ms = speeds.vx_ms * sin_h + speeds.vy_ms * cos_h;

        self.pose.position_m[0] += vx_field_ms * self.cycle_period_s;
        self.pose.position_m[1] += vy_field_ms * self.cycle_period_s;
        self.pose.heading_rad = wrap_pi(
            self.pose.heading_rad + speeds.omega_rads * self.cycle_period_s
        );

        self.last_states = states.to_vec();
    }
}

impl PoseSource for Rc<RefCell<SimOdom>> {
    fn pose(&self) -> Pose {
        self.borrow().pose()
    }
}

impl ModuleOutput for Rc<RefCell<SimOdom>> {
    fn accept(&mut self, states: &[SwerveModuleState]) {
        self.borrow_mut().apply(states);
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::swerve_kin;

    fn square_kin() -> SwerveKin {
        SwerveKin::new(&swerve_kin::Params {
            module_pos_m_rb: vec![
                [0.3, 0.3],
                [0.3, -0.3],
                [-0.3, 0.3],
                [-0.3, -0.3],
            ],
            max_wheel_speed_ms: 4.0
        })
        .unwrap()
    }

    #[test]
    fn test_integrates_straight_drive() {
        let kin = square_kin();
        let mut sim = SimOdom::new(Pose::default(), kin.clone(), 0.1);

        // All wheels forward at 1 m/s
        let states = vec![
            SwerveModuleState {
                speed_ms: 1.0,
                angle_rad: 0.0
            };
            4
        ];

        for _ in 0..10 {
            sim.apply(&states);
        }

        // One second at 1 m/s along +X
        let pose = sim.pose();
        assert!((pose.position_m[0] - 1.0).abs() < 1e-9);
        assert!(pose.position_m[1].abs() < 1e-9);
        assert!(pose.heading_rad.abs() < 1e-9);
    }
}
