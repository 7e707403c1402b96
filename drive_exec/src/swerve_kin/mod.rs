//! # Swerve kinematics
//!
//! This module converts a single body-frame chassis speed demand into one
//! velocity/angle demand per swerve module, based on the fixed positions of
//! the modules in the robot body frame.
//!
//! Each module at position `(x, y)` sees the body velocity plus the
//! tangential component of the body rotation, `(vx - omega*y, vy + omega*x)`.
//! The conversion is expressed as a `2N x 3` matrix built once at
//! construction; its pseudoinverse recovers chassis speeds from module
//! states, which the odometry simulation uses.
//!
//! The conversion itself is a pure function with no internal state. All
//! geometry validation happens at construction.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{DMatrix, DVector, Vector2, Vector3};
use serde::{Deserialize, Serialize};

// Internal
use crate::holo_ctrl::ChassisSpeeds;
pub use params::Params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The demanded state of a single swerve module.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct SwerveModuleState {
    /// Wheel speed demand.
    ///
    /// Units: meters/second
    pub speed_ms: f64,

    /// Steer axis absolute angle demand (zero is the body X direction).
    ///
    /// Units: radians
    pub angle_rad: f64
}

/// The swerve kinematics converter.
#[derive(Debug, Clone)]
pub struct SwerveKin {
    /// Module steer axis positions in the robot body frame
    module_pos_m_rb: Vec<Vector2<f64>>,

    /// Chassis speeds to module velocity vectors (2N x 3)
    inverse_kin: DMatrix<f64>,

    /// Module velocity vectors to chassis speeds (3 x 2N)
    forward_kin: DMatrix<f64>,

    /// The maximum attainable wheel speed
    max_wheel_speed_ms: f64
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised while validating the wheel geometry.
#[derive(Debug, thiserror::Error)]
pub enum SwerveKinError {
    /// Fewer than two modules were configured. The contained value is the
    /// number configured.
    #[error("A swerve drivetrain needs at least 2 modules, got {0}")]
    TooFewModules(usize),

    /// Two modules share the same body-frame position. The contained values
    /// are their indices.
    #[error("Modules {0} and {1} are at the same position")]
    CoincidentModules(usize, usize),

    /// The kinematics matrix could not be inverted.
    #[error("Could not invert the kinematics matrix: {0}")]
    SingularGeometry(String)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SwerveKin {

    /// Build the converter from the wheel geometry parameters.
    pub fn new(params: &Params) -> Result<Self, SwerveKinError> {
        let num_modules = params.module_pos_m_rb.len();

        if num_modules < 2 {
            return Err(SwerveKinError::TooFewModules(num_modules))
        }

        // Check for coincident modules
        for i in 0..num_modules {
            for j in (i + 1)..num_modules {
                let a = params.module_pos_m_rb[i];
                let b = params.module_pos_m_rb[j];

                if a[0] == b[0] && a[1] == b[1] {
                    return Err(SwerveKinError::CoincidentModules(i, j))
                }
            }
        }

        let module_pos_m_rb: Vec<Vector2<f64>> = params
            .module_pos_m_rb
            .iter()
            .map(|p| Vector2::new(p[0], p[1]))
            .collect();

        // Build the inverse kinematics matrix, two rows per module:
        //
        //     [ 1  0  -y_i ]   [ vx    ]   [ vx_i ]
        //     [ 0  1   x_i ] * [ vy    ] = [ vy_i ]
        //                      [ omega ]
        let mut inverse_kin = DMatrix::zeros(2 * num_modules, 3);
        for (i, pos) in module_pos_m_rb.iter().enumerate() {
            inverse_kin[(2 * i, 0)] = 1.0;
            inverse_kin[(2 * i, 2)] = -pos[1];
            inverse_kin[(2 * i + 1, 1)] = 1.0;
            inverse_kin[(2 * i + 1, 2)] = pos[0];
        }

        // The pseudoinverse gives the least-squares forward kinematics
        let forward_kin = inverse_kin
            .clone()
            .pseudo_inverse(1e-9)
            .map_err(|e| SwerveKinError::SingularGeometry(e.to_string()))?;

        Ok(Self {
            module_pos_m_rb,
            inverse_kin,
            forward_kin,
            max_wheel_speed_ms: params.max_wheel_speed_ms
        })
    }

    /// Get the number of modules in the drivetrain.
    pub fn num_modules(&self) -> usize {
        self.module_pos_m_rb.len()
    }

    /// Convert a chassis speed demand into one state demand per module.
    ///
    /// A zero chassis demand produces zero wheel speeds, with the steer
    /// angles left at zero.
    pub fn to_module_states(&self, speeds: &ChassisSpeeds) -> Vec<SwerveModuleState> {
        let chassis = Vector3::new(speeds.vx_ms, speeds.vy_ms, speeds.omega_rads);
        let module_vels = &self.inverse_kin * chassis;

        let mut states = Vec::with_capacity(self.num_modules());
        for i in 0..self.num_modules() {
            let vx_ms = module_vels[2 * i];
            let vy_ms = module_vels[2 * i + 1];
            let speed_ms = (vx_ms * vx_ms + vy_ms * vy_ms).sqrt();

            // A stationary wheel has no meaningful direction
            let angle_rad = if speed_ms > 0.0 {
                vy_ms.atan2(vx_ms)
            } else {
                0.0
            };

            states.push(SwerveModuleState { speed_ms, angle_rad });
        }

        states
    }

    /// Recover the chassis speeds implied by a set of module states.
    ///
    /// This is the least-squares solution, exact when the states are
    /// mutually consistent.
    pub fn to_chassis_speeds(&self, states: &[SwerveModuleState]) -> ChassisSpeeds {
        let mut module_vels = DVector::zeros(2 * states.len());
        for (i, state) in states.iter().enumerate() {
            module_vels[2 * i] = state.speed_ms * state.angle_rad.cos();
            module_vels[2 * i + 1] = state.speed_ms * state.angle_rad.sin();
        }

        let chassis = &self.forward_kin * module_vels;

        ChassisSpeeds {
            vx_ms: chassis[0],
            vy_ms: chassis[1],
            omega_rads: chassis[2]
        }
    }

    /// Scale all module speed demands down uniformly so that none exceeds
    /// the maximum attainable wheel speed.
    ///
    /// Uniform scaling preserves the demanded direction of motion at the
    /// cost of its magnitude.
    pub fn desaturate(&self, states: &mut [SwerveModuleState]) {
        let max_dem_ms = states
            .iter()
            .map(|s| s.speed_ms.abs())
            .fold(0.0, f64::max);

        if max_dem_ms > self.max_wheel_speed_ms {
            let scale = self.max_wheel_speed_ms / max_dem_ms;
            for state in states.iter_mut() {
                state.speed_ms *= scale;
            }
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

    /// A square 0.6 m wheelbase, the demo drivetrain geometry.
    fn square_kin() -> SwerveKin {
        SwerveKin::new(&Params {
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
    fn test_geometry_validation() {
        assert!(matches!(
            SwerveKin::new(&Params {
                module_pos_m_rb: vec![[0.3, 0.3]],
                max_wheel_speed_ms: 4.0
            }),
            Err(SwerveKinError::TooFewModules(1))
        ));

        assert!(matches!(
            SwerveKin::new(&Params {
                module_pos_m_rb: vec![[0.3, 0.3], [0.3, -0.3], [0.3, 0.3]],
                max_wheel_speed_ms: 4.0
            }),
            Err(SwerveKinError::CoincidentModules(0, 2))
        ));
    }

    #[test]
    fn test_zero_demand_zero_speeds() {
        let kin = square_kin();

        let states = kin.to_module_states(&ChassisSpeeds::default());

        assert_eq!(states.len(), 4);
        for state in states {
            assert_eq!(state.speed_ms, 0.0);
        }
    }

    #[test]
    fn test_straight_drive() {
        let kin = square_kin();

        let states = kin.to_module_states(&ChassisSpeeds {
            vx_ms: 1.0,
            vy_ms: 0.0,
            omega_rads: 0.0
        });

        for state in states {
            assert!((state.speed_ms - 1.0).abs() < 1e-9);
            assert!(state.angle_rad.abs() < 1e-9);
        }
    }

    #[test]
    fn test_point_turn_is_tangential() {
        let kin = square_kin();

        let states = kin.to_module_states(&ChassisSpeeds {
            vx_ms: 0.0,
            vy_ms: 0.0,
            omega_rads: 1.0
        });

        // All modules are equidistant from the centre, so all wheel speeds
        // match the tangential speed omega * r
        let radius_m = (0.3f64 * 0.3 + 0.3 * 0.3).sqrt();
        for state in states.iter() {
            assert!((state.speed_ms - radius_m).abs() < 1e-9);
        }

        // Front left module spins towards the rear left for a positive turn
        assert!((states[0].angle_rad - 3.0 * PI / 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_forward_kinematics_round_trip() {
        let kin = square_kin();

        let demand = ChassisSpeeds {
            vx_ms: 0.5,
            vy_ms: -0.2,
            omega_rads: 0.7
        };

        let states = kin.to_module_states(&demand);
        let recovered = kin.to_chassis_speeds(&states);

        assert!((recovered.vx_ms - demand.vx_ms).abs() < 1e-6);
        assert!((recovered.vy_ms - demand.vy_ms).abs() < 1e-6);
        assert!((recovered.omega_rads - demand.omega_rads).abs() < 1e-6);
    }

    #[test]
    fn test_desaturation() {
        let kin = square_kin();

        let mut states = kin.to_module_states(&ChassisSpeeds {
            vx_ms: 10.0,
            vy_ms: 0.0,
            omega_rads: 0.0
        });

        kin.desaturate(&mut states);

        for state in states {
            assert!((state.speed_ms - 4.0).abs() < 1e-9);
        }
    }
}
