//! # Hydra drive software library
//!
//! Control chain for a four-wheel swerve (holonomic) drivetrain following a
//! time-parameterised trajectory:
//!
//! ```text
//! elapsed time -> trajectory sample -> chassis speed demand
//!     -> swerve module states -> output sink
//! ```
//!
//! The chain is driven by the `traj_ctrl` command once per control cycle.
//! Pose estimates come in through the `loc::PoseSource` trait and module
//! demands go out through the `traj_ctrl::ModuleOutput` trait, so the
//! low-level servo loops and the localisation system are fully decoupled
//! from the controller.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod holo_ctrl;
pub mod loc;
pub mod sim_odom;
pub mod swerve_kin;
pub mod traj;
pub mod traj_ctrl;
