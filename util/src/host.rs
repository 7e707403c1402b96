//! Host environment utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with querying the host environment.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("The software root environment variable (HYDRA_SW_ROOT) is not set")]
    SwRootNotSet
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the root directory of the software installation.
///
/// The root is read from the `HYDRA_SW_ROOT` environment variable, and is the
/// directory containing the `params` and `sessions` directories.
pub fn get_sw_root() -> Result<PathBuf, HostError> {
    match std::env::var("HYDRA_SW_ROOT") {
        Ok(p) => Ok(PathBuf::from(p)),
        Err(_) => Err(HostError::SwRootNotSet)
    }
}
