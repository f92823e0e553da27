//! Host platform utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use std::env;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The environment variable giving the root of the software tree.
pub const SW_ROOT_ENV_VAR: &str = "TRACK_SW_ROOT";

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the software root directory.
///
/// The root is taken from the `TRACK_SW_ROOT` environment variable. If the
/// variable is not set the current working directory is used instead, which
/// allows executables to be run directly from a checkout of the repository.
pub fn get_sw_root() -> PathBuf {
    match env::var(SW_ROOT_ENV_VAR) {
        Ok(root) => PathBuf::from(root),
        Err(_) => {
            debug!(
                "{} is not set, using the current directory as the software root",
                SW_ROOT_ENV_VAR
            );
            PathBuf::from(".")
        }
    }
}
