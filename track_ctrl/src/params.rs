//! Track control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for track control
#[derive(Deserialize, Debug, Clone)]
pub struct Params {
    /// Pure pursuit lookahead gain (dimensionless). Scales the lookahead
    /// distance with the current speed.
    pub k_dd: f64,

    /// Distance between the front and rear axles in meters
    pub wheel_base_m: f64,

    /// Speed controller proportional gain
    pub speed_k_p: f64,

    /// Speed controller integral gain
    pub speed_k_i: f64,

    /// Speed controller derivative gain
    pub speed_k_d: f64,

    /// Optional symmetric limit on the speed controller's integral term.
    ///
    /// When absent the integral accumulates without bound, which is the
    /// default behaviour.
    #[serde(default)]
    pub speed_integral_limit: Option<f64>,
}
