//! # Track controllers module
//!
//! This module provides the two controllers used for TrackCtrl: the pure
//! pursuit lateral (steering) controller and the PID longitudinal (speed)
//! controller.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use crate::params::Params;
use crate::path::Path;
use crate::state::TrackCtrlError;
use util::maths::clamp;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Minimum lookahead distance in meters
pub const LOOKAHEAD_MIN_M: f64 = 8.0;

/// Maximum lookahead distance in meters
pub const LOOKAHEAD_MAX_M: f64 = 20.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The pure pursuit lateral controller.
///
/// Steering is chosen so that the vehicle's circular arc passes through the
/// point at which the route crosses the lookahead circle.
#[derive(Debug, Serialize, Clone)]
pub struct PurePursuit {
    /// Lookahead gain
    k_dd: f64,

    /// Distance between the front and rear axles
    wheel_base_m: f64,
}

/// The steering demand produced by the pure pursuit controller.
#[derive(Debug, Serialize, Copy, Clone)]
pub struct SteerDemand {
    /// Steering angle in radians, positive towards +Y in the vehicle frame
    pub steer_rad: f64,

    /// The lookahead distance used for the target search
    pub lookahead_m: f64,

    /// The selected target point in the vehicle frame
    pub target_m: Vector2<f64>,
}

/// A PID speed controller.
///
/// The controller is stateful, its integral and derivative memory persist
/// between calls. A single instance must therefore only ever drive one
/// vehicle, the state is that vehicle's control history.
#[derive(Debug, Serialize, Clone)]
pub struct PidController {
    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Dervative gain
    k_d: f64,

    /// The integral accumulation. Unbounded unless a limit is set, sustained
    /// error will wind it up.
    integral_term: f64,

    /// The last computed derivative term, held between updates
    derivative_term: f64,

    /// Previous error
    prev_error: Option<f64>,

    /// Optional symmetric bound on the integral term
    integral_limit: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PurePursuit {
    /// Create a new controller from the parameters
    pub fn new(params: &Params) -> Self {
        Self {
            k_dd: params.k_dd,
            wheel_base_m: params.wheel_base_m,
        }
    }

    /// Get the steering demand for the given route and current speed.
    ///
    /// The route must be in the vehicle frame. The lookahead distance scales
    /// with speed and is clamped to [`LOOKAHEAD_MIN_M`, `LOOKAHEAD_MAX_M`].
    /// If the lookahead circle doesn't cross the route ahead of the vehicle
    /// a `NoTargetPoint` error is returned for the caller to handle.
    pub fn get_steer(&self, route: &Path, speed_ms: f64) -> Result<SteerDemand, TrackCtrlError> {
        let lookahead_m = clamp(&(self.k_dd * speed_ms), &LOOKAHEAD_MIN_M, &LOOKAHEAD_MAX_M);

        let target_m = route
            .find_lookahead_point(lookahead_m)?
            .ok_or(TrackCtrlError::NoTargetPoint)?;

        let steer_rad = self.steer_to_target(&target_m, lookahead_m);

        debug!(
            "Pure pursuit target ({:.2}, {:.2}) m, steer {:.4} rad",
            target_m[0], target_m[1], steer_rad
        );

        Ok(SteerDemand {
            steer_rad,
            lookahead_m,
            target_m,
        })
    }

    /// The pure pursuit steering law.
    ///
    /// Sets the steering angle so that the arc driven by the vehicle passes
    /// through the target point on the lookahead circle.
    pub fn steer_to_target(&self, target_m: &Vector2<f64>, lookahead_m: f64) -> f64 {
        let alpha_rad = target_m[1].atan2(target_m[0]);

        ((2.0 * self.wheel_base_m * alpha_rad.sin()) / lookahead_m).atan()
    }
}

impl PidController {
    /// Create a new controller with the given gains.
    pub fn new(k_p: f64, k_i: f64, k_d: f64) -> Self {
        Self {
            k_p,
            k_i,
            k_d,
            integral_term: 0f64,
            derivative_term: 0f64,
            prev_error: None,
            integral_limit: None,
        }
    }

    /// Create a new controller whose integral term is clamped to
    /// [-limit_abs, limit_abs].
    pub fn with_integral_limit(k_p: f64, k_i: f64, k_d: f64, limit_abs: f64) -> Self {
        Self {
            integral_limit: Some(limit_abs),
            ..Self::new(k_p, k_i, k_d)
        }
    }

    /// Get the value of the controller for the given target and measurement.
    ///
    /// `dt_s` is the time elapsed since the previous call and must be
    /// positive. On the first call the derivative term contributes zero as
    /// there is no previous error to difference against.
    pub fn get(
        &mut self,
        target: f64,
        measurement: f64,
        dt_s: f64,
    ) -> Result<f64, TrackCtrlError> {
        if dt_s <= 0.0 {
            return Err(TrackCtrlError::InvalidTimestep(dt_s));
        }

        let error = target - measurement;

        // Accumulate the integral term, clamping only if a limit was given
        self.integral_term += error * self.k_i * dt_s;
        if let Some(limit_abs) = self.integral_limit {
            self.integral_term = clamp(&self.integral_term, &-limit_abs, &limit_abs);
        }

        // The derivative needs a previous error to difference against, until
        // one exists the term holds at its initial zero
        if let Some(prev_error) = self.prev_error {
            self.derivative_term = (error - prev_error) / dt_s * self.k_d;
        }

        self.prev_error = Some(error);

        Ok(self.k_p * error + self.integral_term + self.derivative_term)
    }
}
