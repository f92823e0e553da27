//! Track control module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Rotation2, Vector2};
use serde::Serialize;

// Internal
use crate::controllers::{PidController, PurePursuit};
use crate::geom::GeomError;
use crate::loc::VehicleState;
use crate::params::Params;
use crate::path::Path;
use util::params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The track control module.
///
/// One instance owns the control history (the speed controller's integral
/// and derivative memory) for a single vehicle. Each controlled vehicle must
/// have its own instance, the history is only reset by constructing a new
/// one.
pub struct TrackCtrl {
    params: Params,

    /// Lateral (steering) controller
    pure_pursuit: PurePursuit,

    /// Longitudinal (speed) controller
    speed_ctrl: PidController,
}

/// The control demands produced for the external actuation collaborator.
#[derive(Debug, Serialize, Copy, Clone)]
pub struct ControlOutput {
    /// Throttle/acceleration demand. Unclamped, the actuator's operating
    /// range is enforced by the external collaborator.
    pub throttle: f64,

    /// Steering angle demand in radians, positive towards +Y in the vehicle
    /// frame.
    pub steer_rad: f64,
}

/// The status report containing monitoring quantities for the current step.
#[derive(Debug, Default, Serialize, Copy, Clone)]
pub struct StatusReport {
    /// The current speed (norm of the velocity vector)
    pub speed_ms: f64,

    /// The lookahead distance used for the target search
    pub lookahead_m: f64,

    /// The selected target point in the vehicle frame
    pub target_m: Option<[f64; 2]>,

    /// Number of route points ahead of the vehicle after the frame transform
    pub num_forward_points: usize,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during processing of the module.
#[derive(Debug, thiserror::Error)]
pub enum TrackCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(#[from] params::LoadError),

    /// The route handed to the controller contains a zero-length segment.
    #[error("Degenerate route geometry: {0}")]
    DegenerateGeometry(#[from] GeomError),

    /// The lookahead circle doesn't cross any forward segment of the route.
    /// This is an expected control-loop event (route too short, or the
    /// vehicle off the route), not a program fault. The external driving
    /// loop decides the fallback.
    #[error("No target point found on the route ahead of the vehicle")]
    NoTargetPoint,

    /// The timestep must be positive for the speed controller's integral
    /// and derivative terms to make sense.
    #[error("Invalid timestep {0} s, the controller requires dt > 0")]
    InvalidTimestep(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrackCtrl {
    /// Initialise the TrackCtrl module from the given parameter file.
    pub fn init(params_path: &str) -> Result<Self, TrackCtrlError> {
        let params: Params = params::load(params_path)?;

        Ok(Self::new(params))
    }

    /// Create the TrackCtrl module from already-loaded parameters.
    pub fn new(params: Params) -> Self {
        let pure_pursuit = PurePursuit::new(&params);

        let speed_ctrl = match params.speed_integral_limit {
            Some(limit_abs) => PidController::with_integral_limit(
                params.speed_k_p,
                params.speed_k_i,
                params.speed_k_d,
                limit_abs,
            ),
            None => PidController::new(params.speed_k_p, params.speed_k_i, params.speed_k_d),
        };

        Self {
            params,
            pure_pursuit,
            speed_ctrl,
        }
    }

    /// The parameters this instance was built with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Process one control step.
    ///
    /// Processing involves:
    ///  1. Transforming the world-frame route into the vehicle frame,
    ///     discarding waypoints behind the vehicle and prepending the
    ///     vehicle's own position as the first path point.
    ///  2. Calculating the steering demand with the pure pursuit controller.
    ///  3. Calculating the throttle demand with the speed controller.
    ///
    /// Steering is calculated first so that a `NoTargetPoint` failure
    /// propagates before the speed controller's state is touched.
    pub fn step(
        &mut self,
        state: &VehicleState,
        route_m: &[Vector2<f64>],
        target_speed_ms: f64,
        dt_s: f64,
    ) -> Result<(ControlOutput, StatusReport), TrackCtrlError> {
        let mut report = StatusReport::default();

        let speed_ms = state.speed_ms();
        report.speed_ms = speed_ms;

        // Transform the route into the vehicle frame
        let local_route = route_to_vehicle_frame(state, route_m);
        report.num_forward_points = local_route.get_num_points() - 1;

        let steer = self.pure_pursuit.get_steer(&local_route, speed_ms)?;
        report.lookahead_m = steer.lookahead_m;
        report.target_m = Some([steer.target_m[0], steer.target_m[1]]);

        let throttle = self.speed_ctrl.get(target_speed_ms, speed_ms, dt_s)?;

        Ok((
            ControlOutput {
                throttle,
                steer_rad: steer.steer_rad,
            },
            report,
        ))
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Transform the world-frame route into the vehicle frame.
///
/// The vehicle's own position becomes the origin and the first point of the
/// path, so the lookahead search always starts from the vehicle itself.
/// Waypoints behind the vehicle (non-positive x after the transform) are
/// discarded. The route is neither sorted nor deduplicated, its order is
/// taken as the traversal order.
fn route_to_vehicle_frame(state: &VehicleState, route_m: &[Vector2<f64>]) -> Path {
    // Rotation taking world-frame vectors into the vehicle frame
    let world_to_vehicle = Rotation2::new(-state.pose.yaw_rad());
    let position_m = state.pose.position2();

    let mut points_m = vec![Vector2::zeros()];

    for wp_m in route_m {
        let local_m = world_to_vehicle * (wp_m - position_m);

        if local_m[0] > 0.0 {
            points_m.push(local_m);
        }
    }

    Path::new(points_m)
}
