//! # Track Control Test
//!
//! This binary allows the track controller to be run without requiring the
//! simulation environment. It drives a simple kinematic bicycle model along a
//! demonstration route, standing in for the external vehicle and actuation
//! collaborators, and saves the run history into the session directory.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use color_eyre::{eyre::WrapErr, Result};
use log::{debug, info, warn};
use nalgebra::{Vector2, Vector3};
use serde::Serialize;

use track_ctrl::{Path, Pose, StatusReport, TrackCtrl, TrackCtrlError, VehicleState};
use util::{
    logger::{logger_init, LevelFilter},
    maths::{clamp, norm},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Period of one control cycle.
const CYCLE_PERIOD_S: f64 = 0.05;

/// Maximum acceleration the simulated actuator can deliver. The throttle
/// demand is clamped to [-1, 1] and scaled by this.
const MAX_ACCEL_MS2: f64 = 3.0;

/// Distance from the final route point at which the run is complete. Kept
/// larger than the minimum lookahead so arrival is declared before the
/// remaining route falls entirely inside the lookahead circle.
const GOAL_RADIUS_M: f64 = 10.0;

/// Limit on the number of cycles before the run is abandoned.
const MAX_CYCLES: usize = 10000;

/// Target speed along the route.
const TARGET_SPEED_MS: f64 = 10.0;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// One history record per control cycle, saved at the end of the run.
#[derive(Serialize)]
struct HistoryEntry {
    time_s: f64,
    position_m: [f64; 2],
    yaw_rad: f64,
    speed_ms: f64,
    throttle: f64,
    steer_rad: f64,
    report: StatusReport,
}

/// Kinematic bicycle model standing in for the external vehicle.
struct Vehicle {
    position_m: Vector2<f64>,
    yaw_rad: f64,
    speed_ms: f64,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("track_test", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Track Control Test\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- MODULE INIT ----

    let mut track_ctrl =
        TrackCtrl::init("track_ctrl.toml").wrap_err("Failed to initialise TrackCtrl")?;
    info!("TrackCtrl init complete");

    let wheel_base_m = track_ctrl.params().wheel_base_m;

    // ---- DEMONSTRATION SCENARIO ----

    // World-frame route for the vehicle to follow
    let route_m: Vec<Vector2<f64>> = vec![
        Vector2::new(-74.6, 24.5),
        Vector2::new(-54.6, 24.5),
        Vector2::new(-47.6, 21.5),
        Vector2::new(-41.6, 10.5),
        Vector2::new(-41.6, -40.5),
    ];
    let goal_m = *route_m.last().unwrap();

    let mut vehicle = Vehicle {
        position_m: Vector2::new(-114.6, 24.5),
        yaw_rad: 0.0,
        speed_ms: 0.0,
    };

    info!(
        "Route has {} waypoints over {:.1} m, goal at ({:.1}, {:.1}) m",
        route_m.len(),
        Path::new(route_m.clone()).get_length().unwrap(),
        goal_m[0],
        goal_m[1]
    );

    // ---- MAIN LOOP ----

    let mut history: Vec<HistoryEntry> = Vec::new();
    let mut goal_reached = false;

    for cycle in 0..MAX_CYCLES {
        let time_s = cycle as f64 * CYCLE_PERIOD_S;

        // Snapshot of the vehicle state as the external collaborator would
        // supply it (yaw in degrees, velocity as a world-frame vector)
        let state = VehicleState {
            pose: Pose::new(
                Vector3::new(vehicle.position_m[0], vehicle.position_m[1], 0.0),
                vehicle.yaw_rad.to_degrees(),
            ),
            velocity_ms: Vector3::new(
                vehicle.speed_ms * vehicle.yaw_rad.cos(),
                vehicle.speed_ms * vehicle.yaw_rad.sin(),
                0.0,
            ),
        };

        // Step the controller
        let (output, report) =
            match track_ctrl.step(&state, &route_m, TARGET_SPEED_MS, CYCLE_PERIOD_S) {
                Ok(out) => out,
                Err(TrackCtrlError::NoTargetPoint) => {
                    // Expected once the remaining route is too short, stop
                    info!("No target point ahead of the vehicle, stopping");
                    break;
                }
                Err(e) => return Err(e).wrap_err("TrackCtrl step failed"),
            };

        // The actuator clamps the throttle demand to its operating range
        let throttle = clamp(&output.throttle, &-1.0, &1.0);

        history.push(HistoryEntry {
            time_s,
            position_m: [vehicle.position_m[0], vehicle.position_m[1]],
            yaw_rad: vehicle.yaw_rad,
            speed_ms: vehicle.speed_ms,
            throttle,
            steer_rad: output.steer_rad,
            report,
        });

        vehicle.drive(
            throttle * MAX_ACCEL_MS2,
            output.steer_rad,
            wheel_base_m,
            CYCLE_PERIOD_S,
        );

        if cycle % 50 == 0 {
            debug!(
                "[{:6.2} s] pos ({:7.2}, {:7.2}) m, speed {:5.2} m/s, steer {:6.3} rad",
                time_s, vehicle.position_m[0], vehicle.position_m[1], vehicle.speed_ms,
                output.steer_rad
            );
        }

        // The unwrap here is safe since both points have the same dimentions
        let goal_dist_m = norm(
            &[vehicle.position_m[0], vehicle.position_m[1]],
            &[goal_m[0], goal_m[1]],
        )
        .unwrap();

        if goal_dist_m < GOAL_RADIUS_M {
            info!("Goal reached after {:.2} s", time_s);
            goal_reached = true;
            break;
        }
    }

    if !goal_reached {
        warn!("Run ended before the goal was reached");
    }

    // ---- SAVE HISTORY ----

    session.save("history.json", &history);
    info!("History saved, {} cycles recorded", history.len());

    Ok(())
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

impl Vehicle {
    /// Advance the bicycle model by one timestep under the given demands.
    fn drive(&mut self, accel_ms2: f64, steer_rad: f64, wheel_base_m: f64, dt_s: f64) {
        self.position_m[0] += self.speed_ms * self.yaw_rad.cos() * dt_s;
        self.position_m[1] += self.speed_ms * self.yaw_rad.sin() * dt_s;
        self.yaw_rad += self.speed_ms * steer_rad.tan() / wheel_base_m * dt_s;
        self.speed_ms = (self.speed_ms + accel_ms2 * dt_s).max(0.0);
    }
}
