//! # Vehicle state types
//!
//! The narrow view of the vehicle supplied by the external vehicle-state
//! collaborator each control step. The controller never holds onto these,
//! every step works on a fresh snapshot.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The current pose (position and yaw) of the vehicle in the world frame.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Pose {
    /// The position in the world frame
    pub position_m: Vector3<f64>,

    /// The yaw (heading about world +Z), in degrees as reported by the
    /// external collaborator. Converted to radians at the point of use.
    pub yaw_deg: f64,
}

/// Snapshot of the vehicle state for one control step.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct VehicleState {
    /// Current pose of the vehicle
    pub pose: Pose,

    /// Current velocity vector in the world frame
    pub velocity_ms: Vector3<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    pub fn new(position_m: Vector3<f64>, yaw_deg: f64) -> Self {
        Self {
            position_m,
            yaw_deg,
        }
    }

    /// The 2D position of the vehicle on the driving plane
    pub fn position2(&self) -> Vector2<f64> {
        Vector2::new(self.position_m[0], self.position_m[1])
    }

    /// The yaw of the vehicle in radians
    pub fn yaw_rad(&self) -> f64 {
        self.yaw_deg.to_radians()
    }
}

impl VehicleState {
    /// The current scalar speed, the euclidian norm of the velocity vector.
    pub fn speed_ms(&self) -> f64 {
        self.velocity_ms.norm()
    }
}
