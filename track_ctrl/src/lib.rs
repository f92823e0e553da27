//! # Track control library
//!
//! Track control is responsible for keeping a vehicle on a target route at a
//! target speed. Steering demands come from a pure pursuit controller: the
//! route is searched for the point at which it crosses a speed-scaled
//! lookahead circle centred on the vehicle, and the steering angle is set so
//! that the vehicle's circular arc passes through that point. Speed demands
//! come from a PID controller acting on the speed error.
//!
//! The route itself is an ordered sequence of waypoints in the world frame.
//! Each control step the [`state::TrackCtrl`] facade transforms the route
//! into the vehicle's own frame (origin at the vehicle, +X ahead), discards
//! waypoints behind the vehicle, and runs both controllers. The external
//! collaborator supplies the vehicle state and applies the returned demands
//! to the actuators.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod controllers;
pub mod geom;
pub mod loc;
pub mod params;
pub mod path;
pub mod state;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use controllers::*;
pub use geom::*;
pub use loc::*;
pub use params::Params;
pub use path::*;
pub use state::*;
