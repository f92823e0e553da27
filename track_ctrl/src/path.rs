//! # Path
//!
//! This module defines the route followed by the track controller and the
//! lookahead target search over it.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use crate::geom::{circle_segment_intersections, GeomError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A path defining the desired trajectory of the vehicle.
///
/// The order of the points is the order in which the path visits them, the
/// lookahead search depends on it. Points are in whichever frame the caller
/// is working in, the target search itself expects the vehicle frame.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Path {
    pub points_m: Vec<Vector2<f64>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Path {
    /// Create a new path from the given points
    pub fn new(points_m: Vec<Vector2<f64>>) -> Self {
        Self { points_m }
    }

    /// Create a new empty path
    pub fn new_empty() -> Self {
        Self {
            points_m: Vec::new(),
        }
    }

    /// Get the number of points in the path
    pub fn get_num_points(&self) -> usize {
        self.points_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points_m.is_empty()
    }

    /// Return the length of the path in meters.
    ///
    /// If the path doesn't have enough points to contain a segment then
    /// `None` is returned.
    pub fn get_length(&self) -> Option<f64> {
        if self.points_m.len() < 2 {
            return None;
        }

        Some(
            self.points_m
                .windows(2)
                .map(|pair| (pair[1] - pair[0]).norm())
                .sum(),
        )
    }

    /// Find the first point along the path at which the lookahead circle
    /// (radius `lookahead_m`, centred on the vehicle origin) crosses a path
    /// segment ahead of the vehicle.
    ///
    /// The path must be in the vehicle frame. "First" is in path order, not
    /// nearest-euclidian: each segment is intersected in turn and the first
    /// crossing with a positive x-coordinate wins. `None` is returned if no
    /// forward crossing exists, which is an expected event when the path is
    /// short or the vehicle is far off it.
    pub fn find_lookahead_point(
        &self,
        lookahead_m: f64,
    ) -> Result<Option<Vector2<f64>>, GeomError> {
        let centre = Vector2::zeros();

        let mut intersections: Vec<Vector2<f64>> = Vec::new();

        for pair in self.points_m.windows(2) {
            intersections.extend(circle_segment_intersections(
                &centre,
                lookahead_m,
                &pair[0],
                &pair[1],
                false,
            )?);
        }

        // Only points strictly ahead of the vehicle are candidates
        Ok(intersections.into_iter().find(|point| point[0] > 0.0))
    }
}
