//! # Geometry
//!
//! Circle/line-segment intersection, the geometric primitive behind the
//! lookahead target search. Follows the closed form given at
//! http://mathworld.wolfram.com/Circle-LineIntersection.html.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Numerical tolerance on the discriminant below which two intersection
/// points are treated as a single tangential contact.
pub const TANGENT_TOL: f64 = 1e-9;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors raised by the geometry primitives.
#[derive(Debug, thiserror::Error)]
pub enum GeomError {
    /// The segment's two endpoints coincide, so it has no direction and the
    /// intersection formula would divide by zero.
    #[error("Zero-length segment passed to circle-segment intersection")]
    DegenerateSegment,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Find the points at which a circle intersects a line segment.
///
/// Returns 0, 1 or 2 points. When two points are returned the first is the
/// one nearer `seg_start` along the segment's direction of travel.
///
/// If `full_line` is true the segment is treated as an infinite line,
/// otherwise only intersections lying between the two endpoints are
/// returned. A pair of points closer together than the tangent tolerance is
/// collapsed into a single tangential contact.
pub fn circle_segment_intersections(
    centre_m: &Vector2<f64>,
    radius_m: f64,
    seg_start_m: &Vector2<f64>,
    seg_end_m: &Vector2<f64>,
    full_line: bool,
) -> Result<Vec<Vector2<f64>>, GeomError> {
    // Translate the endpoints into circle-centred coordinates
    let start = seg_start_m - centre_m;
    let end = seg_end_m - centre_m;

    let dx = end[0] - start[0];
    let dy = end[1] - start[1];

    // A zero-length segment has no direction, reject it before the formula
    // below divides by zero
    if dx == 0.0 && dy == 0.0 {
        return Err(GeomError::DegenerateSegment);
    }

    // Squared segment length and the signed area of the endpoint pair
    let dr_sq = dx * dx + dy * dy;
    let big_d = start[0] * end[1] - end[0] * start[1];

    let discriminant = radius_m * radius_m * dr_sq - big_d * big_d;

    // Circle misses the infinite line entirely
    if discriminant < 0.0 {
        return Ok(vec![]);
    }

    let sqrt_disc = discriminant.sqrt();

    // The -1 candidate lies at the smaller parametric distance from the
    // segment start, so this ordering puts the point nearest seg_start first
    let mut points: Vec<Vector2<f64>> = [-1f64, 1f64]
        .iter()
        .map(|sign| {
            Vector2::new(
                centre_m[0] + (big_d * dy + sign * dx * sqrt_disc) / dr_sq,
                centre_m[1] + (-big_d * dx + sign * dy * sqrt_disc) / dr_sq,
            )
        })
        .collect();

    // If only the segment is considered, drop intersections outside it. The
    // fraction is computed on whichever axis has the larger delta so that a
    // near-zero component is never divided by.
    if !full_line {
        points.retain(|point| {
            let fraction = if dx.abs() > dy.abs() {
                (point[0] - seg_start_m[0]) / dx
            } else {
                (point[1] - seg_start_m[1]) / dy
            };
            (0.0..=1.0).contains(&fraction)
        });
    }

    // Both roots coincide numerically at a tangency, return just one
    if points.len() == 2 && discriminant.abs() <= TANGENT_TOL {
        points.truncate(1);
    }

    Ok(points)
}

#[cfg(test)]
mod test {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_segment_inside_circle() {
        // Segment strictly inside the circle, no crossing when clipped
        let points = circle_segment_intersections(
            &Vector2::zeros(),
            5.0,
            &Vector2::new(-1.0, 0.0),
            &Vector2::new(1.0, 0.0),
            false,
        )
        .unwrap();

        assert!(points.is_empty());
    }

    #[test]
    fn test_full_line_through_circle() {
        // The same segment treated as an infinite line crosses twice
        let points = circle_segment_intersections(
            &Vector2::zeros(),
            5.0,
            &Vector2::new(-1.0, 0.0),
            &Vector2::new(1.0, 0.0),
            true,
        )
        .unwrap();

        assert_eq!(points.len(), 2);
        assert!((points[0][0] + 5.0).abs() < EPS);
        assert!((points[1][0] - 5.0).abs() < EPS);
    }

    #[test]
    fn test_tangent_segment() {
        let points = circle_segment_intersections(
            &Vector2::zeros(),
            5.0,
            &Vector2::new(-3.0, 5.0),
            &Vector2::new(3.0, 5.0),
            false,
        )
        .unwrap();

        assert_eq!(points.len(), 1);
        assert!((points[0].norm() - 5.0).abs() < EPS);
        assert!((points[0][1] - 5.0).abs() < EPS);
    }

    #[test]
    fn test_secant_segment() {
        let seg_start = Vector2::new(-6.0, 3.0);
        let seg_end = Vector2::new(6.0, 3.0);

        let points =
            circle_segment_intersections(&Vector2::zeros(), 5.0, &seg_start, &seg_end, false)
                .unwrap();

        assert_eq!(points.len(), 2);
        for point in &points {
            assert!((point.norm() - 5.0).abs() < EPS);
        }

        // First point must be the one nearer the segment start
        assert!((points[0] - seg_start).norm() < (points[1] - seg_start).norm());
        assert!((points[0][0] + 4.0).abs() < EPS);
        assert!((points[1][0] - 4.0).abs() < EPS);
    }

    #[test]
    fn test_descending_segment_ordering() {
        // A segment travelling in -Y must still return the point nearest its
        // start first
        let seg_start = Vector2::new(3.0, 6.0);
        let seg_end = Vector2::new(3.0, -6.0);

        let points =
            circle_segment_intersections(&Vector2::zeros(), 5.0, &seg_start, &seg_end, false)
                .unwrap();

        assert_eq!(points.len(), 2);
        assert!((points[0][1] - 4.0).abs() < EPS);
        assert!((points[1][1] + 4.0).abs() < EPS);
    }

    #[test]
    fn test_zero_length_segment() {
        let result = circle_segment_intersections(
            &Vector2::zeros(),
            5.0,
            &Vector2::new(1.0, 1.0),
            &Vector2::new(1.0, 1.0),
            false,
        );

        assert!(matches!(result, Err(GeomError::DegenerateSegment)));
    }
}
