//! Origin distance bounds of a box footprint.
//!
//! Box corners are projected onto the XY plane; the distance bounds come
//! from the 2-D convex hull of that projection, matching how annotation
//! ranges are reported: min is the closest approach (zero when the sensor
//! origin sits inside the footprint), max is the farthest corner.

use glam::{DVec2, DVec3};

/// `(min, max)` distance from the origin to the convex hull of the
/// corners' XY projection.
///
/// Degenerate footprints (a point or a segment) are handled; an empty
/// input yields `(0, 0)`.
pub fn distance_bounds(corners: &[DVec3]) -> (f64, f64) {
    let projected: Vec<DVec2> = corners.iter().map(|p| DVec2::new(p.x, p.y)).collect();
    let hull = convex_hull(&projected);

    let max = hull.iter().map(|p| p.length()).fold(0.0, f64::max);
    let min = match hull.len() {
        0 => 0.0,
        1 => hull[0].length(),
        2 => segment_distance(hull[0], hull[1]),
        _ if contains_origin(&hull) => 0.0,
        _ => hull
            .iter()
            .zip(hull.iter().cycle().skip(1))
            .map(|(&a, &b)| segment_distance(a, b))
            .fold(f64::INFINITY, f64::min),
    };
    (min, max)
}

/// Monotone-chain convex hull, counter-clockwise, collinear points dropped.
fn convex_hull(points: &[DVec2]) -> Vec<DVec2> {
    let mut pts: Vec<DVec2> = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup();
    if pts.len() <= 2 {
        return pts;
    }

    let mut lower: Vec<DVec2> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0
        {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<DVec2> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0
        {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

fn cross(o: DVec2, a: DVec2, b: DVec2) -> f64 {
    (a - o).perp_dot(b - o)
}

/// Whether the origin lies inside (or on the boundary of) a CCW convex
/// polygon.
fn contains_origin(hull: &[DVec2]) -> bool {
    for i in 0..hull.len() {
        let a = hull[i];
        let b = hull[(i + 1) % hull.len()];
        if (b - a).perp_dot(-a) < 0.0 {
            return false;
        }
    }
    true
}

/// Distance from the origin to the segment `ab`.
fn segment_distance(a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let t = if len_sq == 0.0 {
        0.0
    } else {
        ((-a).dot(ab) / len_sq).clamp(0.0, 1.0)
    };
    (a + ab * t).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_corners(cx: f64, cy: f64, half: f64) -> Vec<DVec3> {
        // each footprint corner twice, like a box's top and bottom rings
        let mut out = Vec::new();
        for (sx, sy) in [(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)] {
            for z in [0.0, 2.0] {
                out.push(DVec3::new(cx + sx * half, cy + sy * half, z));
            }
        }
        out
    }

    #[test]
    fn test_origin_inside_footprint() {
        let (min, max) = distance_bounds(&square_corners(0.0, 0.0, 1.0));
        assert_eq!(min, 0.0);
        assert!((max - 2.0f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_origin_outside_footprint() {
        // square spanning x in [4, 6], y in [-1, 1]
        let (min, max) = distance_bounds(&square_corners(5.0, 0.0, 1.0));
        assert!((min - 4.0).abs() < 1e-9);
        assert!((max - (36.0f64 + 1.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_nearest_point_on_edge_interior() {
        // nearest approach is the middle of the x = 4 edge, not a corner
        let (min, _) = distance_bounds(&square_corners(5.0, 0.0, 1.0));
        let corner_dist = (16.0f64 + 1.0).sqrt();
        assert!(min < corner_dist);
    }

    #[test]
    fn test_origin_on_boundary() {
        // footprint touches the origin at the x = 0 edge
        let (min, _) = distance_bounds(&square_corners(1.0, 0.0, 1.0));
        assert_eq!(min, 0.0);
    }

    #[test]
    fn test_degenerate_point_footprint() {
        let corners = vec![DVec3::new(3.0, 4.0, 0.0), DVec3::new(3.0, 4.0, 2.0)];
        let (min, max) = distance_bounds(&corners);
        assert!((min - 5.0).abs() < 1e-9);
        assert!((max - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_segment_footprint() {
        // zero-width box: footprint collapses to a segment from (1,1) to (3,1)
        let corners = vec![
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(3.0, 1.0, 0.0),
            DVec3::new(1.0, 1.0, 2.0),
            DVec3::new(3.0, 1.0, 2.0),
        ];
        let (min, max) = distance_bounds(&corners);
        assert!((min - 2.0f64.sqrt()).abs() < 1e-9);
        assert!((max - 10.0f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(distance_bounds(&[]), (0.0, 0.0));
    }
}
