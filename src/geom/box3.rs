//! Oriented 3-D boxes: corner enumeration, membership, per-box metrics.

use glam::{DMat4, DVec3};

use super::hull::distance_bounds;
use super::xform::{euler_xyz, pose};

/// The eight world-frame corners of a box with extents `(dx, dy, dz)`
/// centered at the origin of `pose`.
///
/// Corners enumerate the Cartesian product `{-d/2, +d/2}` per axis with
/// the last axis varying fastest, so the order is deterministic.
pub fn corners(dx: f64, dy: f64, dz: f64, pose: &DMat4) -> [DVec3; 8] {
    let xs = [-dx * 0.5, dx * 0.5];
    let ys = [-dy * 0.5, dy * 0.5];
    let zs = [-dz * 0.5, dz * 0.5];

    let mut out = [DVec3::ZERO; 8];
    let mut k = 0;
    for x in xs {
        for y in ys {
            for z in zs {
                out[k] = pose.transform_point3(DVec3::new(x, y, z));
                k += 1;
            }
        }
    }
    out
}

/// Count the points strictly inside an oriented box.
///
/// Points are mapped into the box frame (translate by `-center`, rotate by
/// the inverse of the box rotation) and tested against the open interval
/// per axis, so boundary points are excluded.
#[allow(clippy::too_many_arguments)]
pub fn count_points_in_box(
    points: &[DVec3],
    cx: f64,
    cy: f64,
    cz: f64,
    dx: f64,
    dy: f64,
    dz: f64,
    rx: f64,
    ry: f64,
    rz: f64,
) -> usize {
    // rotation matrices are orthogonal: the transpose is the inverse
    let inv_rot = euler_xyz(rx, ry, rz).transpose();
    let center = DVec3::new(cx, cy, cz);
    let (hx, hy, hz) = (dx * 0.5, dy * 0.5, dz * 0.5);

    points
        .iter()
        .filter(|p| {
            let q = inv_rot * (**p - center);
            q.x.abs() < hx && q.y.abs() < hy && q.z.abs() < hz
        })
        .count()
}

/// Per-annotation statistics for one box over one point set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxMetrics {
    /// Points strictly inside the box
    pub point_count: usize,
    /// Closest approach of the box footprint to the sensor origin (XY)
    pub min_distance: f64,
    /// Farthest box corner from the sensor origin (XY)
    pub max_distance: f64,
    /// Lowest corner height
    pub min_height: f64,
    /// Highest corner height
    pub max_height: f64,
}

/// Compute the statistic bundle exported per annotated box: membership
/// count, origin distance bounds of the XY footprint, and the corner
/// height range.
#[allow(clippy::too_many_arguments)]
pub fn box_metrics(
    points: &[DVec3],
    cx: f64,
    cy: f64,
    cz: f64,
    dx: f64,
    dy: f64,
    dz: f64,
    rx: f64,
    ry: f64,
    rz: f64,
) -> BoxMetrics {
    let point_count = count_points_in_box(points, cx, cy, cz, dx, dy, dz, rx, ry, rz);
    let corners = corners(dx, dy, dz, &pose(cx, cy, cz, rx, ry, rz));
    let (min_distance, max_distance) = distance_bounds(&corners);
    let min_height = corners.iter().map(|p| p.z).fold(f64::INFINITY, f64::min);
    let max_height = corners
        .iter()
        .map(|p| p.z)
        .fold(f64::NEG_INFINITY, f64::max);

    BoxMetrics {
        point_count,
        min_distance,
        max_distance,
        min_height,
        max_height,
    }
}
