//! Pure geometry over decoded point sets.
//!
//! Everything here is a function of plain values: box poses from Euler
//! angles, corner enumeration, strict-interior membership counting, and
//! origin distance bounds of the XY footprint. Nothing holds state, so the
//! whole module is safe to call from any thread.

mod box3;
mod hull;
mod xform;

pub use box3::{box_metrics, corners, count_points_in_box, BoxMetrics};
pub use hull::distance_bounds;
pub use xform::{
    euler_xyz, intrinsics_from_slice, normalize_angle, pose, pose_to_row_major,
    transform_matrix, CameraIntrinsics,
};
