//! Pose construction and angle helpers.
//!
//! Box parameters arrive from externally parsed annotations as loose float
//! lists, so the slice-taking constructors validate shape once here at the
//! input boundary; everything downstream works on glam values.

use glam::{DMat3, DMat4, DVec3};

use crate::util::{Error, Result};

/// Build a 4x4 homogeneous transform from a translation and a row-major
/// 3x3 rotation.
///
/// Fails when `t` is not 3 elements or `rot` is not 9.
pub fn transform_matrix(t: &[f64], rot: &[f64]) -> Result<DMat4> {
    if t.len() != 3 {
        return Err(Error::ShapeMismatch {
            expected: "translation of 3",
            actual: t.len(),
        });
    }
    if rot.len() != 9 {
        return Err(Error::ShapeMismatch {
            expected: "row-major 3x3 rotation of 9",
            actual: rot.len(),
        });
    }
    // glam is column-major: column k of the rotation is elements k, k+3, k+6
    let rotation = DMat3::from_cols_array(&[
        rot[0], rot[3], rot[6], //
        rot[1], rot[4], rot[7], //
        rot[2], rot[5], rot[8],
    ]);
    Ok(homogeneous(rotation, DVec3::new(t[0], t[1], t[2])))
}

/// Rotation matrix for intrinsic X→Y→Z Euler angles, as applied to column
/// vectors: `R = Rz(rz) · Ry(ry) · Rx(rx)`.
pub fn euler_xyz(rx: f64, ry: f64, rz: f64) -> DMat3 {
    DMat3::from_rotation_z(rz) * DMat3::from_rotation_y(ry) * DMat3::from_rotation_x(rx)
}

/// The 4x4 pose of a box: Euler rotation about its center.
pub fn pose(cx: f64, cy: f64, cz: f64, rx: f64, ry: f64, rz: f64) -> DMat4 {
    homogeneous(euler_xyz(rx, ry, rz), DVec3::new(cx, cy, cz))
}

/// Flatten a pose to 16 row-major floats, optionally inverting it first.
///
/// The flat form is what annotation JSON carries for extrinsics.
pub fn pose_to_row_major(pose: &DMat4, invert: bool) -> Result<[f64; 16]> {
    let m = if invert {
        if pose.determinant() == 0.0 {
            return Err(Error::SingularTransform);
        }
        pose.inverse()
    } else {
        *pose
    };
    // transposed column-major == row-major
    Ok(m.transpose().to_cols_array())
}

/// Pinhole intrinsics extracted from a row-major 3x3 camera matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraIntrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

/// Extract [`CameraIntrinsics`] from a flat row-major 3x3 matrix.
pub fn intrinsics_from_slice(k: &[f64]) -> Result<CameraIntrinsics> {
    if k.len() != 9 {
        return Err(Error::ShapeMismatch {
            expected: "row-major 3x3 intrinsic of 9",
            actual: k.len(),
        });
    }
    Ok(CameraIntrinsics {
        fx: k[0],
        fy: k[4],
        cx: k[2],
        cy: k[5],
    })
}

/// Map an angle in radians into `(-pi, pi]`.
pub fn normalize_angle(a: f64) -> f64 {
    use std::f64::consts::PI;
    let r = a - ((a + PI) / (2.0 * PI)).floor() * (2.0 * PI);
    // fold the open boundary onto +pi
    if r == -PI {
        PI
    } else {
        r
    }
}

fn homogeneous(rotation: DMat3, translation: DVec3) -> DMat4 {
    DMat4::from_cols(
        rotation.x_axis.extend(0.0),
        rotation.y_axis.extend(0.0),
        rotation.z_axis.extend(0.0),
        translation.extend(1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-12;

    fn assert_vec_close(a: DVec3, b: DVec3) {
        assert!((a - b).length() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_transform_matrix_layout() {
        let m = transform_matrix(
            &[10.0, 20.0, 30.0],
            &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        )
        .unwrap();
        assert_eq!(m.transform_point3(DVec3::ZERO), DVec3::new(10.0, 20.0, 30.0));
        assert_eq!(m.row(3), glam::DVec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_transform_matrix_row_major_input() {
        // row-major 90-degree rotation about Z: maps +X to +Y
        let m = transform_matrix(
            &[0.0, 0.0, 0.0],
            &[0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0],
        )
        .unwrap();
        assert_vec_close(m.transform_point3(DVec3::X), DVec3::Y);
    }

    #[test]
    fn test_transform_matrix_shape_errors() {
        assert!(transform_matrix(&[0.0; 2], &[0.0; 9]).is_err());
        assert!(transform_matrix(&[0.0; 3], &[0.0; 8]).is_err());
    }

    #[test]
    fn test_euler_composition_order() {
        // Rz * Ry * Rx: the X rotation is applied to vectors first
        let r = euler_xyz(FRAC_PI_2, 0.0, FRAC_PI_2);
        // +Y -> (Rx) +Z -> (Rz) +Z
        assert_vec_close(r * DVec3::Y, DVec3::Z);
        // +X -> (Rx) +X -> (Rz) +Y
        assert_vec_close(r * DVec3::X, DVec3::Y);
    }

    #[test]
    fn test_pose_translates_origin_to_center() {
        let p = pose(1.0, 2.0, 3.0, 0.3, 0.2, 0.1);
        assert_vec_close(p.transform_point3(DVec3::ZERO), DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_pose_to_row_major_round_trip() {
        let p = pose(1.0, -2.0, 0.5, 0.1, 0.2, 0.3);
        let flat = pose_to_row_major(&p, false).unwrap();
        // translation sits in the last column of the row-major form
        assert!((flat[3] - 1.0).abs() < EPS);
        assert!((flat[7] + 2.0).abs() < EPS);
        assert!((flat[11] - 0.5).abs() < EPS);
        assert_eq!(&flat[12..], &[0.0, 0.0, 0.0, 1.0]);

        let inv = pose_to_row_major(&p, true).unwrap();
        let m = DMat4::from_cols_array(&inv).transpose();
        let id = m * p;
        assert!((id - DMat4::IDENTITY).abs_diff_eq(DMat4::ZERO, 1e-9));
    }

    #[test]
    fn test_pose_to_row_major_rejects_singular() {
        let singular = DMat4::ZERO;
        assert!(matches!(
            pose_to_row_major(&singular, true),
            Err(Error::SingularTransform)
        ));
    }

    #[test]
    fn test_intrinsics_from_slice() {
        let k = [500.0, 0.0, 320.0, 0.0, 510.0, 240.0, 0.0, 0.0, 1.0];
        let intr = intrinsics_from_slice(&k).unwrap();
        assert_eq!(
            intr,
            CameraIntrinsics {
                fx: 500.0,
                fy: 510.0,
                cx: 320.0,
                cy: 240.0
            }
        );
        assert!(intrinsics_from_slice(&k[..6]).is_err());
    }

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!(normalize_angle(2.0 * PI).abs() < EPS);
        assert_eq!(normalize_angle(-PI), PI);
        assert_eq!(normalize_angle(PI), PI);
        assert!((normalize_angle(3.0 * PI) - PI).abs() < EPS);
        assert!((normalize_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < EPS);
    }
}
