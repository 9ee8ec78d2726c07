//! Math type aliases and helper functions.
//!
//! All scene math is f32. Types are thin aliases over [`nalgebra`] so the
//! scene crates never name the backing library directly; the helpers below
//! cover the handful of conversions the hierarchy engine needs (TRS matrix
//! composition and decomposition, quaternion constructors, Euler angles,
//! look-rotation).

pub use nalgebra;

use nalgebra::{Matrix3, Point3, Rotation3, Unit, UnitQuaternion};

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// Quaternion (f32). Stored as `[x, y, z, w]` in memory.
/// Use `Quat::new(w, x, y, z)` or [`quat_from_axis_angle`] to construct.
pub type Quat = nalgebra::Quaternion<f32>;

/// 4x4 homogeneous matrix (f32).
pub type Mat4 = nalgebra::Matrix4<f32>;

// ===== Matrix helpers =====

/// Build a 4x4 TRS matrix from scale, rotation (quaternion), and translation.
///
/// Column-vector convention: the result maps local points to parent space as
/// `T * R * S * p`.
pub fn mat4_from_scale_rotation_translation(
    scale: Vec3,
    rotation: Quat,
    translation: Vec3,
) -> Mat4 {
    let rot = UnitQuaternion::new_unchecked(rotation);
    Mat4::new_translation(&translation)
        * rot.to_homogeneous()
        * Mat4::new_nonuniform_scaling(&scale)
}

/// Decompose a 4x4 TRS matrix into (scale, rotation, translation).
///
/// Scale is recovered from the basis column lengths, so shear is folded into
/// the rotation and negative scale on an axis cannot be told apart from a
/// flipped rotation. A zero-scale axis produces NaN components.
pub fn to_scale_rotation_translation(m: &Mat4) -> (Vec3, Quat, Vec3) {
    let translation = Vec3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]);
    let scale = mat4_basis_scale(m);
    let col = |c: usize, s: f32| Vec3::new(m[(0, c)], m[(1, c)], m[(2, c)]) / s;
    let basis = Matrix3::from_columns(&[col(0, scale.x), col(1, scale.y), col(2, scale.z)]);
    let rotation =
        UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(basis)).into_inner();
    (scale, rotation, translation)
}

/// Lengths of the three basis columns of a 4x4 matrix.
///
/// For a composed TRS matrix this is the accumulated per-axis scale
/// magnitude; sign and shear are not recoverable.
pub fn mat4_basis_scale(m: &Mat4) -> Vec3 {
    Vec3::new(
        Vec3::new(m[(0, 0)], m[(1, 0)], m[(2, 0)]).norm(),
        Vec3::new(m[(0, 1)], m[(1, 1)], m[(2, 1)]).norm(),
        Vec3::new(m[(0, 2)], m[(1, 2)], m[(2, 2)]).norm(),
    )
}

/// Transform a point by a homogeneous matrix (translation applied).
pub fn mat4_transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    m.transform_point(&Point3::from(p)).coords
}

/// Transform a vector by a homogeneous matrix (translation ignored,
/// rotation and scale applied).
pub fn mat4_transform_vector(m: &Mat4, v: Vec3) -> Vec3 {
    m.transform_vector(&v)
}

// ===== Quaternion helpers =====

/// Quaternion rotating by `angle` radians about `axis`. The axis is
/// normalized here; a zero axis yields the identity rotation.
pub fn quat_from_axis_angle(axis: Vec3, angle: f32) -> Quat {
    match Unit::try_new(axis, 1.0e-6) {
        Some(axis) => UnitQuaternion::from_axis_angle(&axis, angle).into_inner(),
        None => Quat::identity(),
    }
}

/// Quaternion from rotation around the X axis (radians).
pub fn quat_from_rotation_x(angle: f32) -> Quat {
    UnitQuaternion::from_axis_angle(&Vec3::x_axis(), angle).into_inner()
}

/// Quaternion from rotation around the Y axis (radians).
pub fn quat_from_rotation_y(angle: f32) -> Quat {
    UnitQuaternion::from_axis_angle(&Vec3::y_axis(), angle).into_inner()
}

/// Quaternion from rotation around the Z axis (radians).
pub fn quat_from_rotation_z(angle: f32) -> Quat {
    UnitQuaternion::from_axis_angle(&Vec3::z_axis(), angle).into_inner()
}

/// Quaternion from XYZ-order Euler angles in radians: the rotation is
/// applied about X first, then Y, then Z.
pub fn quat_from_euler(euler: Vec3) -> Quat {
    UnitQuaternion::from_euler_angles(euler.x, euler.y, euler.z).into_inner()
}

/// XYZ-order Euler angles (radians) of a unit quaternion.
/// Inverse of [`quat_from_euler`] up to angle wrapping.
pub fn quat_to_euler(q: Quat) -> Vec3 {
    let (x, y, z) = UnitQuaternion::new_unchecked(q).euler_angles();
    Vec3::new(x, y, z)
}

/// Inverse of a unit quaternion.
pub fn quat_inverse(q: Quat) -> Quat {
    UnitQuaternion::new_unchecked(q).inverse().into_inner()
}

/// Rotate a vector by a unit quaternion.
pub fn quat_rotate_vec3(q: Quat, v: Vec3) -> Vec3 {
    UnitQuaternion::new_unchecked(q) * v
}

/// Rotation whose forward axis (−Z) points along `forward` and whose up
/// axis is the component of `up` orthogonal to `forward`.
///
/// Returns the identity rotation for a (near-)zero `forward`. When
/// `forward` and `up` are colinear an arbitrary but stable perpendicular
/// is chosen for the right axis.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    if forward.norm_squared() < 1.0e-12 {
        return Quat::identity();
    }
    let z = -forward.normalize();
    let mut x = up.cross(&z);
    if x.norm_squared() < 1.0e-12 {
        let fallback = if z.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
        x = fallback.cross(&z);
    }
    let x = x.normalize();
    let y = z.cross(&x);
    let basis = Matrix3::from_columns(&[x, y, z]);
    UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(basis)).into_inner()
}
