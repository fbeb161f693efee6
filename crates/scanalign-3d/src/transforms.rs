use crate::{
    linalg::{matmul33, transform_points},
    pointcloud::{PointCloud, PointCloudError},
};

/// Errors raised while building rotation matrices.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TransformError {
    /// The rotation axis has no direction.
    #[error("cannot compute rotation matrix from a zero vector")]
    ZeroAxis,
}

/// Compute the rotation matrix from an axis and angle.
///
/// # Arguments
///
/// * `axis` - The axis of rotation, normalized internally.
/// * `angle` - The angle of rotation in radians.
///
/// # Returns
///
/// The rotation matrix.
///
/// Example:
///
/// ```
/// use scanalign_3d::transforms::axis_angle_to_rotation_matrix;
///
/// let axis = [1.0, 0.0, 0.0];
/// let angle = std::f64::consts::PI / 2.0;
/// let rotation = axis_angle_to_rotation_matrix(&axis, angle).unwrap();
/// assert!((rotation[1][2] + 1.0).abs() < 1e-12);
/// ```
pub fn axis_angle_to_rotation_matrix(
    axis: &[f64; 3],
    angle: f64,
) -> Result<[[f64; 3]; 3], TransformError> {
    let magnitude = (axis[0].powi(2) + axis[1].powi(2) + axis[2].powi(2)).sqrt();
    if magnitude < 1e-10 {
        return Err(TransformError::ZeroAxis);
    }

    let x = axis[0] / magnitude;
    let y = axis[1] / magnitude;
    let z = axis[2] / magnitude;

    let c = angle.cos();
    let s = angle.sin();
    let t = 1.0 - c;

    Ok([
        [c + x * x * t, x * y * t - z * s, x * z * t + y * s],
        [x * y * t + z * s, c + y * y * t, y * z * t - x * s],
        [x * z * t - y * s, y * z * t + x * s, c + z * z * t],
    ])
}

/// Build the rotation `Rz * Ry * Rx` from Euler angles in radians.
///
/// Each factor is the standard right handed rotation about its axis, so the
/// point is rotated about X first, then Y, then Z.
pub fn euler_to_rotation_matrix(rx: f64, ry: f64, rz: f64) -> [[f64; 3]; 3] {
    let (sx, cx) = rx.sin_cos();
    let (sy, cy) = ry.sin_cos();
    let (sz, cz) = rz.sin_cos();

    let r_x = [[1.0, 0.0, 0.0], [0.0, cx, -sx], [0.0, sx, cx]];
    let r_y = [[cy, 0.0, sy], [0.0, 1.0, 0.0], [-sy, 0.0, cy]];
    let r_z = [[cz, -sz, 0.0], [sz, cz, 0.0], [0.0, 0.0, 1.0]];

    matmul33(&r_z, &matmul33(&r_y, &r_x))
}

/// Rotate a point cloud about its own centroid.
///
/// The centroid is subtracted from every point and the rotation
/// `Rz * Ry * Rx` is applied to the centered points. No translation back is
/// applied, so both returned clouds have a zero centroid.
///
/// # Arguments
///
/// * `pointcloud` - The cloud to rotate.
/// * `rx`, `ry`, `rz` - Rotation angles in radians.
///
/// # Returns
///
/// The pair `(centered, rotated)`.
///
/// # Errors
///
/// Returns [`PointCloudError::EmptyData`] if the cloud has no points.
pub fn rotate(
    pointcloud: &PointCloud,
    rx: f64,
    ry: f64,
    rz: f64,
) -> Result<(PointCloud, PointCloud), PointCloudError> {
    let centroid = pointcloud.centroid()?;

    let centered = pointcloud
        .points()
        .iter()
        .map(|p| [p[0] - centroid[0], p[1] - centroid[1], p[2] - centroid[2]])
        .collect::<Vec<_>>();

    let rotation = euler_to_rotation_matrix(rx, ry, rz);
    let rotated = transform_points(&centered, &rotation, &[0.0; 3]);

    Ok((PointCloud::new(centered), PointCloud::new(rotated)))
}
