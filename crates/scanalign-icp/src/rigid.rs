use scanalign_3d::{
    linalg::{determinant33, matmul33, matvec33, transform_points, transpose33},
    pointcloud::PointCloud,
};
use serde::{Deserialize, Serialize};

/// A rotation followed by a translation, `p' = R * p + t`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    /// Row major 3x3 rotation matrix.
    pub rotation: [[f64; 3]; 3],
    /// Translation vector.
    pub translation: [f64; 3],
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    /// The transform that leaves every point in place.
    pub fn identity() -> Self {
        Self {
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            translation: [0.0; 3],
        }
    }

    /// Transform a single point.
    pub fn apply_point(&self, point: &[f64; 3]) -> [f64; 3] {
        let p = matvec33(&self.rotation, point);
        [
            p[0] + self.translation[0],
            p[1] + self.translation[1],
            p[2] + self.translation[2],
        ]
    }

    /// Transform every point of a cloud, returning a new cloud.
    pub fn apply(&self, pointcloud: &PointCloud) -> PointCloud {
        PointCloud::new(transform_points(
            pointcloud.points(),
            &self.rotation,
            &self.translation,
        ))
    }

    /// The transform equivalent to applying `self` and then `next`.
    ///
    /// R = R_next * R_self
    /// t = R_next * t_self + t_next
    pub fn compose(&self, next: &RigidTransform) -> RigidTransform {
        let t = matvec33(&next.rotation, &self.translation);
        RigidTransform {
            rotation: matmul33(&next.rotation, &self.rotation),
            translation: [
                t[0] + next.translation[0],
                t[1] + next.translation[1],
                t[2] + next.translation[2],
            ],
        }
    }

    /// The inverse transform, assuming the rotation is orthogonal.
    pub fn inverse(&self) -> RigidTransform {
        let rotation = transpose33(&self.rotation);
        let t = matvec33(&rotation, &self.translation);
        RigidTransform {
            rotation,
            translation: [-t[0], -t[1], -t[2]],
        }
    }

    /// Determinant of the rotation block; `-1` flags a reflection.
    pub fn determinant(&self) -> f64 {
        determinant33(&self.rotation)
    }

    /// Angle of the rotation block in radians, in `[0, pi]`.
    pub fn rotation_angle(&self) -> f64 {
        let r = &self.rotation;
        let cos = 0.5 * (r[0][0] + r[1][1] + r[2][2] - 1.0);
        cos.clamp(-1.0, 1.0).acos()
    }

    /// Euclidean length of the translation.
    pub fn translation_norm(&self) -> f64 {
        let t = &self.translation;
        (t[0] * t[0] + t[1] * t[1] + t[2] * t[2]).sqrt()
    }

    /// Whether the rotation block is orthogonal with determinant `+1`.
    pub fn is_proper_rotation(&self, tolerance: f64) -> bool {
        let rrt = matmul33(&self.rotation, &transpose33(&self.rotation));
        let orthogonal = (0..3).all(|i| {
            (0..3).all(|j| {
                let expected = if i == j { 1.0 } else { 0.0 };
                (rrt[i][j] - expected).abs() < tolerance
            })
        });
        orthogonal && (self.determinant() - 1.0).abs() < tolerance
    }
}
