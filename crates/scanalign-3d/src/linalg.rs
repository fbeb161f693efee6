use crate::utils;

/// Transform a set of points using a rotation and translation.
///
/// Computes `R * p + t` for every point and returns the result as a new list.
///
/// # Arguments
///
/// * `points` - A set of points to be transformed.
/// * `rotation` - A row major rotation matrix.
/// * `translation` - A translation vector.
///
/// Example:
///
/// ```
/// use scanalign_3d::linalg::transform_points;
///
/// let points = vec![[2.0, 2.0, 2.0], [3.0, 4.0, 5.0]];
/// let rotation = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
/// let translation = [1.0, 0.0, 0.0];
/// let transformed = transform_points(&points, &rotation, &translation);
/// assert_eq!(transformed[0], [3.0, 2.0, 2.0]);
/// ```
pub fn transform_points(
    points: &[[f64; 3]],
    rotation: &[[f64; 3]; 3],
    translation: &[f64; 3],
) -> Vec<[f64; 3]> {
    let points_mat = utils::points_to_faer_mat(points);
    let rotation_mat = utils::array33_to_faer_mat33(rotation);

    // points are stored as rows: (R * p)^T = p^T * R^T
    let rotated = points_mat * rotation_mat.transpose();

    (0..points.len())
        .map(|i| {
            [
                rotated.read(i, 0) + translation[0],
                rotated.read(i, 1) + translation[1],
                rotated.read(i, 2) + translation[2],
            ]
        })
        .collect()
}

/// Multiply two 3x3 matrices, `a * b`.
pub fn matmul33(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    out
}

/// Multiply a 3x3 matrix with a 3D vector, `m * v`.
pub fn matvec33(m: &[[f64; 3]; 3], v: &[f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// Transpose a 3x3 matrix.
pub fn transpose33(m: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    [
        [m[0][0], m[1][0], m[2][0]],
        [m[0][1], m[1][1], m[2][1]],
        [m[0][2], m[1][2], m[2][2]],
    ]
}

/// Determinant of a 3x3 matrix.
pub fn determinant33(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_points_identity() {
        let src_points = vec![[2.0, 2.0, 2.0], [3.0, 4.0, 5.0]];
        let rotation = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let translation = [0.0, 0.0, 0.0];
        let dst_points = transform_points(&src_points, &rotation, &translation);

        assert_eq!(dst_points, src_points);
    }

    #[test]
    fn test_transform_points_empty() {
        let rotation = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let dst_points = transform_points(&[], &rotation, &[1.0, 2.0, 3.0]);
        assert!(dst_points.is_empty());
    }

    #[test]
    fn test_transform_points_roundtrip() {
        let src_points = vec![[2.0, 2.0, 2.0], [3.0, 4.0, 5.0]];
        let rotation = [[1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]];
        let translation = [1.0, 2.0, 3.0];

        let dst_points = transform_points(&src_points, &rotation, &translation);
        assert_eq!(dst_points[0], [3.0, 0.0, 5.0]);

        // R' = R^T, t' = -R^T * t
        let rotation_inv = transpose33(&rotation);
        let t = matvec33(&rotation_inv, &translation);
        let translation_inv = [-t[0], -t[1], -t[2]];

        let back = transform_points(&dst_points, &rotation_inv, &translation_inv);
        for (res, exp) in back.iter().zip(src_points.iter()) {
            for (r, e) in res.iter().zip(exp.iter()) {
                assert_relative_eq!(r, e, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_matmul33_and_determinant() {
        let rz = [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        let rz2 = matmul33(&rz, &rz);
        assert_eq!(rz2, [[-1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert_relative_eq!(determinant33(&rz), 1.0);

        let reflection = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]];
        assert_relative_eq!(determinant33(&reflection), -1.0);
        assert_eq!(matmul33(&rz, &transpose33(&rz)), [
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0]
        ]);
    }
}
