use scanalign_3d::{
    linalg::{determinant33, matvec33},
    utils::faer_mat33_to_array33,
};
use serde::{Deserialize, Serialize};

use crate::{IcpError, RigidTransform};

// second singular value below this fraction of the first means collinear input
const RANK_TOLERANCE: f64 = 1e-9;

/// What the solver does when `V * U^T` comes out as a reflection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflectionHandling {
    /// Flip the singular vector of the smallest singular value so that the
    /// result is a proper rotation.
    #[default]
    Correct,
    /// Return `V * U^T` as is, even when its determinant is `-1`.
    Keep,
}

/// Compute the centroids of two sets of points.
///
/// # Arguments
///
/// * `points1` - A set of points.
/// * `points2` - Another set of points.
///
/// # Returns
///
/// The centroids of the two sets of points.
pub fn compute_centroids(points1: &[[f64; 3]], points2: &[[f64; 3]]) -> ([f64; 3], [f64; 3]) {
    let mean = |points: &[[f64; 3]]| {
        let sum = points.iter().fold([0.0; 3], |acc, p| {
            [acc[0] + p[0], acc[1] + p[1], acc[2] + p[2]]
        });
        let n = points.len() as f64;
        [sum[0] / n, sum[1] / n, sum[2] / n]
    };
    (mean(points1), mean(points2))
}

/// Compute the rigid transformation that best maps `points_q` onto `points_p`.
///
/// Finds `R` and `t` minimizing `sum_i |p_i - (R * q_i + t)|^2` with the
/// closed form SVD solution (Arun et al. 1987, Kabsch):
///
/// 1. Compute the centroids `p_mean`, `q_mean`.
/// 2. Form the cross-covariance `A = (Q - q_mean)^T * (P - p_mean)`.
/// 3. Decompose `A = U * S * V^T`.
/// 4. `R = V * U^T`.
/// 5. `t = p_mean - R * q_mean`.
///
/// # Arguments
///
/// * `points_p` - Reference points, row paired with `points_q`.
/// * `points_q` - Points to be moved onto `points_p`.
/// * `reflection` - Whether an improper result is corrected or returned.
///
/// # Errors
///
/// * [`IcpError::MismatchedLengths`] if the two sets differ in length.
/// * [`IcpError::IllConditioned`] with fewer than 3 points or when the
///   centered points are collinear or coincident.
pub fn fit_transformation(
    points_p: &[[f64; 3]],
    points_q: &[[f64; 3]],
    reflection: ReflectionHandling,
) -> Result<RigidTransform, IcpError> {
    if points_p.len() != points_q.len() {
        return Err(IcpError::MismatchedLengths(points_p.len(), points_q.len()));
    }
    if points_p.len() < 3 {
        return Err(IcpError::IllConditioned {
            num_points: points_p.len(),
        });
    }

    let (p_mean, q_mean) = compute_centroids(points_p, points_q);

    // A[i][j] = sum_k (q_k - q_mean)[i] * (p_k - p_mean)[j]
    let mut a = [[0.0f64; 3]; 3];
    for (p, q) in points_p.iter().zip(points_q.iter()) {
        let pc = [p[0] - p_mean[0], p[1] - p_mean[1], p[2] - p_mean[2]];
        let qc = [q[0] - q_mean[0], q[1] - q_mean[1], q[2] - q_mean[2]];
        for (row, &qc_i) in a.iter_mut().zip(qc.iter()) {
            for (val, &pc_j) in row.iter_mut().zip(pc.iter()) {
                *val += qc_i * pc_j;
            }
        }
    }

    let a_mat = faer::Mat::<f64>::from_fn(3, 3, |i, j| a[i][j]);
    let svd = a_mat.svd();
    let u = svd.u();
    let v = svd.v();
    let s = svd.s_diagonal();
    let singular = [s.read(0), s.read(1), s.read(2)];

    let mut sorted = singular;
    sorted.sort_by(|x, y| y.total_cmp(x));
    let well_conditioned = sorted[0] > 0.0 && sorted[1] > RANK_TOLERANCE * sorted[0];
    if !well_conditioned {
        return Err(IcpError::IllConditioned {
            num_points: points_p.len(),
        });
    }

    // R = V * diag(signs) * U^T
    let rotation_from = |signs: [f64; 3]| {
        let d = faer::Mat::<f64>::from_fn(3, 3, |i, j| if i == j { signs[i] } else { 0.0 });
        let r = (v * d.as_ref()) * u.transpose();
        faer_mat33_to_array33(r.as_ref())
    };

    let mut rotation = rotation_from([1.0; 3]);

    if determinant33(&rotation) < 0.0 {
        match reflection {
            ReflectionHandling::Correct => {
                let smallest = (0..3)
                    .min_by(|&x, &y| singular[x].total_cmp(&singular[y]))
                    .unwrap_or(2);
                let mut signs = [1.0; 3];
                signs[smallest] = -1.0;
                rotation = rotation_from(signs);
                log::warn!(
                    "Reflection detected in the orientation fit, flipped singular vector {}",
                    smallest
                );
            }
            ReflectionHandling::Keep => {
                log::debug!("Orientation fit returned a reflection, kept as is");
            }
        }
    }

    let rq = matvec33(&rotation, &q_mean);
    let translation = [p_mean[0] - rq[0], p_mean[1] - rq[1], p_mean[2] - rq[2]];

    Ok(RigidTransform {
        rotation,
        translation,
    })
}
