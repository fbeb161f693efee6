use scanalign_3d::pointcloud::PointCloud;

use crate::{IcpError, SpatialIndex};

/// Paired points between a sampled source cloud and a target cloud.
///
/// Row `i` of `source` is matched to row `i` of `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Correspondences {
    /// Sampled source points that found an accepted match.
    pub source: Vec<[f64; 3]>,
    /// Nearest target point for each entry of `source`.
    pub target: Vec<[f64; 3]>,
    /// Mean squared distance over the accepted matches.
    pub residual: f64,
}

impl Correspondences {
    /// Number of accepted pairs.
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Whether no pair was accepted.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }
}

/// Find the nearest target point for every `stride`-th source point.
///
/// The target is indexed once and the index is reused for every query. A
/// match is kept only when its squared distance is strictly below
/// `max_distance_sq`.
///
/// # Arguments
///
/// * `source` - Cloud sampled at rows `0, stride, 2 * stride, ...`.
/// * `target` - Cloud searched for the nearest points.
/// * `stride` - Sampling step over the source rows, at least 1.
/// * `max_distance_sq` - Acceptance threshold on the squared distance.
///
/// # Errors
///
/// * [`IcpError::InvalidStride`] if `stride` is zero.
/// * [`IcpError::EmptyTarget`] if `target` has no points.
/// * [`IcpError::NoCorrespondences`] if no sampled point was accepted.
pub fn find_correspondences(
    source: &PointCloud,
    target: &PointCloud,
    stride: usize,
    max_distance_sq: f64,
) -> Result<Correspondences, IcpError> {
    if stride == 0 {
        return Err(IcpError::InvalidStride);
    }

    let index = SpatialIndex::build(target)?;

    // upper bound on the number of pairs
    let capacity = source.len().div_ceil(stride);
    let mut points_in_src = Vec::with_capacity(capacity);
    let mut points_in_dst = Vec::with_capacity(capacity);

    let mut sampled = 0;
    let mut sum_distance_sq = 0.0;
    for point in source.points().iter().step_by(stride) {
        sampled += 1;
        let nn = index.nearest(point);
        if nn.distance_sq < max_distance_sq {
            points_in_src.push(*point);
            points_in_dst.push(target.points()[nn.index]);
            sum_distance_sq += nn.distance_sq;
        }
    }

    if points_in_src.is_empty() {
        return Err(IcpError::NoCorrespondences { sampled });
    }

    points_in_src.shrink_to_fit();
    points_in_dst.shrink_to_fit();

    let residual = (sum_distance_sq / points_in_src.len() as f64).abs();

    Ok(Correspondences {
        source: points_in_src,
        target: points_in_dst,
        residual,
    })
}
