use kiddo::{immutable::float::kdtree::ImmutableKdTree, SquaredEuclidean};
use scanalign_3d::pointcloud::PointCloud;

use crate::IcpError;

/// Result of a nearest neighbour query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    /// Row of the matched point in the indexed cloud.
    pub index: usize,
    /// Squared Euclidean distance between the query and the match.
    pub distance_sq: f64,
}

/// A k-d tree over the points of a target cloud.
///
/// The tree keeps its own copy of the coordinates and is never modified after
/// construction.
pub struct SpatialIndex {
    tree: ImmutableKdTree<f64, u32, 3, 32>,
    len: usize,
}

impl SpatialIndex {
    /// Build the index over all the points of `target`.
    ///
    /// # Errors
    ///
    /// Returns [`IcpError::EmptyTarget`] if `target` has no points.
    pub fn build(target: &PointCloud) -> Result<Self, IcpError> {
        if target.is_empty() {
            return Err(IcpError::EmptyTarget);
        }

        let tree = ImmutableKdTree::new_from_slice(target.points());

        Ok(Self {
            tree,
            len: target.len(),
        })
    }

    /// Find the closest indexed point to `query`.
    ///
    /// On ties any point at the minimum distance may be returned.
    pub fn nearest(&self, query: &[f64; 3]) -> Nearest {
        let nn = self.tree.nearest_one::<SquaredEuclidean>(query);
        Nearest {
            index: nn.item as usize,
            distance_sq: nn.distance,
        }
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false, an index is never built over an empty cloud.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_nearest_exact() -> Result<(), IcpError> {
        let target = PointCloud::new(vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ]);
        let index = SpatialIndex::build(&target)?;
        assert_eq!(index.len(), 4);

        let nn = index.nearest(&[0.9, 0.1, 0.0]);
        assert_eq!(nn.index, 1);
        assert_relative_eq!(nn.distance_sq, 0.02, epsilon = 1e-12);

        let nn = index.nearest(&[0.0, 0.0, 1.0]);
        assert_eq!(nn.index, 3);
        assert_eq!(nn.distance_sq, 0.0);
        Ok(())
    }

    #[test]
    fn test_nearest_matches_brute_force() -> Result<(), IcpError> {
        let mut rng = StdRng::seed_from_u64(11);
        let points = (0..300)
            .map(|_| [rng.random::<f64>(), rng.random::<f64>(), rng.random::<f64>()])
            .collect::<Vec<_>>();
        let target = PointCloud::new(points.clone());
        let index = SpatialIndex::build(&target)?;

        for _ in 0..50 {
            let query = [rng.random::<f64>(), rng.random::<f64>(), rng.random::<f64>()];
            let (best, best_dist) = points
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    let d = (p[0] - query[0]).powi(2)
                        + (p[1] - query[1]).powi(2)
                        + (p[2] - query[2]).powi(2);
                    (i, d)
                })
                .fold((0, f64::INFINITY), |acc, x| if x.1 < acc.1 { x } else { acc });

            let nn = index.nearest(&query);
            assert_eq!(nn.index, best);
            assert_relative_eq!(nn.distance_sq, best_dist, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_empty_target() {
        let res = SpatialIndex::build(&PointCloud::default());
        assert!(matches!(res, Err(IcpError::EmptyTarget)));
    }
}
