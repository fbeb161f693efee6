/// Errors raised by point cloud operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PointCloudError {
    /// The operation needs at least one point.
    #[error("Pointcloud data is empty")]
    EmptyData,
}

/// A dense set of 3D points, one row per point.
///
/// Row order only matters when two clouds are paired, in which case row `i`
/// of one cloud corresponds to row `i` of the other. Clouds are never edited
/// in place: every transform produces a new cloud.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    // The points in the point cloud.
    points: Vec<[f64; 3]>,
}

impl PointCloud {
    /// Create a new point cloud from a list of points.
    pub fn new(points: Vec<[f64; 3]>) -> Self {
        Self { points }
    }

    /// Get the number of points in the point cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get as reference the points in the point cloud.
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Consume the point cloud and return the points.
    pub fn into_points(self) -> Vec<[f64; 3]> {
        self.points
    }

    /// Compute the mean position of the points.
    ///
    /// # Errors
    ///
    /// Returns [`PointCloudError::EmptyData`] if the cloud has no points.
    pub fn centroid(&self) -> Result<[f64; 3], PointCloudError> {
        if self.points.is_empty() {
            return Err(PointCloudError::EmptyData);
        }

        let sum = self.points.iter().fold([0.0; 3], |acc, p| {
            [acc[0] + p[0], acc[1] + p[1], acc[2] + p[2]]
        });
        let n = self.points.len() as f64;

        Ok([sum[0] / n, sum[1] / n, sum[2] / n])
    }

    /// Concatenate two clouds into a new one, `self` rows first.
    ///
    /// Used to build a single scan out of a registered pair.
    pub fn merge(&self, other: &PointCloud) -> PointCloud {
        let mut points = Vec::with_capacity(self.len() + other.len());
        points.extend_from_slice(&self.points);
        points.extend_from_slice(&other.points);
        PointCloud { points }
    }
}

impl From<Vec<[f64; 3]>> for PointCloud {
    fn from(points: Vec<[f64; 3]>) -> Self {
        Self::new(points)
    }
}
