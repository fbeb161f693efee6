/// Errors raised by the registration pipeline.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum IcpError {
    /// The cloud to index has no points.
    #[error("Target point cloud is empty, cannot build the spatial index")]
    EmptyTarget,

    /// No sampled point found a match within the acceptance distance.
    #[error("No correspondences accepted out of {sampled} sampled points")]
    NoCorrespondences {
        /// Number of source points that were queried.
        sampled: usize,
    },

    /// The paired points do not span at least a plane.
    #[error("Need at least 3 non-collinear correspondences, got {num_points} points")]
    IllConditioned {
        /// Number of paired points given to the solver.
        num_points: usize,
    },

    /// The paired point sets differ in length.
    #[error("Mismatched correspondence lengths: {0} != {1}")]
    MismatchedLengths(usize, usize),

    /// The sampling stride is zero.
    #[error("Sampling stride must be at least 1")]
    InvalidStride,
}
