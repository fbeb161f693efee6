#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Linear algebra utilities.
pub mod linalg;

/// Gaussian noise injection for point clouds.
pub mod noise;

/// Point cloud container.
pub mod pointcloud;

/// 3D rotation helpers.
pub mod transforms;

/// Conversions between point arrays and faer views.
pub mod utils;
