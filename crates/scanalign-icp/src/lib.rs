#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod error;
pub use error::IcpError;

mod correspondences;
pub use correspondences::{find_correspondences, Correspondences};

mod fit;
pub use fit::{compute_centroids, fit_transformation, ReflectionHandling};

mod icp_vanilla;
pub use icp_vanilla::*;

mod index;
pub use index::{Nearest, SpatialIndex};

mod rigid;
pub use rigid::RigidTransform;
