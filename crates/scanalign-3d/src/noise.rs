use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::pointcloud::PointCloud;

/// Errors raised while corrupting a point cloud with noise.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NoiseError {
    /// The standard deviation is negative or not finite.
    #[error("Invalid noise standard deviation: {0}")]
    InvalidSigma(f64),

    /// The cloud has no points to corrupt.
    #[error("Pointcloud data is empty")]
    EmptyData,
}

/// Add zero mean Gaussian noise to every coordinate of a point cloud.
///
/// Each coordinate of each point receives an independent sample of
/// `N(0, sigma^2)`. With `seed` set to `Some` the output is reproducible,
/// otherwise the generator is seeded from the thread local entropy source and
/// every call produces a different cloud.
///
/// # Arguments
///
/// * `pointcloud` - The cloud to corrupt.
/// * `sigma` - Standard deviation of the noise, in the cloud's units.
/// * `seed` - Optional seed for the random generator.
///
/// # Errors
///
/// * [`NoiseError::InvalidSigma`] if `sigma` is negative or not finite.
/// * [`NoiseError::EmptyData`] if the cloud has no points.
///
/// Example:
///
/// ```
/// use scanalign_3d::{noise::add_noise, pointcloud::PointCloud};
///
/// let cloud = PointCloud::new(vec![[0.0, 0.0, 0.0]; 10]);
/// let noisy = add_noise(&cloud, 0.01, Some(42)).unwrap();
/// assert_eq!(noisy.len(), 10);
/// ```
pub fn add_noise(
    pointcloud: &PointCloud,
    sigma: f64,
    seed: Option<u64>,
) -> Result<PointCloud, NoiseError> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => {
            let mut tr = rand::rng();
            StdRng::from_rng(&mut tr)
        }
    };
    add_noise_with_rng(pointcloud, sigma, &mut rng)
}

/// Same as [`add_noise`] but drawing samples from a caller supplied generator.
pub fn add_noise_with_rng<R: Rng + ?Sized>(
    pointcloud: &PointCloud,
    sigma: f64,
    rng: &mut R,
) -> Result<PointCloud, NoiseError> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(NoiseError::InvalidSigma(sigma));
    }
    if pointcloud.is_empty() {
        return Err(NoiseError::EmptyData);
    }
    let normal = Normal::new(0.0, sigma).map_err(|_| NoiseError::InvalidSigma(sigma))?;

    let points = pointcloud
        .points()
        .iter()
        .map(|p| {
            [
                p[0] + normal.sample(rng),
                p[1] + normal.sample(rng),
                p[2] + normal.sample(rng),
            ]
        })
        .collect();

    Ok(PointCloud::new(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid_cloud(n: usize) -> PointCloud {
        PointCloud::new(
            (0..n)
                .map(|i| {
                    let f = i as f64;
                    [f * 0.001, (f * 0.37).sin(), (f * 0.11).cos()]
                })
                .collect(),
        )
    }

    #[test]
    fn test_noise_statistics() -> Result<(), NoiseError> {
        let sigma = 0.05;
        let cloud = grid_cloud(20_000);
        let noisy = add_noise(&cloud, sigma, Some(7))?;
        assert_eq!(noisy.len(), cloud.len());

        let n = cloud.len() as f64;
        for d in 0..3 {
            let diffs = noisy
                .points()
                .iter()
                .zip(cloud.points())
                .map(|(a, b)| a[d] - b[d])
                .collect::<Vec<_>>();
            let mean = diffs.iter().sum::<f64>() / n;
            let var = diffs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);

            assert!(mean.abs() < 4.0 * sigma / n.sqrt(), "mean {mean}");
            assert_relative_eq!(var.sqrt(), sigma, max_relative = 0.05);
        }
        Ok(())
    }

    #[test]
    fn test_noise_seeded_is_deterministic() -> Result<(), NoiseError> {
        let cloud = grid_cloud(100);
        let a = add_noise(&cloud, 0.01, Some(3))?;
        let b = add_noise(&cloud, 0.01, Some(3))?;
        let c = add_noise(&cloud, 0.01, Some(4))?;
        assert_eq!(a, b);
        assert_ne!(a, c);
        Ok(())
    }

    #[test]
    fn test_noise_zero_sigma() -> Result<(), NoiseError> {
        let cloud = grid_cloud(10);
        let noisy = add_noise(&cloud, 0.0, None)?;
        assert_eq!(noisy, cloud);
        Ok(())
    }

    #[test]
    fn test_noise_invalid_sigma() {
        let cloud = grid_cloud(10);
        assert_eq!(
            add_noise(&cloud, -1.0, Some(0)),
            Err(NoiseError::InvalidSigma(-1.0))
        );
        assert!(add_noise(&cloud, f64::NAN, Some(0)).is_err());
    }

    #[test]
    fn test_noise_empty_cloud() {
        assert_eq!(
            add_noise(&PointCloud::default(), 0.01, Some(0)),
            Err(NoiseError::EmptyData)
        );
    }
}
