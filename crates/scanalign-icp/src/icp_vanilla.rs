use scanalign_3d::pointcloud::PointCloud;
use serde::{Deserialize, Serialize};

use crate::{
    find_correspondences, fit_transformation, IcpError, ReflectionHandling, RigidTransform,
};

/// Rule deciding when the caller-driven ICP loop stops.
///
/// Both rules are checked after the round's transform has been applied to the
/// moving cloud. The loop also stops after `max_iterations` rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoppingPolicy {
    /// Stop when the residual went up relative to the previous round and is
    /// below the tolerance.
    #[default]
    PlateauThenSmall,
    /// Stop as soon as the residual went up or is below the tolerance.
    SmallOrWorsening,
}

impl StoppingPolicy {
    /// Evaluate the rule for the current and previous round residuals.
    pub fn should_stop(&self, residual: f64, previous: f64, tolerance: f64) -> bool {
        match self {
            StoppingPolicy::PlateauThenSmall => residual > previous && residual < tolerance,
            StoppingPolicy::SmallOrWorsening => residual > previous || residual < tolerance,
        }
    }
}

/// Parameters of the point to point ICP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IcpParams {
    /// Sample every `stride`-th point of the fixed cloud.
    pub stride: usize,
    /// Maximum number of rounds run by [`icp_point_to_point`].
    pub max_iterations: usize,
    /// Matches with a squared distance at or above this value are discarded.
    pub max_correspondence_distance_sq: f64,
    /// Residual tolerance used by the stopping policy.
    pub tolerance: f64,
    /// Stopping rule.
    pub stopping_policy: StoppingPolicy,
    /// Reflection handling of the orientation solver.
    pub reflection: ReflectionHandling,
}

impl Default for IcpParams {
    fn default() -> Self {
        Self {
            stride: 1,
            max_iterations: 250,
            max_correspondence_distance_sq: 0.01,
            tolerance: 1e-4,
            stopping_policy: StoppingPolicy::PlateauThenSmall,
            reflection: ReflectionHandling::Correct,
        }
    }
}

/// Outcome of a single ICP round.
#[derive(Debug, Clone, PartialEq)]
pub struct IcpRound {
    /// Incremental transform that moves the moving cloud onto the fixed one.
    pub transform: RigidTransform,
    /// Mean squared correspondence distance measured before the transform.
    pub residual: f64,
    /// Number of accepted correspondences.
    pub num_correspondences: usize,
}

/// Run one ICP round between a fixed and a moving cloud.
///
/// The fixed cloud is sampled at `params.stride`, each sample is matched to
/// its nearest point in the moving cloud, and the returned transform maps the
/// matched moving points onto the fixed samples. The caller advances the loop
/// by applying the transform to the moving cloud.
///
/// # Errors
///
/// Propagates [`IcpError`] from the correspondence search and the solver.
pub fn icp_round(
    fixed: &PointCloud,
    moving: &PointCloud,
    params: &IcpParams,
) -> Result<IcpRound, IcpError> {
    let correspondences = find_correspondences(
        fixed,
        moving,
        params.stride,
        params.max_correspondence_distance_sq,
    )?;

    let transform = fit_transformation(
        &correspondences.source,
        &correspondences.target,
        params.reflection,
    )?;

    Ok(IcpRound {
        transform,
        residual: correspondences.residual,
        num_correspondences: correspondences.len(),
    })
}

/// Result of the ICP loop.
#[derive(Debug, Clone)]
pub struct IcpResult {
    /// Accumulated transform from the initial moving frame to the fixed frame.
    pub transform: RigidTransform,
    /// Residual of the last round.
    pub residual: f64,
    /// Residual of every round, in order.
    pub residuals: Vec<f64>,
    /// Number of correspondences accepted in the last round.
    pub num_correspondences: usize,
    /// The total number of rounds performed.
    pub num_iterations: usize,
    /// Whether the stopping policy fired before the iteration budget ran out.
    pub converged: bool,
    /// The moving cloud after the last applied round.
    pub aligned: PointCloud,
}

/// Iterative Closest Point using point to point distance.
///
/// Repeats [`icp_round`], applying each incremental transform to the moving
/// cloud, until `params.stopping_policy` fires or `params.max_iterations`
/// rounds have run.
///
/// # Arguments
///
/// * `fixed` - Cloud that stays in place.
/// * `moving` - Cloud that is moved onto `fixed`.
/// * `params` - Loop and matching parameters.
///
/// # Returns
///
/// The accumulated transform, final residual and aligned moving cloud.
pub fn icp_point_to_point(
    fixed: &PointCloud,
    moving: &PointCloud,
    params: &IcpParams,
) -> Result<IcpResult, IcpError> {
    let mut current = moving.clone();
    let mut transform = RigidTransform::identity();
    let mut residuals = Vec::new();
    let mut previous = f64::INFINITY;
    let mut num_correspondences = 0;
    let mut converged = false;

    for i in 0..params.max_iterations {
        log::debug!("Iteration: {}", i);
        let now = std::time::Instant::now();

        let round = icp_round(fixed, &current, params)?;

        log::debug!(
            "Num correspondences: {} residual: {}",
            round.num_correspondences,
            round.residual
        );

        current = round.transform.apply(&current);
        transform = transform.compose(&round.transform);
        residuals.push(round.residual);
        num_correspondences = round.num_correspondences;

        if params
            .stopping_policy
            .should_stop(round.residual, previous, params.tolerance)
        {
            log::debug!(
                "ICP converged in {} iterations with residual {}",
                i + 1,
                round.residual
            );
            converged = true;
            break;
        }
        previous = round.residual;

        log::debug!("elapsed: {:?}", now.elapsed());
    }

    Ok(IcpResult {
        transform,
        residual: residuals.last().copied().unwrap_or(f64::INFINITY),
        num_iterations: residuals.len(),
        residuals,
        num_correspondences,
        converged,
        aligned: current,
    })
}
