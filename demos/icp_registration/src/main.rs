use argh::FromArgs;
use std::path::PathBuf;

use scanalign_3d::{noise, pointcloud::PointCloud, transforms};
use scanalign_icp as sicp;

mod config;

#[derive(FromArgs)]
/// Register a synthetic scan against a rotated, noisy copy of itself
struct Args {
    /// path to a JSON file with the ICP parameters
    #[argh(option)]
    config: Option<PathBuf>,

    /// number of points sampled on the synthetic surface
    #[argh(option, default = "5000")]
    num_points: usize,

    /// sample every n-th point of the fixed scan
    #[argh(option)]
    stride: Option<usize>,

    /// maximum number of ICP rounds
    #[argh(option)]
    max_iterations: Option<usize>,

    /// stopping policy: plateau or small
    #[argh(option)]
    policy: Option<String>,

    /// squared distance above which matches are rejected
    #[argh(option)]
    max_distance_sq: Option<f64>,

    /// standard deviation of the noise added to the moving scan
    #[argh(option, default = "0.0")]
    noise: f64,

    /// rotation of the moving scan about x, in degrees
    #[argh(option, default = "0.0")]
    rot_x: f64,

    /// rotation of the moving scan about y, in degrees
    #[argh(option, default = "5.0")]
    rot_y: f64,

    /// rotation of the moving scan about z, in degrees
    #[argh(option, default = "0.0")]
    rot_z: f64,

    /// keep only the overlapping halves of the two scans
    #[argh(switch)]
    partial: bool,

    /// seed for the noise generator
    #[argh(option)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut params = match &args.config {
        Some(path) => config::load_params(path)?,
        None => sicp::IcpParams::default(),
    };
    if let Some(stride) = args.stride {
        params.stride = stride;
    }
    if let Some(max_iterations) = args.max_iterations {
        params.max_iterations = max_iterations;
    }
    if let Some(policy) = &args.policy {
        params.stopping_policy = config::parse_policy(policy)?;
    }
    if let Some(max_distance_sq) = args.max_distance_sq {
        params.max_correspondence_distance_sq = max_distance_sq;
    } else if args.partial && args.config.is_none() {
        // samples outside the shared band must not pull the scans apart
        params.max_correspondence_distance_sq = PARTIAL_MAX_DISTANCE_SQ;
    }
    log::info!("ICP parameters: {:?}", params);

    let scan = bumpy_ellipsoid(args.num_points);
    println!("Scan: #{} points", scan.len());

    // NOTE: the rotation utility works in radians
    let (rx, ry, rz) = (
        args.rot_x.to_radians(),
        args.rot_y.to_radians(),
        args.rot_z.to_radians(),
    );
    let (fixed, rotated) = transforms::rotate(&scan, rx, ry, rz)?;
    let ground_truth = sicp::RigidTransform {
        rotation: transforms::euler_to_rotation_matrix(rx, ry, rz),
        translation: [0.0; 3],
    };

    let moving = if args.noise > 0.0 {
        noise::add_noise(&rotated, args.noise, args.seed)?
    } else {
        rotated
    };

    let (fixed, moving) = if args.partial {
        crop_overlap(&fixed, &moving, OVERLAP_BAND)
    } else {
        (fixed, moving)
    };
    println!("Fixed: #{} points, moving: #{} points", fixed.len(), moving.len());

    let now = std::time::Instant::now();
    let result = sicp::icp_point_to_point(&fixed, &moving, &params)?;
    let elapsed = now.elapsed();

    println!("Iterations: {}", result.num_iterations);
    println!("Stopping policy fired: {}", result.converged);
    println!("End distance: {}", result.residual);
    println!(
        "Correspondences: {} of {} sampled",
        result.num_correspondences,
        fixed.len().div_ceil(params.stride)
    );
    println!("Processing time: {:?}", elapsed);
    println!("Rotation: {:?}", result.transform.rotation);
    println!("Translation: {:?}", result.transform.translation);

    let error = ground_truth.compose(&result.transform);
    println!(
        "Rotation error: {:.4} deg, translation error: {:.2e}",
        error.rotation_angle().to_degrees(),
        error.translation_norm()
    );
    if !result.converged {
        log::warn!(
            "Stopping policy did not fire within {} iterations, the registration may be wrong",
            params.max_iterations
        );
    }

    let merged = result.aligned.merge(&fixed);
    println!("Merged scan: #{} points", merged.len());

    Ok(())
}

/// Half width of the band shared by the two crops of `--partial`.
const OVERLAP_BAND: f64 = 0.3;

/// Acceptance used with `--partial` unless set explicitly.
const PARTIAL_MAX_DISTANCE_SQ: f64 = 0.0025;

/// Sample an ellipsoid covered with bumps, so the surface has no rotational
/// symmetry and enough local relief to lock the matches.
fn bumpy_ellipsoid(num_points: usize) -> PointCloud {
    let golden_angle = std::f64::consts::PI * (3.0 - 5f64.sqrt());
    let n = num_points.max(1) as f64;

    let points = (0..num_points)
        .map(|i| {
            let y = 1.0 - 2.0 * (i as f64 + 0.5) / n;
            let r = (1.0 - y * y).sqrt();
            let theta = golden_angle * i as f64;
            let (x, z) = (theta.cos() * r, theta.sin() * r);
            let bump =
                1.0 + 0.25 * (12.0 * x + 0.5).sin() * (8.4 * z).cos() * (6.0 * y + 0.3).cos();
            [0.5 * bump * x, 0.4 * bump * y, 0.3 * bump * z]
        })
        .collect();

    PointCloud::new(points)
}

/// Split two row paired scans into partially overlapping views, the way two
/// scans of one object only share a band of surface.
///
/// Both crops are decided on the fixed coordinates: the fixed view keeps
/// `x <= band`, the moving view keeps the rows with `x >= -band`.
fn crop_overlap(fixed: &PointCloud, moving: &PointCloud, band: f64) -> (PointCloud, PointCloud) {
    let (mut left, mut right) = (Vec::new(), Vec::new());
    for (f, m) in fixed.points().iter().zip(moving.points()) {
        if f[0] <= band {
            left.push(*f);
        }
        if f[0] >= -band {
            right.push(*m);
        }
    }
    (PointCloud::new(left), PointCloud::new(right))
}
