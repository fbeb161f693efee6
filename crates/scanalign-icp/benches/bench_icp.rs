use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;

use scanalign_3d::{pointcloud::PointCloud, transforms::euler_to_rotation_matrix};
use scanalign_icp::{icp_round, IcpParams, RigidTransform, SpatialIndex};

fn create_random_cloud(num_points: usize) -> PointCloud {
    let mut rng = StdRng::seed_from_u64(0);
    PointCloud::new(
        (0..num_points)
            .map(|_| [rng.random::<f64>(), rng.random::<f64>(), rng.random::<f64>()])
            .collect(),
    )
}

fn bench_icp(c: &mut Criterion) {
    let mut group = c.benchmark_group("icp");

    for num_points in [1000, 10000, 50000].iter() {
        group.throughput(criterion::Throughput::Elements(*num_points as u64));
        let parameter_string = format!("{}", num_points);

        let fixed = create_random_cloud(*num_points);
        let moving = RigidTransform {
            rotation: euler_to_rotation_matrix(0.01, 0.0, -0.01),
            translation: [0.005, 0.0, 0.0],
        }
        .apply(&fixed);

        group.bench_with_input(
            BenchmarkId::new("build_index", &parameter_string),
            &fixed,
            |b, fixed| b.iter(|| black_box(SpatialIndex::build(fixed).ok())),
        );

        for stride in [1, 4] {
            let params = IcpParams {
                stride,
                ..Default::default()
            };
            group.bench_with_input(
                BenchmarkId::new(format!("icp_round_stride_{stride}"), &parameter_string),
                &(&fixed, &moving),
                |b, (fixed, moving)| b.iter(|| black_box(icp_round(fixed, moving, &params).ok())),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_icp);
criterion_main!(benches);
