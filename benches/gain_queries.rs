//! Benchmark information gain queries.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use drishti::sensor::FrustumConfig;
use drishti::{GainServer, InfoGainRequest, LabeledPointCloud, Pose6D, ServerConfig};
use nalgebra::Vector3;

/// Box room seen from its center: floor, ceiling and the far wall, with a
/// salient patch in the middle of the wall.
fn room_cloud(depth: f32, half_width: f32, spacing: f32) -> LabeledPointCloud {
    let steps = (2.0 * half_width / spacing) as i32;
    let mut cloud = LabeledPointCloud::default();

    for iy in 0..=steps {
        let y = -half_width + iy as f32 * spacing;
        for iz in 0..=steps {
            let z = -half_width + iz as f32 * spacing;
            let label = if y.abs() < 0.3 && z.abs() < 0.3 { 0.9 } else { 0.1 };
            cloud.push(Vector3::new(depth, y, z), label);
        }
        for ix in 1..=(depth / spacing) as i32 {
            let x = ix as f32 * spacing;
            cloud.push(Vector3::new(x, y, -half_width), 0.0);
            cloud.push(Vector3::new(x, y, half_width), 0.0);
        }
    }
    cloud
}

/// Candidate poses on an arc facing the room.
fn arc_poses(n: usize) -> Vec<f32> {
    (0..n)
        .flat_map(|i| {
            let yaw = -0.6 + 1.2 * i as f32 / n.max(1) as f32;
            [0.0, 0.2 * yaw, 0.0, 0.0, 0.0, yaw]
        })
        .collect()
}

fn bench_single_shot(c: &mut Criterion) {
    let mut server = GainServer::new(ServerConfig::default());
    let request = InfoGainRequest::new(room_cloud(3.0, 1.5, 0.05), arc_poses(16));

    c.bench_function("calc_info_gain_16_poses", |b| {
        b.iter(|| {
            let gains = server.calc_info_gain(black_box(&request));
            black_box(gains)
        })
    });
}

fn bench_evaluate_resolutions(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_gain_resolution");

    for degrees in [10.0f32, 5.0, 2.5].iter() {
        let mut server = GainServer::new(ServerConfig {
            frustum: FrustumConfig {
                horizontal_resolution: degrees.to_radians(),
                vertical_resolution: degrees.to_radians(),
                ..Default::default()
            },
            ..Default::default()
        });
        let cloud = room_cloud(3.0, 1.5, 0.05);
        // Persistent insert keeps the map for repeated evaluation
        let _ = server.insert_pointcloud_with_interestingness(&cloud, &Pose6D::identity());
        server.diffuse();
        let pose = Pose6D::new(0.2, 0.0, 0.0, 0.0, 0.0, 0.1);

        group.bench_with_input(BenchmarkId::from_parameter(degrees), degrees, |b, _| {
            b.iter(|| {
                let gain = server.evaluate_gain(black_box(&pose));
                black_box(gain)
            })
        });
    }

    group.finish();
}

fn bench_baseline(c: &mut Criterion) {
    let mut server = GainServer::new(ServerConfig::default());
    let _ = server.insert_pointcloud_with_interestingness(&room_cloud(3.0, 1.5, 0.05), &Pose6D::identity());
    server.diffuse();
    let robot = [0.0f32; 6];

    c.bench_function("baseline_info_gain_256_primitives", |b| {
        b.iter(|| {
            let gains = server.baseline_info_gain(black_box(&robot));
            black_box(gains)
        })
    });
}

fn bench_persistent_insert(c: &mut Criterion) {
    let cloud = room_cloud(3.0, 1.5, 0.05);
    let mut server = GainServer::new(ServerConfig::default());

    c.bench_function("insert_pointcloud_room", |b| {
        b.iter(|| {
            server.clear();
            let report =
                server.insert_pointcloud_with_interestingness(black_box(&cloud), &Pose6D::identity());
            black_box(report)
        })
    });
}

criterion_group!(
    benches,
    bench_single_shot,
    bench_evaluate_resolutions,
    bench_baseline,
    bench_persistent_insert
);
criterion_main!(benches);
