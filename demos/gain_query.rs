//! Information gain query on a synthetic scene.
//!
//! Builds a labeled cloud of a wall with a salient patch, scores a fan of
//! candidate poses with a single-shot request, then inserts the same cloud
//! into the persistent map and ranks the motion-primitive library.
//!
//! Usage:
//!   cargo run --example gain_query
//!   cargo run --example gain_query -- --poses 24 --distance 3.0
//!
//! Enable debug logging to see per-stage statistics:
//!   RUST_LOG=debug cargo run --example gain_query

use clap::Parser;
use nalgebra::Vector3;
use std::path::Path;
use std::time::Instant;

use drishti::server::ViewingRecord;
use drishti::{
    DrishtiConfig, GainServer, InfoGainRequest, LabeledPointCloud, Pose6D, PrimitiveLibrary,
};

/// Synthetic information gain query
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "configs/config.yaml")]
    config: String,

    /// Number of candidate poses in the fan
    #[arg(short, long, default_value = "12")]
    poses: usize,

    /// Distance from the sensor to the wall (meters)
    #[arg(short, long, default_value = "2.5")]
    distance: f32,

    /// Half-width of the wall (meters)
    #[arg(long, default_value = "1.5")]
    half_width: f32,

    /// Lateral offset of the salient patch (meters)
    #[arg(long, default_value = "0.6")]
    patch_offset: f32,
}

/// Wall at `distance` with a salient square patch centered at `patch_y`.
fn synthetic_wall(distance: f32, half_width: f32, patch_y: f32) -> LabeledPointCloud {
    let spacing = 0.04;
    let steps = (2.0 * half_width / spacing) as i32;
    let mut cloud = LabeledPointCloud::default();
    for iy in 0..=steps {
        let y = -half_width + iy as f32 * spacing;
        for iz in 0..=steps {
            let z = -half_width + iz as f32 * spacing;
            let salient = (y - patch_y).abs() < 0.25 && z.abs() < 0.25;
            cloud.push(Vector3::new(distance, y, z), if salient { 0.95 } else { 0.05 });
        }
    }
    cloud
}

/// Candidate poses on a yaw fan around the sensor.
fn yaw_fan(n: usize) -> Vec<f32> {
    (0..n)
        .flat_map(|i| {
            let yaw = -0.8 + 1.6 * i as f32 / (n.max(2) - 1) as f32;
            [0.0, 0.0, 0.0, 0.0, 0.0, yaw]
        })
        .collect()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config_path = Path::new(&args.config);
    let config = if config_path.exists() {
        DrishtiConfig::load(config_path).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {}, using defaults", e);
            DrishtiConfig::default()
        })
    } else {
        println!("Config not found, using defaults");
        DrishtiConfig::default()
    };

    let mut server = match GainServer::from_config(&config) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let cloud = synthetic_wall(args.distance, args.half_width, args.patch_offset);
    println!(
        "Scene: {} points, wall at {:.2} m, patch at y = {:.2} m",
        cloud.len(),
        args.distance,
        args.patch_offset
    );

    // Single-shot query over the fan
    let poses = yaw_fan(args.poses);
    let request = InfoGainRequest::new(cloud.clone(), poses.clone());
    let start = Instant::now();
    let gains = match server.calc_info_gain(&request) {
        Ok(gains) => gains,
        Err(e) => {
            eprintln!("Query failed: {}", e);
            std::process::exit(1);
        }
    };
    println!(
        "\nSingle-shot gains ({:.1} ms):",
        start.elapsed().as_secs_f64() * 1000.0
    );
    for (i, gain) in gains.iter().enumerate() {
        println!("  yaw {:+6.1}°  gain {:.4}", poses[i * 6 + 5].to_degrees(), gain);
    }

    // Persistent map, then rank the library from the sensor pose
    if let Err(e) = server.insert_pointcloud_with_interestingness(&cloud, &Pose6D::identity()) {
        eprintln!("Insert failed: {}", e);
        std::process::exit(1);
    }
    let stats = server.diffuse();
    println!(
        "\nPersistent map: {} voxels allocated, diffusion touched {} voxels",
        server.map().len(),
        stats.updated
    );

    let start = Instant::now();
    let library_gains = match server.baseline_info_gain(&[0.0; 6]) {
        Ok(gains) => gains,
        Err(e) => {
            eprintln!("Baseline failed: {}", e);
            std::process::exit(1);
        }
    };
    println!(
        "Scored {} primitives in {:.1} ms",
        library_gains.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    if let Some(best) = PrimitiveLibrary::best(&library_gains) {
        if let Some(primitive) = server.library().get(best) {
            let end = primitive.states.last().map(|s| s.position);
            println!(
                "Best primitive #{}: speed {:.2} m/s, vertical {:+.2} m/s, yaw {:+.1}°, gain {:.4}",
                best,
                primitive.action.forward_speed,
                primitive.action.vertical_rate,
                primitive.action.yaw_command.to_degrees(),
                library_gains[best]
            );
            if let Some(end) = end {
                println!("  ends at ({:.2}, {:.2}, {:.2})", end.x, end.y, end.z);
            }
        }
    }

    let mut records: Vec<ViewingRecord> = Vec::new();
    match server.export_viewing_diagnostics(&mut records) {
        Ok(n) => {
            let closest = records
                .iter()
                .map(|r| r.viewing_dist)
                .fold(f32::INFINITY, f32::min);
            println!("\n{} seeded voxels, closest view {:.2} m", n, closest);
        }
        Err(e) => eprintln!("Diagnostics export failed: {}", e),
    }
}
