//! Precomputed motion-primitive library.
//!
//! Every primitive is a short forward simulation of the robot under a
//! constant command, built once and reused for every request:
//!
//! ```text
//!                 ψ_k = -h/2 ... +h/2 (yaw commands)
//!                   ╲   │   ╱
//!    robot ●─────────●──●──●────►  15 samples over a 5 s horizon
//!                   ╱   │   ╲
//!        el_j = -v/2 ... +v/2 (climb angles, vz = v tan el)
//! ```
//!
//! The commanded velocities reach the state through first-order low-pass
//! filters (`alpha_v` for linear rates, `alpha_psi` for heading), integrated
//! at `substeps` per sample.
//!
//! Entries are stored with forward speed outermost and yaw innermost:
//! `index = i * (num_vertical * num_yaw) + j * num_yaw + k`.

use log::info;
use nalgebra::{Rotation3, Vector3};

use crate::core::Pose6D;

/// Library construction parameters. Angles in radians.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimitiveLibraryConfig {
    /// Forward speed choices.
    pub num_forward: usize,
    /// Climb rate choices.
    pub num_vertical: usize,
    /// Heading command choices.
    pub num_yaw: usize,
    /// Slowest commanded forward speed (m/s).
    pub min_forward_speed: f32,
    /// Fastest commanded forward speed (m/s).
    pub max_forward_speed: f32,
    /// Forward speed at the start of every simulation (m/s).
    pub initial_forward_speed: f32,
    /// Heading commands span this angle.
    pub horizontal_fov: f32,
    /// Climb angles span this angle.
    pub vertical_fov: f32,
    /// Samples per primitive.
    pub timesteps: usize,
    /// Integration steps per sample.
    pub substeps: usize,
    /// Simulated duration (seconds).
    pub horizon: f32,
    /// Low-pass constant for forward and vertical speed.
    pub alpha_v: f32,
    /// Low-pass constant for heading.
    pub alpha_psi: f32,
}

impl Default for PrimitiveLibraryConfig {
    fn default() -> Self {
        Self {
            num_forward: 1,
            num_vertical: 8,
            num_yaw: 32,
            min_forward_speed: 0.75,
            max_forward_speed: 0.75,
            initial_forward_speed: 0.75,
            horizontal_fov: 87f32.to_radians(),
            vertical_fov: 58f32.to_radians(),
            timesteps: 15,
            substeps: 10,
            horizon: 5.0,
            alpha_v: 0.92,
            alpha_psi: 0.9293,
        }
    }
}

impl PrimitiveLibraryConfig {
    /// Total number of primitives.
    pub fn num_primitives(&self) -> usize {
        self.num_forward * self.num_vertical * self.num_yaw
    }

    /// Integration step (seconds).
    pub fn dt(&self) -> f64 {
        self.horizon as f64 / (self.substeps * self.timesteps).max(1) as f64
    }
}

/// Constant command held over a primitive.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlAction {
    /// Forward speed (m/s).
    pub forward_speed: f32,
    /// Vertical speed (m/s).
    pub vertical_rate: f32,
    /// Heading command (radians).
    pub yaw_command: f32,
}

/// One sampled state along a primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrimitiveState {
    /// Position.
    pub position: Vector3<f32>,
    /// Heading (radians).
    pub yaw: f32,
}

impl PrimitiveState {
    /// Camera pose at this state, level with the ground.
    pub fn pose(&self) -> Pose6D {
        Pose6D::from_position_yaw(self.position, self.yaw)
    }
}

/// A simulated maneuver.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionPrimitive {
    /// Command that produced it.
    pub action: ControlAction,
    /// One state per timestep.
    pub states: Vec<PrimitiveState>,
}

/// Table of primitives, read-only after construction.
#[derive(Clone, Debug)]
pub struct PrimitiveLibrary {
    config: PrimitiveLibraryConfig,
    primitives: Vec<MotionPrimitive>,
}

impl PrimitiveLibrary {
    /// Simulate every command combination.
    pub fn build(config: PrimitiveLibraryConfig) -> Self {
        let mut primitives = Vec::with_capacity(config.num_primitives());

        for i in 0..config.num_forward {
            let speed = spread(
                config.min_forward_speed,
                config.max_forward_speed,
                config.num_forward,
                i,
                config.max_forward_speed,
            );
            for j in 0..config.num_vertical {
                let half_v = config.vertical_fov / 2.0;
                let climb = spread(-half_v, half_v, config.num_vertical, j, 0.0);
                for k in 0..config.num_yaw {
                    let half_h = config.horizontal_fov / 2.0;
                    let action = ControlAction {
                        forward_speed: speed,
                        vertical_rate: speed * climb.tan(),
                        yaw_command: spread(-half_h, half_h, config.num_yaw, k, 0.0),
                    };
                    primitives.push(MotionPrimitive {
                        action,
                        states: simulate(&config, &action),
                    });
                }
            }
        }

        info!(
            "[Library] {} primitives ({} x {} x {}), {} samples each",
            primitives.len(),
            config.num_forward,
            config.num_vertical,
            config.num_yaw,
            config.timesteps
        );

        Self { config, primitives }
    }

    /// Flat index of a (forward, vertical, yaw) choice.
    #[inline]
    pub fn index_of(&self, forward: usize, vertical: usize, yaw: usize) -> usize {
        forward * self.config.num_vertical * self.config.num_yaw + vertical * self.config.num_yaw + yaw
    }

    /// Primitive at a flat index.
    pub fn get(&self, index: usize) -> Option<&MotionPrimitive> {
        self.primitives.get(index)
    }

    /// Iterate primitives in index order.
    pub fn iter(&self) -> impl Iterator<Item = &MotionPrimitive> {
        self.primitives.iter()
    }

    /// Number of primitives.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// True if the library is empty.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Construction parameters.
    pub fn config(&self) -> &PrimitiveLibraryConfig {
        &self.config
    }

    /// Copy of the library placed at `robot_pose`.
    ///
    /// Positions are rotated by the robot yaw and translated by its position;
    /// headings are offset by the robot yaw. Roll and pitch are ignored.
    pub fn transformed(&self, robot_pose: &Pose6D) -> PrimitiveLibrary {
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), robot_pose.yaw);
        let translation = robot_pose.position();

        let primitives = self
            .primitives
            .iter()
            .map(|p| MotionPrimitive {
                action: p.action,
                states: p
                    .states
                    .iter()
                    .map(|s| PrimitiveState {
                        position: rotation * s.position + translation,
                        yaw: robot_pose.yaw + s.yaw,
                    })
                    .collect(),
            })
            .collect();

        PrimitiveLibrary {
            config: self.config.clone(),
            primitives,
        }
    }

    /// Index of the highest gain, if any. Ties go to the lowest index.
    pub fn best(gains: &[f32]) -> Option<usize> {
        gains
            .iter()
            .enumerate()
            .filter(|(_, g)| g.is_finite())
            .fold(None, |best: Option<(usize, f32)>, (i, &g)| match best {
                Some((_, top)) if g <= top => best,
                _ => Some((i, g)),
            })
            .map(|(i, _)| i)
    }
}

impl Default for PrimitiveLibrary {
    fn default() -> Self {
        Self::build(PrimitiveLibraryConfig::default())
    }
}

/// Evenly spaced value `i` of `n` over `[lo, hi]`; `single` when `n == 1`.
fn spread(lo: f32, hi: f32, n: usize, i: usize, single: f32) -> f32 {
    if n <= 1 {
        single
    } else {
        lo + i as f32 * (hi - lo) / (n - 1) as f32
    }
}

fn simulate(config: &PrimitiveLibraryConfig, action: &ControlAction) -> Vec<PrimitiveState> {
    let dt = config.dt();
    let alpha_v = config.alpha_v as f64;
    let alpha_psi = config.alpha_psi as f64;
    let v_cmd = action.forward_speed as f64;
    let vz_cmd = action.vertical_rate as f64;
    let psi_cmd = action.yaw_command as f64;

    let mut v = config.initial_forward_speed as f64;
    let mut vz = 0.0f64;
    let mut psi = 0.0f64;
    let mut pos = Vector3::<f64>::zeros();

    let mut states = Vec::with_capacity(config.timesteps);
    for _ in 0..config.timesteps {
        for _ in 0..config.substeps {
            v = alpha_v * v + (1.0 - alpha_v) * v_cmd;
            vz = alpha_v * vz + (1.0 - alpha_v) * vz_cmd;
            psi = alpha_psi * psi + (1.0 - alpha_psi) * psi_cmd;
            pos += Vector3::new(v * psi.cos(), v * psi.sin(), vz) * dt;
        }
        states.push(PrimitiveState {
            position: pos.cast::<f32>(),
            yaw: psi as f32,
        });
    }
    states
}
