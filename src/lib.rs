//! # Drishti
//!
//! Interestingness-weighted volumetric information gain for active sensing.
//!
//! ## Overview
//!
//! Given a sparse TSDF voxel map and a set of candidate camera poses, Drishti
//! scores each pose by the salience of the space it would reveal:
//!
//! - **Unknown** voxels and the first **Occupied** voxel along each ray earn
//!   `interestingness * exp(-k * d^2)`
//! - **Free** voxels are counted but earn nothing
//! - Rays stop at the first occupied voxel
//!
//! Salience starts at voxels hit by labeled points and diffuses breadth-first
//! into neighboring unexplored space with a per-hop decay.
//!
//! ## Features
//!
//! - **Frustum ray model**: cached angular grid of camera rays
//! - **Scan evaluation**: 3-D voxel traversal with occlusion and per-query dedup
//! - **Interestingness diffusion**: bounded BFS through unknown voxels
//! - **Motion-primitive library**: precomputed maneuvers for batch scoring
//! - **Gain server**: single-shot and persistent query paths
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use drishti::{GainServer, InfoGainRequest, LabeledPointCloud, ServerConfig};
//!
//! let mut server = GainServer::new(ServerConfig::default());
//!
//! let cloud = LabeledPointCloud::new(points, labels)?;
//! let request = InfoGainRequest::new(cloud, vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
//! let gains = server.calc_info_gain(&request)?;
//!
//! // Score the primitive library from the current robot pose
//! let library_gains = server.baseline_info_gain(&[0.0; 6])?;
//! ```
//!
//! ## Coordinate System
//!
//! Uses ROS REP-103 convention:
//! - X: Forward (camera optical axis)
//! - Y: Left
//! - Z: Up
//! - Orientation: `Rz(yaw) * Ry(pitch) * Rx(roll)`

// Core types
pub mod core;

// Error types
pub mod error;

// Unified configuration
pub mod config;

// Voxel storage, traversal and integration
pub mod map;

// Camera model and seed filtering
pub mod sensor;

// Gain evaluation
pub mod gain;

// Salience seeding and diffusion
pub mod interest;

// Motion-primitive library
pub mod motion;

// Query orchestration
pub mod server;

// Re-export commonly used types
pub use crate::core::{Connectivity, GridIndex, LabeledPointCloud, Pose6D, Voxel, VoxelStatus};

pub use config::{ConfigLoadError, DrishtiConfig};
pub use error::{GainError, Result};
pub use gain::{GainEvaluator, QueryScratch, VolumetricGain};
pub use interest::{DiffusionConfig, InterestDiffuser};
pub use map::{TsdfIntegrator, TsdfLayer, VoxelMap};
pub use motion::{PrimitiveLibrary, PrimitiveLibraryConfig};
pub use sensor::{FrustumConfig, FrustumModel};
pub use server::{DiagnosticsSink, GainServer, InfoGainRequest, ServerConfig, WriterSink};
