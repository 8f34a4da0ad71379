//! Error types for gain queries.

use thiserror::Error;

use crate::config::ConfigLoadError;

/// Errors returned by gain queries.
///
/// Every variant is raised before any map or query state is touched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GainError {
    #[error("candidate pose buffer length {len} is not a multiple of 6")]
    MalformedPoses { len: usize },

    #[error("robot pose must have 6 values, got {len}")]
    MalformedRobotPose { len: usize },

    #[error("point cloud has {points} points but {labels} interestingness labels")]
    MismatchedCloud { points: usize, labels: usize },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigLoadError),
}

pub type Result<T> = std::result::Result<T, GainError>;
