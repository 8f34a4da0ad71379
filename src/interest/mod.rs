//! Salience seeding and diffusion.

mod diffusion;
mod seeding;

pub use diffusion::{DiffusionConfig, DiffusionStats, InterestDiffuser};
pub use seeding::{SeedLabeler, SeedReport};
