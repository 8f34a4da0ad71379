//! Volumetric gain: scan classification, accumulation and per-query scratch.

mod accumulator;
mod evaluator;
mod scan;
mod scratch;

pub use accumulator::VolumetricGain;
pub use evaluator::GainEvaluator;
pub use scan::{ScanEvaluator, ScanStatus};
pub use scratch::QueryScratch;
