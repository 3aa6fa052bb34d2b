// src/fusion/mod.rs
//! Score fusion: normalized signals in, one calibrated score out.

pub mod bucket;
pub mod confidence;
pub mod engine;
pub mod explain;
pub mod signals;
pub mod weights;

// Re-export convenient types.
pub use crate::fusion::bucket::Bucket;
pub use crate::fusion::confidence::{ConfidenceInterval, ConfidenceLevel, EFFECTIVE_SAMPLE_SIZE};
pub use crate::fusion::engine::{
    fuse, FusedResult, FusionInput, FusionParams, ImageSummary, PostFacts,
};
pub use crate::fusion::signals::Signals;
pub use crate::fusion::weights::FusionWeights;
