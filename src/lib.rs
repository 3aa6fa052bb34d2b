// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod fusion;
pub mod metrics;
pub mod pipeline;
pub mod request;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, router, AppState};
pub use crate::config::ScoringConfig;
pub use crate::error::{ConfigError, FusionError, SignalError};
pub use crate::fusion::{fuse, Bucket, ConfidenceLevel, FusedResult, FusionInput, FusionParams};
pub use crate::pipeline::{AnalysisReport, PostAnalyzer};
