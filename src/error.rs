//! Error types for the scoring service.
//!
//! Fusion itself has no fatal path; these enums cover the edges around it:
//! collaborators that could not produce a signal, confidence levels outside
//! the supported set, and configuration that fails validation.

use thiserror::Error;

/// An upstream collaborator failed to produce its signal.
///
/// Never propagated into fusion: the pipeline logs it and substitutes the
/// signal's fallback value.
#[derive(Error, Debug)]
pub enum SignalError {
    /// No implementation is configured for this capability
    #[error("{collaborator} is unavailable")]
    Unavailable { collaborator: &'static str },

    /// The collaborator had nothing to score (e.g. empty caption)
    #[error("{collaborator} received no input")]
    NoInput { collaborator: &'static str },

    /// Transport-level failure talking to a remote collaborator
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The image bytes could not be decoded
    #[error("Image decode failed: {0}")]
    Decode(String),

    /// The image exceeded the configured download limit
    #[error("Image too large: {size_bytes} bytes > {max_bytes} bytes")]
    TooLarge { size_bytes: u64, max_bytes: u64 },

    /// A remote collaborator answered with something we cannot use
    #[error("Invalid response from {collaborator}: {message}")]
    InvalidResponse {
        collaborator: &'static str,
        message: String,
    },
}

/// Errors raised at the numeric boundary of the fusion engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FusionError {
    /// Only 0.90, 0.95 and 0.99 have a z-score.
    #[error("Unsupported confidence level {0} (expected 0.90, 0.95 or 0.99)")]
    InvalidConfidenceLevel(f64),

    /// Text that should have been a confidence level is not a number.
    #[error("Confidence level {0:?} is not a number (expected 0.90, 0.95 or 0.99)")]
    UnparsableConfidenceLevel(String),

    /// An alternate weight scheme does not sum to 1.0.
    #[error("Fusion weights must sum to 1.0, got {sum}")]
    WeightSum { sum: f64 },

    /// A single weight lies outside [0,1].
    #[error("Fusion weight `{name}` must be within [0,1], got {value}")]
    WeightRange { name: &'static str, value: f64 },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Fusion settings are invalid
    #[error("Invalid fusion settings: {0}")]
    Fusion(#[from] FusionError),

    /// Any other invalid value (env overrides, limits)
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
