//! Confidence interval around the fused score.
//!
//! Each signal is treated as an estimate of a proportion backed by
//! `n_eff` observations. The fused score is a weighted sum, so its variance
//! is `Σ w_i² · v_i(1-v_i) / (n_eff + 3)`. The `+3` keeps the estimate
//! finite and non-zero near 0 and 1.
//!
//! `n_eff` is the same for every signal. Face count is exact while sentiment
//! is itself a model estimate, so this is a simplification; it is kept as a
//! single named constant rather than guessed per signal.

use serde::{Deserialize, Serialize};

use super::signals::clamp01;
use crate::error::FusionError;

/// Assumed evidence count behind each signal.
pub const EFFECTIVE_SAMPLE_SIZE: u32 = 30;

/// Float slack when matching a numeric level (text parsing noise).
const LEVEL_TOLERANCE: f64 = 1e-9;

/// Supported two-sided confidence levels. Anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum ConfidenceLevel {
    P90,
    #[default]
    P95,
    P99,
}

impl ConfidenceLevel {
    pub const ALL: [ConfidenceLevel; 3] =
        [ConfidenceLevel::P90, ConfidenceLevel::P95, ConfidenceLevel::P99];

    pub fn probability(self) -> f64 {
        match self {
            ConfidenceLevel::P90 => 0.90,
            ConfidenceLevel::P95 => 0.95,
            ConfidenceLevel::P99 => 0.99,
        }
    }

    /// Two-sided z-score.
    pub fn z(self) -> f64 {
        match self {
            ConfidenceLevel::P90 => 1.645,
            ConfidenceLevel::P95 => 1.96,
            ConfidenceLevel::P99 => 2.576,
        }
    }
}

impl TryFrom<f64> for ConfidenceLevel {
    type Error = FusionError;

    fn try_from(p: f64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|level| (level.probability() - p).abs() <= LEVEL_TOLERANCE)
            .ok_or(FusionError::InvalidConfidenceLevel(p))
    }
}

impl From<ConfidenceLevel> for f64 {
    fn from(level: ConfidenceLevel) -> f64 {
        level.probability()
    }
}

impl std::str::FromStr for ConfidenceLevel {
    type Err = FusionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let p: f64 = s
            .parse()
            .map_err(|_| FusionError::UnparsableConfidenceLevel(s.to_string()))?;
        Self::try_from(p)
    }
}

/// Interval bounds in percent, serialized as `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct ConfidenceInterval {
    pub low: f64,
    pub high: f64,
}

impl ConfidenceInterval {
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    pub fn contains(&self, score: f64) -> bool {
        self.low <= score && score <= self.high
    }
}

impl From<[f64; 2]> for ConfidenceInterval {
    fn from([low, high]: [f64; 2]) -> Self {
        Self { low, high }
    }
}

impl From<ConfidenceInterval> for [f64; 2] {
    fn from(ci: ConfidenceInterval) -> Self {
        [ci.low, ci.high]
    }
}

/// Standard error of the weighted sum for `(value, weight)` components.
pub fn standard_error(components: &[(f64, f64)], n_eff: u32) -> f64 {
    let n = n_eff.max(1) as f64;
    let variance: f64 = components
        .iter()
        .map(|&(v, w)| {
            let v = clamp01(v);
            w * w * (v * (1.0 - v)) / (n + 3.0)
        })
        .sum();
    variance.max(0.0).sqrt()
}

/// Interval around `raw` (a [0,1] score) in percent, rounded to 1 decimal.
pub fn confidence_interval(
    raw: f64,
    components: &[(f64, f64)],
    level: ConfidenceLevel,
    n_eff: u32,
) -> ConfidenceInterval {
    let raw = clamp01(raw);
    let margin = level.z() * standard_error(components, n_eff);
    let low = clamp01(raw - margin);
    let high = clamp01(raw + margin);
    ConfidenceInterval {
        low: to_percent(low),
        high: to_percent(high),
    }
}

/// [0,1] to percent with one decimal.
///
/// Rounds the exact decimal value of `x * 100` (ties to even), so
/// `62.449999…` stays 62.4 instead of being pushed up by an extra scaling.
pub fn to_percent(x: f64) -> f64 {
    let pct = x * 100.0;
    format!("{pct:.1}").parse().unwrap_or(pct)
}
