// src/config/mod.rs
//! Service configuration: TOML file + environment overrides.
//!
//! Lookup order:
//! 1. `SCORING_CONFIG_PATH` or `config/scoring.toml` (missing file → defaults)
//! 2. env overrides (`SCORING_CONFIDENCE_LEVEL`, `SCORING_EFFECTIVE_SAMPLE_SIZE`,
//!    `MODEL_SERVER_URL`, `SIGNAL_TEST_MODE=mock`)
//! 3. validation; an invalid value is an error, never silently replaced

use serde::Deserialize;
use std::{fs, io, path::Path, path::PathBuf};
use tracing::info;

use crate::error::ConfigError;
use crate::fusion::{ConfidenceLevel, FusionParams, FusionWeights, EFFECTIVE_SAMPLE_SIZE};

// --- env defaults & names ---
pub const DEFAULT_SCORING_CONFIG_PATH: &str = "config/scoring.toml";

pub const ENV_SCORING_CONFIG_PATH: &str = "SCORING_CONFIG_PATH";
pub const ENV_CONFIDENCE_LEVEL: &str = "SCORING_CONFIDENCE_LEVEL";
pub const ENV_EFFECTIVE_SAMPLE_SIZE: &str = "SCORING_EFFECTIVE_SAMPLE_SIZE";
pub const ENV_MODEL_SERVER_URL: &str = "MODEL_SERVER_URL";
pub const ENV_SIGNAL_TEST_MODE: &str = "SIGNAL_TEST_MODE";

fn default_timeout_secs() -> u64 {
    10
}
fn default_max_image_bytes() -> u64 {
    10 * 1024 * 1024
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FusionSection {
    /// 0.90, 0.95 or 0.99
    pub confidence_level: ConfidenceLevel,
    pub effective_sample_size: u32,
}

impl Default for FusionSection {
    fn default() -> Self {
        Self {
            confidence_level: ConfidenceLevel::default(),
            effective_sample_size: EFFECTIVE_SAMPLE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CollaboratorConfig {
    /// Base URL of the model server; `None` → alignment/audience/faces fall back.
    #[serde(default)]
    pub model_server_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
    /// Serve every capability from the deterministic mock.
    #[serde(default)]
    pub test_mode: bool,
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            model_server_url: None,
            timeout_secs: default_timeout_secs(),
            max_image_bytes: default_max_image_bytes(),
            test_mode: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub fusion: FusionSection,
    pub weights: FusionWeights,
    pub collaborators: CollaboratorConfig,
}

impl ScoringConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: ScoringConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match fs::read_to_string(path.as_ref()) {
            Ok(s) => Self::from_toml_str(&s),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::Read(e)),
        }
    }

    /// File (path from env or default) plus env overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(ENV_SCORING_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SCORING_CONFIG_PATH));
        let mut cfg = Self::load_from_file(&path)?;
        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        info!(
            path = %path.display(),
            confidence = cfg.fusion.confidence_level.probability(),
            n_eff = cfg.fusion.effective_sample_size,
            model_server = cfg.collaborators.model_server_url.is_some(),
            test_mode = cfg.collaborators.test_mode,
            "scoring config loaded"
        );
        Ok(cfg)
    }

    /// Apply overrides from a key → value lookup (env in production).
    pub fn apply_overrides<F>(&mut self, get: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = get(ENV_CONFIDENCE_LEVEL) {
            self.fusion.confidence_level = raw.parse()?;
        }
        if let Some(raw) = get(ENV_EFFECTIVE_SAMPLE_SIZE) {
            self.fusion.effective_sample_size = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{ENV_EFFECTIVE_SAMPLE_SIZE}={raw:?} is not a count"))
            })?;
        }
        if let Some(url) = get(ENV_MODEL_SERVER_URL) {
            let url = url.trim();
            self.collaborators.model_server_url = (!url.is_empty()).then(|| url.to_string());
        }
        if let Some(mode) = get(ENV_SIGNAL_TEST_MODE) {
            self.collaborators.test_mode = mode.trim().eq_ignore_ascii_case("mock");
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        if self.fusion.effective_sample_size == 0 {
            return Err(ConfigError::Invalid(
                "effective_sample_size must be at least 1".to_string(),
            ));
        }
        if self.collaborators.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "collaborators.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn fusion_params(&self) -> FusionParams {
        FusionParams {
            confidence: self.fusion.confidence_level,
            effective_sample_size: self.fusion.effective_sample_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FusionError;
    use std::collections::HashMap;

    #[test]
    fn empty_document_is_default() {
        let cfg = ScoringConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, ScoringConfig::default());
        assert_eq!(cfg.fusion_params(), FusionParams::default());
        assert_eq!(cfg.weights, FusionWeights::DEFAULT);
    }

    #[test]
    fn parses_all_sections() {
        let cfg = ScoringConfig::from_toml_str(
            r#"
            [fusion]
            confidence_level = 0.99
            effective_sample_size = 50

            [weights]
            clip_similarity = 0.25
            sentiment = 0.20

            [collaborators]
            model_server_url = "http://models:8000"
            timeout_secs = 3
            "#,
        )
        .unwrap();
        assert_eq!(cfg.fusion.confidence_level, ConfidenceLevel::P99);
        assert_eq!(cfg.fusion.effective_sample_size, 50);
        assert_eq!(cfg.weights.clip_similarity, 0.25);
        assert_eq!(cfg.collaborators.model_server_url.as_deref(), Some("http://models:8000"));
        assert_eq!(cfg.collaborators.timeout_secs, 3);
        assert_eq!(cfg.collaborators.max_image_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn unknown_confidence_level_is_rejected() {
        let err = ScoringConfig::from_toml_str("[fusion]\nconfidence_level = 0.8").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err}");
    }

    #[test]
    fn weights_must_sum_to_one() {
        let err = ScoringConfig::from_toml_str("[weights]\nclip_similarity = 0.9").unwrap_err();
        assert!(
            matches!(err, ConfigError::Fusion(FusionError::WeightSum { .. })),
            "{err}"
        );
    }

    #[test]
    fn zero_sample_size_is_rejected() {
        let err =
            ScoringConfig::from_toml_str("[fusion]\neffective_sample_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn overrides_win_over_file() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_CONFIDENCE_LEVEL, "0.90"),
            (ENV_EFFECTIVE_SAMPLE_SIZE, "120"),
            (ENV_MODEL_SERVER_URL, " http://gpu-box:9000 "),
            (ENV_SIGNAL_TEST_MODE, "MOCK"),
        ]);
        let mut cfg = ScoringConfig::default();
        cfg.apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(cfg.fusion.confidence_level, ConfidenceLevel::P90);
        assert_eq!(cfg.fusion.effective_sample_size, 120);
        assert_eq!(cfg.collaborators.model_server_url.as_deref(), Some("http://gpu-box:9000"));
        assert!(cfg.collaborators.test_mode);
    }

    #[test]
    fn bad_override_is_an_error() {
        let mut cfg = ScoringConfig::default();
        let err = cfg
            .apply_overrides(|k| (k == ENV_CONFIDENCE_LEVEL).then(|| "0.5".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Fusion(FusionError::InvalidConfidenceLevel(_))
        ));

        let err = cfg
            .apply_overrides(|k| (k == ENV_CONFIDENCE_LEVEL).then(|| "high".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Fusion(FusionError::UnparsableConfidenceLevel(ref raw)) if raw == "high"
        ));

        let err = cfg
            .apply_overrides(|k| (k == ENV_EFFECTIVE_SAMPLE_SIZE).then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = ScoringConfig::load_from_file("does/not/exist/scoring.toml").unwrap();
        assert_eq!(cfg, ScoringConfig::default());
    }
}
