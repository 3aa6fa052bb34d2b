// tests/config_env.rs
// Env-driven config loading. Serialized: these tests mutate process env.

use std::env;
use std::fs;
use std::path::PathBuf;

use post_quality_scorer::config::{
    ScoringConfig, ENV_CONFIDENCE_LEVEL, ENV_EFFECTIVE_SAMPLE_SIZE, ENV_MODEL_SERVER_URL,
    ENV_SCORING_CONFIG_PATH, ENV_SIGNAL_TEST_MODE,
};
use post_quality_scorer::fusion::ConfidenceLevel;
use post_quality_scorer::ConfigError;

const ALL_ENV: [&str; 5] = [
    ENV_SCORING_CONFIG_PATH,
    ENV_CONFIDENCE_LEVEL,
    ENV_EFFECTIVE_SAMPLE_SIZE,
    ENV_MODEL_SERVER_URL,
    ENV_SIGNAL_TEST_MODE,
];

fn clear_env() {
    for key in ALL_ENV {
        env::remove_var(key);
    }
}

fn write_tmp_config(name: &str, content: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("scoring_cfg_{}_{}", std::process::id(), name));
    fs::create_dir_all(&dir).expect("mkdir tmp");
    let path = dir.join("scoring.toml");
    fs::write(&path, content).expect("write config");
    path
}

#[serial_test::serial]
#[test]
fn file_then_env_overrides() {
    clear_env();
    let path = write_tmp_config(
        "overrides",
        "[fusion]\nconfidence_level = 0.99\neffective_sample_size = 40\n",
    );
    env::set_var(ENV_SCORING_CONFIG_PATH, &path);

    let cfg = ScoringConfig::from_env().expect("config from file");
    assert_eq!(cfg.fusion.confidence_level, ConfidenceLevel::P99);
    assert_eq!(cfg.fusion.effective_sample_size, 40);
    assert!(!cfg.collaborators.test_mode);

    env::set_var(ENV_CONFIDENCE_LEVEL, "0.90");
    env::set_var(ENV_SIGNAL_TEST_MODE, "mock");
    env::set_var(ENV_MODEL_SERVER_URL, "http://127.0.0.1:8000/");
    let cfg = ScoringConfig::from_env().expect("config with overrides");
    assert_eq!(cfg.fusion.confidence_level, ConfidenceLevel::P90);
    assert_eq!(cfg.fusion.effective_sample_size, 40);
    assert!(cfg.collaborators.test_mode);
    assert_eq!(
        cfg.collaborators.model_server_url.as_deref(),
        Some("http://127.0.0.1:8000/")
    );

    clear_env();
    let _ = fs::remove_file(path);
}

#[serial_test::serial]
#[test]
fn missing_file_uses_defaults() {
    clear_env();
    env::set_var(ENV_SCORING_CONFIG_PATH, "/nonexistent/dir/scoring.toml");
    let cfg = ScoringConfig::from_env().expect("defaults");
    assert_eq!(cfg, ScoringConfig::default());
    clear_env();
}

#[serial_test::serial]
#[test]
fn invalid_env_value_is_an_error() {
    clear_env();
    env::set_var(ENV_SCORING_CONFIG_PATH, "/nonexistent/dir/scoring.toml");
    env::set_var(ENV_CONFIDENCE_LEVEL, "0.42");
    let err = ScoringConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::Fusion(_)), "{err}");

    env::remove_var(ENV_CONFIDENCE_LEVEL);
    env::set_var(ENV_EFFECTIVE_SAMPLE_SIZE, "0");
    let err = ScoringConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
    clear_env();
}

#[serial_test::serial]
#[test]
fn shipped_config_file_is_valid() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/scoring.toml");
    let cfg = ScoringConfig::load_from_file(path).expect("shipped config parses");
    assert_eq!(cfg, ScoringConfig::default());
}
