//! Application configuration loaded from a JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wellnest_logic::config::{
    validate_hydration_config, validate_tracker_config, ConfigError, HydrationConfig,
    TrackerConfig,
};

/// What to do when stored tracker state cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadPolicy {
    /// Surface the error to the caller.
    #[default]
    Strict,
    /// Log a warning and continue with empty state.
    ResetOnCorrupt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory backing [`crate::persistence::FileStorage`].
    pub data_dir: PathBuf,
    pub load_policy: LoadPolicy,
    /// Seed for the arcade and puzzle games; entropy when absent.
    pub seed: Option<u64>,
    pub tracker: TrackerConfig,
    pub hydration: HydrationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("wellnest-data"),
            load_policy: LoadPolicy::default(),
            seed: None,
            tracker: TrackerConfig::default(),
            hydration: HydrationConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {}", join_errors(.0))]
    Invalid(Vec<ConfigError>),
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl AppConfig {
    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, AppConfigError> {
        let config: AppConfig = serde_json::from_str(text)?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(AppConfigError::Invalid(errors))
        }
    }

    pub fn load(path: &Path) -> Result<Self, AppConfigError> {
        let text = fs::read_to_string(path).map_err(|source| AppConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = validate_tracker_config(&self.tracker);
        errors.extend(validate_hydration_config(&self.hydration));
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_partial_override() {
        let config = AppConfig::from_json(
            r#"{"load_policy": "reset-on-corrupt", "seed": 42, "hydration": {"decay_per_frame": 0.0}}"#,
        )
        .unwrap();
        assert_eq!(config.load_policy, LoadPolicy::ResetOnCorrupt);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.hydration.decay_per_frame, 0.0);
        assert_eq!(config.hydration.drop_interval_ms, 1500);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = AppConfig::from_json(r#"{"tracker": {"default_cycle_length": 0}}"#).unwrap_err();
        match err {
            AppConfigError::Invalid(errors) => {
                assert_eq!(errors, vec![ConfigError::CycleLengthOutOfRange(0)]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wellnest.json");
        fs::write(&path, r#"{"data_dir": "/tmp/wellnest"}"#).unwrap();
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/wellnest"));

        assert!(matches!(
            AppConfig::load(&dir.path().join("missing.json")),
            Err(AppConfigError::Read { .. })
        ));
    }
}
