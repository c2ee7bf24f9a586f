//! # Configuration
//!
//! File system side of [`OrchestratorConfig`]: the `.archplan` runtime
//! directory and its `config.json`.
//!
//! The file holds a partial config. Fields it leaves out keep their
//! defaults, and command-line flags are merged on top by the caller.

use crate::models::CloudProvider;
use crate::swarm::OrchestratorConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Environment variable overriding the runtime directory
pub const RUNTIME_PATH_ENV: &str = "ARCHPLAN_RUNTIME_PATH";
pub const CONFIG_FILE: &str = "config.json";
pub const ENV_FILE: &str = ".env";

/// Get the runtime directory path (.archplan)
pub fn get_runtime_path() -> PathBuf {
    if let Ok(path) = std::env::var(RUNTIME_PATH_ENV) {
        return PathBuf::from(path);
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".archplan")
}

/// Persisted configuration; every field optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersistedConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_provider: Option<CloudProvider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialist_timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent_specialists: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_specialist_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_review_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialists: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

impl PersistedConfig {
    /// Read a config file. A missing file is an empty config.
    pub async fn load(path: &Path) -> Result<Self> {
        if fs::metadata(path).await.is_err() {
            tracing::debug!(?path, "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file: {:?}", path))
    }

    /// Overlay the fields that are set onto `base`
    pub fn apply(self, mut base: OrchestratorConfig) -> OrchestratorConfig {
        if let Some(provider) = self.default_provider {
            base.default_provider = provider;
        }
        if let Some(ms) = self.specialist_timeout_ms {
            base.specialist_timeout_ms = ms;
        }
        if let Some(n) = self.max_concurrent_specialists {
            base.max_concurrent_specialists = n;
        }
        if let Some(penalty) = self.failed_specialist_penalty {
            base.failed_specialist_penalty = penalty;
        }
        if let Some(threshold) = self.manual_review_threshold {
            base.manual_review_threshold = threshold;
        }
        if let Some(specialists) = self.specialists {
            base.specialists = specialists;
        }
        if self.catalog_path.is_some() {
            base.catalog_path = self.catalog_path;
        }
        base
    }
}

/// Check ranges that serde cannot express
pub fn validate(config: &OrchestratorConfig) -> Result<()> {
    if config.specialist_timeout_ms == 0 {
        anyhow::bail!("specialist_timeout_ms must be greater than zero");
    }
    if config.max_concurrent_specialists == 0 {
        anyhow::bail!("max_concurrent_specialists must be at least 1");
    }
    if !(0.0..=1.0).contains(&config.failed_specialist_penalty) {
        anyhow::bail!(
            "failed_specialist_penalty must be within [0, 1], got {}",
            config.failed_specialist_penalty
        );
    }
    if !(0.0..=1.0).contains(&config.manual_review_threshold) {
        anyhow::bail!(
            "manual_review_threshold must be within [0, 1], got {}",
            config.manual_review_threshold
        );
    }
    Ok(())
}

/// Load `config.json` from a runtime directory over the defaults.
///
/// A relative `catalog_path` is resolved against the runtime directory.
pub async fn load_config(runtime_dir: &Path) -> Result<OrchestratorConfig> {
    let persisted = PersistedConfig::load(&runtime_dir.join(CONFIG_FILE)).await?;
    let mut config = persisted.apply(OrchestratorConfig::default());
    if let Some(path) = config.catalog_path.take() {
        config.catalog_path = Some(if path.is_relative() {
            runtime_dir.join(path)
        } else {
            path
        });
    }
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).await.unwrap();
        assert_eq!(config, OrchestratorConfig::default());
    }

    #[tokio::test]
    async fn test_partial_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "default_provider": "azure", "specialist_timeout_ms": 500, "catalog_path": "catalog.json" }"#,
        )
        .unwrap();

        let config = load_config(dir.path()).await.unwrap();
        assert_eq!(config.default_provider, CloudProvider::Azure);
        assert_eq!(config.specialist_timeout_ms, 500);
        assert_eq!(config.max_concurrent_specialists, 3);
        assert_eq!(config.catalog_path, Some(dir.path().join("catalog.json")));
    }

    #[tokio::test]
    async fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        let err = load_config(dir.path()).await.unwrap_err();
        assert!(format!("{err:#}").contains("Invalid config file"));

        std::fs::write(dir.path().join(CONFIG_FILE), r#"{ "timeout": 5 }"#).unwrap();
        assert!(load_config(dir.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_out_of_range_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "failed_specialist_penalty": 1.5 }"#,
        )
        .unwrap();
        let err = load_config(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("failed_specialist_penalty"));
    }

    #[test]
    fn test_apply_keeps_unset_fields() {
        let persisted = PersistedConfig {
            specialists: Some(vec!["cost".into()]),
            ..PersistedConfig::default()
        };
        let config = persisted.apply(OrchestratorConfig::default());
        assert_eq!(config.specialists, vec!["cost"]);
        assert_eq!(config.manual_review_threshold, 0.6);
    }
}
