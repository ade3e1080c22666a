//! Optional YAML configuration.
//!
//! Every field has a default, so an empty file (or no file at all) is valid.
//! Command-line flags override anything set here.
//!
//! ```yaml
//! source: https://news.example.com/dashboard/
//! user_agent: section_digest/0.1
//! timeout_secs: 10
//! output_dir: ./public
//! json_output_dir: ./json
//! ```

use serde::Deserialize;
use std::error::Error;
use std::time::Duration;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL or directory that contains `outputs/`.
    pub source: String,
    pub user_agent: String,
    /// HTTP connect and request timeout.
    pub timeout_secs: u64,
    /// Directory for rendered pages.
    pub output_dir: String,
    /// Directory for JSON snapshots; snapshots are skipped when unset.
    pub json_output_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: ".".to_string(),
            user_agent: format!("section_digest/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 15,
            output_dir: "public".to_string(),
            json_output_dir: None,
        }
    }
}

impl AppConfig {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as null rather than as an empty map.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Load configuration from `path`.
    #[instrument(level = "info")]
    pub async fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        let text = tokio::fs::read_to_string(path).await?;
        let config = Self::from_yaml(&text)?;
        info!(source = %config.source, output_dir = %config.output_dir, "Loaded configuration");
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.source, ".");
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert_eq!(config.output_dir, "public");
        assert!(config.user_agent.starts_with("section_digest/"));
        assert!(config.json_output_dir.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml("source: https://example.com/news/\ntimeout_secs: 3\n").unwrap();
        assert_eq!(config.source, "https://example.com/news/");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.output_dir, "public");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(AppConfig::from_yaml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(AppConfig::from_yaml("timeout_secs: soon").is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digest.yaml");
        std::fs::write(&path, "output_dir: site\njson_output_dir: snapshots\n").unwrap();

        let config = AppConfig::load(path.to_str().unwrap()).await.unwrap();
        assert_eq!(config.output_dir, "site");
        assert_eq!(config.json_output_dir.as_deref(), Some("snapshots"));
    }
}
