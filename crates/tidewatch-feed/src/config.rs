use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::client::{DEFAULT_LIMIT, DEFAULT_POLL_INTERVAL};

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "TIDEWATCH_BASE_URL";

/// Largest batch the backend accepts per drain request.
pub const MAX_LIMIT: usize = 500;

/// Where and how often to drain events.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub base_url: String,
    pub drain_path: String,
    pub poll_interval_ms: u64,
    pub limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            drain_path: "/debug/drain_events".to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl FeedConfig {
    /// Read a JSON config file. Keys left out keep their defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read config {}: {e}", path.display()))?;
        let config: FeedConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Defaults, then the optional file, then `TIDEWATCH_BASE_URL`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url.trim().to_string();
            }
        }
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.trim().is_empty() {
            anyhow::bail!("base_url must not be empty");
        }
        if self.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be greater than zero");
        }
        if self.limit == 0 || self.limit > MAX_LIMIT {
            anyhow::bail!("limit must be between 1 and {MAX_LIMIT} (got {})", self.limit);
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard() {
        let c = FeedConfig::default();
        assert_eq!(c.poll_interval(), Duration::from_millis(3000));
        assert_eq!(c.limit, 50);
        assert_eq!(c.drain_path, "/debug/drain_events");
        c.validate().unwrap();
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tidewatch.json");
        std::fs::write(&path, r#"{"base_url": "http://backend:9000", "limit": 20}"#).unwrap();

        let c = FeedConfig::from_file(&path).unwrap();
        assert_eq!(c.base_url, "http://backend:9000");
        assert_eq!(c.limit, 20);
        assert_eq!(c.poll_interval_ms, 3000);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tidewatch.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(FeedConfig::from_file(&path).is_err());
        assert!(FeedConfig::from_file(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let mut c = FeedConfig::default();
        c.limit = 0;
        assert!(c.validate().is_err());
        c.limit = 501;
        assert!(c.validate().is_err());
        c.limit = 500;
        c.poll_interval_ms = 0;
        assert!(c.validate().is_err());
    }
}
