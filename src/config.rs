use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::body::BodyLimit;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_MAX_CONTENT_BYTES: usize = 1_500_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub urls: Vec<String>,
    pub timeout_seconds: u64,
    pub max_content_bytes: usize,
    pub user_agent: String,
    pub output_dir: PathBuf,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            max_content_bytes: DEFAULT_MAX_CONTENT_BYTES,
            user_agent: default_user_agent(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl FetchConfig {
    pub fn from_toml_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn body_limit(&self) -> BodyLimit {
        BodyLimit::Bytes(self.max_content_bytes)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

pub fn default_user_agent() -> String {
    concat!("pagefetch/", env!("CARGO_PKG_VERSION")).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: FetchConfig = toml::from_str("urls = [\"http://example.com\"]").unwrap();

        assert_eq!(config.urls, vec!["http://example.com".to_string()]);
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(config.max_content_bytes, DEFAULT_MAX_CONTENT_BYTES);
        assert_eq!(config.user_agent, default_user_agent());
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config: FetchConfig = toml::from_str(
            r#"
            urls = ["http://a.example", "http://b.example"]
            timeout_seconds = 3
            max_content_bytes = 5000
            user_agent = "custom agent"
            output_dir = "out"
            "#,
        )
        .unwrap();

        assert_eq!(config.urls.len(), 2);
        assert_eq!(config.timeout_seconds, 3);
        assert_eq!(config.max_content_bytes, 5000);
        assert_eq!(config.user_agent, "custom agent");
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.body_limit(), BodyLimit::Bytes(5000));
        assert_eq!(config.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn empty_document_is_the_default_config() {
        let config: FetchConfig = toml::from_str("").unwrap();
        assert_eq!(config, FetchConfig::default());
    }
}
