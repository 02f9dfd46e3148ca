use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{FeedError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Items per network page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// How close to the end of the loaded window the consumer may get
    /// before the next page is fetched.
    #[serde(default = "default_prefetch_distance")]
    pub prefetch_distance: usize,

    /// Whole-cache invalidation window. A cache older than this is
    /// refreshed before being served.
    #[serde(default = "default_cache_timeout_minutes")]
    pub cache_timeout_minutes: u32,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spacefeed");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("articles.db").to_string_lossy().to_string()
}

fn default_api_base_url() -> String {
    "https://api.spaceflightnewsapi.net".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_prefetch_distance() -> usize {
    2
}

fn default_cache_timeout_minutes() -> u32 {
    30
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            api_base_url: default_api_base_url(),
            page_size: default_page_size(),
            prefetch_distance: default_prefetch_distance(),
            cache_timeout_minutes: default_cache_timeout_minutes(),
        }
    }
}

impl FeedConfig {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: FeedConfig =
                toml::from_str(&content).map_err(|e| FeedError::Config(e.to_string()))?;
            Ok(config)
        } else {
            let config = FeedConfig::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| FeedError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("spacefeed")
            .join("config.toml")
    }

    pub fn cache_timeout(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.cache_timeout_minutes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_feed_policy() {
        let config = FeedConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.prefetch_distance, 2);
        assert_eq!(config.cache_timeout(), chrono::Duration::minutes(30));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: FeedConfig = toml::from_str("db_path = \"/tmp/test.db\"").unwrap();
        assert_eq!(config.db_path, "/tmp/test.db");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.cache_timeout_minutes, 30);
    }
}
