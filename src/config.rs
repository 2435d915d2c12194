use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::jikan;
use crate::domain::BrowseMode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub jikan: JikanConfig,

    pub browse: BrowseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/animeshelf.db".to_string(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JikanConfig {
    pub base_url: String,

    /// Items per page when browsing the top list (Jikan maximum: 25)
    pub top_page_size: u32,

    /// Items per page for search results (Jikan maximum: 25)
    pub search_page_size: u32,

    pub order_by: String,

    pub sort: String,

    /// Ask Jikan to filter out adult entries from search results
    pub safe_for_work: bool,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,
}

impl Default for JikanConfig {
    fn default() -> Self {
        Self {
            base_url: jikan::BASE_URL.to_string(),
            top_page_size: jikan::TOP_PAGE_SIZE,
            search_page_size: jikan::SEARCH_PAGE_SIZE,
            order_by: jikan::ORDER_BY.to_string(),
            sort: jikan::SORT.to_string(),
            safe_for_work: true,
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseConfig {
    pub mode: BrowseMode,

    /// Capacity of the catalog event channel (default: 64)
    pub event_buffer_size: usize,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            mode: BrowseMode::Paginated,
            event_buffer_size: 64,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("animeshelf").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".animeshelf").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.jikan.base_url)
            .with_context(|| format!("Invalid Jikan base URL: {}", self.jikan.base_url))?;

        for (name, size) in [
            ("top_page_size", self.jikan.top_page_size),
            ("search_page_size", self.jikan.search_page_size),
        ] {
            if size == 0 || size > jikan::MAX_PAGE_SIZE {
                anyhow::bail!(
                    "jikan.{name} must be between 1 and {}, got {size}",
                    jikan::MAX_PAGE_SIZE
                );
            }
        }

        if self.jikan.request_timeout_seconds == 0 {
            anyhow::bail!("jikan.request_timeout_seconds must be > 0");
        }

        if !matches!(self.general.log_format.as_str(), "pretty" | "json") {
            anyhow::bail!(
                "general.log_format must be \"pretty\" or \"json\", got \"{}\"",
                self.general.log_format
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.jikan.top_page_size, 24);
        assert_eq!(config.jikan.search_page_size, 25);
        assert_eq!(config.jikan.order_by, "score");
        assert_eq!(config.jikan.sort, "desc");
        assert!(config.jikan.safe_for_work);
        assert_eq!(config.browse.mode, BrowseMode::Paginated);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[jikan]"));
        assert!(toml_str.contains("[browse]"));
        assert!(toml_str.contains("mode = \"paginated\""));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [browse]
            mode = "infinite_scroll"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.browse.mode, BrowseMode::InfiniteScroll);

        assert_eq!(config.jikan.base_url, "https://api.jikan.moe/v4");
    }

    #[test]
    fn test_validate_rejects_oversized_pages_and_bad_urls() {
        let mut config = Config::default();
        config.jikan.top_page_size = 26;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.jikan.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.general.log_format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round_trip_through_file() {
        let path = std::env::temp_dir()
            .join(format!("animeshelf-config-{}", std::process::id()))
            .join("config.toml");

        let mut config = Config::default();
        config.jikan.safe_for_work = false;
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert!(!loaded.jikan.safe_for_work);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
