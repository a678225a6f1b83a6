//! Configuration loading from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use countrymeta_core::HttpConfig;
use countrymeta_store::RelationId;

/// Global configuration for countrymeta
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub build: BuildConfig,
    pub workers: WorkersConfig,
    pub http: HttpSettings,
    pub osm: OsmConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the two JSON artifacts
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./output"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Build directory; relation documents are cached in `<dir>/relations`
    pub dir: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".build"),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct WorkersConfig {
    pub default: usize,
    pub max: usize,
}

impl Default for WorkersConfig {
    fn default() -> Self {
        Self { default: 4, max: 16 }
    }
}

impl WorkersConfig {
    /// Requested worker count, bounded to `1..=max`.
    pub fn resolve(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default).clamp(1, self.max.max(1))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Seconds before a request is abandoned
    pub read_timeout: u64,
    /// Resubmissions of a failing relation request
    pub max_retries: u32,
    /// Delay before each request, in milliseconds
    pub request_delay_ms: u64,
    pub user_agent: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        let defaults = HttpConfig::default();
        Self {
            read_timeout: defaults.read_timeout.as_secs(),
            max_retries: defaults.max_retries,
            request_delay_ms: defaults.request_delay.as_millis() as u64,
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OsmConfig {
    pub overpass_url: String,
    pub relation_url: String,
    pub id_query: String,
    /// Relations appended to the Overpass result unconditionally
    pub supplementary_ids: Vec<RelationId>,
}

impl Default for OsmConfig {
    fn default() -> Self {
        let defaults = countrymeta_fetch::Config::default();
        Self {
            overpass_url: defaults.overpass_url,
            relation_url: defaults.relation_url,
            id_query: defaults.id_query,
            supplementary_ids: defaults.supplementary_ids,
        }
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./countrymeta.toml (current directory)
    /// 2. ~/.config/countrymeta/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("countrymeta.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "countrymeta") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Transport settings from the file, with CLI overrides applied.
    pub fn http_config(
        &self,
        read_timeout: Option<u64>,
        max_retries: Option<u32>,
        request_delay_ms: Option<u64>,
    ) -> HttpConfig {
        let mut http = HttpConfig {
            read_timeout: Duration::from_secs(read_timeout.unwrap_or(self.http.read_timeout)),
            max_retries: max_retries.unwrap_or(self.http.max_retries),
            request_delay: Duration::from_millis(
                request_delay_ms.unwrap_or(self.http.request_delay_ms),
            ),
            ..Default::default()
        };
        if let Some(agent) = &self.http.user_agent {
            http.user_agent = agent.clone();
        }
        http
    }

    /// Fetch pipeline settings.
    pub fn fetch_config(&self, workers: Option<usize>) -> countrymeta_fetch::Config {
        countrymeta_fetch::Config {
            overpass_url: self.osm.overpass_url.clone(),
            id_query: self.osm.id_query.clone(),
            relation_url: self.osm.relation_url.clone(),
            supplementary_ids: self.osm.supplementary_ids.clone(),
            workers: self.workers.resolve(workers),
        }
    }
}
