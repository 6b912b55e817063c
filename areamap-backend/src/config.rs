use std::sync::OnceLock;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::module::coverage::{DEFAULT_USER_SEARCH_LIMIT, MatchOptions, UnscopedArea};
use crate::module::roster::RosterColumns;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default)]
    pub roster: RosterConfig,

    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Local export (.json or .csv)
    #[serde(default = "default_roster_path")]
    pub path: String,

    /// HTTP export; takes precedence over `path` when set
    #[serde(default)]
    pub url: Option<String>,

    /// 0 disables periodic reloads
    #[serde(default = "default_reload_interval")]
    pub reload_interval_minutes: u64,

    /// Keep rows flagged as not shown on the map
    #[serde(default)]
    pub include_hidden: bool,

    #[serde(default)]
    pub columns: RosterColumns,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default)]
    pub unscoped_area: UnscopedArea,

    #[serde(default = "default_user_search_limit")]
    pub user_search_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_analytics_enabled")]
    pub enabled: bool,

    #[serde(default = "default_analytics_path")]
    pub path: String,

    /// Events kept in memory for `/api/analytics/recent`
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_roster_path() -> String {
    "data/personnel.json".to_string()
}

fn default_reload_interval() -> u64 {
    15
}

fn default_user_search_limit() -> usize {
    DEFAULT_USER_SEARCH_LIMIT
}

fn default_analytics_enabled() -> bool {
    true
}

fn default_analytics_path() -> String {
    "data/analytics.jsonl".to_string()
}

fn default_buffer_size() -> usize {
    500
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            roster: RosterConfig::default(),
            matching: MatchingConfig::default(),
            analytics: AnalyticsConfig::default(),
        }
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            path: default_roster_path(),
            url: None,
            reload_interval_minutes: default_reload_interval(),
            include_hidden: false,
            columns: RosterColumns::default(),
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            unscoped_area: UnscopedArea::default(),
            user_search_limit: default_user_search_limit(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: default_analytics_enabled(),
            path: default_analytics_path(),
            buffer_size: default_buffer_size(),
        }
    }
}

impl MatchingConfig {
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            unscoped_area: self.unscoped_area,
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file '{}'", path))?;
        Self::from_toml(&content).context(format!("Failed to parse config file '{}'", path))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Load the config file into [`CONFIG`]. A missing file falls back to defaults.
pub fn read_config(path: &str) -> anyhow::Result<&'static AppConfig> {
    let config = if std::path::Path::new(path).exists() {
        AppConfig::from_file(path)?
    } else {
        eprintln!("Config file '{}' not found, using defaults", path);
        AppConfig::default()
    };

    Ok(CONFIG.get_or_init(|| config))
}
