use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::DEFAULT_MIN_SCORE;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_min_score")]
    pub min_score: u8,
    #[serde(default = "default_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl MatchingSettings {
    /// Default page size, never above the configured maximum
    pub fn effective_default_limit(&self) -> usize {
        self.default_limit.min(self.max_limit).max(1) as usize
    }

    /// Reject a requested page size above `max_limit`
    pub fn validate_limit(&self, limit: Option<u16>) -> Result<Option<usize>, String> {
        match limit {
            Some(limit) if limit > self.max_limit => Err(format!(
                "limit {} exceeds the maximum of {}",
                limit, self.max_limit
            )),
            limit => Ok(limit.map(usize::from)),
        }
    }
}

fn default_min_score() -> u8 { DEFAULT_MIN_SCORE }
fn default_limit() -> u16 { 20 }
fn default_max_limit() -> u16 { 100 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingSettings {
    /// Apply LOG_LEVEL / LOG_FORMAT style overrides on top of the file values
    pub fn with_overrides(mut self, level: Option<String>, format: Option<String>) -> Self {
        if let Some(level) = level.filter(|l| !l.trim().is_empty()) {
            self.level = level;
        }
        if let Some(format) = format.filter(|f| !f.trim().is_empty()) {
            self.format = format;
        }
        self
    }

    pub fn is_pretty(&self) -> bool {
        self.format.eq_ignore_ascii_case("pretty")
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with EXCHANGE__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., EXCHANGE__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        apply_env_overrides(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        settings.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("EXCHANGE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// The hosting platform injects the database URL as DATABASE_URL
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = std::env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(redis_url) = std::env::var("REDIS_URL") {
        builder = builder.set_override("cache.redis_url", redis_url)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matching() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.min_score, 30);
        assert_eq!(matching.default_limit, 20);
        assert_eq!(matching.max_limit, 100);
    }

    #[test]
    fn test_default_limit_capped_by_max() {
        let matching = MatchingSettings {
            default_limit: 500,
            ..Default::default()
        };
        assert_eq!(matching.effective_default_limit(), 100);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_validate_limit_uses_configured_max() {
        let matching = MatchingSettings {
            max_limit: 250,
            ..Default::default()
        };
        assert_eq!(matching.validate_limit(Some(200)), Ok(Some(200)));
        assert_eq!(matching.validate_limit(None), Ok(None));
        assert!(matching.validate_limit(Some(251)).is_err());
        assert!(MatchingSettings::default().validate_limit(Some(101)).is_err());
    }

    #[test]
    fn test_logging_overrides() {
        let logging = LoggingSettings {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        };
        assert!(logging.is_pretty());

        let overridden = logging
            .clone()
            .with_overrides(Some("debug".to_string()), Some("json".to_string()));
        assert_eq!(overridden.level, "debug");
        assert!(!overridden.is_pretty());

        let kept = logging.with_overrides(None, Some(String::new()));
        assert_eq!(kept.level, "warn");
        assert!(kept.is_pretty());
    }

    #[test]
    fn test_load_from_file() {
        let settings = Settings::load_from("config/default.toml").unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.matching.min_score, 30);
        assert_eq!(settings.cache.ttl_secs, Some(300));
        assert_eq!(settings.logging.level, "info");
    }
}
