//! Layered server configuration
//!
//! Sources, later ones winning: built-in defaults, an optional TOML file,
//! `CINESUBZ_`-prefixed environment variables (`__` separates sections,
//! e.g. `CINESUBZ_SCRAPER__TIMEOUT_SECS=5`) and finally the bare `PORT`
//! variable most hosting platforms set.

use std::path::{Path, PathBuf};

use cinesubz_core::{ClientConfig, DEFAULT_MAX_SEARCH_RESULTS, DiscoveryMode, ScraperConfig};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_VAR: &str = "CINESUBZ_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub scraper: ScraperSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// `host:port` string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Scraper tuning as it appears in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_redirects: usize,
    /// Falls back to the built-in browser User-Agent when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub max_search_results: usize,
    pub discovery: DiscoveryMode,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        let client = ClientConfig::default();
        Self {
            base_url: client.base_url,
            timeout_secs: client.timeout_secs,
            max_redirects: client.max_redirects,
            user_agent: None,
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            discovery: DiscoveryMode::default(),
        }
    }
}

impl ScraperSettings {
    pub fn to_scraper_config(&self) -> ScraperConfig {
        let defaults = ClientConfig::default();
        ScraperConfig {
            client: ClientConfig {
                base_url: self.base_url.clone(),
                timeout_secs: self.timeout_secs,
                max_redirects: self.max_redirects,
                user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            },
            max_search_results: self.max_search_results,
            discovery: self.discovery,
        }
    }
}

/// Load configuration from the environment
///
/// Uses the file named by `CINESUBZ_CONFIG` (which must exist), else
/// `config.toml` in the working directory if there is one.
pub fn load_config() -> Result<Config, ConfigError> {
    match std::env::var(CONFIG_PATH_VAR) {
        Ok(path) => {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.display().to_string()));
            }
            load_config_from(Some(&path))
        }
        Err(_) => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            load_config_from(fallback.exists().then_some(fallback))
        }
    }
}

/// Load configuration from an optional file with environment overrides
pub fn load_config_from(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));
    if let Some(path) = path {
        figment = figment.merge(Toml::file(path));
    }
    let figment = figment
        .merge(Env::prefixed("CINESUBZ_").split("__"))
        .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()));

    extract(figment)
}

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    extract(Figment::from(Serialized::defaults(Config::default())).merge(Toml::string(toml_str)))
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    let config: Config = figment
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let scraper = &config.scraper;

    if !(scraper.base_url.starts_with("http://") || scraper.base_url.starts_with("https://")) {
        return Err(ConfigError::Invalid(format!(
            "scraper.base_url must be an http(s) URL, got '{}'",
            scraper.base_url
        )));
    }
    if scraper.timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "scraper.timeout_secs must be greater than zero".to_string(),
        ));
    }
    if !(1..=10).contains(&scraper.max_redirects) {
        return Err(ConfigError::Invalid(format!(
            "scraper.max_redirects must be between 1 and 10, got {}",
            scraper.max_redirects
        )));
    }
    if scraper.max_search_results == 0 {
        return Err(ConfigError::Invalid(
            "scraper.max_search_results must be greater than zero".to_string(),
        ));
    }
    if config.server.host.trim().is_empty() {
        return Err(ConfigError::Invalid("server.host cannot be empty".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.server.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.scraper.base_url, "https://cinesubz.co");
        assert_eq!(config.scraper.timeout_secs, 10);
        assert_eq!(config.scraper.max_redirects, 5);
        assert_eq!(config.scraper.max_search_results, 20);
        assert_eq!(config.scraper.discovery, DiscoveryMode::FirstMatch);
    }

    #[test]
    fn test_load_config_from_str_partial() {
        let toml = r#"
[server]
port = 9000

[scraper]
discovery = "union"
user_agent = "test-agent"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.scraper.discovery, DiscoveryMode::Union);

        let scraper = config.scraper.to_scraper_config();
        assert_eq!(scraper.client.user_agent, "test-agent");
        assert_eq!(scraper.discovery, DiscoveryMode::Union);
    }

    #[test]
    fn test_unset_user_agent_uses_builtin() {
        let scraper = ScraperSettings::default().to_scraper_config();
        assert_eq!(scraper.client.user_agent, ClientConfig::default().user_agent);
    }

    #[test]
    fn test_parse_error() {
        let result = load_config_from_str("[server]\nport = \"not a number\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_unknown_discovery_mode_rejected() {
        let result = load_config_from_str("[scraper]\ndiscovery = \"all\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validation_errors() {
        for toml in [
            "[scraper]\ntimeout_secs = 0\n",
            "[scraper]\nmax_redirects = 0\n",
            "[scraper]\nmax_redirects = 11\n",
            "[scraper]\nmax_search_results = 0\n",
            "[scraper]\nbase_url = \"ftp://cinesubz.co\"\n",
            "[server]\nhost = \"  \"\n",
        ] {
            let result = load_config_from_str(toml);
            assert!(
                matches!(result, Err(ConfigError::Invalid(_))),
                "expected validation failure for {toml:?}"
            );
        }
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[server]
host = "127.0.0.1"

[scraper]
base_url = "http://127.0.0.1:8080"
timeout_secs = 3
"#
        )
        .unwrap();

        let config = load_config_from(Some(temp_file.path())).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.scraper.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.scraper.timeout_secs, 3);
    }
}
