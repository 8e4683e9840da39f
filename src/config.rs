//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` into strongly-typed structs. Every section has
//! defaults, so the service also runs with no file at all. The provider
//! API key is never stored in the file; the config names the env var
//! that holds it.

use anyhow::{Context, Result};
use secrecy::Secret;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::books::DEFAULT_BOOK_PRIORITY;
use crate::cache::DEFAULT_TTL_SECS;
use crate::types::League;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub odds_api: OddsApiConfig,
    pub cache: CacheConfig,
    pub books: BooksConfig,
    /// League → provider sport key.
    pub sports: SportsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OddsApiConfig {
    pub base_url: String,
    /// Name of the env var holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub regions: String,
    pub markets: String,
    pub odds_format: String,
}

impl Default for OddsApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.the-odds-api.com/v4".to_string(),
            api_key_env: "ODDS_API_KEY".to_string(),
            timeout_secs: 10,
            regions: "us".to_string(),
            markets: "h2h,spreads,totals".to_string(),
            odds_format: "american".to_string(),
        }
    }
}

impl OddsApiConfig {
    /// Read the API key from the configured env var. Blank counts as unset.
    pub fn api_key(&self) -> Option<Secret<String>> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(Secret::new)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BooksConfig {
    /// Bookmaker titles in order of preference.
    pub priority: Vec<String>,
}

impl Default for BooksConfig {
    fn default() -> Self {
        Self {
            priority: DEFAULT_BOOK_PRIORITY.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(transparent)]
pub struct SportsConfig(pub HashMap<String, String>);

impl Default for SportsConfig {
    fn default() -> Self {
        Self(HashMap::from([
            ("nfl".to_string(), "americanfootball_nfl".to_string()),
            ("cfb".to_string(), "americanfootball_ncaaf".to_string()),
        ]))
    }
}

impl SportsConfig {
    pub fn sport_key(&self, league: League) -> Option<&str> {
        self.0.get(league.as_str()).map(String::as_str)
    }
}

/// Log line layout.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            filter: "betslip_odds=info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load `path` if it exists, otherwise fall back to built-in defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        anyhow::ensure!(config.cache.ttl_secs > 0, "cache.ttl_secs must be positive");
        anyhow::ensure!(
            config.odds_api.timeout_secs > 0,
            "odds_api.timeout_secs must be positive"
        );
        Ok(config)
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
