use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use self::cache::CacheConfig;
use self::generator::GeneratorConfig;
use self::remote::RemoteConfig;
use self::user::UserConfig;

pub mod cache;
pub mod generator;
pub mod remote;
pub mod user;

fn default_log_level() -> String {
    "info".to_string()
}

fn default_shutdown_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cache: CacheConfig,
    pub remote: RemoteConfig,
    pub generator: GeneratorConfig,
    pub user: UserConfig,

    /// Fallback filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// How long to wait for pending remote writes on exit
    #[serde(default = "default_shutdown_timeout_ms")]
    pub shutdown_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            remote: RemoteConfig::default(),
            generator: GeneratorConfig::default(),
            user: UserConfig::default(),
            log_level: default_log_level(),
            shutdown_timeout_ms: default_shutdown_timeout_ms(),
        }
    }
}

impl Config {
    /// Build config from environment variables
    pub fn new() -> Self {
        let log_level = env::var("LEXI_LOG").unwrap_or_else(|_| default_log_level());

        let shutdown_timeout_ms = env::var("LEXI_SHUTDOWN_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_shutdown_timeout_ms);

        Config {
            cache: CacheConfig::new(),
            remote: RemoteConfig::new(),
            generator: GeneratorConfig::new(),
            user: UserConfig::new(),
            log_level,
            shutdown_timeout_ms,
        }
    }

    /// Load a JSON profile, missing fields fall back to defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_json::from_reader(reader)?;
        Ok(config)
    }
}
