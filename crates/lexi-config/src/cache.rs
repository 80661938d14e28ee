use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_data_dir() -> PathBuf {
    PathBuf::from(".lexi")
}

fn default_snapshot_key() -> String {
    "ai_dictionary_db".to_string()
}

fn default_votes_key() -> String {
    "ai_dictionary_user_votes".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding one JSON file per cache key
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_snapshot_key")]
    pub snapshot_key: String,
    #[serde(default = "default_votes_key")]
    pub votes_key: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            snapshot_key: default_snapshot_key(),
            votes_key: default_votes_key(),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        let data_dir = env::var("LEXI_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        Self {
            data_dir,
            ..Self::default()
        }
    }
}
