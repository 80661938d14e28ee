use std::env;

use serde::{Deserialize, Serialize};

/// Url used when no backend is configured, sync runs offline
pub const PLACEHOLDER_URL: &str = "https://placeholder-project.supabase.co";

fn default_url() -> String {
    PLACEHOLDER_URL.to_string()
}

fn default_entries_table() -> String {
    "dictionary_entries".to_string()
}

fn default_votes_table() -> String {
    "word_votes".to_string()
}

fn default_suggestions_table() -> String {
    "word_suggestions".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Project url, the REST endpoint lives under `/rest/v1`
    #[serde(default = "default_url")]
    pub url: String,
    /// Anonymous api key
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_entries_table")]
    pub entries_table: String,
    #[serde(default = "default_votes_table")]
    pub votes_table: String,
    #[serde(default = "default_suggestions_table")]
    pub suggestions_table: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: String::new(),
            entries_table: default_entries_table(),
            votes_table: default_votes_table(),
            suggestions_table: default_suggestions_table(),
        }
    }
}

impl RemoteConfig {
    pub fn new() -> Self {
        let url = env::var("LEXI_REMOTE_URL").unwrap_or_else(|_| default_url());
        let api_key = env::var("LEXI_REMOTE_KEY").unwrap_or_default();

        Self {
            url,
            api_key,
            ..Self::default()
        }
    }

    /// False when no real backend is configured
    pub fn is_enabled(&self) -> bool {
        let url = self.url.trim();
        !url.is_empty() && url != PLACEHOLDER_URL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_url_disables_remote() {
        assert!(!RemoteConfig::default().is_enabled());

        let blank = RemoteConfig {
            url: "  ".to_string(),
            ..RemoteConfig::default()
        };
        assert!(!blank.is_enabled());
    }
}
