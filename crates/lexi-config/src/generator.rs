use std::env;

use serde::{Deserialize, Serialize};

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_count() -> u32 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Words per `generate` call when no count is given
    #[serde(default = "default_count")]
    pub default_count: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            api_url: default_api_url(),
            default_count: default_count(),
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        let api_key = env::var("LEXI_API_KEY")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .unwrap_or_default();
        let model = env::var("LEXI_MODEL").unwrap_or_else(|_| default_model());

        Self {
            api_key,
            model,
            ..Self::default()
        }
    }
}
