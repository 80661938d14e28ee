use std::env;

use serde::{Deserialize, Serialize};

/// Identity handed over by the sign-in provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub id: Option<String>,
    pub email: Option<String>,
}

impl UserConfig {
    pub fn new() -> Self {
        Self {
            id: env::var("LEXI_USER_ID").ok().filter(|v| !v.trim().is_empty()),
            email: env::var("LEXI_USER_EMAIL").ok(),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.id.is_some()
    }
}
