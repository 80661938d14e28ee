mod client;

use std::sync::Arc;

use lexi_config::remote::RemoteConfig;
use lexi_core::{OfflineGateway, RemoteGateway};

pub use client::PostgrestGateway;

/// Real gateway when a backend is configured, offline stand-in otherwise
pub fn connect(config: &RemoteConfig) -> Arc<dyn RemoteGateway> {
    if config.is_enabled() {
        tracing::info!("Remote sync enabled: {}", config.url);
        Arc::new(PostgrestGateway::new(&config.url, &config.api_key))
    } else {
        tracing::warn!("No remote backend configured, sync runs offline");
        Arc::new(OfflineGateway)
    }
}
