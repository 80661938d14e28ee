use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use lexi_config::Config;
use lexi_core::sync::pull_entries;
use lexi_core::{
    CacheKeys, DictionaryStore, FileCache, KeyValueCache, MergeReport, RemoteGateway, SyncQueue,
    SyncWorker, Tables,
};
use lexi_generator::{EntryGenerator, GeminiGenerator};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Owns the store and the write-behind worker for one CLI invocation
pub struct AppController {
    pub config: Config,
    pub store: DictionaryStore,
    pub gateway: Arc<dyn RemoteGateway>,
    pub generator: Arc<dyn EntryGenerator>,
    pub tables: Tables,
    cancel_token: CancellationToken,
    worker: JoinHandle<()>,
}

impl AppController {
    /// Open the local cache, start the sync worker and pull remote entries
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        let cache = FileCache::new(&config.cache.data_dir).with_context(|| {
            format!(
                "Failed to open cache directory {}",
                config.cache.data_dir.display()
            )
        })?;
        let gateway = lexi_remote::connect(&config.remote);
        let generator = Arc::new(GeminiGenerator::new(&config.generator));
        let provider = generator.metadata();
        tracing::debug!("Entry generator: {} ({})", provider.name, provider.model);

        let mut controller = Self::with_parts(config, Arc::new(cache), gateway, generator)?;

        if controller.config.remote.is_enabled() {
            if let Err(e) = controller.pull().await {
                tracing::error!("Initial remote fetch failed, using local data: {e:#}");
            }
        }

        Ok(controller)
    }

    pub fn with_parts(
        config: Config,
        cache: Arc<dyn KeyValueCache>,
        gateway: Arc<dyn RemoteGateway>,
        generator: Arc<dyn EntryGenerator>,
    ) -> anyhow::Result<Self> {
        let tables = Tables::from(&config.remote);
        let (queue, rx) = SyncQueue::channel();

        let store = DictionaryStore::open(cache, CacheKeys::from(&config.cache), queue)
            .context("Failed to open dictionary store")?;

        let cancel_token = CancellationToken::new();
        let worker = SyncWorker::new(gateway.clone(), tables.clone(), rx);
        let worker = tokio::spawn(worker.run(cancel_token.child_token()));

        Ok(Self {
            config,
            store,
            gateway,
            generator,
            tables,
            cancel_token,
            worker,
        })
    }

    /// Merge every remote entry into the local collection
    pub async fn pull(&mut self) -> anyhow::Result<MergeReport> {
        let entries = pull_entries(self.gateway.as_ref(), &self.tables)
            .await
            .context("Failed to fetch remote entries")?;
        Ok(self.store.apply_remote(entries))
    }

    /// Signed-in user id, or an error telling the user to sign in
    pub fn require_user(&self) -> anyhow::Result<String> {
        self.config
            .user
            .id
            .clone()
            .context("Please sign in first (set LEXI_USER_ID)")
    }

    /// Stop the worker once queued remote writes are flushed, bounded by
    /// `shutdown_timeout_ms`
    pub async fn shutdown(self) {
        let timeout = Duration::from_millis(self.config.shutdown_timeout_ms);
        self.cancel_token.cancel();

        // The store owns the queue sender
        drop(self.store);

        match tokio::time::timeout(timeout, self.worker).await {
            Ok(Ok(())) => tracing::debug!("Sync worker stopped"),
            Ok(Err(e)) => tracing::error!("Sync worker panicked: {e}"),
            Err(_) => tracing::warn!(
                "Sync worker did not finish within {}ms, pending writes dropped",
                timeout.as_millis()
            ),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use lexi_core::{MemoryCache, OfflineGateway};
    use lexi_types::VoteDirection;

    use super::*;

    pub fn offline_controller(config: Config) -> AppController {
        let generator = Arc::new(GeminiGenerator::new(&config.generator));
        AppController::with_parts(
            config,
            Arc::new(MemoryCache::new()),
            Arc::new(OfflineGateway),
            generator,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fresh_controller_is_seeded() {
        let controller = offline_controller(Config::default());
        assert!(!controller.store.is_empty());
        controller.shutdown().await;
    }

    #[tokio::test]
    async fn test_require_user() {
        let mut controller = offline_controller(Config::default());
        assert!(controller.require_user().is_err());

        controller.config.user.id = Some("u1".to_string());
        assert_eq!(controller.require_user().unwrap(), "u1");
        controller.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_flushes_queued_votes() {
        let mut controller = offline_controller(Config::default());
        let id = controller.store.get_all()[0].id.clone().unwrap();
        controller.store.vote(&id, "u1", VoteDirection::Up);

        tokio::time::timeout(Duration::from_secs(2), controller.shutdown())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_offline_pull_changes_nothing() {
        let mut controller = offline_controller(Config::default());
        let report = controller.pull().await.unwrap();
        assert!(report.is_noop());
        controller.shutdown().await;
    }
}
