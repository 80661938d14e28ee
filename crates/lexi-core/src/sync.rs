//! Write-behind sync: the store pushes `RemoteOp`s without waiting, a
//! worker task replays them against the gateway and logs failures.

use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use lexi_types::{DictionaryEntry, DictionaryRow, WordVote};
use tokio_util::sync::CancellationToken;

use crate::remote::{ENTRY_CONFLICT, Filter, RemoteError, RemoteGateway, Tables, VOTE_CONFLICT};

/// A pending remote write
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOp {
    UpsertEntries(Vec<DictionaryRow>),
    DeleteEntry { headword: String },
    UpsertVote(WordVote),
}

impl RemoteOp {
    fn label(&self) -> &'static str {
        match self {
            RemoteOp::UpsertEntries(_) => "upsert entries",
            RemoteOp::DeleteEntry { .. } => "delete entry",
            RemoteOp::UpsertVote(_) => "upsert vote",
        }
    }
}

/// Producer half held by the store
#[derive(Clone)]
pub struct SyncQueue {
    tx: Option<AsyncSender<RemoteOp>>,
}

impl SyncQueue {
    /// Unbounded queue and the receiver a [`SyncWorker`] drains
    pub fn channel() -> (Self, AsyncReceiver<RemoteOp>) {
        let (tx, rx) = kanal::unbounded_async();
        (Self { tx: Some(tx) }, rx)
    }

    /// Queue that drops every op, for stores without a backend
    pub fn disconnected() -> Self {
        Self { tx: None }
    }

    /// Never blocks and never fails the caller
    pub fn push(&self, op: RemoteOp) {
        let Some(tx) = &self.tx else {
            tracing::debug!("Sync disabled, dropping {}", op.label());
            return;
        };

        let label = op.label();
        match tx.try_send(op) {
            Ok(true) => tracing::debug!("Queued {label}"),
            Ok(false) => tracing::warn!("Sync queue full, dropped {label}"),
            Err(e) => tracing::warn!("Sync queue closed, dropped {label}: {e}"),
        }
    }
}

pub struct SyncWorker {
    gateway: Arc<dyn RemoteGateway>,
    tables: Tables,
    rx: AsyncReceiver<RemoteOp>,
}

impl SyncWorker {
    pub fn new(gateway: Arc<dyn RemoteGateway>, tables: Tables, rx: AsyncReceiver<RemoteOp>) -> Self {
        Self {
            gateway,
            tables,
            rx,
        }
    }

    /// Replay ops until cancelled or the queue closes. On cancellation
    /// whatever is already queued is still sent.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!("Sync worker started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    let flushed = self.drain().await;
                    tracing::info!("Sync worker stopping, flushed {flushed} pending ops");
                    return;
                }
                op = self.rx.recv() => match op {
                    Ok(op) => self.handle(op).await,
                    Err(_) => {
                        tracing::info!("Sync queue closed, worker exiting");
                        return;
                    }
                }
            }
        }
    }

    /// Send everything currently queued, returns how many ops were handled
    pub async fn drain(&self) -> usize {
        let mut handled = 0;
        while let Ok(Some(op)) = self.rx.try_recv() {
            self.handle(op).await;
            handled += 1;
        }
        handled
    }

    async fn handle(&self, op: RemoteOp) {
        let label = op.label();
        if let Err(e) = self.apply(op).await {
            // Local state stays authoritative, no retry
            tracing::error!("Remote sync failed ({label}): {e}");
        }
    }

    pub async fn apply(&self, op: RemoteOp) -> Result<(), RemoteError> {
        match op {
            RemoteOp::UpsertEntries(rows) => {
                let rows = rows
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<Result<Vec<_>, _>>()?;
                self.gateway
                    .upsert(&self.tables.entries, rows, ENTRY_CONFLICT)
                    .await
            }
            RemoteOp::DeleteEntry { headword } => {
                self.gateway
                    .delete(&self.tables.entries, Filter::eq("headword", headword))
                    .await
            }
            RemoteOp::UpsertVote(vote) => {
                let row = serde_json::to_value(&vote)?;
                self.gateway
                    .upsert(&self.tables.votes, vec![row], VOTE_CONFLICT)
                    .await
            }
        }
    }
}

/// Fetch every dictionary row. Rows that do not decode are skipped.
pub async fn pull_entries(
    gateway: &dyn RemoteGateway,
    tables: &Tables,
) -> Result<Vec<DictionaryEntry>, RemoteError> {
    let rows = gateway.select(&tables.entries, "id, headword, entry").await?;
    tracing::info!("Fetched {} remote rows", rows.len());

    let entries = rows
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<DictionaryRow>(value) {
            Ok(row) => {
                let mut entry = row.entry;
                if entry.id.is_none() {
                    entry.id = row.id;
                }
                Some(entry)
            }
            Err(e) => {
                tracing::warn!("Skipping malformed remote row: {e}");
                None
            }
        })
        .collect();

    Ok(entries)
}
