use std::collections::HashSet;
use std::sync::Arc;

use lexi_config::cache::CacheConfig;
use lexi_types::{DictionaryEntry, DictionaryRow, VoteDirection, WordVote};
use rand::seq::SliceRandom;

use crate::cache::KeyValueCache;
use crate::error::Result;
use crate::ledger::{UserVotes, VoteLedger};
use crate::merge::{MergeReport, fresh_id, merge_entries};
use crate::notify::{Subscribers, Subscription, SubscriptionId};
use crate::ranking::{ReviewPick, rank_for_review};
use crate::search;
use crate::seed;
use crate::sync::{RemoteOp, SyncQueue};
use crate::table::{self, TablePage, TableQuery};

/// Cache keys the store reads and writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKeys {
    pub snapshot: String,
    pub user_votes: String,
}

impl Default for CacheKeys {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

impl From<&CacheConfig> for CacheKeys {
    fn from(config: &CacheConfig) -> Self {
        Self {
            snapshot: config.snapshot_key.clone(),
            user_votes: config.votes_key.clone(),
        }
    }
}

/// Authoritative local dictionary.
///
/// Every mutator updates memory, writes the snapshot to the cache, notifies
/// subscribers and only then queues the remote write. Remote outcomes never
/// flow back into the store.
pub struct DictionaryStore {
    entries: Vec<DictionaryEntry>,
    ledger: VoteLedger,
    cache: Arc<dyn KeyValueCache>,
    keys: CacheKeys,
    sync: SyncQueue,
    subscribers: Subscribers,
}

impl DictionaryStore {
    /// Load the local snapshot, seeding bundled defaults when it is missing
    /// or corrupt. Only a failing cache read is an error.
    pub fn open(cache: Arc<dyn KeyValueCache>, keys: CacheKeys, sync: SyncQueue) -> Result<Self> {
        let (entries, mut dirty) = match cache.get(&keys.snapshot)? {
            Some(raw) => match serde_json::from_str::<Vec<DictionaryEntry>>(&raw) {
                Ok(entries) => (entries, false),
                Err(e) => {
                    tracing::error!("Failed to parse dictionary snapshot, using defaults: {e}");
                    (seed::default_entries(), true)
                }
            },
            None => {
                tracing::info!("No local snapshot, seeding default entries");
                (seed::default_entries(), true)
            }
        };

        let user_votes: UserVotes = match cache.get(&keys.user_votes)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable user votes: {e}");
                UserVotes::default()
            }),
            None => UserVotes::default(),
        };

        let mut store = Self {
            entries: Vec::with_capacity(entries.len()),
            ledger: VoteLedger::new(),
            cache,
            keys,
            sync,
            subscribers: Subscribers::default(),
        };
        store.ledger.restore_user_votes(user_votes);
        dirty |= store.adopt(entries);

        if dirty {
            store.persist();
        }

        tracing::info!("Dictionary store ready with {} entries", store.entries.len());
        Ok(store)
    }

    /// Take ownership of loaded entries: ids are assigned where missing and
    /// embedded stats move into the ledger. Returns true if an id was added.
    fn adopt(&mut self, entries: Vec<DictionaryEntry>) -> bool {
        let mut assigned = false;
        let mut seen = HashSet::new();

        for mut entry in entries {
            let id = match entry.id.take() {
                Some(id) if seen.insert(id.clone()) => id,
                _ => {
                    assigned = true;
                    let id = fresh_id();
                    seen.insert(id.clone());
                    id
                }
            };

            if let Some(stats) = entry.community_stats.take() {
                self.ledger.set_stats(&id, stats);
            }
            entry.id = Some(id);
            self.entries.push(entry);
        }

        assigned
    }

    // ---------------------------------------------------------------------
    // Subscriptions
    // ---------------------------------------------------------------------

    /// `callback` runs synchronously once after every mutation
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry with stats taken from the vote ledger
    pub fn get_all(&self) -> Vec<DictionaryEntry> {
        self.entries.iter().map(|e| self.overlay(e)).collect()
    }

    pub fn get(&self, id: &str) -> Option<DictionaryEntry> {
        self.entries
            .iter()
            .find(|e| e.id.as_deref() == Some(id))
            .map(|e| self.overlay(e))
    }

    /// First entry whose headword matches ignoring case
    pub fn find(&self, headword: &str) -> Option<DictionaryEntry> {
        let key = headword.to_lowercase();
        self.entries
            .iter()
            .find(|e| e.merge_key() == key)
            .map(|e| self.overlay(e))
    }

    pub fn search(&self, query: &str) -> Vec<DictionaryEntry> {
        let Some(needle) = search::prepare_query(query) else {
            return Vec::new();
        };

        self.entries
            .iter()
            .filter(|e| search::matches(e, &needle))
            .map(|e| self.overlay(e))
            .collect()
    }

    /// Uniformly random entry, the first bundled entry if the store is empty
    pub fn random(&self) -> Option<DictionaryEntry> {
        match self.entries.choose(&mut rand::thread_rng()) {
            Some(entry) => Some(self.overlay(entry)),
            None => seed::default_entries().into_iter().next(),
        }
    }

    /// Entries `user` has not voted on, least engaged first
    pub fn review_queue(&self, user: Option<&str>) -> Vec<DictionaryEntry> {
        let candidates = self
            .entries
            .iter()
            .filter(|e| match (user, e.id.as_deref()) {
                (Some(user), Some(id)) => !self.ledger.has_voted(id, user),
                _ => true,
            })
            .map(|e| self.overlay(e))
            .collect();

        rank_for_review(candidates)
    }

    /// Next entry to put in front of `user` for review
    pub fn least_voted(&self, user: Option<&str>) -> ReviewPick {
        if self.entries.is_empty() {
            return ReviewPick::Empty;
        }

        match self.review_queue(user).into_iter().next() {
            Some(entry) => ReviewPick::Candidate(entry),
            None => ReviewPick::AllCaughtUp,
        }
    }

    /// Admin table page over every entry
    pub fn table(&self, query: &TableQuery) -> TablePage {
        table::build_page(self.get_all(), query)
    }

    pub fn get_user_vote(&self, entry_id: &str, user_id: &str) -> Option<VoteDirection> {
        self.ledger.user_vote(entry_id, user_id)
    }

    /// Pretty JSON array of [`Self::get_all`], the import/export format
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.get_all())?)
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Merge generated or imported entries by case-insensitive headword.
    ///
    /// Every candidate must carry a non-empty headword, this is not checked.
    pub fn add_entries(&mut self, candidates: Vec<DictionaryEntry>) -> MergeReport {
        let changed = self.merge(candidates, true);
        let report = changed.report;

        if !changed.rows.is_empty() {
            self.sync.push(RemoteOp::UpsertEntries(changed.rows));
        }

        tracing::info!(
            "Imported entries: {} added, {} updated",
            report.added,
            report.updated
        );
        report
    }

    /// Parse an export file and merge it. Blank headwords are dropped here
    /// so `add_entries` never sees them.
    pub fn import_json(&mut self, raw: &str) -> Result<MergeReport> {
        let candidates: Vec<DictionaryEntry> = serde_json::from_str(raw)?;
        let total = candidates.len();

        let candidates: Vec<_> = candidates
            .into_iter()
            .filter(|e| !e.headword.trim().is_empty())
            .collect();
        if candidates.len() < total {
            tracing::warn!("Skipped {} entries without a headword", total - candidates.len());
        }

        Ok(self.add_entries(candidates))
    }

    /// Merge rows pulled from the backend. Local vote counts win and
    /// nothing is queued back.
    pub fn apply_remote(&mut self, entries: Vec<DictionaryEntry>) -> MergeReport {
        let changed = self.merge(entries, false);
        tracing::info!(
            "Remote sync merged: {} added, {} updated",
            changed.report.added,
            changed.report.updated
        );
        changed.report
    }

    fn merge(&mut self, candidates: Vec<DictionaryEntry>, keep_stats: bool) -> Changed {
        let candidates = candidates
            .into_iter()
            .map(|mut e| {
                if !keep_stats {
                    e.community_stats = None;
                }
                e
            })
            .collect();

        let collection = std::mem::take(&mut self.entries);
        let outcome = merge_entries(collection, candidates, &mut self.ledger);
        self.entries = outcome.collection;
        self.commit();

        Changed {
            report: outcome.report,
            rows: outcome
                .changed
                .iter()
                .map(|e| DictionaryRow::from(&self.overlay(e)))
                .collect(),
        }
    }

    /// Toggle/swap vote protocol. Returns the user's vote afterwards.
    /// Votes for ids not in the collection are ignored.
    pub fn vote(
        &mut self,
        entry_id: &str,
        user_id: &str,
        direction: VoteDirection,
    ) -> Option<VoteDirection> {
        if !self.contains_id(entry_id) {
            tracing::warn!("Ignoring vote for unknown entry {entry_id}");
            return None;
        }

        let current = self.ledger.cast(entry_id, user_id, direction);
        self.commit();

        self.sync.push(RemoteOp::UpsertVote(WordVote {
            id: None,
            word_id: entry_id.to_string(),
            user_id: user_id.to_string(),
            vote_type: direction,
            created_at: None,
        }));

        current
    }

    /// Replace the first entry whose headword equals `original_headword`
    /// exactly, keeping its position. A replacement without an id, or with
    /// an id owned by another entry, keeps the old entry's id.
    pub fn update_entry(&mut self, original_headword: &str, new_entry: DictionaryEntry) -> bool {
        let Some(pos) = self
            .entries
            .iter()
            .position(|e| e.headword == original_headword)
        else {
            tracing::warn!("No entry '{original_headword}' to update");
            return false;
        };

        let mut entry = new_entry;
        // Vote counts only change through voting and imports
        entry.community_stats = None;

        let taken_elsewhere = entry.id.as_deref().is_some_and(|id| {
            self.entries
                .iter()
                .enumerate()
                .any(|(i, e)| i != pos && e.id.as_deref() == Some(id))
        });
        if taken_elsewhere {
            tracing::warn!(
                "Replacement id for '{original_headword}' belongs to another entry, keeping the old id"
            );
            entry.id = None;
        }
        if entry.id.is_none() {
            entry.id = self.entries[pos].id.clone().or_else(|| Some(fresh_id()));
        }

        self.entries[pos] = entry;
        self.commit();

        let row = DictionaryRow::from(&self.overlay(&self.entries[pos]));
        self.sync.push(RemoteOp::UpsertEntries(vec![row]));
        true
    }

    /// Remove every entry whose headword equals `headword` exactly
    pub fn delete_entry(&mut self, headword: &str) -> usize {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| e.headword == headword);
        self.entries = kept;

        for id in removed.iter().filter_map(|e| e.id.as_deref()) {
            self.ledger.forget(id);
        }

        if !removed.is_empty() {
            self.commit();
        }

        self.sync.push(RemoteOp::DeleteEntry {
            headword: headword.to_string(),
        });

        tracing::info!("Deleted {} entries for '{headword}'", removed.len());
        removed.len()
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn contains_id(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id.as_deref() == Some(id))
    }

    fn overlay(&self, entry: &DictionaryEntry) -> DictionaryEntry {
        let mut entry = entry.clone();
        entry.community_stats = entry.id.as_deref().and_then(|id| self.ledger.stats(id));
        entry
    }

    fn commit(&self) {
        self.persist();
        self.subscribers.notify();
    }

    /// Overwrite the cached snapshot. A failed write is logged, the
    /// in-memory state stays authoritative.
    fn persist(&self) {
        let snapshot = serde_json::to_string(&self.get_all());
        match snapshot {
            Ok(json) => {
                if let Err(e) = self.cache.set(&self.keys.snapshot, &json) {
                    tracing::error!("Failed to write dictionary snapshot: {e}");
                }
            }
            Err(e) => tracing::error!("Failed to serialize dictionary snapshot: {e}"),
        }

        match serde_json::to_string(self.ledger.user_votes()) {
            Ok(json) => {
                if let Err(e) = self.cache.set(&self.keys.user_votes, &json) {
                    tracing::error!("Failed to write user votes: {e}");
                }
            }
            Err(e) => tracing::error!("Failed to serialize user votes: {e}"),
        }
    }
}

struct Changed {
    report: MergeReport,
    rows: Vec<DictionaryRow>,
}
