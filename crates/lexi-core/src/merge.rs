//! Import merge: candidates are folded into the collection by
//! case-insensitive headword, new senses are appended and renumbered.

use std::collections::{HashMap, HashSet};

use lexi_types::{DictionaryEntry, Sense};
use serde::Serialize;
use uuid::Uuid;

use crate::ledger::VoteLedger;

/// Counts returned by an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub added: usize,
    pub updated: usize,
}

impl MergeReport {
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.updated == 0
    }
}

/// Result of folding a batch into a collection
#[derive(Debug)]
pub(crate) struct MergeOutcome {
    pub collection: Vec<DictionaryEntry>,
    pub report: MergeReport,
    /// Added and updated entries in their final form
    pub changed: Vec<DictionaryEntry>,
}

pub(crate) fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Clone, Copy)]
enum Slot {
    Existing(usize),
    Added(usize),
}

/// Merge `candidates` into `collection`.
///
/// Headwords must be non-empty, blank ones are keyed like any other string.
/// Stats carried by a candidate overwrite the ledger counters for the
/// resolved id.
pub(crate) fn merge_entries(
    collection: Vec<DictionaryEntry>,
    candidates: Vec<DictionaryEntry>,
    ledger: &mut VoteLedger,
) -> MergeOutcome {
    let mut existing = collection;
    let mut added: Vec<DictionaryEntry> = Vec::new();
    let mut updated_slots: Vec<usize> = Vec::new();
    // Counted per candidate that brought new senses, like the upsert batch
    let mut updated = 0;

    let mut by_key: HashMap<String, Slot> = HashMap::new();
    for (idx, entry) in existing.iter().enumerate() {
        by_key.entry(entry.merge_key()).or_insert(Slot::Existing(idx));
    }
    let mut known_ids: HashSet<String> = existing.iter().filter_map(|e| e.id.clone()).collect();

    for mut candidate in candidates {
        let key = candidate.merge_key();
        let stats = candidate.community_stats.take();

        let id = match by_key.get(&key).copied() {
            None => {
                let id = match candidate.id.take() {
                    Some(id) if !known_ids.contains(&id) => id,
                    Some(id) => {
                        tracing::warn!("Import id {id} already taken, assigning a new one");
                        fresh_id()
                    }
                    None => fresh_id(),
                };
                known_ids.insert(id.clone());
                candidate.id = Some(id.clone());

                by_key.insert(key, Slot::Added(added.len()));
                added.push(candidate);
                id
            }
            Some(Slot::Existing(idx)) => {
                let target = &mut existing[idx];
                let id = ensure_id(target, &mut known_ids);
                if append_new_senses(target, candidate.senses) {
                    updated += 1;
                    if !updated_slots.contains(&idx) {
                        updated_slots.push(idx);
                    }
                }
                id
            }
            Some(Slot::Added(idx)) => {
                // Already prepended by this batch, so it merges like any other entry
                let target = &mut added[idx];
                if append_new_senses(target, candidate.senses) {
                    updated += 1;
                }
                target.id.clone().unwrap_or_default()
            }
        };

        if let Some(stats) = stats {
            ledger.set_stats(&id, stats);
        }
    }

    let report = MergeReport {
        added: added.len(),
        updated,
    };

    let mut changed: Vec<DictionaryEntry> = added.iter().cloned().collect();
    changed.extend(updated_slots.iter().map(|&idx| existing[idx].clone()));

    // Each new entry is prepended, so the last candidate ends up first
    added.reverse();
    added.extend(existing);

    MergeOutcome {
        collection: added,
        report,
        changed,
    }
}

fn ensure_id(entry: &mut DictionaryEntry, known_ids: &mut HashSet<String>) -> String {
    match &entry.id {
        Some(id) => id.clone(),
        None => {
            let id = fresh_id();
            known_ids.insert(id.clone());
            entry.id = Some(id.clone());
            id
        }
    }
}

/// A sense is known when a gloss matches ignoring case or a definition
/// matches exactly. Returns true if anything was appended.
fn append_new_senses(entry: &mut DictionaryEntry, incoming: Vec<Sense>) -> bool {
    let mut appended = false;

    for sense in incoming {
        let gloss = sense.gloss.to_lowercase();
        let known = entry
            .senses
            .iter()
            .any(|s| s.gloss.to_lowercase() == gloss || s.definition == sense.definition);
        if known {
            continue;
        }

        let sense_id = format!("s{}", entry.senses.len() + 1);
        entry.senses.push(Sense { sense_id, ..sense });
        appended = true;
    }

    appended
}
