use std::collections::HashMap;

use lexi_types::{CommunityStats, VoteDirection};
use serde::{Deserialize, Serialize};

/// user id -> entry id -> that user's current vote
pub type UserVotes = HashMap<String, HashMap<String, VoteDirection>>;

/// Aggregate vote counters for one entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub up: u32,
    pub down: u32,
}

impl VoteTally {
    fn add(&mut self, direction: VoteDirection) {
        match direction {
            VoteDirection::Up => self.up = self.up.saturating_add(1),
            VoteDirection::Down => self.down = self.down.saturating_add(1),
        }
    }

    // Imported counts can be lower than what this session already counted
    fn retract(&mut self, direction: VoteDirection) {
        match direction {
            VoteDirection::Up => self.up = self.up.saturating_sub(1),
            VoteDirection::Down => self.down = self.down.saturating_sub(1),
        }
    }
}

impl From<CommunityStats> for VoteTally {
    fn from(stats: CommunityStats) -> Self {
        Self {
            up: stats.upvotes,
            down: stats.downvotes,
        }
    }
}

impl From<VoteTally> for CommunityStats {
    fn from(tally: VoteTally) -> Self {
        CommunityStats::new(tally.up, tally.down)
    }
}

/// Aggregate counters plus each acting user's last vote per entry
#[derive(Debug, Clone, Default)]
pub struct VoteLedger {
    tallies: HashMap<String, VoteTally>,
    user_votes: UserVotes,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self, entry_id: &str) -> Option<CommunityStats> {
        self.tallies.get(entry_id).copied().map(CommunityStats::from)
    }

    /// Last-write-wins overwrite of the aggregate counters
    pub fn set_stats(&mut self, entry_id: &str, stats: CommunityStats) {
        self.tallies.insert(entry_id.to_string(), stats.into());
    }

    pub fn user_vote(&self, entry_id: &str, user_id: &str) -> Option<VoteDirection> {
        self.user_votes
            .get(user_id)
            .and_then(|votes| votes.get(entry_id))
            .copied()
    }

    pub fn has_voted(&self, entry_id: &str, user_id: &str) -> bool {
        self.user_vote(entry_id, user_id).is_some()
    }

    /// Apply one vote: same direction retracts, opposite direction swaps.
    /// Returns the user's vote after the call.
    pub fn cast(
        &mut self,
        entry_id: &str,
        user_id: &str,
        direction: VoteDirection,
    ) -> Option<VoteDirection> {
        let previous = self.user_vote(entry_id, user_id);
        let tally = self.tallies.entry(entry_id.to_string()).or_default();

        if previous == Some(direction) {
            tally.retract(direction);
            self.clear_user_vote(entry_id, user_id);
            return None;
        }

        if let Some(previous) = previous {
            tally.retract(previous);
        }
        tally.add(direction);

        self.user_votes
            .entry(user_id.to_string())
            .or_default()
            .insert(entry_id.to_string(), direction);

        Some(direction)
    }

    /// Drop every trace of an entry
    pub fn forget(&mut self, entry_id: &str) {
        self.tallies.remove(entry_id);
        self.user_votes.retain(|_, votes| {
            votes.remove(entry_id);
            !votes.is_empty()
        });
    }

    pub fn user_votes(&self) -> &UserVotes {
        &self.user_votes
    }

    pub fn restore_user_votes(&mut self, user_votes: UserVotes) {
        self.user_votes = user_votes;
    }

    fn clear_user_vote(&mut self, entry_id: &str, user_id: &str) {
        if let Some(votes) = self.user_votes.get_mut(user_id) {
            votes.remove(entry_id);
            if votes.is_empty() {
                self.user_votes.remove(user_id);
            }
        }
    }
}
