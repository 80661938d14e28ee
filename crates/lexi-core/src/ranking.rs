use lexi_types::{CommunityStats, DictionaryEntry};

/// Outcome of asking for the next entry to review
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewPick {
    Candidate(DictionaryEntry),
    /// The user already voted on everything
    AllCaughtUp,
    /// The collection holds no entries at all
    Empty,
}

impl ReviewPick {
    pub fn into_entry(self) -> Option<DictionaryEntry> {
        match self {
            ReviewPick::Candidate(entry) => Some(entry),
            _ => None,
        }
    }
}

/// Ascending sort key: untouched entries first, then fewest downvotes,
/// then lowest total engagement.
pub fn engagement_key(stats: &CommunityStats) -> (bool, u32, u32) {
    let total = stats.total();
    (total > 0, stats.downvotes, total)
}

/// Stable sort by [`engagement_key`], ties keep collection order
pub fn rank_for_review(mut candidates: Vec<DictionaryEntry>) -> Vec<DictionaryEntry> {
    candidates.sort_by_key(|entry| engagement_key(&entry.stats()));
    candidates
}

#[cfg(test)]
mod tests {
    use lexi_types::Lang;

    use super::*;

    fn with_stats(headword: &str, up: u32, down: u32) -> DictionaryEntry {
        let mut entry = DictionaryEntry::new(headword, Lang::En, Lang::My);
        entry.community_stats = Some(CommunityStats::new(up, down));
        entry
    }

    #[test]
    fn test_zero_total_beats_any_engagement() {
        let ranked = rank_for_review(vec![
            with_stats("B", 5, 0),
            with_stats("C", 2, 1),
            with_stats("D", 0, 3),
            with_stats("A", 0, 0),
        ]);

        let order: Vec<_> = ranked.iter().map(|e| e.headword.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_total_breaks_downvote_ties() {
        let ranked = rank_for_review(vec![with_stats("busy", 9, 1), with_stats("quiet", 1, 1)]);
        assert_eq!(ranked[0].headword, "quiet");
    }

    #[test]
    fn test_missing_stats_count_as_fresh() {
        let fresh = DictionaryEntry::new("fresh", Lang::En, Lang::My);
        let ranked = rank_for_review(vec![with_stats("voted", 1, 0), fresh]);
        assert_eq!(ranked[0].headword, "fresh");
    }

    #[test]
    fn test_full_ties_keep_collection_order() {
        let ranked = rank_for_review(vec![
            with_stats("first", 0, 0),
            with_stats("second", 0, 0),
            with_stats("third", 0, 0),
        ]);
        let order: Vec<_> = ranked.iter().map(|e| e.headword.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }
}
