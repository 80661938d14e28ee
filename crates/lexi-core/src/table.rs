//! Admin table view: filter, sort and page through the whole collection.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use lexi_types::DictionaryEntry;

use crate::search::fold;

pub const PAGE_SIZE: usize = 10;

/// Column the table is ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Headword,
    Upvotes,
    Downvotes,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Headword => "headword",
            SortKey::Upvotes => "upvotes",
            SortKey::Downvotes => "downvotes",
        }
    }

    fn compare(&self, a: &DictionaryEntry, b: &DictionaryEntry) -> Ordering {
        match self {
            SortKey::Headword => a.headword.to_lowercase().cmp(&b.headword.to_lowercase()),
            SortKey::Upvotes => a.stats().upvotes.cmp(&b.stats().upvotes),
            SortKey::Downvotes => a.stats().downvotes.cmp(&b.stats().downvotes),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "headword" | "word" => Ok(SortKey::Headword),
            "upvotes" | "up" => Ok(SortKey::Upvotes),
            "downvotes" | "down" => Ok(SortKey::Downvotes),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableQuery {
    /// Substring of headword, a gloss or a tag; empty keeps everything
    pub filter: String,
    pub sort: SortKey,
    pub descending: bool,
    /// 1-based
    pub page: usize,
}

/// One page of the table
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    pub entries: Vec<DictionaryEntry>,
    /// Page actually shown, clamped into `1..=total_pages`
    pub page: usize,
    /// At least 1, an empty table still has one (empty) page
    pub total_pages: usize,
    pub total_matches: usize,
}

fn row_matches(entry: &DictionaryEntry, needle: &str) -> bool {
    let hit = |text: &str| fold(text).contains(needle);

    hit(&entry.headword)
        || entry
            .senses
            .iter()
            .any(|sense| hit(&sense.gloss) || sense.tags.iter().any(|tag| hit(tag.as_str())))
}

/// Filter then stable-sort, ties keep collection order in both directions
pub fn filter_and_sort(
    entries: Vec<DictionaryEntry>,
    filter: &str,
    sort: SortKey,
    descending: bool,
) -> Vec<DictionaryEntry> {
    let needle = fold(filter);
    let mut rows: Vec<_> = entries
        .into_iter()
        .filter(|entry| needle.is_empty() || row_matches(entry, &needle))
        .collect();

    rows.sort_by(|a, b| {
        let ordering = sort.compare(a, b);
        if descending { ordering.reverse() } else { ordering }
    });
    rows
}

pub fn paginate(rows: Vec<DictionaryEntry>, page: usize) -> TablePage {
    let total_matches = rows.len();
    let total_pages = total_matches.div_ceil(PAGE_SIZE).max(1);
    let page = page.clamp(1, total_pages);

    let entries = rows
        .into_iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();

    TablePage {
        entries,
        page,
        total_pages,
        total_matches,
    }
}

pub fn build_page(entries: Vec<DictionaryEntry>, query: &TableQuery) -> TablePage {
    let rows = filter_and_sort(entries, &query.filter, query.sort, query.descending);
    paginate(rows, query.page)
}

#[cfg(test)]
mod tests {
    use lexi_types::{CommunityStats, Lang, Sense};

    use super::*;

    fn row(headword: &str, up: u32, down: u32) -> DictionaryEntry {
        let mut entry = DictionaryEntry::new(headword, Lang::En, Lang::My)
            .with_sense(Sense::new("s1", "noun", format!("{headword} gloss"), "x"));
        entry.community_stats = Some(CommunityStats::new(up, down));
        entry
    }

    fn headwords(rows: &[DictionaryEntry]) -> Vec<&str> {
        rows.iter().map(|e| e.headword.as_str()).collect()
    }

    fn sample() -> Vec<DictionaryEntry> {
        vec![row("banana", 5, 0), row("Apple", 1, 3), row("cherry", 9, 1)]
    }

    #[test]
    fn test_sort_by_headword_ignores_case() {
        let rows = filter_and_sort(sample(), "", SortKey::Headword, false);
        assert_eq!(headwords(&rows), vec!["Apple", "banana", "cherry"]);

        let rows = filter_and_sort(sample(), "", SortKey::Headword, true);
        assert_eq!(headwords(&rows), vec!["cherry", "banana", "Apple"]);
    }

    #[test]
    fn test_sort_by_upvotes() {
        let rows = filter_and_sort(sample(), "", SortKey::Upvotes, false);
        assert_eq!(headwords(&rows), vec!["Apple", "banana", "cherry"]);

        let rows = filter_and_sort(sample(), "", SortKey::Upvotes, true);
        assert_eq!(headwords(&rows), vec!["cherry", "banana", "Apple"]);
    }

    #[test]
    fn test_sort_by_downvotes_missing_stats_count_as_zero() {
        let mut entries = sample();
        entries.push(DictionaryEntry::new("date", Lang::En, Lang::My));

        let rows = filter_and_sort(entries, "", SortKey::Downvotes, false);
        // banana and date tie at 0 and keep collection order
        assert_eq!(headwords(&rows), vec!["banana", "date", "cherry", "Apple"]);

        let rows = filter_and_sort(sample(), "", SortKey::Downvotes, true);
        assert_eq!(headwords(&rows), vec!["Apple", "cherry", "banana"]);
    }

    #[test]
    fn test_filter_covers_headword_gloss_and_tags_only() {
        let mut entries = sample();
        entries[0].senses[0].tags.push("Tropical".to_string());

        let by_tag = filter_and_sort(entries.clone(), "tropic", SortKey::Headword, false);
        assert_eq!(headwords(&by_tag), vec!["banana"]);

        let by_gloss = filter_and_sort(entries.clone(), "CHERRY GL", SortKey::Headword, false);
        assert_eq!(headwords(&by_gloss), vec!["cherry"]);

        // Definitions are not part of the table filter
        assert!(filter_and_sort(entries, "x", SortKey::Headword, false).is_empty());
    }

    #[test]
    fn test_page_bounds() {
        let rows: Vec<_> = (0..23).map(|i| row(&format!("w{i:02}"), 0, 0)).collect();

        let first = paginate(rows.clone(), 1);
        assert_eq!(first.entries.len(), PAGE_SIZE);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_matches, 23);
        assert_eq!(first.entries[0].headword, "w00");

        let last = paginate(rows.clone(), 3);
        assert_eq!(last.entries.len(), 3);
        assert_eq!(last.entries[0].headword, "w20");

        assert_eq!(paginate(rows.clone(), 0).page, 1);
        let beyond = paginate(rows, 99);
        assert_eq!(beyond.page, 3);
        assert_eq!(beyond.entries.len(), 3);
    }

    #[test]
    fn test_empty_table_has_one_page() {
        let page = paginate(Vec::new(), 5);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.entries.is_empty());
    }

    #[test]
    fn test_sort_key_parses() {
        assert_eq!("Up".parse::<SortKey>(), Ok(SortKey::Upvotes));
        assert_eq!("downvotes".parse::<SortKey>(), Ok(SortKey::Downvotes));
        assert!("rating".parse::<SortKey>().is_err());
    }
}
