use lexi_types::DictionaryEntry;
use unicode_normalization::UnicodeNormalization;

/// NFC + lowercase, so composed and decomposed Myanmar text compare equal
pub fn fold(text: &str) -> String {
    text.trim().nfc().collect::<String>().to_lowercase()
}

/// Folded query, `None` for empty or whitespace-only input
pub fn prepare_query(query: &str) -> Option<String> {
    let folded = fold(query);
    if folded.is_empty() { None } else { Some(folded) }
}

/// Substring match against headword, glosses, definitions and tags
pub fn matches(entry: &DictionaryEntry, needle: &str) -> bool {
    let hit = |text: &str| fold(text).contains(needle);

    hit(&entry.headword)
        || entry.senses.iter().any(|sense| {
            hit(&sense.gloss)
                || hit(&sense.definition)
                || sense.tags.iter().any(|tag| hit(tag.as_str()))
        })
}

#[cfg(test)]
mod tests {
    use lexi_types::{Lang, Sense};

    use super::*;

    fn sample() -> DictionaryEntry {
        DictionaryEntry::new("Serendipity", Lang::En, Lang::My).with_sense(
            Sense::new("s1", "noun", "Happy accident", "ကံကောင်းခြင်း။")
                .with_tags(["literary", "abstract"]),
        )
    }

    #[test]
    fn test_blank_query_is_rejected() {
        assert_eq!(prepare_query(""), None);
        assert_eq!(prepare_query("   \t"), None);
        assert_eq!(prepare_query("  Ser "), Some("ser".to_string()));
    }

    #[test]
    fn test_matches_every_searchable_field() {
        let entry = sample();
        assert!(matches(&entry, "serendip"));
        assert!(matches(&entry, "accident"));
        assert!(matches(&entry, "ကံကောင်း"));
        assert!(matches(&entry, "liter"));
        assert!(!matches(&entry, "noun"));
    }
}
