use std::fmt::Write;

use lexi_core::{MergeReport, TablePage};
use lexi_types::DictionaryEntry;

/// Multi-line card for one entry
pub fn render_entry(entry: &DictionaryEntry) -> String {
    let stats = entry.stats();
    let mut out = entry.headword.clone();

    if let Some(ipa) = &entry.phonetic_ipa {
        let _ = write!(out, " {ipa}");
    }
    let _ = write!(out, "  +{} -{}", stats.upvotes, stats.downvotes);
    if let Some(id) = &entry.id {
        let _ = write!(out, "  [{id}]");
    }

    for (i, sense) in entry.senses.iter().enumerate() {
        let _ = write!(
            out,
            "\n  {}. ({}) {}: {}",
            i + 1,
            sense.pos,
            sense.gloss,
            sense.definition
        );
        if !sense.tags.is_empty() {
            let _ = write!(out, " #{}", sense.tags.join(" #"));
        }
        for example in &sense.examples {
            let _ = write!(out, "\n       \"{}\" - {}", example.src, example.tgt);
        }
    }

    out
}

/// One line per entry
pub fn render_list(entries: &[DictionaryEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            let gloss = entry
                .senses
                .first()
                .map(|s| s.gloss.as_str())
                .unwrap_or_default();
            let id = entry.id.as_deref().unwrap_or("-");
            format!("{:<20} {gloss}  [{id}]", entry.headword)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fixed-width table with a page footer
pub fn render_table(page: &TablePage) -> String {
    let mut out = format!("{:<20} {:<32} {:>6} {:>6}", "HEADWORD", "GLOSS", "UP", "DOWN");

    for entry in &page.entries {
        let stats = entry.stats();
        let gloss = entry
            .senses
            .first()
            .map(|s| s.gloss.as_str())
            .unwrap_or_default();
        let _ = write!(
            out,
            "\n{:<20} {:<32} {:>6} {:>6}",
            entry.headword, gloss, stats.upvotes, stats.downvotes
        );
    }

    let _ = write!(
        out,
        "\nPage {}/{} ({} entries)",
        page.page, page.total_pages, page.total_matches
    );
    out
}

pub fn render_report(report: &MergeReport) -> String {
    format!("{} added, {} updated", report.added, report.updated)
}
