use lexi_types::DictionaryEntry;

const SEED_JSON: &str = include_str!("../data/seed.json");

/// Entries bundled with the binary, used when no local snapshot exists
pub fn default_entries() -> Vec<DictionaryEntry> {
    serde_json::from_str(SEED_JSON).unwrap_or_else(|e| {
        tracing::error!("Bundled seed data is invalid: {e}");
        Vec::new()
    })
}
