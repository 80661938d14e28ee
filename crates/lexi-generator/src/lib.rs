mod gemini;
mod prompt;

use lexi_types::DictionaryEntry;

pub use gemini::GeminiGenerator;

/// Generative content provider producing schema-shaped dictionary entries
#[async_trait::async_trait]
pub trait EntryGenerator: Send + Sync {
    /// `count` new words around `topic`
    async fn generate_words(
        &self,
        topic: &str,
        count: u32,
    ) -> Result<Vec<DictionaryEntry>, GenerateError>;

    /// Full entry for a single word
    async fn define_word(&self, word: &str) -> Result<Option<DictionaryEntry>, GenerateError>;

    /// Fix typos, translations and missing fields of an existing entry
    async fn check_and_correct(
        &self,
        entry: &DictionaryEntry,
    ) -> Result<Option<DictionaryEntry>, GenerateError>;

    /// Add examples to every sense of an existing entry
    async fn enrich_examples(
        &self,
        entry: &DictionaryEntry,
    ) -> Result<Option<DictionaryEntry>, GenerateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("API key is missing, cannot generate entries")]
    MissingApiKey,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("API error: HTTP {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Decode generator output. Empty text is an empty result, unparseable
/// JSON is an error, individual entries that do not fit the schema are
/// dropped.
pub fn parse_entries(text: &str) -> Result<Vec<DictionaryEntry>, GenerateError> {
    let text = strip_code_fence(text.trim());
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| GenerateError::Malformed(e.to_string()))?;

    let items = match value {
        serde_json::Value::Array(items) => items,
        object @ serde_json::Value::Object(_) => vec![object],
        other => {
            return Err(GenerateError::Malformed(format!(
                "expected an array of entries, got {other}"
            )));
        }
    };

    let entries = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<DictionaryEntry>(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Dropping generated entry that does not fit the schema: {e}");
                None
            }
        })
        .collect();

    Ok(sanitize_entries(entries))
}

/// Drop entries the store cannot key and renumber sense ids
pub fn sanitize_entries(entries: Vec<DictionaryEntry>) -> Vec<DictionaryEntry> {
    entries
        .into_iter()
        .filter(|entry| !entry.headword.trim().is_empty())
        .map(|mut entry| {
            entry.headword = entry.headword.trim().to_string();
            for (i, sense) in entry.senses.iter_mut().enumerate() {
                sense.sense_id = format!("s{}", i + 1);
            }
            entry
        })
        .collect()
}

fn strip_code_fence(text: &str) -> &str {
    let Some(body) = text.strip_prefix("```") else {
        return text;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERATED: &str = r#"[
        {
            "headword": " ghost ",
            "source_lang": "en",
            "target_lang": "my",
            "phonetic_ipa": "/ɡəʊst/",
            "senses": [
                { "sense_id": "1", "pos": "noun", "gloss": "Spirit", "definition": "တစ္ဆေ", "examples": [], "tags": ["general"] },
                { "sense_id": "x", "pos": "verb", "gloss": "To ignore someone", "definition": "လျစ်လျူရှုသည်", "examples": [], "tags": ["slang"] }
            ]
        },
        { "headword": "", "source_lang": "en", "target_lang": "my", "senses": [] },
        { "headword": "broken", "source_lang": "de", "target_lang": "my", "senses": [] }
    ]"#;

    #[test]
    fn test_parse_keeps_only_valid_entries() {
        let entries = parse_entries(GENERATED).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].headword, "ghost");
        assert_eq!(entries[0].senses[0].sense_id, "s1");
        assert_eq!(entries[0].senses[1].sense_id, "s2");
    }

    #[test]
    fn test_empty_text_is_empty_result() {
        assert!(parse_entries("").unwrap().is_empty());
        assert!(parse_entries("  \n").unwrap().is_empty());
        assert!(parse_entries("[]").unwrap().is_empty());
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            parse_entries("I could not do that"),
            Err(GenerateError::Malformed(_))
        ));
        assert!(matches!(parse_entries("42"), Err(GenerateError::Malformed(_))));
    }

    #[test]
    fn test_single_object_and_code_fence_accepted() {
        let text = "```json\n{ \"headword\": \"cap\", \"source_lang\": \"en\", \"target_lang\": \"my\", \"senses\": [] }\n```";
        let entries = parse_entries(text).unwrap();
        assert_eq!(entries[0].headword, "cap");
    }
}
