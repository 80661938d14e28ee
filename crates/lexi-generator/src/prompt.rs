use lexi_types::DictionaryEntry;
use serde_json::{Value, json};

pub const SYSTEM_INSTRUCTION: &str = r#"You are an English to Myanmar lexicographer.
Answer only with dictionary entries that follow the provided JSON schema.

Rules:
1. Headwords are lowercase unless they are proper nouns.
2. When a word has several meanings, the most common meaning is sense 1.
3. Every sense carries tags describing its register or domain (general, slang, legal, food, ...).
4. Myanmar definitions and translations use natural phrasing in proper Unicode."#;

pub fn generate_words(topic: &str, count: u32) -> String {
    format!(
        "Generate {count} unique intermediate-to-advanced English words related to the topic \"{topic}\".\n\
         Put the general meaning first when a word is common in everyday English.\n\
         The target language is Myanmar ('my'). Return a JSON array and do not repeat words."
    )
}

pub fn define_word(word: &str) -> String {
    format!(
        "Define the English word \"{word}\" with up to 3 senses.\n\
         The target language is Myanmar ('my'). Return a JSON array holding a single entry."
    )
}

pub fn check_and_correct(entry: &DictionaryEntry) -> Result<String, serde_json::Error> {
    let entry = serde_json::to_string(entry)?;
    Ok(format!(
        "Review this dictionary entry: {entry}\n\
         Fix English and Myanmar typos, make the Myanmar translations natural, \
         correct the IPA and fill any missing or empty field.\n\
         Return the corrected entry as a JSON array holding one object."
    ))
}

pub fn enrich_examples(entry: &DictionaryEntry) -> Result<String, serde_json::Error> {
    let entry = serde_json::to_string(entry)?;
    Ok(format!(
        "Take this dictionary entry: {entry}\n\
         Add 2-3 new high-quality examples to every sense. Keep existing examples unless they are wrong.\n\
         Return the updated entry as a JSON array holding one object."
    ))
}

/// Response schema mirroring `DictionaryEntry`
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "headword": { "type": "STRING", "description": "English word, lowercase unless a proper noun" },
                "source_lang": { "type": "STRING", "enum": ["en"] },
                "target_lang": { "type": "STRING", "enum": ["my"] },
                "phonetic_ipa": { "type": "STRING", "description": "IPA pronunciation" },
                "senses": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "sense_id": { "type": "STRING" },
                            "pos": { "type": "STRING", "description": "Part of speech" },
                            "gloss": { "type": "STRING", "description": "Short English gloss" },
                            "definition": { "type": "STRING", "description": "Full Myanmar definition" },
                            "examples": {
                                "type": "ARRAY",
                                "items": {
                                    "type": "OBJECT",
                                    "properties": {
                                        "src": { "type": "STRING", "description": "English example sentence" },
                                        "tgt": { "type": "STRING", "description": "Myanmar translation" },
                                        "tgt_roman": { "type": "STRING", "description": "Romanized Myanmar translation" }
                                    },
                                    "required": ["src", "tgt"]
                                }
                            },
                            "tags": { "type": "ARRAY", "items": { "type": "STRING" } }
                        },
                        "required": ["sense_id", "pos", "gloss", "definition", "examples", "tags"]
                    }
                }
            },
            "required": ["headword", "source_lang", "target_lang", "senses"]
        }
    })
}
