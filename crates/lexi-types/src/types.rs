use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Languages an entry can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    My,
}

impl Lang {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::My => "my",
        }
    }
}

/// A dictionary entry and all of its senses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Assigned by the store on first insertion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub headword: String,
    pub source_lang: Lang,
    pub target_lang: Lang,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic_ipa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub romanization: Option<String>,
    #[serde(default)]
    pub senses: Vec<Sense>,
    /// Cached vote aggregate, the vote ledger is the source of truth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_stats: Option<CommunityStats>,
}

impl DictionaryEntry {
    pub fn new(headword: impl Into<String>, source_lang: Lang, target_lang: Lang) -> Self {
        Self {
            id: None,
            headword: headword.into(),
            source_lang,
            target_lang,
            phonetic_ipa: None,
            romanization: None,
            senses: Vec::new(),
            community_stats: None,
        }
    }

    pub fn with_sense(mut self, sense: Sense) -> Self {
        self.senses.push(sense);
        self
    }

    /// Case-insensitive key used to detect duplicates on import
    pub fn merge_key(&self) -> String {
        self.headword.to_lowercase()
    }

    pub fn stats(&self) -> CommunityStats {
        self.community_stats.unwrap_or_default()
    }
}

/// One meaning of a headword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sense {
    /// `s<N>`, unique within the owning entry
    pub sense_id: String,
    pub pos: String,
    pub gloss: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_note: Option<String>,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Sense {
    pub fn new(
        sense_id: impl Into<String>,
        pos: impl Into<String>,
        gloss: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            sense_id: sense_id.into(),
            pos: pos.into(),
            gloss: gloss.into(),
            definition: definition.into(),
            usage_note: None,
            examples: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_example(mut self, example: Example) -> Self {
        self.examples.push(example);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub src: String,
    pub tgt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_roman: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tgt_roman: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityStats {
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub downvotes: u32,
}

impl CommunityStats {
    pub fn new(upvotes: u32, downvotes: u32) -> Self {
        Self { upvotes, downvotes }
    }

    /// Saturates, imported counters are arbitrary
    pub fn total(&self) -> u32 {
        self.upvotes.saturating_add(self.downvotes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteDirection::Up => "up",
            VoteDirection::Down => "down",
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" | "+" => Ok(VoteDirection::Up),
            "down" | "-" => Ok(VoteDirection::Down),
            other => Err(format!("unknown vote direction: {other}")),
        }
    }
}

/// Row of the `word_votes` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordVote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub word_id: String,
    pub user_id: String,
    pub vote_type: VoteDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Pending,
    Approved,
    Rejected,
}

/// Row of the `word_suggestions` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSuggestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_word_id: Option<String>,
    pub user_id: String,
    pub proposed_content: DictionaryEntry,
    pub status: SuggestionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Row of the `dictionary_entries` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub headword: String,
    pub entry: DictionaryEntry,
}

impl From<&DictionaryEntry> for DictionaryRow {
    fn from(entry: &DictionaryEntry) -> Self {
        Self {
            id: entry.id.clone(),
            headword: entry.headword.clone(),
            entry: entry.clone(),
        }
    }
}
