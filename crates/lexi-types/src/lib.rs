pub mod types;

pub use types::{
    CommunityStats, DictionaryEntry, DictionaryRow, Example, Lang, Sense, SuggestionStatus,
    VoteDirection, WordSuggestion, WordVote,
};
