use lexi_types::{DictionaryEntry, SuggestionStatus, WordSuggestion};

use crate::remote::{RemoteError, RemoteGateway};

/// File a pending edit proposal. Unlike store writes this is awaited and
/// the caller sees the failure.
pub async fn submit_suggestion(
    gateway: &dyn RemoteGateway,
    table: &str,
    original_word_id: Option<String>,
    user_id: &str,
    proposed: DictionaryEntry,
) -> Result<(), RemoteError> {
    let suggestion = WordSuggestion {
        id: None,
        original_word_id,
        user_id: user_id.to_string(),
        proposed_content: proposed,
        status: SuggestionStatus::Pending,
        created_at: None,
    };
    let row = serde_json::to_value(&suggestion)?;

    match gateway.insert(table, row).await {
        Ok(()) => {
            tracing::info!("Suggestion for '{}' submitted", suggestion.proposed_content.headword);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Suggestion submit error: {e}");
            Err(e)
        }
    }
}
