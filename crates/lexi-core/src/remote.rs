use async_trait::async_trait;
use lexi_config::remote::RemoteConfig;
use serde_json::Value;

/// Conflict target for dictionary rows
pub const ENTRY_CONFLICT: &str = "headword";
/// Conflict target for vote rows
pub const VOTE_CONFLICT: &str = "word_id,user_id";

/// Table-based remote backend. Every call is fallible, the store never
/// waits on one.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Fetch `columns` (comma separated) of every row in `table`
    async fn select(&self, table: &str, columns: &str) -> Result<Vec<Value>, RemoteError>;

    /// Insert or merge `rows`, resolving conflicts on `on_conflict`
    async fn upsert(
        &self,
        table: &str,
        rows: Vec<Value>,
        on_conflict: &str,
    ) -> Result<(), RemoteError>;

    /// Delete every row matching `filter`
    async fn delete(&self, table: &str, filter: Filter) -> Result<(), RemoteError>;

    async fn insert(&self, table: &str, row: Value) -> Result<(), RemoteError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Failed to encode row: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Equality predicate on a single column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// PostgREST query pair, e.g. `("headword", "eq.apple")`
    pub fn to_query(&self) -> (String, String) {
        (self.column.clone(), format!("eq.{}", self.value))
    }
}

/// Names of the remote tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tables {
    pub entries: String,
    pub votes: String,
    pub suggestions: String,
}

impl Default for Tables {
    fn default() -> Self {
        Self::from(&RemoteConfig::default())
    }
}

impl From<&RemoteConfig> for Tables {
    fn from(config: &RemoteConfig) -> Self {
        Self {
            entries: config.entries_table.clone(),
            votes: config.votes_table.clone(),
            suggestions: config.suggestions_table.clone(),
        }
    }
}

/// Used when no backend is configured: accepts every write, selects nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineGateway;

#[async_trait]
impl RemoteGateway for OfflineGateway {
    async fn select(&self, table: &str, _columns: &str) -> Result<Vec<Value>, RemoteError> {
        tracing::debug!("[offline] select from {table}");
        Ok(Vec::new())
    }

    async fn upsert(
        &self,
        table: &str,
        rows: Vec<Value>,
        _on_conflict: &str,
    ) -> Result<(), RemoteError> {
        tracing::debug!("[offline] upsert {} rows into {table}", rows.len());
        Ok(())
    }

    async fn delete(&self, table: &str, filter: Filter) -> Result<(), RemoteError> {
        tracing::debug!("[offline] delete from {table} where {} = {}", filter.column, filter.value);
        Ok(())
    }

    async fn insert(&self, table: &str, _row: Value) -> Result<(), RemoteError> {
        tracing::debug!("[offline] insert into {table}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_query_pair() {
        let filter = Filter::eq("headword", "ice cream");
        assert_eq!(
            filter.to_query(),
            ("headword".to_string(), "eq.ice cream".to_string())
        );
    }

    #[test]
    fn test_default_tables() {
        let tables = Tables::default();
        assert_eq!(tables.entries, "dictionary_entries");
        assert_eq!(tables.votes, "word_votes");
        assert_eq!(tables.suggestions, "word_suggestions");
    }

    #[tokio::test]
    async fn test_offline_gateway_accepts_everything() {
        let gateway = OfflineGateway;
        assert!(gateway.select("t", "*").await.unwrap().is_empty());
        assert!(gateway.upsert("t", vec![Value::Null], "id").await.is_ok());
        assert!(gateway.delete("t", Filter::eq("id", "1")).await.is_ok());
        assert!(gateway.insert("t", Value::Null).await.is_ok());
    }
}
