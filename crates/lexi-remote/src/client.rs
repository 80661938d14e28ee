use async_trait::async_trait;
use lexi_core::{Filter, RemoteError, RemoteGateway};
use reqwest::{RequestBuilder, Response};
use serde_json::Value;

/// Gateway speaking the PostgREST dialect served under `/rest/v1`
#[derive(Clone)]
pub struct PostgrestGateway {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl PostgrestGateway {
    pub fn new(project_url: &str, api_key: &str) -> Self {
        Self {
            base_url: format!("{}/rest/v1", project_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RemoteGateway for PostgrestGateway {
    async fn select(&self, table: &str, columns: &str) -> Result<Vec<Value>, RemoteError> {
        let request = self
            .client
            .get(self.table_url(table))
            .query(&[("select", columns)]);

        self.send(request)
            .await?
            .json::<Vec<Value>>()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    async fn upsert(
        &self,
        table: &str,
        rows: Vec<Value>,
        on_conflict: &str,
    ) -> Result<(), RemoteError> {
        let request = self
            .client
            .post(self.table_url(table))
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&rows);

        self.send(request).await?;
        tracing::debug!("Upserted {} rows into {table}", rows.len());
        Ok(())
    }

    async fn delete(&self, table: &str, filter: Filter) -> Result<(), RemoteError> {
        let request = self
            .client
            .delete(self.table_url(table))
            .query(&[filter.to_query()]);

        self.send(request).await?;
        tracing::debug!("Deleted from {table} where {} = {}", filter.column, filter.value);
        Ok(())
    }

    async fn insert(&self, table: &str, row: Value) -> Result<(), RemoteError> {
        let request = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=minimal")
            .json(&row);

        self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url_ignores_trailing_slash() {
        let gateway = PostgrestGateway::new("https://abc.supabase.co/", "key");
        assert_eq!(
            gateway.table_url("word_votes"),
            "https://abc.supabase.co/rest/v1/word_votes"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        // Port 9 (discard) on localhost is expected to refuse connections
        let gateway = PostgrestGateway::new("http://127.0.0.1:9", "key");

        let result = gateway.select("dictionary_entries", "id").await;
        assert!(matches!(result, Err(RemoteError::Network(_))));
    }
}
