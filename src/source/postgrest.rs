//! HTTP client for the hosted table backend (PostgREST dialect).

use async_trait::async_trait;
use serde_json::Value;

use super::{DataSource, SourceError, Table};

/// Reads whole collections from `{base_url}/rest/v1/{collection}`.
pub struct PostgrestSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PostgrestSource {
    /// * `base_url` - Project URL, e.g. `https://project.supabase.co`.
    /// * `api_key` - Key sent both as `apikey` and as bearer token.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn collection_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{}?select=*", self.base_url, collection)
    }
}

#[async_trait]
impl DataSource for PostgrestSource {
    async fn fetch_all(&self, collection: &str) -> Result<Table, SourceError> {
        let response = self
            .client
            .get(self.collection_url(collection))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(SourceError::Api {
                collection: collection.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json().await?;
        Table::from_json(collection, payload)
    }
}
