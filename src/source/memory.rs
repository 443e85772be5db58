use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use super::{DataSource, SourceError, Table};

/// Collections held in memory. Used for tests and offline previews.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    collections: HashMap<String, Vec<Value>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, collection: &str, rows: Vec<Value>) -> Self {
        self.collections.insert(collection.to_string(), rows);
        self
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn fetch_all(&self, collection: &str) -> Result<Table, SourceError> {
        let rows = self
            .collections
            .get(collection)
            .ok_or_else(|| SourceError::UnknownCollection(collection.to_string()))?;
        Table::from_json(collection, Value::Array(rows.clone()))
    }
}
