use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::SourceError;

/// A cell that could not be read into its field. The field is left empty
/// and the rest of the row is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeIssue {
    pub collection: String,
    pub index: usize,
    pub column: String,
    pub message: String,
}

impl fmt::Display for DecodeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} row {}, column '{}': {}",
            self.collection, self.index, self.column, self.message
        )
    }
}

/// Rows of one collection as returned by the backend.
///
/// `columns` is the union of the row keys in first-seen order, so a column
/// that the backend never returns can be detected before charting it.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

impl Table {
    pub fn from_rows(rows: Vec<Map<String, Value>>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    /// Build a table from a JSON array payload. Anything other than an array
    /// of objects is rejected.
    pub fn from_json(collection: &str, payload: Value) -> Result<Self, SourceError> {
        let Value::Array(items) = payload else {
            return Err(SourceError::Shape {
                collection: collection.to_string(),
                message: "expected a JSON array".to_string(),
            });
        };
        let mut rows = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(map) => rows.push(map),
                other => {
                    return Err(SourceError::Shape {
                        collection: collection.to_string(),
                        message: format!("row {index} is not an object: {other}"),
                    });
                }
            }
        }
        Ok(Self::from_rows(rows))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// True when rows came back but none of them carries `name`. An empty
    /// table says nothing about its columns.
    pub fn lacks_column(&self, name: &str) -> bool {
        !self.is_empty() && !self.has_column(name)
    }

    /// Decode every row into `T`, keeping row order. A row with unreadable
    /// cells is decoded without them and each such cell is reported.
    pub fn decode<T>(&self, collection: &str) -> (Vec<T>, Vec<DecodeIssue>)
    where
        T: DeserializeOwned + Default,
    {
        let mut records = Vec::with_capacity(self.rows.len());
        let mut issues = Vec::new();

        for (index, row) in self.rows.iter().enumerate() {
            if let Ok(record) = serde_json::from_value::<T>(Value::Object(row.clone())) {
                records.push(record);
                continue;
            }

            // Find the offending cells one column at a time
            let mut readable = Map::new();
            for (column, value) in row {
                let single: Map<String, Value> = [(column.clone(), value.clone())].into_iter().collect();
                match serde_json::from_value::<T>(Value::Object(single)) {
                    Ok(_) => {
                        readable.insert(column.clone(), value.clone());
                    }
                    Err(e) => {
                        let issue = DecodeIssue {
                            collection: collection.to_string(),
                            index,
                            column: column.clone(),
                            message: e.to_string(),
                        };
                        log::warn!("Unreadable value in {issue}");
                        issues.push(issue);
                    }
                }
            }
            records.push(serde_json::from_value(Value::Object(readable)).unwrap_or_default());
        }

        (records, issues)
    }
}
