//! Source adapter over a JSON document
//!
//! The document declares its columns and carries the rows inline:
//!
//! ```json
//! {
//!   "columns": [{"key": "sku", "label": "SKU"}, {"key": "name"}],
//!   "rows": [{"sku": "A-1", "name": "Anvil"}]
//! }
//! ```

use crate::adapter::{SourceAdapter, SourceError};
use crate::page::{Row, RowPage};
use gridsource_core::{ColumnAttributes, ColumnDefinition, ColumnFactory, SearchCriteria};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct JsonDocument {
    #[serde(default)]
    columns: Vec<ColumnAttributes>,

    #[serde(default)]
    rows: Vec<Row>,
}

/// Serves columns and rows from a parsed JSON document
#[derive(Debug, Clone)]
pub struct JsonDocumentAdapter {
    columns: Vec<ColumnDefinition>,
    rows: Vec<Row>,
}

impl JsonDocumentAdapter {
    /// Load a document from disk
    pub fn from_file(path: &Path) -> Result<Self, SourceError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SourceError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }

    /// Parse a document from a string
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let document: JsonDocument = serde_json::from_str(json)
            .map_err(|e| SourceError::InvalidResponse(e.to_string()))?;

        let factory = ColumnFactory::new();
        let columns = document
            .columns
            .into_iter()
            .map(|attributes| factory.create(attributes))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SourceError::InvalidResponse(e.to_string()))?;

        Ok(Self {
            columns,
            rows: document.rows,
        })
    }

    /// Number of rows in the document
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[async_trait::async_trait]
impl SourceAdapter for JsonDocumentAdapter {
    type RawData = RowPage;
    type Record = Row;

    fn name(&self) -> &'static str {
        "JsonDocument"
    }

    async fn column_keys(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.columns.iter().map(|c| c.key().to_string()).collect())
    }

    async fn column_definition(&self, key: &str) -> Result<ColumnDefinition, SourceError> {
        self.columns
            .iter()
            .find(|c| c.key() == key)
            .cloned()
            .ok_or_else(|| SourceError::UnknownColumn(key.to_string()))
    }

    async fn fetch_data(&self, criteria: &SearchCriteria) -> Result<RowPage, SourceError> {
        Ok(RowPage::select(&self.rows, criteria))
    }

    fn extract_records(&self, raw: &RowPage) -> Result<Vec<Row>, SourceError> {
        Ok(raw.records.clone())
    }

    fn extract_total_row_count(&self, raw: &RowPage) -> Result<usize, SourceError> {
        Ok(raw.total)
    }

    fn extract_value(&self, record: &Row, key: &str) -> Result<Value, SourceError> {
        Ok(record.get(key).cloned().unwrap_or(Value::Null))
    }
}
