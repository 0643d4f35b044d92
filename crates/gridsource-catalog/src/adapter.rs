//! Source adapter trait for discovering columns and fetching rows

use gridsource_core::{ColumnDefinition, SearchCriteria};
use serde_json::Value;

/// Errors that can occur inside a source adapter
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("Connection failed: {0}")]
    ConnectionError(String),

    #[error("Query failed: {0}")]
    QueryError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Trait for adapters that expose a paged, column-oriented data source
///
/// Fetching talks to the backing store and is async. Extraction works on
/// data that was already fetched and is synchronous.
#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Adapter-defined result of one fetch (e.g. a result page)
    type RawData: Send + Sync;

    /// A single record inside [`Self::RawData`]
    type Record: Send + Sync;

    /// Get the adapter name (e.g., "Memory", "JsonDocument")
    fn name(&self) -> &'static str;

    /// Column keys the source provides, in source order
    async fn column_keys(&self) -> Result<Vec<String>, SourceError>;

    /// Full definition of a discovered column
    async fn column_definition(&self, key: &str) -> Result<ColumnDefinition, SourceError>;

    /// Fetch the data selected by `criteria`
    async fn fetch_data(&self, criteria: &SearchCriteria) -> Result<Self::RawData, SourceError>;

    /// Records contained in fetched data
    fn extract_records(&self, raw: &Self::RawData) -> Result<Vec<Self::Record>, SourceError>;

    /// Total number of rows matching the criteria the data was fetched with
    fn extract_total_row_count(&self, raw: &Self::RawData) -> Result<usize, SourceError>;

    /// Value of one column of a record
    fn extract_value(&self, record: &Self::Record, key: &str) -> Result<Value, SourceError>;
}
