//! In-memory source adapter for testing
//!
//! This adapter serves predefined columns and rows without touching any
//! backing store. It's useful for:
//! - Unit testing column reconciliation
//! - Exercising the paginated row stream
//! - Simulating stale totals, vanishing pages and fetch failures
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gridsource_catalog::{MemoryAdapterBuilder, SourceAdapter};
//! use serde_json::json;
//!
//! let adapter = MemoryAdapterBuilder::new()
//!     .with_keys(["sku", "name"])
//!     .with_row(json!({"sku": "A-1", "name": "Anvil"}))
//!     .build();
//!
//! let keys = adapter.column_keys().await?;
//! ```
//!
//! ## Simulating Failures
//!
//! ```rust,ignore
//! // Report more rows than exist
//! let adapter = MemoryAdapterBuilder::new().with_reported_total(450).build();
//!
//! // Fail when page 2 is fetched
//! adapter.add_error_for_page(2, SourceError::QueryError("timeout".into())).await;
//! ```

use crate::adapter::{SourceAdapter, SourceError};
use crate::page::{Row, RowPage};
use gridsource_core::{ColumnDefinition, SearchCriteria};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory source adapter
///
/// Clones share columns, rows, injected errors and the fetch counter, so a
/// test can keep a handle while the engine owns another.
pub struct MemoryAdapter {
    /// Discovered columns, in source order
    columns: Arc<RwLock<Vec<ColumnDefinition>>>,

    /// Backing rows
    rows: Arc<RwLock<Vec<Row>>>,

    /// Errors to return when a specific page is fetched
    page_errors: Arc<RwLock<HashMap<usize, SourceError>>>,

    /// Number of `fetch_data` calls so far
    fetches: Arc<AtomicUsize>,

    /// Total to report instead of the real row count
    reported_total: Option<usize>,

    /// Pages from this one on come back empty
    empty_from_page: Option<usize>,

    /// Name to return from name() method
    adapter_name: &'static str,
}

impl MemoryAdapter {
    /// Create an adapter with no columns and no rows
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), Vec::new())
    }

    /// Create an adapter from pre-built columns and rows
    pub fn from_parts(columns: Vec<ColumnDefinition>, rows: Vec<Row>) -> Self {
        Self {
            columns: Arc::new(RwLock::new(columns)),
            rows: Arc::new(RwLock::new(rows)),
            page_errors: Arc::new(RwLock::new(HashMap::new())),
            fetches: Arc::new(AtomicUsize::new(0)),
            reported_total: None,
            empty_from_page: None,
            adapter_name: "Memory",
        }
    }

    /// Append a discovered column
    pub async fn add_column(&self, column: ColumnDefinition) {
        self.columns.write().await.push(column);
    }

    /// Append a row
    pub async fn add_row(&self, row: Row) {
        self.rows.write().await.push(row);
    }

    /// Drop every row
    pub async fn clear_rows(&self) {
        self.rows.write().await.clear();
    }

    /// Number of rows held
    pub async fn row_count(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Configure an error to be returned when `page` is fetched
    pub async fn add_error_for_page(&self, page: usize, error: SourceError) {
        self.page_errors.write().await.insert(page, error);
    }

    /// Number of times data was fetched
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryAdapter {
    fn clone(&self) -> Self {
        Self {
            columns: Arc::clone(&self.columns),
            rows: Arc::clone(&self.rows),
            page_errors: Arc::clone(&self.page_errors),
            fetches: Arc::clone(&self.fetches),
            reported_total: self.reported_total,
            empty_from_page: self.empty_from_page,
            adapter_name: self.adapter_name,
        }
    }
}

#[async_trait::async_trait]
impl SourceAdapter for MemoryAdapter {
    type RawData = RowPage;
    type Record = Row;

    fn name(&self) -> &'static str {
        self.adapter_name
    }

    async fn column_keys(&self) -> Result<Vec<String>, SourceError> {
        let columns = self.columns.read().await;
        Ok(columns.iter().map(|c| c.key().to_string()).collect())
    }

    async fn column_definition(&self, key: &str) -> Result<ColumnDefinition, SourceError> {
        let columns = self.columns.read().await;
        columns
            .iter()
            .find(|c| c.key() == key)
            .cloned()
            .ok_or_else(|| SourceError::UnknownColumn(key.to_string()))
    }

    async fn fetch_data(&self, criteria: &SearchCriteria) -> Result<RowPage, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let page = criteria.current_page();
        if let Some(error) = self.page_errors.read().await.get(&page) {
            return Err(error.clone());
        }

        let mut selected = RowPage::select(&self.rows.read().await, criteria);
        if self.empty_from_page.is_some_and(|from| page >= from) {
            selected.records.clear();
        }
        if let Some(total) = self.reported_total {
            selected.total = total;
        }
        Ok(selected)
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

/// Builder for creating a MemoryAdapter
///
/// ```rust,ignore
/// let adapter = MemoryAdapterBuilder::new()
///     .with_column(ColumnDefinition::new("sku")?.with_label("SKU"))
///     .with_numbered_rows(450)
///     .build();
/// ```
pub struct MemoryAdapterBuilder {
    columns: Vec<ColumnDefinition>,
    rows: Vec<Row>,
    reported_total: Option<usize>,
    empty_from_page: Option<usize>,
    adapter_name: &'static str,
}

impl MemoryAdapterBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            reported_total: None,
            empty_from_page: None,
            adapter_name: "Memory",
        }
    }

    /// Add a discovered column
    pub fn with_column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    /// Add bare discovered columns by key; empty keys are skipped
    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns
            .extend(keys.into_iter().filter_map(|k| ColumnDefinition::new(k).ok()));
        self
    }

    /// Add a row; anything but a JSON object is stored as an empty row
    pub fn with_row(mut self, row: Value) -> Self {
        match row {
            Value::Object(fields) => self.rows.push(fields),
            _ => self.rows.push(Row::new()),
        }
        self
    }

    /// Add `count` rows of the form `{"id": n}`
    pub fn with_numbered_rows(mut self, count: usize) -> Self {
        let start = self.rows.len();
        self.rows.extend((start..start + count).map(|id| {
            let mut row = Row::new();
            row.insert("id".to_string(), Value::from(id));
            row
        }));
        self
    }

    /// Report `total` rows regardless of how many exist
    pub fn with_reported_total(mut self, total: usize) -> Self {
        self.reported_total = Some(total);
        self
    }

    /// Return empty pages from `page` onwards
    pub fn with_empty_pages_from(mut self, page: usize) -> Self {
        self.empty_from_page = Some(page);
        self
    }

    /// Set adapter name
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.adapter_name = name;
        self
    }

    /// Build the MemoryAdapter
    pub fn build(self) -> MemoryAdapter {
        MemoryAdapter {
            reported_total: self.reported_total,
            empty_from_page: self.empty_from_page,
            adapter_name: self.adapter_name,
            ..MemoryAdapter::from_parts(self.columns, self.rows)
        }
    }
}

impl Default for MemoryAdapterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
