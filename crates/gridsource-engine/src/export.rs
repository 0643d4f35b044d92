//! Export seam between a grid and file encoders
//!
//! An encoder needs a header line and the body rows. [`GridExport`] pairs the
//! reconciled columns (for the header) with a [`RowStream`] (for the body)
//! and turns every record into one value per column.

use crate::error::GridError;
use crate::grid_source::GridSource;
use crate::row_stream::RowStream;
use gridsource_catalog::SourceAdapter;
use gridsource_core::{ColumnDefinition, ExportSettings, GridConfig, SearchCriteria};
use serde_json::Value;

/// Header and lazily produced rows of one grid export
pub struct GridExport<'a, A: SourceAdapter> {
    columns: Vec<ColumnDefinition>,
    rows: RowStream<'a, A>,
    settings: ExportSettings,
}

impl<'a, A: SourceAdapter> GridExport<'a, A> {
    /// Reconcile the columns and prepare the row stream
    pub async fn new(
        source: &'a mut GridSource<A>,
        configured: &[ColumnDefinition],
        keep_all_source_cols: bool,
        criteria: SearchCriteria,
        settings: ExportSettings,
    ) -> Result<Self, GridError> {
        let columns = source
            .extract_column_definitions(configured, keep_all_source_cols)
            .await?;
        Ok(Self {
            columns,
            rows: RowStream::new(source, criteria),
            settings,
        })
    }

    /// Build an export from a grid configuration
    pub async fn from_config(
        source: &'a mut GridSource<A>,
        config: &GridConfig,
    ) -> Result<Self, GridError> {
        let configured = config.column_definitions(source.factory())?;
        let criteria = config.search_criteria();
        let export = Self::new(
            source,
            &configured,
            config.keep_all_source_cols,
            criteria,
            config.export.clone(),
        )
        .await?;
        Ok(export.with_page_size(config.page_size))
    }

    /// Use a different page size for the body rows
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.rows = self.rows.with_page_size(page_size);
        self
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Column labels, falling back to the key for unlabelled columns
    pub fn header(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| column.display_label().to_string())
            .collect()
    }

    /// Values of the next record, one per column, in column order
    pub async fn next_row(&mut self) -> Option<Result<Vec<Value>, GridError>> {
        let record = match self.rows.next().await? {
            Ok((_, record)) => record,
            Err(e) => return Some(Err(e)),
        };

        let source = self.rows.source();
        Some(
            self.columns
                .iter()
                .map(|column| source.extract_value(&record, column.key()))
                .collect(),
        )
    }

    /// Rows produced so far
    pub fn rows_written(&self) -> usize {
        self.rows.yielded()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.settings.file_name.as_deref()
    }

    pub fn content_type(&self) -> &str {
        &self.settings.content_type
    }
}
