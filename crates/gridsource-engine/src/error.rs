//! Engine error type

use gridsource_catalog::SourceError;
use gridsource_core::ColumnError;

/// Errors raised while reconciling columns or streaming rows
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Configured column keys the source does not provide
    #[error("Column(s) not found on source: {}", .0.join(", "))]
    ColumnsNotFound(Vec<String>),

    /// No sort order left above the current maximum
    #[error("No sort order available for column '{0}'")]
    SortOrderExhausted(String),

    #[error(transparent)]
    Column(#[from] ColumnError),

    #[error(transparent)]
    Source(#[from] SourceError),
}
