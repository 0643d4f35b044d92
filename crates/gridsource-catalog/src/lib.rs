//! Source adapters for grid columns and rows
//!
//! This module defines the [`SourceAdapter`] trait the grid engine talks to,
//! plus two adapters that keep their data in process:
//!
//! - [`MemoryAdapter`] - rows held in memory, with hooks for simulating
//!   stale totals, empty pages and fetch failures
//! - [`JsonDocumentAdapter`] - columns and rows read from a JSON document
//!
//! ## Example
//!
//! ```rust,ignore
//! use gridsource_catalog::{JsonDocumentAdapter, SearchCriteria, SourceAdapter};
//!
//! let adapter = JsonDocumentAdapter::from_file(Path::new("products.json"))?;
//! let raw = adapter.fetch_data(&SearchCriteria::new()).await?;
//! let records = adapter.extract_records(&raw)?;
//! ```

pub mod adapter;
pub mod json;
pub mod memory;
pub mod page;

pub use adapter::{SourceAdapter, SourceError};
pub use json::JsonDocumentAdapter;
pub use memory::{MemoryAdapter, MemoryAdapterBuilder};
pub use page::{Row, RowPage};
pub use gridsource_core::SearchCriteria;
