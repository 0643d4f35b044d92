//! Gridsource engine - column reconciliation and row streaming
//!
//! This crate implements the grid logic on top of a source adapter:
//! - Column reconciliation (merge, ordering, validation)
//! - Per-criteria caching of fetched data
//! - Paginated row streaming
//! - The export seam handing header and rows to encoders

pub mod cache;
pub mod columns;
pub mod error;
pub mod export;
pub mod grid_source;
pub mod row_stream;

pub use cache::RawGridDataCache;
pub use error::GridError;
pub use export::GridExport;
pub use grid_source::GridSource;
pub use row_stream::RowStream;
