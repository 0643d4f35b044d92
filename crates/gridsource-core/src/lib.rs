//! Gridsource Core
//!
//! Value types shared by every grid crate: column definitions and the
//! factory that builds them, search criteria, and grid configuration.

pub mod column;
pub mod criteria;
pub mod config;

pub use column::{ColumnAttributes, ColumnDefinition, ColumnError, ColumnFactory};
pub use criteria::{CriteriaIdentity, SearchCriteria, DEFAULT_PAGE_SIZE};
pub use config::{ConfigError, ExportSettings, GridConfig};
