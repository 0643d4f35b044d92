//! Grid configuration (grid.toml)

use serde::{Deserialize, Serialize};
use crate::column::{ColumnAttributes, ColumnDefinition, ColumnError, ColumnFactory};
use crate::criteria::{SearchCriteria, DEFAULT_PAGE_SIZE};

/// Content type used when an export does not name one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

/// Settings handed to export consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Suggested download file name
    #[serde(default)]
    pub file_name: Option<String>,

    /// MIME type of the produced file
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_name: None,
            content_type: default_content_type(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Show every source column, not only the configured ones
    #[serde(default)]
    pub keep_all_source_cols: bool,

    /// Rows fetched per page when streaming
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Column overrides, in display order
    #[serde(default)]
    pub columns: Vec<ColumnAttributes>,

    /// Export settings
    #[serde(default)]
    pub export: ExportSettings,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            keep_all_source_cols: false,
            page_size: default_page_size(),
            columns: Vec::new(),
            export: ExportSettings::default(),
        }
    }
}

impl GridConfig {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: GridConfig = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save config to TOML file
    ///
    /// TOML has no null, so null column attributes are left out.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let mut config = self.clone();
        for column in &mut config.columns {
            column.retain(|_, value| !value.is_null());
        }

        let toml = toml::to_string_pretty(&config)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Check values serde cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue(
                "page_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the configured column overrides
    pub fn column_definitions(
        &self,
        factory: &ColumnFactory,
    ) -> Result<Vec<ColumnDefinition>, ColumnError> {
        self.columns
            .iter()
            .map(|attributes| factory.create(attributes.clone()))
            .collect()
    }

    /// Fresh first-page criteria using the configured page size
    pub fn search_criteria(&self) -> SearchCriteria {
        SearchCriteria::new().with_page_size(self.page_size)
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
