//! Grid source: column reconciliation and cached record access
//!
//! [`GridSource`] sits between a grid and its [`SourceAdapter`]. It decides
//! which columns the grid shows and in what order, and serves records and
//! totals for a search criteria with a single fetch per criteria state.

use crate::cache::RawGridDataCache;
use crate::columns::{
    assign_missing_sort_orders, sort_columns, unique_keys, validate_configured_keys,
};
use crate::error::GridError;
use crate::row_stream::RowStream;
use gridsource_catalog::SourceAdapter;
use gridsource_core::{ColumnDefinition, ColumnFactory, SearchCriteria};
use serde_json::Value;
use std::collections::HashMap;

/// Column and row access for one grid
pub struct GridSource<A: SourceAdapter> {
    adapter: A,
    factory: ColumnFactory,
    raw_data: RawGridDataCache<A::RawData>,
}

impl<A: SourceAdapter> GridSource<A> {
    /// Create a grid source using a default column factory
    pub fn new(adapter: A) -> Self {
        Self::with_factory(adapter, ColumnFactory::new())
    }

    pub fn with_factory(adapter: A, factory: ColumnFactory) -> Self {
        Self {
            adapter,
            factory,
            raw_data: RawGridDataCache::new(),
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn factory(&self) -> &ColumnFactory {
        &self.factory
    }

    /// Reconcile configured columns with the columns the source provides
    ///
    /// 1. Configured columns without a sort order are placed after the
    ///    highest configured sort order, in configuration order.
    /// 2. Every configured key must exist on the source.
    /// 3. With no configuration, or `keep_all_source_cols`, every source
    ///    column is included; otherwise only the configured ones.
    /// 4. Each included source column is patched with the non-empty
    ///    attributes of its configured override.
    /// 5. Still unordered columns are placed after everything else.
    /// 6. The result is stably sorted by sort order.
    ///
    /// When a key is configured twice, the later override wins.
    pub async fn extract_column_definitions(
        &self,
        configured: &[ColumnDefinition],
        keep_all_source_cols: bool,
    ) -> Result<Vec<ColumnDefinition>, GridError> {
        let configured = assign_missing_sort_orders(&self.factory, configured.to_vec())?;
        let configured_keys = unique_keys(&configured);
        let overrides: HashMap<&str, &ColumnDefinition> =
            configured.iter().map(|c| (c.key(), c)).collect();

        let available = self.adapter.column_keys().await?;
        validate_configured_keys(&configured_keys, &available)?;

        let column_keys = if overrides.is_empty() || keep_all_source_cols {
            available
        } else {
            configured_keys
        };

        let mut extracted = Vec::with_capacity(column_keys.len());
        for key in &column_keys {
            let discovered = self.adapter.column_definition(key).await?;
            let column = match overrides.get(key.as_str()) {
                Some(patch) => self.factory.merge(&discovered, patch)?,
                None => discovered,
            };
            extracted.push(column);
        }

        let mut columns = assign_missing_sort_orders(&self.factory, extracted)?;
        sort_columns(&mut columns);

        tracing::debug!(
            adapter = self.adapter.name(),
            configured = configured.len(),
            columns = columns.len(),
            keep_all_source_cols,
            "reconciled grid columns"
        );

        Ok(columns)
    }

    /// Records selected by `criteria`
    pub async fn records(&mut self, criteria: &SearchCriteria) -> Result<Vec<A::Record>, GridError> {
        let raw = self.raw_data.get_or_fetch(&self.adapter, criteria).await?;
        Ok(self.adapter.extract_records(raw)?)
    }

    /// Total number of rows matching `criteria`
    pub async fn total_count(&mut self, criteria: &SearchCriteria) -> Result<usize, GridError> {
        let raw = self.raw_data.get_or_fetch(&self.adapter, criteria).await?;
        Ok(self.adapter.extract_total_row_count(raw)?)
    }

    /// Value of column `key` in `record`
    pub fn extract_value(&self, record: &A::Record, key: &str) -> Result<Value, GridError> {
        Ok(self.adapter.extract_value(record, key)?)
    }

    /// Whether raw data from an earlier fetch is held
    pub fn has_cached_data(&self) -> bool {
        !self.raw_data.is_empty()
    }

    /// Drop cached raw data
    pub fn clear_cache(&mut self) {
        self.raw_data.clear();
    }

    /// Lazily stream every row selected by `criteria`, one page at a time
    pub fn stream(&mut self, criteria: SearchCriteria) -> RowStream<'_, A> {
        RowStream::new(self, criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsource_catalog::{MemoryAdapterBuilder, SourceError};
    use gridsource_core::{ColumnAttributes, column::LABEL};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn products() -> GridSource<gridsource_catalog::MemoryAdapter> {
        GridSource::new(
            MemoryAdapterBuilder::new()
                .with_column(ColumnDefinition::new("sku").unwrap().with_label("SKU"))
                .with_column(
                    ColumnDefinition::new("name")
                        .unwrap()
                        .with_label("Name")
                        .with_attribute("renderer", "text"),
                )
                .with_column(ColumnDefinition::new("price").unwrap().with_label("Price"))
                .with_row(json!({"sku": "A-1", "name": "Anvil", "price": 10}))
                .build(),
        )
    }

    fn summary(columns: &[ColumnDefinition]) -> Vec<(&str, u32)> {
        columns
            .iter()
            .map(|c| (c.key(), c.sort_order().unwrap_or(0)))
            .collect()
    }

    fn configured(key: &str) -> ColumnDefinition {
        ColumnDefinition::new(key).unwrap()
    }

    #[tokio::test]
    async fn no_configuration_uses_source_order() {
        let columns = products().extract_column_definitions(&[], false).await.unwrap();
        assert_eq!(summary(&columns), vec![("sku", 1), ("name", 2), ("price", 3)]);
    }

    #[tokio::test]
    async fn configuration_selects_and_orders_columns() {
        let config = vec![configured("price").with_sort_order(1), configured("name")];
        let columns = products().extract_column_definitions(&config, false).await.unwrap();

        assert_eq!(summary(&columns), vec![("price", 1), ("name", 2)]);
    }

    #[tokio::test]
    async fn keep_all_source_cols_appends_unconfigured_columns() {
        let config = vec![configured("price").with_sort_order(1), configured("name")];
        let columns = products().extract_column_definitions(&config, true).await.unwrap();

        assert_eq!(
            summary(&columns),
            vec![("price", 1), ("name", 2), ("sku", 3)]
        );
    }

    #[tokio::test]
    async fn explicit_sort_orders_are_not_renumbered() {
        let config = vec![configured("name").with_sort_order(10), configured("sku").with_sort_order(4)];
        let columns = products().extract_column_definitions(&config, true).await.unwrap();

        assert_eq!(
            summary(&columns),
            vec![("sku", 4), ("name", 10), ("price", 11)]
        );
    }

    #[tokio::test]
    async fn overrides_patch_discovered_attributes() {
        let source = products();
        let patch = source
            .factory()
            .create(
                ColumnAttributes::for_key("name")
                    .with(LABEL, "")
                    .with("width", 120),
            )
            .unwrap();

        let columns = source.extract_column_definitions(&[patch], false).await.unwrap();
        let name = &columns[0];

        assert_eq!(name.label(), Some("Name"));
        assert_eq!(name.attribute("renderer"), Some(&json!("text")));
        assert_eq!(name.attribute("width"), Some(&json!(120)));

        let relabelled = source
            .extract_column_definitions(&[configured("name").with_label("Product")], false)
            .await
            .unwrap();
        assert_eq!(relabelled[0].label(), Some("Product"));
    }

    #[tokio::test]
    async fn falsy_override_values_keep_discovered_attributes() {
        let source = GridSource::new(
            MemoryAdapterBuilder::new()
                .with_column(
                    ColumnDefinition::new("sku")
                        .unwrap()
                        .with_attribute("sortable", true)
                        .with_attribute("renderer", "text"),
                )
                .build(),
        );
        let patch = configured("sku")
            .with_attribute("sortable", false)
            .with_attribute("renderer", "0")
            .with_attribute("width", 0);

        let columns = source.extract_column_definitions(&[patch], false).await.unwrap();

        assert_eq!(columns[0].attribute("sortable"), Some(&json!(true)));
        assert_eq!(columns[0].attribute("renderer"), Some(&json!("text")));
        assert_eq!(columns[0].attribute("width"), None);
    }

    #[tokio::test]
    async fn unknown_configured_keys_fail() {
        let config = vec![configured("nonexistent"), configured("sku"), configured("other")];
        let result = products().extract_column_definitions(&config, false).await;

        match result {
            Err(GridError::ColumnsNotFound(missing)) => {
                assert_eq!(missing, vec!["nonexistent", "other"]);
            }
            other => panic!("expected ColumnsNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_source_rejects_any_configuration() {
        let source = GridSource::new(MemoryAdapterBuilder::new().build());

        assert!(source.extract_column_definitions(&[], false).await.unwrap().is_empty());
        let result = source.extract_column_definitions(&[configured("sku")], false).await;
        assert!(matches!(result, Err(GridError::ColumnsNotFound(_))));
    }

    #[tokio::test]
    async fn duplicate_configured_key_uses_last_override() {
        let config = vec![
            configured("name").with_label("First"),
            configured("sku"),
            configured("name").with_label("Second"),
        ];
        let columns = products().extract_column_definitions(&config, false).await.unwrap();

        assert_eq!(summary(&columns), vec![("sku", 2), ("name", 3)]);
        assert_eq!(columns[1].label(), Some("Second"));
    }

    #[tokio::test]
    async fn records_and_total_share_one_fetch() {
        let adapter = MemoryAdapterBuilder::new().with_numbered_rows(7).build();
        let mut source = GridSource::new(adapter.clone());
        let criteria = SearchCriteria::new().with_page_size(5);

        let records = source.records(&criteria).await.unwrap();
        let total = source.total_count(&criteria).await.unwrap();

        assert_eq!(records.len(), 5);
        assert_eq!(total, 7);
        assert_eq!(adapter.fetch_count(), 1);
        assert_eq!(source.extract_value(&records[4], "id").unwrap(), json!(4));

        source.clear_cache();
        source.total_count(&criteria).await.unwrap();
        assert_eq!(adapter.fetch_count(), 2);
    }

    #[tokio::test]
    async fn adapter_errors_propagate() {
        let adapter = MemoryAdapterBuilder::new().with_numbered_rows(3).build();
        adapter
            .add_error_for_page(1, SourceError::ConnectionError("refused".to_string()))
            .await;
        let mut source = GridSource::new(adapter);

        let result = source.records(&SearchCriteria::new()).await;
        assert!(matches!(
            result,
            Err(GridError::Source(SourceError::ConnectionError(_)))
        ));
    }
}
