//! Paging over in-process row collections

use gridsource_core::SearchCriteria;
use serde_json::{Map, Value};

/// A record held as a JSON object
pub type Row = Map<String, Value>;

/// One fetched page of rows plus the number of rows matching the query
#[derive(Debug, Clone, PartialEq)]
pub struct RowPage {
    pub records: Vec<Row>,
    pub total: usize,
}

impl RowPage {
    /// Select the rows for the criteria's current page
    ///
    /// Filters are exact matches against the field's string form.
    pub fn select(rows: &[Row], criteria: &SearchCriteria) -> Self {
        let matching: Vec<&Row> = rows
            .iter()
            .filter(|row| matches_filters(row, criteria))
            .collect();

        let records = matching
            .iter()
            .skip(criteria.offset())
            .take(criteria.page_size())
            .map(|row| (*row).clone())
            .collect();

        Self {
            records,
            total: matching.len(),
        }
    }
}

fn matches_filters(row: &Row, criteria: &SearchCriteria) -> bool {
    criteria.filters().iter().all(|(field, expected)| match row.get(field) {
        Some(Value::String(s)) => s == expected,
        Some(Value::Null) | None => false,
        Some(other) => other.to_string() == *expected,
    })
}
