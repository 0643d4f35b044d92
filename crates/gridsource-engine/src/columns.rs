//! Ordering and validation steps of column reconciliation

use crate::error::GridError;
use gridsource_core::{ColumnDefinition, ColumnFactory};
use std::collections::HashSet;

/// Give every unordered column a sort order above the current maximum
///
/// Columns that already carry a sort order are returned unchanged. The
/// others are numbered `max + 1, max + 2, ...` in input order.
pub fn assign_missing_sort_orders(
    factory: &ColumnFactory,
    columns: Vec<ColumnDefinition>,
) -> Result<Vec<ColumnDefinition>, GridError> {
    let mut next = max_sort_order(&columns);

    columns
        .into_iter()
        .map(|column| {
            if column.sort_order().is_some() {
                return Ok(column);
            }
            next = next
                .checked_add(1)
                .ok_or_else(|| GridError::SortOrderExhausted(column.key().to_string()))?;
            Ok(factory.with_sort_order(&column, next)?)
        })
        .collect()
}

/// Largest sort order among `columns`, 0 when none is ordered
pub fn max_sort_order(columns: &[ColumnDefinition]) -> u32 {
    columns
        .iter()
        .filter_map(ColumnDefinition::sort_order)
        .max()
        .unwrap_or(0)
}

/// Keys of `columns` in first-seen order, without repeats
pub fn unique_keys(columns: &[ColumnDefinition]) -> Vec<String> {
    let mut seen = HashSet::new();
    columns
        .iter()
        .map(ColumnDefinition::key)
        .filter(|key| seen.insert(*key))
        .map(str::to_string)
        .collect()
}

/// Fail with every configured key the source does not provide
pub fn validate_configured_keys(configured: &[String], available: &[String]) -> Result<(), GridError> {
    let available: HashSet<&str> = available.iter().map(String::as_str).collect();
    let missing: Vec<String> = configured
        .iter()
        .filter(|key| !available.contains(key.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(GridError::ColumnsNotFound(missing))
    }
}

/// Stable ascending sort by sort order; unordered columns go last
pub fn sort_columns(columns: &mut [ColumnDefinition]) {
    columns.sort_by_key(|column| column.sort_order().unwrap_or(u32::MAX));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn column(key: &str, sort_order: Option<u32>) -> ColumnDefinition {
        let column = ColumnDefinition::new(key).unwrap();
        match sort_order {
            Some(order) => column.with_sort_order(order),
            None => column,
        }
    }

    fn orders(columns: &[ColumnDefinition]) -> Vec<(&str, Option<u32>)> {
        columns.iter().map(|c| (c.key(), c.sort_order())).collect()
    }

    #[test]
    fn unordered_columns_are_numbered_from_one() {
        let columns = vec![column("sku", None), column("name", None), column("price", None)];
        let ordered = assign_missing_sort_orders(&ColumnFactory::new(), columns).unwrap();

        assert_eq!(
            orders(&ordered),
            vec![("sku", Some(1)), ("name", Some(2)), ("price", Some(3))]
        );
    }

    #[test]
    fn explicit_orders_are_kept_and_gaps_start_above_max() {
        let columns = vec![
            column("a", None),
            column("b", Some(5)),
            column("c", None),
            column("d", Some(2)),
        ];
        let ordered = assign_missing_sort_orders(&ColumnFactory::new(), columns).unwrap();

        assert_eq!(
            orders(&ordered),
            vec![("a", Some(6)), ("b", Some(5)), ("c", Some(7)), ("d", Some(2))]
        );
    }

    #[test]
    fn exhausted_sort_orders_fail() {
        let columns = vec![column("a", Some(u32::MAX)), column("b", None)];
        let result = assign_missing_sort_orders(&ColumnFactory::new(), columns);
        assert!(matches!(result, Err(GridError::SortOrderExhausted(key)) if key == "b"));
    }

    #[test]
    fn validation_names_all_missing_keys() {
        let configured = vec!["sku".to_string(), "foo".to_string(), "bar".to_string()];
        let available = vec!["sku".to_string(), "name".to_string()];

        match validate_configured_keys(&configured, &available) {
            Err(GridError::ColumnsNotFound(missing)) => assert_eq!(missing, vec!["foo", "bar"]),
            other => panic!("expected ColumnsNotFound, got {:?}", other),
        }
        assert!(validate_configured_keys(&configured[..1], &available).is_ok());
    }

    #[test]
    fn unique_keys_keep_first_position() {
        let columns = vec![column("a", None), column("b", None), column("a", Some(1))];
        assert_eq!(unique_keys(&columns), vec!["a", "b"]);
    }

    #[test]
    fn sort_is_stable() {
        let mut columns = vec![
            column("x", Some(3)),
            column("y", Some(1)),
            column("z", Some(3)),
            column("w", Some(2)),
        ];
        sort_columns(&mut columns);

        let keys: Vec<_> = columns.iter().map(ColumnDefinition::key).collect();
        assert_eq!(keys, vec!["y", "w", "x", "z"]);
    }
}
