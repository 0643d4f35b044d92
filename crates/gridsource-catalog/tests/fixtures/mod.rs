//! Test fixtures for source adapter integration tests
//!
//! Reusable grids resembling what shop back-offices typically list.

use gridsource_catalog::{JsonDocumentAdapter, MemoryAdapter, MemoryAdapterBuilder};
use gridsource_core::ColumnDefinition;
use serde_json::json;

/// Product catalog grid as a JSON document
///
/// Columns: sku, name, price, status. Five rows, two of them disabled.
pub const PRODUCTS_DOCUMENT: &str = r#"{
    "columns": [
        {"key": "sku", "label": "SKU", "sortable": true},
        {"key": "name", "label": "Name", "renderer": "text"},
        {"key": "price", "label": "Price", "renderer": "currency"},
        {"key": "status"}
    ],
    "rows": [
        {"sku": "A-1", "name": "Anvil", "price": 10.5, "status": "enabled"},
        {"sku": "B-2", "name": "Bucket", "price": 4, "status": "enabled"},
        {"sku": "C-3", "name": "Chisel", "price": 7, "status": "disabled"},
        {"sku": "D-4", "name": "Drill", "price": 99, "status": "enabled"},
        {"sku": "E-5", "name": "Easel", "status": "disabled"}
    ]
}"#;

pub fn products_document() -> JsonDocumentAdapter {
    JsonDocumentAdapter::from_json(PRODUCTS_DOCUMENT).expect("fixture document must parse")
}

/// Customer grid held in memory
///
/// Columns: id, email, name, created_at. `count` rows of increasing id.
pub fn customers(count: usize) -> MemoryAdapter {
    let mut builder = MemoryAdapterBuilder::new()
        .with_column(ColumnDefinition::new("id").unwrap().with_label("ID"))
        .with_column(ColumnDefinition::new("email").unwrap().with_label("Email"))
        .with_column(ColumnDefinition::new("name").unwrap())
        .with_column(
            ColumnDefinition::new("created_at")
                .unwrap()
                .with_label("Created")
                .with_attribute("renderer", "datetime"),
        );

    for id in 0..count {
        builder = builder.with_row(json!({
            "id": id,
            "email": format!("customer{}@example.com", id),
            "name": format!("Customer {}", id),
            "created_at": "2024-01-01T00:00:00Z",
        }));
    }

    builder.build()
}
