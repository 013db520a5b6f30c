//! Transpiler test modules.
//!
//! Tests are organized by category:
//! - `core`: SELECT, UPDATE, DELETE, INSERT assembly and clause terminals
//! - `dialects`: quoting, booleans, pagination and concatenation per dialect
//! - `functions`: function mapping and operand grouping
//! - `subquery`: Count/Any/All/First/ToList lowering

mod core;

use crate::schema::{ColumnMeta, DataKind, QueryContext};
use crate::transpiler::DialectKind;

pub(super) fn users(kind: DialectKind) -> QueryContext {
    QueryContext::new(
        kind,
        "users",
        vec![
            ColumnMeta::new("Id", DataKind::Int),
            ColumnMeta::new("Name", DataKind::Text),
            ColumnMeta::new("Age", DataKind::Int),
            ColumnMeta::new("Active", DataKind::Bool),
            ColumnMeta::new("CreatedAt", DataKind::DateTime),
            ColumnMeta::new("Price", DataKind::Decimal),
            ColumnMeta::new("Code", DataKind::Text),
        ],
    )
    .unwrap()
}

pub(super) fn orders(kind: DialectKind) -> QueryContext {
    QueryContext::from_properties(kind, "orders", ["Id", "UserId", "Total"]).unwrap()
}
