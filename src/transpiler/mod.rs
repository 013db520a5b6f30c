//! SQL transpiler for the expression AST.
//!
//! Lowers [`Expr`](crate::ast::Expr) trees and [`Query`](crate::ast::Query)
//! builders into dialect-specific SQL strings.

pub mod dialect;
pub mod dml;
pub mod expr;
pub mod functions;
mod subquery;

#[cfg(test)]
mod tests;

pub use dialect::{BoolStyle, Dialect, DialectKind, PaginationStyle};
pub use dml::SqlTemplate;
pub use expr::{literal, ExprToSql, ParamContext};
