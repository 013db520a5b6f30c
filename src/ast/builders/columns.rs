//! Column references, parameters and raw fragments.

use crate::ast::Expr;

/// Reference a column by property name.
pub fn col(property: impl Into<String>) -> Expr {
    Expr::Column(property.into())
}

/// Reference a named parameter (`@name`, `:name`).
pub fn param(name: impl Into<String>) -> Expr {
    Expr::Param(name.into())
}

/// The GROUP BY key of the enclosing query.
pub fn key() -> Expr {
    Expr::Key
}

/// Verbatim SQL fragment.
pub fn raw(sql: impl Into<String>) -> Expr {
    Expr::Raw(sql.into())
}

/// Parenthesized list, for the right side of IN.
pub fn list<E: Into<Expr>>(items: impl IntoIterator<Item = E>) -> Expr {
    Expr::List(items.into_iter().map(Into::into).collect())
}
