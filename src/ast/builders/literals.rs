//! Literal values.

use crate::ast::{Expr, Value};

/// A constant.
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Constant(value.into())
}

/// The NULL constant.
pub fn null() -> Expr {
    Expr::Constant(Value::Null)
}
