//! Function, conditional and coalesce builders.

use crate::ast::{Expr, FunctionKind, UnaryOp};

/// Call an abstract function.
pub fn func(kind: FunctionKind, args: Vec<Expr>) -> Expr {
    Expr::Call { func: kind, args }
}

/// Current timestamp.
pub fn now() -> Expr {
    func(FunctionKind::Now, vec![])
}

/// CASE WHEN condition THEN then ELSE otherwise END
pub fn case_when(condition: Expr, then: impl Into<Expr>, otherwise: impl Into<Expr>) -> Expr {
    Expr::Conditional {
        condition: Box::new(condition),
        then: Box::new(then.into()),
        otherwise: Box::new(otherwise.into()),
    }
}

/// COALESCE(value, fallback)
pub fn coalesce(value: impl Into<Expr>, fallback: impl Into<Expr>) -> Expr {
    Expr::Coalesce {
        value: Box::new(value.into()),
        fallback: Box::new(fallback.into()),
    }
}

/// Logical negation.
pub fn not(expr: Expr) -> Expr {
    Expr::Unary {
        op: UnaryOp::Not,
        operand: Box::new(expr),
    }
}
