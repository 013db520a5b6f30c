//! Extension trait adding fluent operators and functions to Expr.

use crate::ast::{BinaryOp, Expr, FunctionKind, UnaryOp};

fn call(func: FunctionKind, args: Vec<Expr>) -> Expr {
    Expr::Call { func, args }
}

/// Fluent methods on [`Expr`].
///
/// Offsets taken by `substring` and `index_of` are zero-based, as in the
/// host language; the renderer emits the `+ 1` explicitly.
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    // Comparison
    fn eq(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(self.into_expr(), BinaryOp::Eq, rhs.into())
    }
    fn ne(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(self.into_expr(), BinaryOp::Ne, rhs.into())
    }
    fn lt(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(self.into_expr(), BinaryOp::Lt, rhs.into())
    }
    fn le(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(self.into_expr(), BinaryOp::Le, rhs.into())
    }
    fn gt(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(self.into_expr(), BinaryOp::Gt, rhs.into())
    }
    fn ge(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(self.into_expr(), BinaryOp::Ge, rhs.into())
    }
    fn is_null(self) -> Expr {
        Expr::binary(self.into_expr(), BinaryOp::Eq, Expr::Constant(crate::ast::Value::Null))
    }
    fn is_not_null(self) -> Expr {
        Expr::binary(self.into_expr(), BinaryOp::Ne, Expr::Constant(crate::ast::Value::Null))
    }
    fn is_in(self, set: impl Into<Expr>) -> Expr {
        Expr::binary(self.into_expr(), BinaryOp::In, set.into())
    }

    // Logical
    fn and(self, rhs: Expr) -> Expr {
        Expr::binary(self.into_expr(), BinaryOp::And, rhs)
    }
    fn or(self, rhs: Expr) -> Expr {
        Expr::binary(self.into_expr(), BinaryOp::Or, rhs)
    }
    fn not(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(self.into_expr()),
        }
    }

    // Arithmetic
    fn add(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(self.into_expr(), BinaryOp::Add, rhs.into())
    }
    fn sub(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(self.into_expr(), BinaryOp::Sub, rhs.into())
    }
    fn mul(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(self.into_expr(), BinaryOp::Mul, rhs.into())
    }
    fn div(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(self.into_expr(), BinaryOp::Div, rhs.into())
    }
    fn rem(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(self.into_expr(), BinaryOp::Rem, rhs.into())
    }
    fn neg(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::Negate,
            operand: Box::new(self.into_expr()),
        }
    }
    fn concat(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(self.into_expr(), BinaryOp::Concat, rhs.into())
    }
    fn coalesce(self, fallback: impl Into<Expr>) -> Expr {
        Expr::Coalesce {
            value: Box::new(self.into_expr()),
            fallback: Box::new(fallback.into()),
        }
    }

    // String functions
    fn length(self) -> Expr {
        call(FunctionKind::Length, vec![self.into_expr()])
    }
    fn upper(self) -> Expr {
        call(FunctionKind::Upper, vec![self.into_expr()])
    }
    fn lower(self) -> Expr {
        call(FunctionKind::Lower, vec![self.into_expr()])
    }
    fn trim(self) -> Expr {
        call(FunctionKind::Trim, vec![self.into_expr()])
    }
    fn trim_start(self) -> Expr {
        call(FunctionKind::TrimStart, vec![self.into_expr()])
    }
    fn trim_end(self) -> Expr {
        call(FunctionKind::TrimEnd, vec![self.into_expr()])
    }
    fn substring(self, start: impl Into<Expr>) -> Expr {
        call(FunctionKind::Substring, vec![self.into_expr(), start.into()])
    }
    fn substring_len(self, start: impl Into<Expr>, len: impl Into<Expr>) -> Expr {
        call(
            FunctionKind::Substring,
            vec![self.into_expr(), start.into(), len.into()],
        )
    }
    fn index_of(self, needle: impl Into<Expr>) -> Expr {
        call(FunctionKind::IndexOf, vec![self.into_expr(), needle.into()])
    }
    fn index_of_from(self, needle: impl Into<Expr>, start: impl Into<Expr>) -> Expr {
        call(
            FunctionKind::IndexOf,
            vec![self.into_expr(), needle.into(), start.into()],
        )
    }
    fn replace(self, from: impl Into<Expr>, to: impl Into<Expr>) -> Expr {
        call(
            FunctionKind::Replace,
            vec![self.into_expr(), from.into(), to.into()],
        )
    }
    fn contains(self, needle: impl Into<Expr>) -> Expr {
        call(FunctionKind::Contains, vec![self.into_expr(), needle.into()])
    }
    fn starts_with(self, prefix: impl Into<Expr>) -> Expr {
        call(FunctionKind::StartsWith, vec![self.into_expr(), prefix.into()])
    }
    fn ends_with(self, suffix: impl Into<Expr>) -> Expr {
        call(FunctionKind::EndsWith, vec![self.into_expr(), suffix.into()])
    }
    fn pad_left(self, width: impl Into<Expr>, fill: impl Into<Expr>) -> Expr {
        call(
            FunctionKind::PadLeft,
            vec![self.into_expr(), width.into(), fill.into()],
        )
    }

    // Math functions
    fn abs(self) -> Expr {
        call(FunctionKind::Abs, vec![self.into_expr()])
    }
    fn ceiling(self) -> Expr {
        call(FunctionKind::Ceiling, vec![self.into_expr()])
    }
    fn floor(self) -> Expr {
        call(FunctionKind::Floor, vec![self.into_expr()])
    }
    fn round(self) -> Expr {
        call(FunctionKind::Round, vec![self.into_expr()])
    }
    fn round_to(self, digits: impl Into<Expr>) -> Expr {
        call(FunctionKind::Round, vec![self.into_expr(), digits.into()])
    }
    fn power(self, exponent: impl Into<Expr>) -> Expr {
        call(FunctionKind::Power, vec![self.into_expr(), exponent.into()])
    }
    fn sqrt(self) -> Expr {
        call(FunctionKind::Sqrt, vec![self.into_expr()])
    }
    fn sign(self) -> Expr {
        call(FunctionKind::Sign, vec![self.into_expr()])
    }
    fn truncate(self) -> Expr {
        call(FunctionKind::Truncate, vec![self.into_expr()])
    }

    // Date parts
    fn year(self) -> Expr {
        call(FunctionKind::Year, vec![self.into_expr()])
    }
    fn month(self) -> Expr {
        call(FunctionKind::Month, vec![self.into_expr()])
    }
    fn day(self) -> Expr {
        call(FunctionKind::Day, vec![self.into_expr()])
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}
