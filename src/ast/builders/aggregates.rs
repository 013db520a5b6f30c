//! Aggregate function builders (COUNT, SUM, AVG, etc.)

use crate::ast::{AggregateKind, Expr};

fn aggregate(kind: AggregateKind, args: Vec<Expr>) -> Expr {
    Expr::Aggregate { kind, args }
}

/// COUNT(*)
pub fn count() -> Expr {
    aggregate(AggregateKind::Count, vec![])
}

/// COUNT(selector)
pub fn count_of(selector: impl Into<Expr>) -> Expr {
    aggregate(AggregateKind::Count, vec![selector.into()])
}

/// SUM(selector)
pub fn sum(selector: impl Into<Expr>) -> Expr {
    aggregate(AggregateKind::Sum, vec![selector.into()])
}

/// AVG(selector)
pub fn avg(selector: impl Into<Expr>) -> Expr {
    aggregate(AggregateKind::Avg, vec![selector.into()])
}

/// MIN(selector)
pub fn min(selector: impl Into<Expr>) -> Expr {
    aggregate(AggregateKind::Min, vec![selector.into()])
}

/// MAX(selector)
pub fn max(selector: impl Into<Expr>) -> Expr {
    aggregate(AggregateKind::Max, vec![selector.into()])
}
