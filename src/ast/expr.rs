use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::ast::{AggregateKind, BinaryOp, FunctionKind, Query, UnaryOp, Value};

/// A dialect-agnostic expression node.
///
/// Nodes never carry dialect decisions; the same tree renders to every
/// backend through [`crate::transpiler::ExprToSql`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A column, named by property (resolved through the query context)
    Column(String),
    /// A literal, inlined or parameterized depending on the builder mode
    Constant(Value),
    /// A named parameter reference rendered as `prefix + name`
    Param(String),
    /// Unary expression (NOT x, -x)
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// Binary expression (left op right)
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    /// Scalar function call, spelled through the function table
    Call { func: FunctionKind, args: Vec<Expr> },
    /// CASE WHEN condition THEN then ELSE otherwise END
    Conditional {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// COALESCE(value, fallback)
    Coalesce { value: Box<Expr>, fallback: Box<Expr> },
    /// Aggregate; COUNT with no arguments is COUNT(*)
    Aggregate { kind: AggregateKind, args: Vec<Expr> },
    /// Nested query lowered according to `mode`
    Subquery { query: Box<Query>, mode: SubqueryMode },
    /// Parenthesized value list, right side of IN
    List(Vec<Expr>),
    /// The GROUP BY key of the enclosing grouped query
    Key,
    /// Verbatim SQL
    Raw(String),
}

/// How a nested query is lowered.
#[derive(Debug, Clone, PartialEq)]
pub enum SubqueryMode {
    /// COUNT(*) over the inner rows, optionally filtered
    Count(Option<Box<Expr>>),
    /// 1 when any (matching) inner row exists, else 0
    Any(Option<Box<Expr>>),
    /// 1 when every inner row satisfies the predicate, else 0
    All(Box<Expr>),
    /// The first (matching) inner row
    First(Option<Box<Expr>>),
    /// The inner SELECT itself
    ToList,
}

impl Expr {
    pub(crate) fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Whether this is the NULL literal.
    pub fn is_null_constant(&self) -> bool {
        matches!(self, Expr::Constant(Value::Null))
    }

    /// Whether any node in this tree is an aggregate.
    pub fn contains_aggregate(&self) -> bool {
        match self {
            Expr::Aggregate { .. } => true,
            Expr::Unary { operand, .. } => operand.contains_aggregate(),
            Expr::Binary { left, right, .. } => left.contains_aggregate() || right.contains_aggregate(),
            Expr::Call { args, .. } | Expr::List(args) => args.iter().any(Expr::contains_aggregate),
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => condition.contains_aggregate() || then.contains_aggregate() || otherwise.contains_aggregate(),
            Expr::Coalesce { value, fallback } => value.contains_aggregate() || fallback.contains_aggregate(),
            _ => false,
        }
    }
}

impl From<Value> for Expr {
    fn from(v: Value) -> Self {
        Expr::Constant(v)
    }
}

macro_rules! constant_from {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Expr {
                fn from(v: $t) -> Self {
                    Expr::Constant(Value::from(v))
                }
            }
        )*
    };
}

constant_from!(bool, i32, i64, u32, f64, &str, String, Uuid, NaiveDateTime);
