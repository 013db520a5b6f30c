pub mod builders;
pub mod expr;
pub mod operators;
pub mod query;
pub mod values;

pub use self::expr::{Expr, SubqueryMode};
pub use self::operators::{AggregateKind, BinaryOp, FunctionKind, SortOrder, Statement, UnaryOp};
pub use self::query::{Projection, Query};
pub use self::values::Value;
