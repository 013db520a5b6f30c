//! Ergonomic builder functions for expression nodes.
//!
//! # Modules
//!
//! - `columns` - Column references, parameters, raw SQL, lists
//! - `literals` - Constants
//! - `aggregates` - COUNT, SUM, AVG, MIN, MAX
//! - `functions` - Function calls, CASE WHEN, COALESCE, NOT
//! - `ext` - Fluent operator and function methods on Expr
//!
//! # Example
//! ```
//! use sqlforge::ast::builders::*;
//!
//! let predicate = col("Age").ge(18).and(col("Name").starts_with("A"));
//! let having = count().gt(5);
//! # let _ = (predicate, having);
//! ```

pub mod aggregates;
pub mod columns;
pub mod ext;
pub mod functions;
pub mod literals;

pub use aggregates::{avg, count, count_of, max, min, sum};
pub use columns::{col, key, list, param, raw};
pub use ext::ExprExt;
pub use functions::{case_when, coalesce, func, not, now};
pub use literals::{lit, null};
