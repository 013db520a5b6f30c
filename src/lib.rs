//! # sqlforge
//!
//! > **Typed expressions and templates in, dialect SQL out.**
//!
//! sqlforge turns expression trees and `{{placeholder}}` templates into SQL
//! text for six dialects. It does not connect to databases.
//!
//! ## Quick Example
//!
//! ```
//! use sqlforge::prelude::*;
//!
//! let ctx = QueryContext::from_properties(DialectKind::MySql, "users", ["Id", "Name", "Age"]).unwrap();
//!
//! let sql = Query::new(ctx)
//!     .select(["Id", "Name"])
//!     .filter(col("Age").ge(18))
//!     .order_by(col("Name"))
//!     .take(10)
//!     .to_sql()
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT `id`, `name` FROM `users` WHERE `age` >= 18 ORDER BY `name` ASC LIMIT 10"
//! );
//! ```
//!
//! ## Dialects
//!
//! | Dialect      | Identifier | Parameter | Booleans | Pagination           |
//! |--------------|------------|-----------|----------|----------------------|
//! | `Generic`    | `[x]`      | `@p0`     | `1`/`0`  | `LIMIT n OFFSET m`   |
//! | `SqlServer`  | `[x]`      | `@p0`     | `1`/`0`  | `OFFSET .. FETCH ..` |
//! | `MySql`      | `` `x` ``  | `@p0`     | `1`/`0`  | `LIMIT n OFFSET m`   |
//! | `PostgreSql` | `"x"`      | `@p0`     | keywords | `LIMIT n OFFSET m`   |
//! | `Oracle`     | `"x"`      | `:p0`     | `1`/`0`  | `OFFSET .. FETCH ..` |
//! | `Db2`        | `"x"`      | `@p0`     | `1`/`0`  | `OFFSET .. FETCH ..` |

pub mod ast;
pub mod config;
pub mod error;
pub mod schema;
pub mod template;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::builders::*;
    pub use crate::ast::*;
    pub use crate::config::ForgeConfig;
    pub use crate::error::*;
    pub use crate::schema::{ColumnMeta, DataKind, QueryContext};
    pub use crate::template::{
        Placeholder, PlaceholderKind, PlaceholderOptions, PlaceholderRegistry, PreparedTemplate,
        TemplateArg, TemplateArgs,
    };
    pub use crate::transpiler::{Dialect, DialectKind, ExprToSql, ParamContext, SqlTemplate};
}

/// Render one template against a context with the built-in placeholders.
///
/// # Example
///
/// ```
/// use sqlforge::prelude::*;
///
/// let ctx = QueryContext::from_properties(DialectKind::PostgreSql, "users", ["Id", "Name"]).unwrap();
/// let sql = sqlforge::render("DELETE FROM {{table}} WHERE {{where --by Id}}", ctx, &TemplateArgs::new()).unwrap();
/// assert_eq!(sql, "DELETE FROM \"users\" WHERE \"id\" = @id");
/// ```
pub fn render(
    template: &str,
    context: impl Into<std::sync::Arc<schema::QueryContext>>,
    args: &template::TemplateArgs,
) -> error::SqlResult<String> {
    template::PlaceholderRegistry::builtin()
        .prepare(template, context)?
        .render(args)
}
