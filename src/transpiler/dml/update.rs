//! UPDATE SQL generation.

use crate::ast::Query;
use crate::error::{SqlError, SqlResult};
use crate::transpiler::expr::{ParamContext, SqlWriter};

use super::{set_clause, where_clause};

/// Generate UPDATE SQL. At least one SET assignment is required.
pub fn build_update(query: &Query, params: &mut ParamContext) -> SqlResult<String> {
    let ctx = query.context();
    if query.assignments.is_empty() {
        return Err(SqlError::invalid(
            "UPDATE requires at least one SET assignment",
            ctx.table(),
        ));
    }

    let mut writer = SqlWriter::new(ctx, params);
    let mut sql = String::from("UPDATE ");
    sql.push_str(&ctx.quoted_table());
    sql.push_str(" SET ");
    sql.push_str(&set_clause(&mut writer, query)?);

    if let Some(predicate) = where_clause(&mut writer, query)? {
        sql.push_str(" WHERE ");
        sql.push_str(&predicate);
    }

    Ok(sql)
}
