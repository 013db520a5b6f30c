//! DELETE SQL generation.

use crate::ast::Query;
use crate::error::{SqlError, SqlResult};
use crate::transpiler::expr::{ParamContext, SqlWriter};

use super::where_clause;

/// Generate DELETE SQL.
///
/// A DELETE without a WHERE predicate is rejected rather than emitted as a
/// full-table delete.
pub fn build_delete(query: &Query, params: &mut ParamContext) -> SqlResult<String> {
    let ctx = query.context();
    let mut writer = SqlWriter::new(ctx, params);
    let predicate = where_clause(&mut writer, query)?.ok_or_else(|| {
        SqlError::invalid("DELETE requires a WHERE predicate", ctx.table())
    })?;

    let mut sql = String::from("DELETE FROM ");
    sql.push_str(&ctx.quoted_table());
    sql.push_str(" WHERE ");
    sql.push_str(&predicate);

    Ok(sql)
}
