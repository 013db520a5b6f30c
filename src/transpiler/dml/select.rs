//! SELECT SQL generation.

use crate::ast::Query;
use crate::error::SqlResult;
use crate::transpiler::expr::{ParamContext, SqlWriter};

use super::{additional_clauses, where_clause};

/// Generate SELECT SQL.
pub fn build_select(query: &Query, params: &mut ParamContext) -> SqlResult<String> {
    let ctx = query.context();
    let dialect = ctx.dialect();
    let mut writer = SqlWriter::new(ctx, params).grouped(&query.group_by);

    let mut sql = if query.distinct {
        String::from("SELECT DISTINCT ")
    } else {
        String::from("SELECT ")
    };

    // Columns
    if query.projection.is_empty() {
        if query.group_by.is_empty() {
            sql.push('*');
        } else {
            // A grouped query without a projection selects its keys
            let mut keys = Vec::with_capacity(query.group_by.len());
            for key in &query.group_by {
                keys.push(writer.render(key)?);
            }
            sql.push_str(&keys.join(", "));
        }
    } else {
        let mut cols = Vec::with_capacity(query.projection.len());
        for item in &query.projection {
            let expr = writer.render(&item.expr)?;
            cols.push(match &item.alias {
                Some(alias) => format!("{} AS {}", expr, dialect.wrap_identifier(alias)),
                None => expr,
            });
        }
        sql.push_str(&cols.join(", "));
    }

    // FROM
    sql.push_str(" FROM ");
    sql.push_str(&ctx.quoted_table());

    if let Some(predicate) = where_clause(&mut writer, query)? {
        sql.push_str(" WHERE ");
        sql.push_str(&predicate);
    }

    for clause in additional_clauses(&mut writer, query)? {
        sql.push(' ');
        sql.push_str(&clause);
    }

    Ok(sql)
}
