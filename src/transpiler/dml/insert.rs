//! INSERT SQL generation.

use crate::ast::Query;
use crate::error::{SqlError, SqlResult};
use crate::transpiler::expr::{ParamContext, SqlWriter};

/// Generate INSERT SQL.
///
/// Emits `VALUES` rows, or appends the caller's literal SELECT when one was
/// given. With neither, only `INSERT INTO <table> [(<columns>)]` is produced.
pub fn build_insert(query: &Query, params: &mut ParamContext) -> SqlResult<String> {
    let ctx = query.context();
    let dialect = ctx.dialect();

    if query.insert_source.is_some() && !query.rows.is_empty() {
        return Err(SqlError::invalid(
            "INSERT cannot combine VALUES rows with a SELECT source",
            ctx.table(),
        ));
    }

    let mut sql = String::from("INSERT INTO ");
    sql.push_str(&ctx.quoted_table());

    if !query.insert_columns.is_empty() {
        let cols: Vec<String> = query
            .insert_columns
            .iter()
            .map(|c| dialect.wrap_identifier(&ctx.column_name(c)))
            .collect();
        sql.push_str(" (");
        sql.push_str(&cols.join(", "));
        sql.push(')');
    }

    if let Some(source) = &query.insert_source {
        sql.push(' ');
        sql.push_str(source.trim());
        return Ok(sql);
    }

    if query.rows.is_empty() {
        return Ok(sql);
    }

    let width = query.insert_columns.len();
    let mut writer = SqlWriter::new(ctx, params);
    let mut rows = Vec::with_capacity(query.rows.len());
    for row in &query.rows {
        if width > 0 && row.len() != width {
            return Err(SqlError::invalid(
                format!("VALUES row has {} items for {} columns", row.len(), width),
                ctx.table(),
            ));
        }
        let mut items = Vec::with_capacity(row.len());
        for value in row {
            items.push(writer.render(value)?);
        }
        rows.push(format!("({})", items.join(", ")));
    }

    sql.push_str(" VALUES ");
    sql.push_str(&rows.join(", "));
    Ok(sql)
}
