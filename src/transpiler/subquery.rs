//! Subquery lowering.
//!
//! A nested [`Query`] becomes a parenthesized SQL subexpression. Wrappers
//! that filter the inner rows read them through a derived table named `sq`;
//! each wrapper opens its own `sq` scope, so nesting does not clash.

use super::dml::select::build_select;
use super::expr::{ParamContext, SqlWriter};
use crate::ast::{Expr, Query, SubqueryMode};
use crate::error::SqlResult;

const ALIAS: &str = "sq";

/// Lower `query` according to `mode`, sharing the enclosing statement's
/// parameter collector.
pub(crate) fn render(query: &Query, mode: &SubqueryMode, params: &mut ParamContext) -> SqlResult<String> {
    let dialect = query.context().dialect();

    match mode {
        SubqueryMode::ToList => Ok(format!("({})", build_select(query, params)?)),
        SubqueryMode::First(predicate) => {
            let first = query
                .clone()
                .filter(predicate.as_deref().cloned())
                .take(1);
            Ok(format!("({})", build_select(&first, params)?))
        }
        SubqueryMode::Count(predicate) => {
            let inner = build_select(query, params)?;
            let mut sql = format!(
                "(SELECT COUNT(*) FROM ({}) {}",
                inner,
                dialect.derived_alias(ALIAS)
            );
            if let Some(p) = predicate {
                sql.push_str(" WHERE ");
                sql.push_str(&inner_predicate(query, p, params)?);
            }
            sql.push(')');
            Ok(sql)
        }
        SubqueryMode::Any(None) => {
            let inner = build_select(query, params)?;
            Ok(format!(
                "(SELECT CASE WHEN EXISTS({}) THEN 1 ELSE 0 END{})",
                inner,
                dialect.scalar_from()
            ))
        }
        SubqueryMode::Any(Some(p)) => {
            let matching = matching_rows(query, p, params, false)?;
            Ok(format!(
                "(SELECT CASE WHEN EXISTS({}) THEN 1 ELSE 0 END{})",
                matching,
                dialect.scalar_from()
            ))
        }
        SubqueryMode::All(p) => {
            let failing = matching_rows(query, p, params, true)?;
            Ok(format!(
                "(SELECT CASE WHEN NOT EXISTS({}) THEN 1 ELSE 0 END{})",
                failing,
                dialect.scalar_from()
            ))
        }
    }
}

/// `SELECT 1 FROM (<inner>) AS sq WHERE <p>`, or `WHERE NOT (<p>)` when
/// `negate` is set.
fn matching_rows(query: &Query, predicate: &Expr, params: &mut ParamContext, negate: bool) -> SqlResult<String> {
    let dialect = query.context().dialect();
    let inner = build_select(query, params)?;
    let condition = inner_predicate(query, predicate, params)?;
    let condition = if negate {
        format!("NOT ({})", condition)
    } else {
        condition
    };
    Ok(format!(
        "SELECT 1 FROM ({}) {} WHERE {}",
        inner,
        dialect.derived_alias(ALIAS),
        condition
    ))
}

/// Predicates over `sq` see the inner query's columns.
fn inner_predicate(query: &Query, predicate: &Expr, params: &mut ParamContext) -> SqlResult<String> {
    SqlWriter::new(query.context(), params).render(predicate)
}
