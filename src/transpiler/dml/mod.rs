//! DML (Data Manipulation Language) SQL generation.
//!
//! This module contains the SELECT, INSERT, UPDATE and DELETE assemblers and
//! the terminal methods of [`Query`] that drive them.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{trace, warn};

use crate::ast::{Query, Statement, Value};
use crate::error::{SqlError, SqlResult};
use crate::transpiler::expr::{ParamContext, SqlWriter};
use crate::transpiler::PaginationStyle;

/// A rendered statement and the parameters it references.
///
/// `params` is empty unless the query was built in parameterized mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlTemplate {
    pub sql: String,
    pub params: IndexMap<String, Value>,
}

impl Query {
    /// Render the full statement.
    pub fn to_sql(&self) -> SqlResult<String> {
        let mut params = ParamContext::for_mode(self.parameterized);
        self.build(&mut params)
    }

    /// Render the full statement together with its extracted parameters.
    pub fn to_template(&self) -> SqlResult<SqlTemplate> {
        let mut params = ParamContext::for_mode(self.parameterized);
        let sql = self.build(&mut params)?;
        Ok(SqlTemplate {
            sql,
            params: params.into_params(),
        })
    }

    /// The WHERE predicate without the keyword; empty when there is none.
    ///
    /// The fragment is self-contained: constants are always inlined, whatever
    /// the parameterization mode. Use [`Query::to_where_template`] to keep
    /// them as parameters.
    pub fn to_where_clause(&self) -> SqlResult<String> {
        Ok(self.with_inline(Self::to_where_template)?.sql)
    }

    /// `[a] = 1, [b] = 2` for the SET assignments, with constants inlined.
    pub fn to_set_clause(&self) -> SqlResult<String> {
        Ok(self.with_inline(Self::to_set_template)?.sql)
    }

    /// GROUP BY, HAVING, ORDER BY and pagination, space separated, with
    /// constants inlined.
    pub fn to_additional_clause(&self) -> SqlResult<String> {
        Ok(self.with_inline(Self::to_additional_template)?.sql)
    }

    /// The WHERE predicate and the parameters it references.
    pub fn to_where_template(&self) -> SqlResult<SqlTemplate> {
        let mut params = ParamContext::for_mode(self.parameterized);
        let mut writer = SqlWriter::new(self.context(), &mut params).grouped(&self.group_by);
        let sql = where_clause(&mut writer, self)?.unwrap_or_default();
        Ok(SqlTemplate {
            sql,
            params: params.into_params(),
        })
    }

    pub fn to_set_template(&self) -> SqlResult<SqlTemplate> {
        let mut params = ParamContext::for_mode(self.parameterized);
        let mut writer = SqlWriter::new(self.context(), &mut params);
        let sql = set_clause(&mut writer, self)?;
        Ok(SqlTemplate {
            sql,
            params: params.into_params(),
        })
    }

    pub fn to_additional_template(&self) -> SqlResult<SqlTemplate> {
        let mut params = ParamContext::for_mode(self.parameterized);
        let mut writer = SqlWriter::new(self.context(), &mut params).grouped(&self.group_by);
        let sql = additional_clauses(&mut writer, self)?.join(" ");
        Ok(SqlTemplate {
            sql,
            params: params.into_params(),
        })
    }

    fn with_inline(&self, terminal: impl Fn(&Self) -> SqlResult<SqlTemplate>) -> SqlResult<SqlTemplate> {
        if self.parameterized {
            terminal(&self.clone().parameterized(false))
        } else {
            terminal(self)
        }
    }

    fn build(&self, params: &mut ParamContext) -> SqlResult<String> {
        let sql = match self.statement {
            Statement::Select => select::build_select(self, params)?,
            Statement::Insert => insert::build_insert(self, params)?,
            Statement::Update => update::build_update(self, params)?,
            Statement::Delete => delete::build_delete(self, params)?,
        };
        trace!(
            statement = %self.statement,
            table = self.context().table(),
            params = params.params.len(),
            "assembled statement"
        );
        Ok(sql)
    }
}

/// Aggregates belong in HAVING; a subquery's own aggregates are fine.
pub(crate) fn where_clause(writer: &mut SqlWriter<'_>, query: &Query) -> SqlResult<Option<String>> {
    match &query.filter {
        Some(predicate) if predicate.contains_aggregate() => Err(SqlError::invalid(
            "aggregate in WHERE, use HAVING",
            query.context().table(),
        )),
        Some(predicate) => writer.render(predicate).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn set_clause(writer: &mut SqlWriter<'_>, query: &Query) -> SqlResult<String> {
    let mut parts = Vec::with_capacity(query.assignments.len());
    for (property, value) in &query.assignments {
        let column = writer.column(property);
        parts.push(format!("{} = {}", column, writer.render(value)?));
    }
    Ok(parts.join(", "))
}

/// Clauses that follow WHERE, in assembly order.
pub(crate) fn additional_clauses(writer: &mut SqlWriter<'_>, query: &Query) -> SqlResult<Vec<String>> {
    let ctx = query.context();
    let dialect = ctx.dialect();
    let mut clauses = Vec::new();

    if !query.group_by.is_empty() {
        let mut keys = Vec::with_capacity(query.group_by.len());
        for key in &query.group_by {
            keys.push(writer.render(key)?);
        }
        clauses.push(format!("GROUP BY {}", keys.join(", ")));
    }

    if let Some(having) = &query.having {
        clauses.push(format!("HAVING {}", writer.render(having)?));
    }

    if !query.order_by.is_empty() {
        let mut items = Vec::with_capacity(query.order_by.len());
        for (expr, order) in &query.order_by {
            items.push(format!("{} {}", writer.render(expr)?, order));
        }
        clauses.push(format!("ORDER BY {}", items.join(", ")));
    }

    let take = query.take.map(|n| n.to_string());
    let skip = query.skip.map(|n| n.to_string());
    if let Some(page) = dialect.limit_offset(take.as_deref(), skip.as_deref()) {
        if dialect.pagination == PaginationStyle::OffsetFetch && query.order_by.is_empty() {
            warn!(
                dialect = %dialect.kind,
                table = ctx.table(),
                "OFFSET/FETCH pagination without ORDER BY"
            );
        }
        clauses.push(page);
    }

    Ok(clauses)
}
