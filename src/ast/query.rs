use std::sync::Arc;

use crate::ast::{BinaryOp, Expr, SortOrder, Statement, SubqueryMode};
use crate::schema::QueryContext;

/// One entry of the SELECT list.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl From<&str> for Projection {
    fn from(property: &str) -> Self {
        Self {
            expr: Expr::Column(property.to_string()),
            alias: None,
        }
    }
}

impl From<String> for Projection {
    fn from(property: String) -> Self {
        Self {
            expr: Expr::Column(property),
            alias: None,
        }
    }
}

impl From<Expr> for Projection {
    fn from(expr: Expr) -> Self {
        Self { expr, alias: None }
    }
}

impl<S: Into<String>> From<(Expr, S)> for Projection {
    fn from((expr, alias): (Expr, S)) -> Self {
        Self {
            expr,
            alias: Some(alias.into()),
        }
    }
}

/// Accumulated clause state of a query.
///
/// Every chain method consumes the builder and returns the updated one, so
/// two builders never share clause lists; `clone` to branch.
///
/// Methods that take an `impl Into<Option<Expr>>` treat `None` as "skip this
/// clause". Callers rely on that to build queries conditionally.
///
/// # Example
/// ```
/// use sqlforge::prelude::*;
///
/// let ctx = QueryContext::from_properties(DialectKind::Generic, "users", ["Id", "Name"]).unwrap();
/// let sql = Query::new(ctx)
///     .filter(col("Id").eq(1))
///     .to_sql()
///     .unwrap();
/// assert_eq!(sql, "SELECT * FROM [users] WHERE [id] = 1");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub(crate) context: Arc<QueryContext>,
    pub statement: Statement,
    /// WHERE predicate, AND-folded in call order
    pub filter: Option<Expr>,
    pub projection: Vec<Projection>,
    pub distinct: bool,
    pub order_by: Vec<(Expr, SortOrder)>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    pub skip: Option<u64>,
    pub take: Option<u64>,
    /// SET assignments: (property, value)
    pub assignments: Vec<(String, Expr)>,
    pub insert_columns: Vec<String>,
    pub rows: Vec<Vec<Expr>>,
    /// Raw SELECT feeding an INSERT instead of VALUES rows
    pub insert_source: Option<String>,
    /// Render constants as named parameters
    pub parameterized: bool,
}

fn fold(existing: Option<Expr>, op: BinaryOp, next: Expr) -> Option<Expr> {
    Some(match existing {
        Some(prev) => Expr::binary(prev, op, next),
        None => next,
    })
}

impl Query {
    /// Start a SELECT against the context's table.
    pub fn new(context: impl Into<Arc<QueryContext>>) -> Self {
        Self {
            context: context.into(),
            statement: Statement::Select,
            filter: None,
            projection: vec![],
            distinct: false,
            order_by: vec![],
            group_by: vec![],
            having: None,
            skip: None,
            take: None,
            assignments: vec![],
            insert_columns: vec![],
            rows: vec![],
            insert_source: None,
            parameterized: false,
        }
    }

    pub fn context(&self) -> &QueryContext {
        &self.context
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    /// Add a WHERE predicate; repeated calls are joined with AND.
    pub fn filter(mut self, predicate: impl Into<Option<Expr>>) -> Self {
        if let Some(p) = predicate.into() {
            self.filter = fold(self.filter.take(), BinaryOp::And, p);
        }
        self
    }

    /// Same as [`Query::filter`].
    pub fn and(self, predicate: impl Into<Option<Expr>>) -> Self {
        self.filter(predicate)
    }

    /// Combine a predicate with the current WHERE using OR.
    pub fn or(mut self, predicate: impl Into<Option<Expr>>) -> Self {
        if let Some(p) = predicate.into() {
            self.filter = fold(self.filter.take(), BinaryOp::Or, p);
        }
        self
    }

    // =========================================================================
    // Projection
    // =========================================================================

    /// Add columns or expressions to the SELECT list.
    ///
    /// An empty list leaves `SELECT *` in place.
    pub fn select<I, P>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Projection>,
    {
        self.projection.extend(items.into_iter().map(Into::into));
        self
    }

    /// Add one aliased expression to the SELECT list.
    pub fn select_as(mut self, expr: impl Into<Option<Expr>>, alias: impl Into<String>) -> Self {
        if let Some(expr) = expr.into() {
            self.projection.push(Projection {
                expr,
                alias: Some(alias.into()),
            });
        }
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    // =========================================================================
    // Ordering, grouping, pagination
    // =========================================================================

    pub fn order_by(mut self, expr: impl Into<Option<Expr>>) -> Self {
        if let Some(e) = expr.into() {
            self.order_by.push((e, SortOrder::Asc));
        }
        self
    }

    pub fn order_by_descending(mut self, expr: impl Into<Option<Expr>>) -> Self {
        if let Some(e) = expr.into() {
            self.order_by.push((e, SortOrder::Desc));
        }
        self
    }

    pub fn group_by(mut self, expr: impl Into<Option<Expr>>) -> Self {
        if let Some(e) = expr.into() {
            self.group_by.push(e);
        }
        self
    }

    /// HAVING predicate; repeated calls are joined with AND.
    pub fn having(mut self, predicate: impl Into<Option<Expr>>) -> Self {
        if let Some(p) = predicate.into() {
            self.having = fold(self.having.take(), BinaryOp::And, p);
        }
        self
    }

    /// Rows to skip; `None` leaves the current value alone.
    pub fn skip(mut self, n: impl Into<Option<u64>>) -> Self {
        if let Some(n) = n.into() {
            self.skip = Some(n);
        }
        self
    }

    /// Rows to return; `None` leaves the current value alone.
    pub fn take(mut self, n: impl Into<Option<u64>>) -> Self {
        if let Some(n) = n.into() {
            self.take = Some(n);
        }
        self
    }

    pub fn paginate(self, skip: Option<u64>, take: Option<u64>) -> Self {
        self.skip(skip).take(take)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Switch to an INSERT statement.
    pub fn insert(mut self) -> Self {
        self.statement = Statement::Insert;
        self
    }

    /// Column list of the INSERT, by property name.
    pub fn insert_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.statement = Statement::Insert;
        self.insert_columns
            .extend(columns.into_iter().map(|c| c.as_ref().to_string()));
        self
    }

    /// Replace the VALUES rows with a single row.
    ///
    /// An empty row is a no-op: no VALUES clause is produced at all.
    pub fn values<I, E>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        let row: Vec<Expr> = row.into_iter().map(Into::into).collect();
        if !row.is_empty() {
            self.rows = vec![row];
        }
        self
    }

    /// Append another VALUES row; empty rows are ignored.
    pub fn add_values<I, E>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        let row: Vec<Expr> = row.into_iter().map(Into::into).collect();
        if !row.is_empty() {
            self.rows.push(row);
        }
        self
    }

    /// Feed the INSERT from a literal SELECT instead of VALUES rows.
    pub fn insert_select(mut self, select_sql: impl Into<String>) -> Self {
        self.statement = Statement::Insert;
        self.insert_source = Some(select_sql.into());
        self
    }

    /// Switch to an UPDATE statement.
    pub fn update(mut self) -> Self {
        self.statement = Statement::Update;
        self
    }

    /// Add a SET assignment for a property; `None` skips it.
    pub fn set(mut self, property: impl AsRef<str>, value: impl Into<Option<Expr>>) -> Self {
        if let Some(v) = value.into() {
            self.assignments.push((property.as_ref().to_string(), v));
        }
        self
    }

    /// Switch to a DELETE statement, optionally adding a predicate.
    ///
    /// Rendering fails unless some WHERE predicate exists.
    pub fn delete(self, predicate: impl Into<Option<Expr>>) -> Self {
        let mut query = self.filter(predicate);
        query.statement = Statement::Delete;
        query
    }

    /// Render constants as named parameters instead of inline literals.
    pub fn parameterized(mut self, on: bool) -> Self {
        self.parameterized = on;
        self
    }

    // =========================================================================
    // Subquery terminals
    // =========================================================================

    fn into_subquery(self, mode: SubqueryMode) -> Expr {
        Expr::Subquery {
            query: Box::new(self),
            mode,
        }
    }

    /// `(SELECT COUNT(*) FROM (inner) AS sq)`
    pub fn count(self) -> Expr {
        self.into_subquery(SubqueryMode::Count(None))
    }

    /// COUNT of the inner rows matching `predicate`.
    pub fn count_where(self, predicate: Expr) -> Expr {
        self.into_subquery(SubqueryMode::Count(Some(Box::new(predicate))))
    }

    /// 1 when the inner query yields any row.
    pub fn any(self) -> Expr {
        self.into_subquery(SubqueryMode::Any(None))
    }

    pub fn any_where(self, predicate: Expr) -> Expr {
        self.into_subquery(SubqueryMode::Any(Some(Box::new(predicate))))
    }

    /// 1 when every inner row satisfies `predicate`.
    pub fn all(self, predicate: Expr) -> Expr {
        self.into_subquery(SubqueryMode::All(Box::new(predicate)))
    }

    pub fn first(self) -> Expr {
        self.into_subquery(SubqueryMode::First(None))
    }

    pub fn first_where(self, predicate: Expr) -> Expr {
        self.into_subquery(SubqueryMode::First(Some(Box::new(predicate))))
    }

    /// The inner SELECT, unwrapped.
    pub fn to_list(self) -> Expr {
        self.into_subquery(SubqueryMode::ToList)
    }

    /// Same as [`Query::to_list`].
    pub fn to_array(self) -> Expr {
        self.to_list()
    }
}
