//! Expression rendering.
//!
//! Walks an [`Expr`] tree and lowers each node for the dialect of a
//! [`QueryContext`]. Column names resolve through the context, constants are
//! either inlined or collected into a [`ParamContext`].

use indexmap::IndexMap;

use super::functions;
use super::subquery;
use crate::ast::{BinaryOp, Expr, Query, SubqueryMode, UnaryOp, Value};
use crate::error::{SqlError, SqlResult};
use crate::schema::QueryContext;
use crate::transpiler::{Dialect, DialectKind};

/// Context for parameterized query building.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamContext {
    /// Next parameter number (`p0`, `p1`, ...)
    pub index: usize,
    /// Collected parameter values, in first-use order
    pub params: IndexMap<String, Value>,
    enabled: bool,
}

impl ParamContext {
    /// Collector that turns every non-null constant into a parameter.
    pub fn new() -> Self {
        Self {
            index: 0,
            params: IndexMap::new(),
            enabled: true,
        }
    }

    /// Collector that leaves constants inline.
    pub fn inline() -> Self {
        Self::default()
    }

    pub(crate) fn for_mode(parameterized: bool) -> Self {
        if parameterized {
            Self::new()
        } else {
            Self::inline()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Add a value and return the placeholder for it.
    pub fn add_param(&mut self, value: Value, dialect: &Dialect) -> String {
        let name = format!("p{}", self.index);
        self.index += 1;
        let placeholder = dialect.parameter(&name);
        self.params.insert(name, value);
        placeholder
    }

    pub fn into_params(self) -> IndexMap<String, Value> {
        self.params
    }
}

/// Trait for converting expression nodes to SQL.
pub trait ExprToSql {
    /// Render with constants inlined.
    fn to_sql(&self, ctx: &QueryContext) -> SqlResult<String>;

    /// Render, moving constants into `params`.
    fn to_sql_parameterized(&self, ctx: &QueryContext, params: &mut ParamContext) -> SqlResult<String>;
}

impl ExprToSql for Expr {
    fn to_sql(&self, ctx: &QueryContext) -> SqlResult<String> {
        let mut params = ParamContext::inline();
        SqlWriter::new(ctx, &mut params).render(self)
    }

    fn to_sql_parameterized(&self, ctx: &QueryContext, params: &mut ParamContext) -> SqlResult<String> {
        SqlWriter::new(ctx, params).render(self)
    }
}

/// Format a value as an inline SQL literal.
///
/// NaN and infinities have no SQL spelling and are rejected.
pub fn literal(value: &Value, dialect: &Dialect) -> SqlResult<String> {
    Ok(match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => dialect.bool_literal(*b).to_string(),
        Value::Int(n) => n.to_string(),
        // Debug keeps the decimal point on whole floats
        Value::Float(f) if !f.is_finite() => {
            return Err(SqlError::invalid("float literal must be finite", f.to_string()))
        }
        Value::Float(f) => format!("{:?}", f),
        Value::Text(s) => quote_text(s, dialect),
        Value::Uuid(u) => quote_text(&u.to_string(), dialect),
        Value::DateTime(dt) => {
            let text = quote_text(&dt.format("%Y-%m-%d %H:%M:%S%.f").to_string(), dialect);
            match dialect.kind {
                DialectKind::Oracle => format!("TIMESTAMP {}", text),
                _ => text,
            }
        }
    })
}

fn quote_text(s: &str, dialect: &Dialect) -> String {
    let doubled = dialect.string_close.repeat(2);
    dialect.wrap_literal_string(&s.replace(dialect.string_close, &doubled))
}

/// Stateful renderer for one statement.
///
/// `group_keys` is the GROUP BY list of the statement being assembled, used
/// to resolve [`Expr::Key`].
pub(crate) struct SqlWriter<'a> {
    schema: &'a QueryContext,
    group_keys: &'a [Expr],
    params: &'a mut ParamContext,
}

impl<'a> SqlWriter<'a> {
    pub(crate) fn new(schema: &'a QueryContext, params: &'a mut ParamContext) -> Self {
        Self {
            schema,
            group_keys: &[],
            params,
        }
    }

    pub(crate) fn grouped(mut self, keys: &'a [Expr]) -> Self {
        self.group_keys = keys;
        self
    }

    pub(crate) fn dialect(&self) -> &'static Dialect {
        self.schema.dialect()
    }

    /// Quoted column for a property name.
    pub(crate) fn column(&self, property: &str) -> String {
        self.dialect().wrap_identifier(&self.schema.column_name(property))
    }

    pub(crate) fn render(&mut self, expr: &Expr) -> SqlResult<String> {
        match expr {
            Expr::Column(name) => Ok(self.column(name)),
            Expr::Constant(value) => self.constant(value),
            Expr::Param(name) => Ok(self.dialect().parameter(name)),
            Expr::Unary { op, operand } => self.render_unary(*op, operand),
            Expr::Binary { left, op, right } => self.render_binary(left, *op, right),
            Expr::Call { func, args } => {
                let template = functions::lookup(*func, args.len(), self.dialect().kind)?;
                let mut rendered = Vec::with_capacity(args.len());
                for arg in args {
                    let sql = self.render(arg)?;
                    rendered.push((sql, self.is_compound(arg)));
                }
                Ok(functions::fill(template, &rendered))
            }
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => Ok(format!(
                "CASE WHEN {} THEN {} ELSE {} END",
                self.render(condition)?,
                self.render(then)?,
                self.render(otherwise)?
            )),
            Expr::Coalesce { value, fallback } => Ok(format!(
                "COALESCE({}, {})",
                self.render(value)?,
                self.render(fallback)?
            )),
            Expr::Aggregate { kind, args } => {
                if args.is_empty() {
                    return Ok(format!("{}(*)", kind));
                }
                Ok(format!("{}({})", kind, self.render_list(args)?))
            }
            Expr::Subquery { query, mode } => self.render_subquery(query, mode),
            Expr::List(items) => self.render_set(items),
            Expr::Key => {
                let key = self.group_key()?;
                self.render(key)
            }
            Expr::Raw(sql) => Ok(sql.clone()),
        }
    }

    fn constant(&mut self, value: &Value) -> SqlResult<String> {
        if self.params.is_enabled() && !value.is_null() {
            if matches!(value, Value::Float(f) if !f.is_finite()) {
                return literal(value, self.dialect());
            }
            let dialect = self.dialect();
            Ok(self.params.add_param(value.clone(), dialect))
        } else {
            literal(value, self.dialect())
        }
    }

    fn group_key(&self) -> SqlResult<&'a Expr> {
        let keys = self.group_keys;
        match keys {
            [] => Err(SqlError::invalid(
                "group key referenced without a GROUP BY clause",
                "Key",
            )),
            [Expr::Key] => Err(SqlError::invalid("GROUP BY cannot group on its own key", "Key")),
            [key] => Ok(key),
            _ => Err(SqlError::invalid(
                "composite group key must be referenced by column",
                "Key",
            )),
        }
    }

    fn render_list(&mut self, items: &[Expr]) -> SqlResult<String> {
        let mut parts = Vec::with_capacity(items.len());
        for item in items {
            parts.push(self.render(item)?);
        }
        Ok(parts.join(", "))
    }

    /// `(a, b, c)`; an empty set renders `(NULL)` so `IN` stays valid and
    /// matches nothing.
    fn render_set(&mut self, items: &[Expr]) -> SqlResult<String> {
        if items.is_empty() {
            return Ok("(NULL)".to_string());
        }
        Ok(format!("({})", self.render_list(items)?))
    }

    fn render_subquery(&mut self, query: &Query, mode: &SubqueryMode) -> SqlResult<String> {
        let outer = self.dialect().kind;
        let inner = query.context().dialect().kind;
        if outer != inner {
            return Err(SqlError::invalid(
                format!("subquery targets {} inside a {} statement", inner, outer),
                query.context().table(),
            ));
        }
        subquery::render(query, mode, &mut *self.params)
    }

    fn render_unary(&mut self, op: UnaryOp, operand: &Expr) -> SqlResult<String> {
        let sql = self.render(operand)?;
        let grouped = self.is_compound(operand);
        Ok(match (op, grouped) {
            (UnaryOp::Not, true) => format!("NOT ({})", sql),
            (UnaryOp::Not, false) => format!("NOT {}", sql),
            // A bare `--` would open a line comment
            (UnaryOp::Negate, _) if grouped || sql.starts_with('-') => format!("-({})", sql),
            (UnaryOp::Negate, _) => format!("-{}", sql),
        })
    }

    fn render_binary(&mut self, left: &Expr, op: BinaryOp, right: &Expr) -> SqlResult<String> {
        if matches!(op, BinaryOp::Eq | BinaryOp::Ne) && (left.is_null_constant() || right.is_null_constant()) {
            let subject = if right.is_null_constant() { left } else { right };
            let sql = self.grouped_operand(subject)?;
            let test = if op == BinaryOp::Eq { "IS NULL" } else { "IS NOT NULL" };
            return Ok(format!("{} {}", sql, test));
        }

        match op {
            BinaryOp::In => {
                let subject = self.grouped_operand(left)?;
                let set = match right {
                    Expr::List(items) => self.render_set(items)?,
                    Expr::Subquery { .. } => self.render(right)?,
                    other => format!("({})", self.render(other)?),
                };
                Ok(format!("{} IN {}", subject, set))
            }
            BinaryOp::Concat if self.dialect().kind == DialectKind::MySql => {
                let mut parts = Vec::new();
                collect_concat(left, &mut parts);
                collect_concat(right, &mut parts);
                let mut rendered = Vec::with_capacity(parts.len());
                for part in parts {
                    rendered.push(self.render(part)?);
                }
                Ok(format!("CONCAT({})", rendered.join(", ")))
            }
            _ => {
                let token = match (op, self.dialect().kind) {
                    (BinaryOp::Concat, DialectKind::SqlServer) => "+",
                    _ => op.token(),
                };
                let l = self.operand(left, op, false)?;
                let r = self.operand(right, op, true)?;
                Ok(format!("{} {} {}", l, token, r))
            }
        }
    }

    /// Render a binary operand, grouping it when its own operator differs or
    /// when the parent is non-associative and the child sits on the right.
    fn operand(&mut self, child: &Expr, parent: BinaryOp, right_side: bool) -> SqlResult<String> {
        let resolved = match child {
            Expr::Key => self.group_key()?,
            other => other,
        };
        let sql = self.render(resolved)?;
        let wrap = match resolved {
            Expr::Binary { op, .. } if self.is_compound(resolved) => {
                *op != parent || (right_side && !parent.is_associative())
            }
            Expr::Unary { op: UnaryOp::Not, .. } => !parent.is_logical(),
            other => self.is_compound(other),
        };
        Ok(if wrap { format!("({})", sql) } else { sql })
    }

    fn grouped_operand(&mut self, expr: &Expr) -> SqlResult<String> {
        let sql = self.render(expr)?;
        Ok(if self.is_compound(expr) {
            format!("({})", sql)
        } else {
            sql
        })
    }

    /// Whether the rendered form of `expr` has operators at top level.
    fn is_compound(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Binary {
                op: BinaryOp::Concat, ..
            } => self.dialect().kind != DialectKind::MySql,
            Expr::Binary { .. } => true,
            Expr::Unary { op: UnaryOp::Not, .. } => true,
            Expr::Call { func, args } => functions::lookup(*func, args.len(), self.dialect().kind)
                .map(functions::is_compound)
                .unwrap_or(false),
            Expr::Key => self.group_key().map(|k| self.is_compound(k)).unwrap_or(false),
            _ => false,
        }
    }
}

fn collect_concat<'e>(expr: &'e Expr, out: &mut Vec<&'e Expr>) {
    match expr {
        Expr::Binary {
            left,
            op: BinaryOp::Concat,
            right,
        } => {
            collect_concat(left, out);
            collect_concat(right, out);
        }
        other => out.push(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use chrono::NaiveDate;

    fn ctx(kind: DialectKind) -> QueryContext {
        QueryContext::from_properties(kind, "users", ["Id", "Name", "Age"]).unwrap()
    }

    #[test]
    fn test_text_literal_doubles_quotes() {
        let sql = lit("O'Brien").to_sql(&ctx(DialectKind::Generic)).unwrap();
        assert_eq!(sql, "'O''Brien'");
    }

    #[test]
    fn test_float_literal_keeps_decimal_point() {
        let generic = &crate::transpiler::dialect::GENERIC;
        assert_eq!(literal(&Value::Float(2.0), generic).unwrap(), "2.0");
        assert_eq!(literal(&Value::Float(0.25), generic).unwrap(), "0.25");
    }

    #[test]
    fn test_non_finite_floats_are_rejected() {
        let generic = &crate::transpiler::dialect::GENERIC;
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(literal(&Value::Float(f), generic).unwrap_err().is_invalid_operation());
        }

        let mut params = ParamContext::new();
        let err = lit(f64::NAN)
            .to_sql_parameterized(&ctx(DialectKind::Generic), &mut params)
            .unwrap_err();
        assert!(err.is_invalid_operation());
        assert!(params.params.is_empty());
    }

    #[test]
    fn test_double_negation_never_emits_a_comment() {
        let c = ctx(DialectKind::Generic);
        assert_eq!(lit(-5).neg().to_sql(&c).unwrap(), "-(-5)");
        assert_eq!(col("Age").neg().neg().to_sql(&c).unwrap(), "-(-[age])");
        assert_eq!(col("Age").neg().to_sql(&c).unwrap(), "-[age]");

        let sql = Query::new(c)
            .delete(col("Age").eq(lit(-5).neg()).and(col("Id").eq(1)))
            .to_sql()
            .unwrap();
        assert_eq!(sql, "DELETE FROM [users] WHERE ([age] = -(-5)) AND ([id] = 1)");
        assert!(!sql.contains("--"));
    }

    #[test]
    fn test_datetime_literal() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        assert_eq!(
            lit(dt).to_sql(&ctx(DialectKind::MySql)).unwrap(),
            "'2024-03-01 12:30:00'"
        );
        assert_eq!(
            lit(dt).to_sql(&ctx(DialectKind::Oracle)).unwrap(),
            "TIMESTAMP '2024-03-01 12:30:00'"
        );
    }

    #[test]
    fn test_param_context_numbers_from_zero() {
        let mut params = ParamContext::new();
        let sql = col("Age")
            .ge(18)
            .and(col("Name").eq("bob"))
            .to_sql_parameterized(&ctx(DialectKind::Oracle), &mut params)
            .unwrap();
        assert_eq!(sql, "(\"age\" >= :p0) AND (\"name\" = :p1)");
        assert_eq!(params.params.get("p0"), Some(&Value::Int(18)));
        assert_eq!(params.params.get("p1"), Some(&Value::Text("bob".into())));
    }

    #[test]
    fn test_null_never_becomes_a_parameter() {
        let mut params = ParamContext::new();
        let sql = col("Name")
            .ne(null())
            .to_sql_parameterized(&ctx(DialectKind::Generic), &mut params)
            .unwrap();
        assert_eq!(sql, "[name] IS NOT NULL");
        assert!(params.params.is_empty());
    }

    #[test]
    fn test_key_without_group_by_fails() {
        let err = key().eq(1).to_sql(&ctx(DialectKind::Generic)).unwrap_err();
        assert!(err.is_invalid_operation());
    }
}
