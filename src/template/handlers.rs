//! Built-in placeholder handlers.

use tracing::trace;

use super::{Placeholder, PlaceholderKind, PlaceholderOptions, TemplateArg, TemplateArgs};
use crate::ast::builders::{col, param, ExprExt};
use crate::ast::{Expr, SortOrder, Value};
use crate::error::{SqlError, SqlResult};
use crate::schema::{ColumnMeta, QueryContext};
use crate::transpiler::ExprToSql;

fn by_param(options: &PlaceholderOptions) -> PlaceholderKind {
    if options.has("param") {
        PlaceholderKind::Dynamic
    } else {
        PlaceholderKind::Static
    }
}

/// Name of the runtime argument given with `--param`.
fn param_name<'o>(handler: &str, options: &'o PlaceholderOptions) -> SqlResult<&'o str> {
    match options.get("param") {
        Some(name) if !name.trim().is_empty() => Ok(name.trim()),
        _ => Err(SqlError::invalid("--param needs an argument name", handler)),
    }
}

fn text_arg(args: &TemplateArgs, name: &str) -> SqlResult<String> {
    match args.require(name)? {
        TemplateArg::Value(Value::Text(s)) => Ok(s.trim().to_string()),
        TemplateArg::Value(other) => Ok(other.to_string()),
        TemplateArg::Expr(_) => Err(SqlError::invalid("expected a text argument", name)),
    }
}

/// Columns left after `--exclude`, each paired with its `--inline` override.
fn selected_columns<'c>(
    ctx: &'c QueryContext,
    options: &PlaceholderOptions,
) -> SqlResult<Vec<(&'c ColumnMeta, Option<String>)>> {
    let excluded = options.list("exclude");
    let inline = options.pairs("inline")?;
    Ok(ctx
        .columns_except(&excluded)
        .map(|c| {
            let expr = inline
                .iter()
                .find(|(prop, _)| c.is(prop))
                .map(|(_, expr)| expr.clone());
            (c, expr)
        })
        .collect())
}

// ============================================================================
// table
// ============================================================================

/// `{{table}}` quotes the context table; `--param x` quotes `args[x]`.
pub struct TablePlaceholder;

impl Placeholder for TablePlaceholder {
    fn name(&self) -> &'static str {
        "table"
    }

    fn classify(&self, options: &PlaceholderOptions) -> PlaceholderKind {
        by_param(options)
    }

    fn validate(&self, options: &PlaceholderOptions) -> SqlResult<()> {
        if options.has("param") {
            param_name(self.name(), options)?;
        }
        Ok(())
    }

    fn resolve_static(&self, ctx: &QueryContext, _options: &PlaceholderOptions) -> SqlResult<String> {
        Ok(ctx.quoted_table())
    }

    fn resolve_dynamic(
        &self,
        ctx: &QueryContext,
        options: &PlaceholderOptions,
        args: &TemplateArgs,
    ) -> SqlResult<String> {
        let name = param_name(self.name(), options)?;
        let table = text_arg(args, name)?;
        Ok(ctx.dialect().wrap_identifier(&table))
    }
}

// ============================================================================
// columns / values / set
// ============================================================================

/// `{{columns}}`: `[a], [b]`, honoring `--exclude`.
pub struct ColumnsPlaceholder;

impl Placeholder for ColumnsPlaceholder {
    fn name(&self) -> &'static str {
        "columns"
    }

    fn classify(&self, _options: &PlaceholderOptions) -> PlaceholderKind {
        PlaceholderKind::Static
    }

    fn resolve_static(&self, ctx: &QueryContext, options: &PlaceholderOptions) -> SqlResult<String> {
        let dialect = ctx.dialect();
        let excluded = options.list("exclude");
        let cols: Vec<String> = ctx
            .columns_except(&excluded)
            .map(|c| dialect.wrap_identifier(&c.column_name))
            .collect();
        Ok(cols.join(", "))
    }
}

/// `{{values}}`: `(@a, @b)`, honoring `--exclude` and `--inline`.
pub struct ValuesPlaceholder;

impl Placeholder for ValuesPlaceholder {
    fn name(&self) -> &'static str {
        "values"
    }

    fn classify(&self, _options: &PlaceholderOptions) -> PlaceholderKind {
        PlaceholderKind::Static
    }

    fn validate(&self, options: &PlaceholderOptions) -> SqlResult<()> {
        options.pairs("inline").map(|_| ())
    }

    fn resolve_static(&self, ctx: &QueryContext, options: &PlaceholderOptions) -> SqlResult<String> {
        let dialect = ctx.dialect();
        let items: Vec<String> = selected_columns(ctx, options)?
            .into_iter()
            .map(|(c, inline)| inline.unwrap_or_else(|| dialect.parameter(&c.column_name)))
            .collect();
        Ok(format!("({})", items.join(", ")))
    }
}

/// `{{set}}`: `[a] = @a, [b] = @b`, honoring `--exclude` and `--inline`.
pub struct SetPlaceholder;

impl Placeholder for SetPlaceholder {
    fn name(&self) -> &'static str {
        "set"
    }

    fn classify(&self, _options: &PlaceholderOptions) -> PlaceholderKind {
        PlaceholderKind::Static
    }

    fn validate(&self, options: &PlaceholderOptions) -> SqlResult<()> {
        options.pairs("inline").map(|_| ())
    }

    fn resolve_static(&self, ctx: &QueryContext, options: &PlaceholderOptions) -> SqlResult<String> {
        let dialect = ctx.dialect();
        let items: Vec<String> = selected_columns(ctx, options)?
            .into_iter()
            .map(|(c, inline)| {
                let value = inline.unwrap_or_else(|| dialect.parameter(&c.column_name));
                format!("{} = {}", dialect.wrap_identifier(&c.column_name), value)
            })
            .collect();
        Ok(items.join(", "))
    }
}

// ============================================================================
// where
// ============================================================================

/// `{{where --by Id,Name}}` matches each column against its named parameter;
/// `{{where --param x}}` lowers an expression argument or copies text.
///
/// Renders the predicate only; the template supplies the `WHERE` keyword.
pub struct WherePlaceholder;

impl Placeholder for WherePlaceholder {
    fn name(&self) -> &'static str {
        "where"
    }

    fn classify(&self, options: &PlaceholderOptions) -> PlaceholderKind {
        by_param(options)
    }

    fn validate(&self, options: &PlaceholderOptions) -> SqlResult<()> {
        if options.has("param") {
            param_name(self.name(), options)?;
        } else if options.list("by").is_empty() {
            return Err(SqlError::invalid("needs --by or --param", self.name()));
        }
        Ok(())
    }

    fn resolve_static(&self, ctx: &QueryContext, options: &PlaceholderOptions) -> SqlResult<String> {
        let predicate = options
            .list("by")
            .iter()
            .map(|prop| col(prop.as_str()).eq(param(ctx.column_name(prop))))
            .reduce(|acc, next| acc.and(next))
            .ok_or_else(|| SqlError::invalid("needs --by or --param", self.name()))?;
        predicate.to_sql(ctx)
    }

    fn resolve_dynamic(
        &self,
        ctx: &QueryContext,
        options: &PlaceholderOptions,
        args: &TemplateArgs,
    ) -> SqlResult<String> {
        let name = param_name(self.name(), options)?;
        match args.require(name)? {
            TemplateArg::Expr(expr) => expr.to_sql(ctx),
            TemplateArg::Value(Value::Text(sql)) => Ok(sql.clone()),
            TemplateArg::Value(_) => Err(SqlError::invalid(
                "expected an expression or SQL text",
                name,
            )),
        }
    }
}

// ============================================================================
// orderby
// ============================================================================

/// `{{orderby --by Name [--desc]}}` or `{{orderby --param x}}`.
///
/// Each item may carry its own `asc`/`desc`; `--desc` flips the default.
/// Renders the sort list without the `ORDER BY` keyword.
pub struct OrderByPlaceholder;

impl OrderByPlaceholder {
    fn render_items(
        &self,
        ctx: &QueryContext,
        items: &[String],
        default: SortOrder,
    ) -> SqlResult<String> {
        let mut rendered = Vec::with_capacity(items.len());
        for item in items {
            let mut words = item.split_whitespace();
            let prop = words.next().unwrap_or_default();
            let order = match words.next().map(str::to_ascii_lowercase).as_deref() {
                None => default,
                Some("asc") => SortOrder::Asc,
                Some("desc") => SortOrder::Desc,
                Some(other) => {
                    return Err(SqlError::invalid(
                        format!("unknown sort direction '{}'", other),
                        item.as_str(),
                    ))
                }
            };
            let meta = ctx
                .column(prop)
                .ok_or_else(|| SqlError::invalid("unknown property for ORDER BY", prop))?;
            rendered.push(format!(
                "{} {}",
                ctx.dialect().wrap_identifier(&meta.column_name),
                order
            ));
        }
        if rendered.is_empty() {
            return Err(SqlError::invalid("no sort column given", self.name()));
        }
        Ok(rendered.join(", "))
    }

    fn default_order(options: &PlaceholderOptions) -> SortOrder {
        if options.has("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}

impl Placeholder for OrderByPlaceholder {
    fn name(&self) -> &'static str {
        "orderby"
    }

    fn classify(&self, options: &PlaceholderOptions) -> PlaceholderKind {
        by_param(options)
    }

    fn validate(&self, options: &PlaceholderOptions) -> SqlResult<()> {
        if options.has("param") {
            param_name(self.name(), options)?;
        } else if options.list("by").is_empty() {
            return Err(SqlError::invalid("needs --by or --param", self.name()));
        }
        Ok(())
    }

    fn resolve_static(&self, ctx: &QueryContext, options: &PlaceholderOptions) -> SqlResult<String> {
        self.render_items(ctx, &options.list("by"), Self::default_order(options))
    }

    fn resolve_dynamic(
        &self,
        ctx: &QueryContext,
        options: &PlaceholderOptions,
        args: &TemplateArgs,
    ) -> SqlResult<String> {
        let name = param_name(self.name(), options)?;
        let value = text_arg(args, name)?;
        let items: Vec<String> = value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        trace!(argument = name, items = items.len(), "dynamic ORDER BY");
        self.render_items(ctx, &items, Self::default_order(options))
    }
}

// ============================================================================
// limit / offset
// ============================================================================

/// Which half of the pagination fragment a handler renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Limit,
    Offset,
}

/// `{{limit}}` / `{{offset}}`: the dialect pagination fragment over `@limit`
/// / `@offset`, an inline `--value n`, or a runtime `--param x`.
///
/// Skip and take together must come from one token, since OFFSET/FETCH
/// dialects cannot split them: `{{limit --offset}}` pages over `@limit` and
/// `@offset`, `{{limit --offset 20}}` inlines the skip and
/// `{{limit --skip x}}` reads it from `args[x]`.
pub struct PagePlaceholder {
    page: Page,
}

/// Non-negative integer runtime argument.
fn count_arg(args: &TemplateArgs, name: &str) -> SqlResult<i64> {
    match args.require(name)? {
        TemplateArg::Value(v) => v.as_int().filter(|n| *n >= 0),
        TemplateArg::Expr(Expr::Constant(v)) => v.as_int().filter(|n| *n >= 0),
        TemplateArg::Expr(_) => None,
    }
    .ok_or_else(|| SqlError::invalid("expected a non-negative integer", name))
}

fn check_count(value: &str) -> SqlResult<()> {
    value
        .parse::<u64>()
        .map(|_| ())
        .map_err(|_| SqlError::invalid("expected a non-negative integer", value))
}

impl PagePlaceholder {
    pub fn limit() -> Self {
        Self { page: Page::Limit }
    }

    pub fn offset() -> Self {
        Self { page: Page::Offset }
    }

    /// Own operand without runtime arguments: `--value n` or `@name`.
    fn static_operand(&self, ctx: &QueryContext, options: &PlaceholderOptions) -> String {
        match options.get("value") {
            Some(n) => n.to_string(),
            None => ctx.dialect().parameter(self.name()),
        }
    }

    /// Skip operand folded into `{{limit}}` by `--offset [n]`.
    fn static_skip(ctx: &QueryContext, options: &PlaceholderOptions) -> Option<String> {
        options.get("offset").map(|n| match n {
            "" => ctx.dialect().parameter("offset"),
            n => n.to_string(),
        })
    }

    fn fragment(&self, ctx: &QueryContext, operand: &str, skip: Option<&str>) -> SqlResult<String> {
        let dialect = ctx.dialect();
        let sql = match self.page {
            Page::Limit => dialect.limit_offset(Some(operand), skip),
            Page::Offset => dialect.limit_offset(None, Some(operand)),
        };
        sql.ok_or_else(|| SqlError::invalid("empty pagination fragment", self.name()))
    }
}

impl Placeholder for PagePlaceholder {
    fn name(&self) -> &'static str {
        match self.page {
            Page::Limit => "limit",
            Page::Offset => "offset",
        }
    }

    fn classify(&self, options: &PlaceholderOptions) -> PlaceholderKind {
        if options.has("param") || options.has("skip") {
            PlaceholderKind::Dynamic
        } else {
            PlaceholderKind::Static
        }
    }

    fn validate(&self, options: &PlaceholderOptions) -> SqlResult<()> {
        if options.has("param") {
            param_name(self.name(), options)?;
            if options.has("value") {
                return Err(SqlError::invalid("--value and --param are exclusive", self.name()));
            }
        }
        if let Some(value) = options.get("value") {
            check_count(value)?;
        }

        let folds_skip = options.has("offset") || options.has("skip");
        if folds_skip && self.page == Page::Offset {
            return Err(SqlError::invalid(
                "skip is combined through {{limit}}, not {{offset}}",
                self.name(),
            ));
        }
        match (options.get("offset"), options.get("skip")) {
            (Some(_), Some(_)) => {
                return Err(SqlError::invalid("--offset and --skip are exclusive", self.name()))
            }
            (Some(n), None) if !n.is_empty() => check_count(n)?,
            (None, Some(name)) if name.trim().is_empty() => {
                return Err(SqlError::invalid("--skip needs an argument name", self.name()))
            }
            _ => {}
        }
        Ok(())
    }

    fn resolve_static(&self, ctx: &QueryContext, options: &PlaceholderOptions) -> SqlResult<String> {
        let skip = Self::static_skip(ctx, options);
        self.fragment(ctx, &self.static_operand(ctx, options), skip.as_deref())
    }

    fn resolve_dynamic(
        &self,
        ctx: &QueryContext,
        options: &PlaceholderOptions,
        args: &TemplateArgs,
    ) -> SqlResult<String> {
        let operand = if options.has("param") {
            count_arg(args, param_name(self.name(), options)?)?.to_string()
        } else {
            self.static_operand(ctx, options)
        };
        let skip = match options.get("skip") {
            Some(name) => Some(count_arg(args, name.trim())?.to_string()),
            None => Self::static_skip(ctx, options),
        };
        self.fragment(ctx, &operand, skip.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DataKind;
    use crate::transpiler::DialectKind;
    use pretty_assertions::assert_eq;

    fn ctx(kind: DialectKind) -> QueryContext {
        QueryContext::new(
            kind,
            "users",
            vec![
                ColumnMeta::new("Id", DataKind::Int),
                ColumnMeta::new("UserName", DataKind::Text),
                ColumnMeta::new("CreatedAt", DataKind::DateTime),
            ],
        )
        .unwrap()
    }

    fn opts(raw: &str) -> PlaceholderOptions {
        PlaceholderOptions::parse(raw, 0).unwrap()
    }

    #[test]
    fn test_columns_and_exclude() {
        let c = ctx(DialectKind::Generic);
        assert_eq!(
            ColumnsPlaceholder.resolve_static(&c, &opts("")).unwrap(),
            "[id], [user_name], [created_at]"
        );
        assert_eq!(
            ColumnsPlaceholder.resolve_static(&c, &opts("--exclude id, CREATEDAT")).unwrap(),
            "[user_name]"
        );
    }

    #[test]
    fn test_values_inline_is_case_insensitive() {
        let c = ctx(DialectKind::SqlServer);
        assert_eq!(
            ValuesPlaceholder
                .resolve_static(&c, &opts("--exclude Id --inline createdat=GETDATE()"))
                .unwrap(),
            "(@user_name, GETDATE())"
        );
    }

    #[test]
    fn test_set_with_exclude_and_inline() {
        let c = ctx(DialectKind::Oracle);
        assert_eq!(
            SetPlaceholder
                .resolve_static(&c, &opts("--exclude Id --inline CreatedAt=SYSTIMESTAMP"))
                .unwrap(),
            "\"user_name\" = :user_name, \"created_at\" = SYSTIMESTAMP"
        );
    }

    #[test]
    fn test_where_by() {
        let c = ctx(DialectKind::Generic);
        assert_eq!(WherePlaceholder.resolve_static(&c, &opts("--by Id")).unwrap(), "[id] = @id");
        assert_eq!(
            WherePlaceholder.resolve_static(&c, &opts("--by Id,UserName")).unwrap(),
            "([id] = @id) AND ([user_name] = @user_name)"
        );
        assert!(WherePlaceholder.validate(&opts("")).is_err());
    }

    #[test]
    fn test_where_param() {
        let c = ctx(DialectKind::MySql);
        let args = TemplateArgs::new()
            .with("pred", col("Id").gt(5).and(col("UserName").starts_with("a")))
            .with("text", "1 = 1");
        assert_eq!(
            WherePlaceholder
                .resolve_dynamic(&c, &opts("--param pred"), &args)
                .unwrap(),
            "(`id` > 5) AND (`user_name` LIKE CONCAT('a', '%'))"
        );
        assert_eq!(
            WherePlaceholder
                .resolve_dynamic(&c, &opts("--param text"), &args)
                .unwrap(),
            "1 = 1"
        );
    }

    #[test]
    fn test_orderby() {
        let c = ctx(DialectKind::PostgreSql);
        assert_eq!(
            OrderByPlaceholder.resolve_static(&c, &opts("--by CreatedAt --desc")).unwrap(),
            "\"created_at\" DESC"
        );
        assert_eq!(
            OrderByPlaceholder.resolve_static(&c, &opts("--by UserName, Id desc")).unwrap(),
            "\"user_name\" ASC, \"id\" DESC"
        );

        let args = TemplateArgs::new().with("sort", "username").with("bad", "Password");
        assert_eq!(
            OrderByPlaceholder
                .resolve_dynamic(&c, &opts("--param sort"), &args)
                .unwrap(),
            "\"user_name\" ASC"
        );
        let err = OrderByPlaceholder
            .resolve_dynamic(&c, &opts("--param bad"), &args)
            .unwrap_err();
        assert!(err.is_invalid_operation());
    }

    #[test]
    fn test_limit_and_offset() {
        let generic = ctx(DialectKind::Generic);
        let mssql = ctx(DialectKind::SqlServer);
        assert_eq!(
            PagePlaceholder::limit().resolve_static(&generic, &opts("")).unwrap(),
            "LIMIT @limit"
        );
        assert_eq!(
            PagePlaceholder::limit().resolve_static(&mssql, &opts("--value 10")).unwrap(),
            "OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY"
        );
        assert_eq!(
            PagePlaceholder::offset().resolve_static(&mssql, &opts("")).unwrap(),
            "OFFSET @offset ROWS"
        );

        let args = TemplateArgs::new().with("n", 25).with("neg", -1).with("word", "ten");
        assert_eq!(
            PagePlaceholder::limit()
                .resolve_dynamic(&generic, &opts("--param n"), &args)
                .unwrap(),
            "LIMIT 25"
        );
        for bad in ["neg", "word", "missing"] {
            let err = PagePlaceholder::limit()
                .resolve_dynamic(&generic, &opts(&format!("--param {}", bad)), &args)
                .unwrap_err();
            assert!(err.is_invalid_operation(), "{}", bad);
        }
        assert!(PagePlaceholder::limit().validate(&opts("--value x")).is_err());
    }

    #[test]
    fn test_limit_folds_skip_into_one_fragment() {
        let cases = [
            (DialectKind::Generic, "LIMIT 10 OFFSET 20"),
            (DialectKind::SqlServer, "OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"),
            (DialectKind::MySql, "LIMIT 10 OFFSET 20"),
            (DialectKind::PostgreSql, "LIMIT 10 OFFSET 20"),
            (DialectKind::Oracle, "OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"),
            (DialectKind::Db2, "OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"),
        ];
        for (kind, expected) in cases {
            let sql = PagePlaceholder::limit()
                .resolve_static(&ctx(kind), &opts("--value 10 --offset 20"))
                .unwrap();
            assert_eq!(sql, expected, "{}", kind);
        }

        assert_eq!(
            PagePlaceholder::limit()
                .resolve_static(&ctx(DialectKind::Oracle), &opts("--offset"))
                .unwrap(),
            "OFFSET :offset ROWS FETCH NEXT :limit ROWS ONLY"
        );

        let page = opts("--param n --skip s");
        assert_eq!(PagePlaceholder::limit().classify(&page), PlaceholderKind::Dynamic);
        let args = TemplateArgs::new().with("n", 5).with("s", 15);
        assert_eq!(
            PagePlaceholder::limit()
                .resolve_dynamic(&ctx(DialectKind::SqlServer), &page, &args)
                .unwrap(),
            "OFFSET 15 ROWS FETCH NEXT 5 ROWS ONLY"
        );
    }

    #[test]
    fn test_skip_options_are_validated() {
        let limit = PagePlaceholder::limit();
        assert!(limit.validate(&opts("--offset 20")).is_ok());
        assert!(limit.validate(&opts("--offset x")).is_err());
        assert!(limit.validate(&opts("--offset 1 --skip s")).is_err());
        assert!(limit.validate(&opts("--value 1 --param n")).is_err());
        assert!(PagePlaceholder::offset().validate(&opts("--offset 3")).is_err());
        assert!(PagePlaceholder::offset().validate(&opts("--skip s")).is_err());
    }

    #[test]
    fn test_table_param_rejects_blank_values() {
        let c = ctx(DialectKind::PostgreSql);
        let args = TemplateArgs::new()
            .with("t", "orders")
            .with("blank", "   ")
            .with("nothing", Value::Null);
        assert_eq!(
            TablePlaceholder.resolve_dynamic(&c, &opts("--param t"), &args).unwrap(),
            "\"orders\""
        );
        for name in ["blank", "nothing", "absent"] {
            let err = TablePlaceholder
                .resolve_dynamic(&c, &opts(&format!("--param {}", name)), &args)
                .unwrap_err();
            assert!(err.is_invalid_operation(), "{}", name);
        }
        assert!(TablePlaceholder.validate(&opts("--param")).is_err());
    }
}
