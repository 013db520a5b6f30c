//! Prepared templates.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use super::tokenizer::{tokenize, Segment};
use super::{Placeholder, PlaceholderKind, PlaceholderOptions, PlaceholderRegistry, TemplateArgs};
use crate::error::{SqlError, SqlResult};
use crate::schema::QueryContext;

enum Part {
    /// Literal text and already resolved static tokens
    Sql(String),
    Dynamic {
        handler: Arc<dyn Placeholder>,
        options: PlaceholderOptions,
        position: usize,
    },
}

impl fmt::Debug for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Part::Sql(sql) => f.debug_tuple("Sql").field(sql).finish(),
            Part::Dynamic {
                handler,
                options,
                position,
            } => f
                .debug_struct("Dynamic")
                .field("handler", &handler.name())
                .field("options", options)
                .field("position", position)
                .finish(),
        }
    }
}

/// A template whose static tokens are resolved and whose dynamic tokens are
/// bound to their handlers.
///
/// Immutable after preparation; share it behind an `Arc` and render from any
/// thread.
#[derive(Debug)]
pub struct PreparedTemplate {
    context: Arc<QueryContext>,
    parts: Vec<Part>,
}

impl PreparedTemplate {
    pub(crate) fn prepare(
        template: &str,
        context: Arc<QueryContext>,
        registry: &PlaceholderRegistry,
    ) -> SqlResult<Self> {
        let segments = tokenize(template)?;
        let mut parts: Vec<Part> = Vec::new();
        let mut tokens = 0usize;
        let mut dynamic = 0usize;

        for segment in segments {
            let text = match segment {
                Segment::Text(text) => text,
                Segment::Token(token) => {
                    tokens += 1;
                    let handler = registry
                        .get(&token.name)
                        .ok_or_else(|| SqlError::UnknownPlaceholder(token.name.clone()))?;
                    let options = PlaceholderOptions::parse(&token.options, token.position)?;
                    handler.validate(&options)?;

                    match handler.classify(&options) {
                        PlaceholderKind::Static => handler.resolve_static(&context, &options)?,
                        PlaceholderKind::Dynamic => {
                            dynamic += 1;
                            parts.push(Part::Dynamic {
                                handler,
                                options,
                                position: token.position,
                            });
                            continue;
                        }
                    }
                }
            };

            match parts.last_mut() {
                Some(Part::Sql(sql)) => sql.push_str(&text),
                _ => parts.push(Part::Sql(text)),
            }
        }

        debug!(
            table = context.table(),
            dialect = %context.dialect().kind,
            tokens,
            dynamic,
            "prepared template"
        );

        Ok(Self { context, parts })
    }

    /// Whether the template renders without runtime arguments.
    pub fn is_static(&self) -> bool {
        !self.parts.iter().any(|p| matches!(p, Part::Dynamic { .. }))
    }

    pub fn kind(&self) -> PlaceholderKind {
        if self.is_static() {
            PlaceholderKind::Static
        } else {
            PlaceholderKind::Dynamic
        }
    }

    /// The finished SQL of a static template.
    pub fn static_sql(&self) -> Option<&str> {
        match self.parts.as_slice() {
            [] => Some(""),
            [Part::Sql(sql)] => Some(sql),
            _ => None,
        }
    }

    pub fn context(&self) -> &QueryContext {
        &self.context
    }

    /// Names of the dynamic handlers, in template order.
    pub fn dynamic_placeholders(&self) -> Vec<&'static str> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Dynamic { handler, .. } => Some(handler.name()),
                Part::Sql(_) => None,
            })
            .collect()
    }

    /// Render the template. Static parts are copied; each dynamic token is
    /// resolved against `args`.
    pub fn render(&self, args: &TemplateArgs) -> SqlResult<String> {
        let mut sql = String::new();
        for part in &self.parts {
            match part {
                Part::Sql(text) => sql.push_str(text),
                Part::Dynamic {
                    handler,
                    options,
                    position,
                } => {
                    trace!(placeholder = handler.name(), position, "resolving dynamic placeholder");
                    sql.push_str(&handler.resolve_dynamic(&self.context, options, args)?);
                }
            }
        }
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::schema::{ColumnMeta, DataKind};
    use crate::transpiler::DialectKind;
    use pretty_assertions::assert_eq;
    use std::thread;

    fn ctx(kind: DialectKind) -> QueryContext {
        QueryContext::new(
            kind,
            "orders",
            vec![
                ColumnMeta::new("Id", DataKind::Int),
                ColumnMeta::new("CustomerId", DataKind::Int),
                ColumnMeta::new("Total", DataKind::Decimal),
            ],
        )
        .unwrap()
    }

    fn prepare(template: &str, kind: DialectKind) -> SqlResult<PreparedTemplate> {
        PlaceholderRegistry::builtin().prepare(template, ctx(kind))
    }

    #[test]
    fn test_static_template_is_resolved_once() {
        let t = prepare(
            "UPDATE {{table}} SET {{set --exclude Id}} WHERE {{where --by Id}}",
            DialectKind::Generic,
        )
        .unwrap();
        assert!(t.is_static());
        assert_eq!(t.kind(), PlaceholderKind::Static);
        let expected = "UPDATE [orders] SET [customer_id] = @customer_id, [total] = @total WHERE [id] = @id";
        assert_eq!(t.static_sql(), Some(expected));
        assert_eq!(t.render(&TemplateArgs::new()).unwrap(), expected);
    }

    #[test]
    fn test_dynamic_template() {
        let t = prepare(
            "SELECT {{columns}} FROM {{table --param t}} WHERE {{where --param p}} ORDER BY {{orderby --param s}}",
            DialectKind::PostgreSql,
        )
        .unwrap();
        assert!(!t.is_static());
        assert_eq!(t.static_sql(), None);
        assert_eq!(t.dynamic_placeholders(), vec!["table", "where", "orderby"]);

        let args = TemplateArgs::new()
            .with("t", "orders_2024")
            .with("p", col("Total").gt(10))
            .with("s", "Total desc");
        assert_eq!(
            t.render(&args).unwrap(),
            "SELECT \"id\", \"customer_id\", \"total\" FROM \"orders_2024\" WHERE \"total\" > 10 ORDER BY \"total\" DESC"
        );
    }

    #[test]
    fn test_table_param_on_postgres() {
        let t = prepare("{{table --param t}}", DialectKind::PostgreSql).unwrap();
        let args = TemplateArgs::new().with("t", "orders");
        assert_eq!(t.render(&args).unwrap(), "\"orders\"");
    }

    #[test]
    fn test_values_excluding_everything() {
        let ctx = QueryContext::from_properties(DialectKind::Generic, "people", ["Id", "Name"]).unwrap();
        let t = PlaceholderRegistry::builtin()
            .prepare("{{values --exclude Id,Name}}", ctx)
            .unwrap();
        assert_eq!(t.render(&TemplateArgs::new()).unwrap(), "()");
    }

    #[test]
    fn test_unknown_placeholder() {
        let err = prepare("SELECT {{nope}}", DialectKind::Generic).unwrap_err();
        assert_eq!(err.to_string(), "Unknown placeholder: 'nope'");
    }

    #[test]
    fn test_static_errors_surface_at_prepare() {
        let err = prepare("{{where}}", DialectKind::Generic).unwrap_err();
        assert!(err.is_invalid_operation());
        let err = prepare("{{orderby --by Missing}}", DialectKind::Generic).unwrap_err();
        assert!(err.is_invalid_operation());
    }

    #[test]
    fn test_missing_dynamic_argument() {
        let t = prepare("DELETE FROM {{table --param t}}", DialectKind::Generic).unwrap();
        let err = t.render(&TemplateArgs::new()).unwrap_err();
        assert!(err.is_invalid_operation());
        assert!(err.to_string().contains("'t'"));
    }

    #[test]
    fn test_concurrent_rendering() {
        let t = Arc::new(prepare("SELECT * FROM {{table --param t}} {{limit --param n}}", DialectKind::MySql).unwrap());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let t = Arc::clone(&t);
                thread::spawn(move || {
                    let args = TemplateArgs::new().with("t", format!("shard_{}", i)).with("n", i);
                    t.render(&args).unwrap()
                })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(
                handle.join().unwrap(),
                format!("SELECT * FROM `shard_{}` LIMIT {}", i, i)
            );
        }
    }
}
