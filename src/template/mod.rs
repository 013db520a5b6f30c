//! Placeholder template engine.
//!
//! A template is SQL text with `{{name --option value}}` tokens that expand
//! against a [`QueryContext`]:
//!
//! ```
//! use sqlforge::prelude::*;
//!
//! let ctx = QueryContext::from_properties(DialectKind::PostgreSql, "users", ["Id", "Name"]).unwrap();
//! let registry = PlaceholderRegistry::builtin();
//!
//! let insert = registry
//!     .prepare("INSERT INTO {{table}} ({{columns --exclude Id}}) VALUES {{values --exclude Id}}", ctx)
//!     .unwrap();
//! assert!(insert.is_static());
//! assert_eq!(
//!     insert.render(&TemplateArgs::new()).unwrap(),
//!     "INSERT INTO \"users\" (\"name\") VALUES (@name)"
//! );
//! ```
//!
//! Tokens that need nothing but the context are *static* and resolved once by
//! [`PlaceholderRegistry::prepare`]. Tokens that read runtime arguments
//! (`--param`) are *dynamic* and resolved on every
//! [`PreparedTemplate::render`].

pub mod handlers;
pub mod options;
pub mod prepared;
pub mod registry;
pub mod tokenizer;

use std::collections::HashMap;

use crate::ast::{Expr, Value};
use crate::error::{SqlError, SqlResult};
use crate::schema::QueryContext;

pub use options::PlaceholderOptions;
pub use prepared::PreparedTemplate;
pub use registry::PlaceholderRegistry;

/// Whether a token can be resolved at preparation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderKind {
    Static,
    Dynamic,
}

/// A named placeholder handler.
///
/// Handlers are shared between threads through the registry and must not
/// keep per-render state.
pub trait Placeholder: Send + Sync {
    /// Token name, lowercase.
    fn name(&self) -> &'static str;

    /// Decide from the options alone whether runtime arguments are needed.
    fn classify(&self, options: &PlaceholderOptions) -> PlaceholderKind;

    /// Reject option combinations the handler cannot resolve. Called once at
    /// preparation for every token.
    fn validate(&self, _options: &PlaceholderOptions) -> SqlResult<()> {
        Ok(())
    }

    /// Resolve a static token.
    fn resolve_static(&self, ctx: &QueryContext, options: &PlaceholderOptions) -> SqlResult<String>;

    /// Resolve a dynamic token against runtime arguments.
    fn resolve_dynamic(
        &self,
        ctx: &QueryContext,
        options: &PlaceholderOptions,
        args: &TemplateArgs,
    ) -> SqlResult<String> {
        let _ = args;
        self.resolve_static(ctx, options)
    }
}

/// A runtime argument for a dynamic token.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateArg {
    Value(Value),
    Expr(Expr),
}

impl From<Value> for TemplateArg {
    fn from(value: Value) -> Self {
        TemplateArg::Value(value)
    }
}

impl From<Expr> for TemplateArg {
    fn from(expr: Expr) -> Self {
        TemplateArg::Expr(expr)
    }
}

macro_rules! arg_from_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for TemplateArg {
                fn from(v: $t) -> Self {
                    TemplateArg::Value(Value::from(v))
                }
            }
        )*
    };
}

arg_from_value!(&str, String, i32, i64, u32, bool);

/// Runtime arguments by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateArgs {
    args: HashMap<String, TemplateArg>,
}

impl TemplateArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`TemplateArgs::insert`].
    pub fn with(mut self, name: impl Into<String>, arg: impl Into<TemplateArg>) -> Self {
        self.insert(name, arg);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, arg: impl Into<TemplateArg>) {
        self.args.insert(name.into(), arg.into());
    }

    pub fn get(&self, name: &str) -> Option<&TemplateArg> {
        self.args.get(name)
    }

    /// Argument that must be present and not blank.
    pub fn require(&self, name: &str) -> SqlResult<&TemplateArg> {
        match self.args.get(name) {
            Some(TemplateArg::Value(v)) if v.is_blank() => Err(SqlError::invalid(
                "runtime argument is null, empty or whitespace",
                name,
            )),
            Some(arg) => Ok(arg),
            None => Err(SqlError::invalid("missing runtime argument", name)),
        }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl<K: Into<String>, V: Into<TemplateArg>> FromIterator<(K, V)> for TemplateArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            args: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
