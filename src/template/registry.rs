//! Placeholder registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::handlers::{
    ColumnsPlaceholder, OrderByPlaceholder, PagePlaceholder, SetPlaceholder, TablePlaceholder,
    ValuesPlaceholder, WherePlaceholder,
};
use super::{Placeholder, PreparedTemplate};
use crate::error::SqlResult;
use crate::schema::QueryContext;

/// Handlers by token name.
///
/// Build one at startup and pass it to whatever prepares templates. Cloning
/// is cheap; handlers are shared.
#[derive(Clone, Default)]
pub struct PlaceholderRegistry {
    handlers: HashMap<String, Arc<dyn Placeholder>>,
}

impl PlaceholderRegistry {
    /// Registry without any handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `table`, `columns`, `values`, `set`, `where`, `orderby`,
    /// `limit` and `offset`.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register(TablePlaceholder)
            .register(ColumnsPlaceholder)
            .register(ValuesPlaceholder)
            .register(SetPlaceholder)
            .register(WherePlaceholder)
            .register(OrderByPlaceholder)
            .register(PagePlaceholder::limit())
            .register(PagePlaceholder::offset());
        registry
    }

    /// Add or replace a handler under its own name.
    pub fn register(&mut self, handler: impl Placeholder + 'static) -> &mut Self {
        self.handlers
            .insert(handler.name().to_ascii_lowercase(), Arc::new(handler));
        self
    }

    /// Handler for a token name, case-insensitive.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Placeholder>> {
        self.handlers.get(&name.to_ascii_lowercase()).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Tokenize, classify and resolve the static part of a template.
    pub fn prepare(
        &self,
        template: &str,
        context: impl Into<Arc<QueryContext>>,
    ) -> SqlResult<PreparedTemplate> {
        PreparedTemplate::prepare(template, context.into(), self)
    }
}

impl fmt::Debug for PlaceholderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaceholderRegistry")
            .field("handlers", &self.names())
            .finish()
    }
}
