//! sqlforge configuration
//!
//! ```toml
//! dialect = "postgres"
//! parameterize = true
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::ast::Query;
use crate::error::SqlResult;
use crate::schema::{ColumnMeta, QueryContext};
use crate::transpiler::DialectKind;

/// Defaults applied to contexts and queries built through the config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForgeConfig {
    /// Target dialect
    pub dialect: DialectKind,

    /// Emit named parameters instead of inline literals
    pub parameterize: bool,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            dialect: DialectKind::Generic,
            parameterize: false,
        }
    }
}

impl ForgeConfig {
    /// Create a new configuration builder
    pub fn builder() -> ForgeConfigBuilder {
        ForgeConfigBuilder::default()
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> SqlResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config file. The file must exist.
    pub fn load(path: impl AsRef<Path>) -> SqlResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        debug!(path = %path.display(), dialect = %config.dialect, "loaded config");
        Ok(config)
    }

    /// Load `sqlforge/config.toml` from the user config directory, or the
    /// defaults when it does not exist.
    pub fn load_default() -> SqlResult<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sqlforge").join("config.toml"))
    }

    /// Context for `table` in the configured dialect.
    pub fn context(&self, table: impl Into<String>, columns: Vec<ColumnMeta>) -> SqlResult<QueryContext> {
        QueryContext::new(self.dialect, table, columns)
    }

    /// Start a query with the configured parameterization.
    pub fn query(&self, context: impl Into<std::sync::Arc<QueryContext>>) -> Query {
        Query::new(context).parameterized(self.parameterize)
    }
}

/// Builder for ForgeConfig
#[derive(Debug, Default)]
pub struct ForgeConfigBuilder {
    config: ForgeConfig,
}

impl ForgeConfigBuilder {
    pub fn dialect(mut self, dialect: DialectKind) -> Self {
        self.config.dialect = dialect;
        self
    }

    pub fn parameterize(mut self, on: bool) -> Self {
        self.config.parameterize = on;
        self
    }

    pub fn build(self) -> ForgeConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::{col, ExprExt};
    use crate::error::SqlError;
    use crate::schema::DataKind;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dialect = \"pg\"\nparameterize = true").unwrap();

        let config = ForgeConfig::load(file.path()).unwrap();
        assert_eq!(
            config,
            ForgeConfig::builder()
                .dialect(DialectKind::PostgreSql)
                .parameterize(true)
                .build()
        );
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = ForgeConfig::from_toml("dialect = \"mysql\"").unwrap();
        assert_eq!(config.dialect, DialectKind::MySql);
        assert!(!config.parameterize);
        assert_eq!(ForgeConfig::from_toml("").unwrap(), ForgeConfig::default());
    }

    #[test]
    fn test_bad_files() {
        assert!(matches!(
            ForgeConfig::from_toml("dialect = \"sybase\""),
            Err(SqlError::Toml(_))
        ));
        assert!(matches!(
            ForgeConfig::from_toml("dialects = \"mysql\""),
            Err(SqlError::Toml(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let err = ForgeConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, SqlError::Io(_)));
    }

    #[test]
    fn test_query_follows_config() {
        let config = ForgeConfig::builder()
            .dialect(DialectKind::Oracle)
            .parameterize(false)
            .build();
        let ctx = config
            .context("users", vec![ColumnMeta::new("Id", DataKind::Int)])
            .unwrap();
        let sql = config.query(ctx).filter(col("Id").eq(7)).to_sql().unwrap();
        assert_eq!(sql, "SELECT * FROM \"users\" WHERE \"id\" = 7");
    }
}
