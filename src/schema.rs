//! Table and column metadata consumed by the expression renderer and the
//! placeholder engine.

use std::fmt;
use std::str::FromStr;

use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};

use crate::error::{SqlError, SqlResult};
use crate::transpiler::{Dialect, DialectKind};

/// Storage class of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Bool,
    Int,
    Float,
    Decimal,
    #[default]
    Text,
    DateTime,
    Uuid,
    Binary,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataKind::Bool => "bool",
            DataKind::Int => "int",
            DataKind::Float => "float",
            DataKind::Decimal => "decimal",
            DataKind::Text => "text",
            DataKind::DateTime => "datetime",
            DataKind::Uuid => "uuid",
            DataKind::Binary => "binary",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for DataKind {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Ok(DataKind::Bool),
            "int" | "integer" | "bigint" | "long" => Ok(DataKind::Int),
            "float" | "double" | "real" => Ok(DataKind::Float),
            "decimal" | "numeric" | "money" => Ok(DataKind::Decimal),
            "text" | "string" | "varchar" => Ok(DataKind::Text),
            "datetime" | "timestamp" | "date" => Ok(DataKind::DateTime),
            "uuid" | "guid" => Ok(DataKind::Uuid),
            "binary" | "bytes" | "blob" => Ok(DataKind::Binary),
            other => Err(SqlError::Config(format!("unknown data kind '{}'", other))),
        }
    }
}

/// A single mapped column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Column name as stored (snake_case).
    pub column_name: String,
    /// Source identifier; matched case-insensitively.
    pub property_name: String,
    pub data_kind: DataKind,
    pub is_nullable: bool,
}

impl ColumnMeta {
    /// Column whose stored name is the snake_case form of the property.
    pub fn new(property_name: impl Into<String>, data_kind: DataKind) -> Self {
        let property_name = property_name.into();
        Self {
            column_name: property_name.to_snake_case(),
            property_name,
            data_kind,
            is_nullable: false,
        }
    }

    /// Override the stored column name.
    pub fn column(mut self, column_name: impl Into<String>) -> Self {
        self.column_name = column_name.into();
        self
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    /// Case-insensitive property match.
    pub fn is(&self, property: &str) -> bool {
        self.property_name.eq_ignore_ascii_case(property)
    }
}

/// Everything the compiler knows about the target table.
///
/// Built once by the caller and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryContext {
    dialect: &'static Dialect,
    table: String,
    columns: Vec<ColumnMeta>,
}

impl QueryContext {
    /// Create a context; the table name must not be blank.
    pub fn new(
        dialect: DialectKind,
        table: impl Into<String>,
        columns: Vec<ColumnMeta>,
    ) -> SqlResult<Self> {
        let table = table.into();
        if table.trim().is_empty() {
            return Err(SqlError::invalid(
                "table name must not be empty or whitespace",
                table,
            ));
        }
        Ok(Self {
            dialect: dialect.dialect(),
            table,
            columns,
        })
    }

    /// Create a context from property names, deriving snake_case columns.
    ///
    /// # Example
    /// ```
    /// use sqlforge::schema::QueryContext;
    /// use sqlforge::transpiler::DialectKind;
    ///
    /// let ctx = QueryContext::from_properties(DialectKind::Generic, "users", ["Id", "UserName"]).unwrap();
    /// assert_eq!(ctx.column_name("username"), "user_name");
    /// ```
    pub fn from_properties<I, S>(dialect: DialectKind, table: impl Into<String>, properties: I) -> SqlResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns = properties
            .into_iter()
            .map(|p| ColumnMeta::new(p.as_ref(), DataKind::default()))
            .collect();
        Self::new(dialect, table, columns)
    }

    pub fn dialect(&self) -> &'static Dialect {
        self.dialect
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    /// Look up a column by property name, ignoring case.
    pub fn column(&self, property: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.is(property))
    }

    /// Stored column name for a property, or its snake_case form when the
    /// property is not mapped.
    pub fn column_name(&self, property: &str) -> String {
        match self.column(property) {
            Some(meta) => meta.column_name.clone(),
            None => property.to_snake_case(),
        }
    }

    /// Quoted table name.
    pub fn quoted_table(&self) -> String {
        self.dialect.wrap_identifier(&self.table)
    }

    /// Columns whose property is not in `excluded` (case-insensitive).
    pub fn columns_except<'a, 'e>(&'a self, excluded: &'e [String]) -> impl Iterator<Item = &'a ColumnMeta> + 'e
    where
        'a: 'e,
    {
        self.columns
            .iter()
            .filter(move |c| !excluded.iter().any(|e| c.is(e.trim())))
    }
}
