//! Dialect descriptors.
//!
//! One immutable [`Dialect`] record exists per [`DialectKind`]. Everything that
//! differs between backends is either a field here or a row in the function
//! table, so renderers only ever match on the tag at a handful of sites.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SqlError;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// ANSI SQL as understood by SQLite.
    #[default]
    #[serde(alias = "sqlite")]
    Generic,
    #[serde(alias = "mssql")]
    SqlServer,
    MySql,
    #[serde(alias = "postgres", alias = "pg")]
    PostgreSql,
    Oracle,
    Db2,
}

impl DialectKind {
    /// Every dialect, in table-column order.
    pub const ALL: [DialectKind; 6] = [
        DialectKind::Generic,
        DialectKind::SqlServer,
        DialectKind::MySql,
        DialectKind::PostgreSql,
        DialectKind::Oracle,
        DialectKind::Db2,
    ];

    /// The shared descriptor for this dialect.
    pub fn dialect(self) -> &'static Dialect {
        match self {
            DialectKind::Generic => &GENERIC,
            DialectKind::SqlServer => &SQL_SERVER,
            DialectKind::MySql => &MYSQL,
            DialectKind::PostgreSql => &POSTGRESQL,
            DialectKind::Oracle => &ORACLE,
            DialectKind::Db2 => &DB2,
        }
    }

    /// Column index of this dialect in the function mapping table.
    pub(crate) fn index(self) -> usize {
        match self {
            DialectKind::Generic => 0,
            DialectKind::SqlServer => 1,
            DialectKind::MySql => 2,
            DialectKind::PostgreSql => 3,
            DialectKind::Oracle => 4,
            DialectKind::Db2 => 5,
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DialectKind::Generic => "Generic",
            DialectKind::SqlServer => "SqlServer",
            DialectKind::MySql => "MySql",
            DialectKind::PostgreSql => "PostgreSql",
            DialectKind::Oracle => "Oracle",
            DialectKind::Db2 => "Db2",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for DialectKind {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" | "sqlite" | "ansi" => Ok(DialectKind::Generic),
            "sqlserver" | "mssql" | "tsql" => Ok(DialectKind::SqlServer),
            "mysql" => Ok(DialectKind::MySql),
            "postgresql" | "postgres" | "pg" => Ok(DialectKind::PostgreSql),
            "oracle" => Ok(DialectKind::Oracle),
            "db2" => Ok(DialectKind::Db2),
            other => Err(SqlError::Config(format!("unknown dialect '{}'", other))),
        }
    }
}

/// How boolean literals are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolStyle {
    /// `1` / `0`
    Numeric,
    /// `true` / `false`
    Keyword,
}

/// Which pagination grammar the dialect speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaginationStyle {
    /// `LIMIT n OFFSET m`
    Limit,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`
    OffsetFetch,
}

/// Immutable description of a dialect's lexical rules and capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dialect {
    pub kind: DialectKind,
    pub identifier_open: &'static str,
    pub identifier_close: &'static str,
    pub string_open: &'static str,
    pub string_close: &'static str,
    pub parameter_prefix: &'static str,
    pub bool_style: BoolStyle,
    pub pagination: PaginationStyle,
    /// Whether a derived table alias is introduced with `AS`.
    pub derived_alias_keyword: bool,
    /// Table required by a scalar `SELECT` that reads no rows.
    pub dummy_table: Option<&'static str>,
}

pub const GENERIC: Dialect = Dialect {
    kind: DialectKind::Generic,
    identifier_open: "[",
    identifier_close: "]",
    string_open: "'",
    string_close: "'",
    parameter_prefix: "@",
    bool_style: BoolStyle::Numeric,
    pagination: PaginationStyle::Limit,
    derived_alias_keyword: true,
    dummy_table: None,
};

pub const SQL_SERVER: Dialect = Dialect {
    kind: DialectKind::SqlServer,
    identifier_open: "[",
    identifier_close: "]",
    string_open: "'",
    string_close: "'",
    parameter_prefix: "@",
    bool_style: BoolStyle::Numeric,
    pagination: PaginationStyle::OffsetFetch,
    derived_alias_keyword: true,
    dummy_table: None,
};

pub const MYSQL: Dialect = Dialect {
    kind: DialectKind::MySql,
    identifier_open: "`",
    identifier_close: "`",
    string_open: "'",
    string_close: "'",
    parameter_prefix: "@",
    bool_style: BoolStyle::Numeric,
    pagination: PaginationStyle::Limit,
    derived_alias_keyword: true,
    dummy_table: None,
};

pub const POSTGRESQL: Dialect = Dialect {
    kind: DialectKind::PostgreSql,
    identifier_open: "\"",
    identifier_close: "\"",
    string_open: "'",
    string_close: "'",
    parameter_prefix: "@",
    bool_style: BoolStyle::Keyword,
    pagination: PaginationStyle::Limit,
    derived_alias_keyword: true,
    dummy_table: None,
};

pub const ORACLE: Dialect = Dialect {
    kind: DialectKind::Oracle,
    identifier_open: "\"",
    identifier_close: "\"",
    string_open: "'",
    string_close: "'",
    parameter_prefix: ":",
    bool_style: BoolStyle::Numeric,
    pagination: PaginationStyle::OffsetFetch,
    derived_alias_keyword: false,
    dummy_table: Some("DUAL"),
};

pub const DB2: Dialect = Dialect {
    kind: DialectKind::Db2,
    identifier_open: "\"",
    identifier_close: "\"",
    string_open: "'",
    string_close: "'",
    parameter_prefix: "@",
    bool_style: BoolStyle::Numeric,
    pagination: PaginationStyle::OffsetFetch,
    derived_alias_keyword: true,
    dummy_table: Some("SYSIBM.SYSDUMMY1"),
};

impl Dialect {
    /// Shared descriptor for a dialect tag.
    pub fn of(kind: DialectKind) -> &'static Dialect {
        kind.dialect()
    }

    /// Quote a table or column name.
    pub fn wrap_identifier(&self, name: &str) -> String {
        format!("{}{}{}", self.identifier_open, name, self.identifier_close)
    }

    /// Wrap text in string delimiters. Nothing is escaped here.
    pub fn wrap_literal_string(&self, s: &str) -> String {
        format!("{}{}{}", self.string_open, s, self.string_close)
    }

    /// Named parameter reference (`@name`, `:name`).
    pub fn parameter(&self, name: &str) -> String {
        format!("{}{}", self.parameter_prefix, name)
    }

    pub fn bool_literal(&self, value: bool) -> &'static str {
        match (self.bool_style, value) {
            (BoolStyle::Numeric, true) => "1",
            (BoolStyle::Numeric, false) => "0",
            (BoolStyle::Keyword, true) => "true",
            (BoolStyle::Keyword, false) => "false",
        }
    }

    /// `AS sq` or, where the keyword is rejected, plain `sq`.
    pub fn derived_alias(&self, alias: &str) -> String {
        if self.derived_alias_keyword {
            format!("AS {}", alias)
        } else {
            alias.to_string()
        }
    }

    /// Trailing `FROM` clause for a scalar `SELECT` (empty when not needed).
    pub fn scalar_from(&self) -> String {
        match self.dummy_table {
            Some(table) => format!(" FROM {}", table),
            None => String::new(),
        }
    }

    /// Pagination fragment for already-rendered TAKE/SKIP operands.
    ///
    /// Returns `None` when neither operand is present. The OFFSET/FETCH form
    /// needs an ORDER BY to be meaningful; that is left to the caller.
    pub fn limit_offset(&self, take: Option<&str>, skip: Option<&str>) -> Option<String> {
        if take.is_none() && skip.is_none() {
            return None;
        }

        let sql = match self.pagination {
            PaginationStyle::Limit => match (take, skip) {
                (Some(n), Some(m)) => format!("LIMIT {} OFFSET {}", n, m),
                (Some(n), None) => format!("LIMIT {}", n),
                (None, Some(m)) => match self.kind {
                    // MySQL has no bare OFFSET; SQLite wants a negative limit.
                    DialectKind::MySql => format!("LIMIT 18446744073709551615 OFFSET {}", m),
                    DialectKind::PostgreSql => format!("OFFSET {}", m),
                    _ => format!("LIMIT -1 OFFSET {}", m),
                },
                (None, None) => unreachable!("checked above"),
            },
            PaginationStyle::OffsetFetch => {
                let mut sql = format!("OFFSET {} ROWS", skip.unwrap_or("0"));
                if let Some(n) = take {
                    sql.push_str(&format!(" FETCH NEXT {} ROWS ONLY", n));
                }
                sql
            }
        };

        Some(sql)
    }
}
