//! sqlforge: render placeholder templates from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Expand a template for PostgreSQL
//! sqlforge --dialect pg render "SELECT {{columns}} FROM {{table}} WHERE {{where --by Id}}" \
//!     --table users --column Id:int --column UserName
//!
//! # Dynamic tokens take runtime arguments
//! sqlforge render "SELECT * FROM {{table --param t}} {{limit --param n}}" \
//!     --table users --arg t=users_2024 --arg n=10
//!
//! # Inspect dialects and function mappings
//! sqlforge dialects
//! sqlforge --dialect oracle functions
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use sqlforge::prelude::*;
use sqlforge::transpiler::functions::FUNCTIONS;

#[derive(Parser)]
#[command(name = "sqlforge")]
#[command(version)]
#[command(about = "Dialect-aware SQL template renderer", long_about = None)]
#[command(after_help = "EXAMPLES:
    sqlforge render 'DELETE FROM {{table}} WHERE {{where --by Id}}' --table users --column Id:int
    sqlforge --dialect mysql render 'SELECT * FROM {{table}} {{limit --param n}}' --table t --arg n=5
    sqlforge --dialect db2 functions")]
struct Cli {
    /// Target dialect (overrides the config file)
    #[arg(short, long, global = true, env = "SQLFORGE_DIALECT")]
    dialect: Option<DialectKind>,

    /// Config file (default: <config dir>/sqlforge/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare and render a template
    Render {
        /// Template text with {{placeholders}}
        template: String,

        /// Target table
        #[arg(short, long)]
        table: String,

        /// Column as Property[:kind][?], '?' marks it nullable
        #[arg(long = "column", value_name = "COLUMN")]
        columns: Vec<String>,

        /// Runtime argument as name=value
        #[arg(long = "arg", value_name = "NAME=VALUE")]
        args: Vec<String>,
    },
    /// Show the dialect descriptors
    Dialects,
    /// Show the function mappings of the active dialect
    Functions,
}

#[derive(Serialize)]
struct RenderOutput<'a> {
    dialect: DialectKind,
    kind: PlaceholderKind,
    dynamic: Vec<&'static str>,
    sql: &'a str,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("sqlforge=debug")
    } else {
        EnvFilter::try_from_env("SQLFORGE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => ForgeConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => ForgeConfig::load_default().context("failed to load default config")?,
    };
    if let Some(dialect) = cli.dialect {
        config.dialect = dialect;
    }

    match &cli.command {
        Commands::Render {
            template,
            table,
            columns,
            args,
        } => render(&config, cli.format, template, table, columns, args),
        Commands::Dialects => show_dialects(cli.format),
        Commands::Functions => show_functions(config.dialect, cli.format),
    }
}

fn render(
    config: &ForgeConfig,
    format: OutputFormat,
    template: &str,
    table: &str,
    columns: &[String],
    args: &[String],
) -> Result<()> {
    let columns = columns
        .iter()
        .map(|spec| parse_column(spec))
        .collect::<Result<Vec<_>>>()?;
    let ctx = config.context(table, columns)?;

    let prepared = PlaceholderRegistry::builtin()
        .prepare(template, ctx)
        .context("failed to prepare template")?;

    let mut template_args = TemplateArgs::new();
    for arg in args {
        let (name, value) = arg
            .split_once('=')
            .with_context(|| format!("argument '{}' is not name=value", arg))?;
        template_args.insert(name.trim(), parse_value(value));
    }

    let sql = prepared.render(&template_args).context("failed to render template")?;

    match format {
        OutputFormat::Json => {
            let out = RenderOutput {
                dialect: config.dialect,
                kind: prepared.kind(),
                dynamic: prepared.dynamic_placeholders(),
                sql: &sql,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            let kind = match prepared.kind() {
                PlaceholderKind::Static => "static".green(),
                PlaceholderKind::Dynamic => "dynamic".yellow(),
            };
            println!("{} {} ({})", "Dialect:".dimmed(), config.dialect, kind);
            let dynamic = prepared.dynamic_placeholders();
            if !dynamic.is_empty() {
                println!("{} {}", "Dynamic:".dimmed(), dynamic.join(", ").cyan());
            }
            println!("{}", sql.white().bold());
        }
    }

    Ok(())
}

/// `Property[:kind][?]`
fn parse_column(spec: &str) -> Result<ColumnMeta> {
    let (spec, nullable) = match spec.strip_suffix('?') {
        Some(rest) => (rest, true),
        None => (spec, false),
    };
    let (property, kind) = match spec.split_once(':') {
        Some((property, kind)) => (property, kind.parse::<DataKind>()?),
        None => (spec, DataKind::default()),
    };
    if property.trim().is_empty() {
        bail!("column '{}' has no property name", spec);
    }

    let meta = ColumnMeta::new(property.trim(), kind);
    Ok(if nullable { meta.nullable() } else { meta })
}

fn parse_value(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        Value::Int(n)
    } else if let Ok(f) = raw.parse::<f64>() {
        Value::Float(f)
    } else if raw == "true" || raw == "false" {
        Value::Bool(raw == "true")
    } else if raw.eq_ignore_ascii_case("null") {
        Value::Null
    } else {
        Value::Text(raw.to_string())
    }
}

fn show_dialects(format: OutputFormat) -> Result<()> {
    let rows: Vec<DialectRow> = DialectKind::ALL.iter().map(|k| DialectRow::from(*k)).collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Text => {
            println!(
                "{}",
                format!(
                    "{:<11} {:<10} {:<9} {:<8} {:<12} {}",
                    "DIALECT", "IDENT", "PARAM", "BOOL", "PAGINATION", "SCALAR FROM"
                )
                .white()
                .bold()
            );
            for row in &rows {
                println!(
                    "{:<11} {:<10} {:<9} {:<8} {:<12} {}",
                    row.dialect.to_string().cyan(),
                    row.identifier,
                    row.parameter,
                    row.booleans,
                    row.pagination,
                    row.scalar_from.unwrap_or("-")
                );
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct DialectRow {
    dialect: DialectKind,
    identifier: String,
    parameter: String,
    booleans: String,
    pagination: &'static str,
    scalar_from: Option<&'static str>,
}

impl From<DialectKind> for DialectRow {
    fn from(kind: DialectKind) -> Self {
        let d = kind.dialect();
        Self {
            dialect: kind,
            identifier: d.wrap_identifier("x"),
            parameter: d.parameter("p0"),
            booleans: format!("{}/{}", d.bool_literal(true), d.bool_literal(false)),
            pagination: match d.pagination {
                sqlforge::transpiler::PaginationStyle::Limit => "limit",
                sqlforge::transpiler::PaginationStyle::OffsetFetch => "offset-fetch",
            },
            scalar_from: d.dummy_table,
        }
    }
}

fn show_functions(dialect: DialectKind, format: OutputFormat) -> Result<()> {
    let column = DialectKind::ALL
        .iter()
        .position(|k| *k == dialect)
        .unwrap_or_default();

    #[derive(Serialize)]
    struct FunctionEntry {
        function: String,
        arity: usize,
        sql: Option<&'static str>,
    }

    let entries: Vec<FunctionEntry> = FUNCTIONS
        .iter()
        .map(|row| FunctionEntry {
            function: row.func.to_string(),
            arity: row.arity,
            sql: row.sql[column],
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => {
            println!("{} {}", "Functions for".dimmed(), dialect.to_string().cyan().bold());
            for entry in &entries {
                let name = format!("{}/{}", entry.function, entry.arity);
                match entry.sql {
                    Some(sql) => println!("  {:<16} {}", name.yellow(), sql),
                    None => println!("  {:<16} {}", name.yellow(), "unsupported".red()),
                }
            }
        }
    }
    Ok(())
}
